#![forbid(unsafe_code)]

//! The "add initiative" submission form.
//!
//! Every field is required. Phone and e-mail are checked with the same rules
//! the contact links use. Validation reports every failing field at once,
//! in form order.

use std::fmt;

use kartan_text::sanitize;

/// One input of the form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FormField {
    InitiativeName,
    Location,
    Responsible,
    Phone,
    Email,
    Website,
    Description,
}

impl FormField {
    pub const ALL: [FormField; 7] = [
        Self::InitiativeName,
        Self::Location,
        Self::Responsible,
        Self::Phone,
        Self::Email,
        Self::Website,
        Self::Description,
    ];

    /// Wire name in the mail request body.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::InitiativeName => "initiative_name",
            Self::Location => "location",
            Self::Responsible => "responsible",
            Self::Phone => "phone",
            Self::Email => "email",
            Self::Website => "website",
            Self::Description => "description",
        }
    }

    #[must_use]
    pub const fn placeholder(self) -> &'static str {
        match self {
            Self::InitiativeName => "Namn på initiativ",
            Self::Location => "Ort",
            Self::Responsible => "Kontaktperson",
            Self::Phone => "Telefon till ansvarig",
            Self::Email => "E-mail till ansvarig",
            Self::Website => "Initiativets webbplats",
            Self::Description => "Kort beskrivning om initiativet",
        }
    }

    /// Multi-line input.
    #[inline]
    pub const fn is_multiline(self) -> bool {
        matches!(self, Self::Description)
    }

    const fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What is wrong with one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldProblem {
    Missing,
    InvalidPhone,
    InvalidEmail,
}

impl FieldProblem {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Missing => "required",
            Self::InvalidPhone => "not a phone number",
            Self::InvalidEmail => "not an e-mail address",
        }
    }
}

/// Why a submit was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    /// One or more fields failed validation.
    Invalid(Vec<(FormField, FieldProblem)>),
    /// A submission is already in flight.
    InFlight,
}

impl FormError {
    /// Failing fields, empty for [`FormError::InFlight`].
    #[must_use]
    pub fn fields(&self) -> Vec<FormField> {
        match self {
            Self::Invalid(problems) => problems.iter().map(|(field, _)| *field).collect(),
            Self::InFlight => Vec::new(),
        }
    }
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid(problems) => {
                write!(f, "invalid form:")?;
                for (i, (field, problem)) in problems.iter().enumerate() {
                    let sep = if i == 0 { " " } else { ", " };
                    write!(f, "{sep}{field} {}", problem.as_str())?;
                }
                Ok(())
            }
            Self::InFlight => write!(f, "a submission is already in progress"),
        }
    }
}

impl std::error::Error for FormError {}

/// Validated, trimmed field values ready for the mail request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    fields: Vec<(FormField, String)>,
}

impl Submission {
    /// Field values in form order.
    #[inline]
    pub fn fields(&self) -> &[(FormField, String)] {
        &self.fields
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        self.fields
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, v)| v.as_str())
    }
}

/// Form values plus the in-flight flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitiativeForm {
    values: [String; 7],
    submitting: bool,
}

impl InitiativeForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        self.values[field.slot()] = value.into();
    }

    #[inline]
    pub fn get(&self, field: FormField) -> &str {
        &self.values[field.slot()]
    }

    #[inline]
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Check every field without changing state.
    pub fn validate(&self) -> Result<Submission, FormError> {
        let mut problems = Vec::new();
        let mut fields = Vec::with_capacity(FormField::ALL.len());
        for field in FormField::ALL {
            let value = self.get(field).trim();
            let problem = if value.is_empty() {
                Some(FieldProblem::Missing)
            } else {
                match field {
                    FormField::Phone if sanitize::phone(value).is_none() => {
                        Some(FieldProblem::InvalidPhone)
                    }
                    FormField::Email if sanitize::email(value).is_none() => {
                        Some(FieldProblem::InvalidEmail)
                    }
                    _ => None,
                }
            };
            match problem {
                Some(problem) => problems.push((field, problem)),
                None => fields.push((field, value.to_owned())),
            }
        }
        if problems.is_empty() {
            Ok(Submission { fields })
        } else {
            Err(FormError::Invalid(problems))
        }
    }

    /// Validate and mark the form as submitting.
    pub fn begin_submit(&mut self) -> Result<Submission, FormError> {
        if self.submitting {
            return Err(FormError::InFlight);
        }
        let submission = self.validate()?;
        self.submitting = true;
        Ok(submission)
    }

    /// The request finished. Values stay so a failed send can be retried.
    pub fn finish_submit(&mut self) {
        self.submitting = false;
    }
}
