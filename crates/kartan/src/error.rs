#![forbid(unsafe_code)]

//! Kartan error model and graceful degradation.
//!
//! Each crate owns its typed errors. [`Error`] gathers them for callers that
//! want one `?`-friendly type, and [`Error::degradation`] says how the map
//! keeps going when one of them surfaces.

use std::fmt;

use kartan_runtime::{CatalogError, ConfigError, FormError};
use kartan_web::{LoadError, MailError};

// ── Unified Error ───────────────────────────────────────────────────────

/// Top-level error type for Kartan hosts.
#[derive(Debug)]
pub enum Error {
    /// The data request or its payload failed.
    Load(LoadError),
    /// The payload decoded but cannot back a map.
    Catalog(CatalogError),
    /// The mail endpoint refused or never answered.
    Mail(MailError),
    /// Configuration could not be read or is out of range.
    Config(ConfigError),
    /// The initiative form was refused before sending.
    Form(FormError),
    /// Raw I/O error (convenience variant for `?` on io::Result).
    Io(std::io::Error),
}

/// Standard result type for Kartan APIs.
pub type Result<T> = std::result::Result<T, Error>;

// ── Graceful Degradation ────────────────────────────────────────────────

/// What the host should do when an error surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegradationAction {
    /// Replace the map with the full-screen error view. Terminal.
    FailedView,
    /// Show an error toast and keep the current state.
    Toast,
    /// Drop the event; nothing changes.
    Ignore,
    /// Fall back to the built-in configuration.
    UseDefaults,
}

impl Error {
    /// Determine the degradation action for this error.
    pub fn degradation(&self) -> DegradationAction {
        match self {
            Self::Load(_) | Self::Catalog(_) => DegradationAction::FailedView,

            Self::Mail(_) => DegradationAction::Toast,
            Self::Form(FormError::Invalid(_)) => DegradationAction::Toast,
            Self::Form(FormError::InFlight) => DegradationAction::Ignore,

            Self::Config(_) | Self::Io(_) => DegradationAction::UseDefaults,
        }
    }

    /// Error type label for tracing.
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Load(_) => "load",
            Self::Catalog(_) => "catalog",
            Self::Mail(_) => "mail",
            Self::Config(_) => "config",
            Self::Form(_) => "form",
            Self::Io(_) => "io",
        }
    }

    /// Whether the map survives the error.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self.degradation(), DegradationAction::FailedView)
    }
}

// ── Display ─────────────────────────────────────────────────────────────

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load(err) => write!(f, "{err}"),
            Self::Catalog(err) => write!(f, "{err}"),
            Self::Mail(err) => write!(f, "{err}"),
            Self::Config(err) => write!(f, "{err}"),
            Self::Form(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "I/O: {err}"),
        }
    }
}

impl fmt::Display for DegradationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FailedView => write!(f, "failed_view"),
            Self::Toast => write!(f, "toast"),
            Self::Ignore => write!(f, "ignore"),
            Self::UseDefaults => write!(f, "use_defaults"),
        }
    }
}

// ── std::error::Error ───────────────────────────────────────────────────

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Load(err) => Some(err),
            Self::Catalog(err) => Some(err),
            Self::Mail(err) => Some(err),
            Self::Config(err) => Some(err),
            Self::Form(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

// ── From conversions ────────────────────────────────────────────────────

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<LoadError> for Error {
    fn from(err: LoadError) -> Self {
        Self::Load(err)
    }
}

impl From<CatalogError> for Error {
    fn from(err: CatalogError) -> Self {
        Self::Catalog(err)
    }
}

impl From<MailError> for Error {
    fn from(err: MailError) -> Self {
        Self::Mail(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<FormError> for Error {
    fn from(err: FormError) -> Self {
        Self::Form(err)
    }
}

// ── Tests ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::error::Error as StdError;

    use kartan_runtime::form::{FieldProblem, FormField};

    use super::*;

    // ── Degradation ─────────────────────────────────────────────────

    #[test]
    fn load_and_catalog_fail_the_view() {
        let load = Error::from(LoadError::Status(503));
        assert_eq!(load.degradation(), DegradationAction::FailedView);
        assert!(!load.is_recoverable());

        let catalog = Error::from(CatalogError::MissingRegions);
        assert_eq!(catalog.degradation(), DegradationAction::FailedView);
        assert!(!catalog.is_recoverable());
    }

    #[test]
    fn mail_errors_toast() {
        let err = Error::from(MailError::Status(500));
        assert_eq!(err.degradation(), DegradationAction::Toast);
        assert!(err.is_recoverable());
    }

    #[test]
    fn form_errors_split_by_cause() {
        let invalid = Error::from(FormError::Invalid(vec![(
            FormField::Email,
            FieldProblem::InvalidEmail,
        )]));
        assert_eq!(invalid.degradation(), DegradationAction::Toast);
        assert_eq!(
            Error::from(FormError::InFlight).degradation(),
            DegradationAction::Ignore
        );
    }

    #[test]
    fn config_and_io_fall_back_to_defaults() {
        let config = Error::from(ConfigError::Invalid(vec!["map.stretch_y".into()]));
        assert_eq!(config.degradation(), DegradationAction::UseDefaults);
        let io = Error::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(io.degradation(), DegradationAction::UseDefaults);
        assert!(io.is_recoverable());
    }

    // ── Labels and Display ──────────────────────────────────────────

    #[test]
    fn error_type_labels() {
        assert_eq!(Error::from(LoadError::Status(404)).error_type(), "load");
        assert_eq!(Error::from(CatalogError::MissingMunicipals).error_type(), "catalog");
        assert_eq!(Error::from(MailError::Status(500)).error_type(), "mail");
        assert_eq!(Error::from(ConfigError::Invalid(vec![])).error_type(), "config");
        assert_eq!(Error::from(FormError::InFlight).error_type(), "form");
        let io = std::io::Error::other("x");
        assert_eq!(Error::from(io).error_type(), "io");
    }

    #[test]
    fn display_delegates_to_the_domain_error() {
        let err = Error::from(LoadError::Status(503));
        assert_eq!(err.to_string(), LoadError::Status(503).to_string());
        let io = Error::from(std::io::Error::other("disk"));
        assert!(io.to_string().starts_with("I/O: "));
    }

    #[test]
    fn source_is_the_wrapped_error() {
        let err = Error::from(MailError::Transport("offline".into()));
        let source = StdError::source(&err).map(ToString::to_string);
        assert_eq!(source, Some(MailError::Transport("offline".into()).to_string()));
    }

    #[test]
    fn degradation_display() {
        assert_eq!(DegradationAction::FailedView.to_string(), "failed_view");
        assert_eq!(DegradationAction::Toast.to_string(), "toast");
        assert_eq!(DegradationAction::Ignore.to_string(), "ignore");
        assert_eq!(DegradationAction::UseDefaults.to_string(), "use_defaults");
    }
}
