#![forbid(unsafe_code)]

//! Effects handed to the host.
//!
//! The runtime describes what should happen; the host (see `kartan-web`)
//! turns each effect into a request, a toast, or a map animation and reports
//! completions back as messages.

use kartan_geo::ZoomTransform;

use crate::form::Submission;

/// Visual kind of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToastKind {
    /// Spinner; replaced later by a success or error toast with the same tag.
    Loading,
    Success,
    Error,
    Info,
}

impl ToastKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
        }
    }
}

/// A toast request. Toasts sharing a `tag` replace one another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    pub tag: Option<String>,
}

impl Toast {
    #[must_use]
    pub fn new(kind: ToastKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            tag: None,
        }
    }

    #[must_use]
    pub fn tagged(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }
}

/// Something only the host can do.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// GET the data endpoint; answer with `DataLoaded` or `LoadFailed`.
    FetchData,
    /// POST a validated submission; answer with `MailSent` or `MailFailed`.
    SendMail(Submission),
    /// Show or replace a toast.
    Toast(Toast),
    /// Animate the map to a transform.
    Zoom(ZoomTransform),
}

impl Effect {
    #[must_use]
    pub fn toast(kind: ToastKind, message: impl Into<String>) -> Self {
        Self::Toast(Toast::new(kind, message))
    }

    /// Label for tracing.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::FetchData => "fetch_data",
            Self::SendMail(_) => "send_mail",
            Self::Toast(_) => "toast",
            Self::Zoom(_) => "zoom",
        }
    }
}
