#![forbid(unsafe_code)]

//! The mail-send contract.
//!
//! A validated [`Submission`] becomes one `POST` to the mail endpoint:
//!
//! ```text
//! { to, subject, message, initiative_name, location, responsible, phone, email, website, description }
//! ```
//!
//! The endpoint answers `{ "status": "success" }` on success. Everything else
//! is a [`MailError`]; none of them are fatal.

use std::fmt;

use kartan_runtime::Submission;
use kartan_runtime::config::{ApiConfig, MailConfig};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// A ready-to-send mail request.
#[derive(Debug, Clone, PartialEq)]
pub struct MailRequest {
    pub url: String,
    pub body: Value,
}

impl MailRequest {
    /// Build the request for `submission`. Form fields follow the envelope
    /// keys in form order.
    #[must_use]
    pub fn build(api: &ApiConfig, mail: &MailConfig, submission: &Submission) -> Self {
        let mut body = Map::new();
        body.insert("to".into(), Value::from(mail.to.as_str()));
        body.insert("subject".into(), Value::from(mail.subject.as_str()));
        body.insert("message".into(), Value::from(mail.message.as_str()));
        for (field, value) in submission.fields() {
            body.insert(field.name().into(), Value::from(value.as_str()));
        }
        Self {
            url: api.mail_url(),
            body: Value::Object(body),
        }
    }

    /// JSON text of the body.
    #[must_use]
    pub fn to_json(&self) -> String {
        self.body.to_string()
    }
}

/// Why a submission did not go through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MailError {
    /// The request never got an answer.
    Transport(String),
    /// Non-success HTTP status.
    Status(u16),
    /// The answer was not the expected JSON.
    Json(String),
    /// The endpoint answered with a status other than `success`.
    Rejected { status: Option<String> },
}

impl fmt::Display for MailError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(reason) => write!(f, "mail request failed: {reason}"),
            Self::Status(code) => write!(f, "mail request failed with HTTP {code}"),
            Self::Json(msg) => write!(f, "mail response is not valid JSON: {msg}"),
            Self::Rejected { status: Some(s) } => write!(f, "mail rejected with status `{s}`"),
            Self::Rejected { status: None } => write!(f, "mail response has no status"),
        }
    }
}

impl std::error::Error for MailError {}

#[derive(Deserialize)]
struct RawResponse {
    #[serde(default)]
    status: Option<Value>,
}

/// Check a mail endpoint answer.
pub fn decode_mail_response(status: u16, body: &[u8]) -> Result<(), MailError> {
    if !(200..300).contains(&status) {
        warn!(target: "kartan.web", status, "mail request failed");
        return Err(MailError::Status(status));
    }
    let raw: RawResponse =
        serde_json::from_slice(body).map_err(|e| MailError::Json(e.to_string()))?;
    match raw.status {
        Some(Value::String(s)) if s == "success" => {
            debug!(target: "kartan.web", "mail sent");
            Ok(())
        }
        Some(Value::String(s)) => Err(MailError::Rejected { status: Some(s) }),
        Some(other) => Err(MailError::Rejected {
            status: Some(other.to_string()),
        }),
        None => Err(MailError::Rejected { status: None }),
    }
}
