#![forbid(unsafe_code)]

//! Contact field sanitizers.
//!
//! Entry contact fields are free text typed into a CMS. Before a field becomes
//! a `mailto:` or `tel:` link it has to look like an address or a number;
//! otherwise the text is shown without a link.

use std::sync::LazyLock;

use regex::Regex;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"));

static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9\- ]{7,20}$").expect("phone regex"));

/// Returns `Some(address)` when `raw` looks like an e-mail address.
#[must_use]
pub fn email(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    EMAIL.is_match(trimmed).then_some(trimmed)
}

/// Returns `Some(number)` when `raw` looks like a phone number.
#[must_use]
pub fn phone(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    PHONE.is_match(trimmed).then_some(trimmed)
}

/// `mailto:` href for an address, if valid.
#[must_use]
pub fn mailto_href(raw: &str) -> Option<String> {
    email(raw).map(|addr| format!("mailto:{addr}"))
}

/// `tel:` href for a number, if valid.
#[must_use]
pub fn tel_href(raw: &str) -> Option<String> {
    phone(raw).map(|num| format!("tel:{num}"))
}
