#![forbid(unsafe_code)]

//! Initiative entries.

use std::fmt;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// What an entry is attached to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntryType {
    /// Attached to a region; shown instead of the drill-down.
    Region,
    /// Attached to a municipality inside `region_id`.
    Municipal,
    /// Anything else the CMS emits. Never indexed.
    Other(String),
}

impl EntryType {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "region" => Self::Region,
            "municipal" => Self::Municipal,
            other => Self::Other(other.to_owned()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Region => "region",
            Self::Municipal => "municipal",
            Self::Other(raw) => raw,
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One editorial entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentEntry {
    pub id: String,
    pub entry_type: EntryType,
    pub feature_id: String,
    pub region_id: Option<String>,
    pub title: String,
    /// HTML body as authored in the CMS.
    pub content: String,
    pub author: String,
    pub mail: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub external_link: Option<String>,
}

/// Why a feed record could not become an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryError {
    Malformed,
    MissingId,
    MissingType,
    MissingFeatureId,
}

impl EntryError {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Malformed => "malformed entry",
            Self::MissingId => "missing id",
            Self::MissingType => "missing type",
            Self::MissingFeatureId => "missing feature_id",
        }
    }
}

impl fmt::Display for EntryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::error::Error for EntryError {}

#[derive(Deserialize)]
struct RawEntry {
    #[serde(default, deserialize_with = "lenient_text")]
    id: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "lenient_text")]
    entry_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    feature_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    region_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    content: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    author: Option<String>,
    #[serde(default, alias = "email", deserialize_with = "lenient_text")]
    mail: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    phone: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    website: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    external_link: Option<String>,
}

/// Strings pass through, numbers are stringified, blanks and anything else
/// become `None`.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

impl ContentEntry {
    /// Minimal entry; the remaining fields start empty.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        entry_type: EntryType,
        feature_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            entry_type,
            feature_id: feature_id.into(),
            region_id: None,
            title: String::new(),
            content: String::new(),
            author: String::new(),
            mail: None,
            phone: None,
            website: None,
            external_link: None,
        }
    }

    /// A municipality entry.
    #[must_use]
    pub fn municipal(
        id: impl Into<String>,
        feature_id: impl Into<String>,
        region_id: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self::new(id, EntryType::Municipal, feature_id)
            .with_region(region_id)
            .with_title(title)
    }

    /// A region entry.
    #[must_use]
    pub fn region(
        id: impl Into<String>,
        region_code: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self::new(id, EntryType::Region, region_code).with_title(title)
    }

    #[must_use]
    pub fn with_region(mut self, region_id: impl Into<String>) -> Self {
        self.region_id = Some(region_id.into());
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Decode one feed record. `fallback_id` is used when the record has no
    /// `id` of its own (map feeds carry it in the key).
    pub fn from_value(value: &Value, fallback_id: Option<&str>) -> Result<Self, EntryError> {
        let raw = RawEntry::deserialize(value).map_err(|_| EntryError::Malformed)?;
        let id = raw
            .id
            .or_else(|| fallback_id.map(str::to_owned))
            .ok_or(EntryError::MissingId)?;
        let entry_type = EntryType::parse(&raw.entry_type.ok_or(EntryError::MissingType)?);
        let feature_id = raw.feature_id.ok_or(EntryError::MissingFeatureId)?;
        Ok(Self {
            id,
            entry_type,
            feature_id,
            region_id: raw.region_id,
            title: raw.title.unwrap_or_default(),
            content: raw.content.unwrap_or_default(),
            author: raw.author.unwrap_or_default(),
            mail: raw.mail,
            phone: raw.phone,
            website: raw.website,
            external_link: raw.external_link,
        })
    }

    #[inline]
    pub fn is_municipal(&self) -> bool {
        self.entry_type == EntryType::Municipal
    }

    #[inline]
    pub fn is_region(&self) -> bool {
        self.entry_type == EntryType::Region
    }

    /// `mailto:` link when the address is valid.
    pub fn mailto(&self) -> Option<String> {
        self.mail.as_deref().and_then(kartan_text::sanitize::mailto_href)
    }

    /// `tel:` link when the number is valid.
    pub fn tel(&self) -> Option<String> {
        self.phone.as_deref().and_then(kartan_text::sanitize::tel_href)
    }
}
