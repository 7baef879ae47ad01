#![forbid(unsafe_code)]

//! Decoding of the data endpoint response.
//!
//! The endpoint answers with one JSON object:
//!
//! ```text
//! { regions, municipals, contents: [] | {id: entry}, relations?, main?: {title, text} }
//! ```
//!
//! `regions` and `municipals` are GeoJSON feature collections. `relations` is
//! accepted and ignored. Any failure here is fatal for the view: the host
//! turns it into `Msg::LoadFailed`.

use std::fmt;

use kartan_content::{ContentFeed, FeedError};
use kartan_geo::{FeatureCollection, FeatureKind, GeoError};
use kartan_runtime::{Catalog, CatalogError, MainText};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

/// Why the data load failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// Non-success HTTP status.
    Status(u16),
    /// The body is not the expected JSON object.
    Json(String),
    /// A geometry collection has the wrong shape.
    Geometry { field: &'static str, source: GeoError },
    /// `contents` is neither an array nor an object.
    Feed(FeedError),
    /// Decoded, but a geometry collection is empty.
    Catalog(CatalogError),
}

impl LoadError {
    /// Short label for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Status(_) => "status",
            Self::Json(_) => "json",
            Self::Geometry { .. } => "geometry",
            Self::Feed(_) => "feed",
            Self::Catalog(_) => "catalog",
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(code) => write!(f, "data request failed with HTTP {code}"),
            Self::Json(msg) => write!(f, "data response is not valid JSON: {msg}"),
            Self::Geometry { field, source } => write!(f, "`{field}`: {source}"),
            Self::Feed(e) => write!(f, "`contents`: {e}"),
            Self::Catalog(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Geometry { source, .. } => Some(source),
            Self::Feed(e) => Some(e),
            Self::Catalog(e) => Some(e),
            Self::Status(_) | Self::Json(_) => None,
        }
    }
}

impl From<CatalogError> for LoadError {
    fn from(e: CatalogError) -> Self {
        Self::Catalog(e)
    }
}

#[derive(Deserialize)]
struct RawPayload {
    #[serde(default)]
    regions: Value,
    #[serde(default)]
    municipals: Value,
    #[serde(default)]
    contents: Value,
    #[serde(default)]
    main: Option<RawMain>,
}

#[derive(Deserialize, Default)]
struct RawMain {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    text: Option<String>,
}

#[inline]
fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

fn collection(
    kind: FeatureKind,
    field: &'static str,
    value: &Value,
) -> Result<FeatureCollection, LoadError> {
    if value.is_null() {
        return Ok(FeatureCollection::from_features(kind, []));
    }
    FeatureCollection::from_geojson_value(kind, value)
        .map_err(|source| LoadError::Geometry { field, source })
}

/// Decode a data response into a ready [`Catalog`].
///
/// A missing `regions` or `municipals` decodes as empty and then fails as
/// [`LoadError::Catalog`]. A missing `contents` is an empty feed.
pub fn decode_payload(status: u16, body: &[u8]) -> Result<Catalog, LoadError> {
    if !is_success(status) {
        warn!(target: "kartan.web", status, "data request failed");
        return Err(LoadError::Status(status));
    }
    let raw: RawPayload =
        serde_json::from_slice(body).map_err(|e| LoadError::Json(e.to_string()))?;

    let regions = collection(FeatureKind::Region, "regions", &raw.regions)?;
    let municipals = collection(FeatureKind::Municipality, "municipals", &raw.municipals)?;
    let feed = ContentFeed::from_value(&raw.contents).map_err(LoadError::Feed)?;
    let main = raw
        .main
        .map(|m| MainText::new(m.title.unwrap_or_default(), m.text.unwrap_or_default()))
        .unwrap_or_default();

    debug!(
        target: "kartan.web",
        bytes = body.len(),
        regions = regions.len(),
        municipals = municipals.len(),
        entries = feed.len(),
        "payload decoded"
    );
    Ok(Catalog::build(regions, municipals, feed, main)?)
}
