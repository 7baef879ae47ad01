#![forbid(unsafe_code)]

//! GeoJSON feature decoding.
//!
//! Region features carry `LnKod`/`LnNamn` properties and municipality
//! features carry `KnKod`/`KnNamn`, as in the SCB boundary exports. Generic
//! `code`/`name` keys are accepted when the specific ones are absent.
//!
//! Decoding is per feature: a feature with a missing code, a non-polygonal
//! geometry, or malformed coordinates is dropped with a warning and the rest
//! of the collection still loads.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::geometry::{Bounds, Geometry, Point, Polygon, Ring};

/// Administrative level of a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureKind {
    Region,
    Municipality,
}

impl FeatureKind {
    /// Property holding the feature code.
    #[must_use]
    pub const fn code_key(self) -> &'static str {
        match self {
            Self::Region => "LnKod",
            Self::Municipality => "KnKod",
        }
    }

    /// Property holding the display name.
    #[must_use]
    pub const fn name_key(self) -> &'static str {
        match self {
            Self::Region => "LnNamn",
            Self::Municipality => "KnNamn",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Region => "region",
            Self::Municipality => "municipality",
        }
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One administrative unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub kind: FeatureKind,
    pub code: String,
    pub name: String,
    pub geometry: Geometry,
}

impl Feature {
    #[must_use]
    pub fn new(
        kind: FeatureKind,
        code: impl Into<String>,
        name: impl Into<String>,
        geometry: Geometry,
    ) -> Self {
        Self {
            kind,
            code: code.into(),
            name: name.into(),
            geometry,
        }
    }
}

/// Errors that make a whole collection unusable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeoError {
    /// The input was not JSON.
    Json(String),
    /// The value is neither a `FeatureCollection` object nor a feature array.
    NotACollection,
}

impl fmt::Display for GeoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(msg) => write!(f, "invalid geojson: {msg}"),
            Self::NotACollection => write!(f, "expected a FeatureCollection or a feature array"),
        }
    }
}

impl std::error::Error for GeoError {}

#[derive(Deserialize)]
struct RawFeature {
    #[serde(default)]
    properties: Option<serde_json::Map<String, Value>>,
    #[serde(default)]
    geometry: Option<RawGeometry>,
}

#[derive(Deserialize)]
#[serde(tag = "type", content = "coordinates")]
enum RawGeometry {
    Polygon(Vec<Vec<Vec<f64>>>),
    MultiPolygon(Vec<Vec<Vec<Vec<f64>>>>),
}

/// Decoded features of one kind, in source order, addressable by code.
#[derive(Debug, Clone)]
pub struct FeatureCollection {
    kind: FeatureKind,
    features: Vec<Arc<Feature>>,
    by_code: HashMap<String, usize>,
}

impl FeatureCollection {
    /// Build from already-decoded features. Later duplicates of a code are
    /// dropped.
    #[must_use]
    pub fn from_features(kind: FeatureKind, features: impl IntoIterator<Item = Feature>) -> Self {
        let mut out = Self {
            kind,
            features: Vec::new(),
            by_code: HashMap::new(),
        };
        for feature in features {
            out.push(feature);
        }
        out
    }

    /// Decode a GeoJSON `FeatureCollection` (or a bare feature array).
    pub fn from_geojson_value(kind: FeatureKind, value: &Value) -> Result<Self, GeoError> {
        let items = match value {
            Value::Array(items) => items,
            Value::Object(obj) => match obj.get("features") {
                Some(Value::Array(items)) => items,
                _ => return Err(GeoError::NotACollection),
            },
            _ => return Err(GeoError::NotACollection),
        };

        let mut out = Self::from_features(kind, std::iter::empty());
        for (position, item) in items.iter().enumerate() {
            match decode_feature(kind, item) {
                Ok(feature) => out.push(feature),
                Err(reason) => {
                    warn!(target: "kartan.geo", kind = %kind, position, reason, "dropping feature");
                }
            }
        }
        Ok(out)
    }

    /// Decode from GeoJSON text.
    pub fn from_geojson_str(kind: FeatureKind, text: &str) -> Result<Self, GeoError> {
        let value: Value =
            serde_json::from_str(text).map_err(|err| GeoError::Json(err.to_string()))?;
        Self::from_geojson_value(kind, &value)
    }

    fn push(&mut self, feature: Feature) {
        if self.by_code.contains_key(&feature.code) {
            warn!(target: "kartan.geo", kind = %self.kind, code = %feature.code, "duplicate feature code");
            return;
        }
        self.by_code
            .insert(feature.code.clone(), self.features.len());
        self.features.push(Arc::new(feature));
    }

    #[inline]
    pub fn kind(&self) -> FeatureKind {
        self.kind
    }

    /// Look up a feature by code.
    pub fn get(&self, code: &str) -> Option<&Arc<Feature>> {
        self.by_code.get(code).map(|&i| &self.features[i])
    }

    #[inline]
    pub fn features(&self) -> &[Arc<Feature>] {
        &self.features
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Feature>> {
        self.features.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Bounds of every feature.
    pub fn bounds(&self) -> Bounds {
        self.features
            .iter()
            .fold(Bounds::EMPTY, |acc, f| acc.union(&f.geometry.bounds()))
    }

    /// Features in Swedish alphabetical order of name, then code.
    pub fn sorted_by_name(&self) -> Vec<Arc<Feature>> {
        let mut sorted = self.features.clone();
        sorted.sort_by_cached_key(|f| (kartan_text::sort_key(&f.name), f.code.clone()));
        sorted
    }
}

fn decode_feature(kind: FeatureKind, item: &Value) -> Result<Feature, &'static str> {
    let raw = RawFeature::deserialize(item).map_err(|_| "malformed feature")?;
    let props = raw.properties.unwrap_or_default();

    let code = property_text(&props, kind.code_key())
        .or_else(|| property_text(&props, "code"))
        .ok_or("missing code")?;
    let name = property_text(&props, kind.name_key())
        .or_else(|| property_text(&props, "name"))
        .unwrap_or_default();
    let geometry = match raw.geometry.ok_or("missing geometry")? {
        RawGeometry::Polygon(rings) => Geometry::Polygon(polygon(rings)?),
        RawGeometry::MultiPolygon(parts) => Geometry::MultiPolygon(
            parts
                .into_iter()
                .map(polygon)
                .collect::<Result<Vec<_>, _>>()?,
        ),
    };
    Ok(Feature {
        kind,
        code,
        name,
        geometry,
    })
}

fn property_text(props: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    match props.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_owned()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn polygon(rings: Vec<Vec<Vec<f64>>>) -> Result<Polygon, &'static str> {
    let mut rings = rings.into_iter().map(ring);
    let exterior = rings.next().ok_or("polygon without rings")??;
    let holes = rings.collect::<Result<Vec<_>, _>>()?;
    Ok(Polygon::new(exterior, holes))
}

fn ring(positions: Vec<Vec<f64>>) -> Result<Ring, &'static str> {
    positions
        .into_iter()
        .map(|pos| match pos.as_slice() {
            [x, y, ..] if x.is_finite() && y.is_finite() => Ok(Point::new(*x, *y)),
            _ => Err("bad position"),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Ring::new)
}
