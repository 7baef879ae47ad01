#![forbid(unsafe_code)]

//! Kartan geometry.
//!
//! Decodes the region (län) and municipality (kommun) boundary collections,
//! answers "which municipalities lie in this region", and computes the
//! viewport transforms a renderer needs to draw and zoom the map.
//!
//! # Key Components
//!
//! - [`FeatureCollection`] - decoded GeoJSON features keyed by code
//! - [`ContainmentIndex`] - region code to alphabetically ordered municipalities
//! - [`FitProjection`] / [`ZoomTransform`] - fit-to-viewport and focus transforms
//!
//! # Role in Kartan
//! `kartan-geo` is a leaf crate. It knows nothing about editorial content or
//! selection state; `kartan-runtime` combines its index with the content index
//! into a catalog.

pub mod containment;
pub mod feature;
pub mod geometry;
pub mod projection;

pub use containment::ContainmentIndex;
pub use feature::{Feature, FeatureCollection, FeatureKind, GeoError};
pub use geometry::{Bounds, Geometry, Location, Point, Polygon, Ring};
pub use projection::{FitProjection, Viewport, ZoomTransform};
