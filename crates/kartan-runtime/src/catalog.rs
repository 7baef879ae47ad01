#![forbid(unsafe_code)]

//! Immutable inputs of one data load and the indexes derived from them.

use std::fmt;
use std::sync::Arc;

use kartan_content::{ContentFeed, ContentIndex};
use kartan_geo::{ContainmentIndex, Feature, FeatureCollection};
use tracing::info;

/// Hero text shown while no region is selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MainText {
    pub title: String,
    pub text: String,
}

impl MainText {
    #[must_use]
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
        }
    }
}

/// Reasons a catalog cannot be built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogError {
    MissingRegions,
    MissingMunicipals,
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingRegions => write!(f, "region geometry is empty"),
            Self::MissingMunicipals => write!(f, "municipality geometry is empty"),
        }
    }
}

impl std::error::Error for CatalogError {}

/// Geometry, content, and the two indexes built from them.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub regions: FeatureCollection,
    pub municipals: FeatureCollection,
    pub containment: ContainmentIndex,
    pub content: ContentIndex,
    pub feed: ContentFeed,
    pub main: MainText,
    regions_sorted: Vec<Arc<Feature>>,
}

impl Catalog {
    /// Build both indexes. Runs once per data load.
    pub fn build(
        regions: FeatureCollection,
        municipals: FeatureCollection,
        feed: ContentFeed,
        main: MainText,
    ) -> Result<Self, CatalogError> {
        if regions.is_empty() {
            return Err(CatalogError::MissingRegions);
        }
        if municipals.is_empty() {
            return Err(CatalogError::MissingMunicipals);
        }
        let containment = ContainmentIndex::build(&regions, &municipals);
        let content = ContentIndex::build(&feed);
        let regions_sorted = regions.sorted_by_name();
        info!(
            target: "kartan.app",
            regions = regions.len(),
            municipals = municipals.len(),
            entries = feed.len(),
            "catalog ready"
        );
        Ok(Self {
            regions,
            municipals,
            containment,
            content,
            feed,
            main,
            regions_sorted,
        })
    }

    #[inline]
    pub fn region(&self, code: &str) -> Option<&Arc<Feature>> {
        self.regions.get(code)
    }

    #[inline]
    pub fn municipal(&self, code: &str) -> Option<&Arc<Feature>> {
        self.municipals.get(code)
    }

    /// Regions in Swedish alphabetical order.
    #[inline]
    pub fn regions_sorted(&self) -> &[Arc<Feature>] {
        &self.regions_sorted
    }
}
