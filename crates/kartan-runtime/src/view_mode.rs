#![forbid(unsafe_code)]

//! What the side panels show for the current selection.
//!
//! Resolution is a first-match priority list:
//!
//! 1. no region: [`ViewMode::PickRegion`]
//! 2. region with a region-level entry: [`ViewMode::RegionEntry`], even when
//!    the region also has municipality content
//! 3. region with municipality content but no resolved entry and
//!    municipality: [`ViewMode::Carousel`]
//! 4. region with both resolved: [`ViewMode::MunicipalDetail`]
//! 5. region without municipality content: [`ViewMode::NoContent`]

use std::sync::Arc;

use kartan_content::ContentEntry;
use kartan_geo::Feature;

use crate::catalog::{Catalog, MainText};
use crate::selection::Selection;

/// Panel content, dispatched on once per render.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewMode {
    PickRegion {
        regions: Vec<Arc<Feature>>,
        main: MainText,
    },
    RegionEntry {
        region: Arc<Feature>,
        entry: Arc<ContentEntry>,
    },
    Carousel {
        region: Arc<Feature>,
        entries: Vec<Arc<ContentEntry>>,
        index: usize,
    },
    MunicipalDetail {
        region: Arc<Feature>,
        municipal: Arc<Feature>,
        entry: Arc<ContentEntry>,
        entries: Vec<Arc<ContentEntry>>,
        index: usize,
    },
    NoContent {
        region: Arc<Feature>,
    },
}

impl ViewMode {
    /// Resolve the mode for `selection`.
    pub fn resolve(catalog: &Catalog, selection: &Selection) -> Self {
        let Some(region) = selection.region() else {
            return Self::PickRegion {
                regions: catalog.regions_sorted().to_vec(),
                main: catalog.main.clone(),
            };
        };
        let region = Arc::clone(region);
        if let Some(entry) = catalog.content.region_entries(&region.code).first() {
            return Self::RegionEntry {
                region,
                entry: Arc::clone(entry),
            };
        }
        let Some(list) = catalog.content.by_region(&region.code) else {
            return Self::NoContent { region };
        };
        let entries = list.ordered().to_vec();
        let index = selection.index();
        match (selection.municipal(), selection.entry()) {
            (Some(municipal), Some(entry)) => Self::MunicipalDetail {
                region,
                municipal: Arc::clone(municipal),
                entry: Arc::clone(entry),
                entries,
                index,
            },
            _ => Self::Carousel {
                region,
                entries,
                index,
            },
        }
    }

    /// Stable label for tracing and host dispatch.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::PickRegion { .. } => "pick_region",
            Self::RegionEntry { .. } => "region_entry",
            Self::Carousel { .. } => "carousel",
            Self::MunicipalDetail { .. } => "municipal_detail",
            Self::NoContent { .. } => "no_content",
        }
    }

    /// Selected region, if any.
    pub fn region(&self) -> Option<&Arc<Feature>> {
        match self {
            Self::PickRegion { .. } => None,
            Self::RegionEntry { region, .. }
            | Self::Carousel { region, .. }
            | Self::MunicipalDetail { region, .. }
            | Self::NoContent { region } => Some(region),
        }
    }

    #[inline]
    pub fn is_no_content(&self) -> bool {
        matches!(self, Self::NoContent { .. })
    }
}
