#![forbid(unsafe_code)]

//! Drawers and the search surface.

use std::sync::Arc;

use kartan_content::ContentEntry;
use kartan_geo::Feature;

use crate::catalog::Catalog;

/// The three drawers the map can open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Overlay {
    /// Selected region or initiative, bottom sheet on narrow screens.
    Detail,
    /// "No initiatives here yet" prompt.
    Info,
    /// All regions and all initiatives.
    AllListing,
}

/// Open/closed flags for each drawer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Overlays {
    pub detail: bool,
    pub info: bool,
    pub all_listing: bool,
}

impl Overlays {
    #[inline]
    pub fn is_open(&self, overlay: Overlay) -> bool {
        *self.slot(overlay)
    }

    pub fn open(&mut self, overlay: Overlay) {
        *self.slot_mut(overlay) = true;
    }

    pub fn close(&mut self, overlay: Overlay) {
        *self.slot_mut(overlay) = false;
    }

    /// Flip and return the new state.
    pub fn toggle(&mut self, overlay: Overlay) -> bool {
        let slot = self.slot_mut(overlay);
        *slot = !*slot;
        *slot
    }

    /// Anything open.
    pub fn any_open(&self) -> bool {
        self.detail || self.info || self.all_listing
    }

    fn slot(&self, overlay: Overlay) -> &bool {
        match overlay {
            Overlay::Detail => &self.detail,
            Overlay::Info => &self.info,
            Overlay::AllListing => &self.all_listing,
        }
    }

    fn slot_mut(&mut self, overlay: Overlay) -> &mut bool {
        match overlay {
            Overlay::Detail => &mut self.detail,
            Overlay::Info => &mut self.info,
            Overlay::AllListing => &mut self.all_listing,
        }
    }
}

/// Which list the search surface shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchKind {
    Regions,
    Initiatives,
}

/// Search surface state.
///
/// Toggling the active kind clears it and flips visibility. Toggling the
/// other kind switches to it and shows the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchState {
    kind: Option<SearchKind>,
    visible: bool,
}

impl SearchState {
    pub fn toggle(&mut self, kind: SearchKind) {
        if self.kind == Some(kind) {
            self.kind = None;
            self.visible = !self.visible;
        } else {
            self.kind = Some(kind);
            self.visible = true;
        }
    }

    /// Hide after a pick.
    pub fn close(&mut self) {
        self.visible = false;
    }

    #[inline]
    pub fn kind(&self) -> Option<SearchKind> {
        self.kind
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// The kind currently on screen.
    pub fn showing(&self) -> Option<SearchKind> {
        if self.visible { self.kind } else { None }
    }
}

/// Rows of one search listing.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchListing {
    Regions(Vec<Arc<Feature>>),
    Initiatives(Vec<Arc<ContentEntry>>),
}

impl SearchListing {
    /// Regions in collation order, or every indexed entry by title.
    pub fn build(catalog: &Catalog, kind: SearchKind) -> Self {
        match kind {
            SearchKind::Regions => Self::Regions(catalog.regions_sorted().to_vec()),
            SearchKind::Initiatives => Self::Initiatives(catalog.content.by_title().to_vec()),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Regions(rows) => rows.len(),
            Self::Initiatives(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
