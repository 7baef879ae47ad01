#![forbid(unsafe_code)]

//! Region, municipality, and entry selection.
//!
//! The selection is a four-field tuple `(region, municipal, entry, index)`.
//! Only `region` and `index` are inputs; `municipal` and `entry` are always
//! the output of [`derive_selection`] for those inputs. Every transition
//! computes the complete successor tuple and commits it with one assignment,
//! so no caller can observe a region paired with another region's entry.
//!
//! Changing the region resets the index to 0 before derivation. The one
//! exception is [`SelectionMachine::jump_to_entry`], which sets region and
//! index together.

use std::sync::Arc;

use kartan_content::{ContentEntry, EntryType};
use kartan_geo::Feature;
use tracing::debug;

use crate::catalog::Catalog;

/// Current selection. Read-only outside this module.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    region: Option<Arc<Feature>>,
    municipal: Option<Arc<Feature>>,
    entry: Option<Arc<ContentEntry>>,
    index: usize,
}

impl Selection {
    #[inline]
    pub fn region(&self) -> Option<&Arc<Feature>> {
        self.region.as_ref()
    }

    #[inline]
    pub fn region_code(&self) -> Option<&str> {
        self.region.as_ref().map(|r| r.code.as_str())
    }

    #[inline]
    pub fn municipal(&self) -> Option<&Arc<Feature>> {
        self.municipal.as_ref()
    }

    #[inline]
    pub fn entry(&self) -> Option<&Arc<ContentEntry>> {
        self.entry.as_ref()
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Nothing selected.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.region.is_none()
    }
}

/// Output of [`derive_selection`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Derived {
    pub entry: Option<Arc<ContentEntry>>,
    pub municipal: Option<Arc<Feature>>,
}

/// Resolve the entry and municipality selected by `(region, index)`.
///
/// No region, a region without initiative content, or an index past the end
/// of the region's list all derive to nothing. The municipality is the one
/// whose code equals the entry's `feature_id`, if the geometry has it.
pub fn derive_selection(catalog: &Catalog, region: Option<&Arc<Feature>>, index: usize) -> Derived {
    let Some(region) = region else {
        return Derived::default();
    };
    let Some(entries) = catalog.content.by_region(&region.code) else {
        return Derived::default();
    };
    let Some(entry) = entries.get(index) else {
        return Derived::default();
    };
    Derived {
        municipal: catalog.municipal(&entry.feature_id).cloned(),
        entry: Some(Arc::clone(entry)),
    }
}

/// Result of a region click or region jump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionOutcome {
    /// No region with that code; nothing changed.
    NotFound,
    /// The region was already selected and is now cleared.
    Deselected,
    /// The region is now selected with index 0.
    Selected { has_content: bool },
}

/// Result of a municipality click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MunicipalOutcome {
    /// No region selected, or the region has no initiative content.
    Ignored,
    /// The region's ordered list is empty; the whole selection was cleared.
    Reset,
    /// The municipality has no entries in this region; nothing changed.
    NoEntries,
    /// The index moved to the municipality's first entry.
    Focused { index: usize },
}

/// Result of setting the index directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexOutcome {
    /// No region with content is selected.
    Ignored,
    /// Index committed. `resolved` is false when it is past the end.
    Set { index: usize, resolved: bool },
}

/// Result of jumping to an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpOutcome {
    /// Stale id, or an entry that cannot be placed on the map.
    NotFound,
    /// A region-level entry; its region is selected.
    Region { has_content: bool },
    /// A municipality entry; region and index were set together.
    Entry { index: usize },
}

/// Owner of the selection and its transitions.
#[derive(Debug, Clone, Default)]
pub struct SelectionMachine {
    selection: Selection,
}

impl SelectionMachine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Region click. Clicking the selected region again deselects it.
    pub fn select_region(&mut self, catalog: &Catalog, code: &str) -> RegionOutcome {
        if self.selection.region_code() == Some(code) {
            self.commit(catalog, None, 0);
            debug!(target: "kartan.selection", region = code, "region deselected");
            return RegionOutcome::Deselected;
        }
        self.fresh_region(catalog, code)
    }

    /// Search-driven region selection. Never toggles.
    pub fn jump_to_region(&mut self, catalog: &Catalog, code: &str) -> RegionOutcome {
        self.fresh_region(catalog, code)
    }

    /// Clear everything.
    pub fn back_to_regions(&mut self, catalog: &Catalog) {
        self.commit(catalog, None, 0);
        debug!(target: "kartan.selection", "back to regions");
    }

    /// List click or carousel slide change.
    pub fn set_index(&mut self, catalog: &Catalog, index: usize) -> IndexOutcome {
        let Some(region) = self.region_with_content(catalog) else {
            debug!(target: "kartan.selection", index, "index ignored without content");
            return IndexOutcome::Ignored;
        };
        self.commit(catalog, Some(region), index);
        let resolved = self.selection.entry.is_some();
        debug!(target: "kartan.selection", index, resolved, "index set");
        IndexOutcome::Set { index, resolved }
    }

    /// Municipality polygon click.
    pub fn click_municipal(&mut self, catalog: &Catalog, code: &str) -> MunicipalOutcome {
        let Some(region) = self.region_with_content(catalog) else {
            return MunicipalOutcome::Ignored;
        };
        let Some(entries) = catalog.content.by_region(&region.code) else {
            return MunicipalOutcome::Ignored;
        };
        // Never true for a built index, which stores no empty lists. An empty list resets.
        if entries.is_empty() {
            self.commit(catalog, None, 0);
            debug!(target: "kartan.selection", municipal = code, "empty region list, selection reset");
            return MunicipalOutcome::Reset;
        }
        match entries.first_position(code) {
            Some(index) => {
                self.commit(catalog, Some(region), index);
                debug!(target: "kartan.selection", municipal = code, index, "municipality focused");
                MunicipalOutcome::Focused { index }
            }
            None => {
                debug!(target: "kartan.selection", municipal = code, "municipality has no entries");
                MunicipalOutcome::NoEntries
            }
        }
    }

    /// Jump to an entry by id, setting region and index in one commit.
    pub fn jump_to_entry(&mut self, catalog: &Catalog, entry_id: &str) -> JumpOutcome {
        let Some(entry) = catalog.content.entry(entry_id) else {
            debug!(target: "kartan.selection", entry = entry_id, "jump to unknown entry");
            return JumpOutcome::NotFound;
        };
        match entry.entry_type {
            EntryType::Region => match self.fresh_region(catalog, &entry.feature_id) {
                RegionOutcome::Selected { has_content } => JumpOutcome::Region { has_content },
                _ => JumpOutcome::NotFound,
            },
            EntryType::Municipal => {
                let resolved = entry.region_id.as_deref().and_then(|region_id| {
                    let region = catalog.region(region_id)?;
                    let index = catalog
                        .content
                        .by_region(region_id)?
                        .index_of(&entry.id)?;
                    Some((Arc::clone(region), index))
                });
                let Some((region, index)) = resolved else {
                    debug!(target: "kartan.selection", entry = entry_id, "entry cannot be placed");
                    return JumpOutcome::NotFound;
                };
                debug!(target: "kartan.selection", entry = entry_id, region = %region.code, index, "jump to entry");
                self.commit(catalog, Some(region), index);
                JumpOutcome::Entry { index }
            }
            EntryType::Other(_) => JumpOutcome::NotFound,
        }
    }

    fn fresh_region(&mut self, catalog: &Catalog, code: &str) -> RegionOutcome {
        let Some(region) = catalog.region(code).cloned() else {
            debug!(target: "kartan.selection", region = code, "unknown region");
            return RegionOutcome::NotFound;
        };
        let has_content = catalog.content.has_region_content(code);
        self.commit(catalog, Some(region), 0);
        debug!(target: "kartan.selection", region = code, has_content, "region selected");
        RegionOutcome::Selected { has_content }
    }

    fn region_with_content(&self, catalog: &Catalog) -> Option<Arc<Feature>> {
        self.selection
            .region
            .as_ref()
            .filter(|r| catalog.content.has_region_content(&r.code))
            .cloned()
    }

    fn commit(&mut self, catalog: &Catalog, region: Option<Arc<Feature>>, index: usize) {
        let derived = derive_selection(catalog, region.as_ref(), index);
        self.selection = Selection {
            region,
            municipal: derived.municipal,
            entry: derived.entry,
            index,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixture_catalog;

    fn titles(machine: &SelectionMachine) -> Option<&str> {
        machine.selection().entry().map(|e| e.title.as_str())
    }

    #[test]
    fn stockholm_scenario() {
        let catalog = fixture_catalog();
        let entries = catalog.content.by_region("01").unwrap();
        assert_eq!(entries.position_of("0114", "Alpha"), Some(0));

        let mut m = SelectionMachine::new();
        assert_eq!(
            m.select_region(&catalog, "01"),
            RegionOutcome::Selected { has_content: true }
        );
        assert_eq!(titles(&m), Some("Alpha"));
        assert_eq!(m.set_index(&catalog, 2), IndexOutcome::Set { index: 2, resolved: true });
        assert_eq!(titles(&m), Some("Gamma"));
        assert_eq!(m.selection().municipal().unwrap().code, "0181");
    }

    #[test]
    fn same_region_twice_deselects() {
        let catalog = fixture_catalog();
        let mut m = SelectionMachine::new();
        m.select_region(&catalog, "01");
        m.set_index(&catalog, 1);
        assert_eq!(m.select_region(&catalog, "01"), RegionOutcome::Deselected);
        assert_eq!(m.selection(), &Selection::default());
    }

    #[test]
    fn toggle_applies_to_regions_without_content() {
        let catalog = fixture_catalog();
        let mut m = SelectionMachine::new();
        assert_eq!(
            m.select_region(&catalog, "02"),
            RegionOutcome::Selected { has_content: false }
        );
        assert!(m.selection().entry().is_none());
        assert_eq!(m.select_region(&catalog, "02"), RegionOutcome::Deselected);
    }

    #[test]
    fn switching_region_resets_index() {
        let catalog = fixture_catalog();
        let mut m = SelectionMachine::new();
        m.select_region(&catalog, "01");
        m.set_index(&catalog, 2);
        m.select_region(&catalog, "03");
        assert_eq!(m.selection().index(), 0);
        assert_eq!(m.selection().region_code(), Some("03"));
        assert_eq!(titles(&m), Some("Delta"));
    }

    #[test]
    fn jump_region_never_toggles() {
        let catalog = fixture_catalog();
        let mut m = SelectionMachine::new();
        m.select_region(&catalog, "01");
        assert_eq!(
            m.jump_to_region(&catalog, "01"),
            RegionOutcome::Selected { has_content: true }
        );
        assert_eq!(m.selection().region_code(), Some("01"));
    }

    #[test]
    fn unknown_region_is_a_no_op() {
        let catalog = fixture_catalog();
        let mut m = SelectionMachine::new();
        m.select_region(&catalog, "01");
        let before = m.selection().clone();
        assert_eq!(m.select_region(&catalog, "99"), RegionOutcome::NotFound);
        assert_eq!(m.selection(), &before);
    }

    #[test]
    fn out_of_range_index_derives_nothing() {
        let catalog = fixture_catalog();
        let mut m = SelectionMachine::new();
        m.select_region(&catalog, "01");
        assert_eq!(m.set_index(&catalog, 7), IndexOutcome::Set { index: 7, resolved: false });
        assert!(m.selection().entry().is_none());
        assert!(m.selection().municipal().is_none());
        assert_eq!(m.selection().region_code(), Some("01"));
    }

    #[test]
    fn set_index_needs_content() {
        let catalog = fixture_catalog();
        let mut m = SelectionMachine::new();
        assert_eq!(m.set_index(&catalog, 1), IndexOutcome::Ignored);
        m.select_region(&catalog, "02");
        assert_eq!(m.set_index(&catalog, 1), IndexOutcome::Ignored);
        assert_eq!(m.selection().index(), 0);
    }

    #[test]
    fn municipal_click_outcomes() {
        let catalog = fixture_catalog();
        let mut m = SelectionMachine::new();
        assert_eq!(m.click_municipal(&catalog, "0181"), MunicipalOutcome::Ignored);
        m.select_region(&catalog, "01");
        assert_eq!(m.click_municipal(&catalog, "0181"), MunicipalOutcome::Focused { index: 2 });
        assert_eq!(titles(&m), Some("Gamma"));
        let before = m.selection().clone();
        assert_eq!(m.click_municipal(&catalog, "0115"), MunicipalOutcome::NoEntries);
        assert_eq!(m.selection(), &before);
    }

    #[test]
    fn jump_to_entry_commits_region_and_index_together() {
        let catalog = fixture_catalog();
        let mut m = SelectionMachine::new();
        m.select_region(&catalog, "03");
        assert_eq!(m.jump_to_entry(&catalog, "m-gamma"), JumpOutcome::Entry { index: 2 });
        let s = m.selection();
        assert_eq!(s.region_code(), Some("01"));
        assert_eq!(s.entry().unwrap().id, "m-gamma");
        assert_eq!(s.municipal().unwrap().code, "0181");
    }

    #[test]
    fn jump_lands_on_the_requested_entry_among_equal_titles() {
        use crate::catalog::MainText;
        use crate::testing::rect_feature;
        use kartan_content::{ContentEntry, ContentFeed};
        use kartan_geo::{FeatureCollection, FeatureKind};

        let regions = FeatureCollection::from_features(
            FeatureKind::Region,
            [rect_feature(FeatureKind::Region, "01", "Stockholms", 0.0, 0.0, 10.0)],
        );
        let municipals = FeatureCollection::from_features(
            FeatureKind::Municipality,
            [rect_feature(FeatureKind::Municipality, "0180", "Stockholm", 4.0, 1.0, 2.0)],
        );
        let feed = ContentFeed::from_entries([
            ContentEntry::municipal("a", "0180", "01", "Samma"),
            ContentEntry::municipal("b", "0180", "01", "Samma"),
        ]);
        let catalog = Catalog::build(regions, municipals, feed, MainText::default()).unwrap();

        let mut m = SelectionMachine::new();
        assert_eq!(m.jump_to_entry(&catalog, "b"), JumpOutcome::Entry { index: 1 });
        assert_eq!(m.selection().entry().unwrap().id, "b");
        assert_eq!(m.jump_to_entry(&catalog, "a"), JumpOutcome::Entry { index: 0 });
        assert_eq!(m.selection().entry().unwrap().id, "a");
        assert_eq!(m.selection().municipal().unwrap().code, "0180");
    }

    #[test]
    fn jump_to_region_entry_and_stale_ids() {
        let catalog = fixture_catalog();
        let mut m = SelectionMachine::new();
        assert_eq!(
            m.jump_to_entry(&catalog, "r-uppsala"),
            JumpOutcome::Region { has_content: true }
        );
        assert_eq!(m.selection().region_code(), Some("03"));
        let before = m.selection().clone();
        assert_eq!(m.jump_to_entry(&catalog, "missing"), JumpOutcome::NotFound);
        assert_eq!(m.selection(), &before);
    }

    #[test]
    fn derive_is_pure() {
        let catalog = fixture_catalog();
        let region = catalog.region("01").cloned();
        let a = derive_selection(&catalog, region.as_ref(), 1);
        let b = derive_selection(&catalog, region.as_ref(), 1);
        assert_eq!(a, b);
        assert_eq!(a.entry.unwrap().title, "Beta");
        assert_eq!(derive_selection(&catalog, None, 0), Derived::default());
    }
}
