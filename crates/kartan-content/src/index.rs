#![forbid(unsafe_code)]

//! Content index.
//!
//! Built in two passes over the feed:
//!
//! 1. group every entry by `(type, feature_id)`, and municipal entries also by
//!    `region_id`;
//! 2. per region, stable-sort the municipal entries by title and record where
//!    each `(feature_id, title)` pair first appears.
//!
//! [`RegionEntries`] is immutable once built, so the position lookup always
//! agrees with `ordered`.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;
use web_time::Instant;

use crate::entry::{ContentEntry, EntryType};
use crate::feed::ContentFeed;

/// Title-ordered municipal entries of one region.
#[derive(Debug, Clone, Default)]
pub struct RegionEntries {
    ordered: Vec<Arc<ContentEntry>>,
    /// feature id -> title -> last index in `ordered`.
    positions: HashMap<String, HashMap<String, usize>>,
    /// feature id -> lowest index in `ordered`.
    first: HashMap<String, usize>,
}

impl RegionEntries {
    fn build(mut entries: Vec<Arc<ContentEntry>>) -> Self {
        entries.sort_by_cached_key(|e| kartan_text::sort_key(&e.title));

        let mut positions: HashMap<String, HashMap<String, usize>> = HashMap::new();
        let mut first = HashMap::new();
        for (index, entry) in entries.iter().enumerate() {
            positions
                .entry(entry.feature_id.clone())
                .or_default()
                .insert(entry.title.clone(), index);
            first.entry(entry.feature_id.clone()).or_insert(index);
        }

        Self {
            ordered: entries,
            positions,
            first,
        }
    }

    #[inline]
    pub fn ordered(&self) -> &[Arc<ContentEntry>] {
        &self.ordered
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Arc<ContentEntry>> {
        self.ordered.get(index)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Index of the last entry with this feature and title.
    pub fn position_of(&self, feature_id: &str, title: &str) -> Option<usize> {
        self.positions.get(feature_id)?.get(title).copied()
    }

    /// Index of the entry with this id.
    pub fn index_of(&self, entry_id: &str) -> Option<usize> {
        self.ordered.iter().position(|e| e.id == entry_id)
    }

    /// Lowest index of any entry for `feature_id`.
    pub fn first_position(&self, feature_id: &str) -> Option<usize> {
        self.first.get(feature_id).copied()
    }
}

/// Entries grouped for the map.
#[derive(Debug, Clone, Default)]
pub struct ContentIndex {
    region: HashMap<String, Vec<Arc<ContentEntry>>>,
    municipal: HashMap<String, Vec<Arc<ContentEntry>>>,
    by_region: HashMap<String, RegionEntries>,
    by_id: HashMap<String, Arc<ContentEntry>>,
    by_title: Vec<Arc<ContentEntry>>,
}

impl ContentIndex {
    pub fn build(feed: &ContentFeed) -> Self {
        let start = Instant::now();
        let mut region: HashMap<String, Vec<Arc<ContentEntry>>> = HashMap::new();
        let mut municipal: HashMap<String, Vec<Arc<ContentEntry>>> = HashMap::new();
        let mut grouped: HashMap<String, Vec<Arc<ContentEntry>>> = HashMap::new();
        let mut by_id = HashMap::new();
        let mut skipped = 0usize;

        for entry in feed.iter() {
            match &entry.entry_type {
                EntryType::Region => {
                    region
                        .entry(entry.feature_id.clone())
                        .or_default()
                        .push(Arc::clone(entry));
                }
                EntryType::Municipal => {
                    municipal
                        .entry(entry.feature_id.clone())
                        .or_default()
                        .push(Arc::clone(entry));
                    match &entry.region_id {
                        Some(region_id) => grouped
                            .entry(region_id.clone())
                            .or_default()
                            .push(Arc::clone(entry)),
                        None => {
                            debug!(target: "kartan.content", id = %entry.id, "municipal entry without region_id");
                        }
                    }
                }
                EntryType::Other(kind) => {
                    debug!(target: "kartan.content", id = %entry.id, kind = %kind, "skipping entry of unknown type");
                    skipped += 1;
                    continue;
                }
            }
            by_id
                .entry(entry.id.clone())
                .or_insert_with(|| Arc::clone(entry));
        }

        let by_region: HashMap<String, RegionEntries> = grouped
            .into_iter()
            .map(|(code, entries)| (code, RegionEntries::build(entries)))
            .collect();

        let mut by_title: Vec<Arc<ContentEntry>> = feed
            .iter()
            .filter(|e| !matches!(e.entry_type, EntryType::Other(_)))
            .cloned()
            .collect();
        by_title.sort_by_cached_key(|e| kartan_text::sort_key(&e.title));

        debug!(
            target: "kartan.content",
            entries = feed.len(),
            skipped,
            regions_with_content = by_region.len(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "content index built"
        );

        Self {
            region,
            municipal,
            by_region,
            by_id,
            by_title,
        }
    }

    /// Region-level entries for a region code.
    pub fn region_entries(&self, feature_id: &str) -> &[Arc<ContentEntry>] {
        self.region.get(feature_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Entries attached to one municipality, in feed order.
    pub fn municipal_entries(&self, feature_id: &str) -> &[Arc<ContentEntry>] {
        self.municipal
            .get(feature_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Title-ordered municipal entries of a region. `None` means the region
    /// has no initiative content.
    pub fn by_region(&self, region_code: &str) -> Option<&RegionEntries> {
        self.by_region.get(region_code)
    }

    #[inline]
    pub fn has_region_content(&self, region_code: &str) -> bool {
        self.by_region.contains_key(region_code)
    }

    /// Indexed entry by id (first occurrence).
    pub fn entry(&self, id: &str) -> Option<&Arc<ContentEntry>> {
        self.by_id.get(id)
    }

    /// Every indexed entry sorted by title.
    pub fn by_title(&self) -> &[Arc<ContentEntry>] {
        &self.by_title
    }

    /// Region codes that have `by_region` content.
    pub fn regions_with_content(&self) -> impl Iterator<Item = &str> {
        self.by_region.keys().map(String::as_str)
    }
}
