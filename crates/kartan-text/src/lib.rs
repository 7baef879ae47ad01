#![forbid(unsafe_code)]

//! Text utilities for Kartan.
//!
//! # Role in Kartan
//! Region, municipality and initiative names are Swedish. Every list the map
//! shows (municipalities inside a region, the initiative carousel, the search
//! listings) is ordered with [`collate`], so `Örebro` sorts after `Västerås`
//! instead of next to `Orsa`.
//!
//! # How it fits in the system
//! `kartan-geo` and `kartan-content` use the collation when they build their
//! indexes. Presentation code uses [`sanitize`] before turning contact
//! fields into `mailto:`/`tel:` links, and [`display`] for short labels.
//! The crate depends on nothing else in the workspace.

pub mod collate;
pub mod display;
pub mod sanitize;

pub use collate::{CollationKey, compare, sort_key};
