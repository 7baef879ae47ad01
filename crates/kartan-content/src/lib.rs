#![forbid(unsafe_code)]

//! Kartan content.
//!
//! Editorial "initiative" entries tied to regions and municipalities, and the
//! index that groups them for the map.
//!
//! # Key Components
//!
//! - [`ContentEntry`] - one entry, shared as `Arc<ContentEntry>`
//! - [`ContentFeed`] - the feed normalized to a list in a stable order
//! - [`ContentIndex`] - entries by feature and title-ordered lists per region
//!
//! # Role in Kartan
//! The content index is the second half of the catalog `kartan-runtime`
//! builds on every data load. Selection reads `RegionEntries::ordered` by
//! index, so the order computed here is the order the visitor pages through.

pub mod entry;
pub mod feed;
pub mod index;

pub use entry::{ContentEntry, EntryType};
pub use feed::{ContentFeed, FeedError};
pub use index::{ContentIndex, RegionEntries};
