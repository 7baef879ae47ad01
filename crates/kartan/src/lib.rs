#![forbid(unsafe_code)]

//! Kartan public facade crate.
//!
//! Kartan is an interactive map of Swedish regions (län) and municipalities
//! (kommuner) listing the initiatives published for each. This crate
//! re-exports the common types of the member crates, owns the unified
//! [`Error`], and offers a prelude for hosts.
//!
//! ```
//! use kartan::prelude::*;
//!
//! let mut session = WebSession::new(KartanConfig::default());
//! let out = session.init();
//! assert!(matches!(out.requests.as_slice(), [HostRequest::FetchData { .. }]));
//! ```

pub mod error;
#[cfg(feature = "tracing-subscriber")]
pub mod logging;

// --- Geometry re-exports ---------------------------------------------------

pub use kartan_geo::{
    Bounds, ContainmentIndex, Feature, FeatureCollection, FeatureKind, FitProjection, GeoError,
    Viewport, ZoomTransform,
};

// --- Content re-exports ----------------------------------------------------

pub use kartan_content::{ContentEntry, ContentFeed, ContentIndex, EntryType, FeedError};

// --- Runtime re-exports ----------------------------------------------------

pub use kartan_runtime::{
    AppView, Catalog, CatalogError, ConfigError, Effect, FormError, FormField, KartanConfig,
    MapApp, MenuMsg, MenuPage, Msg, Overlay, Program, Selection, SelectionMachine, Toast,
    ToastKind, ViewMode,
};

// --- Web re-exports --------------------------------------------------------

pub use kartan_web::{
    HostRequest, LoadError, MailError, MailRequest, Notification, NotificationQueue, QueueAction,
    SessionStep, WebSession,
};

// --- Errors ---------------------------------------------------------------

pub use error::{DegradationAction, Error, Result};

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        AppView, Error, HostRequest, KartanConfig, Msg, Overlay, Result, SessionStep, ViewMode,
        Viewport, WebSession,
    };

    pub use crate::{content, geo, runtime, text, web};
}

pub use kartan_content as content;
pub use kartan_geo as geo;
pub use kartan_runtime as runtime;
pub use kartan_text as text;
pub use kartan_web as web;
