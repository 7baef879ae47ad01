#![forbid(unsafe_code)]

//! Kartan Runtime
//!
//! Selection state, view resolution, and the Elm-style program that ties
//! them to a host.
//!
//! # Key Components
//!
//! - [`Program`] - host-driven runtime: push messages, step, drain effects
//! - [`Model`] / [`Cmd`] - application trait and its command tree
//! - [`Catalog`] - geometry, content, and both indexes for one data load
//! - [`SelectionMachine`] - region/municipality/entry transitions
//! - [`ViewMode`] - what the panels show for a selection
//! - [`MapApp`] - the complete map application model
//!
//! # Role in Kartan
//! `kartan-runtime` is where state lives. It consumes the immutable indexes
//! from `kartan-geo` and `kartan-content`, and emits [`Effect`]s for the
//! things only a host can do: fetching data, sending mail, showing toasts,
//! animating the map.
//!
//! # How it fits in the system
//! The runtime never performs I/O. `kartan-web` drives it from a browser
//! shell; tests drive it directly.

pub mod app;
pub mod carousel;
pub mod catalog;
pub mod config;
pub mod effect;
pub mod form;
pub mod menu;
pub mod overlay;
pub mod paint;
pub mod program;
pub mod selection;
pub mod view_mode;

#[cfg(test)]
mod testing;

pub use app::{AppView, LoadState, MapApp, Msg, ReadyView};
pub use catalog::{Catalog, CatalogError, MainText};
pub use config::{ConfigError, KartanConfig};
pub use effect::{Effect, Toast, ToastKind};
pub use form::{FormError, FormField, InitiativeForm, Submission};
pub use menu::{MenuMsg, MenuPage, MenuState};
pub use overlay::{Overlay, Overlays, SearchKind, SearchState};
pub use program::{Cmd, Model, Program, StepResult};
pub use selection::{
    Derived, IndexOutcome, JumpOutcome, MunicipalOutcome, RegionOutcome, Selection,
    SelectionMachine, derive_selection,
};
pub use view_mode::ViewMode;
