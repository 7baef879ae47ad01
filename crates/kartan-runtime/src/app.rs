#![forbid(unsafe_code)]

//! The map application as a [`Model`].
//!
//! [`MapApp`] owns every piece of UI state: load state, selection, drawers,
//! search, menu, form, and the map transforms. Hosts drive it through
//! [`Msg`] and read [`AppView`] snapshots.

use std::sync::Arc;

use kartan_geo::{FitProjection, Viewport, ZoomTransform};
use tracing::{debug, info, warn};

use crate::carousel::{self, DotWindow, ListPager};
use crate::catalog::Catalog;
use crate::config::KartanConfig;
use crate::effect::{Effect, Toast, ToastKind};
use crate::form::{FormError, FormField, InitiativeForm};
use crate::menu::{Crumb, MenuMsg, MenuPage, MenuState};
use crate::overlay::{Overlay, Overlays, SearchKind, SearchListing, SearchState};
use crate::paint::PaintLayers;
use crate::program::{Cmd, Model};
use crate::selection::{JumpOutcome, MunicipalOutcome, RegionOutcome, Selection, SelectionMachine};
use crate::view_mode::ViewMode;

/// Tag shared by the toasts of one mail submission.
pub const SUBMISSION_TAG: &str = "submission";

const MSG_SENDING: &str = "Skickar...";
const MSG_SENT: &str = "Formuläret skickades framgångsrikt.";
const MSG_SEND_FAILED: &str = "Ett fel inträffade vid försök att skicka formuläret.";
const MSG_FORM_INVALID: &str = "Fyll i alla fält korrekt.";

/// Everything a host or the runtime can tell the app.
#[derive(Debug, Clone)]
pub enum Msg {
    /// The data fetch finished and decoded.
    DataLoaded(Arc<Catalog>),
    /// The data fetch failed. Terminal.
    LoadFailed { reason: String },
    /// Map container size changed.
    Resized(Viewport),
    /// Height of the open bottom drawer, in pixels.
    DrawerResized(f64),
    RegionClicked(String),
    MunicipalClicked(String),
    /// List item click or carousel slide change.
    IndexSelected(usize),
    PrevSlide,
    NextSlide,
    /// Click on the map outside every region.
    BackgroundClicked,
    BackToRegions,
    SearchToggled(SearchKind),
    SearchRegionPicked(String),
    SearchEntryPicked(String),
    OverlayOpened(Overlay),
    OverlayClosed(Overlay),
    Menu(MenuMsg),
    /// "Lägg till initiativ" on a panel or drawer.
    AddInitiative,
    ZoomIn,
    ZoomOut,
    FormInput(FormField, String),
    FormSubmitted,
    MailSent,
    MailFailed { reason: String },
}

impl Msg {
    /// Label for tracing.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::DataLoaded(_) => "data_loaded",
            Self::LoadFailed { .. } => "load_failed",
            Self::Resized(_) => "resized",
            Self::DrawerResized(_) => "drawer_resized",
            Self::RegionClicked(_) => "region_clicked",
            Self::MunicipalClicked(_) => "municipal_clicked",
            Self::IndexSelected(_) => "index_selected",
            Self::PrevSlide => "prev_slide",
            Self::NextSlide => "next_slide",
            Self::BackgroundClicked => "background_clicked",
            Self::BackToRegions => "back_to_regions",
            Self::SearchToggled(_) => "search_toggled",
            Self::SearchRegionPicked(_) => "search_region_picked",
            Self::SearchEntryPicked(_) => "search_entry_picked",
            Self::OverlayOpened(_) => "overlay_opened",
            Self::OverlayClosed(_) => "overlay_closed",
            Self::Menu(_) => "menu",
            Self::AddInitiative => "add_initiative",
            Self::ZoomIn => "zoom_in",
            Self::ZoomOut => "zoom_out",
            Self::FormInput(..) => "form_input",
            Self::FormSubmitted => "form_submitted",
            Self::MailSent => "mail_sent",
            Self::MailFailed { .. } => "mail_failed",
        }
    }
}

/// Data load lifecycle. `Failed` is terminal.
#[derive(Debug, Clone)]
pub enum LoadState {
    Loading,
    Failed { reason: String },
    Ready(Arc<Catalog>),
}

/// Snapshot handed to the host.
#[derive(Debug, Clone)]
pub enum AppView {
    Loading,
    Failed { reason: String },
    Ready(Box<ReadyView>),
}

impl AppView {
    pub fn ready(&self) -> Option<&ReadyView> {
        match self {
            Self::Ready(view) => Some(&**view),
            _ => None,
        }
    }
}

/// Everything a renderer needs once data is loaded.
#[derive(Debug, Clone)]
pub struct ReadyView {
    pub mode: ViewMode,
    pub selection: Selection,
    pub overlays: Overlays,
    pub search: SearchState,
    /// Rows of the search surface while it is visible.
    pub search_listing: Option<SearchListing>,
    pub menu: MenuState,
    pub breadcrumbs: Vec<Crumb>,
    /// Carousel dots; `None` without a carousel or with a single slide.
    pub dots: Option<DotWindow>,
    /// Page of the vertical list that holds the current index.
    pub list_page: usize,
    pub paint: PaintLayers,
    pub projection: Option<FitProjection>,
    pub zoom: ZoomTransform,
    pub is_mobile: bool,
    pub form_submitting: bool,
}

/// The map application model.
#[derive(Debug, Clone)]
pub struct MapApp {
    config: KartanConfig,
    load: LoadState,
    selection: SelectionMachine,
    overlays: Overlays,
    search: SearchState,
    menu: MenuState,
    form: InitiativeForm,
    viewport: Viewport,
    drawer_height: f64,
    projection: Option<FitProjection>,
    zoom: ZoomTransform,
}

impl MapApp {
    #[must_use]
    pub fn new(config: KartanConfig) -> Self {
        Self {
            config,
            load: LoadState::Loading,
            selection: SelectionMachine::new(),
            overlays: Overlays::default(),
            search: SearchState::default(),
            menu: MenuState::new(),
            form: InitiativeForm::new(),
            viewport: Viewport::default(),
            drawer_height: 0.0,
            projection: None,
            zoom: ZoomTransform::IDENTITY,
        }
    }

    #[inline]
    pub fn config(&self) -> &KartanConfig {
        &self.config
    }

    #[inline]
    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    #[inline]
    pub fn selection(&self) -> &Selection {
        self.selection.selection()
    }

    #[inline]
    pub fn overlays(&self) -> &Overlays {
        &self.overlays
    }

    #[inline]
    pub fn menu(&self) -> &MenuState {
        &self.menu
    }

    #[inline]
    pub fn form(&self) -> &InitiativeForm {
        &self.form
    }

    #[inline]
    pub fn zoom(&self) -> ZoomTransform {
        self.zoom
    }

    /// Below the mobile breakpoint, clicks also open the detail drawer.
    pub fn is_mobile(&self) -> bool {
        self.viewport.width < f64::from(self.config.map.mobile_breakpoint)
    }

    fn catalog(&self) -> Option<Arc<Catalog>> {
        match &self.load {
            LoadState::Ready(catalog) => Some(Arc::clone(catalog)),
            _ => None,
        }
    }

    fn on_loaded(&mut self, catalog: Arc<Catalog>) -> Cmd<Msg> {
        if !matches!(self.load, LoadState::Loading) {
            debug!(target: "kartan.app", "late data load ignored");
            return Cmd::none();
        }
        info!(
            target: "kartan.app",
            regions = catalog.regions.len(),
            entries = catalog.feed.len(),
            "data loaded"
        );
        self.load = LoadState::Ready(catalog);
        self.refit()
    }

    fn on_load_failed(&mut self, reason: String) -> Cmd<Msg> {
        if !matches!(self.load, LoadState::Loading) {
            return Cmd::none();
        }
        warn!(target: "kartan.app", reason = %reason, "data load failed");
        self.load = LoadState::Failed { reason };
        Cmd::none()
    }

    /// Recompute the fit projection and the focus transform.
    fn refit(&mut self) -> Cmd<Msg> {
        let Some(catalog) = self.catalog() else {
            return Cmd::none();
        };
        self.projection = (self.viewport.width > 0.0 && self.viewport.height > 0.0).then(|| {
            FitProjection::fit(
                catalog.regions.bounds(),
                self.viewport,
                self.config.map.padding,
                self.config.map.stretch_y,
            )
        });
        self.refocus(&catalog)
    }

    /// Where the map should be for the current selection. `None` leaves it
    /// where it is.
    fn focus_target(&self, catalog: &Catalog) -> Option<ZoomTransform> {
        let projection = self.projection?;
        let selection = self.selection.selection();
        let Some(region) = selection.region() else {
            return Some(ZoomTransform::IDENTITY);
        };
        if !catalog.content.has_region_content(&region.code) {
            return None;
        }
        let bounds = projection.project_bounds(region.geometry.bounds());
        match selection.municipal().and_then(|m| m.geometry.centroid()) {
            Some(centroid) => {
                let drawer = if self.overlays.detail {
                    self.drawer_height
                } else {
                    0.0
                };
                Some(ZoomTransform::focus_point(
                    bounds,
                    projection.project(centroid),
                    self.viewport,
                    drawer,
                ))
            }
            None => Some(ZoomTransform::focus_bounds(bounds, self.viewport)),
        }
    }

    fn refocus(&mut self, catalog: &Catalog) -> Cmd<Msg> {
        match self.focus_target(catalog) {
            Some(target) if target != self.zoom => {
                self.zoom = target;
                Cmd::effect(Effect::Zoom(target))
            }
            _ => Cmd::none(),
        }
    }

    /// Bookkeeping after any selection transition.
    fn settle(&mut self, catalog: &Catalog, before: Option<String>) -> Cmd<Msg> {
        let selection = self.selection.selection();
        let entered = selection.region_code() != before.as_deref();
        let lacks_content = selection
            .region()
            .is_some_and(|r| !catalog.content.has_region_content(&r.code));
        if entered && lacks_content {
            self.overlays.open(Overlay::Info);
        }
        debug!(
            target: "kartan.selection",
            region = selection.region_code().unwrap_or("-"),
            index = selection.index(),
            entry = selection.entry().map_or("-", |e| e.id.as_str()),
            "selection settled"
        );
        self.refocus(catalog)
    }

    fn region_clicked(&mut self, catalog: &Catalog, code: &str) -> Cmd<Msg> {
        let before = self.selection().region_code().map(str::to_owned);
        let outcome = self.selection.select_region(catalog, code);
        if outcome == RegionOutcome::NotFound {
            return Cmd::none();
        }
        if self.is_mobile() && outcome == (RegionOutcome::Selected { has_content: true }) {
            self.overlays.open(Overlay::Detail);
        }
        self.settle(catalog, before)
    }

    fn municipal_clicked(&mut self, catalog: &Catalog, code: &str) -> Cmd<Msg> {
        let before = self.selection().region_code().map(str::to_owned);
        match self.selection.click_municipal(catalog, code) {
            MunicipalOutcome::Ignored | MunicipalOutcome::NoEntries => Cmd::none(),
            MunicipalOutcome::Reset => self.settle(catalog, before),
            MunicipalOutcome::Focused { .. } => {
                if self.is_mobile() {
                    self.overlays.open(Overlay::Detail);
                }
                self.settle(catalog, before)
            }
        }
    }

    fn set_index(&mut self, catalog: &Catalog, index: usize) -> Cmd<Msg> {
        let before = self.selection().region_code().map(str::to_owned);
        self.selection.set_index(catalog, index);
        self.settle(catalog, before)
    }

    fn slide_count(&self, catalog: &Catalog) -> usize {
        self.selection()
            .region_code()
            .and_then(|code| catalog.content.by_region(code))
            .map_or(0, |list| list.len())
    }

    fn back_to_regions(&mut self, catalog: &Catalog) -> Cmd<Msg> {
        let before = self.selection().region_code().map(str::to_owned);
        self.selection.back_to_regions(catalog);
        self.settle(catalog, before)
    }

    fn search_picked(&mut self, catalog: &Catalog, pick: SearchPick<'_>) -> Cmd<Msg> {
        let before = self.selection().region_code().map(str::to_owned);
        let found = match pick {
            SearchPick::Region(code) => {
                self.selection.jump_to_region(catalog, code) != RegionOutcome::NotFound
            }
            SearchPick::Entry(id) => {
                self.selection.jump_to_entry(catalog, id) != JumpOutcome::NotFound
            }
        };
        if !found {
            return Cmd::none();
        }
        self.search.close();
        self.overlays.close(Overlay::AllListing);
        self.overlays.open(Overlay::Detail);
        self.settle(catalog, before)
    }

    fn overlay_closed(&mut self, catalog: Option<&Catalog>, overlay: Overlay) -> Cmd<Msg> {
        self.overlays.close(overlay);
        match catalog {
            Some(catalog) if overlay == Overlay::Detail && self.is_mobile() => {
                self.back_to_regions(catalog)
            }
            Some(catalog) if overlay == Overlay::Detail => self.refocus(catalog),
            _ => Cmd::none(),
        }
    }

    fn zoom_step(&mut self, factor: f64) -> Cmd<Msg> {
        if self.projection.is_none() {
            return Cmd::none();
        }
        let next = self.zoom.zoom_by(factor, self.viewport);
        if next == self.zoom {
            return Cmd::none();
        }
        self.zoom = next;
        Cmd::effect(Effect::Zoom(next))
    }

    fn submit(&mut self) -> Cmd<Msg> {
        match self.form.begin_submit() {
            Ok(submission) => Cmd::batch(vec![
                Cmd::effect(Effect::Toast(
                    Toast::new(ToastKind::Loading, MSG_SENDING).tagged(SUBMISSION_TAG),
                )),
                Cmd::effect(Effect::SendMail(submission)),
            ]),
            Err(FormError::InFlight) => Cmd::log("submit ignored while sending"),
            Err(err) => {
                debug!(target: "kartan.app", error = %err, "form rejected");
                Cmd::effect(Effect::toast(ToastKind::Error, MSG_FORM_INVALID))
            }
        }
    }

    fn mail_finished(&mut self, result: Result<(), String>) -> Cmd<Msg> {
        if !self.form.is_submitting() {
            return Cmd::none();
        }
        self.form.finish_submit();
        let toast = match result {
            Ok(()) => Toast::new(ToastKind::Success, MSG_SENT),
            Err(reason) => {
                warn!(target: "kartan.app", reason = %reason, "mail send failed");
                Toast::new(ToastKind::Error, MSG_SEND_FAILED)
            }
        };
        Cmd::effect(Effect::Toast(toast.tagged(SUBMISSION_TAG)))
    }

    fn ready_view(&self, catalog: &Catalog) -> ReadyView {
        let selection = self.selection.selection().clone();
        let mode = ViewMode::resolve(catalog, &selection);
        let dots = match &mode {
            ViewMode::Carousel { entries, index, .. }
            | ViewMode::MunicipalDetail { entries, index, .. } => {
                DotWindow::compute(*index, entries.len(), self.config.panels.dots_in_view)
            }
            _ => None,
        };
        ReadyView {
            paint: PaintLayers::compute(catalog, &selection),
            list_page: ListPager::new(self.config.panels.page_limit).page_of(selection.index()),
            search_listing: self
                .search
                .showing()
                .map(|kind| SearchListing::build(catalog, kind)),
            mode,
            selection,
            overlays: self.overlays,
            search: self.search,
            menu: self.menu,
            breadcrumbs: self.menu.breadcrumbs(),
            dots,
            projection: self.projection,
            zoom: self.zoom,
            is_mobile: self.is_mobile(),
            form_submitting: self.form.is_submitting(),
        }
    }
}

enum SearchPick<'a> {
    Region(&'a str),
    Entry(&'a str),
}

impl Default for MapApp {
    fn default() -> Self {
        Self::new(KartanConfig::default())
    }
}

impl Model for MapApp {
    type Message = Msg;
    type View = AppView;

    fn init(&mut self) -> Cmd<Msg> {
        Cmd::effect(Effect::FetchData)
    }

    fn update(&mut self, msg: Msg) -> Cmd<Msg> {
        debug!(target: "kartan.app", msg = msg.name(), "update");
        let catalog = self.catalog();
        match msg {
            Msg::DataLoaded(loaded) => self.on_loaded(loaded),
            Msg::LoadFailed { reason } => self.on_load_failed(reason),
            Msg::Resized(viewport) => {
                self.viewport = viewport.clamped();
                self.refit()
            }
            Msg::DrawerResized(height) => {
                self.drawer_height = if height.is_finite() { height.max(0.0) } else { 0.0 };
                match catalog {
                    Some(catalog) => self.refocus(&catalog),
                    None => Cmd::none(),
                }
            }
            Msg::Menu(menu_msg) => {
                self.menu.update(menu_msg);
                Cmd::none()
            }
            Msg::AddInitiative => {
                self.menu.update(MenuMsg::OpenPage(MenuPage::AddInitiative));
                self.overlays.close(Overlay::Info);
                self.overlays.close(Overlay::AllListing);
                Cmd::none()
            }
            Msg::FormInput(field, value) => {
                self.form.set(field, value);
                Cmd::none()
            }
            Msg::FormSubmitted => self.submit(),
            Msg::MailSent => self.mail_finished(Ok(())),
            Msg::MailFailed { reason } => self.mail_finished(Err(reason)),
            Msg::SearchToggled(kind) => {
                self.search.toggle(kind);
                Cmd::none()
            }
            Msg::OverlayOpened(overlay) => {
                self.overlays.open(overlay);
                match catalog {
                    Some(catalog) if overlay == Overlay::Detail => self.refocus(&catalog),
                    _ => Cmd::none(),
                }
            }
            Msg::OverlayClosed(overlay) => self.overlay_closed(catalog.as_deref(), overlay),
            Msg::ZoomIn => self.zoom_step(self.config.map.zoom_step),
            Msg::ZoomOut => self.zoom_step(1.0 / self.config.map.zoom_step),
            selection_msg => {
                let Some(catalog) = catalog else {
                    debug!(target: "kartan.app", msg = selection_msg.name(), "ignored before data load");
                    return Cmd::none();
                };
                match selection_msg {
                    Msg::RegionClicked(code) => self.region_clicked(&catalog, &code),
                    Msg::MunicipalClicked(code) => self.municipal_clicked(&catalog, &code),
                    Msg::IndexSelected(index) => self.set_index(&catalog, index),
                    Msg::PrevSlide => {
                        let index = carousel::prev(self.selection().index());
                        self.set_index(&catalog, index)
                    }
                    Msg::NextSlide => {
                        let total = self.slide_count(&catalog);
                        let index = carousel::next(self.selection().index(), total);
                        self.set_index(&catalog, index)
                    }
                    Msg::BackgroundClicked | Msg::BackToRegions => self.back_to_regions(&catalog),
                    Msg::SearchRegionPicked(code) => {
                        self.search_picked(&catalog, SearchPick::Region(&code))
                    }
                    Msg::SearchEntryPicked(id) => {
                        self.search_picked(&catalog, SearchPick::Entry(&id))
                    }
                    _ => Cmd::none(),
                }
            }
        }
    }

    fn view(&self) -> AppView {
        match &self.load {
            LoadState::Loading => AppView::Loading,
            LoadState::Failed { reason } => AppView::Failed {
                reason: reason.clone(),
            },
            LoadState::Ready(catalog) => AppView::Ready(Box::new(self.ready_view(catalog))),
        }
    }
}
