//! Application state managed via Dioxus context.
//!
//! `AppState` bundles all reactive signals into a single struct provided via
//! `use_context_provider`. Child components retrieve it with `use_context::<AppState>()`.

use campo_core::catalog::Catalog;
use campo_core::fetch::{BatchState, ComparisonData, Generation, RegionSeries};
use campo_core::filters::{CampaignFilters, FilterDraft};
use campo_core::session::Session;
use dioxus::prelude::*;

/// Which auth form a logged-out user is looking at.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub enum AuthView {
    #[default]
    Login,
    Register,
}

/// Shared application state for the campaign dashboard.
#[derive(Clone, Copy)]
pub struct AppState {
    /// Signed-in user, empty when logged out
    pub session: Signal<Session>,
    pub auth_view: Signal<AuthView>,
    /// Crops and places for the filter selects
    pub catalog: Signal<Catalog>,
    pub catalog_loading: Signal<bool>,
    pub catalog_error: Signal<Option<String>>,
    /// Filter form as edited
    pub draft: Signal<FilterDraft>,
    /// Filters as last submitted; the fetch effects read these
    pub filters: Signal<CampaignFilters>,
    /// Region charts batch (campaign series for both locations)
    pub region: Signal<BatchState<RegionSeries>>,
    pub region_generation: Signal<Generation>,
    /// Comparison batch (losses and averages for both locations)
    pub comparison: Signal<BatchState<ComparisonData>>,
    pub comparison_generation: Signal<Generation>,
    /// Location slot shown in the comparison table (0 or 1)
    pub active_location: Signal<usize>,
    /// Bumped to run both batches again with the same filters
    pub reload: Signal<u32>,
}

impl AppState {
    /// Create a new AppState with default signal values.
    pub fn new() -> Self {
        Self {
            session: Signal::new(Session::default()),
            auth_view: Signal::new(AuthView::Login),
            catalog: Signal::new(Catalog::default()),
            catalog_loading: Signal::new(false),
            catalog_error: Signal::new(None),
            draft: Signal::new(FilterDraft::default()),
            filters: Signal::new(CampaignFilters::default()),
            region: Signal::new(BatchState::default()),
            region_generation: Signal::new(Generation::default()),
            comparison: Signal::new(BatchState::default()),
            comparison_generation: Signal::new(Generation::default()),
            active_location: Signal::new(0),
            reload: Signal::new(0),
        }
    }

    /// Drop everything tied to the signed-in user.
    pub fn sign_out(&mut self) {
        self.session.set(Session::default());
        self.catalog.set(Catalog::default());
        self.draft.set(FilterDraft::default());
        self.filters.set(CampaignFilters::default());
        self.region.write().reset();
        self.comparison.write().reset();
        self.active_location.set(0);
    }

    /// Fetch again without touching the filters, after a failed batch.
    pub fn retry(&mut self) {
        let mut reload = self.reload.write();
        *reload = reload.wrapping_add(1);
        log::info!("retrying batches ({})", *reload);
    }

    /// Copy the draft into the applied filters, unless nothing changed.
    pub fn submit_filters(&mut self) {
        let changed = self.draft.read().submit_changed(&self.filters.peek());
        let Some(submitted) = changed else {
            log::debug!("filters unchanged, keeping current results");
            return;
        };
        log::info!("filters submitted: {:?}", submitted);
        let active = submitted.active_location((self.active_location)());
        self.active_location.set(active);
        self.filters.set(submitted);
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
