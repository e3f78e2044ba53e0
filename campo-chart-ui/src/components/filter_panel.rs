//! The filter form shared by the region and comparison views.

use super::{CropSelector, ErrorDisplay, LevelSelector, LocationSelector, YearRangePicker};
use crate::state::AppState;
use dioxus::prelude::*;

/// Year range, crop, level and two locations. Nothing is fetched until
/// "Ver campañas" copies the draft into the applied filters.
#[component]
pub fn FilterPanel() -> Element {
    let mut state = use_context::<AppState>();
    let catalog_error = (state.catalog_error)();

    let on_submit = move |evt: Event<FormData>| {
        evt.prevent_default();
        state.submit_filters();
    };

    rsx! {
        form {
            style: "padding: 12px; margin-bottom: 16px; background: #F5F5F5; border-radius: 4px;",
            onsubmit: on_submit,
            if let Some(err) = catalog_error {
                ErrorDisplay { section: "las opciones de filtro".to_string(), message: err }
            }
            div {
                style: "display: flex; flex-wrap: wrap; gap: 12px; align-items: flex-end;",
                YearRangePicker {}
                CropSelector {}
                LevelSelector {}
                LocationSelector { index: 0 }
                LocationSelector { index: 1 }
                button {
                    r#type: "submit",
                    style: "margin: 8px 0; padding: 6px 16px; cursor: pointer;",
                    "Ver campañas"
                }
            }
        }
    }
}
