//! Campaign year range inputs.

use crate::state::AppState;
use campo_core::filters::{MAX_YEAR, MIN_YEAR};
use dioxus::prelude::*;

/// "Desde" / "Hasta" year inputs bound to the filter draft.
///
/// "Hasta" stays disabled until "Desde" has a value, and never goes below
/// the year after it.
#[component]
pub fn YearRangePicker() -> Element {
    let mut state = use_context::<AppState>();
    let draft = state.draft.read().clone();
    let from = draft.current().year_from.clone();
    let to = draft.current().year_to.clone();
    let to_enabled = draft.year_to_enabled();
    let to_min = draft.year_to_min();

    let on_from_change = move |evt: Event<FormData>| {
        state.draft.write().set_year_from(&evt.value());
    };

    let on_to_change = move |evt: Event<FormData>| {
        state.draft.write().set_year_to(&evt.value());
    };

    rsx! {
        div {
            style: "margin: 8px 0; display: flex; gap: 12px; align-items: center;",
            label {
                style: "font-weight: bold;",
                "Desde: "
                input {
                    r#type: "number",
                    value: "{from}",
                    min: "{MIN_YEAR}",
                    max: "{MAX_YEAR}",
                    style: "width: 80px;",
                    onchange: on_from_change,
                }
            }
            label {
                style: "font-weight: bold;",
                "Hasta: "
                input {
                    r#type: "number",
                    value: "{to}",
                    min: "{to_min}",
                    max: "{MAX_YEAR}",
                    disabled: !to_enabled,
                    style: "width: 80px;",
                    onchange: on_to_change,
                }
            }
        }
    }
}
