//! Dropdowns for crop, geographic level and the two locations.

use crate::state::AppState;
use campo_core::level::Level;
use dioxus::prelude::*;

/// Placeholder option text while the catalog loads or after it failed.
fn catalog_placeholder(loading: bool, failed: bool, idle: &str) -> String {
    if failed {
        "Error al cargar".to_string()
    } else if loading {
        "Cargando...".to_string()
    } else {
        idle.to_string()
    }
}

/// Crop dropdown; the empty choice means every crop.
#[component]
pub fn CropSelector() -> Element {
    let mut state = use_context::<AppState>();
    let crops = state.catalog.read().crops.clone();
    let selected = state.draft.read().current().crop.clone();
    let placeholder = catalog_placeholder(
        (state.catalog_loading)(),
        (state.catalog_error)().is_some(),
        "Todos los cultivos",
    );

    let on_change = move |evt: Event<FormData>| {
        state.draft.write().set_crop(&evt.value());
    };

    rsx! {
        div {
            style: "margin: 8px 0;",
            label {
                r#for: "crop-select",
                style: "font-weight: bold; margin-right: 8px;",
                "Cultivo: "
            }
            select {
                id: "crop-select",
                onchange: on_change,
                option { value: "", selected: selected.is_empty(), "{placeholder}" }
                for crop in crops.iter() {
                    option {
                        value: "{crop.id}",
                        selected: crop.id == selected,
                        "{crop.name}"
                    }
                }
            }
        }
    }
}

/// Level dropdown. Changing it clears both locations.
#[component]
pub fn LevelSelector() -> Element {
    let mut state = use_context::<AppState>();
    let selected = state.draft.read().current().level;
    let levels: Vec<(Level, &str, &str)> = Level::ALL
        .iter()
        .map(|level| (*level, level.as_str(), level.label()))
        .collect();

    let on_change = move |evt: Event<FormData>| {
        let level = evt.value().parse::<Level>().ok();
        state.draft.write().set_level(level);
    };

    rsx! {
        div {
            style: "margin: 8px 0;",
            label {
                r#for: "level-select",
                style: "font-weight: bold; margin-right: 8px;",
                "Nivel: "
            }
            select {
                id: "level-select",
                onchange: on_change,
                option { value: "", selected: selected.is_none(), "Seleccionar nivel" }
                for (level, value, label) in levels {
                    option {
                        value: "{value}",
                        selected: selected == Some(level),
                        "{label}"
                    }
                }
            }
        }
    }
}

#[derive(Props, Clone, PartialEq)]
pub struct LocationSelectorProps {
    /// Location slot, 0 or 1
    pub index: usize,
}

/// Place dropdown for one location slot, listing places of the chosen level.
#[component]
pub fn LocationSelector(props: LocationSelectorProps) -> Element {
    let mut state = use_context::<AppState>();
    let index = props.index;
    let draft = state.draft.read().clone();
    let level = draft.current().level;
    let selected = draft.current().location(index).unwrap_or_default().to_string();
    let places = level
        .map(|level| state.catalog.read().places(level).to_vec())
        .unwrap_or_default();
    let placeholder = catalog_placeholder(
        (state.catalog_loading)(),
        (state.catalog_error)().is_some(),
        "Seleccionar ubicación",
    );
    let slot = index + 1;
    let select_id = format!("location-select-{}", slot);

    let on_change = move |evt: Event<FormData>| {
        state.draft.write().set_location(index, &evt.value());
    };

    rsx! {
        div {
            style: "margin: 8px 0;",
            label {
                r#for: "{select_id}",
                style: "font-weight: bold; margin-right: 8px;",
                "Ubicación {slot}: "
            }
            select {
                id: "{select_id}",
                disabled: level.is_none(),
                onchange: on_change,
                option { value: "", selected: selected.is_empty(), "{placeholder}" }
                for place in places.iter() {
                    option {
                        value: "{place.id}",
                        selected: place.id == selected,
                        "{place.name}"
                    }
                }
            }
        }
    }
}
