//! Loss table with threshold dots, the average box and the location toggle.

use crate::state::AppState;
use campo_core::observation::AverageReference;
use campo_data::threshold::{average_caption, ClassifiedObservation, ThresholdStatus};
use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct ThresholdDotProps {
    pub status: ThresholdStatus,
}

/// Green, yellow or red dot for one classified row.
#[component]
pub fn ThresholdDot(props: ThresholdDotProps) -> Element {
    let color = props.status.color();
    let class = props.status.css_class();
    rsx! {
        span {
            class: "dot {class}",
            style: "display: inline-block; width: 12px; height: 12px; border-radius: 50%; background: {color};",
        }
    }
}

#[derive(Props, Clone, PartialEq)]
pub struct AverageBoxProps {
    pub average: Option<AverageReference>,
    pub year_from: String,
    pub year_to: String,
}

/// "Promedio {from} - {to}" with the reference loss percentage.
#[component]
pub fn AverageBox(props: AverageBoxProps) -> Element {
    let Some(average) = props.average else {
        return rsx! {
            div {
                style: "padding: 8px 12px; color: #888;",
                "Sin promedio para el período"
            }
        };
    };
    let (title, value) = average_caption(&average, &props.year_from, &props.year_to);
    rsx! {
        div {
            style: "padding: 8px 12px; margin-bottom: 8px; background: #FAFAFA; border: 1px solid #E0E0E0; border-radius: 4px; display: inline-block;",
            div { style: "font-size: 12px; color: #666;", "{title}" }
            div { style: "font-size: 20px; font-weight: bold;", "{value}" }
        }
    }
}

#[derive(Props, Clone, PartialEq)]
pub struct ComparisonTableProps {
    pub label: String,
    pub rows: Vec<ClassifiedObservation>,
}

/// Year, loss percentage and status dot; newest year first.
#[component]
pub fn ComparisonTable(props: ComparisonTableProps) -> Element {
    let rows: Vec<(String, String, ThresholdStatus)> = props
        .rows
        .iter()
        .map(|row| {
            let year = row.year.map(|y| y.to_string()).unwrap_or_else(|| "s/d".to_string());
            (year, row.display_value(), row.status)
        })
        .collect();

    rsx! {
        table {
            style: "border-collapse: collapse; min-width: 320px; font-size: 13px;",
            caption { style: "text-align: left; font-weight: bold; padding: 4px 0;", "{props.label}" }
            thead {
                tr {
                    th { style: "text-align: left; padding: 4px 8px; border-bottom: 1px solid #CCC;", "Año" }
                    th { style: "text-align: right; padding: 4px 8px; border-bottom: 1px solid #CCC;", "% hectáreas perdidas" }
                    th { style: "padding: 4px 8px; border-bottom: 1px solid #CCC;", "" }
                }
            }
            tbody {
                for (year, value, status) in rows {
                    tr {
                        td { style: "padding: 4px 8px;", "{year}" }
                        td { style: "text-align: right; padding: 4px 8px;", "{value}" }
                        td { style: "padding: 4px 8px; text-align: center;", ThresholdDot { status } }
                    }
                }
            }
        }
    }
}

#[derive(Props, Clone, PartialEq)]
pub struct LocationToggleProps {
    pub labels: [String; 2],
}

/// Switches the comparison table between the two locations. A slot
/// without a chosen location cannot be selected.
#[component]
pub fn LocationToggle(props: LocationToggleProps) -> Element {
    let mut state = use_context::<AppState>();
    let filters = state.filters.read().clone();
    let active = filters.active_location((state.active_location)());
    let buttons: Vec<(usize, String, bool)> = props
        .labels
        .iter()
        .enumerate()
        .map(|(i, label)| (i, label.clone(), filters.location(i).is_some()))
        .collect();

    rsx! {
        div {
            style: "display: flex; gap: 8px; margin: 8px 0;",
            for (index, label, enabled) in buttons {
                button {
                    r#type: "button",
                    disabled: !enabled,
                    style: if index == active {
                        "padding: 4px 12px; background: #1976D2; color: white; border: none; border-radius: 4px;"
                    } else {
                        "padding: 4px 12px; background: #EEE; color: #333; border: none; border-radius: 4px;"
                    },
                    onclick: move |_| state.active_location.set(index),
                    "{label}"
                }
            }
        }
    }
}

#[derive(Props, Clone, PartialEq)]
pub struct ThresholdLegendProps {
    pub tolerance: f64,
}

/// Explains the dot colours relative to the average.
#[component]
pub fn ThresholdLegend(props: ThresholdLegendProps) -> Element {
    let entries = [
        (ThresholdStatus::Low, format!("Al menos {} puntos bajo el promedio", props.tolerance)),
        (ThresholdStatus::Medium, format!("Dentro de ±{} puntos", props.tolerance)),
        (ThresholdStatus::High, format!("Más de {} puntos sobre el promedio", props.tolerance)),
    ];
    rsx! {
        div {
            style: "margin-top: 12px; padding: 8px 12px; background: #FAFAFA; border-radius: 4px; border: 1px solid #E0E0E0; font-size: 12px; display: flex; gap: 16px; flex-wrap: wrap;",
            for (status, text) in entries {
                div {
                    style: "display: flex; align-items: center; gap: 4px;",
                    ThresholdDot { status }
                    "{text}"
                }
            }
        }
    }
}
