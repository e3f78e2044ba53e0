//! Section header: title, campaign span and Y-axis unit.

use crate::state::AppState;
use campo_core::filters::CampaignFilters;
use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct ChartHeaderProps {
    pub title: String,
    /// Applied filters; the header shows which campaigns they cover
    pub filters: CampaignFilters,
    /// Y-axis unit, e.g. "Hectáreas (ha)"
    #[props(default = String::new())]
    pub unit_description: String,
}

/// Title line plus "Campañas 2019 - 2021 · Eje Y: Hectáreas (ha)".
#[component]
pub fn ChartHeader(props: ChartHeaderProps) -> Element {
    let mut details = vec![props.filters.range_caption()];
    if !props.unit_description.is_empty() {
        details.push(format!("Eje Y: {}", props.unit_description));
    }
    let state = use_context::<AppState>();
    let crop_id = props.filters.crop.trim();
    // Prefer the catalog name over the raw id
    let crop = state
        .catalog
        .read()
        .crops
        .iter()
        .find(|c| c.id == crop_id && !c.name.is_empty())
        .map(|c| c.name.clone())
        .unwrap_or_else(|| crop_id.to_string());
    let details = details.join(" · ");

    rsx! {
        div {
            style: "margin-bottom: 8px;",
            h3 {
                style: "margin: 0 0 4px 0; font-size: 16px;",
                "{props.title}"
            }
            p {
                style: "margin: 0; font-size: 12px; color: #666;",
                "{details}"
                if !crop.is_empty() {
                    span { style: "margin-left: 8px; color: #999;", "Cultivo: {crop}" }
                }
            }
        }
    }
}
