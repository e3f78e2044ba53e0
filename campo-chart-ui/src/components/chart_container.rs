//! Chart container component with loading state.

use dioxus::prelude::*;

/// Props for ChartContainer
#[derive(Props, Clone, PartialEq)]
pub struct ChartContainerProps {
    /// DOM id of the wrapper div
    pub id: String,
    /// Whether the chart is still loading
    #[props(default = false)]
    pub loading: bool,
    /// Optional minimum height in pixels
    #[props(default = 320)]
    pub min_height: u32,
    pub children: Element,
}

/// A container for one SVG chart with a loading overlay.
#[component]
pub fn ChartContainer(props: ChartContainerProps) -> Element {
    let style = format!(
        "min-height: {}px; position: relative; width: 100%;",
        props.min_height
    );
    let opacity = if props.loading { "0.4" } else { "1" };

    rsx! {
        div {
            style: "{style}",
            if props.loading {
                div {
                    style: "position: absolute; top: 50%; left: 50%; transform: translate(-50%, -50%); color: #666;",
                    "Cargando gráfico..."
                }
            }
            div {
                id: "{props.id}",
                style: "width: 100%; opacity: {opacity};",
                {props.children}
            }
        }
    }
}
