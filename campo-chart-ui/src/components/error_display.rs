//! Inline error box for a section whose batch failed.

use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct ErrorDisplayProps {
    /// What failed to load, e.g. "la comparativa de pérdidas"
    pub section: String,
    pub message: String,
    /// Shown as a "Reintentar" button when set
    #[props(default)]
    pub on_retry: Option<EventHandler<()>>,
}

/// "No se pudo cargar <section>" with the underlying error below it. The
/// rest of the dashboard keeps working.
#[component]
pub fn ErrorDisplay(props: ErrorDisplayProps) -> Element {
    let on_retry = props.on_retry;

    rsx! {
        div {
            role: "alert",
            style: "padding: 12px 16px; margin: 8px 0; background: #FFEBEE; color: #C62828; border-radius: 4px; border: 1px solid #EF9A9A;",
            strong { "No se pudo cargar {props.section}." }
            div { style: "font-size: 12px; margin-top: 4px;", "{props.message}" }
            if let Some(handler) = on_retry {
                button {
                    r#type: "button",
                    style: "margin-top: 8px; padding: 4px 12px; cursor: pointer;",
                    onclick: move |_| handler.call(()),
                    "Reintentar"
                }
            }
        }
    }
}
