//! Loading and empty-state placeholders.

use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct LoadingSpinnerProps {
    #[props(default = "Cargando datos...".to_string())]
    pub message: String,
}

/// Simple loading indicator.
#[component]
pub fn LoadingSpinner(props: LoadingSpinnerProps) -> Element {
    rsx! {
        div {
            style: "display: flex; justify-content: center; align-items: center; padding: 40px; color: #666;",
            "{props.message}"
        }
    }
}

#[derive(Props, Clone, PartialEq)]
pub struct EmptyStateProps {
    pub message: String,
}

/// Shown when a section has nothing to draw.
#[component]
pub fn EmptyState(props: EmptyStateProps) -> Element {
    rsx! {
        div {
            style: "padding: 24px; text-align: center; color: #888; background: #FAFAFA; border: 1px dashed #E0E0E0; border-radius: 4px;",
            "{props.message}"
        }
    }
}
