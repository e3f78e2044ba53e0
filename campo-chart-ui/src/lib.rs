//! Shared Dioxus components for the campaign dashboard.
//!
//! This crate provides:
//! - `state`: Reactive AppState with Dioxus Signals
//! - `components`: Reusable RSX components (filter panel, plotters line chart,
//!   comparison table, auth forms, status boxes)

pub mod components;
pub mod state;
