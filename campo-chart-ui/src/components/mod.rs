//! Reusable Dioxus RSX components for the campaign dashboard.

mod auth_forms;
mod chart_container;
mod chart_header;
mod comparison_table;
mod error_display;
mod filter_panel;
mod line_chart;
mod loading_spinner;
mod location_selector;
mod year_range_picker;

pub use auth_forms::{Credentials, LoginForm, RegisterForm};
pub use chart_container::ChartContainer;
pub use chart_header::ChartHeader;
pub use comparison_table::{AverageBox, ComparisonTable, LocationToggle, ThresholdDot, ThresholdLegend};
pub use error_display::ErrorDisplay;
pub use filter_panel::FilterPanel;
pub use line_chart::{LineChart, SERIES_COLORS};
pub use loading_spinner::{EmptyState, LoadingSpinner};
pub use location_selector::{CropSelector, LevelSelector, LocationSelector};
pub use year_range_picker::YearRangePicker;
