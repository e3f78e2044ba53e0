pub mod catalog;
pub mod config;
pub mod error;
pub mod fetch;
pub mod filters;
pub mod level;
pub mod normalize;
pub mod observation;
pub mod session;

#[cfg(feature = "api")]
pub mod api;
#[cfg(feature = "api")]
pub mod identity;
