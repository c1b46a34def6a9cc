pub mod domain;

#[cfg(feature = "server")]
pub mod application;

#[cfg(feature = "server")]
pub mod config;

#[cfg(feature = "server")]
pub mod infrastructure;

#[cfg(feature = "server")]
mod app_context;

#[cfg(feature = "server")]
pub use app_context::AppContext;
#[cfg(feature = "server")]
pub use config::AppConfig;
