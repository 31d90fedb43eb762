//! Configuration loading for svcctl

pub mod loader;
pub mod settings;

pub use loader::{load_config, ConfigFormat};
pub use settings::ServiceConfig;
