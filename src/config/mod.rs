/// Application settings loaded from config.toml
pub mod settings;

/// Admin role lists and authorization helpers
pub mod roles;

pub use settings::{AppConfig, load_default_config};
