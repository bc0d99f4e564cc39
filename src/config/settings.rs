//! Application settings loaded from config.toml
//!
//! Every field has a default so the bot runs with an empty (or missing) file.
//! The roster section controls capacity and append semantics, the orders
//! section provides the item catalog and payment methods.

use crate::{
    core::roster::{AppendMode, RosterPolicy},
    errors::{Error, Result},
};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default location of roster JSON files.
pub const DEFAULT_DATA_DIR: &str = "data/ps";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding one JSON file per roster
    pub data_dir: PathBuf,
    /// Roster identifiers the bot manages
    pub entities: Vec<String>,
    /// Roles allowed to run mutating roster commands
    pub admin_role_ids: Vec<u64>,
    /// Roster behaviour
    pub roster: RosterSettings,
    /// Order intake behaviour
    pub orders: OrderSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            entities: (1..=7).map(|n| format!("PS{n}")).collect(),
            admin_role_ids: Vec::new(),
            roster: RosterSettings::default(),
            orders: OrderSettings::default(),
        }
    }
}

/// `[roster]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RosterSettings {
    /// Maximum live slots, including the reserved row when enabled
    pub capacity: usize,
    /// Render row 20 as a fixed `ADMIN` row and lower user capacity by one
    pub reserve_last_row: bool,
    /// Where `add` places a new participant
    pub append_mode: AppendMode,
    /// Default announcement title; `{entity}` is replaced by the roster id
    pub title_template: String,
    /// Mention repeated identities only once when rendering
    pub dedupe_mentions: bool,
}

impl Default for RosterSettings {
    fn default() -> Self {
        Self {
            capacity: 20,
            reserve_last_row: false,
            append_mode: AppendMode::Append,
            title_template: "📋 LIST {entity}".to_string(),
            dedupe_mentions: true,
        }
    }
}

impl RosterSettings {
    /// Builds the store policy from these settings.
    #[must_use]
    pub fn policy(&self) -> RosterPolicy {
        RosterPolicy {
            capacity: self.capacity,
            reserve_last_row: self.reserve_last_row,
            append_mode: self.append_mode,
            title_template: self.title_template.clone(),
        }
    }
}

/// `[orders]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OrderSettings {
    /// Seconds an unfinished order session stays valid
    pub session_ttl_secs: u64,
    /// Seconds a confirmed order may still be rated
    pub rating_ttl_secs: u64,
    /// Payment methods offered at checkout
    pub payment_methods: Vec<String>,
    /// Items that can be ordered
    pub items: Vec<ItemConfig>,
    /// Channel where ratings are posted; replies in place when unset
    pub testimonial_channel_id: Option<u64>,
}

impl Default for OrderSettings {
    fn default() -> Self {
        Self {
            session_ttl_secs: 30 * 60,
            rating_ttl_secs: 24 * 60 * 60,
            payment_methods: vec!["QRIS".to_string(), "DANA".to_string(), "Bank Transfer".to_string()],
            items: Vec::new(),
            testimonial_channel_id: None,
        }
    }
}

/// A single `[[orders.items]]` entry
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ItemConfig {
    /// Stable id used in commands
    pub id: String,
    /// Display name
    pub name: String,
    /// Unit price in the smallest currency unit
    pub price: u64,
}

/// Parses configuration from TOML text.
///
/// # Errors
/// Returns `Error::Config` when the TOML is invalid or the values are inconsistent.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    let config: AppConfig = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &AppConfig) -> Result<()> {
    if config.entities.is_empty() {
        return Err(Error::Config {
            message: "At least one roster entity must be configured".to_string(),
        });
    }
    if config.roster.capacity == 0 || config.roster.capacity > crate::core::render::DISPLAY_ROWS {
        return Err(Error::Config {
            message: format!(
                "Roster capacity must be between 1 and {}, got {}",
                crate::core::render::DISPLAY_ROWS,
                config.roster.capacity
            ),
        });
    }
    if config.roster.reserve_last_row && config.roster.capacity < 2 {
        return Err(Error::Config {
            message: "reserve_last_row needs a capacity of at least 2".to_string(),
        });
    }
    Ok(())
}

/// Loads configuration from a TOML file, falling back to defaults if the file is absent.
///
/// `ROSTER_DATA_DIR` overrides `data_dir` and `ADMIN_ROLE_IDS` adds role ids.
///
/// # Errors
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path = path.as_ref();
    let mut config = match std::fs::read_to_string(path) {
        Ok(contents) => parse_config(&contents)?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!("{} not found, using default configuration", path.display());
            AppConfig::default()
        }
        Err(e) => {
            return Err(Error::Config {
                message: format!("Failed to read config file {}: {e}", path.display()),
            });
        }
    };

    if let Ok(dir) = std::env::var("ROSTER_DATA_DIR") {
        config.data_dir = PathBuf::from(dir);
    }
    config
        .admin_role_ids
        .extend(crate::config::roles::role_ids_from_env());
    config.admin_role_ids.sort_unstable();
    config.admin_role_ids.dedup();

    tracing::debug!(?config, "Configuration loaded");
    Ok(config)
}

/// Loads configuration from `CONFIG_PATH`, or ./config.toml when unset.
///
/// # Errors
/// See [`load_config`].
pub fn load_default_config() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_config(path)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.data_dir, PathBuf::from("data/ps"));
        assert_eq!(config.entities.len(), 7);
        assert_eq!(config.entities[0], "PS1");
        assert_eq!(config.entities[6], "PS7");
        assert_eq!(config.roster.capacity, 20);
        assert!(!config.roster.reserve_last_row);
        assert_eq!(config.roster.append_mode, AppendMode::Append);
        assert_eq!(config.orders.session_ttl_secs, 1800);
        assert_eq!(config.orders.testimonial_channel_id, None);
    }

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
            data_dir = "/var/lib/j2y"
            entities = ["PS1", "PS2"]
            admin_role_ids = [111, 222]

            [roster]
            capacity = 19
            reserve_last_row = true
            append_mode = "reuse_placeholder"
            title_template = "Waitlist {entity}"

            [orders]
            session_ttl_secs = 600
            payment_methods = ["QRIS"]
            testimonial_channel_id = 999

            [[orders.items]]
            id = "crate"
            name = "J2Y Crate"
            price = 25000

            [[orders.items]]
            id = "key"
            name = "Crate Key"
            price = 5000
        "#;

        let config = parse_config(toml_str).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/j2y"));
        assert_eq!(config.entities, vec!["PS1", "PS2"]);
        assert_eq!(config.admin_role_ids, vec![111, 222]);
        assert_eq!(config.roster.capacity, 19);
        assert!(config.roster.reserve_last_row);
        assert_eq!(config.roster.append_mode, AppendMode::ReusePlaceholder);
        assert!(config.roster.dedupe_mentions);
        assert_eq!(config.orders.session_ttl_secs, 600);
        assert_eq!(config.orders.rating_ttl_secs, 86_400);
        assert_eq!(config.orders.items.len(), 2);
        assert_eq!(config.orders.items[1].price, 5000);
        assert_eq!(config.orders.testimonial_channel_id, Some(999));
    }

    #[test]
    fn test_invalid_capacity_rejected() {
        let result = parse_config("[roster]\ncapacity = 0\n");
        assert!(matches!(result, Err(Error::Config { .. })));

        let result = parse_config("[roster]\ncapacity = 21\n");
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_invalid_toml_rejected() {
        let result = parse_config("entities = [");
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = load_config("/nonexistent/j2y/config.toml").unwrap();
        assert_eq!(config.roster.capacity, 20);
    }
}
