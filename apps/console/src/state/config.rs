//! # Configuration State
//!
//! Console configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`OPSDESK_*`)
//! 2. Config file (`config.toml` in the platform config dir, or
//!    `OPSDESK_CONFIG`)
//! 3. Defaults (this file)
//!
//! ## Example `config.toml`
//! ```toml
//! shop_name = "Kitchen Gadget BD"
//! default_delivery_charge_cents = 12000
//! phone_prefix = "88"
//! utc_offset_minutes = 360
//! role = "admin"
//! ```
//!
//! Read-only after initialization, so no mutex needed.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use opsdesk_core::{
    Calendar, Money, Role, DEFAULT_DELIVERY_CHARGE_CENTS, DEFAULT_PACKAGING_COST_CENTS,
    DEFAULT_PHONE_PREFIX, RECENT_ORDERS_LIMIT,
};

use crate::error::{ApiError, ErrorCode};

const CONFIG_FILE: &str = "config.toml";
const DATABASE_FILE: &str = "opsdesk.db";
const DEFAULT_UTC_OFFSET_MINUTES: i32 = 6 * 60;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Could not determine app directories")]
    NoAppDirs,
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::new(ErrorCode::ConfigError, err.to_string())
    }
}

/// Console configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigState {
    /// SQLite file. Default: `<data dir>/opsdesk.db`
    pub database_path: Option<PathBuf>,

    /// Shop name used in customer messages
    pub shop_name: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Delivery charge pre-filled on new orders
    pub default_delivery_charge_cents: i64,

    /// Packaging cost pre-filled on new orders
    pub default_packaging_cost_cents: i64,

    /// Country prefix for chat links
    pub phone_prefix: String,

    /// Shop wall clock, minutes east of UTC. Decides where "today" starts.
    pub utc_offset_minutes: i32,

    /// Role of the person at this console
    pub role: Role,

    /// Length of the staff dashboard's recent-orders list
    pub recent_orders: usize,
}

impl Default for ConfigState {
    /// ## Default Values
    /// - Shop: "opsdesk Shop"
    /// - Currency: ৳
    /// - Delivery 60.00, packaging 10.00
    /// - Phone prefix "88", clock UTC+06:00
    /// - Role: staff
    fn default() -> Self {
        ConfigState {
            database_path: None,
            shop_name: "opsdesk Shop".to_string(),
            currency_symbol: "৳".to_string(),
            default_delivery_charge_cents: DEFAULT_DELIVERY_CHARGE_CENTS,
            default_packaging_cost_cents: DEFAULT_PACKAGING_COST_CENTS,
            phone_prefix: DEFAULT_PHONE_PREFIX.to_string(),
            utc_offset_minutes: DEFAULT_UTC_OFFSET_MINUTES,
            role: Role::Staff,
            recent_orders: RECENT_ORDERS_LIMIT,
        }
    }
}

impl ConfigState {
    /// Loads the config file (if any) and applies `OPSDESK_*` overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let path = match std::env::var("OPSDESK_CONFIG") {
            Ok(path) => PathBuf::from(path),
            Err(_) => project_dirs()?.config_dir().join(CONFIG_FILE),
        };

        let config = if path.exists() {
            info!(path = %path.display(), "Loading config file");
            Self::from_file(&path)?
        } else {
            debug!(path = %path.display(), "No config file, using defaults");
            ConfigState::default()
        };

        config.with_overrides(|key| std::env::var(key).ok())
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Applies environment overrides read through `lookup`.
    ///
    /// ## Environment Variables
    /// - `OPSDESK_DB_PATH`: database file
    /// - `OPSDESK_SHOP_NAME`: shop name
    /// - `OPSDESK_DELIVERY_CHARGE`: default delivery charge (e.g. "60")
    /// - `OPSDESK_PACKAGING_COST`: default packaging cost (e.g. "10.00")
    /// - `OPSDESK_PHONE_PREFIX`: chat link country prefix
    /// - `OPSDESK_UTC_OFFSET_MINUTES`: shop clock, e.g. "360" or "-300"
    /// - `OPSDESK_ROLE`: `admin` or `staff`
    /// - `OPSDESK_RECENT_ORDERS`: recent-orders list length
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(path) = lookup("OPSDESK_DB_PATH") {
            self.database_path = Some(PathBuf::from(path));
        }

        if let Some(shop_name) = lookup("OPSDESK_SHOP_NAME") {
            self.shop_name = shop_name;
        }

        if let Some(charge) = lookup("OPSDESK_DELIVERY_CHARGE") {
            self.default_delivery_charge_cents = Money::parse_lenient(&charge).cents();
        }

        if let Some(cost) = lookup("OPSDESK_PACKAGING_COST") {
            self.default_packaging_cost_cents = Money::parse_lenient(&cost).cents();
        }

        if let Some(prefix) = lookup("OPSDESK_PHONE_PREFIX") {
            self.phone_prefix = prefix;
        }

        if let Some(offset) = lookup("OPSDESK_UTC_OFFSET_MINUTES") {
            self.utc_offset_minutes =
                offset
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue {
                        key: "OPSDESK_UTC_OFFSET_MINUTES".to_string(),
                        value: offset.clone(),
                    })?;
        }

        if let Some(role) = lookup("OPSDESK_ROLE") {
            self.role = role.parse().map_err(|_| ConfigError::InvalidValue {
                key: "OPSDESK_ROLE".to_string(),
                value: role.clone(),
            })?;
        }

        if let Some(count) = lookup("OPSDESK_RECENT_ORDERS") {
            self.recent_orders = count.parse().map_err(|_| ConfigError::InvalidValue {
                key: "OPSDESK_RECENT_ORDERS".to_string(),
                value: count.clone(),
            })?;
        }

        self.calendar()?;
        Ok(self)
    }

    /// The shop calendar for the configured offset.
    pub fn calendar(&self) -> Result<Calendar, ConfigError> {
        Calendar::from_offset_minutes(self.utc_offset_minutes).map_err(|_| {
            ConfigError::InvalidValue {
                key: "utc_offset_minutes".to_string(),
                value: self.utc_offset_minutes.to_string(),
            }
        })
    }

    /// Configured database file, or the platform data dir default.
    ///
    /// ## Platform-Specific Defaults
    /// - **macOS**: `~/Library/Application Support/com.opsdesk.opsdesk/opsdesk.db`
    /// - **Windows**: `%APPDATA%\opsdesk\opsdesk\data\opsdesk.db`
    /// - **Linux**: `~/.local/share/opsdesk/opsdesk.db`
    pub fn resolve_database_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.database_path {
            return Ok(path.clone());
        }

        let data_dir = project_dirs()?.data_dir().to_path_buf();
        std::fs::create_dir_all(&data_dir).map_err(|source| ConfigError::Io {
            path: data_dir.clone(),
            source,
        })?;

        Ok(data_dir.join(DATABASE_FILE))
    }

    /// Formats a cent amount as a currency string.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = ConfigState::default();
    /// assert_eq!(config.format_currency(21000), "৳210.00");
    /// ```
    pub fn format_currency(&self, cents: i64) -> String {
        let money = Money::from_cents(cents);
        if money.is_negative() {
            format!("-{}{}", self.currency_symbol, Money::from_cents(-cents))
        } else {
            format!("{}{}", self.currency_symbol, money)
        }
    }
}

fn project_dirs() -> Result<ProjectDirs, ConfigError> {
    ProjectDirs::from("com", "opsdesk", "opsdesk").ok_or(ConfigError::NoAppDirs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = ConfigState::default();
        assert_eq!(config.default_delivery_charge_cents, 6000);
        assert_eq!(config.default_packaging_cost_cents, 1000);
        assert_eq!(config.phone_prefix, "88");
        assert_eq!(config.role, Role::Staff);
        assert_eq!(config.calendar().unwrap().offset_minutes(), 360);
    }

    #[test]
    fn test_utc_offset_from_file_and_env() {
        let config = ConfigState::from_toml_str("utc_offset_minutes = 0").unwrap();
        assert_eq!(config.calendar().unwrap(), Calendar::utc());

        let config = config
            .with_overrides(|key| {
                (key == "OPSDESK_UTC_OFFSET_MINUTES").then(|| "-300".to_string())
            })
            .unwrap();
        assert_eq!(config.calendar().unwrap().offset_minutes(), -300);

        let result = ConfigState::default().with_overrides(|key| {
            (key == "OPSDESK_UTC_OFFSET_MINUTES").then(|| "2000".to_string())
        });
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ConfigState::from_toml_str(
            r#"
            shop_name = "Kitchen Gadget BD"
            role = "admin"
            "#,
        )
        .unwrap();

        assert_eq!(config.shop_name, "Kitchen Gadget BD");
        assert_eq!(config.role, Role::Admin);
        assert_eq!(config.recent_orders, 5);
    }

    #[test]
    fn test_bad_toml() {
        assert!(matches!(
            ConfigState::from_toml_str("role = 3"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_env_overrides_file() {
        let env: HashMap<&str, &str> = [
            ("OPSDESK_DELIVERY_CHARGE", "৳ 120"),
            ("OPSDESK_ROLE", "Admin"),
            ("OPSDESK_DB_PATH", "/tmp/shop.db"),
        ]
        .into_iter()
        .collect();

        let config = ConfigState::default()
            .with_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.default_delivery_charge_cents, 12000);
        assert_eq!(config.role, Role::Admin);
        assert_eq!(
            config.resolve_database_path().unwrap(),
            PathBuf::from("/tmp/shop.db")
        );
    }

    #[test]
    fn test_invalid_env_role() {
        let result = ConfigState::default().with_overrides(|key| {
            (key == "OPSDESK_ROLE").then(|| "owner".to_string())
        });
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_format_currency() {
        let config = ConfigState::default();
        assert_eq!(config.format_currency(21000), "৳210.00");
        assert_eq!(config.format_currency(5), "৳0.05");
        assert_eq!(config.format_currency(-1234), "-৳12.34");
    }
}
