pub mod address;
pub mod app_config;
pub mod client_config;
pub mod config;
pub mod settings;
pub mod shop;

pub use address::NormalizedAddress;
pub use app_config::{AppConfig, Environment};
pub use client_config::ClientConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use settings::{AccessDenied, SearchContext, SettingsUpdate, ShopSettings};
pub use shop::validate_shop_domain;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid shop domain: {0}")]
    InvalidShopDomain(String),

    #[error("unknown search context: {0}")]
    UnknownContext(String),

    #[error("{0}")]
    InvalidSettings(String),
}
