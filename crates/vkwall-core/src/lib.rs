pub mod app_config;
pub mod config;
pub mod settings;
pub mod token;
pub mod types;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use settings::{Settings, SettingsStore, MAX_SAVED_GROUPS};
pub use types::{CollectionWindow, CommunityRef, Post};

use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid collection window: {from} is after {to}")]
    InvalidWindow { from: NaiveDate, to: NaiveDate },

    #[error("empty community identifier")]
    EmptyCommunityRef,
}

/// Errors raised while reading or writing the persisted [`Settings`] file.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("settings serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
