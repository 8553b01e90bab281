use std::path::PathBuf;

use crate::app_config::AppConfig;
use crate::settings::default_settings_path;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can feed a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let token = lookup("VKWALL_TOKEN")
        .ok()
        .map(|t| t.trim().to_owned())
        .filter(|t| !t.is_empty());

    let api_base_url = or_default("VKWALL_API_BASE_URL", "https://api.vk.com");
    if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
        return Err(ConfigError::InvalidEnvVar {
            var: "VKWALL_API_BASE_URL".to_string(),
            reason: format!("'{api_base_url}' is not an http(s) URL"),
        });
    }

    let api_version = or_default("VKWALL_API_VERSION", "5.199");
    let log_level = or_default("VKWALL_LOG_LEVEL", "info");

    let request_timeout_secs = parse_u64("VKWALL_REQUEST_TIMEOUT_SECS", "30")?;
    if request_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "VKWALL_REQUEST_TIMEOUT_SECS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    let min_request_interval_ms = parse_u64("VKWALL_MIN_REQUEST_INTERVAL_MS", "250")?;
    let throttle_backoff_ms = parse_u64("VKWALL_THROTTLE_BACKOFF_MS", "1500")?;

    let settings_path = match lookup("VKWALL_SETTINGS_PATH") {
        Ok(path) if !path.trim().is_empty() => PathBuf::from(path.trim()),
        _ => default_settings_path(),
    };

    Ok(AppConfig {
        token,
        api_base_url,
        api_version,
        log_level,
        request_timeout_secs,
        min_request_interval_ms,
        throttle_backoff_ms,
        settings_path,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
