use std::path::PathBuf;

#[derive(Clone)]
pub struct AppConfig {
    pub token: Option<String>,
    pub api_base_url: String,
    pub api_version: String,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub min_request_interval_ms: u64,
    pub throttle_backoff_ms: u64,
    pub settings_path: PathBuf,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("token", &self.token.as_ref().map(|_| "[redacted]"))
            .field("api_base_url", &self.api_base_url)
            .field("api_version", &self.api_version)
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("min_request_interval_ms", &self.min_request_interval_ms)
            .field("throttle_backoff_ms", &self.throttle_backoff_ms)
            .field("settings_path", &self.settings_path)
            .finish()
    }
}
