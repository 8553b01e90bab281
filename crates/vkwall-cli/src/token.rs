//! `token` command: validate, remember, or forget the VK access token.

use anyhow::Context;
use clap::Subcommand;
use vkwall_core::{token::display_hash, AppConfig, SettingsStore};
use vkwall_scraper::{PostSource, UserInfo, VkClient};

/// Sub-commands available under `token`.
#[derive(Debug, Subcommand)]
pub enum TokenCommands {
    /// Check that a token is accepted by VK
    Check {
        /// Token to check; defaults to VKWALL_TOKEN, then the remembered one
        token: Option<String>,

        /// Remember the token for later runs after a successful check
        #[arg(long)]
        remember: bool,
    },
    /// Forget the remembered token
    Clear,
}

/// Validates a token with `users.get` and optionally remembers it.
///
/// # Errors
///
/// Returns an error if no token is available, VK rejects it, or the settings
/// file cannot be written.
pub(crate) async fn run_token_check(
    config: &AppConfig,
    token: Option<String>,
    remember: bool,
) -> anyhow::Result<()> {
    let mut store = SettingsStore::open(&config.settings_path);
    let token = token
        .map(|t| t.trim().to_owned())
        .filter(|t| !t.is_empty())
        .or_else(|| config.token.clone())
        .or_else(|| store.token())
        .context("no token given and none remembered")?;

    let client = VkClient::with_base_url(
        &token,
        &config.api_version,
        config.request_timeout_secs,
        &config.api_base_url,
    )?;
    let user = check_token(&client).await?;
    let hash = display_hash(&token);
    tracing::info!(user = %user, token = %hash, "token accepted");
    println!("Token OK: {user} [{hash}]");

    if remember {
        store
            .remember_token(&token)
            .with_context(|| format!("failed to save token to {}", store.path().display()))?;
        println!("Token remembered in {}", store.path().display());
    }
    Ok(())
}

/// Forgets the remembered token.
///
/// # Errors
///
/// Returns an error if the settings file cannot be written.
pub(crate) fn run_token_clear(config: &AppConfig) -> anyhow::Result<()> {
    let mut store = SettingsStore::open(&config.settings_path);
    if store.token_hash().is_none() && store.settings().obfuscated_token.is_none() {
        println!("No token remembered.");
        return Ok(());
    }
    store.clear_token()?;
    println!("Remembered token removed.");
    Ok(())
}

async fn check_token<S: PostSource>(source: &S) -> anyhow::Result<UserInfo> {
    source
        .get_self()
        .await
        .context("VK rejected the token")
}

#[cfg(test)]
#[path = "token_test.rs"]
mod tests;
