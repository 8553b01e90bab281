//! `settings` command: show what is remembered between runs.

use vkwall_core::{AppConfig, SettingsStore};

pub(crate) fn run_settings_show(config: &AppConfig) {
    let store = SettingsStore::open(&config.settings_path);
    println!("Settings file: {}", store.path().display());
    println!(
        "Token:         {}",
        store.token_hash().unwrap_or("(none remembered)")
    );
    if config.token.is_some() {
        println!("               VKWALL_TOKEN is set and takes precedence");
    }
    println!("Output dir:    {}", store.last_output_dir().display());
    if store.last_groups().is_empty() {
        println!("Last groups:   (none)");
    } else {
        println!("Last groups:");
        for group in store.last_groups() {
            println!("  {group}");
        }
    }
}
