//! Persisted user settings: remembered token, last groups, last output dir.
//!
//! Stored as pretty-printed JSON. A missing or unreadable file yields default
//! settings so a corrupt file never blocks a collection run.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::token;
use crate::SettingsError;

/// Upper bound on the number of remembered community identifiers.
pub const MAX_SAVED_GROUPS: usize = 30;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub obfuscated_token: Option<String>,
    pub token_hash: Option<String>,
    pub last_groups: Vec<String>,
    pub last_output_dir: Option<PathBuf>,
}

/// Platform config directory + `vkwall/settings.json`, or a dot-directory in
/// the working directory when the platform has none.
#[must_use]
pub fn default_settings_path() -> PathBuf {
    dirs::config_dir()
        .map_or_else(|| PathBuf::from(".vkwall"), |dir| dir.join("vkwall"))
        .join("settings.json")
}

/// The desktop, else the home directory, else the working directory.
#[must_use]
pub fn default_output_dir() -> PathBuf {
    dirs::desktop_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// File-backed settings handle.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
    data: Settings,
}

impl SettingsStore {
    /// Loads settings from `path`, falling back to defaults on any read or
    /// parse failure.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let data = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "settings file is not valid JSON; using defaults"
                );
                Settings::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Settings::default(),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "could not read settings file; using defaults"
                );
                Settings::default()
            }
        };
        Self { path, data }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.data
    }

    /// Writes the current settings, creating the parent directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Io`] if the directory or file cannot be
    /// written, or [`SettingsError::Serialize`] if encoding fails.
    pub fn save(&self) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| SettingsError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let body = serde_json::to_string_pretty(&self.data)?;
        std::fs::write(&self.path, body).map_err(|source| SettingsError::Io {
            path: self.path.clone(),
            source,
        })
    }

    /// Remembers `token` in obfuscated form and saves.
    ///
    /// # Errors
    ///
    /// See [`SettingsStore::save`].
    pub fn remember_token(&mut self, token: &str) -> Result<(), SettingsError> {
        self.data.obfuscated_token = Some(token::obfuscate(token));
        self.data.token_hash = Some(token::display_hash(token));
        self.save()
    }

    /// Forgets any remembered token and saves.
    ///
    /// # Errors
    ///
    /// See [`SettingsStore::save`].
    pub fn clear_token(&mut self) -> Result<(), SettingsError> {
        self.data.obfuscated_token = None;
        self.data.token_hash = None;
        self.save()
    }

    /// The remembered token, if one exists and decodes on this machine.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.data
            .obfuscated_token
            .as_deref()
            .and_then(token::deobfuscate)
    }

    #[must_use]
    pub fn token_hash(&self) -> Option<&str> {
        self.data.token_hash.as_deref()
    }

    /// Remembers up to [`MAX_SAVED_GROUPS`] identifiers and saves.
    ///
    /// # Errors
    ///
    /// See [`SettingsStore::save`].
    pub fn set_last_groups(&mut self, groups: &[String]) -> Result<(), SettingsError> {
        self.data.last_groups = groups.iter().take(MAX_SAVED_GROUPS).cloned().collect();
        self.save()
    }

    #[must_use]
    pub fn last_groups(&self) -> &[String] {
        &self.data.last_groups
    }

    /// # Errors
    ///
    /// See [`SettingsStore::save`].
    pub fn set_last_output_dir(&mut self, dir: &Path) -> Result<(), SettingsError> {
        self.data.last_output_dir = Some(dir.to_path_buf());
        self.save()
    }

    /// The remembered output directory, or [`default_output_dir`].
    #[must_use]
    pub fn last_output_dir(&self) -> PathBuf {
        self.data
            .last_output_dir
            .clone()
            .unwrap_or_else(default_output_dir)
    }
}
