//! Access-token obfuscation for the local settings file.
//!
//! This only keeps the token from being readable at a glance when someone
//! opens the settings file. It is a reversible encoding keyed by host and
//! user names, not encryption, and offers no protection against anyone who
//! can read this source.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use sha2::{Digest, Sha256};

const STATIC_SALT: &str = "VKWALL_LOCAL_SETTINGS_SALT";
const FRAGMENT_LEN: usize = 8;

/// Encodes `token` for storage in the settings file.
#[must_use]
pub fn obfuscate(token: &str) -> String {
    obfuscate_with_salt(token, &local_salt())
}

/// Decodes a value produced by [`obfuscate`] on the same machine and account.
///
/// Returns `None` if the value is not valid base64/UTF-8 or was written under
/// a different host or user.
#[must_use]
pub fn deobfuscate(stored: &str) -> Option<String> {
    deobfuscate_with_salt(stored, &local_salt())
}

/// Short, non-reversible fingerprint for showing which token is in use.
#[must_use]
pub fn display_hash(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    let hex = hex::encode(digest);
    format!("{}...", &hex[..8])
}

fn local_salt() -> String {
    let host = std::env::var("COMPUTERNAME")
        .or_else(|_| std::env::var("HOSTNAME"))
        .unwrap_or_else(|_| "DEFAULT_PC".to_owned());
    let user = std::env::var("USERNAME")
        .or_else(|_| std::env::var("USER"))
        .unwrap_or_else(|_| "user".to_owned());
    format!("{host}_{user}_{STATIC_SALT}")
}

fn salt_fragments(salt: &str) -> (String, String) {
    let head: String = salt.chars().take(FRAGMENT_LEN).collect();
    let count = salt.chars().count();
    let tail: String = salt
        .chars()
        .skip(count.saturating_sub(FRAGMENT_LEN))
        .collect();
    (head, tail)
}

fn obfuscate_with_salt(token: &str, salt: &str) -> String {
    let (head, tail) = salt_fragments(salt);
    STANDARD.encode(format!("{head}{token}{tail}"))
}

fn deobfuscate_with_salt(stored: &str, salt: &str) -> Option<String> {
    let (head, tail) = salt_fragments(salt);
    let bytes = STANDARD.decode(stored.trim()).ok()?;
    let decoded = String::from_utf8(bytes).ok()?;
    if decoded.len() < head.len() + tail.len() {
        return None;
    }
    decoded
        .strip_prefix(head.as_str())?
        .strip_suffix(tail.as_str())
        .map(str::to_owned)
}
