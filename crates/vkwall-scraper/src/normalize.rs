//! Normalization from raw VK wall items to [`vkwall_core::Post`].
//!
//! Text handling: the post body and the shared (reposted) body become up to
//! two paragraphs, and inline mention markup such as `[id1|Name]` is reduced
//! to the plain display name.

use std::borrow::Cow;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use vkwall_core::Post;

use crate::types::WallItem;

/// Prefix marking the paragraph that holds reposted content.
pub const REPOST_MARKER: &str = "[Repost] ";

static MENTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[(?:id|club|public)\d+\|([^\]]+)\]").expect("valid mention regex")
});

/// Rewrites `[id<n>|Name]`, `[club<n>|Name]` and `[public<n>|Name]` to `Name`.
///
/// Text without such markup is returned borrowed and unchanged.
#[must_use]
pub fn clean_mentions(text: &str) -> Cow<'_, str> {
    MENTION_RE.replace_all(text, "$1")
}

/// Builds the display text for one wall item.
///
/// The trimmed post body comes first; the trimmed body of the first shared
/// record follows as a second paragraph prefixed with [`REPOST_MARKER`].
/// Paragraphs are separated by a blank line. An item with neither yields an
/// empty string.
#[must_use]
pub fn extract_full_text(item: &WallItem) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(2);

    let main = item.text.trim();
    if !main.is_empty() {
        parts.push(clean_mentions(main).into_owned());
    }

    if let Some(shared) = item.copy_history.first() {
        let shared_text = shared.text.trim();
        if !shared_text.is_empty() {
            parts.push(format!("{REPOST_MARKER}{}", clean_mentions(shared_text)));
        }
    }

    parts.join("\n\n")
}

/// Converts a raw wall item into a [`Post`] attributed to `community_name`.
///
/// A timestamp outside chrono's range (never produced by VK) falls back to
/// the Unix epoch rather than dropping the post.
#[must_use]
pub fn normalize_post(item: &WallItem, owner_id: i64, community_name: &str) -> Post {
    let published_at = DateTime::<Utc>::from_timestamp(item.date, 0).unwrap_or_else(|| {
        tracing::warn!(owner_id, post = item.id, date = item.date, "post timestamp out of range");
        DateTime::<Utc>::UNIX_EPOCH
    });

    Post {
        owner_id,
        community_name: community_name.to_owned(),
        post_id: Post::key(owner_id, item.id),
        published_at,
        text: extract_full_text(item),
        like_count: item.likes.count,
        repost_count: item.reposts.count,
        comment_count: item.comments.count,
        url: Post::wall_url(owner_id, item.id),
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
