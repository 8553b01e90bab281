//! VK API response types.
//!
//! Every response arrives as either `{"response": ...}` or
//! `{"error": {"error_code": .., "error_msg": ..}}`; [`ApiEnvelope`] captures
//! both shapes. Only the fields the collector reads are modelled; everything
//! else in the payload is ignored.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct ApiEnvelope<T> {
    pub response: Option<T>,
    pub error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub error_code: i64,
    #[serde(default)]
    pub error_msg: String,
}

/// A community as returned by `groups.getById`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommunityInfo {
    /// Positive community id; wall owner ids are its negation.
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub screen_name: Option<String>,
}

/// `groups.getById` answers a bare array on older API versions and
/// `{"groups": [...], "profiles": [...]}` on newer ones.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum GroupsByIdResponse {
    Wrapped { groups: Vec<CommunityInfo> },
    Bare(Vec<CommunityInfo>),
}

impl GroupsByIdResponse {
    pub(crate) fn into_groups(self) -> Vec<CommunityInfo> {
        match self {
            GroupsByIdResponse::Wrapped { groups } | GroupsByIdResponse::Bare(groups) => groups,
        }
    }
}

/// The account the access token belongs to, from `users.get`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserInfo {
    pub id: i64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl std::fmt::Display for UserInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} (id{})", self.first_name, self.last_name, self.id)
    }
}

/// One page of `wall.get`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WallPage {
    /// Total number of posts on the wall (not the page size).
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub items: Vec<WallItem>,
}

/// A raw wall post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct WallItem {
    pub id: i64,
    /// Publish time, epoch seconds.
    #[serde(default)]
    pub date: i64,
    #[serde(default)]
    pub text: String,
    /// Reposted content; the first entry is the post that was shared.
    #[serde(default)]
    pub copy_history: Vec<SharedItem>,
    #[serde(default)]
    pub likes: Counter,
    #[serde(default)]
    pub reposts: Counter,
    #[serde(default)]
    pub comments: Counter,
}

/// Nested record for shared/reposted content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SharedItem {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub owner_id: i64,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Counter {
    #[serde(default)]
    pub count: u64,
}
