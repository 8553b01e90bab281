//! HTTP client for the VK REST API.
//!
//! Wraps `reqwest` with VK's `{"response"}` / `{"error"}` envelope handling,
//! access-token management, and typed response deserialization. API-level
//! errors surface as [`VkError::Api`] carrying the provider code verbatim;
//! the client itself never retries, throttling is the collector's concern.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::error::VkError;
use crate::types::{ApiEnvelope, CommunityInfo, GroupsByIdResponse, UserInfo, WallPage};

pub const DEFAULT_BASE_URL: &str = "https://api.vk.com";
pub const DEFAULT_API_VERSION: &str = "5.199";

/// Client for the VK REST API.
///
/// Use [`VkClient::new`] for production or [`VkClient::with_base_url`] to
/// point at a mock server in tests.
pub struct VkClient {
    client: Client,
    token: String,
    api_version: String,
    base_url: Url,
}

impl std::fmt::Debug for VkClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VkClient")
            .field("token", &"[redacted]")
            .field("api_version", &self.api_version)
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl VkClient {
    /// Creates a new client pointed at the production VK API.
    ///
    /// # Errors
    ///
    /// Returns [`VkError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(token: &str, timeout_secs: u64) -> Result<Self, VkError> {
        Self::with_base_url(token, DEFAULT_API_VERSION, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL and API version.
    ///
    /// # Errors
    ///
    /// Returns [`VkError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`VkError::InvalidBaseUrl`] if `base_url`
    /// is not a valid URL.
    pub fn with_base_url(
        token: &str,
        api_version: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, VkError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("vkwall/0.1 (wall-collector)")
            .build()?;

        // Exactly one trailing slash so `join("method/..")` appends rather
        // than replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| VkError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            token: token.to_owned(),
            api_version: api_version.to_owned(),
            base_url,
        })
    }

    /// Looks up communities by screen name or numeric id via `groups.getById`.
    ///
    /// An empty vector means the identifier matched nothing.
    ///
    /// # Errors
    ///
    /// - [`VkError::Api`] if VK answers with an error envelope.
    /// - [`VkError::Http`] on network failure or non-2xx HTTP status.
    /// - [`VkError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub async fn lookup_community(&self, identifier: &str) -> Result<Vec<CommunityInfo>, VkError> {
        let response: GroupsByIdResponse = self
            .call("groups.getById", &[("group_id", identifier)])
            .await?;
        Ok(response.into_groups())
    }

    /// Returns the account the token belongs to (`users.get` without ids).
    ///
    /// Used only to validate a token before it is saved.
    ///
    /// # Errors
    ///
    /// Same as [`VkClient::lookup_community`]; additionally
    /// [`VkError::MissingResponse`] if VK returns an empty user list.
    pub async fn get_self(&self) -> Result<UserInfo, VkError> {
        let users: Vec<UserInfo> = self.call("users.get", &[]).await?;
        users
            .into_iter()
            .next()
            .ok_or_else(|| VkError::MissingResponse {
                method: "users.get".to_owned(),
            })
    }

    /// Fetches one page of a wall, newest post first.
    ///
    /// # Errors
    ///
    /// Same as [`VkClient::lookup_community`].
    pub async fn list_posts(
        &self,
        owner_id: i64,
        count: u32,
        offset: u32,
    ) -> Result<WallPage, VkError> {
        let owner = owner_id.to_string();
        let count = count.to_string();
        let offset = offset.to_string();
        self.call(
            "wall.get",
            &[
                ("owner_id", owner.as_str()),
                ("count", count.as_str()),
                ("offset", offset.as_str()),
                ("extended", "0"),
            ],
        )
        .await
    }

    /// Builds `{base}/method/{method}?access_token=..&v=..&extra..` with
    /// percent-encoded query parameters.
    fn build_url(&self, method: &str, extra: &[(&str, &str)]) -> Result<Url, VkError> {
        let mut url = self
            .base_url
            .join(&format!("method/{method}"))
            .map_err(|e| VkError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in extra {
                pairs.append_pair(k, v);
            }
            pairs.append_pair("access_token", &self.token);
            pairs.append_pair("v", &self.api_version);
        }
        Ok(url)
    }

    /// Sends one API call and unwraps the envelope.
    ///
    /// The URL carries the token, so it is stripped from transport errors
    /// and never logged; the method name is used instead.
    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        extra: &[(&str, &str)],
    ) -> Result<T, VkError> {
        let url = self.build_url(method, extra)?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(reqwest::Error::without_url)?;
        let body = response.text().await.map_err(reqwest::Error::without_url)?;
        Self::parse_envelope(method, &body)
    }

    fn parse_envelope<T: DeserializeOwned>(method: &str, body: &str) -> Result<T, VkError> {
        let envelope: ApiEnvelope<T> =
            serde_json::from_str(body).map_err(|e| VkError::Deserialize {
                context: method.to_owned(),
                source: e,
            })?;

        if let Some(err) = envelope.error {
            tracing::debug!(method, code = err.error_code, "VK returned an error envelope");
            return Err(VkError::Api {
                code: err.error_code,
                message: err.error_msg,
            });
        }

        envelope.response.ok_or_else(|| VkError::MissingResponse {
            method: method.to_owned(),
        })
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
