use thiserror::Error;

/// VK error code: too many requests per second.
pub const CODE_TOO_MANY_REQUESTS: i64 = 6;
/// VK error code: access denied (private or closed community).
pub const CODE_ACCESS_DENIED: i64 = 15;
/// VK error code: page removed or blocked.
pub const CODE_PAGE_REMOVED: i64 = 18;
/// VK error code: invalid community identifier.
pub const CODE_INVALID_IDENTIFIER: i64 = -1113;

/// Errors returned by the VK API client.
#[derive(Debug, Error)]
pub enum VkError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with an `{"error": {...}}` envelope.
    #[error("VK API error {code}: {message}")]
    Api { code: i64, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The envelope carried neither `response` nor `error`.
    #[error("empty response from {method}")]
    MissingResponse { method: String },

    #[error("invalid API base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

impl VkError {
    /// The provider error code, if this is an API-level error.
    #[must_use]
    pub fn api_code(&self) -> Option<i64> {
        match self {
            VkError::Api { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Per-community collection failures.
///
/// None of these abort a multi-community run; the caller records them and
/// moves on to the next community.
#[derive(Debug, Error)]
pub enum CollectError {
    #[error("community '{community}' not found")]
    NotFound { community: String },

    #[error("community '{community}' is private or access is restricted")]
    PrivateOrRestricted { community: String },

    #[error("VK API error ({code}): {message}")]
    RemoteApi { code: i64, message: String },

    /// Transport or decoding failure, passed through unchanged.
    #[error(transparent)]
    Client(VkError),
}

impl From<VkError> for CollectError {
    fn from(err: VkError) -> Self {
        match err {
            VkError::Api { code, message } => CollectError::RemoteApi { code, message },
            other => CollectError::Client(other),
        }
    }
}
