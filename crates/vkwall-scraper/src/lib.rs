pub mod client;
pub mod collector;
pub mod error;
pub mod normalize;
pub mod rate_limit;
pub mod resolve;
pub mod source;
pub mod types;

pub use client::VkClient;
pub use collector::{CollectOptions, CollectionEngine, CommunityPosts, CompletionStatus};
pub use error::{CollectError, VkError};
pub use normalize::{clean_mentions, extract_full_text, normalize_post};
pub use rate_limit::RateLimiter;
pub use resolve::{resolve_community, ResolvedCommunity};
pub use source::PostSource;
pub use types::{CommunityInfo, Counter, SharedItem, UserInfo, WallItem, WallPage};
