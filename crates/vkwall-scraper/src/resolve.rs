//! Community identifier resolution.

use vkwall_core::CommunityRef;

use crate::error::{CollectError, VkError, CODE_ACCESS_DENIED, CODE_INVALID_IDENTIFIER};
use crate::rate_limit::RateLimiter;
use crate::source::PostSource;
use crate::types::CommunityInfo;

/// A community reference turned into a wall owner id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCommunity {
    pub owner_id: i64,
    /// Metadata from the lookup, present only when a slug was resolved.
    pub info: Option<CommunityInfo>,
}

/// Resolves `community` to a signed owner id.
///
/// Numeric ids are returned unchanged without touching the network. Slugs
/// cost one rate-limited `lookup_community` call and resolve to the negated
/// community id.
///
/// # Errors
///
/// - [`CollectError::NotFound`] if the lookup matched nothing or VK rejected
///   the identifier.
/// - [`CollectError::PrivateOrRestricted`] if VK denied access.
/// - [`CollectError::RemoteApi`] for any other API error.
/// - [`CollectError::Client`] on transport or decoding failure.
pub async fn resolve_community<S: PostSource>(
    source: &S,
    limiter: &mut RateLimiter,
    community: &CommunityRef,
) -> Result<ResolvedCommunity, CollectError> {
    let slug = match community {
        CommunityRef::Id(id) => {
            return Ok(ResolvedCommunity {
                owner_id: *id,
                info: None,
            })
        }
        CommunityRef::Slug(slug) => slug,
    };

    limiter.wait().await;
    let found = source
        .lookup_community(slug)
        .await
        .map_err(|err| classify_lookup_error(slug, err))?;

    let info = found.into_iter().next().ok_or_else(|| CollectError::NotFound {
        community: slug.clone(),
    })?;
    tracing::debug!(slug, id = info.id, name = %info.name, "resolved community");

    Ok(ResolvedCommunity {
        owner_id: -info.id,
        info: Some(info),
    })
}

fn classify_lookup_error(slug: &str, err: VkError) -> CollectError {
    match err.api_code() {
        Some(CODE_ACCESS_DENIED) => CollectError::PrivateOrRestricted {
            community: slug.to_owned(),
        },
        Some(CODE_INVALID_IDENTIFIER) => CollectError::NotFound {
            community: slug.to_owned(),
        },
        _ => err.into(),
    }
}
