//! Paginated wall collection for a single community.
//!
//! [`CollectionEngine::collect`] resolves the community, then walks its wall
//! newest-first in fixed-size pages until one of four things happens: a post
//! older than the window appears, the wall runs out, the scan cap is hit, or
//! VK revokes access partway through. Every one of those ends with the posts
//! gathered so far; only resolution failures and unclassified API errors are
//! returned as [`CollectError`].

use std::collections::HashSet;
use std::time::Duration;

use vkwall_core::{CollectionWindow, CommunityRef, Post};

use crate::error::{CollectError, CODE_ACCESS_DENIED, CODE_PAGE_REMOVED};
use crate::normalize::normalize_post;
use crate::rate_limit::{retry_while_throttled, RateLimiter, DEFAULT_THROTTLE_BACKOFF};
use crate::resolve::{resolve_community, ResolvedCommunity};
use crate::source::PostSource;

/// Items requested per `wall.get` call; VK's maximum.
pub const PAGE_SIZE: u32 = 100;

/// VK refuses offsets beyond this many posts on a single wall.
pub const MAX_SCANNED: u32 = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectOptions {
    pub page_size: u32,
    pub max_scanned: u32,
    pub throttle_backoff: Duration,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            page_size: PAGE_SIZE,
            max_scanned: MAX_SCANNED,
            throttle_backoff: DEFAULT_THROTTLE_BACKOFF,
        }
    }
}

/// Why pagination stopped for a community.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionStatus {
    /// The wall had no more posts.
    EndOfHistory,
    /// A post older than the window was reached.
    EarlyExit,
    /// The scan cap was hit; older in-window posts may exist.
    CapReached,
    /// VK denied access or reported the wall removed mid-pagination.
    AccessDenied,
}

impl CompletionStatus {
    /// `true` when every in-window post was seen.
    #[must_use]
    pub fn is_complete(self) -> bool {
        matches!(self, Self::EndOfHistory | Self::EarlyExit)
    }
}

impl std::fmt::Display for CompletionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::EndOfHistory => "end of history",
            Self::EarlyExit => "reached start of window",
            Self::CapReached => "scan limit reached",
            Self::AccessDenied => "access denied mid-collection",
        };
        f.write_str(label)
    }
}

/// The result of collecting one community.
#[derive(Debug, Clone)]
pub struct CommunityPosts {
    pub owner_id: i64,
    pub community_name: String,
    /// In-window posts, newest first, as VK delivered them.
    pub posts: Vec<Post>,
    pub status: CompletionStatus,
    /// Raw items fetched, in or out of the window.
    pub scanned: u32,
}

/// Collects posts from one community at a time through a [`PostSource`].
///
/// The engine owns its [`RateLimiter`], so independent engines never pace
/// each other.
#[derive(Debug)]
pub struct CollectionEngine<S> {
    source: S,
    limiter: RateLimiter,
    options: CollectOptions,
}

impl<S: PostSource> CollectionEngine<S> {
    pub fn new(source: S, limiter: RateLimiter) -> Self {
        Self {
            source,
            limiter,
            options: CollectOptions::default(),
        }
    }

    /// Replaces the collection options. A zero `page_size` is raised to 1.
    #[must_use]
    pub fn with_options(mut self, options: CollectOptions) -> Self {
        self.options = CollectOptions {
            page_size: options.page_size.max(1),
            ..options
        };
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn options(&self) -> &CollectOptions {
        &self.options
    }

    /// Resolves a community reference through this engine's source and limiter.
    ///
    /// # Errors
    ///
    /// See [`resolve_community`].
    pub async fn resolve(
        &mut self,
        community: &CommunityRef,
    ) -> Result<ResolvedCommunity, CollectError> {
        resolve_community(&self.source, &mut self.limiter, community).await
    }

    /// Collects every post of `community` published inside `window`.
    ///
    /// # Errors
    ///
    /// - Resolution failures, see [`resolve_community`].
    /// - [`CollectError::RemoteApi`] for a page error other than throttling,
    ///   access denied or page removed.
    /// - [`CollectError::Client`] on transport or decoding failure.
    pub async fn collect(
        &mut self,
        community: &CommunityRef,
        window: &CollectionWindow,
    ) -> Result<CommunityPosts, CollectError> {
        let resolved = self.resolve(community).await?;
        let owner_id = resolved.owner_id;
        let community_name = match resolved.info {
            Some(info) if !info.name.is_empty() => info.name,
            _ => self.display_name(owner_id).await,
        };

        tracing::info!(
            community = %community,
            owner_id,
            name = %community_name,
            from = %window.date_from(),
            to = %window.date_to(),
            "collecting wall"
        );

        let (ts_from, ts_to) = window.epoch_bounds();
        let CollectOptions {
            page_size,
            max_scanned,
            throttle_backoff,
        } = self.options;
        let source = &self.source;

        let mut posts = Vec::new();
        let mut seen = HashSet::new();
        let mut offset: u32 = 0;

        let status = 'pages: loop {
            if offset >= max_scanned {
                tracing::warn!(
                    owner_id,
                    max_scanned,
                    collected = posts.len(),
                    "scan limit reached; older posts in the window were not collected"
                );
                break CompletionStatus::CapReached;
            }

            let count = page_size.min(max_scanned - offset);
            let page = match retry_while_throttled(&mut self.limiter, throttle_backoff, || {
                source.list_posts(owner_id, count, offset)
            })
            .await
            {
                Ok(page) => page,
                Err(err)
                    if matches!(err.api_code(), Some(CODE_ACCESS_DENIED | CODE_PAGE_REMOVED)) =>
                {
                    tracing::warn!(
                        owner_id,
                        offset,
                        collected = posts.len(),
                        error = %err,
                        "wall became unavailable; keeping posts collected so far"
                    );
                    break CompletionStatus::AccessDenied;
                }
                Err(err) => return Err(err.into()),
            };

            let fetched = page.items.len();
            tracing::debug!(owner_id, offset, fetched, total = page.count, "fetched wall page");

            for item in &page.items {
                if item.date < ts_from {
                    break 'pages CompletionStatus::EarlyExit;
                }
                if item.date > ts_to {
                    continue;
                }
                if !seen.insert(item.id) {
                    tracing::debug!(owner_id, post = item.id, "skipping duplicate post");
                    continue;
                }
                posts.push(normalize_post(item, owner_id, &community_name));
            }

            offset = offset.saturating_add(u32::try_from(fetched).unwrap_or(u32::MAX));
            if fetched < count as usize {
                break CompletionStatus::EndOfHistory;
            }
        };

        tracing::info!(
            owner_id,
            collected = posts.len(),
            scanned = offset,
            status = %status,
            "finished wall"
        );

        Ok(CommunityPosts {
            owner_id,
            community_name,
            posts,
            status,
            scanned: offset,
        })
    }

    /// Looks up a display name for a numeric owner id, falling back to
    /// `group_{id}` on any failure. Positive ids are user walls and are never
    /// looked up as communities.
    async fn display_name(&mut self, owner_id: i64) -> String {
        let fallback = format!("group_{}", owner_id.unsigned_abs());
        if owner_id > 0 {
            return fallback;
        }
        self.limiter.wait().await;
        match self
            .source
            .lookup_community(&owner_id.unsigned_abs().to_string())
            .await
        {
            Ok(found) => found
                .into_iter()
                .next()
                .map(|info| info.name)
                .filter(|name| !name.is_empty())
                .unwrap_or(fallback),
            Err(err) => {
                tracing::warn!(owner_id, error = %err, "community name lookup failed; using placeholder");
                fallback
            }
        }
    }
}
