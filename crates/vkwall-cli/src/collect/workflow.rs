//! Multi-community collection run.
//!
//! Communities are collected one at a time, in the order given, through a
//! single engine so every request shares one rate limiter. A failure for one
//! community is recorded and the run moves on. Progress is reported on an
//! event channel so the caller can display it while the run is in flight.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::mpsc::UnboundedSender;
use vkwall_core::{CollectionWindow, CommunityRef, Post};
use vkwall_scraper::{CollectError, CollectionEngine, CompletionStatus, PostSource};

/// Progress notifications emitted during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CollectEvent {
    Started {
        community: String,
        position: usize,
        total: usize,
    },
    Finished {
        community: String,
        name: String,
        collected: usize,
        status: CompletionStatus,
    },
    Failed {
        community: String,
        error: String,
    },
    Cancelled {
        remaining: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CommunitySummary {
    pub community: String,
    pub owner_id: i64,
    pub name: String,
    pub collected: usize,
    pub status: CompletionStatus,
}

#[derive(Debug)]
pub(crate) struct CommunityFailure {
    pub community: String,
    pub error: CollectError,
}

/// Everything a run produced.
#[derive(Debug, Default)]
pub(crate) struct CollectionReport {
    /// Posts from all communities, concatenated in submission order.
    pub posts: Vec<Post>,
    pub completed: Vec<CommunitySummary>,
    pub failures: Vec<CommunityFailure>,
    pub cancelled: bool,
}

impl CollectionReport {
    /// Communities whose result may be missing in-window posts.
    pub(crate) fn partial(&self) -> impl Iterator<Item = &CommunitySummary> {
        self.completed.iter().filter(|s| !s.status.is_complete())
    }
}

/// Collects `communities` in order, checking `cancel` before each one.
///
/// Cancellation never interrupts a community mid-pagination; the posts of
/// communities finished before the flag was seen are kept.
pub(crate) async fn run_collection<S: PostSource>(
    engine: &mut CollectionEngine<S>,
    communities: &[CommunityRef],
    window: &CollectionWindow,
    cancel: &AtomicBool,
    events: &UnboundedSender<CollectEvent>,
) -> CollectionReport {
    let mut report = CollectionReport::default();
    let total = communities.len();

    for (index, community) in communities.iter().enumerate() {
        if cancel.load(Ordering::Relaxed) {
            let remaining = total - index;
            tracing::warn!(remaining, "collection cancelled");
            emit(events, CollectEvent::Cancelled { remaining });
            report.cancelled = true;
            break;
        }

        let label = community.to_string();
        emit(
            events,
            CollectEvent::Started {
                community: label.clone(),
                position: index + 1,
                total,
            },
        );

        match engine.collect(community, window).await {
            Ok(result) => {
                let collected = result.posts.len();
                emit(
                    events,
                    CollectEvent::Finished {
                        community: label.clone(),
                        name: result.community_name.clone(),
                        collected,
                        status: result.status,
                    },
                );
                report.completed.push(CommunitySummary {
                    community: label,
                    owner_id: result.owner_id,
                    name: result.community_name,
                    collected,
                    status: result.status,
                });
                report.posts.extend(result.posts);
            }
            Err(error) => {
                tracing::error!(community = %label, error = %error, "community collection failed");
                emit(
                    events,
                    CollectEvent::Failed {
                        community: label.clone(),
                        error: error.to_string(),
                    },
                );
                report.failures.push(CommunityFailure {
                    community: label,
                    error,
                });
            }
        }
    }

    tracing::info!(
        posts = report.posts.len(),
        communities = report.completed.len(),
        failed = report.failures.len(),
        cancelled = report.cancelled,
        "collection run finished"
    );
    report
}

/// A closed receiver only means nobody is watching; the run carries on.
fn emit(events: &UnboundedSender<CollectEvent>, event: CollectEvent) {
    if events.send(event).is_err() {
        tracing::debug!("event receiver dropped");
    }
}

#[cfg(test)]
#[path = "workflow_test.rs"]
mod tests;
