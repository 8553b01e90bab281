use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use tokio::sync::mpsc;
use vkwall_scraper::{CommunityInfo, RateLimiter, UserInfo, VkError, WallItem, WallPage};

use super::*;

/// In-memory source: slugs map to communities, owner ids to walls.
#[derive(Default)]
struct FakeSource {
    communities: HashMap<String, CommunityInfo>,
    denied: Vec<String>,
    walls: HashMap<i64, Vec<WallItem>>,
    /// Set when the wall of this owner is first requested.
    trip_on_wall: Option<(i64, Arc<AtomicBool>)>,
}

impl FakeSource {
    fn community(mut self, slug: &str, id: i64, name: &str, wall: Vec<WallItem>) -> Self {
        self.communities.insert(
            slug.to_owned(),
            CommunityInfo {
                id,
                name: name.to_owned(),
                screen_name: Some(slug.to_owned()),
            },
        );
        self.walls.insert(-id, wall);
        self
    }

    fn private(mut self, slug: &str) -> Self {
        self.denied.push(slug.to_owned());
        self
    }
}

impl PostSource for FakeSource {
    fn lookup_community(
        &self,
        identifier: &str,
    ) -> impl Future<Output = Result<Vec<CommunityInfo>, VkError>> + Send {
        let result = if self.denied.iter().any(|d| d == identifier) {
            Err(VkError::Api {
                code: 15,
                message: "Access denied".to_owned(),
            })
        } else {
            Ok(self.communities.get(identifier).cloned().into_iter().collect())
        };
        async move { result }
    }

    fn get_self(&self) -> impl Future<Output = Result<UserInfo, VkError>> + Send {
        async {
            Err(VkError::MissingResponse {
                method: "users.get".to_owned(),
            })
        }
    }

    fn list_posts(
        &self,
        owner_id: i64,
        count: u32,
        offset: u32,
    ) -> impl Future<Output = Result<WallPage, VkError>> + Send {
        if let Some((owner, flag)) = &self.trip_on_wall {
            if *owner == owner_id {
                flag.store(true, Ordering::Relaxed);
            }
        }
        let wall = self.walls.get(&owner_id).cloned().unwrap_or_default();
        let items = wall
            .into_iter()
            .skip(offset as usize)
            .take(count as usize)
            .collect();
        async move { Ok(WallPage { count: 0, items }) }
    }
}

/// 2024-03-01 .. 2024-03-31.
fn march() -> CollectionWindow {
    CollectionWindow::new(
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
    )
    .unwrap()
}

/// 2024-03-15T00:00:00Z.
const MID_MARCH: i64 = 1_710_460_800;

fn posts(n: i64) -> Vec<WallItem> {
    (0..n)
        .map(|i| WallItem {
            id: n - i,
            date: MID_MARCH - i * 3600,
            text: format!("post {}", n - i),
            ..WallItem::default()
        })
        .collect()
}

fn slug(s: &str) -> CommunityRef {
    CommunityRef::Slug(s.to_owned())
}

fn engine(source: FakeSource) -> CollectionEngine<FakeSource> {
    CollectionEngine::new(source, RateLimiter::new(Duration::ZERO))
}

fn drain(rx: &mut mpsc::UnboundedReceiver<CollectEvent>) -> Vec<CollectEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

#[tokio::test]
async fn failed_community_is_recorded_and_run_continues() {
    let source = FakeSource::default()
        .community("first", 10, "First", posts(3))
        .private("closed");
    let mut engine = engine(source);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let cancel = AtomicBool::new(false);

    let report = run_collection(
        &mut engine,
        &[slug("first"), slug("closed")],
        &march(),
        &cancel,
        &tx,
    )
    .await;

    assert_eq!(report.posts.len(), 3);
    assert!(report.posts.iter().all(|p| p.owner_id == -10));
    assert_eq!(report.completed.len(), 1);
    assert_eq!(report.completed[0].name, "First");
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].community, "closed");
    assert!(matches!(
        report.failures[0].error,
        CollectError::PrivateOrRestricted { .. }
    ));
    assert!(!report.cancelled);

    let events = drain(&mut rx);
    assert_eq!(events.len(), 4);
    assert_eq!(
        events[1],
        CollectEvent::Finished {
            community: "first".to_owned(),
            name: "First".to_owned(),
            collected: 3,
            status: CompletionStatus::EndOfHistory,
        }
    );
    assert!(matches!(events[3], CollectEvent::Failed { ref community, .. } if community == "closed"));
}

#[tokio::test]
async fn posts_are_concatenated_in_submission_order() {
    let source = FakeSource::default()
        .community("b", 2, "B", posts(2))
        .community("a", 1, "A", posts(2));
    let mut engine = engine(source);
    let (tx, _rx) = mpsc::unbounded_channel();

    let report = run_collection(
        &mut engine,
        &[slug("b"), slug("a")],
        &march(),
        &AtomicBool::new(false),
        &tx,
    )
    .await;

    let ids: Vec<&str> = report.posts.iter().map(|p| p.post_id.as_str()).collect();
    assert_eq!(ids, vec!["-2_2", "-2_1", "-1_2", "-1_1"]);
}

#[tokio::test]
async fn cancellation_before_start_collects_nothing() {
    let source = FakeSource::default().community("a", 1, "A", posts(2));
    let mut engine = engine(source);
    let (tx, mut rx) = mpsc::unbounded_channel();

    let report = run_collection(
        &mut engine,
        &[slug("a"), slug("a")],
        &march(),
        &AtomicBool::new(true),
        &tx,
    )
    .await;

    assert!(report.cancelled);
    assert!(report.posts.is_empty());
    assert_eq!(drain(&mut rx), vec![CollectEvent::Cancelled { remaining: 2 }]);
}

#[tokio::test]
async fn cancellation_takes_effect_after_current_community() {
    let flag = Arc::new(AtomicBool::new(false));
    let mut source = FakeSource::default()
        .community("a", 1, "A", posts(2))
        .community("b", 2, "B", posts(2));
    source.trip_on_wall = Some((-1, Arc::clone(&flag)));
    let mut engine = engine(source);
    let (tx, _rx) = mpsc::unbounded_channel();

    let report = run_collection(&mut engine, &[slug("a"), slug("b")], &march(), &flag, &tx).await;

    assert!(report.cancelled);
    assert_eq!(report.completed.len(), 1);
    assert_eq!(report.posts.len(), 2, "first community finishes despite the flag");
}

#[tokio::test]
async fn dropped_receiver_does_not_stop_the_run() {
    let source = FakeSource::default().community("a", 1, "A", posts(1));
    let mut engine = engine(source);
    let (tx, rx) = mpsc::unbounded_channel();
    drop(rx);

    let report = run_collection(
        &mut engine,
        &[slug("a")],
        &march(),
        &AtomicBool::new(false),
        &tx,
    )
    .await;

    assert_eq!(report.posts.len(), 1);
}

#[test]
fn partial_lists_only_incomplete_communities() {
    let summary = |status| CommunitySummary {
        community: "x".to_owned(),
        owner_id: -1,
        name: "X".to_owned(),
        collected: 0,
        status,
    };
    let report = CollectionReport {
        completed: vec![
            summary(CompletionStatus::EarlyExit),
            summary(CompletionStatus::CapReached),
            summary(CompletionStatus::AccessDenied),
        ],
        ..CollectionReport::default()
    };
    assert_eq!(report.partial().count(), 2);
}
