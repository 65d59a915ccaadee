//! Orchestrator tests against the in-memory repository and recording publishers.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use herald_core::{
    Company, ContentItem, ContentItemBuilder, ContentStatus, ContentType, LinkedAccount,
    MediaField, Platform, Strategy, StrategyStatus,
};
use herald_error::{
    ContentErrorKind, DatabaseError, DatabaseErrorKind, HeraldErrorKind, HeraldResult,
    PublishError, PublishErrorKind,
};
use herald_interface::{
    ContentRepository, InMemoryContentRepository, PlatformPublisher, PostId, PublishTarget,
    TokenCipher,
};
use herald_schedule::{
    FixedClock, OrchestratorSettings, OrchestratorSettingsBuilder, PostingOrchestrator,
    ScheduleEvaluator,
};
use herald_social::PublisherRegistry;
use herald_storage::RetryPolicy;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const USER: i32 = 10;
const COMPANY: i32 = 1;
const STRATEGY: i32 = 3;

// 2024-01-01 is a Monday.
fn monday(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Call {
    action: &'static str,
    target: String,
    token: String,
    media: Option<String>,
    text: String,
}

/// Records every call; fails when the text contains "FAIL".
struct RecordingPublisher {
    platform: Platform,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl RecordingPublisher {
    fn new(platform: Platform) -> (Self, Arc<Mutex<Vec<Call>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                platform,
                calls: calls.clone(),
            },
            calls,
        )
    }

    fn record(
        &self,
        action: &'static str,
        target: &PublishTarget,
        token: &str,
        media: Option<&str>,
        text: &str,
    ) -> HeraldResult<PostId> {
        let mut calls = self.calls.lock().unwrap();
        calls.push(Call {
            action,
            target: target.0.clone(),
            token: token.to_string(),
            media: media.map(String::from),
            text: text.to_string(),
        });
        if text.contains("FAIL") {
            return Err(PublishError::new(PublishErrorKind::Rejected {
                status_code: 400,
                message: "invalid parameter".to_string(),
            })
            .into());
        }
        Ok(PostId(format!("post-{}", calls.len())))
    }
}

#[async_trait]
impl PlatformPublisher for RecordingPublisher {
    fn platform(&self) -> Platform {
        self.platform
    }

    fn target_for(&self, account: &LinkedAccount) -> Result<PublishTarget, PublishError> {
        account
            .page_id()
            .clone()
            .map(PublishTarget)
            .ok_or_else(|| {
                PublishError::new(PublishErrorKind::MissingAccountField("page_id".to_string()))
            })
    }

    async fn publish_text(
        &self,
        target: &PublishTarget,
        token: &str,
        text: &str,
    ) -> HeraldResult<PostId> {
        self.record("text", target, token, None, text)
    }

    async fn publish_image(
        &self,
        target: &PublishTarget,
        token: &str,
        image_url: &str,
        caption: &str,
    ) -> HeraldResult<PostId> {
        self.record("image", target, token, Some(image_url), caption)
    }

    async fn publish_video(
        &self,
        target: &PublishTarget,
        token: &str,
        video_url: &str,
        caption: &str,
    ) -> HeraldResult<PostId> {
        self.record("video", target, token, Some(video_url), caption)
    }

    async fn publish_story(
        &self,
        target: &PublishTarget,
        token: &str,
        image_url: &str,
    ) -> HeraldResult<PostId> {
        self.record("story", target, token, Some(image_url), "")
    }

    async fn publish_reel(
        &self,
        target: &PublishTarget,
        token: &str,
        video_url: &str,
        caption: &str,
    ) -> HeraldResult<PostId> {
        self.record("reel", target, token, Some(video_url), caption)
    }
}

/// Tokens are stored as `enc:<plaintext>`.
struct PrefixCipher;

impl TokenCipher for PrefixCipher {
    fn decrypt(&self, encrypted: &str) -> Result<String, PublishError> {
        encrypted
            .strip_prefix("enc:")
            .map(String::from)
            .ok_or_else(|| PublishError::new(PublishErrorKind::Decrypt("bad token".to_string())))
    }

    fn encrypt(&self, plaintext: &str) -> String {
        format!("enc:{}", plaintext)
    }
}

fn item(id: i32, platform: Platform, content_type: ContentType, best_time: &str) -> ContentItem {
    ContentItemBuilder::default()
        .id(id)
        .company_id(COMPANY)
        .strategy_id(STRATEGY)
        .user_id(USER)
        .platform(platform)
        .content_type(content_type)
        .caption("Fresh bread daily")
        .hashtags(Some("#bakery".to_string()))
        .media_link(Some(format!("https://cdn.example/{}.png", id)))
        .best_time(best_time)
        .status(ContentStatus::Approved)
        .build()
        .unwrap()
}

fn account(platform: Platform, page: &str) -> LinkedAccount {
    LinkedAccount::new(
        USER,
        platform,
        None,
        Some(page.to_string()),
        Some(page.to_string()),
        "enc:page-token",
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    )
}

struct Fixture {
    repository: Arc<InMemoryContentRepository>,
    orchestrator: PostingOrchestrator,
    facebook: Arc<Mutex<Vec<Call>>>,
    instagram: Arc<Mutex<Vec<Call>>>,
}

async fn seeded_repository() -> Arc<InMemoryContentRepository> {
    let repository = Arc::new(InMemoryContentRepository::new());
    repository
        .insert_company(Company::new(COMPANY, USER, "Acme Bakery", None, None))
        .await;
    repository
        .insert_strategy(Strategy::new(
            STRATEGY,
            COMPANY,
            StrategyStatus::Approved,
            Some(Utc.with_ymd_and_hms(2023, 12, 31, 12, 0, 0).unwrap()),
        ))
        .await;
    repository
        .insert_linked_account(account(Platform::Facebook, "page-1"))
        .await;
    repository
        .insert_linked_account(account(Platform::Instagram, "ig-1"))
        .await;
    repository
}

/// Orchestrator writing through `store`, inspected through `repository`.
fn fixture_over(
    repository: Arc<InMemoryContentRepository>,
    store: Arc<dyn ContentRepository>,
    now: NaiveDateTime,
    settings: OrchestratorSettings,
) -> Fixture {
    let (facebook, facebook_calls) = RecordingPublisher::new(Platform::Facebook);
    let (instagram, instagram_calls) = RecordingPublisher::new(Platform::Instagram);
    let mut publishers = PublisherRegistry::new();
    publishers.register(facebook).register(instagram);

    let orchestrator = PostingOrchestrator::new(
        store,
        publishers,
        Arc::new(PrefixCipher),
        ScheduleEvaluator::new(Arc::new(FixedClock(now))),
        settings,
    );

    Fixture {
        repository,
        orchestrator,
        facebook: facebook_calls,
        instagram: instagram_calls,
    }
}

async fn fixture_with(now: NaiveDateTime, settings: OrchestratorSettings) -> Fixture {
    let repository = seeded_repository().await;
    fixture_over(repository.clone(), repository, now, settings)
}

async fn fixture(now: NaiveDateTime) -> Fixture {
    let settings = OrchestratorSettingsBuilder::default()
        .past_due_delay(Duration::ZERO)
        .build()
        .unwrap();
    fixture_with(now, settings).await
}

async fn status_of(repository: &InMemoryContentRepository, id: i32) -> ContentStatus {
    repository.item(id).await.unwrap().status
}

#[tokio::test]
async fn test_facebook_image_posted_at_slot() {
    let f = fixture(monday(9, 5)).await;
    f.repository
        .insert_item(item(1, Platform::Facebook, ContentType::ImagePost, "Monday 9AM"))
        .await;

    let report = f.orchestrator.check_due(COMPANY).await.unwrap();

    assert_eq!(report.posted_count(), 1);
    assert!(report.failed().is_empty());
    assert_eq!(*report.strategy_id(), Some(STRATEGY));
    assert!(!report.posted()[0].was_past_due());

    let calls = f.facebook.lock().unwrap().clone();
    assert_eq!(
        calls,
        vec![Call {
            action: "image",
            target: "page-1".to_string(),
            token: "page-token".to_string(),
            media: Some("https://cdn.example/1.png".to_string()),
            text: "Fresh bread daily #bakery".to_string(),
        }]
    );
    assert_eq!(status_of(&f.repository, 1).await, ContentStatus::Posted);
}

#[tokio::test]
async fn test_repeated_sweeps_publish_once() {
    let f = fixture(monday(9, 5)).await;
    f.repository
        .insert_item(item(1, Platform::Facebook, ContentType::ImagePost, "Monday 9AM"))
        .await;

    let first = f.orchestrator.check_due(COMPANY).await.unwrap();
    let second = f.orchestrator.check_due(COMPANY).await.unwrap();

    assert_eq!(first.posted_count(), 1);
    assert_eq!(second.posted_count(), 0);
    assert_eq!(f.facebook.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_review_window_does_not_auto_post() {
    let f = fixture(monday(8, 30)).await;
    f.repository
        .insert_item(item(1, Platform::Facebook, ContentType::ImagePost, "Monday 9AM"))
        .await;

    let report = f.orchestrator.check_due(COMPANY).await.unwrap();
    assert_eq!(report.posted_count(), 0);
    assert_eq!(status_of(&f.repository, 1).await, ContentStatus::Approved);
}

#[tokio::test]
async fn test_failure_returns_item_to_review_and_sweep_continues() {
    let f = fixture(monday(10, 0)).await;
    let mut failing = item(1, Platform::Facebook, ContentType::TextPost, "Monday 9AM");
    failing.caption = "FAIL please".to_string();
    f.repository.insert_item(failing).await;
    f.repository
        .insert_item(item(2, Platform::Facebook, ContentType::ImagePost, "Monday 9AM"))
        .await;

    let report = f.orchestrator.check_due(COMPANY).await.unwrap();

    assert_eq!(report.failed().len(), 1);
    assert_eq!(*report.failed()[0].content_id(), 1);
    assert!(report.failed()[0].error().contains("HTTP 400"));
    assert_eq!(report.posted_count(), 1);
    assert_eq!(status_of(&f.repository, 1).await, ContentStatus::NeedsApproval);
    assert_eq!(status_of(&f.repository, 2).await, ContentStatus::Posted);
}

#[tokio::test]
async fn test_missing_linked_account_is_per_item() {
    let f = fixture(monday(9, 5)).await;
    f.repository
        .insert_item(item(1, Platform::LinkedIn, ContentType::TextPost, "Monday 9AM"))
        .await;
    f.repository
        .insert_item(item(2, Platform::Facebook, ContentType::TextPost, "Monday 9AM"))
        .await;

    let report = f.orchestrator.check_due(COMPANY).await.unwrap();

    assert_eq!(report.failed().len(), 1);
    assert!(report.failed()[0].error().contains("No linked LinkedIn account"));
    assert_eq!(status_of(&f.repository, 1).await, ContentStatus::NeedsApproval);
    assert_eq!(status_of(&f.repository, 2).await, ContentStatus::Posted);
}

#[tokio::test]
async fn test_video_without_url_fails_before_publishing() {
    let f = fixture(monday(9, 5)).await;
    let mut video = item(1, Platform::Instagram, ContentType::Reel, "Monday 9AM");
    video.video_placeholder = Some("Slow pan across warm loaves".to_string());
    f.repository.insert_item(video).await;

    let report = f.orchestrator.check_due(COMPANY).await.unwrap();

    assert_eq!(report.failed().len(), 1);
    assert!(report.failed()[0].error().contains("video_placeholder"));
    assert!(f.instagram.lock().unwrap().is_empty());
    assert_eq!(status_of(&f.repository, 1).await, ContentStatus::NeedsApproval);
}

#[tokio::test]
async fn test_instagram_dispatch() {
    let f = fixture(monday(9, 5)).await;
    f.repository
        .insert_item(item(1, Platform::Instagram, ContentType::Story, "Monday 9AM"))
        .await;
    let mut reel = item(2, Platform::Instagram, ContentType::Reel, "Monday 9AM");
    reel.video_placeholder = Some("https://cdn.example/2.mp4".to_string());
    f.repository.insert_item(reel).await;
    f.repository
        .insert_item(item(3, Platform::Instagram, ContentType::TextPost, "Monday 9AM"))
        .await;

    let report = f.orchestrator.check_due(COMPANY).await.unwrap();

    let calls = f.instagram.lock().unwrap().clone();
    let actions: Vec<_> = calls.iter().map(|c| c.action).collect();
    assert_eq!(actions, vec!["story", "reel"]);
    assert_eq!(calls[0].target, "ig-1");
    assert_eq!(calls[1].media.as_deref(), Some("https://cdn.example/2.mp4"));

    assert_eq!(report.posted_count(), 2);
    assert_eq!(report.failed().len(), 1);
    assert!(report.failed()[0].error().contains("does not support"));
}

#[tokio::test]
async fn test_past_due_first_then_by_id() {
    let f = fixture(monday(9, 5)).await;
    f.repository
        .insert_item(item(1, Platform::Facebook, ContentType::TextPost, "Monday 9AM"))
        .await;
    f.repository
        .insert_item(item(2, Platform::Facebook, ContentType::TextPost, "Monday 7AM"))
        .await;
    f.repository
        .insert_item(item(3, Platform::Facebook, ContentType::TextPost, "Tuesday 9AM"))
        .await;

    let report = f.orchestrator.check_due(COMPANY).await.unwrap();

    let order: Vec<i32> = report.posted().iter().map(|p| *p.content_id()).collect();
    assert_eq!(order, vec![2, 1]);
    assert!(*report.posted()[0].was_past_due());
    assert_eq!(status_of(&f.repository, 3).await, ContentStatus::Approved);
}

#[tokio::test(start_paused = true)]
async fn test_delay_after_past_due_publish() {
    let f = fixture_with(monday(11, 0), OrchestratorSettings::default()).await;
    f.repository
        .insert_item(item(1, Platform::Facebook, ContentType::TextPost, "Monday 9AM"))
        .await;
    f.repository
        .insert_item(item(2, Platform::Facebook, ContentType::TextPost, "Monday 10AM"))
        .await;

    let started = tokio::time::Instant::now();
    let report = f.orchestrator.check_due(COMPANY).await.unwrap();

    assert_eq!(report.posted_count(), 2);
    // One pause between the two items, none after the last.
    assert_eq!(started.elapsed(), Duration::from_secs(5));
}

#[tokio::test]
async fn test_only_current_strategy_items() {
    let f = fixture(monday(9, 5)).await;
    f.repository
        .insert_strategy(Strategy::new(2, COMPANY, StrategyStatus::Archived, None))
        .await;
    let mut old = item(1, Platform::Facebook, ContentType::TextPost, "Monday 9AM");
    old.strategy_id = 2;
    f.repository.insert_item(old).await;

    let report = f.orchestrator.check_due(COMPANY).await.unwrap();
    assert_eq!(report.posted_count(), 0);
    assert!(f.facebook.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_no_approved_strategy() {
    let f = fixture(monday(9, 5)).await;
    let report = f.orchestrator.check_due(99).await.unwrap();
    assert_eq!(*report.company_id(), 99);
    assert_eq!(*report.strategy_id(), None);
    assert_eq!(report.posted_count(), 0);
}

#[tokio::test]
async fn test_sweep_all_covers_companies() {
    let f = fixture(monday(9, 5)).await;
    f.repository
        .insert_item(item(1, Platform::Facebook, ContentType::TextPost, "Monday 9AM"))
        .await;

    let reports = f.orchestrator.sweep_all().await.unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].posted_count(), 1);
}

#[tokio::test]
async fn test_review_queue_order_and_flags() {
    let f = fixture(monday(8, 30)).await;
    let mut pending = item(1, Platform::Facebook, ContentType::ImagePost, "Monday 9AM");
    pending.status = ContentStatus::Pending;
    let mut needs = item(2, Platform::Facebook, ContentType::ImagePost, "Monday 9AM");
    needs.status = ContentStatus::NeedsApproval;
    let mut overdue = item(3, Platform::Facebook, ContentType::ImagePost, "Monday 7AM");
    overdue.status = ContentStatus::Pending;
    let mut later = item(4, Platform::Facebook, ContentType::ImagePost, "Monday 3PM");
    later.status = ContentStatus::Pending;
    let approved = item(5, Platform::Facebook, ContentType::ImagePost, "Monday 9AM");
    for i in [pending, needs, overdue, later, approved] {
        f.repository.insert_item(i).await;
    }

    let queue = f.orchestrator.review_queue(COMPANY).await.unwrap();

    let ids: Vec<i32> = queue.iter().map(|e| e.item().id).collect();
    assert_eq!(ids, vec![2, 1, 3]);
    assert_eq!(*queue[0].scheduled_hour(), 9);
    assert!(!queue[0].past_due());
    assert!(*queue[2].past_due());
}

#[tokio::test]
async fn test_approve_splits_hashtags() {
    let f = fixture(monday(8, 0)).await;
    let mut draft = item(1, Platform::Facebook, ContentType::ImagePost, "Monday 9AM");
    draft.status = ContentStatus::NeedsApproval;
    f.repository.insert_item(draft).await;

    let approved = f
        .orchestrator
        .approve(1, USER, Some("New  loaves #sourdough today #bakery"))
        .await
        .unwrap();

    assert_eq!(approved.status, ContentStatus::Approved);
    assert_eq!(approved.caption, "New loaves today");
    assert_eq!(approved.hashtags.as_deref(), Some("#sourdough #bakery"));
}

#[tokio::test]
async fn test_approve_without_hashtags_clears_them() {
    let f = fixture(monday(8, 0)).await;
    let mut draft = item(1, Platform::Facebook, ContentType::ImagePost, "Monday 9AM");
    draft.status = ContentStatus::Pending;
    f.repository.insert_item(draft).await;

    let approved = f.orchestrator.approve(1, USER, Some("Plain caption")).await.unwrap();
    assert_eq!(approved.hashtags, None);
}

#[tokio::test]
async fn test_approve_without_edit_keeps_caption() {
    let f = fixture(monday(8, 0)).await;
    let mut draft = item(1, Platform::Facebook, ContentType::ImagePost, "Monday 9AM");
    draft.status = ContentStatus::NeedsApproval;
    f.repository.insert_item(draft).await;

    let approved = f.orchestrator.approve(1, USER, None).await.unwrap();
    assert_eq!(approved.status, ContentStatus::Approved);
    assert_eq!(approved.caption, "Fresh bread daily");
    assert_eq!(approved.hashtags.as_deref(), Some("#bakery"));
}

#[tokio::test]
async fn test_approve_rejects_invalid_transition_and_foreign_user() {
    let f = fixture(monday(8, 0)).await;
    let mut posted = item(1, Platform::Facebook, ContentType::ImagePost, "Monday 9AM");
    posted.status = ContentStatus::Posted;
    f.repository.insert_item(posted).await;

    let err = f.orchestrator.approve(1, USER, Some("again")).await.unwrap_err();
    match err.kind() {
        HeraldErrorKind::Content(e) => {
            assert!(matches!(e.kind, ContentErrorKind::InvalidTransition { .. }))
        }
        other => panic!("unexpected error: {}", other),
    }

    let err = f.orchestrator.approve(1, USER + 1, Some("mine")).await.unwrap_err();
    match err.kind() {
        HeraldErrorKind::Database(e) => assert_eq!(e.kind, DatabaseErrorKind::NotFound),
        other => panic!("unexpected error: {}", other),
    }
}

#[tokio::test]
async fn test_reject_records_time() {
    let f = fixture(monday(8, 0)).await;
    let mut draft = item(1, Platform::Facebook, ContentType::ImagePost, "Monday 9AM");
    draft.status = ContentStatus::NeedsApproval;
    f.repository.insert_item(draft).await;

    let rejected = f.orchestrator.reject(1, USER).await.unwrap();
    assert_eq!(rejected.status, ContentStatus::Rejected);
    assert!(rejected.rejected_at.is_some());

    assert!(f.orchestrator.reject(1, USER).await.is_err());
}

#[tokio::test]
async fn test_approve_strategy_archives_previous() {
    let f = fixture(monday(8, 0)).await;
    f.repository
        .insert_strategy(Strategy::new(4, COMPANY, StrategyStatus::Draft, None))
        .await;

    let approved = f.orchestrator.approve_strategy(4, USER).await.unwrap();
    assert_eq!(*approved.status(), StrategyStatus::Approved);

    let previous = f.repository.strategy_by_id(STRATEGY).await.unwrap();
    assert_eq!(*previous.status(), StrategyStatus::Archived);
    let current = f.repository.approved_strategy(COMPANY).await.unwrap().unwrap();
    assert_eq!(*current.id(), 4);

    assert!(f.orchestrator.approve_strategy(4, USER + 1).await.is_err());
}

/// Loses the connection on the first `failures` writes to `posted`.
struct FlakyPostedWrites {
    inner: Arc<InMemoryContentRepository>,
    failures: AtomicUsize,
    posted_writes: AtomicUsize,
}

impl FlakyPostedWrites {
    fn new(inner: Arc<InMemoryContentRepository>, failures: usize) -> Self {
        Self {
            inner,
            failures: AtomicUsize::new(failures),
            posted_writes: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ContentRepository for FlakyPostedWrites {
    async fn company(&self, company_id: i32, user_id: i32) -> HeraldResult<Company> {
        self.inner.company(company_id, user_id).await
    }

    async fn companies_with_approved_strategy(&self) -> HeraldResult<Vec<Company>> {
        self.inner.companies_with_approved_strategy().await
    }

    async fn strategy(&self, strategy_id: i32, user_id: i32) -> HeraldResult<Strategy> {
        self.inner.strategy(strategy_id, user_id).await
    }

    async fn approved_strategy(&self, company_id: i32) -> HeraldResult<Option<Strategy>> {
        self.inner.approved_strategy(company_id).await
    }

    async fn items_for_strategy(
        &self,
        strategy_id: i32,
        statuses: &[ContentStatus],
    ) -> HeraldResult<Vec<ContentItem>> {
        self.inner.items_for_strategy(strategy_id, statuses).await
    }

    async fn content_item(&self, content_id: i32, user_id: i32) -> HeraldResult<ContentItem> {
        self.inner.content_item(content_id, user_id).await
    }

    async fn linked_account(
        &self,
        user_id: i32,
        platform: Platform,
    ) -> HeraldResult<Option<LinkedAccount>> {
        self.inner.linked_account(user_id, platform).await
    }

    async fn set_media_url(
        &self,
        content_id: i32,
        field: MediaField,
        url: &str,
    ) -> HeraldResult<()> {
        self.inner.set_media_url(content_id, field, url).await
    }

    async fn transition_status(
        &self,
        content_id: i32,
        from: ContentStatus,
        to: ContentStatus,
    ) -> HeraldResult<bool> {
        if to == ContentStatus::Posted {
            self.posted_writes.fetch_add(1, Ordering::SeqCst);
            let failed = self
                .failures
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
            if failed {
                return Err(DatabaseError::new(DatabaseErrorKind::Connection(
                    "connection reset".to_string(),
                ))
                .into());
            }
        }
        self.inner.transition_status(content_id, from, to).await
    }

    async fn approve_content(
        &self,
        content_id: i32,
        from: ContentStatus,
        caption: &str,
        hashtags: Option<&str>,
    ) -> HeraldResult<bool> {
        self.inner
            .approve_content(content_id, from, caption, hashtags)
            .await
    }

    async fn reject_content(
        &self,
        content_id: i32,
        from: ContentStatus,
        rejected_at: DateTime<Utc>,
    ) -> HeraldResult<bool> {
        self.inner
            .reject_content(content_id, from, rejected_at)
            .await
    }

    async fn approve_strategy(
        &self,
        strategy_id: i32,
        approved_at: DateTime<Utc>,
    ) -> HeraldResult<Strategy> {
        self.inner.approve_strategy(strategy_id, approved_at).await
    }
}

fn quick_retry_settings() -> OrchestratorSettings {
    OrchestratorSettingsBuilder::default()
        .past_due_delay(Duration::ZERO)
        .status_retry(RetryPolicy::new(
            Duration::from_millis(1),
            2,
            Duration::from_millis(2),
        ))
        .build()
        .unwrap()
}

async fn flaky_fixture(failures: usize) -> (Fixture, Arc<FlakyPostedWrites>) {
    let repository = seeded_repository().await;
    let flaky = Arc::new(FlakyPostedWrites::new(repository.clone(), failures));
    let f = fixture_over(repository, flaky.clone(), monday(9, 5), quick_retry_settings());
    (f, flaky)
}

#[tokio::test]
async fn test_lost_connection_on_posted_write_is_retried() {
    let (f, flaky) = flaky_fixture(1).await;
    f.repository
        .insert_item(item(1, Platform::Facebook, ContentType::ImagePost, "Monday 9AM"))
        .await;

    let report = f.orchestrator.check_due(COMPANY).await.unwrap();

    assert_eq!(report.posted_count(), 1);
    assert!(report.failed().is_empty());
    assert_eq!(flaky.posted_writes.load(Ordering::SeqCst), 2);
    assert_eq!(status_of(&f.repository, 1).await, ContentStatus::Posted);
    assert_eq!(f.facebook.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_unrecorded_publish_is_never_repeated() {
    let (f, _flaky) = flaky_fixture(usize::MAX).await;
    f.repository
        .insert_item(item(1, Platform::Facebook, ContentType::ImagePost, "Monday 9AM"))
        .await;

    let first = f.orchestrator.check_due(COMPANY).await.unwrap();
    assert_eq!(first.failed().len(), 1);
    assert_eq!(first.failed()[0].post_id().as_deref(), Some("post-1"));
    assert_eq!(status_of(&f.repository, 1).await, ContentStatus::NeedsApproval);

    let second = f.orchestrator.check_due(COMPANY).await.unwrap();
    assert_eq!(second.posted_count(), 0);
    assert!(second.failed().is_empty());
    assert_eq!(f.facebook.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_publish_now_with_edited_caption() {
    let f = fixture(monday(8, 0)).await;
    let mut draft = item(1, Platform::Facebook, ContentType::ImagePost, "Wednesday 3PM");
    draft.status = ContentStatus::NeedsApproval;
    f.repository.insert_item(draft).await;

    let posted = f
        .orchestrator
        .publish_now(1, USER, Some("Hot rolls  now #bakery #fresh"))
        .await
        .unwrap();

    assert_eq!(posted.action(), "image");
    assert_eq!(posted.post_id(), "post-1");
    assert!(!posted.was_past_due());

    let calls = f.facebook.lock().unwrap().clone();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].text, "Hot rolls now #bakery #fresh");

    let stored = f.repository.item(1).await.unwrap();
    assert_eq!(stored.status, ContentStatus::Posted);
    assert_eq!(stored.caption, "Hot rolls now");
    assert_eq!(stored.hashtags.as_deref(), Some("#bakery #fresh"));
}

#[tokio::test]
async fn test_publish_now_keeps_approved_caption() {
    let f = fixture(monday(8, 0)).await;
    f.repository
        .insert_item(item(1, Platform::Instagram, ContentType::Story, "Friday 6PM"))
        .await;

    let posted = f.orchestrator.publish_now(1, USER, None).await.unwrap();

    assert_eq!(posted.action(), "story");
    assert_eq!(f.instagram.lock().unwrap()[0].target, "ig-1");
    assert_eq!(status_of(&f.repository, 1).await, ContentStatus::Posted);
}

#[tokio::test]
async fn test_publish_now_failure_and_invalid_status() {
    let f = fixture(monday(8, 0)).await;
    let mut failing = item(1, Platform::Facebook, ContentType::TextPost, "Monday 9AM");
    failing.caption = "FAIL please".to_string();
    f.repository.insert_item(failing).await;
    let mut posted = item(2, Platform::Facebook, ContentType::TextPost, "Monday 9AM");
    posted.status = ContentStatus::Posted;
    f.repository.insert_item(posted).await;

    let err = f.orchestrator.publish_now(1, USER, None).await.unwrap_err();
    assert!(matches!(err.kind(), HeraldErrorKind::Publish(_)));
    assert_eq!(status_of(&f.repository, 1).await, ContentStatus::NeedsApproval);

    let err = f.orchestrator.publish_now(2, USER, None).await.unwrap_err();
    match err.kind() {
        HeraldErrorKind::Content(e) => {
            assert!(matches!(e.kind, ContentErrorKind::InvalidTransition { .. }))
        }
        other => panic!("unexpected error: {}", other),
    }
    assert_eq!(f.facebook.lock().unwrap().len(), 1);
}
