//! Auto-posting sweeps and reviewer actions.

use crate::{Due, PublishAction, ScheduleEvaluator, dispatch, is_auto_post_due, is_due};
use chrono::{NaiveDateTime, Timelike, Utc};
use herald_core::{ContentItem, ContentStatus, ContentType, Platform, Strategy};
use herald_error::{
    ConfigError, ContentError, ContentErrorKind, HeraldError, HeraldResult, PublishError,
    PublishErrorKind,
};
use herald_interface::{ContentRepository, PostId, TokenCipher};
use herald_social::PublisherRegistry;
use herald_storage::{RetryPolicy, retry_with_backoff};
use regex::Regex;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

/// Hashtags inside an edited caption.
const HASHTAG_PATTERN: &str = r"#\w+";

/// Orchestrator tuning.
#[derive(Debug, Clone, derive_builder::Builder, derive_getters::Getters)]
#[builder(setter(into))]
pub struct OrchestratorSettings {
    /// Pause after each past-due publish when more items follow
    #[builder(default = "Duration::from_secs(5)")]
    past_due_delay: Duration,
    /// Backoff for status writes after a publish
    #[builder(default)]
    status_retry: RetryPolicy,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            past_due_delay: Duration::from_secs(5),
            status_retry: RetryPolicy::default(),
        }
    }
}

/// An item published during a sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, derive_getters::Getters)]
pub struct PostedItem {
    content_id: i32,
    platform: Platform,
    content_type: ContentType,
    action: String,
    post_id: String,
    scheduled_time: String,
    was_past_due: bool,
}

/// An item that could not be published and marked posted; it went back to
/// review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, derive_getters::Getters)]
pub struct FailedItem {
    content_id: i32,
    platform: Platform,
    content_type: ContentType,
    error: String,
    /// Set when the platform accepted the post but the status write failed
    post_id: Option<String>,
}

/// How one publish attempt ended.
enum Settled {
    Posted(PostedItem),
    /// Published, but the row had already left `approved`
    Skipped(PostedItem),
    Failed {
        error: HeraldError,
        post_id: Option<String>,
    },
}

/// Outcome of one `check_due` call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, derive_getters::Getters)]
pub struct SweepReport {
    company_id: i32,
    /// Approved strategy the sweep ran against
    strategy_id: Option<i32>,
    posted: Vec<PostedItem>,
    failed: Vec<FailedItem>,
    /// Published, but the row had already left `approved`
    skipped: Vec<i32>,
}

impl SweepReport {
    fn empty(company_id: i32) -> Self {
        Self {
            company_id,
            ..Default::default()
        }
    }

    /// Number of items published.
    pub fn posted_count(&self) -> usize {
        self.posted.len()
    }
}

/// An item awaiting a reviewer, with its slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, derive_getters::Getters)]
pub struct ReviewEntry {
    item: ContentItem,
    scheduled_hour: u32,
    past_due: bool,
}

/// Split hashtags out of an edited caption.
///
/// Returns the caption with hashtags removed and the hashtags joined by
/// spaces, or `None` when there are none.
///
/// # Examples
///
/// ```
/// use herald_schedule::split_hashtags;
///
/// let (caption, tags) = split_hashtags("Fresh bread daily #bakery #local").unwrap();
/// assert_eq!(caption, "Fresh bread daily");
/// assert_eq!(tags.as_deref(), Some("#bakery #local"));
/// ```
pub fn split_hashtags(edited: &str) -> Result<(String, Option<String>), ConfigError> {
    let re = Regex::new(HASHTAG_PATTERN)
        .map_err(|e| ConfigError::new(format!("Invalid hashtag pattern: {}", e)))?;

    let tags: Vec<&str> = re.find_iter(edited).map(|m| m.as_str()).collect();
    let stripped = re.replace_all(edited, "");
    let caption = stripped
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string();

    let hashtags = (!tags.is_empty()).then(|| tags.join(" "));
    Ok((caption, hashtags))
}

/// Drives approved content to the platforms on schedule.
pub struct PostingOrchestrator {
    repository: Arc<dyn ContentRepository>,
    publishers: PublisherRegistry,
    cipher: Arc<dyn TokenCipher>,
    evaluator: ScheduleEvaluator,
    settings: OrchestratorSettings,
}

impl std::fmt::Debug for PostingOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostingOrchestrator")
            .field("publishers", &self.publishers)
            .field("evaluator", &self.evaluator)
            .field("settings", &self.settings)
            .finish()
    }
}

impl PostingOrchestrator {
    /// Create an orchestrator.
    pub fn new(
        repository: Arc<dyn ContentRepository>,
        publishers: PublisherRegistry,
        cipher: Arc<dyn TokenCipher>,
        evaluator: ScheduleEvaluator,
        settings: OrchestratorSettings,
    ) -> Self {
        Self {
            repository,
            publishers,
            cipher,
            evaluator,
            settings,
        }
    }

    /// Publish every approved item of the company's current strategy whose
    /// slot has arrived.
    ///
    /// Items are published past-due first, then by id. A failed item goes
    /// back to `needs_approval` and the sweep continues.
    #[instrument(skip(self))]
    pub async fn check_due(&self, company_id: i32) -> HeraldResult<SweepReport> {
        let Some(strategy) = self.repository.approved_strategy(company_id).await? else {
            debug!("No approved strategy");
            return Ok(SweepReport::empty(company_id));
        };

        let now = self.evaluator.now();
        let mut due: Vec<(ContentItem, bool)> = self
            .repository
            .items_for_strategy(*strategy.id(), &[ContentStatus::Approved])
            .await?
            .into_iter()
            .filter(|item| item.company_id == company_id)
            .filter(|item| is_auto_post_due(&item.best_time, now))
            .map(|item| {
                let past_due = is_due(&item.best_time, now) == Due::PastDue;
                (item, past_due)
            })
            .collect();
        due.sort_by_key(|(item, past_due)| (!*past_due, item.id));

        let mut report = SweepReport {
            company_id,
            strategy_id: Some(*strategy.id()),
            ..Default::default()
        };
        if due.is_empty() {
            return Ok(report);
        }
        info!(strategy_id = strategy.id(), count = due.len(), "Publishing due items");

        let total = due.len();
        for (index, (item, past_due)) in due.into_iter().enumerate() {
            self.publish_due(&item, past_due, &mut report).await;

            let delay = self.settings.past_due_delay;
            if past_due && index + 1 < total && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }

        info!(
            posted = report.posted.len(),
            failed = report.failed.len(),
            "Sweep complete"
        );
        Ok(report)
    }

    /// Run `check_due` for every company with an approved strategy.
    ///
    /// A company whose sweep fails is logged and skipped.
    #[instrument(skip(self))]
    pub async fn sweep_all(&self) -> HeraldResult<Vec<SweepReport>> {
        let companies = self.repository.companies_with_approved_strategy().await?;
        let mut reports = Vec::with_capacity(companies.len());
        for company in companies {
            match self.check_due(*company.id()).await {
                Ok(report) => reports.push(report),
                Err(e) => error!(company_id = company.id(), error = %e, "Sweep failed"),
            }
        }
        Ok(reports)
    }

    #[instrument(
        skip(self, item, report),
        fields(content_id = item.id, platform = %item.platform, content_type = %item.content_type)
    )]
    async fn publish_due(&self, item: &ContentItem, past_due: bool, report: &mut SweepReport) {
        match self.publish_and_settle(item, past_due).await {
            Settled::Posted(posted) => report.posted.push(posted),
            Settled::Skipped(posted) => report.skipped.push(posted.content_id),
            Settled::Failed { error, post_id } => report.failed.push(FailedItem {
                content_id: item.id,
                platform: item.platform,
                content_type: item.content_type,
                error: error.to_string(),
                post_id,
            }),
        }
    }

    /// Publish an approved item and record the outcome.
    ///
    /// Success moves the row to `posted`. Any failure moves it to
    /// `needs_approval`, including a publish whose `posted` write could not
    /// be stored, so an item never stays selectable after it went out.
    async fn publish_and_settle(&self, item: &ContentItem, past_due: bool) -> Settled {
        let (action, post_id) = match self.publish_item(item).await {
            Ok(published) => published,
            Err(error) => {
                error!(error = %error, "Publish failed, returning item to review");
                self.return_to_review(item.id).await;
                return Settled::Failed {
                    error,
                    post_id: None,
                };
            }
        };

        let posted = PostedItem {
            content_id: item.id,
            platform: item.platform,
            content_type: item.content_type,
            action: action.to_string(),
            post_id: post_id.0.clone(),
            scheduled_time: item.best_time.clone(),
            was_past_due: past_due,
        };

        let marked = retry_with_backoff(self.settings.status_retry, "mark_posted", || {
            self.repository
                .transition_status(item.id, ContentStatus::Approved, ContentStatus::Posted)
        })
        .await;

        match marked {
            Ok(true) => {
                info!(post_id = %post_id, %action, "Published");
                Settled::Posted(posted)
            }
            Ok(false) => {
                warn!(post_id = %post_id, "Published, but item already left approved");
                Settled::Skipped(posted)
            }
            Err(error) => {
                error!(post_id = %post_id, error = %error, "Published, but status write failed");
                self.return_to_review(item.id).await;
                Settled::Failed {
                    error,
                    post_id: Some(post_id.0),
                }
            }
        }
    }

    async fn return_to_review(&self, content_id: i32) {
        let moved = retry_with_backoff(self.settings.status_retry, "return_to_review", || {
            self.repository.transition_status(
                content_id,
                ContentStatus::Approved,
                ContentStatus::NeedsApproval,
            )
        })
        .await;
        if let Err(e) = moved {
            error!(content_id, error = %e, "Could not return item to review");
        }
    }

    async fn publish_item(&self, item: &ContentItem) -> HeraldResult<(PublishAction, PostId)> {
        let account = self
            .repository
            .linked_account(item.user_id, item.platform)
            .await?
            .ok_or_else(|| {
                PublishError::new(PublishErrorKind::MissingCredential {
                    platform: item.platform.to_string(),
                    user_id: item.user_id,
                })
            })?;
        let publisher = self.publishers.get(item.platform)?;
        let target = publisher.target_for(&account)?;
        let token = self.cipher.decrypt(account.encrypted_token())?;
        dispatch(&**publisher, &target, &token, item).await
    }

    /// Items under the current strategy waiting for a reviewer whose slot is
    /// within the review window, `needs_approval` first.
    #[instrument(skip(self))]
    pub async fn review_queue(&self, company_id: i32) -> HeraldResult<Vec<ReviewEntry>> {
        self.review_queue_at(company_id, self.evaluator.now()).await
    }

    /// [`Self::review_queue`] at an explicit time.
    pub async fn review_queue_at(
        &self,
        company_id: i32,
        now: NaiveDateTime,
    ) -> HeraldResult<Vec<ReviewEntry>> {
        let Some(strategy) = self.repository.approved_strategy(company_id).await? else {
            return Ok(Vec::new());
        };

        let mut entries: Vec<ReviewEntry> = self
            .repository
            .items_for_strategy(
                *strategy.id(),
                &[ContentStatus::NeedsApproval, ContentStatus::Pending],
            )
            .await?
            .into_iter()
            .filter(|item| item.company_id == company_id)
            .filter_map(|item| {
                let due = is_due(&item.best_time, now);
                due.is_review_due().then(|| {
                    let scheduled_hour = item
                        .best_time
                        .parse::<crate::BestTime>()
                        .map(|slot| *slot.hour())
                        .unwrap_or_else(|_| now.hour());
                    ReviewEntry {
                        item,
                        scheduled_hour,
                        past_due: due == Due::PastDue,
                    }
                })
            })
            .collect();

        entries.sort_by_key(|entry| {
            let rank = match entry.item.status {
                ContentStatus::NeedsApproval => 0,
                ContentStatus::Pending => 1,
                _ => 2,
            };
            (rank, entry.item.id)
        });
        Ok(entries)
    }

    /// Approve an item, optionally with a reviewer-edited caption.
    ///
    /// Hashtags in an edited caption are stored separately. Without an edit
    /// the stored caption and hashtags are kept.
    #[instrument(skip(self, edited_caption))]
    pub async fn approve(
        &self,
        content_id: i32,
        user_id: i32,
        edited_caption: Option<&str>,
    ) -> HeraldResult<ContentItem> {
        let item = self.repository.content_item(content_id, user_id).await?;
        item.status.ensure_transition(ContentStatus::Approved)?;

        let (caption, hashtags) = match edited_caption {
            Some(edited) => split_hashtags(edited)?,
            None => (item.caption.clone(), item.hashtags.clone()),
        };
        let changed = self
            .repository
            .approve_content(content_id, item.status, &caption, hashtags.as_deref())
            .await?;
        if !changed {
            return Err(status_changed(content_id, item.status).into());
        }
        info!(content_id, "Content approved");
        self.repository.content_item(content_id, user_id).await
    }

    /// Publish an item immediately, outside its slot.
    ///
    /// An edited caption replaces the stored one with its hashtags split
    /// out. Items not yet approved are approved first. The outcome is
    /// recorded as in a sweep: `posted` on success, `needs_approval` on
    /// failure.
    #[instrument(skip(self, edited_caption))]
    pub async fn publish_now(
        &self,
        content_id: i32,
        user_id: i32,
        edited_caption: Option<&str>,
    ) -> HeraldResult<PostedItem> {
        let item = self.repository.content_item(content_id, user_id).await?;
        if item.status != ContentStatus::Approved {
            item.status.ensure_transition(ContentStatus::Approved)?;
        }

        if item.status != ContentStatus::Approved || edited_caption.is_some() {
            let (caption, hashtags) = match edited_caption {
                Some(edited) => split_hashtags(edited)?,
                None => (item.caption.clone(), item.hashtags.clone()),
            };
            let changed = self
                .repository
                .approve_content(content_id, item.status, &caption, hashtags.as_deref())
                .await?;
            if !changed {
                return Err(status_changed(content_id, item.status).into());
            }
        }

        let item = self.repository.content_item(content_id, user_id).await?;
        match self.publish_and_settle(&item, false).await {
            Settled::Posted(posted) | Settled::Skipped(posted) => Ok(posted),
            Settled::Failed { error, .. } => Err(error),
        }
    }

    /// Reject an item.
    #[instrument(skip(self))]
    pub async fn reject(&self, content_id: i32, user_id: i32) -> HeraldResult<ContentItem> {
        let item = self.repository.content_item(content_id, user_id).await?;
        item.status.ensure_transition(ContentStatus::Rejected)?;

        let changed = self
            .repository
            .reject_content(content_id, item.status, Utc::now())
            .await?;
        if !changed {
            return Err(status_changed(content_id, item.status).into());
        }
        info!(content_id, "Content rejected");
        self.repository.content_item(content_id, user_id).await
    }

    /// Approve a strategy, archiving the company's previous approved one.
    #[instrument(skip(self))]
    pub async fn approve_strategy(&self, strategy_id: i32, user_id: i32) -> HeraldResult<Strategy> {
        let strategy = self.repository.strategy(strategy_id, user_id).await?;
        let approved = self
            .repository
            .approve_strategy(*strategy.id(), Utc::now())
            .await?;
        info!(strategy_id, company_id = approved.company_id(), "Strategy approved");
        Ok(approved)
    }
}

fn status_changed(content_id: i32, expected: ContentStatus) -> ContentError {
    ContentError::new(ContentErrorKind::StatusChanged {
        id: content_id,
        expected: expected.to_string(),
    })
}
