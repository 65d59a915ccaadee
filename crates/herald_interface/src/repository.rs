//! Persistence seam for companies, strategies and content items.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use herald_core::{
    Company, ContentItem, ContentStatus, LinkedAccount, MediaField, Platform, Strategy,
};
use herald_error::HeraldResult;

/// Repository for the records the scheduler and media pipeline operate on.
///
/// Lookups that take a `user_id` perform an ownership check and return
/// `DatabaseErrorKind::NotFound` when the row is absent or belongs to someone else.
///
/// Status writes are conditional: they only apply when the row still holds the
/// expected status, and report whether a row changed. This makes repeated
/// sweeps and concurrent reviewers safe.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Company owned by `user_id`.
    async fn company(&self, company_id: i32, user_id: i32) -> HeraldResult<Company>;

    /// Companies that currently have an approved strategy.
    async fn companies_with_approved_strategy(&self) -> HeraldResult<Vec<Company>>;

    /// Strategy owned (through its company) by `user_id`.
    async fn strategy(&self, strategy_id: i32, user_id: i32) -> HeraldResult<Strategy>;

    /// The company's approved strategy with the latest `approved_at`.
    async fn approved_strategy(&self, company_id: i32) -> HeraldResult<Option<Strategy>>;

    /// Items under a strategy whose status is one of `statuses`.
    async fn items_for_strategy(
        &self,
        strategy_id: i32,
        statuses: &[ContentStatus],
    ) -> HeraldResult<Vec<ContentItem>>;

    /// Content item owned (through its company) by `user_id`.
    async fn content_item(&self, content_id: i32, user_id: i32) -> HeraldResult<ContentItem>;

    /// Newest linked account of `user_id` on `platform`.
    async fn linked_account(
        &self,
        user_id: i32,
        platform: Platform,
    ) -> HeraldResult<Option<LinkedAccount>>;

    /// Store a published media URL in the given field.
    async fn set_media_url(&self, content_id: i32, field: MediaField, url: &str)
    -> HeraldResult<()>;

    /// Move `content_id` from `from` to `to`. Returns false if the row no
    /// longer had status `from`.
    async fn transition_status(
        &self,
        content_id: i32,
        from: ContentStatus,
        to: ContentStatus,
    ) -> HeraldResult<bool>;

    /// Approve an item, replacing its caption and hashtags.
    async fn approve_content(
        &self,
        content_id: i32,
        from: ContentStatus,
        caption: &str,
        hashtags: Option<&str>,
    ) -> HeraldResult<bool>;

    /// Reject an item, recording when.
    async fn reject_content(
        &self,
        content_id: i32,
        from: ContentStatus,
        rejected_at: DateTime<Utc>,
    ) -> HeraldResult<bool>;

    /// Approve a strategy and archive every other approved strategy of the
    /// same company, atomically.
    async fn approve_strategy(
        &self,
        strategy_id: i32,
        approved_at: DateTime<Utc>,
    ) -> HeraldResult<Strategy>;
}
