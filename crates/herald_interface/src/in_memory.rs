//! In-memory implementation of ContentRepository for testing.
//!
//! Every table lives behind one RwLock so multi-row operations such as
//! strategy approval are atomic, as they are in the database.

use crate::ContentRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use herald_core::{
    Company, ContentItem, ContentStatus, LinkedAccount, MediaField, Platform, Strategy,
    StrategyStatus,
};
use herald_error::{DatabaseError, DatabaseErrorKind, HeraldResult};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory content repository.
///
/// # Example
/// ```
/// use herald_core::Company;
/// use herald_interface::{ContentRepository, InMemoryContentRepository};
///
/// let rt = tokio::runtime::Runtime::new().unwrap();
/// rt.block_on(async {
///     let repo = InMemoryContentRepository::new();
///     repo.insert_company(Company::new(1, 10, "Acme", None, None)).await;
///     assert!(repo.company(1, 10).await.is_ok());
///     assert!(repo.company(1, 11).await.is_err());
/// });
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryContentRepository {
    tables: Arc<RwLock<Tables>>,
}

#[derive(Debug, Default)]
struct Tables {
    companies: HashMap<i32, Company>,
    strategies: HashMap<i32, Strategy>,
    items: HashMap<i32, ContentItem>,
    accounts: Vec<LinkedAccount>,
}

impl Tables {
    fn owned_company(&self, company_id: i32, user_id: i32) -> Option<&Company> {
        self.companies
            .get(&company_id)
            .filter(|company| *company.user_id() == user_id)
    }

    fn item_mut(&mut self, content_id: i32) -> HeraldResult<&mut ContentItem> {
        self.items
            .get_mut(&content_id)
            .ok_or_else(|| DatabaseError::new(DatabaseErrorKind::NotFound).into())
    }
}

impl InMemoryContentRepository {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a company.
    pub async fn insert_company(&self, company: Company) {
        self.tables
            .write()
            .await
            .companies
            .insert(*company.id(), company);
    }

    /// Add or replace a strategy.
    pub async fn insert_strategy(&self, strategy: Strategy) {
        self.tables
            .write()
            .await
            .strategies
            .insert(*strategy.id(), strategy);
    }

    /// Add or replace a content item.
    pub async fn insert_item(&self, item: ContentItem) {
        self.tables.write().await.items.insert(item.id, item);
    }

    /// Add a linked account.
    pub async fn insert_linked_account(&self, account: LinkedAccount) {
        self.tables.write().await.accounts.push(account);
    }

    /// Content item by id, without an ownership check (for testing).
    pub async fn item(&self, content_id: i32) -> Option<ContentItem> {
        self.tables.read().await.items.get(&content_id).cloned()
    }

    /// Strategy by id, without an ownership check (for testing).
    pub async fn strategy_by_id(&self, strategy_id: i32) -> Option<Strategy> {
        self.tables
            .read()
            .await
            .strategies
            .get(&strategy_id)
            .cloned()
    }
}

fn not_found() -> herald_error::HeraldError {
    DatabaseError::new(DatabaseErrorKind::NotFound).into()
}

#[async_trait]
impl ContentRepository for InMemoryContentRepository {
    async fn company(&self, company_id: i32, user_id: i32) -> HeraldResult<Company> {
        self.tables
            .read()
            .await
            .owned_company(company_id, user_id)
            .cloned()
            .ok_or_else(not_found)
    }

    async fn companies_with_approved_strategy(&self) -> HeraldResult<Vec<Company>> {
        let tables = self.tables.read().await;
        let mut companies: Vec<Company> = tables
            .companies
            .values()
            .filter(|company| {
                tables.strategies.values().any(|strategy| {
                    strategy.company_id() == company.id()
                        && *strategy.status() == StrategyStatus::Approved
                })
            })
            .cloned()
            .collect();
        companies.sort_by_key(|company| *company.id());
        Ok(companies)
    }

    async fn strategy(&self, strategy_id: i32, user_id: i32) -> HeraldResult<Strategy> {
        let tables = self.tables.read().await;
        tables
            .strategies
            .get(&strategy_id)
            .filter(|strategy| {
                tables
                    .owned_company(*strategy.company_id(), user_id)
                    .is_some()
            })
            .cloned()
            .ok_or_else(not_found)
    }

    async fn approved_strategy(&self, company_id: i32) -> HeraldResult<Option<Strategy>> {
        let tables = self.tables.read().await;
        Ok(tables
            .strategies
            .values()
            .filter(|strategy| {
                *strategy.company_id() == company_id
                    && *strategy.status() == StrategyStatus::Approved
            })
            .max_by_key(|strategy| (*strategy.approved_at(), *strategy.id()))
            .cloned())
    }

    async fn items_for_strategy(
        &self,
        strategy_id: i32,
        statuses: &[ContentStatus],
    ) -> HeraldResult<Vec<ContentItem>> {
        let tables = self.tables.read().await;
        let mut items: Vec<ContentItem> = tables
            .items
            .values()
            .filter(|item| item.strategy_id == strategy_id && statuses.contains(&item.status))
            .cloned()
            .collect();
        items.sort_by_key(|item| item.id);
        Ok(items)
    }

    async fn content_item(&self, content_id: i32, user_id: i32) -> HeraldResult<ContentItem> {
        let tables = self.tables.read().await;
        tables
            .items
            .get(&content_id)
            .filter(|item| tables.owned_company(item.company_id, user_id).is_some())
            .cloned()
            .ok_or_else(not_found)
    }

    async fn linked_account(
        &self,
        user_id: i32,
        platform: Platform,
    ) -> HeraldResult<Option<LinkedAccount>> {
        let tables = self.tables.read().await;
        Ok(tables
            .accounts
            .iter()
            .filter(|account| *account.user_id() == user_id && *account.platform() == platform)
            .max_by_key(|account| *account.created_at())
            .cloned())
    }

    async fn set_media_url(
        &self,
        content_id: i32,
        field: MediaField,
        url: &str,
    ) -> HeraldResult<()> {
        let mut tables = self.tables.write().await;
        let item = tables.item_mut(content_id)?;
        match field {
            MediaField::MediaLink => item.media_link = Some(url.to_string()),
            MediaField::VideoPlaceholder => item.video_placeholder = Some(url.to_string()),
        }
        Ok(())
    }

    async fn transition_status(
        &self,
        content_id: i32,
        from: ContentStatus,
        to: ContentStatus,
    ) -> HeraldResult<bool> {
        let mut tables = self.tables.write().await;
        let item = tables.item_mut(content_id)?;
        if item.status != from {
            return Ok(false);
        }
        item.status = to;
        Ok(true)
    }

    async fn approve_content(
        &self,
        content_id: i32,
        from: ContentStatus,
        caption: &str,
        hashtags: Option<&str>,
    ) -> HeraldResult<bool> {
        let mut tables = self.tables.write().await;
        let item = tables.item_mut(content_id)?;
        if item.status != from {
            return Ok(false);
        }
        item.status = ContentStatus::Approved;
        item.caption = caption.to_string();
        item.hashtags = hashtags.map(str::to_string);
        Ok(true)
    }

    async fn reject_content(
        &self,
        content_id: i32,
        from: ContentStatus,
        rejected_at: DateTime<Utc>,
    ) -> HeraldResult<bool> {
        let mut tables = self.tables.write().await;
        let item = tables.item_mut(content_id)?;
        if item.status != from {
            return Ok(false);
        }
        item.status = ContentStatus::Rejected;
        item.rejected_at = Some(rejected_at);
        Ok(true)
    }

    async fn approve_strategy(
        &self,
        strategy_id: i32,
        approved_at: DateTime<Utc>,
    ) -> HeraldResult<Strategy> {
        let mut tables = self.tables.write().await;
        let company_id = *tables
            .strategies
            .get(&strategy_id)
            .ok_or_else(not_found)?
            .company_id();

        for strategy in tables.strategies.values_mut() {
            if *strategy.company_id() == company_id
                && *strategy.status() == StrategyStatus::Approved
                && *strategy.id() != strategy_id
            {
                *strategy = Strategy::new(
                    *strategy.id(),
                    company_id,
                    StrategyStatus::Archived,
                    *strategy.approved_at(),
                );
            }
        }

        let approved = Strategy::new(
            strategy_id,
            company_id,
            StrategyStatus::Approved,
            Some(approved_at),
        );
        tables.strategies.insert(strategy_id, approved.clone());
        Ok(approved)
    }
}
