//! Diesel row types and their conversion into domain records.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use herald_core::{
    Company, ContentItem, ContentStatus, ContentType, LinkedAccount, Platform, Strategy,
    StrategyStatus,
};
use herald_error::ContentError;
use serde::Serialize;

/// Database row for the companies table.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Serialize)]
#[diesel(table_name = crate::schema::companies)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CompanyRow {
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    pub website: Option<String>,
    pub logo_url: Option<String>,
}

impl From<CompanyRow> for Company {
    fn from(row: CompanyRow) -> Self {
        Company::new(row.id, row.user_id, row.name, row.website, row.logo_url)
    }
}

/// Database row for the strategies table.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Serialize)]
#[diesel(table_name = crate::schema::strategies)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct StrategyRow {
    pub id: i32,
    pub company_id: i32,
    pub status: String,
    pub approved_at: Option<DateTime<Utc>>,
}

impl TryFrom<StrategyRow> for Strategy {
    type Error = ContentError;

    fn try_from(row: StrategyRow) -> Result<Self, Self::Error> {
        let status: StrategyStatus = row.status.parse()?;
        Ok(Strategy::new(row.id, row.company_id, status, row.approved_at))
    }
}

/// Database row for the content_items table.
///
/// Content types are stored as the legacy display labels
/// ("Feed Image Posts", "Instagram Reels", ...).
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Serialize)]
#[diesel(table_name = crate::schema::content_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ContentItemRow {
    pub id: i32,
    pub company_id: i32,
    pub strategy_id: i32,
    pub user_id: i32,
    pub platform: String,
    pub content_type: String,
    pub caption: Option<String>,
    pub hashtags: Option<String>,
    pub image_prompt: Option<String>,
    pub media_link: Option<String>,
    pub video_placeholder: Option<String>,
    pub best_time: Option<String>,
    pub status: String,
    pub rejected_at: Option<DateTime<Utc>>,
}

impl TryFrom<ContentItemRow> for ContentItem {
    type Error = ContentError;

    fn try_from(row: ContentItemRow) -> Result<Self, Self::Error> {
        let platform: Platform = row.platform.parse()?;
        let content_type: ContentType = row.content_type.parse()?;
        let status: ContentStatus = row.status.parse()?;

        Ok(ContentItem {
            id: row.id,
            company_id: row.company_id,
            strategy_id: row.strategy_id,
            user_id: row.user_id,
            platform,
            content_type,
            caption: row.caption.unwrap_or_default(),
            hashtags: row.hashtags,
            image_prompt: row.image_prompt,
            media_link: row.media_link,
            video_placeholder: row.video_placeholder,
            best_time: row.best_time.unwrap_or_default(),
            status,
            rejected_at: row.rejected_at,
        })
    }
}

/// Database row for the user_linked_accounts table.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = crate::schema::user_linked_accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct LinkedAccountRow {
    pub id: i32,
    pub user_id: i32,
    pub platform: String,
    pub account_id: Option<String>,
    pub page_id: Option<String>,
    pub instagram_id: Option<String>,
    pub access_token: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<LinkedAccountRow> for LinkedAccount {
    type Error = ContentError;

    fn try_from(row: LinkedAccountRow) -> Result<Self, Self::Error> {
        let platform: Platform = row.platform.parse()?;
        Ok(LinkedAccount::new(
            row.user_id,
            platform,
            row.account_id,
            row.page_id,
            row.instagram_id,
            row.access_token,
            row.created_at,
        ))
    }
}
