//! Companies, their strategies and linked platform accounts.

use crate::{Platform, StrategyStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A company registered by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct Company {
    id: i32,
    user_id: i32,
    name: String,
    website: Option<String>,
    logo_url: Option<String>,
}

impl Company {
    /// Create a company record.
    pub fn new(
        id: i32,
        user_id: i32,
        name: impl Into<String>,
        website: Option<String>,
        logo_url: Option<String>,
    ) -> Self {
        Self {
            id,
            user_id,
            name: name.into(),
            website,
            logo_url,
        }
    }

    /// Website shown in frame footers.
    pub fn footer_text(&self) -> &str {
        self.website
            .as_deref()
            .map(str::trim)
            .filter(|site| !site.is_empty())
            .unwrap_or("CompanySite.com")
    }
}

/// A marketing strategy owned by a company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct Strategy {
    id: i32,
    company_id: i32,
    status: StrategyStatus,
    approved_at: Option<DateTime<Utc>>,
}

impl Strategy {
    /// Create a strategy record.
    pub fn new(
        id: i32,
        company_id: i32,
        status: StrategyStatus,
        approved_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            company_id,
            status,
            approved_at,
        }
    }
}

/// OAuth credentials for one platform, with the token still encrypted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct LinkedAccount {
    user_id: i32,
    platform: Platform,
    account_id: Option<String>,
    page_id: Option<String>,
    instagram_id: Option<String>,
    #[serde(skip_serializing)]
    encrypted_token: String,
    created_at: DateTime<Utc>,
}

impl LinkedAccount {
    /// Create a linked account record.
    pub fn new(
        user_id: i32,
        platform: Platform,
        account_id: Option<String>,
        page_id: Option<String>,
        instagram_id: Option<String>,
        encrypted_token: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            platform,
            account_id,
            page_id,
            instagram_id,
            encrypted_token: encrypted_token.into(),
            created_at,
        }
    }
}
