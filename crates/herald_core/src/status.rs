//! Lifecycle states for content items and strategies.

use herald_error::{ContentError, ContentErrorKind};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a content item.
///
/// ```text
/// pending -> needs_approval -> approved -> posted
///    \______________\______________\-> rejected
///                    approved -> needs_approval   (publish failed)
/// ```
///
/// # Examples
///
/// ```
/// use herald_core::ContentStatus;
///
/// assert!(ContentStatus::Approved.can_transition_to(ContentStatus::Posted));
/// assert!(!ContentStatus::Posted.can_transition_to(ContentStatus::Approved));
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum ContentStatus {
    /// Generated, not yet surfaced for review
    #[display("pending")]
    Pending,
    /// Waiting for a human decision
    #[display("needs_approval")]
    NeedsApproval,
    /// Cleared for automatic publishing
    #[display("approved")]
    Approved,
    /// Published
    #[display("posted")]
    Posted,
    /// Discarded by a reviewer
    #[display("rejected")]
    Rejected,
}

impl ContentStatus {
    /// Convert to string representation for database storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentStatus::Pending => "pending",
            ContentStatus::NeedsApproval => "needs_approval",
            ContentStatus::Approved => "approved",
            ContentStatus::Posted => "posted",
            ContentStatus::Rejected => "rejected",
        }
    }

    /// Whether the lifecycle permits moving from `self` to `next`.
    pub fn can_transition_to(&self, next: ContentStatus) -> bool {
        use ContentStatus::*;
        matches!(
            (self, next),
            (Pending, NeedsApproval)
                | (Pending, Approved)
                | (Pending, Rejected)
                | (NeedsApproval, Approved)
                | (NeedsApproval, Rejected)
                | (Approved, Posted)
                | (Approved, NeedsApproval)
                | (Approved, Rejected)
        )
    }

    /// Returns an error unless the transition is permitted.
    #[track_caller]
    pub fn ensure_transition(&self, next: ContentStatus) -> Result<(), ContentError> {
        if self.can_transition_to(next) {
            Ok(())
        } else {
            Err(ContentError::new(ContentErrorKind::InvalidTransition {
                from: self.to_string(),
                to: next.to_string(),
            }))
        }
    }
}

impl std::str::FromStr for ContentStatus {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ContentStatus::Pending),
            "needs_approval" => Ok(ContentStatus::NeedsApproval),
            "approved" => Ok(ContentStatus::Approved),
            "posted" => Ok(ContentStatus::Posted),
            "rejected" => Ok(ContentStatus::Rejected),
            _ => Err(ContentError::new(ContentErrorKind::UnknownStatus(
                s.to_string(),
            ))),
        }
    }
}

/// Lifecycle state of a marketing strategy.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum StrategyStatus {
    /// Awaiting review
    #[display("draft")]
    Draft,
    /// The company's live strategy
    #[display("approved")]
    Approved,
    /// Superseded by a later approval
    #[display("archived")]
    Archived,
}

impl StrategyStatus {
    /// Convert to string representation for database storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyStatus::Draft => "draft",
            StrategyStatus::Approved => "approved",
            StrategyStatus::Archived => "archived",
        }
    }
}

impl std::str::FromStr for StrategyStatus {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" | "pending" => Ok(StrategyStatus::Draft),
            "approved" => Ok(StrategyStatus::Approved),
            "archived" | "denied - archived" => Ok(StrategyStatus::Archived),
            _ => Err(ContentError::new(ContentErrorKind::UnknownStrategyStatus(
                s.to_string(),
            ))),
        }
    }
}
