//! Tests for row to domain conversions.

use chrono::{TimeZone, Utc};
use herald_core::{
    ContentItem, ContentStatus, ContentType, LinkedAccount, Platform, Strategy, StrategyStatus,
};
use herald_database::{ContentItemRow, LinkedAccountRow, StrategyRow};

fn item_row(content_type: &str, status: &str) -> ContentItemRow {
    ContentItemRow {
        id: 5,
        company_id: 1,
        strategy_id: 2,
        user_id: 42,
        platform: "Instagram".to_string(),
        content_type: content_type.to_string(),
        caption: Some("New menu".to_string()),
        hashtags: Some("#food".to_string()),
        image_prompt: None,
        media_link: None,
        video_placeholder: Some("Chef plating a dish".to_string()),
        best_time: Some("Friday 6PM".to_string()),
        status: status.to_string(),
        rejected_at: None,
    }
}

#[test]
fn test_legacy_labels_parse_into_closed_enum() {
    let item = ContentItem::try_from(item_row("Instagram Reels", "approved")).unwrap();

    assert_eq!(item.platform, Platform::Instagram);
    assert_eq!(item.content_type, ContentType::Reel);
    assert_eq!(item.status, ContentStatus::Approved);
    assert_eq!(item.best_time, "Friday 6PM");
    assert_eq!(item.video_prompt(), Some("Chef plating a dish"));
}

#[test]
fn test_unknown_content_type_is_an_error() {
    assert!(ContentItem::try_from(item_row("Carousel Posts", "approved")).is_err());
    assert!(ContentItem::try_from(item_row("Instagram Reels", "scheduled")).is_err());
}

#[test]
fn test_missing_caption_and_time_default_to_empty() {
    let mut row = item_row("Text Posts", "pending");
    row.caption = None;
    row.best_time = None;

    let item = ContentItem::try_from(row).unwrap();
    assert_eq!(item.caption, "");
    assert_eq!(item.best_time, "");
}

#[test]
fn test_legacy_archived_strategy_status() {
    let row = StrategyRow {
        id: 9,
        company_id: 1,
        status: "denied - archived".to_string(),
        approved_at: None,
    };
    let strategy = Strategy::try_from(row).unwrap();
    assert_eq!(*strategy.status(), StrategyStatus::Archived);
}

#[test]
fn test_linked_account_platform_is_case_insensitive() {
    let created_at = Utc.with_ymd_and_hms(2025, 1, 6, 12, 0, 0).unwrap();
    let row = LinkedAccountRow {
        id: 1,
        user_id: 42,
        platform: "linkedin".to_string(),
        account_id: Some("urn:li:person:abc".to_string()),
        page_id: None,
        instagram_id: None,
        access_token: "gAAAA-encrypted".to_string(),
        created_at,
    };

    let account = LinkedAccount::try_from(row).unwrap();
    assert_eq!(*account.platform(), Platform::LinkedIn);
    assert_eq!(account.encrypted_token(), "gAAAA-encrypted");
    assert_eq!(*account.created_at(), created_at);
}
