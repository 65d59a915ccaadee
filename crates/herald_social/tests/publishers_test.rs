//! Request construction, response parsing and account resolution for the
//! platform publishers. No network access.

use chrono::Utc;
use herald_core::{LinkedAccount, Platform};
use herald_error::{HeraldErrorKind, PublishErrorKind, RetryableError};
use herald_interface::{PlatformPublisher, PublishTarget};
use herald_social::{
    ContainerStatus, DEFAULT_TIMEOUT, FacebookPublisher, GraphClient, GraphRequest,
    InstagramPublisher, LinkedInMedia, LinkedInPublisher, PublisherRegistry, RegisteredUpload,
    created_id, person_urn, register_upload_body, ugc_post_body,
};
use serde_json::json;

fn account(
    platform: Platform,
    account_id: Option<&str>,
    page_id: Option<&str>,
    instagram_id: Option<&str>,
) -> LinkedAccount {
    LinkedAccount::new(
        7,
        platform,
        account_id.map(String::from),
        page_id.map(String::from),
        instagram_id.map(String::from),
        "gAAAA-encrypted",
        Utc::now(),
    )
}

fn target(id: &str) -> PublishTarget {
    PublishTarget(id.to_string())
}

#[test]
fn test_facebook_target_uses_page_id() {
    let publisher = FacebookPublisher::new(DEFAULT_TIMEOUT).unwrap();
    let resolved = publisher
        .target_for(&account(Platform::Facebook, Some("user-1"), Some("603484"), None))
        .unwrap();
    assert_eq!(resolved, target("603484"));

    let err = publisher
        .target_for(&account(Platform::Facebook, Some("user-1"), Some("  "), None))
        .unwrap_err();
    assert_eq!(
        err.kind,
        PublishErrorKind::MissingAccountField("page_id".to_string())
    );
}

#[test]
fn test_instagram_target_uses_instagram_id() {
    let publisher = InstagramPublisher::new(DEFAULT_TIMEOUT).unwrap();
    let resolved = publisher
        .target_for(&account(Platform::Instagram, None, Some("page"), Some("1784143")))
        .unwrap();
    assert_eq!(resolved, target("1784143"));

    assert!(publisher
        .target_for(&account(Platform::Instagram, None, Some("page"), None))
        .is_err());
}

#[test]
fn test_linkedin_target_is_person_urn() {
    let publisher = LinkedInPublisher::new(DEFAULT_TIMEOUT).unwrap();
    let resolved = publisher
        .target_for(&account(Platform::LinkedIn, Some("abc123"), None, None))
        .unwrap();
    assert_eq!(resolved, target("urn:li:person:abc123"));

    assert_eq!(person_urn("urn:li:person:abc123"), "urn:li:person:abc123");
    assert_eq!(person_urn("urn:li:organization:42"), "urn:li:organization:42");
}

#[test]
fn test_facebook_requests() {
    let page = target("603484");

    let text = FacebookPublisher::text_request(&page, "Hello #launch");
    assert_eq!(text.path(), "603484/feed");
    assert_eq!(text.get("message"), Some("Hello #launch"));

    let image = FacebookPublisher::image_request(&page, "https://cdn/x.png", "Caption");
    assert_eq!(image.path(), "603484/photos");
    assert_eq!(image.get("url"), Some("https://cdn/x.png"));
    assert_eq!(image.get("caption"), Some("Caption"));

    let bare = FacebookPublisher::image_request(&page, "https://cdn/x.png", " ");
    assert_eq!(bare.get("caption"), None);

    let video = FacebookPublisher::video_request(&page, "https://cdn/v.mp4", "Watch");
    assert_eq!(video.path(), "603484/videos");
    assert_eq!(video.get("file_url"), Some("https://cdn/v.mp4"));
    assert_eq!(video.get("description"), Some("Watch"));
}

#[test]
fn test_instagram_container_requests() {
    let ig = target("1784143");

    let image = InstagramPublisher::image_container(&ig, "https://cdn/x.png", "Caption");
    assert_eq!(image.path(), "1784143/media");
    assert_eq!(image.get("image_url"), Some("https://cdn/x.png"));
    assert_eq!(image.get("media_type"), None);

    let story = InstagramPublisher::story_container(&ig, "https://cdn/s.png");
    assert_eq!(story.get("media_type"), Some("STORIES"));
    assert_eq!(story.get("caption"), None);

    let reel = InstagramPublisher::reel_container(&ig, "https://cdn/r.mp4", "Reel");
    assert_eq!(reel.get("media_type"), Some("REELS"));
    assert_eq!(reel.get("video_url"), Some("https://cdn/r.mp4"));
    assert_eq!(reel.get("share_to_feed"), Some("true"));

    let status = InstagramPublisher::status_request("container-9");
    assert_eq!(status.path(), "container-9");
    assert_eq!(status.get("fields"), Some("status_code"));

    let publish = InstagramPublisher::publish_request(&ig, "container-9");
    assert_eq!(publish.path(), "1784143/media_publish");
    assert_eq!(publish.get("creation_id"), Some("container-9"));
}

#[test]
fn test_container_status_parsing() {
    assert_eq!(
        ContainerStatus::from_response(&json!({"status_code": "FINISHED"})),
        ContainerStatus::Finished
    );
    assert_eq!(
        ContainerStatus::from_response(&json!({"status_code": "ERROR"})),
        ContainerStatus::Error
    );
    assert_eq!(
        ContainerStatus::from_response(&json!({"id": "1"})),
        ContainerStatus::InProgress
    );
    assert_eq!(
        ContainerStatus::from_response(&json!({"status_code": "WEIRD"})),
        ContainerStatus::Other("WEIRD".to_string())
    );
}

#[test]
fn test_created_id_accepts_id_or_post_id() {
    assert_eq!(created_id(&json!({"id": "123"})).unwrap(), "123");
    assert_eq!(created_id(&json!({"post_id": "9_8"})).unwrap(), "9_8");
    assert_eq!(created_id(&json!({"id": 42})).unwrap(), "42");

    let err = created_id(&json!({"error": {"message": "bad token"}})).unwrap_err();
    assert!(matches!(err.kind, PublishErrorKind::UnexpectedResponse(_)));
}

#[test]
fn test_graph_client_urls() {
    let client = GraphClient::new(DEFAULT_TIMEOUT)
        .unwrap()
        .with_base_url("http://localhost:9000/v22.0/");
    assert_eq!(
        client.url("603484/feed"),
        "http://localhost:9000/v22.0/603484/feed"
    );

    let default = GraphClient::new(DEFAULT_TIMEOUT).unwrap();
    assert_eq!(
        default.url(GraphRequest::new("1/media").path()),
        "https://graph.facebook.com/v22.0/1/media"
    );
}

#[test]
fn test_linkedin_bodies() {
    let author = target("urn:li:person:abc");

    let register = register_upload_body(&author, LinkedInMedia::Video);
    assert_eq!(
        register["registerUploadRequest"]["recipes"][0],
        "urn:li:digitalmediaRecipe:feedshare-video"
    );
    assert_eq!(register["registerUploadRequest"]["owner"], "urn:li:person:abc");

    let text = ugc_post_body(&author, "Plain update", None);
    let share = &text["specificContent"]["com.linkedin.ugc.ShareContent"];
    assert_eq!(share["shareMediaCategory"], "NONE");
    assert!(share.get("media").is_none());
    assert_eq!(text["visibility"]["com.linkedin.ugc.MemberNetworkVisibility"], "PUBLIC");

    let long_caption = "x".repeat(300);
    let image = ugc_post_body(
        &author,
        &long_caption,
        Some((LinkedInMedia::Image, "urn:li:digitalmediaAsset:1")),
    );
    let share = &image["specificContent"]["com.linkedin.ugc.ShareContent"];
    assert_eq!(share["shareMediaCategory"], "IMAGE");
    assert_eq!(share["media"][0]["media"], "urn:li:digitalmediaAsset:1");
    assert_eq!(
        share["media"][0]["description"]["text"].as_str().unwrap().len(),
        200
    );
    assert_eq!(share["shareCommentary"]["text"].as_str().unwrap().len(), 300);
}

#[test]
fn test_registered_upload_parsing() {
    let body = json!({
        "value": {
            "uploadMechanism": {
                "com.linkedin.digitalmedia.uploading.MediaUploadHttpRequest": {
                    "uploadUrl": "https://upload.linkedin/abc"
                }
            },
            "asset": "urn:li:digitalmediaAsset:1"
        }
    });
    let upload = RegisteredUpload::from_response(&body).unwrap();
    assert_eq!(upload.upload_url(), "https://upload.linkedin/abc");
    assert_eq!(upload.asset(), "urn:li:digitalmediaAsset:1");

    assert!(RegisteredUpload::from_response(&json!({"value": {}})).is_err());
}

#[tokio::test]
async fn test_instagram_rejects_text_posts() {
    let publisher = InstagramPublisher::new(DEFAULT_TIMEOUT).unwrap();
    let err = publisher
        .publish_text(&target("1"), "token", "hello")
        .await
        .unwrap_err();
    match err.kind() {
        HeraldErrorKind::Publish(e) => {
            assert!(matches!(e.kind, PublishErrorKind::Unsupported { .. }));
            assert!(!e.is_retryable());
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[tokio::test]
async fn test_facebook_story_is_unsupported_by_default() {
    let publisher = FacebookPublisher::new(DEFAULT_TIMEOUT).unwrap();
    let err = publisher
        .publish_story(&target("1"), "token", "https://cdn/s.png")
        .await
        .unwrap_err();
    assert!(format!("{}", err).contains("does not support Story"));
}

#[test]
fn test_registry_routes_by_platform() {
    let registry = PublisherRegistry::with_defaults(DEFAULT_TIMEOUT).unwrap();
    assert_eq!(registry.len(), 3);
    for platform in [Platform::Facebook, Platform::Instagram, Platform::LinkedIn] {
        assert_eq!(registry.get(platform).unwrap().platform(), platform);
    }

    let empty = PublisherRegistry::new();
    assert!(empty.is_empty());
    assert!(empty.get(Platform::Facebook).is_err());
}
