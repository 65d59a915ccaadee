use herald::{HeraldConfig, HeraldErrorKind, StorageBackend};
use std::io::Write;
use std::time::Duration;

#[test]
fn test_bundled_defaults_match_default_impl() {
    let config = HeraldConfig::from_toml_str("").unwrap();
    assert_eq!(config, HeraldConfig::default());
    assert_eq!(config.storage.backend, StorageBackend::Cloudinary);
    assert_eq!(config.schedule.utc_offset_minutes, None);
    assert_eq!(config.schedule.past_due_delay(), Duration::from_secs(5));
    assert_eq!(config.http.timeout(), Duration::from_secs(30));
}

#[test]
fn test_overrides_keep_unspecified_defaults() {
    let config = HeraldConfig::from_toml_str(
        r#"
        [schedule]
        utc_offset_minutes = -300
        poll_interval_secs = 60

        [storage]
        backend = "filesystem"
        root = "/srv/herald"
        public_base_url = "https://media.example.com"
        "#,
    )
    .unwrap();

    assert_eq!(config.schedule.utc_offset_minutes, Some(-300));
    assert_eq!(config.schedule.poll_interval(), Duration::from_secs(60));
    assert_eq!(config.schedule.past_due_delay_secs, 5);
    assert_eq!(config.storage.backend, StorageBackend::Filesystem);
    assert_eq!(config.storage.root.to_str(), Some("/srv/herald"));
    assert_eq!(
        config.storage.public_base_url.as_deref(),
        Some("https://media.example.com")
    );
    assert_eq!(config.media.image_steps, 4);
    assert_eq!(config.media.scratch_dir, None);
}

#[test]
fn test_media_scratch_dir_override() {
    let config =
        HeraldConfig::from_toml_str("[media]\nscratch_dir = \"/var/tmp/herald\"\n").unwrap();
    assert_eq!(
        config.media.scratch_dir.as_deref().and_then(|p| p.to_str()),
        Some("/var/tmp/herald")
    );
    assert_eq!(config.media.render_dir.to_str(), Some("renders"));
}

#[test]
fn test_unknown_storage_backend_is_a_config_error() {
    let err = HeraldConfig::from_toml_str("[storage]\nbackend = \"s3\"\n").unwrap_err();
    assert!(matches!(err.kind(), HeraldErrorKind::Config(_)));
}

#[test]
fn test_zero_poll_interval_is_clamped() {
    let config = HeraldConfig::from_toml_str("[schedule]\npoll_interval_secs = 0\n").unwrap();
    assert_eq!(config.schedule.poll_interval(), Duration::from_secs(1));
}

#[test]
fn test_upload_retry_policy_from_media_section() {
    let config = HeraldConfig::from_toml_str(
        "[media]\nupload_retries = 5\nupload_base_delay_ms = 250\n",
    )
    .unwrap();
    let policy = config.media.upload_retry();
    assert_eq!(*policy.retries(), 5);
    assert_eq!(*policy.base_delay(), Duration::from_millis(250));
    assert_eq!(*policy.max_delay(), Duration::from_secs(2));
}

#[test]
fn test_from_file_reads_only_that_file() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "[logging]\nlevel = \"debug\"\njson = true").unwrap();

    let config = HeraldConfig::from_file(file.path()).unwrap();
    assert_eq!(config.logging.level, "debug");
    assert!(config.logging.json);
    assert_eq!(config.database.pool_size, 8);
}

#[test]
fn test_from_file_missing_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = HeraldConfig::from_file(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err.kind(), HeraldErrorKind::Config(_)));
}

#[test]
fn test_environment_overrides_files() {
    let mut vars = config::Map::new();
    vars.insert(
        "HERALD__SCHEDULE__PAST_DUE_DELAY_SECS".to_string(),
        "0".to_string(),
    );
    vars.insert("HERALD__LOGGING__JSON".to_string(), "true".to_string());
    vars.insert("HERALD__STORAGE__BACKEND".to_string(), "filesystem".to_string());
    vars.insert("UNRELATED__LOGGING__JSON".to_string(), "false".to_string());

    let config = HeraldConfig::load_with_vars(vars).unwrap();
    assert_eq!(config.schedule.past_due_delay(), Duration::ZERO);
    assert!(config.logging.json);
    assert_eq!(config.storage.backend, StorageBackend::Filesystem);
}
