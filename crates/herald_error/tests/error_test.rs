use herald_error::{
    ConfigError, ContentError, ContentErrorKind, DatabaseError, DatabaseErrorKind, GenerationError,
    GenerationErrorKind, HeraldError, HeraldErrorKind, HttpError, PublishError,
    PublishErrorKind, RetryableError, StorageError, StorageErrorKind,
};

#[test]
fn test_location_is_captured_at_call_site() {
    let err = ContentError::new(ContentErrorKind::UnknownPlatform("Myspace".to_string()));
    assert!(err.file.ends_with("error_test.rs"));
    assert!(err.line > 0);
}

#[test]
fn test_storage_retry_classification() {
    let transient = StorageError::new(StorageErrorKind::Transient("reset by peer".to_string()));
    assert!(transient.is_retryable());

    let unavailable = StorageError::new(StorageErrorKind::Upload {
        status_code: 503,
        message: "busy".to_string(),
    });
    assert!(unavailable.is_retryable());

    let unauthorized = StorageError::new(StorageErrorKind::Upload {
        status_code: 401,
        message: "bad signature".to_string(),
    });
    assert!(!unauthorized.is_retryable());

    let config = StorageError::new(StorageErrorKind::InvalidConfig("no cloud".to_string()));
    assert!(!config.is_retryable());
}

#[test]
fn test_database_retry_classification() {
    let lost = DatabaseError::new(DatabaseErrorKind::Connection("pool timed out".to_string()));
    assert!(lost.is_retryable());

    let through_top_level: HeraldError = lost.into();
    assert!(through_top_level.is_retryable());

    assert!(!DatabaseError::new(DatabaseErrorKind::NotFound).is_retryable());
    assert!(!DatabaseError::new(DatabaseErrorKind::Query("syntax".to_string())).is_retryable());
}

#[test]
fn test_empty_output_is_not_retried() {
    let err = GenerationError::new(GenerationErrorKind::EmptyOutput);
    assert!(!err.is_retryable());
}

#[test]
fn test_kind_discrimination_through_top_level() {
    let err: HeraldError = PublishError::new(PublishErrorKind::Unsupported {
        platform: "Instagram".to_string(),
        content_type: "TextPost".to_string(),
    })
    .into();

    match err.kind() {
        HeraldErrorKind::Publish(inner) => {
            assert!(matches!(inner.kind, PublishErrorKind::Unsupported { .. }))
        }
        other => panic!("unexpected kind: {other}"),
    }
}

#[test]
fn test_client_build_failure_names_the_service() {
    let err = HttpError::client_build("graph", "no TLS backend");
    assert_eq!(err.service, "graph");
    assert!(err.file.ends_with("error_test.rs"));

    let top: HeraldError = err.into();
    assert!(matches!(top.kind(), HeraldErrorKind::Http(_)));
    assert!(!top.is_retryable());
    assert!(top.to_string().contains("(graph): failed to build client: no TLS backend"));
}

#[test]
fn test_secret_errors_carry_the_variable() {
    let missing = ConfigError::missing_env("TOGETHER_API_KEY");
    assert_eq!(missing.key.as_deref(), Some("TOGETHER_API_KEY"));
    assert!(missing.file.ends_with("error_test.rs"));

    let invalid = ConfigError::invalid_env("ENCRYPTION_KEY", "is not a valid Fernet key");
    assert_eq!(invalid.message, "ENCRYPTION_KEY is not a valid Fernet key");

    assert!(ConfigError::new("Failed to parse configuration").key.is_none());
}
