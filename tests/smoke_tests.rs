use audit_scheduler::calendar::{FileTokenStore, TokenStore};
use audit_scheduler::config::{Config, DEFAULT_MAX_RESULTS, DEFAULT_TIMEZONE};
use audit_scheduler::error::{invalid_input, remote_error, Error};
use serde_json::json;

/// Smoke test to verify that a config can be constructed and the zone
/// resolves against the tz database
#[test]
fn test_config_zone() {
    let config = Config {
        google_client_id: String::new(),
        google_client_secret: String::new(),
        google_calendar_id: "primary".to_string(),
        timezone: DEFAULT_TIMEZONE.to_string(),
        token_path: "config/calendar_token.json".to_string(),
        max_results: DEFAULT_MAX_RESULTS,
        port: 3000,
    };

    assert_eq!(config.zone(), chrono_tz::Asia::Singapore);
    assert_eq!(config.max_results, 10);
}

/// The file token store round-trips an opaque token blob
#[tokio::test]
async fn test_file_token_store_round_trip() {
    let path = std::env::temp_dir().join(format!("audit_token_{}.json", std::process::id()));
    let store = FileTokenStore::new(&path);

    // Nothing stored yet
    assert!(store.load().await.unwrap().is_none());

    let token = json!({
        "access_token": "abc",
        "refresh_token": "def",
        "expires_at": 1_700_000_000i64,
    });
    store.save(&token).await.unwrap();

    let loaded = store.load().await.unwrap().unwrap();
    assert_eq!(loaded.get("access_token").and_then(|v| v.as_str()), Some("abc"));
    assert_eq!(loaded.get("expires_at").and_then(|v| v.as_i64()), Some(1_700_000_000));

    let _ = std::fs::remove_file(&path);
}

/// Error variants render distinct user-facing messages
#[test]
fn test_error_taxonomy_messages() {
    let invalid = invalid_input("Feb 30 is not a date");
    assert!(invalid.to_string().starts_with("Invalid input:"));
    assert!(matches!(invalid, Error::InvalidInput(_)));

    let remote = remote_error("HTTP 403 - quota exceeded");
    assert!(remote.to_string().starts_with("Calendar provider error:"));
    assert!(matches!(remote, Error::Remote(_)));
}
