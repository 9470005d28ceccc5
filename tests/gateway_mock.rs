use audit_scheduler::calendar::{
    build_event_request, event_body, parse_event_listing, time, EventRequest, EventSummary,
    ReminderLead, TokenManager, TokenStore,
};
use audit_scheduler::config::Config;
use audit_scheduler::error::{auth_error, AppResult, Error};
use async_trait::async_trait;
use chrono_tz::Asia::Singapore;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

fn test_config() -> Arc<RwLock<Config>> {
    Arc::new(RwLock::new(Config {
        google_client_id: "test_client_id".to_string(),
        google_client_secret: "test_client_secret".to_string(),
        google_calendar_id: "test_calendar_id".to_string(),
        timezone: "Asia/Singapore".to_string(),
        token_path: "config/test_token.json".to_string(),
        max_results: 10,
        port: 3000,
    }))
}

/// Token store with no stored credential, simulating a missing or
/// revoked token
struct EmptyTokenStore;

#[async_trait]
impl TokenStore for EmptyTokenStore {
    async fn load(&self) -> AppResult<Option<Value>> {
        Ok(None)
    }

    async fn save(&self, _token: &Value) -> AppResult<()> {
        Ok(())
    }
}

/// Mock implementation of the calendar gateway for testing without the
/// real provider
struct MockCalendarGateway {
    events: Vec<EventSummary>,
    max_results: usize,
    create_calls: AtomicUsize,
}

impl MockCalendarGateway {
    fn with_events(events: Vec<EventSummary>, max_results: usize) -> Self {
        Self {
            events,
            max_results,
            create_calls: AtomicUsize::new(0),
        }
    }

    async fn create_event(&self, _request: &EventRequest) -> AppResult<String> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        Ok("mock_event_id".to_string())
    }

    async fn list_upcoming(&self) -> AppResult<Vec<EventSummary>> {
        Ok(self
            .events
            .iter()
            .take(self.max_results)
            .cloned()
            .collect())
    }
}

fn sample_events() -> Vec<EventSummary> {
    vec![
        EventSummary {
            id: "event1".to_string(),
            summary: Some("Audit: Acme - J. Lee".to_string()),
            location: Some("HQ".to_string()),
            start_date_time: Some("2025-03-10T09:00:00+08:00".to_string()),
            end_date_time: Some("2025-03-10T10:00:00+08:00".to_string()),
            ..Default::default()
        },
        EventSummary {
            id: "event2".to_string(),
            summary: Some("Audit: Globex - M. Chan".to_string()),
            location: None,
            start_date_time: Some("2025-03-11T14:00:00+08:00".to_string()),
            end_date_time: Some("2025-03-11T15:00:00+08:00".to_string()),
            ..Default::default()
        },
        EventSummary {
            id: "event3".to_string(),
            summary: Some("Audit: Initech - R. Tan".to_string()),
            location: Some("Site office".to_string()),
            start_date_time: Some("2025-03-12T09:30:00+08:00".to_string()),
            end_date_time: Some("2025-03-12T11:00:00+08:00".to_string()),
            ..Default::default()
        },
    ]
}

/// The event-create payload carries exactly one popup override at the
/// requested lead, and start/end as dateTime with an explicit zone name
#[test]
fn test_event_body_wire_shape() {
    let date = time::parse_date("2025-03-10").unwrap();
    let start = time::normalize(date, time::parse_time("09:00").unwrap(), Singapore).unwrap();
    let end = time::normalize(date, time::parse_time("10:00").unwrap(), Singapore).unwrap();
    let request =
        build_event_request("Acme", "J. Lee", "HQ", "", start, end, ReminderLead::Fifteen)
            .unwrap();

    let body = event_body(&request, "Asia/Singapore");

    assert_eq!(body["summary"], "Audit: Acme - J. Lee");
    assert_eq!(body["location"], "HQ");
    assert_eq!(body["start"]["dateTime"], "2025-03-10T09:00:00+08:00");
    assert_eq!(body["start"]["timeZone"], "Asia/Singapore");
    assert_eq!(body["end"]["dateTime"], "2025-03-10T10:00:00+08:00");
    assert_eq!(body["end"]["timeZone"], "Asia/Singapore");

    assert_eq!(body["reminders"]["useDefault"], false);
    let overrides = body["reminders"]["overrides"].as_array().unwrap();
    assert_eq!(overrides.len(), 1);
    assert_eq!(overrides[0]["method"], "popup");
    assert_eq!(overrides[0]["minutes"], 15);
}

/// The listing parse handles both timed (dateTime) and all-day (date)
/// events and preserves the provider's start-time order
#[test]
fn test_parse_event_listing_wire_variants() {
    let response = json!({
        "items": [
            {
                "id": "event1",
                "summary": "Audit: Acme - J. Lee",
                "location": "HQ",
                "start": { "dateTime": "2025-03-10T09:00:00+08:00" },
                "end": { "dateTime": "2025-03-10T10:00:00+08:00" },
            },
            {
                "id": "event2",
                "summary": "Audit: Globex - M. Chan",
                "start": { "date": "2025-03-12" },
                "end": { "date": "2025-03-13" },
            },
        ],
    });

    let events = parse_event_listing(&response);

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].id, "event1");
    assert_eq!(events[0].display_start(), "2025-03-10T09:00:00+08:00");
    assert_eq!(events[0].location.as_deref(), Some("HQ"));
    assert_eq!(events[1].id, "event2");
    assert_eq!(events[1].display_start(), "2025-03-12");
    assert_eq!(events[1].display_end(), "2025-03-13");
    assert!(events[1].start_date_time.is_none());
    assert!(events[0].display_start() <= events[1].display_start());
}

/// An empty calendar may omit the items key; the parse yields an empty
/// listing rather than an error
#[test]
fn test_parse_event_listing_without_items() {
    let events = parse_event_listing(&json!({}));
    assert!(events.is_empty());

    let events = parse_event_listing(&json!({ "items": [] }));
    assert!(events.is_empty());
}

/// Listing results are non-decreasing in start time and never exceed
/// the requested cap
#[tokio::test]
async fn test_listing_is_ordered_and_capped() {
    let gateway = MockCalendarGateway::with_events(sample_events(), 2);
    let events = gateway.list_upcoming().await.unwrap();

    assert_eq!(events.len(), 2);
    for pair in events.windows(2) {
        assert!(pair[0].display_start() <= pair[1].display_start());
    }
}

/// An empty calendar yields an empty listing, which the presentation
/// layer turns into an explicit empty state
#[tokio::test]
async fn test_empty_listing() {
    let gateway = MockCalendarGateway::with_events(Vec::new(), 10);
    let events = gateway.list_upcoming().await.unwrap();
    assert!(events.is_empty());

    let page = audit_scheduler::web::handlers::render_upcoming(&events);
    assert!(page.contains("No upcoming audits scheduled."));
}

/// A populated listing renders one row per event
#[tokio::test]
async fn test_listing_rows_rendered() {
    let events = sample_events();
    let page = audit_scheduler::web::handlers::render_upcoming(&events);

    assert!(page.contains("Audit: Acme - J. Lee"));
    assert!(page.contains("Audit: Globex - M. Chan"));
    assert!(!page.contains("No upcoming audits scheduled."));
}

/// User-supplied text is escaped before it lands in the listing markup
#[tokio::test]
async fn test_listing_escapes_markup() {
    let events = vec![EventSummary {
        id: "event1".to_string(),
        summary: Some("Audit: O'Neill & Sons <Ltd> - \"J\"".to_string()),
        location: Some("HQ".to_string()),
        start_date_time: Some("2025-03-10T09:00:00+08:00".to_string()),
        end_date_time: Some("2025-03-10T10:00:00+08:00".to_string()),
        ..Default::default()
    }];

    let page = audit_scheduler::web::handlers::render_upcoming(&events);

    assert!(page.contains("O&#39;Neill &amp; Sons &lt;Ltd&gt; - &quot;J&quot;"));
    assert!(!page.contains("<Ltd>"));
}

/// When the credential supplier fails, no create call ever reaches the
/// provider
#[tokio::test]
async fn test_credential_failure_short_circuits_create() {
    let config = test_config();
    let token_manager = TokenManager::new(Arc::clone(&config), Arc::new(EmptyTokenStore));
    let gateway = MockCalendarGateway::with_events(Vec::new(), 10);

    let date = time::parse_date("2025-03-10").unwrap();
    let start = time::normalize(date, time::parse_time("09:00").unwrap(), Singapore).unwrap();
    let end = time::normalize(date, time::parse_time("10:00").unwrap(), Singapore).unwrap();
    let request =
        build_event_request("Acme", "J. Lee", "", "", start, end, ReminderLead::Fifteen).unwrap();

    // The credential step runs before any provider call
    let result = match token_manager.get_access_token().await {
        Ok(_) => gateway.create_event(&request).await,
        Err(e) => Err(e),
    };

    let err = result.unwrap_err();
    assert!(matches!(err, Error::Auth(_)));
    assert_eq!(gateway.create_calls.load(Ordering::SeqCst), 0);
}

/// The mock gateway reports a created event id when credentials are
/// available
#[tokio::test]
async fn test_mock_create_event() {
    let gateway = MockCalendarGateway::with_events(Vec::new(), 10);

    let date = time::parse_date("2025-03-10").unwrap();
    let start = time::normalize(date, time::parse_time("09:00").unwrap(), Singapore).unwrap();
    let end = time::normalize(date, time::parse_time("10:00").unwrap(), Singapore).unwrap();
    let request =
        build_event_request("Acme", "J. Lee", "", "", start, end, ReminderLead::Fifteen).unwrap();

    let id = gateway.create_event(&request).await.unwrap();
    assert_eq!(id, "mock_event_id");
    assert_eq!(gateway.create_calls.load(Ordering::SeqCst), 1);
}

/// Auth errors carry a user-facing message
#[tokio::test]
async fn test_auth_error_message() {
    let err = auth_error("consent denied");
    assert!(matches!(err, Error::Auth(_)));
    assert!(err.to_string().contains("consent denied"));
}
