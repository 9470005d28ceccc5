use crate::config::Config;
use crate::error::{remote_error, AppResult};
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;
use url::Url;

use super::models::{EventRequest, EventSummary};
use super::token::TokenManager;

const CALENDAR_API: &str = "https://www.googleapis.com/calendar/v3";

/// Build the event-creation payload for the events API: one popup
/// reminder override, start/end as RFC 3339 with an explicit zone name
pub fn event_body(request: &EventRequest, timezone: &str) -> Value {
    json!({
        "summary": request.title,
        "location": request.location,
        "description": request.description,
        "start": {
            "dateTime": request.start.to_rfc3339(),
            "timeZone": timezone,
        },
        "end": {
            "dateTime": request.end.to_rfc3339(),
            "timeZone": timezone,
        },
        "reminders": {
            "useDefault": false,
            "overrides": [
                { "method": "popup", "minutes": request.reminder.minutes() }
            ],
        },
    })
}

/// Parse an events listing response into event summaries.
///
/// Timed events carry start/end as dateTime; all-day events carry a
/// bare date. An empty calendar may omit the items key entirely.
pub fn parse_event_listing(response_data: &Value) -> Vec<EventSummary> {
    let empty = Vec::new();
    let events = response_data
        .get("items")
        .and_then(|i| i.as_array())
        .unwrap_or(&empty);

    events
        .iter()
        .map(|event| {
            let id = event
                .get("id")
                .and_then(|id| id.as_str())
                .unwrap_or("")
                .to_string();
            let summary = event
                .get("summary")
                .and_then(|s| s.as_str())
                .map(|s| s.to_string());
            let location = event
                .get("location")
                .and_then(|s| s.as_str())
                .map(|s| s.to_string());

            let start_date_time = event
                .get("start")
                .and_then(|start| start.get("dateTime"))
                .and_then(|dt| dt.as_str())
                .map(|s| s.to_string());

            let start_date = event
                .get("start")
                .and_then(|start| start.get("date"))
                .and_then(|d| d.as_str())
                .map(|s| s.to_string());

            let end_date_time = event
                .get("end")
                .and_then(|end| end.get("dateTime"))
                .and_then(|dt| dt.as_str())
                .map(|s| s.to_string());

            let end_date = event
                .get("end")
                .and_then(|end| end.get("date"))
                .and_then(|d| d.as_str())
                .map(|s| s.to_string());

            EventSummary {
                id,
                summary,
                location,
                start_date_time,
                start_date,
                end_date_time,
                end_date,
            }
        })
        .collect()
}

/// Client for the Google Calendar events API.
///
/// Each call obtains a bearer token from the injected credential cache
/// first; if that fails no calendar request is made.
#[derive(Clone)]
pub struct CalendarGateway {
    config: Arc<RwLock<Config>>,
    token_manager: TokenManager,
    client: Client,
}

impl CalendarGateway {
    pub fn new(config: Arc<RwLock<Config>>, token_manager: TokenManager) -> Self {
        Self {
            config,
            token_manager,
            client: Client::new(),
        }
    }

    /// Create one event on the configured calendar and return its id.
    ///
    /// Not idempotent: resubmitting after a timeout can create a
    /// duplicate event.
    pub async fn create_event(&self, request: &EventRequest) -> AppResult<String> {
        let (calendar_id, timezone) = {
            let config_read = self.config.read().await;
            (
                config_read.google_calendar_id.clone(),
                config_read.timezone.clone(),
            )
        };

        let access_token = self.token_manager.get_access_token().await?;

        let body = event_body(request, &timezone);

        let url_str = format!("{}/calendars/{}/events", CALENDAR_API, calendar_id);

        let response = self
            .client
            .post(&url_str)
            .header("Authorization", format!("Bearer {}", access_token))
            .json(&body)
            .send()
            .await
            .map_err(|e| remote_error(&format!("Failed to create event: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(remote_error(&format!(
                "Failed to create event: HTTP {} - {}",
                status, error_body
            )));
        }

        let created: Value = response
            .json()
            .await
            .map_err(|e| remote_error(&format!("Failed to parse create response: {}", e)))?;

        let event_id = created
            .get("id")
            .and_then(|id| id.as_str())
            .ok_or_else(|| remote_error("Create response missing event id"))?
            .to_string();

        info!("Created calendar event {}", event_id);
        Ok(event_id)
    }

    /// Get events starting at or after the lower bound, ascending by
    /// start time, capped at the configured listing size
    pub async fn list_upcoming(&self, lower_bound: DateTime<Utc>) -> AppResult<Vec<EventSummary>> {
        let (calendar_id, max_results) = {
            let config_read = self.config.read().await;
            (
                config_read.google_calendar_id.clone(),
                config_read.max_results,
            )
        };

        let access_token = self.token_manager.get_access_token().await?;

        let time_min = lower_bound.to_rfc3339();

        let url_str = format!("{}/calendars/{}/events", CALENDAR_API, calendar_id);
        let mut url = Url::parse(&url_str)
            .map_err(|e| remote_error(&format!("Failed to parse URL: {}", e)))?;

        url.query_pairs_mut()
            .append_pair("timeMin", &time_min)
            .append_pair("maxResults", &max_results.to_string())
            .append_pair("singleEvents", "true")
            .append_pair("orderBy", "startTime");

        let response = self
            .client
            .get(url)
            .header("Authorization", format!("Bearer {}", access_token))
            .send()
            .await
            .map_err(|e| remote_error(&format!("Failed to fetch events: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(remote_error(&format!(
                "Failed to fetch events: HTTP {} - {}",
                status, error_body
            )));
        }

        let response_data: Value = response
            .json()
            .await
            .map_err(|e| remote_error(&format!("Failed to parse events response: {}", e)))?;

        Ok(parse_event_listing(&response_data))
    }
}
