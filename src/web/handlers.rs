use axum::{
    extract::{Form, State},
    response::{Html, IntoResponse},
};
use serde::Deserialize;
use tracing::{error, info};

use crate::calendar::{build_event_request, time, EventSummary, ReminderLead};
use crate::error::Error;

use super::AppState;

/// Raw form input as submitted by the scheduling page
#[derive(Debug, Deserialize)]
pub struct ScheduleForm {
    pub company: String,
    pub auditor: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub notes: String,
    pub reminder_minutes: u32,
}

/// Escape user-supplied text for inclusion in HTML
fn html_escape(input: &str) -> String {
    input
        .chars()
        .map(|c| match c {
            '&' => "&amp;".to_string(),
            '<' => "&lt;".to_string(),
            '>' => "&gt;".to_string(),
            '"' => "&quot;".to_string(),
            '\'' => "&#39;".to_string(),
            _ => c.to_string(),
        })
        .collect()
}

/// Choose the user-facing message for a pipeline failure
fn error_message(err: &Error) -> String {
    match err {
        Error::InvalidInput(msg) => format!("Invalid input: {}", msg),
        Error::Auth(msg) => format!("Calendar authentication failed: {}", msg),
        Error::Remote(msg) => format!("Calendar provider error: {}", msg),
        other => format!("Unexpected error: {}", other),
    }
}

fn render_index(message: Option<&str>, is_error: bool) -> Html<String> {
    let html = include_str!("../../assets/index.html");
    let html = match message {
        Some(msg) => {
            let class = if is_error { "banner error" } else { "banner success" };
            html.replace(
                "<!-- MESSAGE -->",
                &format!("<div class=\"{}\">{}</div>", class, html_escape(msg)),
            )
        }
        None => html.to_string(),
    };
    Html(html)
}

/// Handler for the scheduling form page
pub async fn index_handler() -> impl IntoResponse {
    render_index(None, false)
}

/// Handler for form submission: normalize the times, build the event
/// request and push it to the calendar
pub async fn schedule_handler(
    State(state): State<AppState>,
    Form(form): Form<ScheduleForm>,
) -> impl IntoResponse {
    match schedule(&state, &form).await {
        Ok(event_id) => {
            info!("Scheduled audit for {} (event {})", form.company, event_id);
            render_index(
                Some(&format!(
                    "Audit scheduled for {} on {} at {} (event {}).",
                    form.company, form.date, form.start_time, event_id
                )),
                false,
            )
        }
        Err(e) => {
            error!("Failed to schedule audit: {}", e);
            render_index(Some(&error_message(&e)), true)
        }
    }
}

async fn schedule(state: &AppState, form: &ScheduleForm) -> Result<String, Error> {
    let zone = {
        let config_read = state.config.read().await;
        config_read.zone()
    };

    // All local validation happens before any remote call
    let date = time::parse_date(&form.date)?;
    let start_time = time::parse_time(&form.start_time)?;
    let end_time = time::parse_time(&form.end_time)?;

    let start = time::normalize(date, start_time, zone)?;
    let end = time::normalize(date, end_time, zone)?;

    let reminder = ReminderLead::try_from(form.reminder_minutes)?;

    let request = build_event_request(
        &form.company,
        &form.auditor,
        &form.location,
        &form.notes,
        start,
        end,
        reminder,
    )?;

    state.gateway.create_event(&request).await
}

/// Render the listing page, with an explicit empty state when there is
/// nothing upcoming
pub fn render_upcoming(events: &[EventSummary]) -> String {
    let html = include_str!("../../assets/upcoming.html");
    if events.is_empty() {
        return html.replace(
            "<!-- EVENT_ROWS -->",
            "<p class=\"empty\">No upcoming audits scheduled.</p>",
        );
    }

    let mut rows = String::from("<table><tr><th>When</th><th>Audit</th><th>Location</th></tr>");
    for event in events {
        rows.push_str(&format!(
            "<tr><td>{} &ndash; {}</td><td>{}</td><td>{}</td></tr>",
            html_escape(event.display_start()),
            html_escape(event.display_end()),
            html_escape(event.summary.as_deref().unwrap_or("(untitled)")),
            html_escape(event.location.as_deref().unwrap_or("")),
        ));
    }
    rows.push_str("</table>");

    html.replace("<!-- EVENT_ROWS -->", &rows)
}

/// Handler for the upcoming-audits listing page
pub async fn upcoming_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.gateway.list_upcoming(chrono::Utc::now()).await {
        Ok(events) => {
            info!("Fetched {} upcoming events", events.len());
            Html(render_upcoming(&events))
        }
        Err(e) => {
            error!("Failed to list upcoming audits: {}", e);
            let html = include_str!("../../assets/upcoming.html").replace(
                "<!-- EVENT_ROWS -->",
                &format!(
                    "<div class=\"banner error\">{}</div>",
                    html_escape(&error_message(&e))
                ),
            );
            Html(html)
        }
    }
}

// Handler for API health check
pub async fn health_handler() -> &'static str {
    "OK"
}
