use crate::error::{invalid_input, AppResult};
use chrono::DateTime;
use chrono_tz::Tz;

use super::models::{EventRequest, ReminderLead};

/// Assemble an event-creation request from normalized inputs.
///
/// Pure value construction: no network calls, no hidden state. Empty
/// optional fields (location, notes) pass through verbatim. The end
/// instant must be strictly after the start instant.
pub fn build_event_request(
    company: &str,
    auditor: &str,
    location: &str,
    notes: &str,
    start: DateTime<Tz>,
    end: DateTime<Tz>,
    reminder: ReminderLead,
) -> AppResult<EventRequest> {
    if end <= start {
        return Err(invalid_input("End time must be after start time"));
    }

    Ok(EventRequest {
        title: format!("Audit: {} - {}", company, auditor),
        location: location.to_string(),
        description: format!("Audit of {} conducted by {}.\n\n{}", company, auditor, notes),
        start,
        end,
        reminder,
    })
}
