use chrono::DateTime;
use chrono_tz::Tz;

/// Minutes before an event's start at which the popup reminder fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderLead {
    Five,
    Ten,
    Fifteen,
    Thirty,
    Sixty,
}

impl ReminderLead {
    /// Lead time in minutes
    pub fn minutes(&self) -> u32 {
        match self {
            ReminderLead::Five => 5,
            ReminderLead::Ten => 10,
            ReminderLead::Fifteen => 15,
            ReminderLead::Thirty => 30,
            ReminderLead::Sixty => 60,
        }
    }
}

impl TryFrom<u32> for ReminderLead {
    type Error = crate::error::Error;

    fn try_from(minutes: u32) -> Result<Self, Self::Error> {
        match minutes {
            5 => Ok(ReminderLead::Five),
            10 => Ok(ReminderLead::Ten),
            15 => Ok(ReminderLead::Fifteen),
            30 => Ok(ReminderLead::Thirty),
            60 => Ok(ReminderLead::Sixty),
            other => Err(crate::error::invalid_input(&format!(
                "Reminder lead must be one of 5, 10, 15, 30 or 60 minutes, got {}",
                other
            ))),
        }
    }
}

/// A fully assembled event-creation request, built once per form
/// submission and consumed exactly once by the calendar gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRequest {
    pub title: String,
    pub location: String,
    pub description: String,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    pub reminder: ReminderLead,
}

/// Simplified calendar event representation for the listing page.
///
/// All-day events carry a date instead of a dateTime on the wire, so
/// both variants are kept as optional fields.
#[derive(Debug, Clone, Default)]
pub struct EventSummary {
    pub id: String,
    pub summary: Option<String>,
    pub location: Option<String>,
    pub start_date_time: Option<String>,
    pub start_date: Option<String>,
    pub end_date_time: Option<String>,
    pub end_date: Option<String>,
}

impl EventSummary {
    /// Start of the event as displayed on the listing page
    pub fn display_start(&self) -> &str {
        self.start_date_time
            .as_deref()
            .or(self.start_date.as_deref())
            .unwrap_or("(unknown)")
    }

    /// End of the event as displayed on the listing page
    pub fn display_end(&self) -> &str {
        self.end_date_time
            .as_deref()
            .or(self.end_date.as_deref())
            .unwrap_or("(unknown)")
    }
}
