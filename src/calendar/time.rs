use crate::error::{invalid_input, AppResult};
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone};
use chrono_tz::Tz;

/// Parse a date string in YYYY-MM-DD format
pub fn parse_date(date_str: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|_| invalid_input(&format!("Invalid date: {}", date_str)))
}

/// Parse a time string in HH:MM format
pub fn parse_time(time_str: &str) -> AppResult<NaiveTime> {
    let parts: Vec<&str> = time_str.split(':').collect();
    if parts.len() != 2 {
        return Err(invalid_input(&format!("Invalid time format: {}", time_str)));
    }
    let hour = parts[0]
        .parse::<u32>()
        .map_err(|_| invalid_input(&format!("Invalid time format: {}", time_str)))?;
    let minute = parts[1]
        .parse::<u32>()
        .map_err(|_| invalid_input(&format!("Invalid time format: {}", time_str)))?;

    NaiveTime::from_hms_opt(hour, minute, 0)
        .ok_or_else(|| invalid_input(&format!("Invalid time of day: {}", time_str)))
}

/// Combine a calendar date and wall-clock time into an absolute instant
/// in the given zone.
///
/// The configured zones have no daylight-saving transitions, so an
/// ambiguous or skipped wall-clock time is still reported as invalid
/// input rather than silently resolved.
pub fn normalize(date: NaiveDate, wall_time: NaiveTime, zone: Tz) -> AppResult<DateTime<Tz>> {
    let naive = date.and_time(wall_time);
    match zone.from_local_datetime(&naive) {
        chrono::LocalResult::Single(dt) => Ok(dt),
        chrono::LocalResult::Ambiguous(_, _) => {
            Err(invalid_input(&format!("Ambiguous local time: {}", naive)))
        }
        chrono::LocalResult::None => {
            Err(invalid_input(&format!("Nonexistent local time: {}", naive)))
        }
    }
}
