use super::models::CalendarEvent;
use crate::error::{google_calendar_error, BotResult};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone};
use chrono_tz::Tz;

/// Parse time string in HH:MM format
pub fn parse_time(time_str: &str) -> Option<(u32, u32)> {
    let parts: Vec<&str> = time_str.split(':').collect();
    if parts.len() != 2 {
        return None;
    }
    let hour = parts[0].parse::<u32>().ok()?;
    let minute = parts[1].parse::<u32>().ok()?;
    if hour > 23 || minute > 59 {
        return None;
    }
    Some((hour, minute))
}

/// Parse a HH:MM string into a NaiveTime
pub fn parse_clock(time_str: &str) -> Option<NaiveTime> {
    let (hour, minute) = parse_time(time_str)?;
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Parse a YYYY-MM-DD string into a NaiveDate
pub fn parse_date(date_str: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").ok()
}

/// Resolve a timezone name from config into a chrono-tz zone
pub fn parse_timezone(name: &str) -> BotResult<Tz> {
    name.parse::<Tz>()
        .map_err(|_| google_calendar_error(&format!("Invalid timezone: {}", name)))
}

/// Midnight-to-midnight bounds of a calendar date in the given timezone
pub fn day_bounds(date: NaiveDate, tz: &Tz) -> BotResult<(DateTime<Tz>, DateTime<Tz>)> {
    let start = local_midnight(date, tz)?;
    let end = local_midnight(date + Duration::days(1), tz)?;
    Ok((start, end))
}

fn local_midnight(date: NaiveDate, tz: &Tz) -> BotResult<DateTime<Tz>> {
    let naive = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| google_calendar_error("Failed to create datetime"))?;
    match tz.from_local_datetime(&naive) {
        chrono::LocalResult::Single(dt) => Ok(dt),
        chrono::LocalResult::Ambiguous(_, _) => {
            Err(google_calendar_error("Ambiguous local time"))
        }
        chrono::LocalResult::None => Err(google_calendar_error("Invalid local time")),
    }
}

/// Get event start time in the given timezone, if the event has one
pub fn event_start(event: &CalendarEvent, tz: &Tz) -> BotResult<Option<DateTime<Tz>>> {
    if let Some(start_time) = &event.start_date_time {
        let dt = DateTime::parse_from_rfc3339(start_time)
            .map_err(|e| google_calendar_error(&format!("Failed to parse datetime: {}", e)))?;
        Ok(Some(dt.with_timezone(tz)))
    } else if let Some(start_date) = &event.start_date {
        let date = NaiveDate::parse_from_str(start_date, "%Y-%m-%d")
            .map_err(|e| google_calendar_error(&format!("Failed to parse date: {}", e)))?;
        Ok(Some(local_midnight(date, tz)?))
    } else {
        Ok(None)
    }
}
