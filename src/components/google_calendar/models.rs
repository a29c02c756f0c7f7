use chrono::{NaiveDate, NaiveTime};

/// Default event duration in minutes when the request does not name one
pub const DEFAULT_DURATION_MINUTES: i64 = 60;

/// Default number of days covered by a listing without an explicit date
pub const DEFAULT_WINDOW_DAYS: i64 = 7;

/// Popup reminder lead time attached to created events, in minutes
pub const REMINDER_MINUTES: i64 = 30;

/// Simplified calendar event representation
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, Default)]
pub struct CalendarEvent {
    pub id: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub created: Option<String>,
    pub start_date_time: Option<String>,
    pub start_date: Option<String>,
    pub end_date_time: Option<String>,
    pub end_date: Option<String>,
    pub html_link: Option<String>,
}

/// A fully validated event to be inserted into the calendar
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub title: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration_minutes: i64,
    pub description: String,
}

/// Partial update for an existing event. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct EventPatch {
    pub title: Option<String>,
    pub date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub duration_minutes: Option<i64>,
    pub description: Option<String>,
}

/// Time window for event listings. With a `date` the window is that single
/// day; otherwise it runs from now for `days` days.
#[derive(Debug, Clone)]
pub struct EventWindow {
    pub date: Option<NaiveDate>,
    pub days: i64,
}

impl Default for EventWindow {
    fn default() -> Self {
        Self {
            date: None,
            days: DEFAULT_WINDOW_DAYS,
        }
    }
}
