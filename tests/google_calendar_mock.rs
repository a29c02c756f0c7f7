use chrono::Duration;
use schedbot::components::google_calendar::models::{
    CalendarEvent, EventPatch, EventWindow, NewEvent,
};
use schedbot::error::{BotResult, Error};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Mock implementation of the Google Calendar handle surface for testing
#[derive(Clone, Default)]
pub struct MockCalendarHandle {
    events: Arc<Mutex<Vec<CalendarEvent>>>,
    next_id: Arc<AtomicUsize>,
}

impl MockCalendarHandle {
    /// Create a new mock handle with predefined events
    pub fn new() -> Self {
        let events = vec![
            CalendarEvent {
                id: "event1".to_string(),
                summary: Some("Morning Meeting".to_string()),
                description: Some("Team sync".to_string()),
                start_date_time: Some("2025-10-30T09:00:00+00:00".to_string()),
                end_date_time: Some("2025-10-30T10:00:00+00:00".to_string()),
                ..Default::default()
            },
            CalendarEvent {
                id: "event2".to_string(),
                summary: Some("Lunch Break".to_string()),
                description: Some(String::new()),
                start_date_time: Some("2025-10-31T12:00:00+00:00".to_string()),
                end_date_time: Some("2025-10-31T13:00:00+00:00".to_string()),
                ..Default::default()
            },
        ];

        Self {
            events: Arc::new(Mutex::new(events)),
            next_id: Arc::new(AtomicUsize::new(1)),
        }
    }

    /// Insert a new event into the mock store
    pub async fn create_event(&self, event: NewEvent) -> BotResult<CalendarEvent> {
        let id = format!("mock_event_{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        let start = event.date.and_time(event.start_time);
        let end = start + Duration::minutes(event.duration_minutes);

        let created = CalendarEvent {
            id: id.clone(),
            summary: Some(event.title),
            description: Some(event.description),
            start_date_time: Some(format!("{}+00:00", start.format("%Y-%m-%dT%H:%M:%S"))),
            end_date_time: Some(format!("{}+00:00", end.format("%Y-%m-%dT%H:%M:%S"))),
            html_link: Some(format!("https://calendar.google.com/event?eid={}", id)),
            ..Default::default()
        };

        let mut events = self.events.lock().await;
        events.push(created.clone());
        Ok(created)
    }

    /// List events, filtered to the window's day if one is given
    pub async fn list_events(&self, window: EventWindow) -> BotResult<Vec<CalendarEvent>> {
        let events = self.events.lock().await;

        match window.date {
            Some(date) => {
                let prefix = date.format("%Y-%m-%d").to_string();
                Ok(events
                    .iter()
                    .filter(|e| {
                        e.start_date_time
                            .as_deref()
                            .map(|s| s.starts_with(&prefix))
                            .unwrap_or(false)
                    })
                    .cloned()
                    .collect())
            }
            None => Ok(events.clone()),
        }
    }

    /// Update an event with the non-empty patch fields
    pub async fn update_event(
        &self,
        event_id: &str,
        patch: EventPatch,
    ) -> BotResult<CalendarEvent> {
        let mut events = self.events.lock().await;
        let event = events
            .iter_mut()
            .find(|e| e.id == event_id)
            .ok_or_else(|| Error::EventNotFound(event_id.to_string()))?;

        if let Some(title) = patch.title {
            event.summary = Some(title);
        }
        if let Some(description) = patch.description {
            event.description = Some(description);
        }
        if let (Some(date), Some(time)) = (patch.date, patch.start_time) {
            let start = date.and_time(time);
            event.start_date_time =
                Some(format!("{}+00:00", start.format("%Y-%m-%dT%H:%M:%S")));

            if let Some(duration) = patch.duration_minutes {
                let end = start + Duration::minutes(duration);
                event.end_date_time =
                    Some(format!("{}+00:00", end.format("%Y-%m-%dT%H:%M:%S")));
            }
        }

        Ok(event.clone())
    }

    /// Delete an event, returning its data for the confirmation reply
    pub async fn delete_event(&self, event_id: &str) -> BotResult<CalendarEvent> {
        let mut events = self.events.lock().await;
        let idx = events
            .iter()
            .position(|e| e.id == event_id)
            .ok_or_else(|| Error::EventNotFound(event_id.to_string()))?;

        Ok(events.remove(idx))
    }
}

fn new_event(title: &str, date: &str, time: &str, duration: i64) -> NewEvent {
    NewEvent {
        title: title.to_string(),
        date: chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        start_time: chrono::NaiveTime::parse_from_str(time, "%H:%M").unwrap(),
        duration_minutes: duration,
        description: String::new(),
    }
}

/// Creating an event stores it and reports the generated id and link
#[tokio::test]
async fn test_create_event() {
    let mock = MockCalendarHandle::new();

    let created = mock
        .create_event(new_event("Dentist", "2025-11-03", "14:00", 30))
        .await
        .unwrap();

    assert_eq!(created.summary, Some("Dentist".to_string()));
    assert_eq!(
        created.start_date_time,
        Some("2025-11-03T14:00:00+00:00".to_string())
    );
    assert_eq!(
        created.end_date_time,
        Some("2025-11-03T14:30:00+00:00".to_string())
    );
    assert!(created.html_link.is_some());

    let events = mock.list_events(EventWindow::default()).await.unwrap();
    assert_eq!(events.len(), 3);
}

/// A window with a date only returns that day's events
#[tokio::test]
async fn test_list_events_filters_by_date() {
    let mock = MockCalendarHandle::new();

    let window = EventWindow {
        date: Some(chrono::NaiveDate::from_ymd_opt(2025, 10, 30).unwrap()),
        days: 7,
    };
    let events = mock.list_events(window).await.unwrap();

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].id, "event1");
}

/// Updating title and description leaves the start time alone
#[tokio::test]
async fn test_update_event_title_only() {
    let mock = MockCalendarHandle::new();

    let patch = EventPatch {
        title: Some("Morning Standup".to_string()),
        ..Default::default()
    };
    let updated = mock.update_event("event1", patch).await.unwrap();

    assert_eq!(updated.summary, Some("Morning Standup".to_string()));
    assert_eq!(
        updated.start_date_time,
        Some("2025-10-30T09:00:00+00:00".to_string())
    );
}

/// Moving an event needs both date and time; duration moves the end as well
#[tokio::test]
async fn test_update_event_move_with_duration() {
    let mock = MockCalendarHandle::new();

    let patch = EventPatch {
        date: chrono::NaiveDate::from_ymd_opt(2025, 11, 4),
        start_time: chrono::NaiveTime::from_hms_opt(16, 30, 0),
        duration_minutes: Some(45),
        ..Default::default()
    };
    let updated = mock.update_event("event2", patch).await.unwrap();

    assert_eq!(
        updated.start_date_time,
        Some("2025-11-04T16:30:00+00:00".to_string())
    );
    assert_eq!(
        updated.end_date_time,
        Some("2025-11-04T17:15:00+00:00".to_string())
    );
}

/// Unknown event ids surface as the dedicated not-found error
#[tokio::test]
async fn test_update_unknown_event() {
    let mock = MockCalendarHandle::new();

    let result = mock.update_event("missing", EventPatch::default()).await;

    match result {
        Err(Error::EventNotFound(id)) => assert_eq!(id, "missing"),
        other => panic!("Expected EventNotFound, got {:?}", other.map(|e| e.id)),
    }
}

/// Deleting removes the event and returns its data for the reply
#[tokio::test]
async fn test_delete_event() {
    let mock = MockCalendarHandle::new();

    let deleted = mock.delete_event("event1").await.unwrap();
    assert_eq!(deleted.summary, Some("Morning Meeting".to_string()));

    let events = mock.list_events(EventWindow::default()).await.unwrap();
    assert_eq!(events.len(), 1);

    let result = mock.delete_event("event1").await;
    assert!(matches!(result, Err(Error::EventNotFound(_))));
}
