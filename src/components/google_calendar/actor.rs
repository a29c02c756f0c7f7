use super::models::{CalendarEvent, EventPatch, EventWindow, NewEvent, REMINDER_MINUTES};
use super::time::{day_bounds, parse_timezone};
use super::token::TokenManager;
use crate::config::Config;
use crate::error::{google_calendar_error, BotResult, Error};
use chrono::{Duration, Utc};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tracing::info;
use url::Url;

/// Maximum number of events returned by a listing
const MAX_RESULTS: u32 = 20;

const API_BASE: &str = "https://www.googleapis.com/calendar/v3/calendars";

/// The Google Calendar actor that processes messages
pub struct GoogleCalendarActor {
    config: Arc<RwLock<Config>>,
    token_manager: TokenManager,
    client: Client,
    command_rx: mpsc::Receiver<GoogleCalendarCommand>,
}

/// Commands that can be sent to the Google Calendar actor
pub enum GoogleCalendarCommand {
    CreateEvent(NewEvent, mpsc::Sender<BotResult<CalendarEvent>>),
    ListEvents(EventWindow, mpsc::Sender<BotResult<Vec<CalendarEvent>>>),
    UpdateEvent(String, EventPatch, mpsc::Sender<BotResult<CalendarEvent>>),
    DeleteEvent(String, mpsc::Sender<BotResult<CalendarEvent>>),
    Shutdown,
}

/// Handle for communicating with the Google Calendar actor
#[derive(Clone)]
pub struct GoogleCalendarActorHandle {
    command_tx: mpsc::Sender<GoogleCalendarCommand>,
}

impl GoogleCalendarActorHandle {
    /// Insert a new event into the calendar
    pub async fn create_event(&self, event: NewEvent) -> BotResult<CalendarEvent> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(GoogleCalendarCommand::CreateEvent(event, response_tx))
            .await
            .map_err(|e| google_calendar_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| google_calendar_error("Response channel closed"))?
    }

    /// List events inside the given window
    pub async fn list_events(&self, window: EventWindow) -> BotResult<Vec<CalendarEvent>> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(GoogleCalendarCommand::ListEvents(window, response_tx))
            .await
            .map_err(|e| google_calendar_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| google_calendar_error("Response channel closed"))?
    }

    /// Update fields of an existing event
    pub async fn update_event(
        &self,
        event_id: String,
        patch: EventPatch,
    ) -> BotResult<CalendarEvent> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(GoogleCalendarCommand::UpdateEvent(
                event_id,
                patch,
                response_tx,
            ))
            .await
            .map_err(|e| google_calendar_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| google_calendar_error("Response channel closed"))?
    }

    /// Delete an event, returning the deleted event's data for the reply
    pub async fn delete_event(&self, event_id: String) -> BotResult<CalendarEvent> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(GoogleCalendarCommand::DeleteEvent(event_id, response_tx))
            .await
            .map_err(|e| google_calendar_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| google_calendar_error("Response channel closed"))?
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) -> BotResult<()> {
        let _ = self.command_tx.send(GoogleCalendarCommand::Shutdown).await;
        Ok(())
    }
}

impl GoogleCalendarActor {
    /// Create a new actor and return its handle
    pub fn new(config: Arc<RwLock<Config>>) -> (Self, GoogleCalendarActorHandle) {
        let (command_tx, command_rx) = mpsc::channel(32);

        let actor = Self {
            config: Arc::clone(&config),
            token_manager: TokenManager::new(config),
            client: Client::new(),
            command_rx,
        };

        let handle = GoogleCalendarActorHandle { command_tx };

        (actor, handle)
    }

    /// Start the actor's processing loop
    pub async fn run(&mut self) {
        info!("Google Calendar actor started");

        // Process commands
        while let Some(cmd) = self.command_rx.recv().await {
            match cmd {
                GoogleCalendarCommand::CreateEvent(event, response_tx) => {
                    let result = self.create_event(event).await;
                    let _ = response_tx.send(result).await;
                }
                GoogleCalendarCommand::ListEvents(window, response_tx) => {
                    let result = self.list_events(window).await;
                    let _ = response_tx.send(result).await;
                }
                GoogleCalendarCommand::UpdateEvent(event_id, patch, response_tx) => {
                    let result = self.update_event(&event_id, patch).await;
                    let _ = response_tx.send(result).await;
                }
                GoogleCalendarCommand::DeleteEvent(event_id, response_tx) => {
                    let result = self.delete_event(&event_id).await;
                    let _ = response_tx.send(result).await;
                }
                GoogleCalendarCommand::Shutdown => {
                    info!("Google Calendar actor shutting down");
                    break;
                }
            }
        }

        info!("Google Calendar actor shut down");
    }

    async fn calendar_id(&self) -> String {
        let config_read = self.config.read().await;
        config_read.google_calendar_id.clone()
    }

    async fn timezone(&self) -> String {
        let config_read = self.config.read().await;
        config_read.timezone.clone()
    }

    async fn access_token(&self) -> BotResult<String> {
        let token = self.token_manager.get_token().await?;
        token
            .get("access_token")
            .and_then(|t| t.as_str())
            .map(|t| t.to_string())
            .ok_or_else(|| google_calendar_error("No access token available"))
    }

    /// Insert a new event
    async fn create_event(&self, event: NewEvent) -> BotResult<CalendarEvent> {
        let calendar_id = self.calendar_id().await;
        let timezone = self.timezone().await;
        let access_token = self.access_token().await?;

        let start = event.date.and_time(event.start_time);
        let end = start + Duration::minutes(event.duration_minutes);

        let body = json!({
            "summary": event.title,
            "description": event.description,
            "start": {
                "dateTime": start.format("%Y-%m-%dT%H:%M:%S").to_string(),
                "timeZone": timezone,
            },
            "end": {
                "dateTime": end.format("%Y-%m-%dT%H:%M:%S").to_string(),
                "timeZone": timezone,
            },
            "reminders": {
                "useDefault": false,
                "overrides": [
                    { "method": "popup", "minutes": REMINDER_MINUTES },
                ],
            },
        });

        let url = format!("{}/{}/events", API_BASE, calendar_id);
        let response = self
            .client
            .post(url)
            .header("Authorization", format!("Bearer {}", access_token))
            .json(&body)
            .send()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to create event: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(google_calendar_error(&format!(
                "Failed to create event: HTTP {} - {}",
                status, error_body
            )));
        }

        let response_data: Value = response
            .json()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to parse event response: {}", e)))?;

        Ok(parse_event(&response_data))
    }

    /// List events inside the window
    async fn list_events(&self, window: EventWindow) -> BotResult<Vec<CalendarEvent>> {
        let calendar_id = self.calendar_id().await;
        let timezone = self.timezone().await;
        let access_token = self.access_token().await?;

        // Calculate the time range for the listing
        let (time_min, time_max) = match window.date {
            Some(date) => {
                let tz = parse_timezone(&timezone)?;
                let (start, end) = day_bounds(date, &tz)?;
                (start.to_rfc3339(), end.to_rfc3339())
            }
            None => {
                let now = Utc::now();
                (
                    now.to_rfc3339(),
                    (now + Duration::days(window.days)).to_rfc3339(),
                )
            }
        };

        let url_str = format!("{}/{}/events", API_BASE, calendar_id);
        let mut url = Url::parse(&url_str)
            .map_err(|e| google_calendar_error(&format!("Failed to parse URL: {}", e)))?;

        url.query_pairs_mut()
            .append_pair("timeMin", &time_min)
            .append_pair("timeMax", &time_max)
            .append_pair("maxResults", &MAX_RESULTS.to_string())
            .append_pair("singleEvents", "true")
            .append_pair("orderBy", "startTime");

        let response = self
            .client
            .get(url)
            .header("Authorization", format!("Bearer {}", access_token))
            .send()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to fetch events: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(google_calendar_error(&format!(
                "Failed to fetch events: HTTP {} - {}",
                status, error_body
            )));
        }

        let response_data: Value = response
            .json()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to parse events response: {}", e)))?;

        let events = response_data
            .get("items")
            .and_then(|i| i.as_array())
            .ok_or_else(|| google_calendar_error("No items in response"))?;

        Ok(events.iter().map(parse_event).collect())
    }

    /// Fetch a single event as raw JSON, mapping 404 to EventNotFound
    async fn fetch_event_raw(&self, event_id: &str) -> BotResult<Value> {
        let calendar_id = self.calendar_id().await;
        let access_token = self.access_token().await?;

        let url = format!("{}/{}/events/{}", API_BASE, calendar_id, event_id);
        let response = self
            .client
            .get(url)
            .header("Authorization", format!("Bearer {}", access_token))
            .send()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to fetch event: {}", e)))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::EventNotFound(event_id.to_string()));
        }

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(google_calendar_error(&format!(
                "Failed to fetch event: HTTP {} - {}",
                status, error_body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to parse event response: {}", e)))
    }

    /// Update an event with the non-empty patch fields
    async fn update_event(&self, event_id: &str, patch: EventPatch) -> BotResult<CalendarEvent> {
        let calendar_id = self.calendar_id().await;
        let timezone = self.timezone().await;

        let mut event = self.fetch_event_raw(event_id).await?;

        if let Some(title) = &patch.title {
            event["summary"] = json!(title);
        }

        if let Some(description) = &patch.description {
            event["description"] = json!(description);
        }

        // The start moves only when both a date and a time are given; the end
        // is recomputed only when a duration comes with them.
        if let (Some(date), Some(time)) = (patch.date, patch.start_time) {
            let start = date.and_time(time);
            event["start"]["dateTime"] = json!(start.format("%Y-%m-%dT%H:%M:%S").to_string());
            event["start"]["timeZone"] = json!(timezone);

            if let Some(duration) = patch.duration_minutes {
                let end = start + Duration::minutes(duration);
                event["end"]["dateTime"] = json!(end.format("%Y-%m-%dT%H:%M:%S").to_string());
                event["end"]["timeZone"] = json!(timezone);
            }
        }

        let access_token = self.access_token().await?;
        let url = format!("{}/{}/events/{}", API_BASE, calendar_id, event_id);
        let response = self
            .client
            .put(url)
            .header("Authorization", format!("Bearer {}", access_token))
            .json(&event)
            .send()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to update event: {}", e)))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::EventNotFound(event_id.to_string()));
        }

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(google_calendar_error(&format!(
                "Failed to update event: HTTP {} - {}",
                status, error_body
            )));
        }

        let response_data: Value = response
            .json()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to parse event response: {}", e)))?;

        Ok(parse_event(&response_data))
    }

    /// Delete an event, fetching its data first for the confirmation reply
    async fn delete_event(&self, event_id: &str) -> BotResult<CalendarEvent> {
        let calendar_id = self.calendar_id().await;

        let event = self.fetch_event_raw(event_id).await?;
        let event = parse_event(&event);

        let access_token = self.access_token().await?;
        let url = format!("{}/{}/events/{}", API_BASE, calendar_id, event_id);
        let response = self
            .client
            .delete(url)
            .header("Authorization", format!("Bearer {}", access_token))
            .send()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to delete event: {}", e)))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::EventNotFound(event_id.to_string()));
        }

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(google_calendar_error(&format!(
                "Failed to delete event: HTTP {} - {}",
                status, error_body
            )));
        }

        Ok(event)
    }
}

/// Convert an API event object into the simplified representation
fn parse_event(event: &Value) -> CalendarEvent {
    let id = event
        .get("id")
        .and_then(|id| id.as_str())
        .unwrap_or("")
        .to_string();
    let summary = event
        .get("summary")
        .and_then(|s| s.as_str())
        .map(|s| s.to_string());
    let description = event
        .get("description")
        .and_then(|s| s.as_str())
        .map(|s| s.to_string());
    let created = event
        .get("created")
        .and_then(|s| s.as_str())
        .map(|s| s.to_string());
    let html_link = event
        .get("htmlLink")
        .and_then(|s| s.as_str())
        .map(|s| s.to_string());

    let start_date_time = event
        .get("start")
        .and_then(|start| start.as_object())
        .and_then(|start| start.get("dateTime"))
        .and_then(|dt| dt.as_str())
        .map(|s| s.to_string());

    let start_date = event
        .get("start")
        .and_then(|start| start.as_object())
        .and_then(|start| start.get("date"))
        .and_then(|d| d.as_str())
        .map(|s| s.to_string());

    let end_date_time = event
        .get("end")
        .and_then(|end| end.as_object())
        .and_then(|end| end.get("dateTime"))
        .and_then(|dt| dt.as_str())
        .map(|s| s.to_string());

    let end_date = event
        .get("end")
        .and_then(|end| end.as_object())
        .and_then(|end| end.get("date"))
        .and_then(|d| d.as_str())
        .map(|s| s.to_string());

    CalendarEvent {
        id,
        summary,
        description,
        created,
        start_date_time,
        start_date,
        end_date_time,
        end_date,
        html_link,
    }
}
