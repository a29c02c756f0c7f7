use super::actor::GoogleCalendarActorHandle;
use super::models::{CalendarEvent, EventPatch, EventWindow, NewEvent};
use crate::config::Config;
use crate::error::BotResult;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

/// Handle for interacting with the Google Calendar actor
#[derive(Clone)]
pub struct GoogleCalendarHandle {
    actor_handle: GoogleCalendarActorHandle,
    _actor_task: Arc<JoinHandle<()>>,
}

impl GoogleCalendarHandle {
    /// Create a new GoogleCalendarHandle and spawn the actor
    pub fn new(config: Arc<RwLock<Config>>) -> Self {
        use super::actor::GoogleCalendarActor;

        // Create the actor and get its handle
        let (mut actor, handle) = GoogleCalendarActor::new(config);

        // Spawn a task to run the actor
        let actor_task = tokio::spawn(async move {
            actor.run().await;
        });

        Self {
            actor_handle: handle,
            _actor_task: Arc::new(actor_task),
        }
    }

    /// Insert a new event into the calendar
    pub async fn create_event(&self, event: NewEvent) -> BotResult<CalendarEvent> {
        self.actor_handle.create_event(event).await
    }

    /// List events inside the given window
    pub async fn list_events(&self, window: EventWindow) -> BotResult<Vec<CalendarEvent>> {
        self.actor_handle.list_events(window).await
    }

    /// Update fields of an existing event
    pub async fn update_event(
        &self,
        event_id: impl Into<String>,
        patch: EventPatch,
    ) -> BotResult<CalendarEvent> {
        self.actor_handle.update_event(event_id.into(), patch).await
    }

    /// Delete an event
    pub async fn delete_event(&self, event_id: impl Into<String>) -> BotResult<CalendarEvent> {
        self.actor_handle.delete_event(event_id.into()).await
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) -> BotResult<()> {
        self.actor_handle.shutdown().await
    }
}
