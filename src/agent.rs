use crate::components::google_calendar::models::{
    CalendarEvent, EventPatch, EventWindow, NewEvent, DEFAULT_DURATION_MINUTES,
    DEFAULT_WINDOW_DAYS,
};
use crate::components::google_calendar::time::{event_start, parse_clock, parse_date};
use crate::components::llm_agent::{Interpretation, LlmAgentHandle};
use crate::components::GoogleCalendarHandle;
use crate::config::Config;
use crate::error::{BotResult, Error};
use chrono_tz::Tz;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Reply used when a calendar action arrives while calendar features are off
pub const CALENDAR_DISABLED_REPLY: &str =
    "📅 Calendar features are disabled. Set GOOGLE_CLIENT_ID and GOOGLE_CLIENT_SECRET and run the get_calendar_token binary to enable them.";

const INVALID_DATE_TIME_REPLY: &str =
    "❌ I couldn't read the date or time of that request (expected YYYY-MM-DD and HH:MM). Please try rephrasing it.";

/// Drives the interpretation pipeline: user text goes to the LLM agent, the
/// structured action goes to the calendar, and the outcome comes back as a
/// reply string.
#[derive(Clone)]
pub struct ScheduleAgent {
    config: Arc<RwLock<Config>>,
    llm: LlmAgentHandle,
    calendar: Option<GoogleCalendarHandle>,
}

impl ScheduleAgent {
    /// Create a new agent over the two service handles
    pub fn new(
        config: Arc<RwLock<Config>>,
        llm: LlmAgentHandle,
        calendar: Option<GoogleCalendarHandle>,
    ) -> Self {
        Self {
            config,
            llm,
            calendar,
        }
    }

    /// Whether calendar operations are available
    pub fn calendar_enabled(&self) -> bool {
        self.calendar.is_some()
    }

    /// Run one free-text message through the pipeline
    pub async fn handle_message(&self, user_id: &str, text: &str) -> BotResult<String> {
        let interpretation = self.llm.interpret(user_id, text).await?;

        match interpretation {
            Interpretation::Chat { reply } => Ok(reply),
            action => match &self.calendar {
                Some(calendar) => self.run_action(calendar, action).await,
                None => Ok(CALENDAR_DISABLED_REPLY.to_string()),
            },
        }
    }

    /// Execute a calendar action and format the reply
    async fn run_action(
        &self,
        calendar: &GoogleCalendarHandle,
        action: Interpretation,
    ) -> BotResult<String> {
        match action {
            Interpretation::AddEvent {
                title,
                date,
                time,
                duration,
                description,
            } => {
                let (Some(date), Some(start_time)) = (parse_date(&date), parse_clock(&time))
                else {
                    return Ok(INVALID_DATE_TIME_REPLY.to_string());
                };

                let event = NewEvent {
                    title,
                    date,
                    start_time,
                    duration_minutes: duration.unwrap_or(DEFAULT_DURATION_MINUTES),
                    description: description.unwrap_or_default(),
                };

                info!("Creating event '{}' on {}", event.title, event.date);
                let created = calendar.create_event(event.clone()).await?;
                Ok(format_created(&event, &created))
            }
            Interpretation::ListEvents { date, days } => {
                let window_date = match &date {
                    Some(date_str) => match parse_date(date_str) {
                        Some(date) => Some(date),
                        None => return Ok(INVALID_DATE_TIME_REPLY.to_string()),
                    },
                    None => None,
                };

                let window = EventWindow {
                    date: window_date,
                    days: days.filter(|d| *d > 0).unwrap_or(DEFAULT_WINDOW_DAYS),
                };

                let events = calendar.list_events(window).await?;
                let tz = self.timezone().await;
                Ok(format_event_list(&events, &tz))
            }
            Interpretation::UpdateEvent {
                event_id,
                title,
                date,
                time,
                duration,
                description,
            } => {
                let patch_date = match &date {
                    Some(date_str) => match parse_date(date_str) {
                        Some(date) => Some(date),
                        None => return Ok(INVALID_DATE_TIME_REPLY.to_string()),
                    },
                    None => None,
                };
                let patch_time = match &time {
                    Some(time_str) => match parse_clock(time_str) {
                        Some(time) => Some(time),
                        None => return Ok(INVALID_DATE_TIME_REPLY.to_string()),
                    },
                    None => None,
                };

                let patch = EventPatch {
                    title,
                    date: patch_date,
                    start_time: patch_time,
                    duration_minutes: duration,
                    description,
                };

                info!("Updating event {}", event_id);
                match calendar.update_event(event_id, patch).await {
                    Ok(updated) => Ok(format_updated(&updated)),
                    Err(Error::EventNotFound(id)) => Ok(format_not_found(&id)),
                    Err(e) => Err(e),
                }
            }
            Interpretation::DeleteEvent { event_id } => {
                info!("Deleting event {}", event_id);
                match calendar.delete_event(event_id).await {
                    Ok(deleted) => Ok(format_deleted(&deleted)),
                    Err(Error::EventNotFound(id)) => Ok(format_not_found(&id)),
                    Err(e) => Err(e),
                }
            }
            Interpretation::Chat { reply } => Ok(reply),
        }
    }

    /// Drop the user's chat session
    pub async fn clear_history(&self, user_id: &str) -> BotResult<String> {
        if self.llm.clear_history(user_id).await? {
            Ok("✅ Chat history cleared!".to_string())
        } else {
            Ok("ℹ️ No chat history to clear.".to_string())
        }
    }

    /// Short status summary
    pub async fn stats(&self) -> BotResult<String> {
        let active = self.llm.active_sessions().await?;
        let model = {
            let config_read = self.config.read().await;
            config_read.llm_model.clone()
        };
        let calendar = if self.calendar_enabled() {
            "enabled"
        } else {
            "disabled"
        };

        Ok(format!(
            "• Active sessions: {}\n• Model: {}\n• Calendar features: {}",
            active, model, calendar
        ))
    }

    async fn timezone(&self) -> Tz {
        let config_read = self.config.read().await;
        config_read.timezone.parse::<Tz>().unwrap_or(chrono_tz::UTC)
    }
}

/// Help text for the command surface
pub fn help_text(prefix: &str) -> String {
    format!(
        "**Commands:**\n\
         • `{p}schedbot <request>` - natural-language scheduling\n\
         • `{p}schedbot help` - show this message\n\
         • `{p}schedbot clear` - clear your chat history\n\
         • `{p}schedbot stats` - bot statistics\n\
         • `{p}ping` - check that the bot is alive\n\n\
         **Examples:**\n\
         • `{p}schedbot schedule a team meeting tomorrow at 14:00`\n\
         • `{p}schedbot what's on my calendar this week?`\n\
         • `{p}schedbot move the event <id> to Friday 09:30`\n\
         • `{p}schedbot cancel the event <id>`",
        p = prefix
    )
}

/// Confirmation for a created event
pub fn format_created(request: &NewEvent, created: &CalendarEvent) -> String {
    let mut message = format!(
        "✅ **Event created!**\n\n📝 **Title:** {}\n📅 **Date:** {}\n🕐 **Time:** {}\n⏱️ **Duration:** {} minutes\n🆔 **ID:** `{}`",
        request.title,
        request.date.format("%Y-%m-%d"),
        request.start_time.format("%H:%M"),
        request.duration_minutes,
        created.id
    );

    if let Some(link) = &created.html_link {
        message.push_str(&format!("\n🔗 **Link:** {}", link));
    }

    message
}

/// Numbered listing of events, with descriptions truncated for chat
pub fn format_event_list(events: &[CalendarEvent], tz: &Tz) -> String {
    if events.is_empty() {
        return "📅 No events found for this period.".to_string();
    }

    let mut message = format!("📅 **Found {} event(s):**\n\n", events.len());

    for (idx, event) in events.iter().enumerate() {
        let title = event.summary.as_deref().unwrap_or("Unnamed event");
        message.push_str(&format!("**{}. {}**\n", idx + 1, title));

        let start = match event_start(event, tz) {
            Ok(Some(start)) if event.start_date_time.is_some() => {
                start.format("%Y-%m-%d %H:%M").to_string()
            }
            Ok(Some(start)) => format!("{} (all day)", start.format("%Y-%m-%d")),
            _ => "Unknown time".to_string(),
        };
        message.push_str(&format!("   🕐 {}\n", start));

        if let Some(description) = &event.description {
            if !description.is_empty() {
                let truncated: String = description.chars().take(100).collect();
                let ellipsis = if description.chars().count() > 100 {
                    "..."
                } else {
                    ""
                };
                message.push_str(&format!("   📝 {}{}\n", truncated, ellipsis));
            }
        }

        message.push_str(&format!("   🆔 `{}`\n\n", event.id));
    }

    message
}

/// Confirmation for an updated event
pub fn format_updated(event: &CalendarEvent) -> String {
    let title = event.summary.as_deref().unwrap_or("Unnamed event");
    let mut message = format!("✅ **Event updated!**\n\n📝 **Title:** {}", title);

    if let Some(link) = &event.html_link {
        message.push_str(&format!("\n🔗 **Link:** {}", link));
    }

    message
}

/// Confirmation for a deleted event
pub fn format_deleted(event: &CalendarEvent) -> String {
    let title = event.summary.as_deref().unwrap_or("Unknown");
    format!(
        "🗑️ **Event deleted!**\n\n📝 **Title:** {}\n🆔 **ID:** `{}`",
        title, event.id
    )
}

/// Reply for a missing event id
pub fn format_not_found(event_id: &str) -> String {
    format!("❌ Event with ID `{}` not found.", event_id)
}
