use crate::agent::ScheduleAgent;
use crate::components::llm_agent::LlmAgent;
use crate::components::{ComponentManager, GoogleCalendarHandle, LlmAgentHandle};
use crate::config::Config;
use crate::error::BotResult;
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tokio::sync::RwLock;

// Export submodules
pub mod schedbot;
pub mod util;

/// Shared context for all commands
#[derive(Debug)]
pub struct CommandContext {
    pub config: Arc<RwLock<Config>>,
    pub component_manager: Option<Arc<ComponentManager>>,
}

impl CommandContext {
    /// Create a new command context
    pub fn new(config: Arc<RwLock<Config>>) -> Self {
        Self {
            config,
            component_manager: None,
        }
    }

    /// Set the component manager
    pub fn with_component_manager(mut self, component_manager: Arc<ComponentManager>) -> Self {
        self.component_manager = Some(component_manager);
        self
    }
}

/// Type alias for command result
pub type CommandResult = BotResult<()>;

/// Type alias for poise context
pub type Context<'a> = poise::Context<'a, CommandContext, crate::error::Error>;

/// All application commands and event listeners
pub fn get_all_application_commands() -> Vec<poise::Command<CommandContext, crate::error::Error>> {
    vec![
        // Utility commands
        util::ping(),
        // The scheduling pipeline
        schedbot::schedbot(),
    ]
}

/// Create an embed for successful replies
pub fn create_success_embed(title: &str, description: &str) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(title)
        .description(description)
        .colour(serenity::Colour::DARK_GREEN)
}

/// Create an embed for error replies
pub fn create_error_embed(title: &str, description: &str) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(title)
        .description(description)
        .colour(serenity::Colour::RED)
}

/// Build a ScheduleAgent from the registered components, falling back to
/// standalone handles when a component is not available
pub async fn resolve_agent(ctx: &Context<'_>) -> ScheduleAgent {
    let config = ctx.data().config.clone();

    let llm = if let Some(cm) = &ctx.data().component_manager {
        if let Some(component) = cm.get_component_by_name("llm_agent") {
            if let Some(llm_component) = component.as_any().downcast_ref::<LlmAgent>() {
                if let Some(handle) = llm_component.get_handle().await {
                    handle
                } else {
                    tracing::debug!("No handle in LLM agent component, creating new one");
                    LlmAgentHandle::new(config.clone())
                }
            } else {
                tracing::debug!("Could not downcast LLM agent component");
                LlmAgentHandle::new(config.clone())
            }
        } else {
            tracing::debug!("LLM agent component not found in ComponentManager");
            LlmAgentHandle::new(config.clone())
        }
    } else {
        tracing::debug!("ComponentManager not available, creating standalone handle");
        LlmAgentHandle::new(config.clone())
    };

    let calendar_configured = {
        let config_read = config.read().await;
        config_read.calendar_configured()
    };

    let calendar = if !calendar_configured {
        None
    } else if let Some(cm) = &ctx.data().component_manager {
        if let Some(component) = cm.get_component_by_name("google_calendar") {
            if let Some(calendar_component) = component
                .as_any()
                .downcast_ref::<crate::components::google_calendar::GoogleCalendar>()
            {
                match calendar_component.get_handle().await {
                    Some(handle) => Some(handle),
                    None => {
                        tracing::debug!("No handle in Google Calendar component, creating new one");
                        Some(GoogleCalendarHandle::new(config.clone()))
                    }
                }
            } else {
                tracing::debug!("Could not downcast Google Calendar component");
                Some(GoogleCalendarHandle::new(config.clone()))
            }
        } else {
            tracing::debug!("Google Calendar component not found in ComponentManager");
            Some(GoogleCalendarHandle::new(config.clone()))
        }
    } else {
        tracing::debug!("ComponentManager not available, creating standalone handle");
        Some(GoogleCalendarHandle::new(config.clone()))
    };

    ScheduleAgent::new(config, llm, calendar)
}
