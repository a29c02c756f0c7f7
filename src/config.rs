use crate::error::{env_error, BotResult};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;
use toml;

/// Default activity text for the bot
pub const DEFAULT_ACTIVITY: &str = "!schedbot help";

/// Default command prefix
pub const DEFAULT_PREFIX: &str = "!";

/// Default Gemini model used for interpretation
pub const DEFAULT_LLM_MODEL: &str = "gemini-2.5-flash";

/// Default location of the persisted OAuth token
pub const DEFAULT_TOKEN_PATH: &str = "credentials/token.json";

/// Main configuration structure for the bot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Discord bot token
    pub discord_token: String,
    /// Command prefix for text commands
    pub bot_prefix: String,
    /// Gemini API key for the LLM agent
    pub gemini_api_key: String,
    /// Gemini model name
    pub llm_model: String,
    /// Google Calendar API client ID (empty when calendar features are disabled)
    pub google_client_id: String,
    /// Google Calendar API client secret (empty when calendar features are disabled)
    pub google_client_secret: String,
    /// Google Calendar ID to operate on
    pub google_calendar_id: String,
    /// Path of the persisted OAuth token file
    pub google_token_path: String,
    /// Map of component names to their enabled status
    pub components: HashMap<String, bool>,
    /// Timezone for event start and end times
    pub timezone: String,
    /// Bot activity status text
    pub activity: String,
}

impl Config {
    /// Load configuration from environment and config file
    pub fn load() -> BotResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        // Required environment variables
        let discord_token = env::var("DISCORD_TOKEN").map_err(|_| env_error("DISCORD_TOKEN"))?;
        let gemini_api_key = env::var("GEMINI_API_KEY").map_err(|_| env_error("GEMINI_API_KEY"))?;

        // Calendar credentials are optional; without them the bot runs chat-only
        let google_client_id = env::var("GOOGLE_CLIENT_ID").unwrap_or_default();
        let google_client_secret = env::var("GOOGLE_CLIENT_SECRET").unwrap_or_default();
        let google_calendar_id =
            env::var("GOOGLE_CALENDAR_ID").unwrap_or_else(|_| String::from("primary"));
        let google_token_path =
            env::var("GOOGLE_TOKEN_PATH").unwrap_or_else(|_| String::from(DEFAULT_TOKEN_PATH));

        let bot_prefix = env::var("BOT_PREFIX").unwrap_or_else(|_| String::from(DEFAULT_PREFIX));
        let llm_model = env::var("GEMINI_MODEL").unwrap_or_else(|_| String::from(DEFAULT_LLM_MODEL));

        // Default timezone
        let timezone = env::var("TIMEZONE").unwrap_or_else(|_| String::from("UTC"));

        // Bot activity status
        let activity = env::var("BOT_ACTIVITY").unwrap_or_else(|_| String::from(DEFAULT_ACTIVITY));

        // Initialize default components
        let mut components = HashMap::new();
        components.insert("google_calendar".to_string(), true);
        components.insert("llm_agent".to_string(), true);

        // Load components configuration from file if it exists
        if let Ok(content) = fs::read_to_string("config/components.toml") {
            if let Ok(file_components) = toml::from_str::<HashMap<String, bool>>(&content) {
                // Merge with defaults
                for (key, value) in file_components {
                    components.insert(key, value);
                }
            }
        }

        Ok(Config {
            discord_token,
            bot_prefix,
            gemini_api_key,
            llm_model,
            google_client_id,
            google_client_secret,
            google_calendar_id,
            google_token_path,
            components,
            timezone,
            activity,
        })
    }

    /// Check if a component is enabled
    pub fn is_component_enabled(&self, name: &str) -> bool {
        *self.components.get(name).unwrap_or(&false)
    }

    /// Whether calendar credentials are present and the component is enabled
    pub fn calendar_configured(&self) -> bool {
        self.is_component_enabled("google_calendar")
            && !self.google_client_id.is_empty()
            && !self.google_client_secret.is_empty()
    }

    /// Update component enabled status
    #[allow(dead_code)]
    pub fn set_component_enabled(&mut self, name: &str, enabled: bool) -> BotResult<()> {
        self.components.insert(name.to_string(), enabled);
        self.save_components()
    }

    /// Save component configuration to file
    #[allow(dead_code)]
    fn save_components(&self) -> BotResult<()> {
        // Create config directory if it doesn't exist
        if !Path::new("config").exists() {
            fs::create_dir("config")?;
        }

        let toml_str = toml::to_string(&self.components)?;
        fs::write("config/components.toml", toml_str)?;

        Ok(())
    }
}
