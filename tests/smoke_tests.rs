use schedbot::components::google_calendar::models::CalendarEvent;
use schedbot::config::Config;
use std::sync::Arc;
use tokio::sync::RwLock;

fn test_config() -> Config {
    Config {
        discord_token: String::new(),
        bot_prefix: "!".to_string(),
        gemini_api_key: String::new(),
        llm_model: "gemini-2.5-flash".to_string(),
        google_client_id: String::new(),
        google_client_secret: String::new(),
        google_calendar_id: "primary".to_string(),
        google_token_path: "credentials/token.json".to_string(),
        components: std::collections::HashMap::new(),
        timezone: "UTC".to_string(),
        activity: "Testing".to_string(),
    }
}

/// Smoke test to verify that the config can be constructed
#[tokio::test]
async fn test_config_loads() {
    let config = test_config();

    assert_eq!(config.google_calendar_id, "primary");
    assert!(config.discord_token.is_empty());
    assert_eq!(config.llm_model, "gemini-2.5-flash");
}

/// Without credentials the calendar component must report itself unconfigured
#[tokio::test]
async fn test_calendar_configured_requires_credentials() {
    let mut config = test_config();
    config
        .components
        .insert("google_calendar".to_string(), true);

    assert!(!config.calendar_configured());

    config.google_client_id = "client_id".to_string();
    config.google_client_secret = "client_secret".to_string();
    assert!(config.calendar_configured());

    // The component toggle wins over present credentials
    config
        .components
        .insert("google_calendar".to_string(), false);
    assert!(!config.calendar_configured());
}

/// Test basic calendar event model handling
#[tokio::test]
async fn test_calendar_events() {
    let events = vec![
        CalendarEvent {
            id: "event1".to_string(),
            summary: Some("Test Event 1".to_string()),
            description: Some("Test Description 1".to_string()),
            created: Some("2023-01-01T00:00:00Z".to_string()),
            start_date_time: Some("2023-01-01T10:00:00Z".to_string()),
            end_date_time: Some("2023-01-01T11:00:00Z".to_string()),
            ..Default::default()
        },
        CalendarEvent {
            id: "event2".to_string(),
            summary: Some("Test Event 2".to_string()),
            description: Some("Test Description 2".to_string()),
            created: Some("2023-01-02T00:00:00Z".to_string()),
            start_date_time: Some("2023-01-02T10:00:00Z".to_string()),
            end_date_time: Some("2023-01-02T11:00:00Z".to_string()),
            ..Default::default()
        },
    ];

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].id, "event1");
    assert_eq!(events[0].summary, Some("Test Event 1".to_string()));
    assert_eq!(events[1].id, "event2");
    assert_eq!(events[1].summary, Some("Test Event 2".to_string()));
}

/// Test config behind the shared Arc<RwLock> the way the bot holds it
#[tokio::test]
async fn test_config_from_env() {
    let mut config = test_config();
    config.discord_token = "test_token".to_string();
    config.google_calendar_id = "test_calendar_id".to_string();
    let config = Arc::new(RwLock::new(config));

    // Test reading from the config
    let discord_token = {
        let config_guard = config.read().await;
        config_guard.discord_token.clone()
    };

    assert_eq!(discord_token, "test_token");
}

/// Test component registration and lookup using the real ComponentManager
#[tokio::test]
async fn test_component_registration_and_shutdown() {
    use async_trait::async_trait;
    use poise::serenity_prelude as serenity;
    use schedbot::components::{Component, ComponentManager};
    use schedbot::error::BotResult;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    static SHUTDOWN_COUNTER: AtomicUsize = AtomicUsize::new(0);

    // Recorder for the order in which components shut down
    let order_recorder = Arc::new(Mutex::new(Vec::<(String, usize)>::new()));

    struct MockComponent {
        name: &'static str,
        order_recorder: Arc<Mutex<Vec<(String, usize)>>>,
    }

    #[async_trait]
    impl Component for MockComponent {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn init(
            &self,
            _ctx: &serenity::Context,
            _config: Arc<RwLock<Config>>,
        ) -> BotResult<()> {
            Ok(())
        }

        async fn shutdown(&self) -> BotResult<()> {
            let order = SHUTDOWN_COUNTER.fetch_add(1, Ordering::SeqCst);
            self.order_recorder
                .lock()
                .unwrap()
                .push((self.name.to_string(), order));
            Ok(())
        }

        fn as_any(&self) -> &dyn std::any::Any {
            self
        }
    }

    let config = Arc::new(RwLock::new(test_config()));
    let mut component_manager = ComponentManager::new(Arc::clone(&config));

    component_manager.register(MockComponent {
        name: "llm_agent",
        order_recorder: Arc::clone(&order_recorder),
    });
    component_manager.register(MockComponent {
        name: "google_calendar",
        order_recorder: Arc::clone(&order_recorder),
    });

    // Lookup by name must find both registered components
    assert!(component_manager.get_component_by_name("llm_agent").is_some());
    assert!(component_manager
        .get_component_by_name("google_calendar")
        .is_some());
    assert!(component_manager.get_component_by_name("unknown").is_none());

    // Shutdown runs over every component in registration order
    component_manager.shutdown_all().await.unwrap();

    let records = order_recorder.lock().unwrap();
    assert_eq!(records.len(), 2, "Expected 2 components to be shut down");

    let mut sorted_records = records.clone();
    sorted_records.sort_by_key(|(_, order)| *order);
    assert_eq!(sorted_records[0].0, "llm_agent");
    assert_eq!(sorted_records[1].0, "google_calendar");
}
