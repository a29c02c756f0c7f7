use super::intent::{build_preamble, parse_interpretation, Interpretation};
use crate::config::Config;
use crate::error::{llm_error, BotResult};
use rig::completion::{Chat, Message};
use rig::providers::gemini::Client as GeminiClient;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, info};

/// The LLM agent actor that owns the per-user chat sessions
pub struct LlmAgentActor {
    config: Arc<RwLock<Config>>,
    sessions: HashMap<String, Vec<Message>>,
    command_rx: mpsc::Receiver<LlmAgentCommand>,
}

/// Commands that can be sent to the LLM agent actor
pub enum LlmAgentCommand {
    Interpret(String, String, mpsc::Sender<BotResult<Interpretation>>),
    ClearHistory(String, mpsc::Sender<bool>),
    ActiveSessions(mpsc::Sender<usize>),
    Shutdown,
}

/// Handle for communicating with the LLM agent actor
#[derive(Clone)]
pub struct LlmAgentActorHandle {
    command_tx: mpsc::Sender<LlmAgentCommand>,
}

impl LlmAgentActorHandle {
    /// Interpret one user message within that user's session
    pub async fn interpret(&self, user_id: String, text: String) -> BotResult<Interpretation> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(LlmAgentCommand::Interpret(user_id, text, response_tx))
            .await
            .map_err(|e| llm_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| llm_error("Response channel closed"))?
    }

    /// Drop a user's chat session. Returns whether one existed.
    pub async fn clear_history(&self, user_id: String) -> BotResult<bool> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(LlmAgentCommand::ClearHistory(user_id, response_tx))
            .await
            .map_err(|e| llm_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| llm_error("Response channel closed"))
    }

    /// Number of users with an active chat session
    pub async fn active_sessions(&self) -> BotResult<usize> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(LlmAgentCommand::ActiveSessions(response_tx))
            .await
            .map_err(|e| llm_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| llm_error("Response channel closed"))
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) -> BotResult<()> {
        let _ = self.command_tx.send(LlmAgentCommand::Shutdown).await;
        Ok(())
    }
}

impl LlmAgentActor {
    /// Create a new actor and return its handle
    pub fn new(config: Arc<RwLock<Config>>) -> (Self, LlmAgentActorHandle) {
        let (command_tx, command_rx) = mpsc::channel(32);

        let actor = Self {
            config,
            sessions: HashMap::new(),
            command_rx,
        };

        let handle = LlmAgentActorHandle { command_tx };

        (actor, handle)
    }

    /// Start the actor's processing loop
    pub async fn run(&mut self) {
        info!("LLM agent actor started");

        // Process commands
        while let Some(cmd) = self.command_rx.recv().await {
            match cmd {
                LlmAgentCommand::Interpret(user_id, text, response_tx) => {
                    let result = self.interpret(&user_id, &text).await;
                    let _ = response_tx.send(result).await;
                }
                LlmAgentCommand::ClearHistory(user_id, response_tx) => {
                    let existed = self.sessions.remove(&user_id).is_some();
                    let _ = response_tx.send(existed).await;
                }
                LlmAgentCommand::ActiveSessions(response_tx) => {
                    let _ = response_tx.send(self.sessions.len()).await;
                }
                LlmAgentCommand::Shutdown => {
                    info!("LLM agent actor shutting down");
                    break;
                }
            }
        }

        info!("LLM agent actor shut down");
    }

    /// Run one message through the model and parse the structured reply
    async fn interpret(&mut self, user_id: &str, text: &str) -> BotResult<Interpretation> {
        let (api_key, model, timezone) = {
            let config_read = self.config.read().await;
            (
                config_read.gemini_api_key.clone(),
                config_read.llm_model.clone(),
                config_read.timezone.clone(),
            )
        };

        // Initialize Gemini client with API key
        let gemini_client = GeminiClient::new(&api_key);
        let preamble = build_preamble(&timezone);

        let agent = gemini_client
            .agent(&model)
            .preamble(&preamble)
            .temperature(0.2)
            .build();

        let history = self.sessions.get(user_id).cloned().unwrap_or_default();

        let response = agent
            .chat(text.to_string(), history)
            .await
            .map_err(|e| llm_error(&format!("Gemini request failed: {}", e)))?;

        debug!("Received response from Gemini for user {}", user_id);

        // Record both sides so follow-up requests can refer back to earlier
        // events and replies
        let session = self.sessions.entry(user_id.to_string()).or_default();
        session.push(Message::user(text));
        session.push(Message::assistant(response.clone()));

        Ok(parse_interpretation(&response))
    }
}
