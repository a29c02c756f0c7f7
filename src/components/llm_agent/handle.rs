use super::actor::LlmAgentActorHandle;
use super::intent::Interpretation;
use crate::config::Config;
use crate::error::BotResult;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

/// Handle for interacting with the LLM agent actor
#[derive(Clone)]
pub struct LlmAgentHandle {
    actor_handle: LlmAgentActorHandle,
    _actor_task: Arc<JoinHandle<()>>,
}

impl LlmAgentHandle {
    /// Create a new LlmAgentHandle and spawn the actor
    pub fn new(config: Arc<RwLock<Config>>) -> Self {
        use super::actor::LlmAgentActor;

        // Create the actor and get its handle
        let (mut actor, handle) = LlmAgentActor::new(config);

        // Spawn a task to run the actor
        let actor_task = tokio::spawn(async move {
            actor.run().await;
        });

        Self {
            actor_handle: handle,
            _actor_task: Arc::new(actor_task),
        }
    }

    /// Interpret one user message within that user's session
    pub async fn interpret(
        &self,
        user_id: impl Into<String>,
        text: impl Into<String>,
    ) -> BotResult<Interpretation> {
        self.actor_handle.interpret(user_id.into(), text.into()).await
    }

    /// Drop a user's chat session. Returns whether one existed.
    pub async fn clear_history(&self, user_id: impl Into<String>) -> BotResult<bool> {
        self.actor_handle.clear_history(user_id.into()).await
    }

    /// Number of users with an active chat session
    pub async fn active_sessions(&self) -> BotResult<usize> {
        self.actor_handle.active_sessions().await
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) -> BotResult<()> {
        self.actor_handle.shutdown().await
    }
}
