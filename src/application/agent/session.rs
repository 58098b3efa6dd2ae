use super::context::ConversationContext;
use super::errors::AgentError;
use super::events::EventSender;
use super::models::AgentOptions;
use super::runner::TurnRunner;
use crate::application::tooling::ToolRegistry;
use crate::model::{ModelProvider, ToolSpec};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

/// One conversational agent: an inference back-end, a fixed system
/// instruction, the discovered tools and the conversation they share.
///
/// Turns are serialized: the context lock is held for the whole turn, so
/// concurrent callers queue instead of interleaving their appends.
pub struct AgentSession {
    name: String,
    provider: Arc<dyn ModelProvider>,
    model: String,
    system_instruction: String,
    registry: Arc<ToolRegistry>,
    tool_specs: Vec<ToolSpec>,
    options: AgentOptions,
    context: Mutex<ConversationContext>,
}

impl AgentSession {
    pub fn new(
        provider: Arc<dyn ModelProvider>,
        model: impl Into<String>,
        registry: Arc<ToolRegistry>,
    ) -> Self {
        let tool_specs = registry
            .iter()
            .map(|tool| ToolSpec {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                parameters: tool.input_schema().clone(),
            })
            .collect();
        Self {
            name: crate::constants::DEFAULT_AGENT_NAME.to_string(),
            provider,
            model: model.into(),
            system_instruction: String::new(),
            registry,
            tool_specs,
            options: AgentOptions::default(),
            context: Mutex::new(ConversationContext::new()),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = instruction.into();
        self
    }

    pub fn with_options(mut self, options: AgentOptions) -> Self {
        self.options = options;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn system_instruction(&self) -> &str {
        &self.system_instruction
    }

    pub fn options(&self) -> &AgentOptions {
        &self.options
    }

    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    pub(crate) fn provider(&self) -> &dyn ModelProvider {
        self.provider.as_ref()
    }

    pub(crate) fn tool_specs(&self) -> &[ToolSpec] {
        &self.tool_specs
    }

    /// Runs one turn to completion and returns the final answer.
    ///
    /// Tool events go to `events` as they happen. Whatever was appended to the
    /// context stays there if the turn fails. Dropping the returned future
    /// mid-turn still leaves the context well formed.
    pub async fn run_turn(
        &self,
        user_text: &str,
        events: Option<&EventSender>,
    ) -> Result<String, AgentError> {
        let mut context = self.context.lock().await;
        info!(
            agent = self.name.as_str(),
            history = context.len(),
            "Agent turn started"
        );
        TurnRunner::new(self, &mut *context, events).run(user_text).await
    }

    /// Copy of the conversation so far. Waits for any running turn to finish.
    pub async fn context_snapshot(&self) -> ConversationContext {
        self.context.lock().await.clone()
    }
}
