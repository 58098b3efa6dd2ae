use crate::config::{AgentSettings, ModelConfig};
use crate::constants::{DEFAULT_MODEL_TIMEOUT_SECS, DEFAULT_TOOL_TIMEOUT_SECS};
use std::time::Duration;

/// Model calls allowed per turn before it fails with `ToolLoopExhausted`.
pub const DEFAULT_MAX_ITERATIONS: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentOptions {
    pub max_iterations: usize,
    pub model_timeout: Duration,
    pub tool_timeout: Duration,
    /// Log each tool event at info level instead of debug
    pub verbose: bool,
}

impl AgentOptions {
    pub fn from_settings(agent: &AgentSettings, model: &ModelConfig) -> Self {
        Self {
            max_iterations: agent.max_iterations,
            model_timeout: model.timeout(),
            tool_timeout: agent.tool_timeout(),
            verbose: agent.verbose,
        }
    }
}

impl Default for AgentOptions {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            model_timeout: Duration::from_secs(DEFAULT_MODEL_TIMEOUT_SECS),
            tool_timeout: Duration::from_secs(DEFAULT_TOOL_TIMEOUT_SECS),
            verbose: true,
        }
    }
}
