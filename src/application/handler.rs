//! Entry point shared by the REST facade and the stdio loop: validates one
//! user message, drives the agent through a turn and reports its tool events.

use crate::agent::{AgentError, AgentEvent, AgentSession, EventReceiver, event_channel};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{debug, error, info};

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("message must not be empty")]
    InvalidInput,
    #[error("agent session is not ready yet, retry later")]
    NotReady,
    #[error("agent execution failed: {0}")]
    Execution(#[from] AgentError),
}

/// Holds the process-wide agent session once startup has built it.
///
/// The session is installed exactly once; later installs are refused.
pub struct RequestHandler {
    session: OnceCell<Arc<AgentSession>>,
    verbose: bool,
}

impl RequestHandler {
    pub fn new(verbose: bool) -> Self {
        Self {
            session: OnceCell::new(),
            verbose,
        }
    }

    /// Handler with a session already in place.
    pub fn with_session(session: Arc<AgentSession>, verbose: bool) -> Self {
        Self {
            session: OnceCell::new_with(Some(session)),
            verbose,
        }
    }

    /// Returns `false` if a session was already installed.
    pub fn install(&self, session: Arc<AgentSession>) -> bool {
        let installed = self.session.set(session).is_ok();
        if installed {
            info!("Agent session installed; handler is ready");
        } else {
            error!("Refusing to replace the installed agent session");
        }
        installed
    }

    pub fn session(&self) -> Option<&Arc<AgentSession>> {
        self.session.get()
    }

    pub fn is_ready(&self) -> bool {
        self.session.initialized()
    }

    /// Runs one turn for `message` and returns the final answer.
    pub async fn handle(&self, message: &str) -> Result<String, HandlerError> {
        let message = message.trim();
        if message.is_empty() {
            debug!("Rejecting blank message");
            return Err(HandlerError::InvalidInput);
        }
        let session = self.session.get().ok_or(HandlerError::NotReady)?;

        let (sender, receiver) = event_channel();
        let observer = tokio::spawn(observe(receiver, self.verbose));
        let result = session.run_turn(message, Some(&sender)).await;
        drop(sender);
        if let Err(err) = observer.await {
            error!(error = %err, "Event observer task failed");
        }

        match result {
            Ok(response) => Ok(response),
            Err(err) => {
                error!(error = %err, retryable = err.is_retryable(), "Agent turn failed");
                Err(err.into())
            }
        }
    }
}

async fn observe(mut receiver: EventReceiver, verbose: bool) {
    while let Some(event) = receiver.recv().await {
        match &event {
            AgentEvent::ToolInvoked { name, arguments } => {
                if verbose {
                    info!(tool = %name, %arguments, "🔧 Tool invoked");
                } else {
                    debug!(tool = %name, %arguments, "Tool invoked");
                }
            }
            AgentEvent::ToolResult {
                name,
                result,
                is_error,
            } => {
                if verbose {
                    info!(tool = %name, is_error, result = %preview(result), "📦 Tool result");
                } else {
                    debug!(tool = %name, is_error, "Tool result");
                }
            }
        }
    }
}

fn preview(text: &str) -> String {
    const LIMIT: usize = 200;
    match text.char_indices().nth(LIMIT) {
        Some((cut, _)) => format!("{}…", &text[..cut]),
        None => text.to_string(),
    }
}
