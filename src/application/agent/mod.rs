//! # Agent Module
//!
//! A single conversational agent that calls discovered tools through the
//! model's native tool-calling interface.
//!
//! ## Key Types
//!
//! - [`AgentSession`] - model, system instruction, tools and the shared context
//! - [`AgentOptions`] - iteration cap and per-call timeouts
//! - [`AgentEvent`] - `ToolInvoked` / `ToolResult` records emitted during a turn
//! - [`AgentError`] - errors that abort a turn
//!
//! ## Agent Loop
//!
//! 1. Append the user message to the context
//! 2. Call the model with the context, the system instruction and the tools
//! 3. If it requested tools, run them in order, append each observation and go to 2
//! 4. If it answered, append the answer and return it
//!
//! The loop gives up with [`AgentError::ToolLoopExhausted`] after
//! `max_iterations` model calls.

mod context;
mod directive;
mod errors;
mod events;
mod models;
mod runner;
mod session;


pub use context::ConversationContext;
pub use errors::{AgentError, ToolError};
pub use events::{AgentEvent, EventReceiver, EventSender, event_channel};
pub use models::{AgentOptions, DEFAULT_MAX_ITERATIONS};
pub use session::AgentSession;
