use super::context::ConversationContext;
use super::directive::AgentDirective;
use super::errors::{AgentError, ToolError};
use super::events::{AgentEvent, EventSender, emit};
use super::session::AgentSession;
use crate::application::tooling::validate_arguments;
use crate::model::ModelRequest;
use crate::types::{ChatMessage, ToolCall};
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Text of one tool observation as it is appended to the context.
struct Observation {
    text: String,
    is_error: bool,
}

impl Observation {
    fn error(message: impl std::fmt::Display) -> Self {
        Self {
            text: format!("Error: {message}"),
            is_error: true,
        }
    }
}

/// Drives a single turn: model call, tool calls, model call, ... until the
/// model answers or the iteration cap is reached.
pub(crate) struct TurnRunner<'a> {
    session: &'a AgentSession,
    context: &'a mut ConversationContext,
    events: Option<&'a EventSender>,
}

impl<'a> TurnRunner<'a> {
    pub(crate) fn new(
        session: &'a AgentSession,
        context: &'a mut ConversationContext,
        events: Option<&'a EventSender>,
    ) -> Self {
        Self {
            session,
            context,
            events,
        }
    }

    pub(crate) async fn run(mut self, user_text: &str) -> Result<String, AgentError> {
        self.context.push(ChatMessage::user(user_text));
        let max_iterations = self.session.options().max_iterations;

        for iteration in 1..=max_iterations {
            debug!(iteration, max_iterations, "Submitting agent turn to model provider");
            let reply = self.call_model().await?;

            match AgentDirective::from(reply) {
                AgentDirective::Final { response } => {
                    info!(iteration, "Agent returned final response");
                    self.context.push(ChatMessage::assistant(response.clone()));
                    return Ok(response);
                }
                AgentDirective::CallTools { content, calls } => {
                    info!(
                        iteration,
                        tools = calls.len(),
                        "Agent requested tool execution"
                    );
                    let request = ChatMessage::assistant_with_tool_calls(content, calls.clone());
                    let (observations, failure) = self.run_tools(&calls).await;
                    // Appended together: the context never holds a tool request
                    // without its observations, even if this future is dropped.
                    self.context.push(request);
                    for observation in observations {
                        self.context.push(observation);
                    }
                    if let Some(err) = failure {
                        return Err(err);
                    }
                }
            }
        }

        warn!(max_iterations, "Agent exceeded max tool interactions");
        Err(AgentError::ToolLoopExhausted { max_iterations })
    }

    async fn call_model(&self) -> Result<ChatMessage, AgentError> {
        let instruction = self.session.system_instruction();
        let request = ModelRequest {
            model: self.session.model().to_string(),
            system_prompt: (!instruction.trim().is_empty()).then(|| instruction.to_string()),
            messages: self.context.messages().to_vec(),
            tools: self.session.tool_specs().to_vec(),
        };
        let after = self.session.options().model_timeout;
        let response = timeout(after, self.session.provider().chat(request))
            .await
            .map_err(|_| AgentError::Timeout {
                stage: "model call".to_string(),
                after,
            })??;
        Ok(response.message)
    }

    /// Executes the calls in order and returns one observation per call, even
    /// when an earlier call aborted the turn.
    async fn run_tools(&self, calls: &[ToolCall]) -> (Vec<ChatMessage>, Option<AgentError>) {
        let mut observations = Vec::with_capacity(calls.len());
        let mut failure = None;
        for call in calls {
            if failure.is_some() {
                observations.push(ChatMessage::tool_result(
                    call,
                    "Error: not executed because a previous tool call failed",
                ));
                continue;
            }

            emit(
                self.events,
                AgentEvent::ToolInvoked {
                    name: call.name.clone(),
                    arguments: call.arguments.clone(),
                },
            );
            let observation = match self.execute(call).await {
                Ok(observation) => observation,
                Err(err) => {
                    let observation = Observation::error(&err);
                    failure = Some(err);
                    observation
                }
            };
            emit(
                self.events,
                AgentEvent::ToolResult {
                    name: call.name.clone(),
                    result: observation.text.clone(),
                    is_error: observation.is_error,
                },
            );
            observations.push(ChatMessage::tool_result(call, observation.text));
        }

        (observations, failure)
    }

    async fn execute(&self, call: &ToolCall) -> Result<Observation, AgentError> {
        let Some(tool) = self.session.registry().get(&call.name) else {
            warn!(tool = %call.name, "Model requested an unknown tool");
            return Ok(Observation::error(ToolError::UnknownTool(call.name.clone())));
        };

        let arguments = match validate_arguments(tool.input_schema(), call.arguments.clone()) {
            Ok(arguments) => arguments,
            Err(source) => {
                warn!(tool = %call.name, error = %source, "Rejected tool arguments");
                return Ok(Observation::error(ToolError::InvalidArguments {
                    tool: call.name.clone(),
                    source,
                }));
            }
        };

        let after = self.session.options().tool_timeout;
        let outcome = timeout(after, tool.invoke(arguments))
            .await
            .map_err(|_| AgentError::Timeout {
                stage: format!("tool '{}'", call.name),
                after,
            })?;

        match outcome {
            Ok(output) => Ok(Observation {
                text: output.text,
                is_error: output.is_error,
            }),
            Err(source) if source.is_remote_rejection() => {
                warn!(tool = %call.name, error = %source, "Tool server rejected the call");
                Ok(Observation::error(source))
            }
            Err(source) => Err(ToolError::Execution {
                tool: call.name.clone(),
                source,
            }
            .into()),
        }
    }
}
