//! Two-phase tool-calling conversation.

use crate::backend::{CompletionRequest, CompletionService, Message, Usage};
use crate::parse::{Strictness, ToolInvocation, parse_tool_call};
use crate::prompt::{FOLLOW_UP, system_prompt};
use crate::{Error, Result};
use tools::{ToolBuilder, ToolRegistry, stringify_result};
use tracing::{debug, info};

/// Sampling temperature for the tool-selection pass.
pub const DEFAULT_TOOL_TEMPERATURE: f64 = 0.1;
/// Sampling temperature for the final-answer pass.
pub const DEFAULT_ANSWER_TEMPERATURE: f64 = 0.7;

/// Tunables for a conversation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversationConfig {
    /// Low, so the model sticks to the call format.
    pub tool_temperature: f64,
    /// Higher, for fluent prose.
    pub answer_temperature: f64,
    pub strictness: Strictness,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            tool_temperature: DEFAULT_TOOL_TEMPERATURE,
            answer_temperature: DEFAULT_ANSWER_TEMPERATURE,
            strictness: Strictness::default(),
        }
    }
}

impl ConversationConfig {
    /// Reject temperatures outside `[0, 2]`.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("tool_temperature", self.tool_temperature),
            ("answer_temperature", self.answer_temperature),
        ] {
            if !(0.0..=2.0).contains(&value) {
                return Err(Error::Config(format!(
                    "{name} must be between 0 and 2, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// What happened to the tool call of one exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCallRecord {
    pub invocation: ToolInvocation,
    /// Content fed back to the model as the tool turn.
    pub output: String,
    pub failed: bool,
}

/// Outcome of one [`Orchestrator::run_traced`] call.
#[derive(Debug, Clone)]
pub struct Exchange {
    pub reply: String,
    /// Every turn, including the final assistant reply.
    pub transcript: Vec<Message>,
    pub tool_call: Option<ToolCallRecord>,
    pub usage: Usage,
}

/// Drives a single-question conversation with optional tool use.
///
/// Each run is independent: the transcript is built fresh and dropped
/// afterwards. The registry is only mutable before the first run, since
/// `register` needs `&mut self` and `run` takes `&self`.
pub struct Orchestrator<B> {
    backend: B,
    registry: ToolRegistry,
    config: ConversationConfig,
}

impl<B: CompletionService> Orchestrator<B> {
    /// Create an orchestrator with an empty registry.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            registry: ToolRegistry::new(),
            config: ConversationConfig::default(),
        }
    }

    /// Replace the registry.
    pub fn with_registry(mut self, registry: ToolRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Replace the configuration after validating it.
    pub fn with_config(mut self, config: ConversationConfig) -> Result<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    /// Register a tool.
    pub fn register(&mut self, tool: ToolBuilder) -> Result<()> {
        Ok(self.registry.register(tool)?)
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn config(&self) -> &ConversationConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The system prompt sent on every run.
    pub fn system_prompt(&self) -> String {
        system_prompt(self.registry.manifest())
    }

    /// Answer `user_text`, calling at most one tool on the way.
    pub async fn run(&self, user_text: &str) -> Result<String> {
        Ok(self.run_traced(user_text).await?.reply)
    }

    /// Like [`run`](Self::run), but also return the transcript and the tool
    /// call, if any.
    pub async fn run_traced(&self, user_text: &str) -> Result<Exchange> {
        let mut transcript = vec![
            Message::system(self.system_prompt()),
            Message::user(user_text),
        ];
        info!(tools = self.registry.len(), "starting exchange");

        let first = self
            .backend
            .complete(CompletionRequest {
                messages: &transcript,
                temperature: self.config.tool_temperature,
            })
            .await?;
        let mut usage = first.usage;
        let reply = first.content;

        let invocation = match parse_tool_call(&reply, self.config.strictness) {
            Ok(invocation) if self.registry.contains(&invocation.name) => invocation,
            Ok(invocation) => {
                debug!(tool = %invocation.name, "reply names an unknown tool, answering directly");
                return Ok(direct(reply, transcript, usage));
            }
            Err(reason) => {
                debug!(%reason, "no tool call in reply, answering directly");
                return Ok(direct(reply, transcript, usage));
            }
        };

        info!(tool = %invocation.name, parameters = %invocation.parameters, "tool call detected");
        let result = self
            .registry
            .invoke(&invocation.name, invocation.parameters.clone())
            .await;
        let output = stringify_result(&result);
        debug!(tool = %invocation.name, output = %output, "tool returned");

        transcript.push(Message::assistant(reply));
        transcript.push(Message::tool(output.clone()));
        transcript.push(Message::user(FOLLOW_UP));

        let second = self
            .backend
            .complete(CompletionRequest {
                messages: &transcript,
                temperature: self.config.answer_temperature,
            })
            .await?;
        usage += second.usage;
        transcript.push(Message::assistant(second.content.clone()));

        Ok(Exchange {
            reply: second.content,
            transcript,
            tool_call: Some(ToolCallRecord {
                invocation,
                output,
                failed: result.is_err(),
            }),
            usage,
        })
    }
}

fn direct(reply: String, mut transcript: Vec<Message>, usage: Usage) -> Exchange {
    transcript.push(Message::assistant(reply.clone()));
    Exchange {
        reply,
        transcript,
        tool_call: None,
        usage,
    }
}
