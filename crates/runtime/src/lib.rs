//! Tool-calling conversation runtime.
//!
//! Lets a chat model request a registered tool through plain text, runs the
//! tool, and asks the model again with the result.
//!
//! # Overview
//!
//! - **CompletionService**: the chat-completion endpoint, passed in by the
//!   caller. [`OpenAiBackend`] speaks the OpenAI-compatible API.
//! - **Orchestrator**: builds the system prompt from the tool manifest,
//!   issues the first completion, looks for a JSON tool call in the reply,
//!   invokes the tool and issues the second completion.
//! - **parse**: the permissive tool-call recogniser.
//!
//! # Example
//!
//! ```no_run
//! use runtime::{OpenAiBackend, Orchestrator};
//! use tools::{ParamKind, ParamSpec, ToolDescriptor, ToolError};
//!
//! # async fn example() -> runtime::Result<()> {
//! let backend = OpenAiBackend::builder("http://localhost:1234/v1", "local-model").build()?;
//! let mut orchestrator = Orchestrator::new(backend);
//! orchestrator.register(
//!     ToolDescriptor::builder("sum_two")
//!         .description("Adds two numbers together.")
//!         .param(ParamSpec::new("a", ParamKind::Integer))
//!         .param(ParamSpec::new("b", ParamKind::Integer))
//!         .handler(|args| Ok::<_, ToolError>(args.get::<i64>("a")? + args.get::<i64>("b")?)),
//! )?;
//!
//! let answer = orchestrator.run("what's 4 plus 5").await?;
//! println!("{answer}");
//! # Ok(())
//! # }
//! ```

mod backend;
mod error;
mod orchestrator;
pub mod parse;
mod prompt;

pub use backend::{
    Completion, CompletionRequest, CompletionService, DEFAULT_BASE_URL, DEFAULT_MODEL, Message,
    OpenAiBackend, OpenAiBackendBuilder, Role, Usage,
};
pub use error::{Error, Result};
pub use orchestrator::{
    ConversationConfig, DEFAULT_ANSWER_TEMPERATURE, DEFAULT_TOOL_TEMPERATURE, Exchange,
    Orchestrator, ToolCallRecord,
};
pub use parse::{ParseFailure, Strictness, ToolInvocation};
pub use prompt::{FOLLOW_UP, system_prompt};
