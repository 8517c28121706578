//! Command interpretation and execution - the core of the pipeline bot
//!
//! This crate owns the loop that turns a free-text message into a
//! validated structured action and that action into field-level store
//! mutations:
//!
//! 1. **Interpretation** (`interpreter`, `prompt`, `llm`) - the user's
//!    message plus a snapshot of current deals goes to a language-model
//!    completion constrained by a fixed instruction set; the reply is
//!    parsed into the closed `Action` union.
//! 2. **Execution** (`executor`) - the action is re-validated
//!    defensively and dispatched as idempotent cell writes against the
//!    row store, with default-filling and result-formatting policy.
//! 3. **One-shot runtime** (`runtime`) - `handle(text) -> String`, the
//!    single contract both front doors share. Every failure becomes a
//!    chat-style reply; nothing propagates.
//!
//! # Safety principle
//!
//! The model is strictly a classifier. It never touches the store; every
//! mutation passes through the executor's validation first.

pub mod executor;
pub mod interpreter;
pub mod llm;
pub mod prompt;
pub mod runtime;

pub use executor::ActionExecutor;
pub use interpreter::CommandInterpreter;
pub use llm::{AnthropicClient, LlmClient};
pub use runtime::PipelineRuntime;
