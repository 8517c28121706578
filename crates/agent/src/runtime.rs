use std::sync::Arc;

use tracing::warn;

use dealflow_core::PipelineError;
use dealflow_sheets::RowStore;

use crate::executor::ActionExecutor;
use crate::interpreter::CommandInterpreter;
use crate::llm::LlmClient;

/// The one-shot command-processing core both front doors share.
///
/// `handle` takes a raw message and returns the reply text - always.
/// Every [`PipelineError`] is converted to its chat-style rendering at
/// this boundary; nothing propagates to the CLI loop or the Slack
/// dispatcher.
pub struct PipelineRuntime {
    store: Arc<dyn RowStore>,
    interpreter: CommandInterpreter,
    executor: ActionExecutor,
}

impl PipelineRuntime {
    pub fn new(store: Arc<dyn RowStore>, llm: Arc<dyn LlmClient>) -> Self {
        Self {
            store: store.clone(),
            interpreter: CommandInterpreter::new(llm),
            executor: ActionExecutor::new(store),
        }
    }

    pub async fn handle(&self, user_text: &str) -> String {
        match self.process(user_text).await {
            Ok(reply) => reply,
            Err(error) => {
                warn!(error = %error, "command processing failed");
                error.user_message()
            }
        }
    }

    async fn process(&self, user_text: &str) -> Result<String, PipelineError> {
        let current_deals = self.store.fetch_all().await?;
        let action = self.interpreter.interpret(user_text, &current_deals).await?;
        self.executor.execute(action).await
    }
}
