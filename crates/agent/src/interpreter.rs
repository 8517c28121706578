use std::sync::Arc;

use tracing::debug;

use dealflow_core::{Action, Deal, PipelineError};

use crate::llm::LlmClient;
use crate::prompt;

/// Maps free text plus a pipeline snapshot to a validated [`Action`].
///
/// Best-effort by nature - the model classifies, this type only
/// constrains. Anything that does not parse into one of the four known
/// shapes is rejected here so the executor never sees open-ended JSON.
pub struct CommandInterpreter {
    llm: Arc<dyn LlmClient>,
}

impl CommandInterpreter {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    pub async fn interpret(
        &self,
        user_text: &str,
        current_deals: &[Deal],
    ) -> Result<Action, PipelineError> {
        let system = prompt::system_prompt(prompt::today());
        let context = prompt::deals_context(current_deals);
        let user = prompt::user_message(&context, user_text);

        let reply = self.llm.complete(&system, &user).await?;
        let payload = strip_code_fence(&reply);
        debug!(reply_len = reply.len(), "parsing model reply");

        let value: serde_json::Value = serde_json::from_str(payload)
            .map_err(|error| PipelineError::malformed(error.to_string()))?;
        Action::from_model_json(&value)
    }
}

/// Strips an optional markdown code fence: a leading/trailing ```
/// delimiter, optionally tagged `json`. Unfenced input passes through
/// trimmed.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = match rest.rfind("```") {
        Some(position) => &rest[..position],
        None => rest,
    };
    rest.trim()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use dealflow_core::{Action, PipelineError};

    use super::{strip_code_fence, CommandInterpreter};
    use crate::llm::LlmClient;

    struct CannedLlm {
        reply: String,
    }

    #[async_trait]
    impl LlmClient for CannedLlm {
        async fn complete(&self, _system: &str, _user: &str) -> Result<String, PipelineError> {
            Ok(self.reply.clone())
        }
    }

    fn interpreter(reply: &str) -> CommandInterpreter {
        CommandInterpreter::new(Arc::new(CannedLlm { reply: reply.to_string() }))
    }

    #[test]
    fn fence_stripping_handles_tagged_and_bare_fences() {
        assert_eq!(strip_code_fence("{\"action\": \"list\"}"), "{\"action\": \"list\"}");
        assert_eq!(
            strip_code_fence("```json\n{\"action\": \"list\"}\n```"),
            "{\"action\": \"list\"}"
        );
        assert_eq!(strip_code_fence("```\n{\"action\": \"list\"}\n```"), "{\"action\": \"list\"}");
        assert_eq!(strip_code_fence("  ```json\n{}\n```  "), "{}");
    }

    #[tokio::test]
    async fn fenced_reply_parses_identically_to_unfenced() {
        let unfenced = interpreter("{\"action\": \"list\", \"filter_stage\": null}")
            .interpret("show all deals", &[])
            .await
            .expect("unfenced parse");
        let fenced = interpreter("```json\n{\"action\": \"list\", \"filter_stage\": null}\n```")
            .interpret("show all deals", &[])
            .await
            .expect("fenced parse");

        assert_eq!(unfenced, fenced);
        assert_eq!(unfenced, Action::List { filter_stage: None });
    }

    #[tokio::test]
    async fn prose_reply_is_malformed() {
        let error = interpreter("Sure! I updated the deal for you.")
            .interpret("move acme forward", &[])
            .await
            .expect_err("prose should fail");
        assert!(matches!(error, PipelineError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn unknown_action_kind_surfaces_as_unrecognized() {
        let error = interpreter("{\"action\": \"archive\", \"company\": \"Acme\"}")
            .interpret("archive acme", &[])
            .await
            .expect_err("unknown kind should fail");
        assert_eq!(error, PipelineError::UnrecognizedAction { kind: "archive".to_string() });
    }

    #[tokio::test]
    async fn llm_failure_passes_through() {
        struct FailingLlm;

        #[async_trait]
        impl LlmClient for FailingLlm {
            async fn complete(
                &self,
                _system: &str,
                _user: &str,
            ) -> Result<String, PipelineError> {
                Err(PipelineError::backend("model backend unreachable"))
            }
        }

        let interpreter = CommandInterpreter::new(Arc::new(FailingLlm));
        let error = interpreter.interpret("anything", &[]).await.expect_err("should fail");
        assert!(matches!(error, PipelineError::BackendUnavailable { .. }));
    }
}
