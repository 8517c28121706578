use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use dealflow_agent::{AnthropicClient, PipelineRuntime};
use dealflow_core::config::{AppConfig, ConfigError, LoadOptions};
use dealflow_core::PipelineError;
use dealflow_sheets::{CredentialsError, GoogleSheetsStore, SheetsCredentials};
use dealflow_slack::events::CommandService;
use dealflow_slack::{EventDispatcher, SocketModeRunner};

pub struct Application {
    pub config: AppConfig,
    pub slack_runner: SocketModeRunner,
}

/// Startup failures are the one place errors are fatal; each carries a
/// descriptive message for the operator.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("sheets credential bootstrap failed: {0}")]
    Credentials(#[from] CredentialsError),
    #[error("backend client init failed: {0}")]
    Backend(#[from] PipelineError),
    #[error("slack tokens are required to run the server (set DEALFLOW_SLACK_APP_TOKEN and DEALFLOW_SLACK_BOT_TOKEN)")]
    SlackNotConfigured,
}

struct RuntimeCommandService {
    runtime: PipelineRuntime,
}

#[async_trait]
impl CommandService for RuntimeCommandService {
    async fn handle(&self, raw_text: &str) -> String {
        self.runtime.handle(raw_text).await
    }
}

pub async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config).await
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(event_name = "system.bootstrap.start", "starting application bootstrap");

    if !config.slack_configured() {
        return Err(BootstrapError::SlackNotConfigured);
    }

    let credentials = SheetsCredentials::load(&config.sheets.token_path)?;
    info!(event_name = "system.bootstrap.credentials_loaded", "sheets credentials loaded");

    let store = GoogleSheetsStore::new(&config.sheets, credentials)?;
    let llm = AnthropicClient::new(&config.llm)?;
    let runtime = PipelineRuntime::new(Arc::new(store), Arc::new(llm));
    info!(event_name = "system.bootstrap.runtime_ready", "command runtime constructed");

    // The in-tree transport is a no-op; real socket-mode wiring is
    // platform glue attached at deployment time.
    let dispatcher = EventDispatcher::new(Arc::new(RuntimeCommandService { runtime }));
    let slack_runner = SocketModeRunner::noop(dispatcher);

    Ok(Application { config, slack_runner })
}

#[cfg(test)]
mod tests {
    use dealflow_core::config::{ConfigOverrides, LoadOptions};

    use super::{bootstrap, BootstrapError};

    fn base_overrides() -> ConfigOverrides {
        ConfigOverrides {
            spreadsheet_id: Some("sheet-123".to_string()),
            llm_api_key: Some("sk-ant-test".to_string()),
            ..ConfigOverrides::default()
        }
    }

    #[tokio::test]
    async fn bootstrap_fails_fast_without_slack_tokens() {
        let result = bootstrap(LoadOptions {
            overrides: base_overrides(),
            ..LoadOptions::default()
        })
        .await;

        assert!(matches!(result, Err(BootstrapError::SlackNotConfigured)));
    }

    #[tokio::test]
    async fn bootstrap_fails_fast_on_malformed_slack_token() {
        let result = bootstrap(LoadOptions {
            overrides: ConfigOverrides {
                slack_app_token: Some("invalid-token".to_string()),
                slack_bot_token: Some("xoxb-valid".to_string()),
                ..base_overrides()
            },
            ..LoadOptions::default()
        })
        .await;

        let message = result.err().expect("error").to_string();
        assert!(message.contains("slack.app_token"));
    }

    #[tokio::test]
    async fn bootstrap_reports_missing_credentials_descriptively() {
        let result = bootstrap(LoadOptions {
            overrides: ConfigOverrides {
                slack_app_token: Some("xapp-valid".to_string()),
                slack_bot_token: Some("xoxb-valid".to_string()),
                sheets_token_path: Some("/nonexistent/token.json".into()),
                ..base_overrides()
            },
            ..LoadOptions::default()
        })
        .await;

        let message = result.err().expect("error").to_string();
        assert!(message.contains("credential"));
        assert!(message.contains("/nonexistent/token.json"));
    }
}
