use secrecy::ExposeSecret;
use serde::Serialize;

use dealflow_core::config::{AppConfig, LoadOptions, LogFormat};

#[derive(Debug, Serialize)]
struct EffectiveConfig {
    sheets: SheetsView,
    llm: LlmView,
    slack: SlackView,
    server: ServerView,
    logging: LoggingView,
}

#[derive(Debug, Serialize)]
struct SheetsView {
    spreadsheet_id: String,
    token_path: String,
    timeout_secs: u64,
}

#[derive(Debug, Serialize)]
struct LlmView {
    api_key: &'static str,
    model: String,
    max_tokens: u32,
    timeout_secs: u64,
}

#[derive(Debug, Serialize)]
struct SlackView {
    app_token: &'static str,
    bot_token: &'static str,
}

#[derive(Debug, Serialize)]
struct ServerView {
    bind_address: String,
    health_check_port: u16,
    graceful_shutdown_secs: u64,
}

#[derive(Debug, Serialize)]
struct LoggingView {
    level: String,
    format: LogFormat,
}

fn redact(present: bool) -> &'static str {
    if present {
        "[redacted]"
    } else {
        "[not set]"
    }
}

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return format!("{{\"status\":\"error\",\"message\":\"{error}\"}}");
        }
    };

    let view = EffectiveConfig {
        sheets: SheetsView {
            spreadsheet_id: config.sheets.spreadsheet_id.clone(),
            token_path: config.sheets.token_path.display().to_string(),
            timeout_secs: config.sheets.timeout_secs,
        },
        llm: LlmView {
            api_key: redact(config.llm.api_key.is_some()),
            model: config.llm.model.clone(),
            max_tokens: config.llm.max_tokens,
            timeout_secs: config.llm.timeout_secs,
        },
        slack: SlackView {
            app_token: redact(!config.slack.app_token.expose_secret().is_empty()),
            bot_token: redact(!config.slack.bot_token.expose_secret().is_empty()),
        },
        server: ServerView {
            bind_address: config.server.bind_address.clone(),
            health_check_port: config.server.health_check_port,
            graceful_shutdown_secs: config.server.graceful_shutdown_secs,
        },
        logging: LoggingView {
            level: config.logging.level.clone(),
            format: config.logging.format,
        },
    };

    serde_json::to_string_pretty(&view)
        .unwrap_or_else(|error| format!("{{\"status\":\"error\",\"message\":\"{error}\"}}"))
}
