use std::io::{self, BufRead, Write};
use std::sync::Arc;

use dealflow_agent::{AnthropicClient, PipelineRuntime};
use dealflow_core::config::{AppConfig, LoadOptions};
use dealflow_sheets::{GoogleSheetsStore, SheetsCredentials};

use super::CommandResult;

const SENTINELS: [&str; 3] = ["quit", "exit", "q"];

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return CommandResult::failure("chat", "config", error.to_string(), 2),
    };

    let credentials = match SheetsCredentials::load(&config.sheets.token_path) {
        Ok(credentials) => credentials,
        Err(error) => return CommandResult::failure("chat", "credentials", error.to_string(), 2),
    };

    let runtime = match build_runtime(&config, credentials) {
        Ok(runtime) => runtime,
        Err(message) => return CommandResult::failure("chat", "bootstrap", message, 2),
    };

    let tokio_runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(tokio_runtime) => tokio_runtime,
        Err(error) => return CommandResult::failure("chat", "runtime", error.to_string(), 2),
    };

    println!("Pipeline bot ready! Type your commands (or 'quit' to exit)");
    println!("Examples:");
    println!("  - 'Add Acme Corp as a new lead'");
    println!("  - 'Move Acme to Discovery'");
    println!("  - 'Acme signed the contract'");
    println!("  - 'Show all deals'");
    println!();

    let stdin = io::stdin();
    loop {
        print!("You: ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(error) => {
                return CommandResult::failure("chat", "stdin", error.to_string(), 1);
            }
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if SENTINELS.contains(&input.to_lowercase().as_str()) {
            println!("Goodbye!");
            break;
        }

        let reply = tokio_runtime.block_on(runtime.handle(input));
        println!("Bot: {reply}");
        println!();
    }

    CommandResult { exit_code: 0, output: String::new() }
}

fn build_runtime(
    config: &AppConfig,
    credentials: SheetsCredentials,
) -> Result<PipelineRuntime, String> {
    let store = GoogleSheetsStore::new(&config.sheets, credentials)
        .map_err(|error| error.to_string())?;
    let llm = AnthropicClient::new(&config.llm).map_err(|error| error.to_string())?;
    Ok(PipelineRuntime::new(Arc::new(store), Arc::new(llm)))
}
