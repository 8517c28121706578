pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "dealflow",
    about = "Natural-language front end for a spreadsheet-backed sales pipeline",
    long_about = "Chat with your pipeline from a terminal, inspect effective configuration, \
                  and run readiness checks against the spreadsheet and model backends.",
    after_help = "Examples:\n  dealflow chat\n  dealflow doctor --json\n  dealflow config"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Interactive loop: type requests, get pipeline replies ('quit' to exit)")]
    Chat,
    #[command(
        about = "Inspect effective configuration values with source layering applied and secrets redacted"
    )]
    Config,
    #[command(about = "Validate config, credentials, and backend connectivity")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Chat => commands::chat::run(),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
    };

    if !result.output.is_empty() {
        println!("{}", result.output);
    }
    ExitCode::from(result.exit_code)
}
