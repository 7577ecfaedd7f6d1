// External crates
use clap::Parser;
use tracing::debug;

// Internal imports
use fabric_logging::LogSettings;
use fabric_messages::{msg, MESSAGES};
use fabric_provision::ProvisionError;

// Local modules
mod cli;
mod commands;

use cli::Args;
use commands::execute_command;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let log_guard = fabric_logging::init_with(&LogSettings::from_env().with_debug(args.debug));
    debug!(command = ?args.command, "Starting fabric command");

    let result = execute_command(args).await;
    if let Err(e) = &result {
        let rendered = match e.downcast_ref::<ProvisionError>() {
            Some(provision) => provision.user_friendly(),
            None => format!("{e:#}"),
        };
        eprintln!("{}", msg!(MESSAGES.cli.error_generic, error = rendered));
    }

    // Flush file logs before exiting.
    drop(log_guard);
    if result.is_err() {
        std::process::exit(1);
    }
}
