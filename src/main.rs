mod api;
mod config;
mod logging;
mod models;
mod operations;
mod utils;

use api::client::ApiClient;
use api::transactions::TransactionsSource;
use clap::Parser;
use config::{Cli, UserCommands};
use operations::{print, view};
use std::process;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use utils::format::Formatter;

fn main() {
    let cli = Cli::parse();
    let command = cli.selected_command();

    if let Err(e) = logging::init_tracing(cli.log_file.as_deref(), command == UserCommands::Print) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    if let Err(e) = run(&cli, command) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli, command: UserCommands) -> Result<(), String> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to start async runtime: {}", e))?;

    let client = ApiClient::new(&cli.api_url, Duration::from_secs(cli.timeout_secs))
        .map_err(|e| e.to_string())?;
    info!("Using finances API at {}", client.base_url());

    let source: Arc<dyn TransactionsSource> = Arc::new(client);
    let formatter = Formatter::new(cli.locale);

    match command {
        UserCommands::Show => view::run_dashboard(runtime.handle(), source, formatter),
        UserCommands::Print => print::print_dashboard(&runtime, source, formatter),
    }
}
