use crate::utils::format::Locale;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "fino-dashboard", about = "Balance cards and transaction list from a finances API")]
pub struct Cli {
    /// Base URL of the finances backend
    #[arg(long, env = "FINO_API_URL", default_value = "http://localhost:3333")]
    pub api_url: String,

    /// Locale for currency, dates and labels
    #[arg(long, env = "FINO_LOCALE", value_enum, default_value_t = Locale::PtBr)]
    pub locale: Locale,

    /// Request timeout in seconds
    #[arg(
        long,
        env = "FINO_TIMEOUT_SECS",
        default_value_t = 10,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout_secs: u64,

    /// Append logs to this file
    #[arg(long, env = "FINO_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<UserCommands>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum UserCommands {
    /// Interactive terminal dashboard (default)
    Show,
    /// Print the dashboard once as plain text
    Print,
}

impl Cli {
    pub fn selected_command(&self) -> UserCommands {
        self.command.unwrap_or(UserCommands::Show)
    }
}
