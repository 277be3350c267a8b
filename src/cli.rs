//! Command-line interface definition for Datachat
//!
//! This module defines the CLI structure using clap's derive API. The
//! client has a single interactive mode, so there are no subcommands;
//! flags override configuration file settings.

use clap::{ArgAction, Parser};

/// Datachat - Conversational data analysis client
///
/// Ask questions about your data in natural language and get answers,
/// tables, and chart summaries back from the analysis backend.
#[derive(Parser, Debug, Clone)]
#[command(name = "datachat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Override the backend base URL from config
    #[arg(short = 'u', long, env = "DATACHAT_BACKEND_URL")]
    pub backend_url: Option<String>,

    /// Skip the startup greeting
    #[arg(long = "no-greeting", action = ArgAction::SetFalse)]
    pub session_greeting: bool,
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
