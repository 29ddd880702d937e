//! Command-line interface definition for PaperCopilot
//!
//! This module defines the CLI structure using clap's derive API,
//! providing the interactive chat shell and the share helper.

use clap::{Parser, Subcommand};

/// PaperCopilot - research paper copilot shell
///
/// Read a paper, ask the assistant about it, save snippets, and run
/// quick polls from one interactive session.
#[derive(Parser, Debug, Clone)]
#[command(name = "papercopilot")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for PaperCopilot
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the interactive copilot shell
    Chat {
        /// Override the simulated assistant latency (milliseconds)
        #[arg(long)]
        reply_delay_ms: Option<u64>,

        /// Override the simulated ingestion time (milliseconds)
        #[arg(long)]
        load_delay_ms: Option<u64>,

        /// Make document ingestion fail, to try the error path
        #[arg(long)]
        fail_load: bool,

        /// Load the sample paper as soon as the shell starts
        #[arg(short, long)]
        autoload: bool,
    },

    /// Copy a share link for a new session to the clipboard
    Share {
        /// Override the base share URL
        #[arg(short, long)]
        url: Option<String>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            command: Commands::Chat {
                reply_delay_ms: None,
                load_delay_ms: None,
                fail_load: false,
                autoload: false,
            },
        }
    }
}
