//! PaperCopilot - research paper copilot shell
//!
#![doc = "PaperCopilot - research paper copilot shell"]
#![doc = "Main entry point for the PaperCopilot application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use papercopilot::cli::{Cli, Commands};
use papercopilot::commands;
use papercopilot::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Chat { autoload, .. } => {
            tracing::info!("Starting interactive copilot shell");
            tracing::debug!(
                reply_delay_ms = config.assistant.reply_delay_ms,
                load_delay_ms = config.document.load_delay_ms,
                fail_load = config.document.fail_load,
                "Provider timing"
            );
            if autoload {
                tracing::debug!("Autoloading the paper");
            }

            // Moves `config` into the handler
            commands::chat::run_chat(config, autoload).await?;
            Ok(())
        }
        Commands::Share { .. } => {
            tracing::info!("Sharing a new session link");
            commands::share::run_share_clipboard(&config)?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "papercopilot=debug"
    } else {
        "papercopilot=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
