//! PaperCopilot - research paper copilot library
//!
//! This library provides the core of the PaperCopilot shell: a session that
//! holds a loaded paper, a chat transcript with a keyword-driven assistant,
//! saved snippets, and polls with live tallies.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `session`: Session state, entities, and the operations that change them
//! - `shell`: The async session owner that runs provider work on tokio tasks
//! - `providers`: Reply and document ingestion abstractions and implementations
//! - `markup`: The small markup language used in assistant messages
//! - `views`: Terminal rendering of the document, chat, snippets, and polls
//! - `panel`: Side panel selection and prompt formatting
//! - `share`: The share-link action
//! - `commands`: CLI command handlers and the slash-command parser
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use papercopilot::{Config, PaperAssistantShell};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.yaml", &Default::default())?;
//!     config.validate()?;
//!
//!     let mut shell = PaperAssistantShell::from_config(&config)?;
//!     shell.load_document();
//!     shell.submit("What is the main equation?");
//!     shell.settle().await;
//!     shell.shutdown();
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod markup;
pub mod panel;
pub mod providers;
pub mod session;
pub mod share;
pub mod shell;
pub mod views;

// Re-export commonly used types
pub use config::Config;
pub use error::{CopilotError, Result, ValidationError};
pub use panel::Panel;
pub use session::{SessionState, ShellEffect};
pub use shell::{PaperAssistantShell, ShellEvent};

#[cfg(test)]
pub mod test_utils;
