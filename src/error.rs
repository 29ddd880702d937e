//! Error types for PaperCopilot
//!
//! This module defines the application error type and the validation error
//! type returned by session operations, using `thiserror` for ergonomic
//! error handling.

use thiserror::Error;

/// Main error type for PaperCopilot operations
///
/// Covers configuration loading, provider failures, document ingestion,
/// and the share action.
#[derive(Error, Debug)]
pub enum CopilotError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Assistant reply provider errors
    #[error("Provider error: {0}")]
    Provider(String),

    /// Document ingestion errors
    #[error("Ingestion error: {0}")]
    Ingestion(String),

    /// Share action errors (clipboard unavailable, etc.)
    #[error("Share error: {0}")]
    Share(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Reasons a session operation was rejected
///
/// A rejected operation never changes session state. The chat shell
/// surfaces these to the user instead of silently dropping the action.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Snippet save attempted without a pending selection
    #[error("No text selected to save")]
    EmptySnippetContent,

    /// Snippet save attempted without a title
    #[error("Snippet title cannot be empty")]
    EmptySnippetTitle,

    /// Poll creation attempted without a question
    #[error("Poll question cannot be empty")]
    EmptyPollQuestion,

    /// Poll creation attempted with fewer than two non-blank options
    #[error("A poll needs at least 2 options, got {found}")]
    TooFewPollOptions {
        /// Number of non-blank options supplied
        found: usize,
    },

    /// Draft option removal would leave fewer than two options
    #[error("A poll must keep at least 2 options")]
    MinimumOptions,

    /// Draft option number does not exist
    #[error("Option {number} does not exist (draft has {len} options)")]
    OptionIndexOutOfRange {
        /// The 1-based option number that was requested
        number: usize,
        /// Number of options in the draft
        len: usize,
    },

    /// Poll id does not resolve
    #[error("Unknown poll: {0}")]
    UnknownPoll(String),
}

/// Result type alias for PaperCopilot operations
///
/// Uses `anyhow::Error` so application code can attach context while
/// still downcasting to [`CopilotError`] where needed.
pub type Result<T> = anyhow::Result<T>;
