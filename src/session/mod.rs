//! Session state and the operations that change it
//!
//! - `model`: entities (messages, snippets, polls, document) and typed ids
//! - `state`: the [`SessionState`] container and its reducer-style operations
//! - `poll`: poll drafts and validation
//! - `snippet`: selection capture and snippet defaults
//! - `summary`: the structured summary message

pub mod model;
pub mod poll;
pub mod snippet;
pub mod state;
pub mod summary;

pub use model::{
    Document, Message, MessageId, OptionId, Poll, PollId, PollOption, Section, Snippet, SnippetId,
};
pub use poll::{PollDraft, MIN_POLL_OPTIONS};
pub use snippet::{SnippetCapture, SnippetDefaults};
pub use state::{DocumentStatus, SessionState, ShellEffect};
