//! Provider traits for the assistant and document ingestion
//!
//! The shell talks to two asynchronous collaborators:
//! - a [`ReplyProvider`] that answers user messages
//! - a [`DocumentProvider`] that produces the paper being read
//!
//! Both are object-safe `async_trait`s so a real model call or a real PDF
//! extractor can replace the bundled implementations without touching the
//! session logic.

use crate::error::Result;
use crate::session::{Document, Message};
use async_trait::async_trait;

/// Produces assistant replies
///
/// # Examples
///
/// ```no_run
/// use papercopilot::providers::ReplyProvider;
/// use papercopilot::session::Message;
/// use papercopilot::error::Result;
/// use async_trait::async_trait;
///
/// struct EchoProvider;
///
/// #[async_trait]
/// impl ReplyProvider for EchoProvider {
///     async fn reply(&self, _transcript: &[Message], latest: &str) -> Result<String> {
///         Ok(format!("You said: {}", latest))
///     }
/// }
/// ```
#[async_trait]
pub trait ReplyProvider: Send + Sync {
    /// Answer the latest user text
    ///
    /// # Arguments
    ///
    /// * `transcript` - Transcript up to and including the user message
    /// * `latest` - The text the user just submitted
    ///
    /// # Errors
    ///
    /// Returns error if no reply can be produced
    async fn reply(&self, transcript: &[Message], latest: &str) -> Result<String>;

    /// Short provider name for logs and status output
    fn name(&self) -> &'static str {
        "custom"
    }
}

/// Produces the document under study
#[async_trait]
pub trait DocumentProvider: Send + Sync {
    /// Ingest and return the document
    ///
    /// # Errors
    ///
    /// Returns error if ingestion fails
    async fn load(&self) -> Result<Document>;

    /// Short provider name for logs and status output
    fn name(&self) -> &'static str {
        "custom"
    }
}
