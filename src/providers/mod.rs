//! Provider module for PaperCopilot
//!
//! This module contains the reply and ingestion provider abstractions and
//! their bundled implementations: the keyword-rule assistant and the mock
//! paper.

pub mod base;
pub mod canned;
pub mod document;

pub use base::{DocumentProvider, ReplyProvider};
pub use canned::CannedReplyProvider;
pub use document::{mock_document, MockDocumentProvider};

use crate::config::{AssistantConfig, DocumentConfig};
use crate::error::{CopilotError, Result};
use std::sync::Arc;
use std::time::Duration;

/// Create a reply provider based on configuration
///
/// # Arguments
///
/// * `config` - Assistant configuration
///
/// # Errors
///
/// Returns error if the provider type is unknown
///
/// # Examples
///
/// ```
/// use papercopilot::config::AssistantConfig;
/// use papercopilot::providers::create_reply_provider;
///
/// let provider = create_reply_provider(&AssistantConfig::default()).unwrap();
/// assert_eq!(provider.name(), "canned");
/// ```
pub fn create_reply_provider(config: &AssistantConfig) -> Result<Arc<dyn ReplyProvider>> {
    match config.provider_type.as_str() {
        "canned" => Ok(Arc::new(CannedReplyProvider::new(Duration::from_millis(
            config.reply_delay_ms,
        )))),
        other => Err(CopilotError::Provider(format!("Unknown reply provider: {}", other)).into()),
    }
}

/// Create a document ingestion provider based on configuration
///
/// # Errors
///
/// Returns error if the provider type is unknown
pub fn create_document_provider(config: &DocumentConfig) -> Result<Arc<dyn DocumentProvider>> {
    match config.provider_type.as_str() {
        "mock" => {
            let provider = MockDocumentProvider::new(Duration::from_millis(config.load_delay_ms));
            if config.fail_load {
                Ok(Arc::new(provider.failing("the mock ingestion provider is set to fail")))
            } else {
                Ok(Arc::new(provider))
            }
        }
        other => {
            Err(CopilotError::Provider(format!("Unknown document provider: {}", other)).into())
        }
    }
}
