//! Test utilities for PaperCopilot
//!
//! Shells with zero-latency providers and a matching test configuration.

use crate::config::Config;
use crate::providers::{CannedReplyProvider, MockDocumentProvider};
use crate::session::SessionState;
use crate::shell::PaperAssistantShell;
use std::sync::Arc;
use std::time::Duration;

/// A shell whose providers answer immediately
///
/// Must be called inside a tokio runtime once operations are invoked.
pub fn instant_shell() -> PaperAssistantShell {
    PaperAssistantShell::new(
        SessionState::default(),
        Arc::new(CannedReplyProvider::new(Duration::ZERO)),
        Arc::new(MockDocumentProvider::new(Duration::ZERO)),
    )
}

/// Create a test configuration with zero provider latency
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.assistant.reply_delay_ms = 0;
    config.document.load_delay_ms = 0;
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_test_config() {
        let config = test_config();
        assert_eq!(config.assistant.reply_delay_ms, 0);
        assert!(config.validate().is_ok());
    }

    #[tokio::test]
    async fn test_instant_shell_answers() {
        let mut shell = instant_shell();
        shell.submit("define sparsity");
        shell.settle().await;
        assert_eq!(shell.state().messages().len(), 2);
    }

    #[tokio::test]
    async fn test_shell_from_test_config_has_no_latency() {
        let mut shell = PaperAssistantShell::from_config(&test_config()).unwrap();
        shell.load_document();
        tokio::time::timeout(Duration::from_millis(100), shell.settle())
            .await
            .expect("zero-latency load settles");
        assert!(shell.state().document().is_some());
    }
}
