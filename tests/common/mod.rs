use papercopilot::providers::{CannedReplyProvider, MockDocumentProvider};
use papercopilot::session::SessionState;
use papercopilot::PaperAssistantShell;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

#[allow(dead_code)]
pub fn shell_with_delays(reply_ms: u64, load_ms: u64) -> PaperAssistantShell {
    PaperAssistantShell::new(
        SessionState::default(),
        Arc::new(CannedReplyProvider::new(Duration::from_millis(reply_ms))),
        Arc::new(MockDocumentProvider::new(Duration::from_millis(load_ms))),
    )
}
