//! Configuration management for PaperCopilot
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{CopilotError, Result};
use crate::session::SnippetDefaults;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// Main configuration structure for PaperCopilot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Assistant reply settings
    #[serde(default)]
    pub assistant: AssistantConfig,
    /// Document ingestion settings
    #[serde(default)]
    pub document: DocumentConfig,
    /// Snippet capture settings
    #[serde(default)]
    pub snippets: SnippetConfig,
    /// Share action settings
    #[serde(default)]
    pub share: ShareConfig,
}

/// Assistant reply provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Type of reply provider to use
    #[serde(rename = "type", default = "default_reply_provider")]
    pub provider_type: String,

    /// Simulated latency before each reply (milliseconds)
    #[serde(default = "default_reply_delay_ms")]
    pub reply_delay_ms: u64,
}

fn default_reply_provider() -> String {
    "canned".to_string()
}

fn default_reply_delay_ms() -> u64 {
    1500
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            provider_type: default_reply_provider(),
            reply_delay_ms: default_reply_delay_ms(),
        }
    }
}

/// Document ingestion provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentConfig {
    /// Type of ingestion provider to use
    #[serde(rename = "type", default = "default_document_provider")]
    pub provider_type: String,

    /// Simulated ingestion time (milliseconds)
    #[serde(default = "default_load_delay_ms")]
    pub load_delay_ms: u64,

    /// Make the mock provider fail every load
    #[serde(default)]
    pub fail_load: bool,
}

fn default_document_provider() -> String {
    "mock".to_string()
}

fn default_load_delay_ms() -> u64 {
    1000
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            provider_type: default_document_provider(),
            load_delay_ms: default_load_delay_ms(),
            fail_load: false,
        }
    }
}

/// Snippet capture configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnippetConfig {
    /// Tags attached to every saved snippet
    #[serde(default = "default_snippet_tags")]
    pub default_tags: Vec<String>,

    /// Source label attached to every saved snippet
    #[serde(default = "default_snippet_source")]
    pub default_source: String,

    /// Selections must be longer than this to prompt a save
    #[serde(default = "default_min_selection_chars")]
    pub min_selection_chars: usize,
}

fn default_snippet_tags() -> Vec<String> {
    vec!["research".to_string(), "important".to_string()]
}

fn default_snippet_source() -> String {
    "Research Paper".to_string()
}

fn default_min_selection_chars() -> usize {
    10
}

impl Default for SnippetConfig {
    fn default() -> Self {
        Self {
            default_tags: default_snippet_tags(),
            default_source: default_snippet_source(),
            min_selection_chars: default_min_selection_chars(),
        }
    }
}

impl SnippetConfig {
    /// Convert into the defaults used by the session state
    pub fn to_defaults(&self) -> SnippetDefaults {
        SnippetDefaults {
            tags: self
                .default_tags
                .iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect::<BTreeSet<_>>(),
            source: self.default_source.clone(),
            min_selection_chars: self.min_selection_chars,
        }
    }
}

/// Share action configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareConfig {
    /// Base URL; the session id is appended to form the share link
    #[serde(default = "default_share_url")]
    pub url: String,
}

fn default_share_url() -> String {
    "https://papercopilot.local/session".to_string()
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            url: default_share_url(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Returns
    ///
    /// Returns the loaded and merged configuration
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| CopilotError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| CopilotError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(provider) = std::env::var("PAPERCOPILOT_REPLY_PROVIDER") {
            self.assistant.provider_type = provider;
        }

        if let Ok(delay) = std::env::var("PAPERCOPILOT_REPLY_DELAY_MS") {
            if let Ok(value) = delay.parse() {
                self.assistant.reply_delay_ms = value;
            } else {
                tracing::warn!("Invalid PAPERCOPILOT_REPLY_DELAY_MS: {}", delay);
            }
        }

        if let Ok(provider) = std::env::var("PAPERCOPILOT_DOCUMENT_PROVIDER") {
            self.document.provider_type = provider;
        }

        if let Ok(delay) = std::env::var("PAPERCOPILOT_LOAD_DELAY_MS") {
            if let Ok(value) = delay.parse() {
                self.document.load_delay_ms = value;
            } else {
                tracing::warn!("Invalid PAPERCOPILOT_LOAD_DELAY_MS: {}", delay);
            }
        }

        if let Ok(url) = std::env::var("PAPERCOPILOT_SHARE_URL") {
            tracing::debug!(url = %url, "Env override: PAPERCOPILOT_SHARE_URL");
            self.share.url = url;
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }

        match &cli.command {
            crate::cli::Commands::Chat {
                reply_delay_ms,
                load_delay_ms,
                fail_load,
                ..
            } => {
                if let Some(delay) = reply_delay_ms {
                    self.assistant.reply_delay_ms = *delay;
                }
                if let Some(delay) = load_delay_ms {
                    self.document.load_delay_ms = *delay;
                }
                if *fail_load {
                    self.document.fail_load = true;
                }
            }
            crate::cli::Commands::Share { url } => {
                if let Some(url) = url {
                    self.share.url = url.clone();
                }
            }
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        let valid_reply = ["canned"];
        if !valid_reply.contains(&self.assistant.provider_type.as_str()) {
            return Err(CopilotError::Config(format!(
                "Invalid assistant type: {}. Must be one of: {}",
                self.assistant.provider_type,
                valid_reply.join(", ")
            ))
            .into());
        }

        let valid_document = ["mock"];
        if !valid_document.contains(&self.document.provider_type.as_str()) {
            return Err(CopilotError::Config(format!(
                "Invalid document type: {}. Must be one of: {}",
                self.document.provider_type,
                valid_document.join(", ")
            ))
            .into());
        }

        if self.assistant.reply_delay_ms > 60_000 {
            return Err(CopilotError::Config(
                "assistant.reply_delay_ms must be at most 60000".to_string(),
            )
            .into());
        }

        if self.snippets.min_selection_chars == 0 {
            return Err(CopilotError::Config(
                "snippets.min_selection_chars must be greater than 0".to_string(),
            )
            .into());
        }

        if self.snippets.default_source.trim().is_empty() {
            return Err(CopilotError::Config(
                "snippets.default_source cannot be empty".to_string(),
            )
            .into());
        }

        if self.share.url.trim().is_empty() {
            return Err(CopilotError::Config("share.url cannot be empty".to_string()).into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use serial_test::serial;

    fn chat_cli() -> Cli {
        Cli {
            config: None,
            verbose: false,
            command: Commands::Chat {
                reply_delay_ms: None,
                load_delay_ms: None,
                fail_load: false,
                autoload: false,
            },
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.assistant.provider_type, "canned");
        assert_eq!(config.assistant.reply_delay_ms, 1500);
        assert_eq!(config.document.provider_type, "mock");
        assert_eq!(config.document.load_delay_ms, 1000);
        assert_eq!(config.snippets.min_selection_chars, 10);
    }

    #[test]
    fn test_config_validation_success() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_assistant() {
        let mut config = Config::default();
        config.assistant.provider_type = "gpt".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_invalid_document() {
        let mut config = Config::default();
        config.document.provider_type = "pdfium".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_zero_selection_threshold() {
        let mut config = Config::default();
        config.snippets.min_selection_chars = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_empty_share_url() {
        let mut config = Config::default();
        config.share.url = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_excessive_delay() {
        let mut config = Config::default();
        config.assistant.reply_delay_ms = 120_000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_yaml() {
        let yaml = r#"
assistant:
  type: canned
  reply_delay_ms: 250
document:
  load_delay_ms: 0
snippets:
  default_tags: [notes]
  default_source: Lab Reading Group
share:
  url: https://example.org/s
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.assistant.reply_delay_ms, 250);
        assert_eq!(config.document.provider_type, "mock");
        assert_eq!(config.document.load_delay_ms, 0);
        assert_eq!(config.snippets.default_tags, vec!["notes".to_string()]);
        assert_eq!(config.snippets.min_selection_chars, 10);
        assert_eq!(config.share.url, "https://example.org/s");
    }

    #[test]
    fn test_empty_yaml_uses_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.assistant.reply_delay_ms, 1500);
    }

    #[test]
    fn test_snippet_config_to_defaults() {
        let config = SnippetConfig {
            default_tags: vec!["a".to_string(), " ".to_string(), "a".to_string()],
            default_source: "Src".to_string(),
            min_selection_chars: 4,
        };
        let defaults = config.to_defaults();
        assert_eq!(defaults.tags.len(), 1);
        assert_eq!(defaults.source, "Src");
        assert_eq!(defaults.min_selection_chars, 4);
    }

    #[test]
    #[serial]
    fn test_load_nonexistent_file_uses_defaults() {
        let config = Config::load("nonexistent.yaml", &chat_cli()).unwrap();
        assert_eq!(config.assistant.provider_type, "canned");
    }

    #[test]
    #[serial]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "assistant:\n  reply_delay_ms: 42\n").unwrap();

        let config = Config::load(path.to_str().unwrap(), &chat_cli()).unwrap();
        assert_eq!(config.assistant.reply_delay_ms, 42);
    }

    #[test]
    #[serial]
    fn test_load_invalid_yaml_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "assistant: [unclosed").unwrap();

        let err = Config::load(path.to_str().unwrap(), &chat_cli()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[test]
    #[serial]
    fn test_apply_env_vars_overrides() {
        std::env::set_var("PAPERCOPILOT_REPLY_DELAY_MS", "10");
        std::env::set_var("PAPERCOPILOT_SHARE_URL", "https://env.example/s");
        let mut config = Config::default();
        config.apply_env_vars();
        std::env::remove_var("PAPERCOPILOT_REPLY_DELAY_MS");
        std::env::remove_var("PAPERCOPILOT_SHARE_URL");

        assert_eq!(config.assistant.reply_delay_ms, 10);
        assert_eq!(config.share.url, "https://env.example/s");
    }

    #[test]
    #[serial]
    fn test_apply_env_vars_ignores_invalid_numbers() {
        std::env::set_var("PAPERCOPILOT_LOAD_DELAY_MS", "soon");
        let mut config = Config::default();
        config.apply_env_vars();
        std::env::remove_var("PAPERCOPILOT_LOAD_DELAY_MS");

        assert_eq!(config.document.load_delay_ms, 1000);
    }

    #[test]
    fn test_cli_overrides_chat_delays() {
        let cli = Cli {
            config: None,
            verbose: true,
            command: Commands::Chat {
                reply_delay_ms: Some(0),
                load_delay_ms: Some(5),
                fail_load: true,
                autoload: false,
            },
        };
        let mut config = Config::default();
        config.apply_cli_overrides(&cli);
        assert_eq!(config.assistant.reply_delay_ms, 0);
        assert_eq!(config.document.load_delay_ms, 5);
        assert!(config.document.fail_load);
    }

    #[test]
    fn test_cli_overrides_share_url() {
        let cli = Cli {
            config: None,
            verbose: false,
            command: Commands::Share {
                url: Some("https://cli.example".to_string()),
            },
        };
        let mut config = Config::default();
        config.apply_cli_overrides(&cli);
        assert_eq!(config.share.url, "https://cli.example");
    }
}
