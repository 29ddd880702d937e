//! Mock document ingestion
//!
//! Stands in for real PDF extraction: after a configurable delay it yields
//! one fixed research paper. It can be told to fail so the shell's error
//! path can be exercised.

use crate::error::{CopilotError, Result};
use crate::providers::base::DocumentProvider;
use crate::session::{Document, Section};
use async_trait::async_trait;
use std::time::Duration;

/// The bundled sample paper
///
/// # Examples
///
/// ```
/// use papercopilot::providers::mock_document;
///
/// let doc = mock_document();
/// assert_eq!(doc.sections.len(), 4);
/// ```
pub fn mock_document() -> Document {
    let sections = vec![
        Section {
            title: "1. Introduction".to_string(),
            content: "Transformer models have become the default architecture for language \
                      understanding, but dense self-attention scales quadratically with sequence \
                      length. Scientific papers routinely exceed 8,000 tokens, which puts them \
                      out of reach for standard models."
                .to_string(),
        },
        Section {
            title: "2. Method".to_string(),
            content: "We combine sparse block attention with global anchor tokens. Each query \
                      attends to keys inside its block and to a small set of anchors shared by \
                      every position. Sections are first encoded independently, then merged by \
                      a lightweight global encoder."
                .to_string(),
        },
        Section {
            title: "3. Experiments".to_string(),
            content: "On long-document classification the model reaches 94.2% accuracy compared \
                      with 89.7% for the strongest dense baseline, while using 3.1x less memory \
                      at 16k tokens and running 2.4x faster at inference time."
                .to_string(),
        },
        Section {
            title: "4. Conclusion".to_string(),
            content: "Efficient attention makes whole-paper understanding practical. Future work \
                      will extend the approach to figures and tables and study transfer across \
                      scientific domains."
                .to_string(),
        },
    ];

    let mut content = String::from("# Efficient Attention for Long Scientific Documents\n\n");
    for section in &sections {
        content.push_str(&format!("## {}\n{}\n\n", section.title, section.content));
    }

    Document {
        title: "Efficient Attention for Long Scientific Documents".to_string(),
        authors: vec![
            "Maya Chen".to_string(),
            "Daniel Okafor".to_string(),
            "Priya Raman".to_string(),
        ],
        abstract_text: "We present a sparse attention architecture for full-length scientific \
                        papers. By combining block-local attention, global anchor tokens, and \
                        hierarchical section encoding, the model matches or beats dense \
                        baselines while cutting memory use by a factor of three."
            .to_string(),
        content: content.trim_end().to_string(),
        sections,
    }
}

/// Ingestion provider returning [`mock_document`]
#[derive(Debug, Clone)]
pub struct MockDocumentProvider {
    delay: Duration,
    fail_with: Option<String>,
}

impl MockDocumentProvider {
    /// Create a provider that yields the sample paper after `delay`
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            fail_with: None,
        }
    }

    /// Make every load fail with `reason`
    pub fn failing(mut self, reason: impl Into<String>) -> Self {
        self.fail_with = Some(reason.into());
        self
    }
}

#[async_trait]
impl DocumentProvider for MockDocumentProvider {
    async fn load(&self) -> Result<Document> {
        tracing::debug!(delay_ms = self.delay.as_millis() as u64, "Simulating document ingestion");
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match &self.fail_with {
            Some(reason) => Err(CopilotError::Ingestion(reason.clone()).into()),
            None => Ok(mock_document()),
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
