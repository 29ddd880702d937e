//! Keyword-rule reply provider
//!
//! Picks a canned explanation by matching keywords in the lowercased user
//! text. Rules are checked in a fixed order and the first match wins; text
//! matching no rule gets the generic fallback. Each reply is delivered after
//! a fixed delay to mimic model latency.

use crate::error::Result;
use crate::providers::base::ReplyProvider;
use crate::session::Message;
use async_trait::async_trait;
use std::time::Duration;

/// Which canned explanation a message maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    /// Equations, formulas, math
    Math,
    /// Definitions and meanings
    Definition,
    /// Summaries and main points
    Summary,
    /// Simplifying hard passages
    Simplify,
    /// Anything else
    Fallback,
}

/// Keyword rules in evaluation order
const RULES: [(ReplyKind, &[&str]); 4] = [
    (ReplyKind::Math, &["equation", "formula", "math"]),
    (ReplyKind::Definition, &["define", "what is", "meaning"]),
    (ReplyKind::Summary, &["summary", "summarize", "main point"]),
    (ReplyKind::Simplify, &["complex", "difficult", "understand"]),
];

const MATH_REPLY: &str = "\
**Understanding the attention equation**

The core formula is **Attention(Q, K, V) = softmax(QK^T / sqrt(d_k)) V**.

- **Q, K, V** are the query, key, and value projections of the input
- Dividing by **sqrt(d_k)** keeps the dot products from growing with dimension
- The softmax turns similarities into weights that sum to one

In the sparse variant each query only scores keys inside its block plus a few global anchors, \
which is why cost grows linearly with document length.";

const DEFINITION_REPLY: &str = "\
**Definition**

In this paper, **sparse attention** means each token attends to a chosen subset of other \
tokens instead of all of them.

- **Local window:** neighbouring tokens inside the same block
- **Global anchors:** a handful of tokens every position can see
- **Span:** how far a head is allowed to look, learned per head

Together these keep the useful long-range links while dropping most of the quadratic work.";

const SUMMARY_REPLY: &str = "\
**Main points**

1. Dense attention is too expensive for full-length scientific papers
2. Sparse block attention plus hierarchical encoding keeps accuracy at a fraction of the cost
3. The method beats dense baselines on long-document benchmarks while using about a third \
of the memory

Use /summary for the full structured breakdown.";

const SIMPLIFY_REPLY: &str = "\
**Let me break that down**

Think of reading a long paper one page at a time:

- You read each page closely (**local attention**)
- You keep the abstract and headings in mind (**global anchors**)
- You only flip back when something really matters (**adaptive span**)

The model does the same thing, which is why it can handle much longer documents.";

const FALLBACK_REPLY: &str = "\
That's a good question about the paper. The authors focus on making attention efficient for \
long documents by combining **local block attention**, **global anchor tokens**, and \
**hierarchical section encoding**.

Try asking me to explain an equation, define a term, or summarize the main points.";

/// Classify `text` by the first matching keyword rule
///
/// # Examples
///
/// ```
/// use papercopilot::providers::canned::{classify, ReplyKind};
///
/// assert_eq!(classify("What is an equation?"), ReplyKind::Math);
/// assert_eq!(classify("Define recall"), ReplyKind::Definition);
/// assert_eq!(classify("hello"), ReplyKind::Fallback);
/// ```
pub fn classify(text: &str) -> ReplyKind {
    let lower = text.to_lowercase();
    RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(kind, _)| *kind)
        .unwrap_or(ReplyKind::Fallback)
}

/// Canned text for a reply kind
pub fn canned_reply(kind: ReplyKind) -> &'static str {
    match kind {
        ReplyKind::Math => MATH_REPLY,
        ReplyKind::Definition => DEFINITION_REPLY,
        ReplyKind::Summary => SUMMARY_REPLY,
        ReplyKind::Simplify => SIMPLIFY_REPLY,
        ReplyKind::Fallback => FALLBACK_REPLY,
    }
}

/// Reply provider backed by the keyword rules
#[derive(Debug, Clone)]
pub struct CannedReplyProvider {
    delay: Duration,
}

impl CannedReplyProvider {
    /// Create a provider that answers after `delay`
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl ReplyProvider for CannedReplyProvider {
    async fn reply(&self, _transcript: &[Message], latest: &str) -> Result<String> {
        let kind = classify(latest);
        tracing::debug!(?kind, delay_ms = self.delay.as_millis() as u64, "Canned reply selected");
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(canned_reply(kind).to_string())
    }

    fn name(&self) -> &'static str {
        "canned"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_rule_keyword() {
        let cases = [
            ("Explain this formula", ReplyKind::Math),
            ("is there math here", ReplyKind::Math),
            ("define perplexity", ReplyKind::Definition),
            ("what's the meaning of span", ReplyKind::Definition),
            ("Can you summarize it?", ReplyKind::Summary),
            ("what is the main point", ReplyKind::Definition),
            ("give me the main point", ReplyKind::Summary),
            ("this part is DIFFICULT", ReplyKind::Simplify),
            ("I don't understand", ReplyKind::Simplify),
            ("Who funded this?", ReplyKind::Fallback),
        ];
        for (text, expected) in cases {
            assert_eq!(classify(text), expected, "{}", text);
        }
    }

    #[test]
    fn test_rule_order_math_beats_definition() {
        assert_eq!(classify("What is an equation?"), ReplyKind::Math);
    }

    #[test]
    fn test_rule_order_summary_beats_simplify() {
        assert_eq!(
            classify("summarize the complex section"),
            ReplyKind::Summary
        );
    }

    #[test]
    fn test_replies_are_distinct() {
        let kinds = [
            ReplyKind::Math,
            ReplyKind::Definition,
            ReplyKind::Summary,
            ReplyKind::Simplify,
            ReplyKind::Fallback,
        ];
        for a in kinds {
            for b in kinds {
                if a != b {
                    assert_ne!(canned_reply(a), canned_reply(b));
                }
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_reply_waits_for_delay() {
        let provider = CannedReplyProvider::new(Duration::from_millis(1500));
        let start = tokio::time::Instant::now();
        let reply = provider.reply(&[], "What is an equation?").await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(1500));
        assert_eq!(reply, MATH_REPLY);
    }

    #[tokio::test]
    async fn test_zero_delay_replies_immediately() {
        let provider = CannedReplyProvider::new(Duration::ZERO);
        let reply = provider.reply(&[], "anything").await.unwrap();
        assert_eq!(reply, FALLBACK_REPLY);
        assert_eq!(provider.name(), "canned");
    }
}
