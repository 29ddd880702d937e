//! Minimal markup renderer for assistant messages
//!
//! Messages use a small, fixed subset of markdown:
//!
//! - `#`, `##`, `###` headers
//! - `- ` / `* ` / `• ` bullets
//! - `1. ` numbered items
//! - `**bold**` inline spans
//! - `\*` and `\\` for a literal `*` or `\`
//!
//! Text is parsed into [`Block`]s first and then rendered, so user-supplied
//! text can never inject markup into the output: HTML rendering escapes every
//! text span, and nothing outside the rule set is interpreted.

use colored::Colorize;
use regex::Regex;
use std::sync::OnceLock;

/// Inline run of text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span {
    /// Plain text
    Text(String),
    /// Text wrapped in `**`
    Bold(String),
}

/// One line-level element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// `#` header, level 1 to 3
    Heading {
        /// Number of leading `#`
        level: u8,
        /// Header content
        spans: Vec<Span>,
    },
    /// Bullet list item
    Bullet(Vec<Span>),
    /// Numbered list item
    Numbered {
        /// The number written in the source
        number: u32,
        /// Item content
        spans: Vec<Span>,
    },
    /// Ordinary line of text
    Paragraph(Vec<Span>),
    /// Empty line
    Blank,
}

fn bold_pattern() -> &'static Regex {
    static BOLD: OnceLock<Regex> = OnceLock::new();
    BOLD.get_or_init(|| Regex::new(r"\*\*(.+?)\*\*").expect("bold pattern is valid"))
}

fn numbered_pattern() -> &'static Regex {
    static NUMBERED: OnceLock<Regex> = OnceLock::new();
    NUMBERED.get_or_init(|| Regex::new(r"^(\d{1,6})\.\s+(.*)$").expect("numbered pattern is valid"))
}

/// Make user text render literally inside a markup line
///
/// Line breaks collapse to spaces and `*` / `\` are backslash-escaped, so
/// the result can never open a header, a list item, or a bold span.
///
/// # Examples
///
/// ```
/// use papercopilot::markup::{escape_markup, render_plain};
///
/// let line = format!("**Poll:** {}", escape_markup("**not bold**"));
/// assert_eq!(render_plain(&line), "Poll: **not bold**");
/// ```
pub fn escape_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' | '*' => {
                out.push('\\');
                out.push(ch);
            }
            '\n' | '\r' => out.push(' '),
            other => out.push(other),
        }
    }
    out
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(&next) = chars.peek() {
                if next == '\\' || next == '*' {
                    out.push(next);
                    chars.next();
                    continue;
                }
            }
        }
        out.push(ch);
    }
    out
}

/// Split a line into plain and bold spans
///
/// # Examples
///
/// ```
/// use papercopilot::markup::{parse_inline, Span};
///
/// let spans = parse_inline("a **b** c");
/// assert_eq!(spans[1], Span::Bold("b".to_string()));
/// ```
pub fn parse_inline(line: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut last = 0;
    for caps in bold_pattern().captures_iter(line) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > last {
            spans.push(Span::Text(unescape(&line[last..whole.start()])));
        }
        spans.push(Span::Bold(unescape(inner.as_str())));
        last = whole.end();
    }
    if last < line.len() {
        spans.push(Span::Text(unescape(&line[last..])));
    }
    spans
}

fn parse_line(line: &str) -> Block {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Block::Blank;
    }

    for (prefix, level) in [("### ", 3u8), ("## ", 2), ("# ", 1)] {
        if let Some(rest) = trimmed.strip_prefix(prefix) {
            return Block::Heading {
                level,
                spans: parse_inline(rest.trim()),
            };
        }
    }

    for prefix in ["- ", "* ", "• "] {
        if let Some(rest) = trimmed.strip_prefix(prefix) {
            return Block::Bullet(parse_inline(rest.trim()));
        }
    }

    if let Some(caps) = numbered_pattern().captures(trimmed) {
        if let (Some(number), Some(rest)) = (caps.get(1), caps.get(2)) {
            if let Ok(number) = number.as_str().parse() {
                return Block::Numbered {
                    number,
                    spans: parse_inline(rest.as_str()),
                };
            }
        }
    }

    Block::Paragraph(parse_inline(trimmed))
}

/// Parse text into blocks, one per line
pub fn parse(text: &str) -> Vec<Block> {
    text.lines().map(parse_line).collect()
}

/// Escape text for inclusion in HTML
///
/// # Examples
///
/// ```
/// use papercopilot::markup::escape_html;
///
/// assert_eq!(escape_html("<b>&\"'"), "&lt;b&gt;&amp;&quot;&#39;");
/// ```
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

fn spans_to_html(spans: &[Span]) -> String {
    spans
        .iter()
        .map(|span| match span {
            Span::Text(text) => escape_html(text),
            Span::Bold(text) => format!("<strong>{}</strong>", escape_html(text)),
        })
        .collect()
}

#[derive(PartialEq)]
enum OpenList {
    None,
    Bullets,
    Numbers,
}

/// Render text as HTML
///
/// Consecutive bullets become one `<ul>`, consecutive numbered items one
/// `<ol>`. All text is escaped.
///
/// # Examples
///
/// ```
/// use papercopilot::markup::render_html;
///
/// let html = render_html("## Title\n- **a**\n- <b>");
/// assert_eq!(html, "<h2>Title</h2>\n<ul>\n<li><strong>a</strong></li>\n<li>&lt;b&gt;</li>\n</ul>");
/// ```
pub fn render_html(text: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut open = OpenList::None;

    let close = |open: &mut OpenList, lines: &mut Vec<String>| {
        match open {
            OpenList::Bullets => lines.push("</ul>".to_string()),
            OpenList::Numbers => lines.push("</ol>".to_string()),
            OpenList::None => {}
        }
        *open = OpenList::None;
    };

    for block in parse(text) {
        match block {
            Block::Bullet(spans) => {
                if open != OpenList::Bullets {
                    close(&mut open, &mut lines);
                    lines.push("<ul>".to_string());
                    open = OpenList::Bullets;
                }
                lines.push(format!("<li>{}</li>", spans_to_html(&spans)));
            }
            Block::Numbered { spans, .. } => {
                if open != OpenList::Numbers {
                    close(&mut open, &mut lines);
                    lines.push("<ol>".to_string());
                    open = OpenList::Numbers;
                }
                lines.push(format!("<li>{}</li>", spans_to_html(&spans)));
            }
            Block::Heading { level, spans } => {
                close(&mut open, &mut lines);
                lines.push(format!("<h{0}>{1}</h{0}>", level, spans_to_html(&spans)));
            }
            Block::Paragraph(spans) => {
                close(&mut open, &mut lines);
                lines.push(format!("<p>{}</p>", spans_to_html(&spans)));
            }
            Block::Blank => close(&mut open, &mut lines),
        }
    }
    close(&mut open, &mut lines);

    lines.join("\n")
}

fn spans_to_terminal(spans: &[Span]) -> String {
    spans
        .iter()
        .map(|span| match span {
            Span::Text(text) => text.clone(),
            Span::Bold(text) => text.bold().to_string(),
        })
        .collect()
}

/// Render text for the terminal with ANSI styling
///
/// Markers are removed; headers are underlined, bold spans are bold,
/// bullets become `•`.
pub fn render_terminal(text: &str) -> String {
    parse(text)
        .iter()
        .map(|block| match block {
            Block::Heading { level: 1, spans } => {
                spans_to_terminal(spans).bold().underline().to_string()
            }
            Block::Heading { spans, .. } => spans_to_terminal(spans).bold().cyan().to_string(),
            Block::Bullet(spans) => format!("  • {}", spans_to_terminal(spans)),
            Block::Numbered { number, spans } => {
                format!("  {}. {}", number, spans_to_terminal(spans))
            }
            Block::Paragraph(spans) => spans_to_terminal(spans),
            Block::Blank => String::new(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render text as plain text with all markers removed
pub fn render_plain(text: &str) -> String {
    let plain = |spans: &[Span]| -> String {
        spans
            .iter()
            .map(|span| match span {
                Span::Text(text) | Span::Bold(text) => text.as_str(),
            })
            .collect()
    };

    parse(text)
        .iter()
        .map(|block| match block {
            Block::Heading { spans, .. } | Block::Paragraph(spans) => plain(spans),
            Block::Bullet(spans) => format!("• {}", plain(spans)),
            Block::Numbered { number, spans } => format!("{}. {}", number, plain(spans)),
            Block::Blank => String::new(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escaped_text_is_not_markup() {
        let escaped = escape_markup("**x** and a \\ slash");
        assert_eq!(escaped, "\\*\\*x\\*\\* and a \\\\ slash");
        assert_eq!(
            parse_inline(&escaped),
            vec![Span::Text("**x** and a \\ slash".to_string())]
        );
    }

    #[test]
    fn test_escaped_text_inside_bold_line() {
        let line = format!("**Q:** {}", escape_markup("**y**"));
        assert_eq!(
            parse_inline(&line),
            vec![
                Span::Bold("Q:".to_string()),
                Span::Text(" **y**".to_string())
            ]
        );
    }

    #[test]
    fn test_parse_inline_plain() {
        assert_eq!(
            parse_inline("no markers"),
            vec![Span::Text("no markers".to_string())]
        );
    }

    #[test]
    fn test_parse_inline_multiple_bold() {
        assert_eq!(
            parse_inline("**a** and **b**"),
            vec![
                Span::Bold("a".to_string()),
                Span::Text(" and ".to_string()),
                Span::Bold("b".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_inline_unclosed_bold_is_text() {
        assert_eq!(
            parse_inline("**open"),
            vec![Span::Text("**open".to_string())]
        );
    }

    #[test]
    fn test_parse_blocks() {
        let blocks = parse("# H1\n### H3\n- item\n• dot\n2. second\n\nplain");
        assert!(matches!(blocks[0], Block::Heading { level: 1, .. }));
        assert!(matches!(blocks[1], Block::Heading { level: 3, .. }));
        assert!(matches!(blocks[2], Block::Bullet(_)));
        assert!(matches!(blocks[3], Block::Bullet(_)));
        assert!(matches!(blocks[4], Block::Numbered { number: 2, .. }));
        assert_eq!(blocks[5], Block::Blank);
        assert!(matches!(blocks[6], Block::Paragraph(_)));
    }

    #[test]
    fn test_hash_without_space_is_paragraph() {
        assert!(matches!(parse("#hashtag")[0], Block::Paragraph(_)));
    }

    #[test]
    fn test_render_html_escapes_injection() {
        let html = render_html("<script>alert('x')</script> **<img>**");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("<strong>&lt;img&gt;</strong>"));
    }

    #[test]
    fn test_render_html_groups_lists() {
        let html = render_html("1. one\n2. two\n- a\ntext");
        assert_eq!(
            html,
            "<ol>\n<li>one</li>\n<li>two</li>\n</ol>\n<ul>\n<li>a</li>\n</ul>\n<p>text</p>"
        );
    }

    #[test]
    fn test_render_html_blank_closes_list() {
        let html = render_html("- a\n\n- b");
        assert_eq!(html.matches("<ul>").count(), 2);
    }

    #[test]
    fn test_render_plain_strips_markers() {
        let plain = render_plain("## **Title**\n- **x** y\n3. z");
        assert_eq!(plain, "Title\n• x y\n3. z");
    }

    #[test]
    fn test_render_terminal_keeps_text() {
        colored::control::set_override(false);
        let out = render_terminal("# Head\n- **bold** tail\n1. step");
        assert_eq!(out, "Head\n  • bold tail\n  1. step");
    }
}
