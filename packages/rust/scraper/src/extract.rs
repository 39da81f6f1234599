//! HTML text and anchor extraction.
//!
//! Pulls the page title, the visible body text and every anchor `href` out of
//! a parsed document. Text inside scripts, styles, media and embedded frames
//! never reaches the extracted body text.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};

use brochure_shared::NO_TITLE;

/// Tags whose subtrees contribute nothing to the visible text.
const SKIPPED_TAGS: &[&str] = &["script", "style", "img", "input", "noscript", "iframe"];

static TITLE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("valid selector"));
static BODY_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("body").expect("valid selector"));
static ANCHOR_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a").expect("valid selector"));

/// Raw extraction output for one page, before link resolution and truncation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedPage {
    /// Trimmed `<title>` text, or [`NO_TITLE`].
    pub title: String,
    /// Visible body text with whitespace runs collapsed to newlines.
    pub body_text: String,
    /// `href` of every `<a>` in document order, unfiltered.
    pub anchors: Vec<String>,
}

impl ExtractedPage {
    /// Parse `html` and extract title, body text and anchors.
    pub fn parse(html: &str) -> Self {
        let doc = Html::parse_document(html);
        Self {
            title: extract_title(&doc),
            body_text: extract_body_text(&doc),
            anchors: extract_anchors(&doc),
        }
    }

    /// Title followed by the body text, capped at `max_chars` characters.
    pub fn content(&self, max_chars: usize) -> String {
        let combined = if self.body_text.is_empty() {
            self.title.clone()
        } else {
            format!("{}\n\n{}", self.title, self.body_text)
        };
        truncate_chars(&combined, max_chars)
    }
}

/// Text of the first `<title>` element, trimmed.
fn extract_title(doc: &Html) -> String {
    doc.select(&TITLE_SEL)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| NO_TITLE.to_string())
}

/// Visible text of `<body>`, or an empty string when there is no body.
fn extract_body_text(doc: &Html) -> String {
    doc.select(&BODY_SEL)
        .next()
        .map(|body| collapse_whitespace(&visible_text(body)))
        .unwrap_or_default()
}

/// Concatenate text nodes under `root`, skipping those inside [`SKIPPED_TAGS`].
fn visible_text(root: ElementRef<'_>) -> String {
    let mut text = String::new();

    for node in root.descendants() {
        let Node::Text(fragment) = node.value() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| SKIPPED_TAGS.contains(&el.name()))
        });

        if !hidden {
            text.push_str(fragment);
        }
    }

    text
}

/// Replace every run of two or more whitespace characters with one newline, then trim.
fn collapse_whitespace(text: &str) -> String {
    static WS_RUN_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\s{2,}").expect("valid regex"));

    WS_RUN_RE.replace_all(text, "\n").trim().to_string()
}

/// Every anchor `href`, including empty ones. Anchors without the attribute are skipped.
fn extract_anchors(doc: &Html) -> Vec<String> {
    doc.select(&ANCHOR_SEL)
        .filter_map(|el| el.value().attr("href"))
        .map(str::to_string)
        .collect()
}

/// Hard cut to at most `max_chars` characters. Never splits a code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}
