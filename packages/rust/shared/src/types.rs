//! Core domain types for brochure generation.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{BrochureError, Result};

/// Default cap on the combined title + body content of a scraped page.
pub const DEFAULT_MAX_CONTENT_CHARS: usize = 2000;

/// Title used when a page has no (or an empty) `<title>` element.
pub const NO_TITLE: &str = "No title found";

// ---------------------------------------------------------------------------
// SiteData
// ---------------------------------------------------------------------------

/// Text content and outgoing links scraped from a single page.
///
/// Built once per scrape and not mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteData {
    /// The page URL the data was fetched from (also the base for link resolution).
    pub url: Url,
    /// Page title, or [`NO_TITLE`].
    pub title: String,
    /// Title and visible body text, truncated to the configured maximum.
    pub content: String,
    /// Unique absolute http(s) URLs, in first-seen document order.
    pub links: Vec<String>,
}

// ---------------------------------------------------------------------------
// Classification result
// ---------------------------------------------------------------------------

/// A link the model picked as relevant for the brochure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    /// Free-text category assigned by the model ("about page", "careers page", ...).
    pub link_type: String,
    /// Absolute URL of the page.
    pub link: String,
}

impl Link {
    /// Parse `link` as an absolute http(s) URL.
    pub fn url(&self) -> Result<Url> {
        let url = Url::parse(&self.link).map_err(|e| {
            BrochureError::validation(format!("'{}' is not an absolute URL: {e}", self.link))
        })?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(BrochureError::validation(format!(
                "'{}' has unsupported scheme '{other}'",
                self.link
            ))),
        }
    }
}

/// The JSON envelope the classification prompt asks the model to return.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelevantLinks {
    pub relevant_links: Vec<Link>,
}

impl RelevantLinks {
    /// Check every entry carries a valid absolute URL.
    ///
    /// A single bad entry rejects the whole result.
    pub fn validate(&self) -> Result<()> {
        for (i, link) in self.relevant_links.iter().enumerate() {
            link.url().map_err(|e| {
                BrochureError::validation(format!("relevantLinks[{i}].link: {e}"))
            })?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// PromptPair
// ---------------------------------------------------------------------------

/// System + user message pair for a single completion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}
