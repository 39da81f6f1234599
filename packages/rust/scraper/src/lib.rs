//! Page fetching, text extraction, and link resolution.
//!
//! This crate provides:
//! - [`extract`]: title / visible body text / anchor extraction from HTML
//! - [`links`]: href resolution to absolute http(s) URLs with deduplication
//! - [`SiteScraper`]: fetches one page and aggregates it into [`SiteData`]
//!
//! [`SiteData`]: brochure_shared::SiteData

pub mod extract;
pub mod links;
pub mod scrape;

pub use extract::{ExtractedPage, truncate_chars};
pub use links::{resolve_href, resolve_links};
pub use scrape::{SiteScraper, site_data_from_html};
