//! Single-page fetcher and site data aggregation.
//!
//! One GET per scrape, no retries. Any transport error or non-2xx status is
//! reported as [`BrochureError::Network`] and the caller decides whether the
//! run can continue.

use reqwest::Client;
use tracing::{debug, info, instrument};
use url::Url;

use brochure_shared::{BrochureError, Result, ScrapeConfig, SiteData};

use crate::extract::ExtractedPage;
use crate::links::resolve_links;

/// User-Agent string for page requests.
const USER_AGENT: &str = concat!("brochure/", env!("CARGO_PKG_VERSION"));

/// Maximum number of redirects followed per fetch.
const MAX_REDIRECTS: usize = 5;

/// Build [`SiteData`] from an already-fetched HTML document.
pub fn site_data_from_html(url: &Url, html: &str, max_chars: usize) -> SiteData {
    let page = ExtractedPage::parse(html);
    let links = resolve_links(url, page.anchors.iter().map(String::as_str));

    SiteData {
        url: url.clone(),
        content: page.content(max_chars),
        title: page.title,
        links,
    }
}

/// HTTP fetcher that turns a page into [`SiteData`].
#[derive(Debug, Clone)]
pub struct SiteScraper {
    config: ScrapeConfig,
    client: Client,
}

impl SiteScraper {
    /// Create a scraper with the given configuration.
    pub fn new(config: ScrapeConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .timeout(config.timeout)
            .build()
            .map_err(|e| BrochureError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    /// Fetch the raw HTML of `url`. Non-2xx statuses are errors.
    pub async fn fetch(&self, url: &Url) -> Result<String> {
        debug!(%url, "fetching page");

        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| BrochureError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BrochureError::Network(format!("{url}: HTTP {status}")));
        }

        response
            .text()
            .await
            .map_err(|e| BrochureError::Network(format!("{url}: body read failed: {e}")))
    }

    /// Fetch `url` and extract its [`SiteData`].
    #[instrument(skip_all, fields(url = %url))]
    pub async fn scrape(&self, url: &Url) -> Result<SiteData> {
        let html = self.fetch(url).await?;
        let data = site_data_from_html(url, &html, self.config.max_content_chars);

        info!(
            title = %data.title,
            content_chars = data.content.chars().count(),
            links = data.links.len(),
            "page scraped"
        );

        Ok(data)
    }
}
