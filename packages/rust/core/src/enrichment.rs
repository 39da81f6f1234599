//! Link enrichment: one model-written summary per relevant link.
//!
//! A failed summary never aborts the batch; that link contributes nothing
//! and the next one is processed. Sections always come out in input order,
//! even when several summaries are requested at once.

use std::sync::atomic::{AtomicUsize, Ordering};

use futures::stream::{self, StreamExt};
use tracing::{debug, info, instrument, warn};

use brochure_llm::{CompletionOptions, CompletionService};
use brochure_scraper::SiteScraper;
use brochure_shared::{Link, SiteData};

use crate::classify::strip_think;
use crate::pipeline::ProgressReporter;
use crate::prompts::summary_prompt;

/// Heading that opens the enrichment block in the brochure prompt.
pub const RELEVANT_LINKS_HEADER: &str = "## Relevant Links:\n";

/// Knobs for [`enrich_links`].
#[derive(Debug, Clone)]
pub struct EnrichmentOptions {
    /// Summaries in flight at once. `1` is strictly sequential.
    pub concurrency: usize,
    /// Scrape each link before summarizing it.
    pub fetch_linked_pages: bool,
}

impl Default for EnrichmentOptions {
    fn default() -> Self {
        Self {
            concurrency: 1,
            fetch_linked_pages: true,
        }
    }
}

/// Summarize every link and concatenate the sections under [`RELEVANT_LINKS_HEADER`].
#[instrument(skip_all, fields(links = links.len(), concurrency = options.concurrency))]
pub async fn enrich_links(
    service: &dyn CompletionService,
    scraper: &SiteScraper,
    links: &[Link],
    options: &EnrichmentOptions,
    progress: &dyn ProgressReporter,
) -> String {
    let total = links.len();
    let completed = AtomicUsize::new(0);
    let completed = &completed;

    let sections: Vec<String> = stream::iter(links)
        .map(|link| async move {
            let section = enrich_link(service, scraper, link, options).await;
            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
            progress.link_enriched(&link.link, done, total);
            section
        })
        .buffered(options.concurrency.max(1))
        .collect()
        .await;

    let failed = sections.iter().filter(|s| s.is_empty()).count();
    info!(total, failed, "link enrichment complete");

    let mut text = String::from(RELEVANT_LINKS_HEADER);
    for section in sections {
        text.push_str(&section);
    }
    text
}

/// Produce the section for one link, or an empty string if the summary failed.
async fn enrich_link(
    service: &dyn CompletionService,
    scraper: &SiteScraper,
    link: &Link,
    options: &EnrichmentOptions,
) -> String {
    let page = if options.fetch_linked_pages {
        fetch_linked_page(scraper, link).await
    } else {
        None
    };

    let prompt = summary_prompt(link, page.as_ref());

    match service.complete(&prompt, &CompletionOptions::default()).await {
        Ok(summary) => format_section(link, strip_think(&summary)),
        Err(e) => {
            warn!(link = %link.link, error = %e, "link summary failed, skipping");
            String::new()
        }
    }
}

/// Scrape the linked page. Failures degrade to a link-only summary prompt.
async fn fetch_linked_page(scraper: &SiteScraper, link: &Link) -> Option<SiteData> {
    let url = link.url().ok()?;
    match scraper.scrape(&url).await {
        Ok(page) => Some(page),
        Err(e) => {
            debug!(link = %link.link, error = %e, "linked page unavailable, summarizing by URL only");
            None
        }
    }
}

/// Render one enrichment section.
fn format_section(link: &Link, summary: &str) -> String {
    format!(
        "### {}\nURL: {}\n\n{}\n\n",
        link.link_type, link.link, summary
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashSet;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use brochure_shared::{BrochureError, PromptPair, Result, ScrapeConfig};

    use crate::pipeline::SilentProgress;

    /// Answers every prompt with a summary naming the page, failing for listed URLs.
    struct EchoService {
        fail_for: HashSet<String>,
        prompts: Mutex<Vec<PromptPair>>,
        delay_first: bool,
    }

    impl EchoService {
        fn new(fail_for: &[&str]) -> Self {
            Self {
                fail_for: fail_for.iter().map(|s| s.to_string()).collect(),
                prompts: Mutex::new(Vec::new()),
                delay_first: false,
            }
        }
    }

    #[async_trait]
    impl CompletionService for EchoService {
        async fn complete(&self, prompt: &PromptPair, _options: &CompletionOptions) -> Result<String> {
            let is_first = {
                let mut prompts = self.prompts.lock().unwrap();
                prompts.push(prompt.clone());
                prompts.len() == 1
            };
            if self.delay_first && is_first {
                tokio::time::sleep(Duration::from_millis(50)).await;
            }

            let page = prompt
                .user
                .lines()
                .find_map(|l| l.strip_prefix("## Page: "))
                .unwrap_or_default()
                .to_string();

            if self.fail_for.contains(&page) {
                return Err(BrochureError::Completion("backend unavailable".into()));
            }
            Ok(format!("<think>hmm</think>\nSummary of {page}."))
        }

        fn model_name(&self) -> &str {
            "echo"
        }
    }

    fn link(kind: &str, url: &str) -> Link {
        Link {
            link_type: kind.into(),
            link: url.into(),
        }
    }

    fn scraper() -> SiteScraper {
        SiteScraper::new(ScrapeConfig::default()).unwrap()
    }

    fn offline() -> EnrichmentOptions {
        EnrichmentOptions {
            concurrency: 1,
            fetch_linked_pages: false,
        }
    }

    #[tokio::test]
    async fn sections_follow_input_order() {
        let service = EchoService::new(&[]);
        let links = [
            link("about page", "https://acme.test/about"),
            link("careers page", "https://acme.test/careers"),
        ];

        let text = enrich_links(&service, &scraper(), &links, &offline(), &SilentProgress).await;

        assert_eq!(
            text,
            "## Relevant Links:\n\
             ### about page\nURL: https://acme.test/about\n\nSummary of https://acme.test/about.\n\n\
             ### careers page\nURL: https://acme.test/careers\n\nSummary of https://acme.test/careers.\n\n"
        );
    }

    #[tokio::test]
    async fn failed_link_degrades_to_empty_section() {
        let service = EchoService::new(&["https://acme.test/about"]);
        let links = [
            link("about page", "https://acme.test/about"),
            link("careers page", "https://acme.test/careers"),
        ];

        let text = enrich_links(&service, &scraper(), &links, &offline(), &SilentProgress).await;

        assert!(!text.contains("acme.test/about"));
        assert!(text.contains("### careers page"));
        assert_eq!(service.prompts.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn no_links_yields_header_only() {
        let service = EchoService::new(&[]);
        let text = enrich_links(&service, &scraper(), &[], &offline(), &SilentProgress).await;
        assert_eq!(text, RELEVANT_LINKS_HEADER);
    }

    #[tokio::test]
    async fn concurrent_enrichment_keeps_order() {
        let mut service = EchoService::new(&[]);
        service.delay_first = true;
        let links: Vec<Link> = (0..5)
            .map(|i| link("page", &format!("https://acme.test/p{i}")))
            .collect();
        let options = EnrichmentOptions {
            concurrency: 3,
            fetch_linked_pages: false,
        };

        let text = enrich_links(&service, &scraper(), &links, &options, &SilentProgress).await;

        let positions: Vec<usize> = (0..5)
            .map(|i| text.find(&format!("URL: https://acme.test/p{i}\n")).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test]
    async fn fetched_page_content_reaches_summary_prompt() {
        let server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::path("/about"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(
                "<title>About</title><body><p>Founded in 1949.</p></body>",
            ))
            .mount(&server)
            .await;

        let service = EchoService::new(&[]);
        let about = format!("{}/about", server.uri());
        let missing = format!("{}/gone", server.uri());
        let links = [link("about page", &about), link("gone", &missing)];

        let text = enrich_links(
            &service,
            &scraper(),
            &links,
            &EnrichmentOptions::default(),
            &SilentProgress,
        )
        .await;

        let prompts = service.prompts.lock().unwrap();
        assert!(prompts[0].user.contains("## Contents:\nAbout\n\nFounded in 1949."));
        // Unreachable page still gets a URL-only summary.
        assert!(!prompts[1].user.contains("## Contents:"));
        assert!(text.contains(&format!("Summary of {missing}.")));
    }
}
