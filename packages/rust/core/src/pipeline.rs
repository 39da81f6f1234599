//! End-to-end brochure pipeline: URL → scrape → classify → enrich → synthesize → file.

use std::path::PathBuf;
use std::time::Instant;

use tracing::{info, instrument};
use url::Url;

use brochure_llm::{CompletionOptions, CompletionService};
use brochure_scraper::SiteScraper;
use brochure_shared::{Link, Result, ScrapeConfig, SiteData};

use crate::classify::{parse_relevant_links, strip_think};
use crate::enrichment::{EnrichmentOptions, enrich_links};
use crate::output::persist_brochure;
use crate::prompts::{brochure_prompt, classification_prompt};

/// Configuration for a brochure run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Company name, used in the prompt and the output file name.
    pub company_name: String,
    /// Landing page to scrape.
    pub url: Url,
    /// Directory the brochure is written to.
    pub output_dir: PathBuf,
    /// Page fetch settings.
    pub scrape: ScrapeConfig,
    /// Link enrichment settings.
    pub enrichment: EnrichmentOptions,
}

/// Outcome of the link classification half of the pipeline.
#[derive(Debug, Clone)]
pub struct Classification {
    /// Landing page data.
    pub site: SiteData,
    /// Links the model considered relevant, in the order it returned them.
    pub relevant_links: Vec<Link>,
}

/// Result of a completed brochure run.
#[derive(Debug)]
pub struct BrochureResult {
    /// Path of the written markdown file.
    pub path: PathBuf,
    /// The brochure text as written.
    pub markdown: String,
    /// Number of links the model selected.
    pub relevant_links: usize,
    /// Total elapsed time.
    pub elapsed: std::time::Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after each link summary finishes (successfully or not).
    fn link_enriched(&self, url: &str, current: usize, total: usize);
    /// Called when the pipeline completes.
    fn done(&self, result: &BrochureResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn link_enriched(&self, _url: &str, _current: usize, _total: usize) {}
    fn done(&self, _result: &BrochureResult) {}
}

/// Scrape the landing page and ask the model which links belong in a brochure.
///
/// A fetch failure or an invalid classification response ends the run.
#[instrument(skip_all, fields(url = %url))]
pub async fn classify_site(
    url: &Url,
    scraper: &SiteScraper,
    service: &dyn CompletionService,
    progress: &dyn ProgressReporter,
) -> Result<Classification> {
    progress.phase("Scraping landing page");
    let site = scraper.scrape(url).await?;

    progress.phase("Classifying links");
    let prompt = classification_prompt(&site);
    let raw = service.complete(&prompt, &CompletionOptions::json()).await?;
    let relevant = parse_relevant_links(&raw)?;

    info!(
        discovered = site.links.len(),
        relevant = relevant.relevant_links.len(),
        model = service.model_name(),
        "links classified"
    );

    Ok(Classification {
        site,
        relevant_links: relevant.relevant_links,
    })
}

/// Run the full pipeline.
///
/// 1. Scrape the landing page (fatal on failure)
/// 2. Classify links (fatal on invalid response)
/// 3. Summarize each relevant link (failures tolerated)
/// 4. Synthesize the brochure
/// 5. Write `<Company-Name>.md`
#[instrument(skip_all, fields(company = %config.company_name, url = %config.url))]
pub async fn generate_brochure(
    config: &PipelineConfig,
    service: &dyn CompletionService,
    progress: &dyn ProgressReporter,
) -> Result<BrochureResult> {
    let start = Instant::now();
    info!(model = service.model_name(), "starting brochure pipeline");

    let scraper = SiteScraper::new(config.scrape.clone())?;

    // --- Phase 1+2: Scrape and classify ---
    let Classification {
        site,
        relevant_links,
    } = classify_site(&config.url, &scraper, service, progress).await?;

    // --- Phase 3: Enrich ---
    progress.phase("Summarizing relevant pages");
    let links_text = enrich_links(
        service,
        &scraper,
        &relevant_links,
        &config.enrichment,
        progress,
    )
    .await;

    // --- Phase 4: Synthesize ---
    progress.phase("Writing brochure");
    let prompt = brochure_prompt(&config.company_name, &site, &links_text);
    let raw = service
        .complete(&prompt, &CompletionOptions::default())
        .await?;
    let markdown = strip_think(&raw).to_string();

    // --- Phase 5: Persist ---
    let path = persist_brochure(&config.output_dir, &config.company_name, &markdown)?;

    let result = BrochureResult {
        path,
        markdown,
        relevant_links: relevant_links.len(),
        elapsed: start.elapsed(),
    };

    info!(
        path = %result.path.display(),
        relevant_links = result.relevant_links,
        elapsed_ms = result.elapsed.as_millis(),
        "brochure pipeline complete"
    );

    progress.done(&result);
    Ok(result)
}
