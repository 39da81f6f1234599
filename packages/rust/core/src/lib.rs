//! Brochure pipeline orchestration and domain logic.
//!
//! This crate ties together scraping, prompt rendering, classification,
//! link enrichment and synthesis into the end-to-end [`generate_brochure`] run.

pub mod classify;
pub mod enrichment;
pub mod output;
pub mod pipeline;
pub mod prompts;

pub use classify::parse_relevant_links;
pub use enrichment::{EnrichmentOptions, RELEVANT_LINKS_HEADER, enrich_links};
pub use output::{brochure_file_name, persist_brochure};
pub use pipeline::{
    BrochureResult, Classification, PipelineConfig, ProgressReporter, SilentProgress,
    classify_site, generate_brochure,
};
pub use prompts::{brochure_prompt, classification_prompt, summary_prompt};
