//! Shared types, error model, and configuration for the brochure generator.
//!
//! This crate is the foundation depended on by all other brochure crates.
//! It provides:
//! - [`BrochureError`]: the unified error type
//! - Domain types ([`SiteData`], [`Link`], [`RelevantLinks`], [`PromptPair`])
//! - Configuration ([`AppConfig`], [`LlmConfig`], [`ScrapeConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DefaultsConfig, LlmConfig, LlmProvider, ScrapeConfig, config_dir,
    config_file_path, init_config, load_config, load_config_from, validate_api_key,
};
pub use error::{BrochureError, Result};
pub use types::{DEFAULT_MAX_CONTENT_CHARS, Link, NO_TITLE, PromptPair, RelevantLinks, SiteData};
