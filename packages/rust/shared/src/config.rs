//! Application configuration for the brochure generator.
//!
//! User config lives at `~/.brochure/brochure.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{BrochureError, Result};
use crate::types::DEFAULT_MAX_CONTENT_CHARS;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "brochure.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".brochure";

// ---------------------------------------------------------------------------
// Config structs (matching brochure.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Completion service settings.
    #[serde(default)]
    pub llm: LlmConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Directory the brochure file is written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Maximum characters of page content kept per scrape.
    #[serde(default = "default_max_content_chars")]
    pub max_content_chars: usize,

    /// Scrape each relevant link and give its content to the summary prompt.
    #[serde(default = "default_true")]
    pub fetch_linked_pages: bool,

    /// Number of link summaries requested at once (1 = sequential).
    #[serde(default = "default_enrichment_concurrency")]
    pub enrichment_concurrency: usize,

    /// Timeout for page fetches, in seconds.
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            max_content_chars: default_max_content_chars(),
            fetch_linked_pages: true,
            enrichment_concurrency: default_enrichment_concurrency(),
            http_timeout_secs: default_http_timeout(),
        }
    }
}

fn default_output_dir() -> String {
    ".".into()
}
fn default_max_content_chars() -> usize {
    DEFAULT_MAX_CONTENT_CHARS
}
fn default_true() -> bool {
    true
}
fn default_enrichment_concurrency() -> usize {
    1
}
fn default_http_timeout() -> u64 {
    30
}

/// Which completion backend to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// Local Ollama server (`/api/chat`).
    Ollama,
    /// OpenRouter's OpenAI-compatible API (`/chat/completions`).
    OpenRouter,
}

impl std::fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ollama => write!(f, "ollama"),
            Self::OpenRouter => write!(f, "openrouter"),
        }
    }
}

/// `[llm]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Completion backend.
    #[serde(default = "default_provider")]
    pub provider: LlmProvider,

    /// Model identifier passed to the backend.
    #[serde(default = "default_model")]
    pub model: String,

    /// Backend base URL. Empty means the provider default.
    #[serde(default)]
    pub base_url: String,

    /// Name of the env var holding the API key (never store the key itself).
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Timeout for a single completion request, in seconds.
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            base_url: String::new(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_llm_timeout(),
        }
    }
}

impl LlmConfig {
    /// Base URL to use, falling back to the provider default.
    pub fn resolved_base_url(&self) -> &str {
        if !self.base_url.is_empty() {
            return self.base_url.trim_end_matches('/');
        }
        match self.provider {
            LlmProvider::Ollama => "http://localhost:11434",
            LlmProvider::OpenRouter => "https://openrouter.ai/api/v1",
        }
    }

    /// Request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_provider() -> LlmProvider {
    LlmProvider::Ollama
}
fn default_model() -> String {
    "deepseek-r1:7b".into()
}
fn default_api_key_env() -> String {
    "OPENROUTER_API_KEY".into()
}
fn default_llm_timeout() -> u64 {
    300
}

// ---------------------------------------------------------------------------
// Scrape config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime scrape configuration.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// Maximum characters of combined title + body text.
    pub max_content_chars: usize,
    /// Page fetch timeout.
    pub timeout: Duration,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            max_content_chars: DEFAULT_MAX_CONTENT_CHARS,
            timeout: Duration::from_secs(default_http_timeout()),
        }
    }
}

impl From<&AppConfig> for ScrapeConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            max_content_chars: config.defaults.max_content_chars,
            timeout: Duration::from_secs(config.defaults.http_timeout_secs),
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.brochure/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| BrochureError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.brochure/brochure.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| BrochureError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        BrochureError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| BrochureError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| BrochureError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| BrochureError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Check that the API key env var is set when the provider needs one.
pub fn validate_api_key(config: &LlmConfig) -> Result<()> {
    if config.provider == LlmProvider::Ollama {
        return Ok(());
    }

    let var_name = &config.api_key_env;
    match std::env::var(var_name) {
        Ok(val) if !val.is_empty() => Ok(()),
        _ => Err(BrochureError::config(format!(
            "{} API key not found. Set the {var_name} environment variable.",
            config.provider
        ))),
    }
}
