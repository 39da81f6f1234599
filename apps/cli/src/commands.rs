//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;

use brochure_core::{
    BrochureResult, EnrichmentOptions, PipelineConfig, ProgressReporter, SilentProgress,
};
use brochure_scraper::SiteScraper;
use brochure_shared::{AppConfig, LlmProvider, ScrapeConfig, init_config, load_config};
use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use url::Url;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// brochure: turn a company website into a markdown brochure.
#[derive(Parser)]
#[command(
    name = "brochure",
    version,
    about = "Scrape a company website and write a short markdown brochure with an LLM.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Completion backend selectable on the command line.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub(crate) enum ProviderArg {
    Ollama,
    Openrouter,
}

impl From<ProviderArg> for LlmProvider {
    fn from(arg: ProviderArg) -> Self {
        match arg {
            ProviderArg::Ollama => LlmProvider::Ollama,
            ProviderArg::Openrouter => LlmProvider::OpenRouter,
        }
    }
}

/// Model selection flags shared by commands that call the completion service.
#[derive(clap::Args, Clone, Debug)]
pub(crate) struct ModelArgs {
    /// Completion backend (overrides config).
    #[arg(long)]
    pub provider: Option<ProviderArg>,

    /// Model identifier (overrides config).
    #[arg(short, long)]
    pub model: Option<String>,

    /// Backend base URL (overrides config).
    #[arg(long)]
    pub base_url: Option<String>,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Generate a brochure for a company from its website.
    Generate {
        /// Company name (also names the output file).
        #[arg(value_parser = parse_company_name)]
        company_name: String,

        /// Landing page URL (absolute http/https).
        #[arg(value_parser = parse_site_url)]
        url: Url,

        /// Output directory (defaults to config, then the current directory).
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Number of link summaries requested at once.
        #[arg(long)]
        concurrency: Option<usize>,

        /// Summarize links by URL only, without fetching the linked pages.
        #[arg(long)]
        no_fetch_links: bool,

        #[command(flatten)]
        model: ModelArgs,
    },

    /// Print the links the model considers relevant for a brochure, as JSON.
    Links {
        /// Landing page URL (absolute http/https).
        #[arg(value_parser = parse_site_url)]
        url: Url,

        #[command(flatten)]
        model: ModelArgs,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

/// Accept only absolute http(s) URLs.
fn parse_site_url(raw: &str) -> std::result::Result<Url, String> {
    let url = Url::parse(raw).map_err(|e| format!("invalid URL '{raw}': {e}"))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(format!("unsupported scheme '{other}': expected http or https")),
    }
}

/// Reject blank company names.
fn parse_company_name(raw: &str) -> std::result::Result<String, String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err("company name must not be empty".into());
    }
    Ok(name.to_string())
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "brochure=info",
        1 => "brochure=debug",
        _ => "brochure=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Generate {
            company_name,
            url,
            out,
            concurrency,
            no_fetch_links,
            model,
        } => cmd_generate(company_name, url, out, concurrency, no_fetch_links, &model).await,
        Command::Links { url, model } => cmd_links(&url, &model).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show().await,
        },
    }
}

/// Load the config file and apply model flag overrides.
fn resolve_config(model: &ModelArgs) -> Result<AppConfig> {
    let mut config = load_config()?;

    if let Some(provider) = model.provider {
        config.llm.provider = provider.into();
    }
    if let Some(name) = &model.model {
        config.llm.model = name.clone();
    }
    if let Some(base_url) = &model.base_url {
        config.llm.base_url = base_url.clone();
    }

    Ok(config)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_generate(
    company_name: String,
    url: Url,
    out: Option<PathBuf>,
    concurrency: Option<usize>,
    no_fetch_links: bool,
    model: &ModelArgs,
) -> Result<()> {
    let config = resolve_config(model)?;
    let service = brochure_llm::build_client(&config.llm)?;

    let output_dir = out.unwrap_or_else(|| PathBuf::from(&config.defaults.output_dir));
    if !output_dir.is_dir() {
        return Err(eyre!(
            "output directory '{}' does not exist",
            output_dir.display()
        ));
    }

    let pipeline_config = PipelineConfig {
        company_name,
        url,
        output_dir,
        scrape: ScrapeConfig::from(&config),
        enrichment: EnrichmentOptions {
            concurrency: concurrency
                .unwrap_or(config.defaults.enrichment_concurrency)
                .max(1),
            fetch_linked_pages: config.defaults.fetch_linked_pages && !no_fetch_links,
        },
    };

    info!(
        company = %pipeline_config.company_name,
        url = %pipeline_config.url,
        provider = %config.llm.provider,
        model = %config.llm.model,
        "generating brochure"
    );

    let reporter = CliProgress::new();
    let result =
        brochure_core::generate_brochure(&pipeline_config, service.as_ref(), &reporter).await?;

    println!();
    println!("  Brochure written!");
    println!("  Company: {}", pipeline_config.company_name);
    println!("  Links:   {}", result.relevant_links);
    println!("  Path:    {}", result.path.display());
    println!("  Time:    {:.1}s", result.elapsed.as_secs_f64());
    println!();

    Ok(())
}

async fn cmd_links(url: &Url, model: &ModelArgs) -> Result<()> {
    let config = resolve_config(model)?;
    let service = brochure_llm::build_client(&config.llm)?;
    let scraper = SiteScraper::new(ScrapeConfig::from(&config))?;

    info!(%url, model = %config.llm.model, "classifying links");

    let classification =
        brochure_core::classify_site(url, &scraper, service.as_ref(), &SilentProgress).await?;

    let json = serde_json::to_string_pretty(&serde_json::json!({
        "relevantLinks": classification.relevant_links,
    }))?;
    println!("{json}");

    Ok(())
}

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        spinner.set_style(style);
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn link_enriched(&self, url: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Summarized [{current}/{total}] {url}"));
    }

    fn done(&self, _result: &BrochureResult) {
        self.spinner.finish_and_clear();
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn generate_parses_positional_args() {
        let cli = Cli::try_parse_from([
            "brochure",
            "generate",
            "Acme Rockets",
            "https://acme.test/",
            "--provider",
            "openrouter",
            "--concurrency",
            "4",
        ])
        .unwrap();

        match cli.command {
            Command::Generate {
                company_name,
                url,
                concurrency,
                model,
                ..
            } => {
                assert_eq!(company_name, "Acme Rockets");
                assert_eq!(url.as_str(), "https://acme.test/");
                assert_eq!(concurrency, Some(4));
                assert!(matches!(model.provider, Some(ProviderArg::Openrouter)));
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn missing_url_is_usage_error() {
        let err = Cli::try_parse_from(["brochure", "generate", "Acme"])
            .err()
            .expect("missing URL must fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn invalid_url_is_rejected_before_running() {
        for bad in ["acme.test", "ftp://acme.test/", "not a url"] {
            let err = Cli::try_parse_from(["brochure", "generate", "Acme", bad])
                .err()
                .expect("invalid URL must fail");
            assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
        }
    }

    #[test]
    fn blank_company_name_is_rejected() {
        assert!(Cli::try_parse_from(["brochure", "generate", "  ", "https://acme.test/"]).is_err());
    }
}
