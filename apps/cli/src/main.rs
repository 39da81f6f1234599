//! brochure CLI: scrape a company website and write a markdown brochure.
//!
//! Picks the relevant sub-pages of a landing page with a language model,
//! summarizes them, and synthesizes `<Company-Name>.md`.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
