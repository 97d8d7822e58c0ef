//! Pressmill CLI — automated content pipeline.
//!
//! Generates one article per run from a topic catalog, renders a static
//! site from the stored records, and pushes it to a git remote.

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
