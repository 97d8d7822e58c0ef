//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use pressmill_catalog::{Catalog, CatalogSource, TopicSource};
use pressmill_core::{
    DailyConfig, PipelineConfig, ProgressReporter, SetupConfig, run_build, run_daily, run_setup,
};
use pressmill_generation::{ChatClient, ChatClientOptions, ChatWriter, DynamicTopicSource};
use pressmill_shared::{AppConfig, init_config, load_config, resolve_api_key};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Pressmill — automated article generation and static publishing.
#[derive(Parser)]
#[command(
    name = "pressmill",
    version,
    about = "Generate articles from a topic catalog and publish them as a static site.",
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

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Run the daily cycle: pick a topic, generate, build, publish.
    Daily {
        /// Catalog file to use instead of the built-in one.
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Seed the site with the top-priority catalog topics.
    Setup {
        /// Number of articles to generate.
        #[arg(long, default_value = "5")]
        articles: usize,

        /// Catalog file to use instead of the built-in one.
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Rebuild the site from stored records without generating.
    Build,

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

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "pressmill=info",
        1 => "pressmill=debug",
        _ => "pressmill=trace",
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Daily { catalog } => cmd_daily(catalog.as_deref()).await,
        Command::Setup { articles, catalog } => cmd_setup(articles, catalog.as_deref()).await,
        Command::Build => cmd_build().await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show().await,
        },
    }
}

// ---------------------------------------------------------------------------
// Shared assembly
// ---------------------------------------------------------------------------

fn pipeline_config(config: &AppConfig) -> PipelineConfig {
    let assets_dir = PathBuf::from(&config.defaults.assets_dir);
    PipelineConfig {
        posts_dir: PathBuf::from(&config.defaults.posts_dir),
        output_dir: PathBuf::from(&config.defaults.output_dir),
        assets_dir: assets_dir.is_dir().then_some(assets_dir),
        site: config.site.clone(),
        affiliates: config.affiliates.clone(),
        homepage_posts: config.defaults.homepage_posts,
    }
}

fn load_catalog(path: Option<&std::path::Path>) -> Result<Catalog> {
    Ok(match path {
        Some(p) => Catalog::from_path(p)?,
        None => Catalog::builtin(),
    })
}

fn chat_writer(config: &AppConfig) -> Result<ChatWriter> {
    let api_key = resolve_api_key(&config.writer.api_key_env)?;
    let client = ChatClient::new(ChatClientOptions {
        base_url: config.writer.base_url.clone(),
        api_key,
        model: config.writer.model.clone(),
        timeout_secs: config.defaults.request_timeout_secs,
    })?;
    Ok(ChatWriter::new(client))
}

fn dynamic_source(config: &AppConfig) -> Result<DynamicTopicSource> {
    // Fall back to the writer's key when no dedicated topics key is set.
    let api_key = resolve_api_key(&config.topics.api_key_env)
        .or_else(|_| resolve_api_key(&config.writer.api_key_env))?;
    let client = ChatClient::new(ChatClientOptions {
        base_url: config.topics.base_url.clone(),
        api_key,
        model: config.topics.model.clone(),
        timeout_secs: config.defaults.request_timeout_secs,
    })?;
    Ok(DynamicTopicSource::new(client))
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_daily(catalog_path: Option<&std::path::Path>) -> Result<()> {
    let config = load_config()?;
    let catalog = load_catalog(catalog_path)?;
    let writer = chat_writer(&config)?;
    let catalog_source = CatalogSource::new(catalog);
    let dynamic = dynamic_source(&config)?;
    let sources: [&dyn TopicSource; 2] = [&catalog_source, &dynamic];

    let daily_config = DailyConfig {
        pipeline: pipeline_config(&config),
        publish: config.publish.clone(),
    };

    info!("starting daily run");
    let reporter = CliProgress::new();
    let result = run_daily(&daily_config, &writer, &sources, &reporter).await?;
    reporter.finish();

    println!();
    println!("  Daily run complete!");
    println!("  Article:   {}", result.title);
    println!("  Keyword:   {}", result.keyword);
    println!("  Records:   {}", result.total_records);
    println!(
        "  Published: {}",
        if result.published { "yes" } else { "no (skipped)" }
    );
    println!("  Time:      {:.1}s", result.elapsed.as_secs_f64());
    println!();

    Ok(())
}

async fn cmd_setup(articles: usize, catalog_path: Option<&std::path::Path>) -> Result<()> {
    let config = load_config()?;
    let catalog = load_catalog(catalog_path)?;
    let writer = chat_writer(&config)?;

    let setup_config = SetupConfig {
        pipeline: pipeline_config(&config),
        catalog,
        articles,
    };

    info!(articles, "starting initial seeding");
    let reporter = CliProgress::new();
    let result = run_setup(&setup_config, &writer, &reporter).await?;
    reporter.finish();

    println!();
    println!("  Setup complete!");
    println!("  Generated: {}", result.generated);
    println!("  Skipped:   {}", result.skipped);
    println!("  Records:   {}", result.total_records);
    println!();

    Ok(())
}

async fn cmd_build() -> Result<()> {
    let config = load_config()?;
    let report = run_build(&pipeline_config(&config))?;

    println!();
    println!("  Site built!");
    println!("  Articles:  {}", report.rendered_count);
    println!("  Artifacts: {}", report.checksums.len());
    println!();

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
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }

    fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn article_written(&self, title: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Generated [{current}/{total}] {title}"));
    }
}
