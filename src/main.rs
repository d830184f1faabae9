use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, Read};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use jrec::corpus::integrity_report;
use jrec::recommend::{Query, Recommender};
use jrec::server::run_server;
use jrec::Settings;

#[derive(Parser)]
#[command(name = "journal-recommender")]
#[command(version = "0.1")]
#[command(about = "Recommends journals for a manuscript from pre-trained clusters", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve {
        /// Host to bind to (overrides JREC_HOST)
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on (overrides JREC_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Read a JSON query from stdin and print recommendations
    Recommend,
    /// Print a summary of the loaded artifacts
    Stats,
    /// Check cluster ids and journal references across the artifacts
    Validate,
    /// Print the effective configuration
    Config,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();
}

fn load(settings: &Settings) -> Result<Recommender> {
    Recommender::load(settings).context("Failed to load model artifacts")
}

fn recommend_command(settings: &Settings) -> Result<()> {
    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;
    let query: Query = serde_json::from_str(&input).context("Failed to parse JSON query")?;

    let recommender = load(settings)?;
    let results = recommender.recommend(&query);

    let output = serde_json::json!({
        "query": query,
        "cluster": results.cluster,
        "journals": results.journals,
        "articles": results.articles,
        "actual_results_count": results.journals.len(),
        "requested_results_count": recommender.top_n(),
    });

    println!("{}", serde_json::to_string(&output)?);
    Ok(())
}

fn stats_command(settings: &Settings) -> Result<()> {
    let recommender = load(settings)?;
    let output = serde_json::json!({
        "vocabulary_size": recommender.vectorizer().dim(),
        "vectorizer_fingerprint": recommender.vectorizer().fingerprint(),
        "clusters": recommender.assigner().k(),
        "articles": recommender.corpus().len(),
        "journals": recommender.registry().len(),
        "articles_per_cluster": recommender.corpus().cluster_counts(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn validate_command(settings: &Settings) -> Result<()> {
    let recommender = load(settings)?;
    let issues = integrity_report(
        recommender.corpus(),
        recommender.registry(),
        recommender.assigner().k(),
    );
    for issue in &issues {
        println!("{}", serde_json::to_string(issue)?);
    }
    if !issues.is_empty() {
        anyhow::bail!("{} integrity issues found", issues.len());
    }
    info!("No integrity issues found");
    Ok(())
}

async fn serve_command(settings: &Settings) -> Result<()> {
    let recommender = Arc::new(load(settings)?);
    if recommender.corpus().is_empty() {
        warn!("Corpus is empty; every request will return no recommendations");
    }
    run_server(settings, recommender).await
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    let mut settings = Settings::new()?;
    init_tracing(settings.verbose);

    match args.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                settings.host = host;
            }
            if let Some(port) = port {
                settings.port = port;
            }
            serve_command(&settings).await?
        }
        Commands::Recommend => recommend_command(&settings)?,
        Commands::Stats => stats_command(&settings)?,
        Commands::Validate => validate_command(&settings)?,
        Commands::Config => settings.print_config(),
    }
    Ok(())
}
