//! rustdblp - DBLP venue crawler and title lookup
//!
//! ## Usage
//!
//! ### Venue crawl
//! ```bash
//! rustdblp crawl --venue hpca --start-year 2018 --threshold 0.4 --output hpca.csv
//! rustdblp crawl --group ARCH --strict --keyword schedul=0.4 --keyword qos=0.4
//! ```
//!
//! ### Title lookup
//! ```bash
//! rustdblp lookup --input survey.csv --owner alice --output urls.csv
//! ```

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser, Subcommand};
use rustdblp::config::{self, Settings};
use rustdblp::crawler::{crawl_venues, CrawlOptions};
use rustdblp::dblp::{ClientOptions, DblpClient};
use rustdblp::input::{load_titles, OwnerFilter};
use rustdblp::logging::{self, LogLevel};
use rustdblp::lookup::lookup_titles;
use rustdblp::output;
use rustdblp::scoring::{parse_keyword_pair, KeywordWeights};
use rustdblp::summary::BatchSummary;
use rustdblp::venue::VenueMatchMode;
use rustdblp::PublicationRecord;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

// ============================================================================
// CLI Definition
// ============================================================================

/// DBLP venue crawler and paper title lookup
#[derive(Parser)]
#[command(name = "rustdblp")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Logging level
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    loglevel: LogLevel,

    /// Log file, truncated on start (default: dblplog.log for crawl, searchPaper.log for lookup)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Config file layered over ./.rustdblp.toml and the platform config
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl conference streams for keyword-relevant papers
    #[command(group(ArgGroup::new("target").required(true).args(["venue", "group"])))]
    Crawl {
        /// Venue identifier, e.g. hpca (ipps means IPDPS)
        #[arg(long)]
        venue: Option<String>,

        /// Crawl every venue of a configured group (ARCH, NET, SOFT, DM, AI)
        #[arg(long)]
        group: Option<String>,

        /// Oldest year to keep (default: 2018)
        #[arg(long)]
        start_year: Option<i32>,

        /// Minimum relevance score to keep a paper (default: 0.4)
        #[arg(long)]
        threshold: Option<f64>,

        /// Output CSV file
        #[arg(short, long, default_value = "data.csv")]
        output: PathBuf,

        /// Reject venues mentioning "workshop"
        #[arg(long)]
        strict: bool,

        /// Keyword weight, replaces the configured keyword set (repeatable)
        #[arg(long = "keyword", value_name = "KEYWORD=WEIGHT", value_parser = parse_keyword_pair)]
        keywords: Vec<(String, f64)>,

        /// Stop after this many pages per venue
        #[arg(long)]
        max_pages: Option<u32>,

        /// Search endpoint URL
        #[arg(long)]
        base_url: Option<String>,

        /// Proxy URL (e.g., http://127.0.0.1:7890)
        #[arg(long)]
        proxy: Option<String>,
    },

    /// Look up the DBLP listing of every title in a CSV file
    Lookup {
        /// CSV file with a header row
        #[arg(short, long)]
        input: PathBuf,

        /// Column holding the titles
        #[arg(long, default_value = "title")]
        title_column: String,

        /// Only look up rows assigned to this owner
        #[arg(long)]
        owner: Option<String>,

        /// Column holding the owner/assignee
        #[arg(long, default_value = "owner")]
        owner_column: String,

        /// Output CSV file
        #[arg(short, long, default_value = "data.csv")]
        output: PathBuf,

        /// Search endpoint URL
        #[arg(long)]
        base_url: Option<String>,

        /// Proxy URL (e.g., http://127.0.0.1:7890)
        #[arg(long)]
        proxy: Option<String>,
    },
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_log = match cli.command {
        Commands::Crawl { .. } => "dblplog.log",
        Commands::Lookup { .. } => "searchPaper.log",
    };
    let log_file = cli.log_file.unwrap_or_else(|| PathBuf::from(default_log));
    logging::init(cli.loglevel, Some(&log_file)).context("Failed to initialise logging")?;

    let config_file = config::load_config(cli.config.as_deref()).context("Failed to load config")?;
    let settings = Settings::from_config(config_file).context("Invalid config")?;

    match cli.command {
        Commands::Crawl {
            venue,
            group,
            start_year,
            threshold,
            output,
            strict,
            keywords,
            max_pages,
            base_url,
            proxy,
        } => {
            run_crawl(
                &settings, venue, group, start_year, threshold, output, strict, keywords, max_pages,
                base_url, proxy,
            )
            .await
        }
        Commands::Lookup {
            input,
            title_column,
            owner,
            owner_column,
            output,
            base_url,
            proxy,
        } => {
            let owner = owner.map(|value| OwnerFilter {
                column: owner_column,
                value,
            });
            run_lookup(&settings, input, title_column, owner, output, base_url, proxy).await
        }
    }
}

// ============================================================================
// Venue Crawl
// ============================================================================

#[allow(clippy::too_many_arguments)]
async fn run_crawl(
    settings: &Settings,
    venue: Option<String>,
    group: Option<String>,
    start_year: Option<i32>,
    threshold: Option<f64>,
    output_path: PathBuf,
    strict: bool,
    keyword_pairs: Vec<(String, f64)>,
    max_pages: Option<u32>,
    base_url: Option<String>,
    proxy: Option<String>,
) -> Result<()> {
    let venues: Vec<String> = match (venue, group) {
        (Some(venue), _) => vec![venue],
        (None, Some(group)) => settings.venue_group(&group)?.to_vec(),
        (None, None) => anyhow::bail!("either --venue or --group is required"),
    };

    let keywords = if keyword_pairs.is_empty() {
        settings.keywords.clone()
    } else {
        KeywordWeights::from_pairs(keyword_pairs)
    };

    let options = CrawlOptions {
        start_year: start_year.unwrap_or(settings.start_year),
        threshold: threshold.unwrap_or(settings.threshold),
        match_mode: if strict {
            VenueMatchMode::Strict
        } else {
            VenueMatchMode::Loose
        },
        max_pages: max_pages.or(settings.max_pages),
    };

    info!(
        venues = ?venues,
        keywords = %keywords.disjunction(),
        start_year = options.start_year,
        threshold = options.threshold,
        mode = ?options.match_mode,
        max_pages = ?options.max_pages,
        "Starting venue crawl"
    );

    let client = DblpClient::new(&client_options(settings, base_url, proxy))?;
    let (records, summary) = crawl_venues(&client, &venues, &keywords, &options).await;

    finish(&output_path, &records, &summary, output::write_venue_records)
}

// ============================================================================
// Title Lookup
// ============================================================================

async fn run_lookup(
    settings: &Settings,
    input: PathBuf,
    title_column: String,
    owner: Option<OwnerFilter>,
    output_path: PathBuf,
    base_url: Option<String>,
    proxy: Option<String>,
) -> Result<()> {
    let titles = load_titles(&input, &title_column, owner.as_ref())
        .with_context(|| format!("Failed to load titles from {}", input.display()))?;

    if titles.is_empty() {
        println!("No titles to look up in {}", input.display());
        return Ok(());
    }

    let client = DblpClient::new(&client_options(settings, base_url, proxy))?;
    let (records, summary) = lookup_titles(&client, &titles).await;

    finish(&output_path, &records, &summary, output::write_lookup_records)
}

// ============================================================================
// Helpers
// ============================================================================

fn client_options(settings: &Settings, base_url: Option<String>, proxy: Option<String>) -> ClientOptions {
    ClientOptions {
        base_url: base_url.unwrap_or_else(|| settings.base_url.clone()),
        proxy,
        timeout: Duration::from_secs(settings.timeout_secs),
    }
}

/// Report the batch and write whatever records were found.
fn finish(
    path: &Path,
    records: &[PublicationRecord],
    summary: &BatchSummary,
    write: fn(&Path, &[PublicationRecord]) -> rustdblp::Result<usize>,
) -> Result<()> {
    summary.log();

    if records.is_empty() {
        println!("No papers found, nothing written.");
    } else {
        let rows = write(path, records).context("Failed to write output CSV")?;
        println!("Saved {} papers to {}", rows, path.display());
    }

    if summary.failed() > 0 {
        println!("{} of {} {}s failed, see log for details", summary.failed(), summary.items, summary.label);
    }
    if summary.all_failed() {
        anyhow::bail!("every {} failed", summary.label);
    }
    Ok(())
}
