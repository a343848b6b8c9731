use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{error, info};

use transfer_fees::aggregate::{aggregate, season_counts, Selector};
use transfer_fees::analysis::TransferAnalysis;
use transfer_fees::config::Config;
use transfer_fees::dataset::DirectoryProvider;
use transfer_fees::fetch::HttpFetcher;
use transfer_fees::normalize::retain_from_year;
use transfer_fees::scrape::Scraper;
use transfer_fees::{logging, report};

#[derive(Parser)]
#[command(name = "transfer_fees")]
#[command(about = "Football transfer fee totals by season and destination team")]
#[command(version = "0.1.0")]
struct Cli {
    /// Config file (defaults to transfer_fees.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the seasons and teams available for selection
    Options {
        /// Directory holding the dataset CSV files
        #[arg(long)]
        dataset_dir: Option<PathBuf>,
        /// Print the options as JSON
        #[arg(long)]
        json: bool,
    },
    /// Sum transfer fees for a season, a team, or both
    Aggregate {
        #[arg(long)]
        dataset_dir: Option<PathBuf>,
        /// Season label such as 10/11, or "All Seasons"
        #[arg(long)]
        season: Option<String>,
        /// Destination team (case-insensitive, partial names match), or "All Teams"
        #[arg(long)]
        team: Option<String>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Scrape the transfer history of one player page
    Scrape {
        /// Player transfer page URL
        url: String,
        /// Print records as JSON instead of a table
        #[arg(long)]
        json: bool,
        /// Also aggregate the scraped records for this season
        #[arg(long)]
        season: Option<String>,
        /// Also aggregate the scraped records for this team
        #[arg(long)]
        team: Option<String>,
    },
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    Config::load_from(path).context("loading configuration")
}

fn analysis_for(config: &Config, dataset_dir: Option<PathBuf>) -> TransferAnalysis<DirectoryProvider> {
    let dir = dataset_dir.unwrap_or_else(|| config.dataset.dir.clone());
    info!("Using dataset directory {}", dir.display());
    let provider = DirectoryProvider::new(dir).with_tables(&[config.dataset.transfers_table.as_str()]);
    TransferAnalysis::new(provider, config.dataset.clone())
}

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Options { dataset_dir, json } => {
            let analysis = analysis_for(&config, dataset_dir);
            let records = analysis.records().context("loading transfers")?;
            let options = analysis.options()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&options)?);
                return Ok(());
            }
            let counts = season_counts(&records);

            println!("Seasons ({}):", options.seasons.len());
            for season in &options.seasons {
                println!("  {}  ({} transfers)", season, counts.get(season.as_str()).unwrap_or(&0));
            }
            println!("\nTeams ({}):", options.teams.len());
            for team in &options.teams {
                println!("  {}", team);
            }
        }
        Commands::Aggregate { dataset_dir, season, team, json } => {
            let season = Selector::from(season);
            let team = Selector::from(team);
            let analysis = analysis_for(&config, dataset_dir);

            let result = analysis.aggregate(&season, &team).map_err(|e| {
                error!("Aggregation failed: {}", e);
                e
            });
            let result = result.context("could not load the transfers dataset")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{}", report::render_aggregation(&result, &season, &team));
            }
        }
        Commands::Scrape { url, json, season, team } => {
            let fetcher = HttpFetcher::from_config(&config.scrape).context("building HTTP client")?;
            let scraper = Scraper::new(fetcher, config.scrape.clone());
            let view = scraper.lookup(&url);

            if let Some(message) = &view.message {
                println!("⚠️  {}", message);
            }

            if json {
                println!("{}", serde_json::to_string_pretty(view.records.as_slice())?);
            } else if !view.is_failure() {
                println!("{}", report::render_records(&view.records));
            }

            let season = Selector::from(season);
            let team = Selector::from(team);
            if season.specific().is_some() || team.specific().is_some() {
                let recent = retain_from_year(view.records.to_vec(), config.dataset.min_year);
                let result = aggregate(&recent, &season, &team);
                println!("{}", report::render_aggregation(&result, &season, &team));
            }
        }
    }
    Ok(())
}
