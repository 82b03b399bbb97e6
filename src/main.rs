//! slopescout: find, enrich, and rank ski resorts.
//!
//! Thin CLI over the aggregation core:
//! 1. Fetches filtered resort pages from the upstream API
//! 2. Enriches each resort with live weather and country metadata
//! 3. Caches pages with a time-based expiry
//! 4. Ranks resorts against stated preferences

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use aggregator::ResortAggregator;
use common::{
    AppConfig, BudgetRange, ResortFilter, SkillLevel, TerrainTag, UserPreferences,
};
use resort_client::ResortClient;

/// Ski resort finder and recommender.
#[derive(Parser)]
#[command(name = "slopescout", about = "Ski resort finder and recommender")]
struct Cli {
    /// Path to the TOML config file.
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List resorts matching the given filters, enriched with weather.
    Resorts {
        #[arg(long)]
        name: Option<String>,
        /// Country code; repeat for multi-select.
        #[arg(long = "country")]
        countries: Vec<String>,
        #[arg(long)]
        region: Option<String>,
        #[arg(long)]
        slopes_min: Option<u32>,
        #[arg(long)]
        slopes_max: Option<u32>,
        #[arg(long)]
        parks_min: Option<u32>,
        #[arg(long)]
        parks_max: Option<u32>,
        #[arg(long)]
        lifts_min: Option<u32>,
        #[arg(long)]
        lifts_max: Option<u32>,
        #[arg(long)]
        price_min: Option<f64>,
        #[arg(long)]
        price_max: Option<f64>,
        #[arg(long)]
        night_skiing: Option<bool>,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 12)]
        limit: u32,
    },

    /// Show one resort with its weather snapshot.
    Detail { id: String },

    /// List countries known to the upstream.
    Countries,

    /// Rank resorts against your preferences.
    Recommend {
        #[arg(long, value_enum)]
        skill: SkillArg,
        /// Terrain preference; repeat for several.
        #[arg(long = "terrain", value_enum)]
        terrain: Vec<TerrainArg>,
        #[arg(long, default_value_t = 0.0)]
        budget_min: f64,
        #[arg(long)]
        budget_max: f64,
        #[arg(long)]
        country: Option<String>,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum SkillArg {
    Beginner,
    Intermediate,
    Advanced,
}

impl From<SkillArg> for SkillLevel {
    fn from(arg: SkillArg) -> Self {
        match arg {
            SkillArg::Beginner => SkillLevel::Beginner,
            SkillArg::Intermediate => SkillLevel::Intermediate,
            SkillArg::Advanced => SkillLevel::Advanced,
        }
    }
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum TerrainArg {
    Groomed,
    Powder,
    Park,
    Backcountry,
}

impl From<TerrainArg> for TerrainTag {
    fn from(arg: TerrainArg) -> Self {
        match arg {
            TerrainArg::Groomed => TerrainTag::Groomed,
            TerrainArg::Powder => TerrainTag::Powder,
            TerrainArg::Park => TerrainTag::Park,
            TerrainArg::Backcountry => TerrainTag::Backcountry,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let config = match AppConfig::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("failed to load config: {e}");
            return ExitCode::FAILURE;
        }
    };

    let client = Arc::new(ResortClient::new(&config.upstream));
    let agg = ResortAggregator::new(client, &config.cache, &config.aggregator);

    match cli.command {
        Command::Resorts {
            name,
            countries,
            region,
            slopes_min,
            slopes_max,
            parks_min,
            parks_max,
            lifts_min,
            lifts_max,
            price_min,
            price_max,
            night_skiing,
            page,
            limit,
        } => {
            let filter = ResortFilter {
                name,
                country_codes: countries,
                region,
                total_slopes_min: slopes_min,
                total_slopes_max: slopes_max,
                snow_parks_min: parks_min,
                snow_parks_max: parks_max,
                ski_lifts_min: lifts_min,
                ski_lifts_max: lifts_max,
                adult_day_pass_min: price_min,
                adult_day_pass_max: price_max,
                night_skiing,
                page: Some(page),
                limit: Some(limit),
            };

            let result = agg.aggregate_resorts(&filter).await;
            info!(
                "page {}/{} ({} resorts, {} total)",
                result.pagination.page,
                result.pagination.total_pages,
                result.resorts.len(),
                result.pagination.total
            );
            print_json(&result)
        }

        Command::Detail { id } => match agg.aggregate_resort_detail(&id).await {
            Some(resort) => print_json(&resort),
            None => {
                eprintln!("resort {id} not found");
                ExitCode::FAILURE
            }
        },

        Command::Countries => match agg.countries().await {
            Ok(countries) => print_json(&countries),
            Err(e) => {
                eprintln!("country listing failed: {e}");
                ExitCode::FAILURE
            }
        },

        Command::Recommend {
            skill,
            terrain,
            budget_min,
            budget_max,
            country,
        } => {
            let prefs = UserPreferences {
                skill_level: skill.into(),
                terrain: terrain.into_iter().map(TerrainTag::from).collect(),
                budget: BudgetRange {
                    min: budget_min,
                    max: budget_max,
                },
                country,
            };

            let ranked = agg.recommend(&prefs).await;
            info!("{} resorts ranked", ranked.len());
            print_json(&ranked)
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(out) => {
            println!("{out}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("failed to encode output: {e}");
            ExitCode::FAILURE
        }
    }
}
