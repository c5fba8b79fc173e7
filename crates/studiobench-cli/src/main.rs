use std::path::PathBuf;

use clap::{Parser, Subcommand};
use studiobench_core::{AppConfig, Tier};
use tracing_subscriber::EnvFilter;

mod analysis;
mod output;
mod pins;
mod source;

use pins::PinsCommands;

#[derive(Debug, Parser)]
#[command(name = "studiobench")]
#[command(about = "Studio pricing benchmark command line interface")]
struct Cli {
    /// Read offers.json, competitors.json, own_studio.json and pins.json from
    /// this directory instead of the backend
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Print a JSON envelope instead of tables
    #[arg(long, global = true)]
    json: bool,

    /// Engine tunables file (YAML)
    #[arg(long, global = true)]
    engine_config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Full dashboard: market, ranking, recommendations, position, benchmark
    Report {
        /// Competitor to include in the benchmark next to the pinned ones
        #[arg(long)]
        selected: Option<String>,
    },
    /// Most similar competitors with score breakdown
    Rank {
        /// Case-insensitive match on name, city or address
        #[arg(long)]
        search: Option<String>,
        /// Only competitors of this tier (e.g. "Tier 1", "2")
        #[arg(long)]
        tier: Option<Tier>,
        /// Case-insensitive match on segment
        #[arg(long)]
        segment: Option<String>,
    },
    /// Per-class price statistics per market bucket
    Market,
    /// Pricing recommendation for every own offer, plus overall position
    Recommend,
    /// Pairwise comparability between own offers and one competitor's offers
    Compare {
        /// Competitor id as listed by the backend
        competitor_id: String,
    },
    /// Per-class price statistics per competitor tier and offer type
    Tiers,
    /// Inspect or change the pinned competitors (backend only)
    Pins {
        #[command(subcommand)]
        command: PinsCommands,
    },
}

impl Cli {
    /// Flags given on the command line win over the environment.
    fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(dir) = &self.data_dir {
            config.data_dir = Some(dir.clone());
        }
        if let Some(path) = &self.engine_config {
            config.engine_config_path.clone_from(path);
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parsed before any config is read so `--help` works with a broken env.
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    let mut config = studiobench_core::load_app_config()?;
    cli.apply_overrides(&mut config);

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let engine = studiobench_core::load_engine_config_or_default(&config.engine_config_path)?;

    tracing::debug!(
        env = %config.env,
        backend_url = %config.backend_url,
        data_dir = ?config.data_dir,
        "starting studiobench"
    );

    let out = output::Output::new(cli.json);

    match cli.command {
        Some(Commands::Report { selected }) => {
            analysis::run_report(&config, &engine, out, selected.as_deref()).await
        }
        Some(Commands::Rank {
            search,
            tier,
            segment,
        }) => {
            let filter = studiobench_engine::CompetitorFilter {
                search,
                tier,
                segment,
            };
            analysis::run_rank(&config, &engine, out, &filter).await
        }
        Some(Commands::Market) => analysis::run_market(&config, &engine, out).await,
        Some(Commands::Recommend) => analysis::run_recommend(&config, &engine, out).await,
        Some(Commands::Compare { competitor_id }) => {
            analysis::run_compare(&config, &engine, out, &competitor_id).await
        }
        Some(Commands::Tiers) => analysis::run_tiers(&config, &engine, out).await,
        Some(Commands::Pins { command }) => pins::run_pins(&config, &engine, out, command).await,
        None => analysis::run_report(&config, &engine, out, None).await,
    }
}
