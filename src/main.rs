use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use aerodata::Config;

mod commands;

#[derive(Parser, Debug)]
#[command(
    name = "aerodata",
    version,
    about = "Build airport, frequency and obstacle datasets from FAA NASR and DOF files"
)]
struct Cli {
    /// TOML configuration file (overrides AERODATA_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output directory (overrides the config file and AERODATA_OUTPUT_DIR)
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch both sources, rebuild the datasets and write them out
    Update,
    /// Look up the overlying center and frequencies for individual airports
    Frequencies {
        /// FAA location identifiers, e.g. RWI
        #[arg(required = true)]
        airports: Vec<String>,
    },
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    setup_logging();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(dir) = cli.output_dir {
        config.output_dir = dir;
    }

    match cli.command {
        Commands::Update => commands::handle_update(&config).await,
        Commands::Frequencies { airports } => {
            commands::handle_frequencies(&config, &airports).await
        }
    }
}
