//! Command-line front end for the road-network router

mod config;
mod error;
mod matrix;
mod model;
mod routing;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use roadpath_core::Coordinate;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::error::CliError;
use crate::routing::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "roadpath")]
#[command(author, version, about = "Point-to-point routing on a road graph", long_about = None)]
struct Cli {
    /// TOML configuration file with [graph], [routing] and [cache] tables
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Node CSV file, overrides [graph].nodes_path
    #[arg(long, global = true)]
    nodes: Option<PathBuf>,

    /// Edge CSV file, overrides [graph].edges_path
    #[arg(long, global = true)]
    edges: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `roadpath_core=trace`; RUST_LOG wins when set
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Route between two coordinates, through waypoints when given
    Route {
        /// Start coordinate (lat,lon)
        #[arg(long)]
        from: Coordinate,
        /// End coordinate (lat,lon)
        #[arg(long)]
        to: Coordinate,
        /// Waypoint coordinate (lat,lon), repeatable and visited in order
        #[arg(long)]
        via: Vec<Coordinate>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
    /// Direct and waypoint-constrained routes side by side
    Multi {
        /// Start coordinate (lat,lon)
        #[arg(long)]
        from: Coordinate,
        /// End coordinate (lat,lon)
        #[arg(long)]
        to: Coordinate,
        /// Waypoint coordinate (lat,lon), repeatable and visited in order
        #[arg(long)]
        via: Vec<Coordinate>,
        /// Trip tag attached to cached segments
        #[arg(long)]
        owner: Option<String>,
    },
    /// Travel-time matrix between all given points
    Matrix {
        /// Point (lat,lon), at least two
        #[arg(long = "point", required = true, num_args = 1..)]
        points: Vec<Coordinate>,
    },
    /// Size of the loaded road graph
    Stats,
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    let app_config = AppConfig::resolve(cli.config.as_deref(), cli.nodes, cli.edges)?;

    match cli.command {
        Commands::Route {
            from,
            to,
            via,
            format,
        } => {
            let calculator = model::build_calculator(&app_config)?;
            routing::run_route(&calculator, from, to, &via, format)
        }
        Commands::Multi {
            from,
            to,
            via,
            owner,
        } => {
            let calculator = model::build_calculator(&app_config)?;
            routing::run_multi(&calculator, from, to, &via, owner)
        }
        Commands::Matrix { points } => {
            let calculator = model::build_calculator(&app_config)?;
            let matrix = matrix::travel_time_matrix(&calculator, &points)?;
            println!("{}", serde_json::to_string_pretty(&matrix)?);
            Ok(())
        }
        Commands::Stats => {
            let stats = model::graph_stats(&app_config)?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            if e.is_retryable() {
                ExitCode::from(75)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}
