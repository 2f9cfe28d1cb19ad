use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use quantum_life::app;
use quantum_life::config::{default_workers, BackendKind, SimulationConfig, DEFAULT_SHOTS};

#[derive(Parser, Debug)]
#[command(
    name = "quantum-life",
    version,
    about = "Probabilistic Game of Life driven by per-cell sampled circuits"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Simulate from an initial grid and write every generation as JSON.
    Run {
        /// Whitespace-separated probabilities, one row per line.
        input: PathBuf,
        /// Destination for the JSON history.
        output: PathBuf,
        /// Number of generations to compute.
        turns: usize,
        /// Shots sampled per cell per turn.
        #[arg(long, env = "QGOL_SHOTS", default_value_t = DEFAULT_SHOTS)]
        shots: usize,
        /// Seed for reproducible runs; drawn from OS entropy when omitted.
        #[arg(long, env = "QGOL_SEED")]
        seed: Option<u64>,
        /// Worker threads (defaults to available cores minus one).
        #[arg(long, env = "QGOL_WORKERS")]
        workers: Option<usize>,
        /// Extra attempts for a cell whose evaluation fails.
        #[arg(long, env = "QGOL_RETRIES", default_value_t = 0)]
        retries: u32,
        /// Compute exact probabilities instead of sampling shots.
        #[arg(long)]
        exact: bool,
    },
    /// Render a JSON history as an animated GIF.
    Render {
        /// History written by `run`.
        history: PathBuf,
        /// Destination GIF.
        output: PathBuf,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Run {
            input,
            output,
            turns,
            shots,
            seed,
            workers,
            retries,
            exact,
        } => {
            let config = SimulationConfig {
                shots,
                workers: workers.unwrap_or_else(default_workers),
                seed,
                max_retries: retries,
                backend: if exact {
                    BackendKind::Exact
                } else {
                    BackendKind::Sampler
                },
            };
            app::simulate(&input, &output, turns, &config)
        }
        Command::Render { history, output } => app::render(&history, &output),
    };

    if let Err(err) = result {
        log::error!("{}", err);
        process::exit(1);
    }
}
