//! Cardwatch CLI - Credit-card fraud detection in your terminal

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{dashboard, status, train};

/// Cardwatch - credit-card fraud detection in your terminal
#[derive(Parser)]
#[command(name = "cw", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the interactive fraud-detection dashboard
    Dashboard,

    /// Train the fraud model from a labelled CSV
    Train {
        /// Path to the labelled transaction CSV
        data: PathBuf,
        /// Where to write the model artifact (defaults into the data directory)
        #[arg(long)]
        model: Option<PathBuf>,
        /// Ground-truth label column (defaults to the configured name)
        #[arg(long)]
        label: Option<String>,
        /// Identifier column kept out of the features
        #[arg(long)]
        identifier: Option<String>,
        /// Trees in the ensemble
        #[arg(long, default_value_t = 100)]
        trees: usize,
        /// Seed for the hold-out split and bootstrap draws
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Fraction of rows held out for evaluation
        #[arg(long, default_value_t = 0.2)]
        holdout: f64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the data directory, user count and model summary
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();

    let result = run(cli);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Dashboard => dashboard::run(),
        Commands::Train {
            data,
            model,
            label,
            identifier,
            trees,
            seed,
            holdout,
            json,
        } => train::run(data, model, label, identifier, trees, seed, holdout, json),
        Commands::Status { json } => status::run(json),
    }
}
