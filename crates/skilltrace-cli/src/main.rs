//! skilltrace CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "skilltrace",
    version,
    about = "Sequential ability rating for timed quiz attempts"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rate a sequence of attempts
    Run {
        /// Path to a .csv, .json or .toml file of attempts (columns x, b, T)
        #[arg(long)]
        input: PathBuf,

        /// Rating before the first attempt
        #[arg(long)]
        initial_prior: Option<f64>,

        /// Spread of the prior penalty
        #[arg(long)]
        sigma: Option<f64>,

        /// Lowest candidate rating
        #[arg(long)]
        lower: Option<f64>,

        /// Highest candidate rating
        #[arg(long)]
        upper: Option<f64>,

        /// Distance between candidate ratings
        #[arg(long)]
        step: Option<f64>,

        /// Output directory
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: json, html, csv, all, none (comma-separated)
        #[arg(long)]
        format: Option<String>,

        /// Keep and report the attempts rated before a failing one
        #[arg(long)]
        partial: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Check an attempts file without rating it
    Validate {
        /// Path to a .csv, .json or .toml file of attempts
        #[arg(long)]
        input: PathBuf,
    },

    /// Create a starter config and example attempts file
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("skilltrace=info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            input,
            initial_prior,
            sigma,
            lower,
            upper,
            step,
            output,
            format,
            partial,
            config,
        } => commands::run::execute(commands::run::RunArgs {
            input,
            initial_prior,
            sigma,
            lower,
            upper,
            step,
            output,
            format,
            partial,
            config,
        }),
        Commands::Validate { input } => commands::validate::execute(input),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
