//! QG8 CLI - Inspect, dump and rewrite QG8 tensor graph files.

use clap::{Parser, Subcommand};
use qg8::fatal::OrExit;

mod commands;
mod common;

#[derive(Parser)]
#[command(name = "qg8")]
#[command(about = "CLI tool for inspecting and rewriting QG8 tensor graph files")]
struct Cli {
    /// Path to a codec config JSON (optional, see generate-config)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List chunk frames without decoding tensor payloads
    Inspect {
        /// Path to the QG8 file
        file: String,
    },

    /// Decode every chunk and print a tensor summary
    Dump {
        /// Path to the QG8 file
        file: String,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Load a QG8 file and write it back out
    Rewrite {
        /// Path to the source QG8 file
        input: String,

        /// Path to the file to create
        output: String,
    },

    /// Print a template codec config
    GenerateConfig,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    common::init_logging(cli.verbose);

    let config = common::load_config(cli.config.as_deref()).or_exit("loading codec config");

    match cli.command {
        Commands::Inspect { file } => commands::inspect::run(&file, config)?,
        Commands::Dump { file, json } => commands::dump::run(&file, config, json)?,
        Commands::Rewrite { input, output } => commands::rewrite::run(&input, &output, config)?,
        Commands::GenerateConfig => commands::generate_config_template()?,
    }

    Ok(())
}
