use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Classify every audio file under a directory
    Detect {
        /// Root directory, searched recursively
        #[arg(short, long)]
        input_dir: PathBuf,

        /// Result file (truncated at the start of the run)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Prompting strategy: direct, cot, self-ask, tot
        #[arg(short, long)]
        strategy: Option<String>,

        /// Recording environment: standard, quiet, noisy
        #[arg(short, long)]
        environment: Option<String>,

        /// Pause before each file in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,

        /// Payload check: round-trip, syntax
        #[arg(long)]
        payload_check: Option<String>,

        /// Skip the service reachability check before the run
        #[arg(long)]
        skip_check: bool,
    },

    /// List available strategies and their default result files
    Strategies,

    /// Print the instruction text a strategy sends with each file
    Prompt {
        /// Prompting strategy: direct, cot, self-ask, tot
        #[arg(short, long)]
        strategy: String,

        /// Recording environment: standard, quiet, noisy
        #[arg(short, long, default_value = "standard")]
        environment: String,
    },

    /// Write the default configuration to a file
    InitConfig {
        /// Destination file
        #[arg(short, long, default_value = "coughscan.toml")]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
