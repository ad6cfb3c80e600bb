use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "chanplan",
    version,
    about = "Edit and inspect channel program schedules"
)]
pub struct Cli {
    /// Config file (defaults to <config dir>/chanplan/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Import a channel record from JSON
    Import {
        file: PathBuf,
        /// Store under this channel number instead of the one in the file
        #[arg(long)]
        number: Option<u32>,
    },
    /// Write a stored channel record as JSON
    Export {
        number: u32,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List stored channels
    List,
    /// Print what is airing now and what comes next
    Show {
        number: u32,
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// List the shows of a channel with suggested weights
    Shows { number: u32 },
    /// Apply edit operations in order and save the result
    Edit {
        number: u32,
        #[arg(required = true)]
        ops: Vec<String>,
        /// Print the result without saving it
        #[arg(long)]
        dry_run: bool,
    },
    /// Delete a stored channel
    Delete { number: u32 },
}
