use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser, Debug)]
#[command(author, version, about = "League scoring and betting engine")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Start the HTTP server
    Serve {
        /// Port number (optional, defaults to 3000)
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
    },
    /// Load a tournament snapshot (JSON) into the database
    Import {
        /// Snapshot file
        file: PathBuf,
    },
    /// Rebuild standings, achievements and betting results
    Recompute {
        /// Only this tournament; all tournaments when omitted
        #[arg(short, long)]
        tournament: Option<i64>,
    },
    /// Print the stored league table of a tournament
    Standings {
        tournament: i64,
    },
    /// Print the betting leaderboard
    Leaderboard {
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },
    /// Generate shell completions
    Completions {
        shell: Shell,
    },
}
