use anyhow::Result;

use league_scoring::cli::Command;
use league_scoring::{
    handle_completions, handle_import, handle_leaderboard, handle_recompute, handle_serve,
    handle_standings, interpret,
};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Serve { port } => handle_serve(*port),
        Command::Import { file } => handle_import(file),
        Command::Recompute { tournament } => handle_recompute(*tournament),
        Command::Standings { tournament } => handle_standings(*tournament),
        Command::Leaderboard { limit } => handle_leaderboard(*limit),
        Command::Completions { shell } => handle_completions(*shell),
    }
}
