pub mod achievements;
pub mod api;
pub mod betting;
pub mod cli;
pub mod config;
pub mod database;
pub mod domain;
pub mod errors;
pub mod ranking;
pub mod services;
pub mod standings;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use cli::Cli;
use colored::Colorize;

use crate::cli::Command;
use crate::config::AppConfig;
use crate::database::DbPool;
use crate::domain::{BettingRankingEntry, LeagueTableEntry};
use crate::services::recompute::scored_coupons;
use crate::services::{ImportService, RecomputeService, ServerService, TournamentLocks};

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_serve(port: u16) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::new();
        let service = ServerService::new(port, config);
        service.run().await
    })
}

pub fn handle_import(file: &Path) -> Result<()> {
    let config = AppConfig::new();
    let pool = open_database(&config)?;
    let summary = ImportService::new(pool).import_file(file)?;
    println!(
        "Imported tournament {}: {} players, {} matches, {} coupons ({} predictions)",
        summary.tournament_id.to_string().bold(),
        summary.players,
        summary.matches,
        summary.coupons,
        summary.predictions
    );
    Ok(())
}

pub fn handle_recompute(tournament: Option<i64>) -> Result<()> {
    let config = AppConfig::new();
    let pool = open_database(&config)?;
    let service = RecomputeService::new(pool, config.betting, Arc::new(TournamentLocks::new()));

    let summaries = match tournament {
        Some(id) => vec![service.recompute_tournament(id)?],
        None => service.recompute_all()?,
    };

    for s in summaries {
        let betting = if s.resolved {
            format!(
                "{} coupons scored, {} betting achievements",
                s.scored_coupons, s.betting_achievements
            )
            .green()
        } else {
            "not resolved".yellow()
        };
        println!(
            "Tournament {}: {} rows, {} achievements, {}",
            s.tournament_id.to_string().bold(),
            s.table_rows,
            s.achievements,
            betting
        );
    }
    Ok(())
}

pub fn handle_standings(tournament: i64) -> Result<()> {
    let config = AppConfig::new();
    let pool = open_database(&config)?;
    let conn = database::get_connection(&pool)?;

    let rows = database::standings::list_by_tournament(&conn, tournament)?;
    if rows.is_empty() {
        println!("No stored standings for tournament {}; run `recompute` first", tournament);
        return Ok(());
    }
    print_standings(&rows);
    Ok(())
}

pub fn handle_leaderboard(limit: usize) -> Result<()> {
    let config = AppConfig::new();
    let pool = open_database(&config)?;
    let conn = database::get_connection(&pool)?;

    let coupons = scored_coupons(&conn)?;
    let stats = database::betting::list_player_stats(&conn)?;
    let roster = database::players::load_roster(&conn)?;
    let rows = ranking::aggregate_rankings(&coupons, &stats, &roster)?;

    print_leaderboard(&rows[..rows.len().min(limit)]);
    Ok(())
}

pub fn handle_completions(shell: Shell) -> Result<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
    Ok(())
}

fn open_database(config: &AppConfig) -> Result<DbPool> {
    let pool = database::create_pool(&config.database_path)?;
    let mut conn = database::get_connection(&pool)?;
    database::setup::ensure_schema(&mut conn)?;
    Ok(pool)
}

fn print_standings(rows: &[LeagueTableEntry]) {
    println!(
        "{}",
        format!(
            "{:>3}  {:<20} {:>3} {:>3} {:>3} {:>3} {:>7} {:>4} {:>4}",
            "#", "Player", "P", "W", "D", "L", "Goals", "GD", "Pts"
        )
        .bold()
    );
    for e in rows {
        let line = format!(
            "{:>3}  {:<20} {:>3} {:>3} {:>3} {:>3} {:>3}:{:<3} {:>+4} {:>4}",
            e.position,
            e.nickname,
            e.matches_played,
            e.wins,
            e.draws,
            e.losses,
            e.goals_for,
            e.goals_against,
            e.goal_difference,
            e.points
        );
        if e.position == 1 {
            println!("{}", line.green().bold());
        } else {
            println!("{}", line);
        }
    }
}

fn print_leaderboard(rows: &[BettingRankingEntry]) {
    println!(
        "{}",
        format!(
            "{:>3}  {:<20} {:>6} {:>8} {:>7} {:>5} {:>4} {:>4}",
            "#", "Player", "Points", "Accuracy", "Coupons", "Best", "King", "Dark"
        )
        .bold()
    );
    for e in rows {
        let line = format!(
            "{:>3}  {:<20} {:>6} {:>7.2}% {:>7} {:>5} {:>4} {:>4}",
            e.position,
            e.nickname,
            e.total_points,
            e.accuracy_percentage,
            e.total_coupons,
            e.best_coupon_score,
            e.gambling_king_count,
            e.dark_horse_count
        );
        if e.position == 1 {
            println!("{}", line.green().bold());
        } else {
            println!("{}", line);
        }
    }
}
