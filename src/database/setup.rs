use anyhow::{Context, Result};

use super::catalog;
use super::connection::DbConn;
use crate::config::default_catalog;

const DROP_SQL: &str = "
    DROP TABLE IF EXISTS betting_player_stats;
    DROP TABLE IF EXISTS betting_achievements;
    DROP TABLE IF EXISTS betting_predictions;
    DROP TABLE IF EXISTS betting_coupons;
    DROP TABLE IF EXISTS betting_prediction_types;
    DROP TABLE IF EXISTS achievements;
    DROP TABLE IF EXISTS league_table;
    DROP TABLE IF EXISTS matches;
    DROP TABLE IF EXISTS tournaments;
    DROP TABLE IF EXISTS players
";

/// Drops every table and recreates the schema with the default catalog
pub fn reset_database(conn: &mut DbConn) -> Result<()> {
    run_statements(conn, DROP_SQL).context("Failed to drop existing tables")?;
    ensure_schema(conn)?;
    log::info!("Database schema reset successfully");
    Ok(())
}

/// Creates missing tables and seeds catalog entries that are not present yet
pub fn ensure_schema(conn: &mut DbConn) -> Result<()> {
    let schema_sql = include_str!("schema.sql");
    run_statements(conn, schema_sql)?;

    let seeded = catalog::seed_missing(conn, &default_catalog())?;
    if seeded > 0 {
        log::info!("Seeded {} prediction types", seeded);
    }
    Ok(())
}

fn run_statements(conn: &mut DbConn, sql: &str) -> Result<()> {
    let statements = split_sql_statements(sql);

    for (idx, statement) in statements.iter().enumerate() {
        execute_sql(conn, statement)
            .with_context(|| format!("Failed to execute statement {}", idx + 1))?;
    }
    Ok(())
}

fn split_sql_statements(sql: &str) -> Vec<String> {
    sql.split(';')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn execute_sql(conn: &mut DbConn, sql: &str) -> Result<()> {
    conn.execute(sql, [])
        .context("Failed to execute SQL statement")
        .map(|_| ())
}
