use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::debug;

pub mod settings;

const SCHEMA: &str = include_str!("../../migrations/create_tables.sql");

/// Open (creating if needed) the local SQLite database and create tables
pub async fn init_db(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    // An in-memory database lives per connection, keep exactly one
    let max_connections = if database_url.contains(":memory:") { 1 } else { 4 };
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    create_tables(&pool).await?;
    debug!("local storage ready at {}", database_url);

    Ok(pool)
}

/// Create all database tables
async fn create_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(SCHEMA).execute(pool).await?;
    Ok(())
}
