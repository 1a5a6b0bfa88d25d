//! Store connections: the SQLite pool with its schema, and the document-store handle.

use std::{path::Path, str::FromStr};

use anyhow::{Context, Result};
use mongodb::{Client, Database, options::ClientOptions};
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

use crate::config::{AppConfig, MongoConfig};

/// Schema script, embedded so the binary and the tests share one source.
const INIT_SQL: &str = include_str!("../migrations/0001_init.sql");

/// Open the configured SQLite database, creating the file (and its parent
/// directory) when missing.
pub async fn connect(cfg: &AppConfig) -> Result<SqlitePool> {
    let db_url = &cfg.database_url;
    tracing::debug!("Connecting using raw URL => {}", db_url);

    let db_path = db_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .trim_start_matches("file:");
    if !db_path.starts_with(":memory:") {
        if let Some(parent) = Path::new(db_path).parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating database directory {:?}", parent))?;
                tracing::info!("Created missing directory {:?}", parent);
            }
        }
    }

    let options = SqliteConnectOptions::from_str(db_url)
        .with_context(|| format!("parsing database URL `{}`", db_url))?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(cfg.db_max_connections)
        .connect_with(options)
        .await
        .with_context(|| format!("connecting to {}", db_url))?;

    Ok(pool)
}

/// Build the document-store handle. The driver connects lazily, so this
/// succeeds even when the server is down; callers ping to find out.
pub async fn connect_document_store(cfg: &MongoConfig) -> Result<Database> {
    let uri = cfg.uri();
    let mut options = ClientOptions::parse(uri.as_str())
        .await
        .context("parsing document store URI")?;
    options.app_name = Some("petstore-api".into());
    options.connect_timeout = Some(cfg.connect_timeout);
    options.server_selection_timeout = Some(cfg.connect_timeout);
    options.max_pool_size = Some(cfg.max_pool_size);
    options.min_pool_size = Some(cfg.min_pool_size);
    options.max_idle_time = Some(cfg.max_conn_idle_time);

    let client = Client::with_options(options).context("building document store client")?;
    Ok(client.database(&cfg.database))
}

/// Single-connection in-memory database with the schema applied. Every call
/// yields an independent database.
pub async fn connect_in_memory() -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;
    run_migrations(&pool).await?;
    Ok(pool)
}

/// Run the embedded schema script. Every statement is idempotent, so this is
/// safe on every startup.
pub async fn run_migrations(db: &SqlitePool) -> Result<()> {
    let statements = INIT_SQL
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>();

    tracing::info!("Running {} migration statements...", statements.len());

    for stmt in statements {
        tracing::debug!("Executing migration SQL: {}", stmt);
        sqlx::query(stmt)
            .execute(db)
            .await
            .with_context(|| format!("executing migration statement `{}`", stmt))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let pool = connect_in_memory().await.unwrap();
        run_migrations(&pool).await.unwrap();

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name IN ('sellers', 'pets', 'users') ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();
        assert_eq!(tables, vec!["pets", "sellers", "users"]);
    }

    #[tokio::test]
    async fn pets_reference_existing_sellers() {
        let pool = connect_in_memory().await.unwrap();
        let err = sqlx::query(
            "INSERT INTO pets (name, species, seller_id, created_at, updated_at)
             VALUES ('Rex', 'dog', 99, '2024-01-01T00:00:00Z', '2024-01-01T00:00:00Z')",
        )
        .execute(&pool)
        .await;
        assert!(err.is_err());
    }
}
