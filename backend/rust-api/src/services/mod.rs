use crate::config::Config;
use anyhow::Context;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

pub struct AppState {
    pub config: Config,
    pub db: SqlitePool,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(&config.database_url)
            .context("Invalid database URL")?
            .create_if_missing(true);

        // An in-memory database only lives as long as its connection, so a
        // `sqlite::memory:` pool must be limited to a single connection.
        let max_connections = if config.database_url.contains(":memory:") {
            1
        } else {
            5
        };

        let db = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .context("Failed to connect to SQLite")?;

        tracing::info!("SQLite connected");

        init_schema(&db).await?;

        Ok(Self { config, db })
    }
}

pub(crate) async fn init_schema(db: &SqlitePool) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT UNIQUE NOT NULL,
            password_hash TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(db)
    .await
    .context("Failed to create user table")?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS scores(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            victories INTEGER DEFAULT 0,
            games_played INTEGER DEFAULT 0,
            FOREIGN KEY(user_id) REFERENCES user(id)
        )
        "#,
    )
    .execute(db)
    .await
    .context("Failed to create scores table")?;

    Ok(())
}

pub mod answer_service;
pub mod auth_service;
pub mod question_bank;
pub mod quiz_service;
pub mod score_service;
