//! Repository layer for database operations
//!
//! Stores never hold a connection of their own: every call receives the
//! connection (usually an open transaction) it must run on, so services can
//! group several store calls into one atomic unit.

pub mod books;
pub mod loans;
pub mod users;

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Sqlite, Transaction};

use crate::{config::DatabaseConfig, error::AppResult};

/// Embedded migrations, run on connect
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: SqlitePool,
    pub books: books::BooksRepository,
    pub users: users::UsersRepository,
    pub loans: loans::LoansRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            books: books::BooksRepository,
            users: users::UsersRepository,
            loans: loans::LoansRepository,
            pool,
        }
    }

    /// Open the pool described by `config` and bring the schema up to date
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(&config.url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            // Cascades rely on these: a loan can never point at a deleted row
            .foreign_keys(true)
            .busy_timeout(Duration::from_millis(config.busy_timeout_ms));

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect_with(options)
            .await?;

        MIGRATOR.run(&pool).await.map_err(sqlx::Error::from)?;

        Ok(Self::new(pool))
    }

    /// Start a transaction. Dropping it without `commit` rolls everything back.
    pub async fn begin(&self) -> AppResult<Transaction<'static, Sqlite>> {
        Ok(self.pool.begin().await?)
    }

    /// Cheap round-trip used by the readiness check
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
