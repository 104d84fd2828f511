//! Quote persistence.
//!
//! [`QuoteStore`] is the storage seam; [`SqliteQuoteStore`] backs it with a pooled SQLite
//! database. Each call narrows the caller's deadline to the configured per-operation
//! budget. A `save` that runs out of time drops its uncommitted transaction, so a
//! timed-out quote is never left behind in the table.
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};
use quote_common::model::Quote;
use quote_common::{AppError, Deadline, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;

use crate::config::DatabaseConfig;

/// Operation label reported when an insert runs out of time.
pub const PERSIST_QUOTE: &str = "persist quote";
/// Operation label reported when a lookup runs out of time.
pub const FIND_QUOTE: &str = "find quote";

const CREATE_TABLE_SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS quotes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        code TEXT NOT NULL,
        codein TEXT NOT NULL,
        name TEXT NOT NULL,
        high TEXT NOT NULL,
        low TEXT NOT NULL,
        var_bid TEXT NOT NULL,
        pct_change TEXT NOT NULL,
        bid TEXT NOT NULL,
        ask TEXT NOT NULL,
        timestamp TEXT NOT NULL,
        create_date TEXT NOT NULL,
        recorded_at TEXT NOT NULL,
        created_at DATETIME DEFAULT CURRENT_TIMESTAMP
    )"#;

const INSERT_SQL: &str = r#"
    INSERT INTO quotes (code, codein, name, high, low, var_bid, pct_change, bid, ask, timestamp, create_date, recorded_at)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#;

const SELECT_BY_ID_SQL: &str = r#"
    SELECT id, code, codein, name, high, low, var_bid, pct_change, bid, ask, timestamp, create_date, recorded_at
    FROM quotes
    WHERE id = ?"#;

/// Durable quote storage.
#[async_trait]
pub trait QuoteStore: Send + Sync {
    /// Insert `quote` once and return the identifier assigned to it.
    async fn save(&self, deadline: &Deadline, quote: &Quote) -> Result<i64>;

    /// Load the quote stored under `id`.
    async fn find_by_id(&self, deadline: &Deadline, id: i64) -> Result<Quote>;
}

/// SQLite-backed [`QuoteStore`].
#[derive(Debug, Clone)]
pub struct SqliteQuoteStore {
    pool: SqlitePool,
    timeout: Duration,
}

impl SqliteQuoteStore {
    /// Open the pool, check the connection and make sure the schema exists.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let options = connect_options(&config.dsn)?;
        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections.max(1))
            .max_lifetime(Duration::from_secs(60 * 60))
            .idle_timeout(Duration::from_secs(10 * 60))
            .acquire_timeout(Duration::from_secs(5))
            .connect_with(options)
            .await
            .map_err(AppError::storage)?;

        let store = Self {
            pool,
            timeout: config.timeout,
        };
        if let Err(e) = store.migrate().await {
            store.pool.close().await;
            return Err(e);
        }
        info!(
            "Quote store ready at {} (max {} connections, {:?} per operation)",
            config.dsn, config.max_connections, config.timeout
        );
        Ok(store)
    }

    /// Close every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn migrate(&self) -> Result<()> {
        sqlx::query(CREATE_TABLE_SQL)
            .execute(&self.pool)
            .await
            .map_err(AppError::storage)?;
        Ok(())
    }

    async fn insert(&self, quote: &Quote) -> Result<i64> {
        let mut tx = self.pool.begin().await.map_err(AppError::storage)?;
        let done = sqlx::query(INSERT_SQL)
            .bind(&quote.code)
            .bind(&quote.counter_code)
            .bind(&quote.name)
            .bind(&quote.high)
            .bind(&quote.low)
            .bind(&quote.var_bid)
            .bind(&quote.pct_change)
            .bind(&quote.bid)
            .bind(&quote.ask)
            .bind(&quote.timestamp)
            .bind(&quote.create_date)
            .bind(quote.recorded_at)
            .execute(&mut *tx)
            .await
            .map_err(AppError::storage)?;
        tx.commit().await.map_err(AppError::storage)?;
        Ok(done.last_insert_rowid())
    }

    async fn select(&self, id: i64) -> Result<Quote> {
        let row = sqlx::query(SELECT_BY_ID_SQL)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::storage)?;
        match row {
            Some(row) => quote_from_row(&row).map_err(AppError::storage),
            None => Err(AppError::not_found("quote")),
        }
    }
}

#[async_trait]
impl QuoteStore for SqliteQuoteStore {
    async fn save(&self, deadline: &Deadline, quote: &Quote) -> Result<i64> {
        let deadline = deadline.bounded(self.timeout);
        let id = deadline.run(PERSIST_QUOTE, self.insert(quote)).await?;
        debug!("Persisted quote {} (bid {})", id, quote.bid);
        Ok(id)
    }

    async fn find_by_id(&self, deadline: &Deadline, id: i64) -> Result<Quote> {
        let deadline = deadline.bounded(self.timeout);
        deadline.run(FIND_QUOTE, self.select(id)).await
    }
}

/// Accept a plain file path as well as a `sqlite:` URL.
fn connect_options(dsn: &str) -> Result<SqliteConnectOptions> {
    let options = if dsn.starts_with("sqlite:") {
        SqliteConnectOptions::from_str(dsn).map_err(AppError::storage)?
    } else {
        SqliteConnectOptions::new().filename(dsn)
    };
    Ok(options.create_if_missing(true))
}

fn quote_from_row(row: &SqliteRow) -> std::result::Result<Quote, sqlx::Error> {
    Ok(Quote {
        id: Some(row.try_get("id")?),
        code: row.try_get("code")?,
        counter_code: row.try_get("codein")?,
        name: row.try_get("name")?,
        high: row.try_get("high")?,
        low: row.try_get("low")?,
        var_bid: row.try_get("var_bid")?,
        pct_change: row.try_get("pct_change")?,
        bid: row.try_get("bid")?,
        ask: row.try_get("ask")?,
        timestamp: row.try_get("timestamp")?,
        create_date: row.try_get("create_date")?,
        recorded_at: row.try_get("recorded_at")?,
    })
}
