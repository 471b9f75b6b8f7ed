//! Riddle persistence: the store seam used by handlers and its PostgreSQL implementation.

use crate::config::DatabaseConfig;
use crate::error::AppError;
use crate::model::{NewRiddle, Riddle};
use crate::service::RiddlePatch;
use crate::sql::{self, QueryBuf};
use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::PgPool;
use std::str::FromStr;
use std::time::Duration;

/// Single-table CRUD. Implementations own no business rules.
#[async_trait]
pub trait RiddleStore: Send + Sync {
    /// Published rows ordered by id.
    async fn list_published(&self) -> Result<Vec<Riddle>, AppError>;

    /// Any row by id, published or not.
    async fn fetch_by_id(&self, id: i32) -> Result<Option<Riddle>, AppError>;

    /// One published row at random. An empty set is an error, not `None`.
    async fn fetch_random_published(&self) -> Result<Riddle, AppError>;

    /// Insert and return the assigned id.
    async fn insert(&self, riddle: &NewRiddle) -> Result<i32, AppError>;

    /// Apply a non-empty patch. Returns rows affected.
    async fn update(&self, id: i32, patch: &RiddlePatch) -> Result<u64, AppError>;

    /// Delete by id. Returns rows affected.
    async fn delete(&self, id: i32) -> Result<u64, AppError>;

    /// Round-trip check used by the readiness probe.
    async fn ping(&self) -> Result<(), AppError>;
}

/// Build a pool from structured settings, or from `url` when given.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, AppError> {
    let options = connect_options(config)?;
    let host = options.get_host().to_string();
    let dbname = options.get_database().unwrap_or_default().to_string();
    let pool = PgPoolOptions::new()
        .max_connections(config.max_open_conns)
        .min_connections(config.max_idle_conns.min(config.max_open_conns))
        .max_lifetime(Duration::from_secs(config.max_conn_lifetime_secs))
        .connect_with(options)
        .await?;
    tracing::info!(host = %host, dbname = %dbname, "connected to database");
    Ok(pool)
}

/// `DATABASE_URL` wins over the structured fields.
fn connect_options(config: &DatabaseConfig) -> Result<PgConnectOptions, AppError> {
    Ok(match &config.url {
        Some(url) => PgConnectOptions::from_str(url)?,
        None => PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.dbname)
            .ssl_mode(PgSslMode::from_str(&config.sslmode)?),
    })
}

#[derive(Clone)]
pub struct PgRiddleStore {
    pool: PgPool,
}

impl PgRiddleStore {
    pub fn new(pool: PgPool) -> Self {
        PgRiddleStore { pool }
    }

    async fn fetch_optional(&self, q: &QueryBuf) -> Result<Option<Riddle>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query_as::<_, Riddle>(&q.sql);
        for p in &q.params {
            query = query.bind(p.clone());
        }
        Ok(query.fetch_optional(&self.pool).await?)
    }

    async fn execute(&self, q: &QueryBuf) -> Result<u64, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "exec");
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = query.bind(p.clone());
        }
        let result = query.execute(&self.pool).await.map_err(|e| {
            tracing::error!(sql = %q.sql, params = ?q.params, error = %e, "statement failed");
            e
        })?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl RiddleStore for PgRiddleStore {
    async fn list_published(&self) -> Result<Vec<Riddle>, AppError> {
        let q = sql::select_published();
        tracing::debug!(sql = %q.sql, "query");
        Ok(sqlx::query_as::<_, Riddle>(&q.sql).fetch_all(&self.pool).await?)
    }

    async fn fetch_by_id(&self, id: i32) -> Result<Option<Riddle>, AppError> {
        self.fetch_optional(&sql::select_by_id(id)).await
    }

    async fn fetch_random_published(&self) -> Result<Riddle, AppError> {
        let q = sql::select_random_published();
        tracing::debug!(sql = %q.sql, "query");
        Ok(sqlx::query_as::<_, Riddle>(&q.sql).fetch_one(&self.pool).await?)
    }

    async fn insert(&self, riddle: &NewRiddle) -> Result<i32, AppError> {
        let q = sql::insert([
            riddle.riddle.clone().into(),
            riddle.solution.clone().into(),
            riddle.synonyms.clone().into(),
            riddle.username.clone().into(),
            riddle.user_email.clone().into(),
        ]);
        tracing::debug!(sql = %q.sql, "insert");
        let mut query = sqlx::query_scalar::<_, i32>(&q.sql);
        for p in &q.params {
            query = query.bind(p.clone());
        }
        Ok(query.fetch_one(&self.pool).await?)
    }

    async fn update(&self, id: i32, patch: &RiddlePatch) -> Result<u64, AppError> {
        let q = patch.to_update(id)?;
        self.execute(&q).await
    }

    async fn delete(&self, id: i32) -> Result<u64, AppError> {
        self.execute(&sql::delete(id)).await
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}
