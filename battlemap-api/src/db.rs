//! Database Connection Pool Module
//!
//! PostgreSQL connection pooling using deadpool-postgres and the
//! [`PgBattleStore`] implementation of [`BattleStore`] on top of it.
//!
//! `sources` and `media_urls` are structured in the domain types and stored
//! as `JSONB`; the conversion happens only here.

use async_trait::async_trait;
use battlemap_core::{
    Battle, BattleFilter, BattleId, MediaEntry, NewBattle, SourceLinks, StoreError, YearSpan,
};
use battlemap_storage::{BattleStore, StoreResult};
use deadpool_postgres::{
    Config, ManagerConfig, Pool, PoolConfig, RecyclingMethod, Runtime, Timeouts,
};
use postgres_types::{Json, ToSql};
use std::time::Duration;
use tokio_postgres::{NoTls, Row};

use crate::error::{ApiError, ApiResult};

// ============================================================================
// CONNECTION POOL CONFIGURATION
// ============================================================================

/// Database connection pool configuration.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// PostgreSQL host
    pub host: String,
    /// PostgreSQL port
    pub port: u16,
    /// Database name
    pub dbname: String,
    /// Database user
    pub user: String,
    /// Database password
    pub password: String,
    /// Maximum pool size
    pub max_size: usize,
    /// Connection timeout
    pub timeout: Duration,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            dbname: "battlemap".to_string(),
            user: "postgres".to_string(),
            password: "".to_string(),
            max_size: 16,
            timeout: Duration::from_secs(30),
        }
    }
}

impl DbConfig {
    /// Create a new database configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("BATTLEMAP_DB_HOST").unwrap_or_else(|_| "localhost".to_string()),
            port: std::env::var("BATTLEMAP_DB_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5432),
            dbname: std::env::var("BATTLEMAP_DB_NAME").unwrap_or_else(|_| "battlemap".to_string()),
            user: std::env::var("BATTLEMAP_DB_USER").unwrap_or_else(|_| "postgres".to_string()),
            password: std::env::var("BATTLEMAP_DB_PASSWORD").unwrap_or_default(),
            max_size: std::env::var("BATTLEMAP_DB_POOL_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(16),
            timeout: Duration::from_secs(
                std::env::var("BATTLEMAP_DB_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
        }
    }

    /// Create a connection pool from this configuration.
    pub fn create_pool(&self) -> ApiResult<Pool> {
        let mut cfg = Config::new();
        cfg.host = Some(self.host.clone());
        cfg.port = Some(self.port);
        cfg.dbname = Some(self.dbname.clone());
        cfg.user = Some(self.user.clone());
        cfg.password = Some(self.password.clone());

        cfg.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });

        let mut pool_cfg = PoolConfig::new(self.max_size);
        pool_cfg.timeouts = Timeouts {
            wait: Some(self.timeout),
            create: Some(self.timeout),
            recycle: Some(self.timeout),
        };
        cfg.pool = Some(pool_cfg);

        let pool = cfg
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(|e| ApiError::database_error(format!("Failed to create pool: {}", e)))?;

        Ok(pool)
    }
}

// ============================================================================
// SQL
// ============================================================================

const CREATE_TABLE: &str = "
CREATE TABLE IF NOT EXISTS battle (
    id BIGSERIAL PRIMARY KEY,
    name VARCHAR(200) NOT NULL,
    year INTEGER NOT NULL,
    latitude DOUBLE PRECISION NOT NULL,
    longitude DOUBLE PRECISION NOT NULL,
    description TEXT,
    participants VARCHAR(500),
    outcome VARCHAR(500),
    historical_context TEXT,
    sources JSONB,
    image_url VARCHAR(500),
    media_urls JSONB
)";

const CREATE_YEAR_INDEX: &str = "CREATE INDEX IF NOT EXISTS battle_year_idx ON battle (year)";

const COLUMNS: &str = "id, name, year, latitude, longitude, description, participants, \
     outcome, historical_context, sources, image_url, media_urls";

const INSERT: &str = "INSERT INTO battle (name, year, latitude, longitude, description, \
     participants, outcome, historical_context, sources, image_url, media_urls) \
     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)";

const UPDATE: &str = "UPDATE battle SET name = $2, year = $3, latitude = $4, longitude = $5, \
     description = $6, participants = $7, outcome = $8, historical_context = $9, \
     sources = $10, image_url = $11, media_urls = $12 WHERE id = $1";

const CENTURY_COUNTS: &str = "SELECT (FLOOR(year / 100.0) * 100)::BIGINT AS century, COUNT(*) \
     FROM battle GROUP BY century ORDER BY century";

/// Escape `LIKE` metacharacters so a prefix matches literally.
pub(crate) fn escape_like(prefix: &str) -> String {
    let mut escaped = String::with_capacity(prefix.len());
    for c in prefix.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

type Param = Box<dyn ToSql + Sync + Send>;

/// `WHERE` clause and its parameters for a filter, numbered from `$1`.
pub(crate) fn where_clause(filter: &BattleFilter) -> (String, Vec<Param>) {
    let mut conditions = Vec::new();
    let mut params: Vec<Param> = Vec::new();

    if let Some(start) = filter.start_year {
        params.push(Box::new(start));
        conditions.push(format!("year >= ${}", params.len()));
    }
    if let Some(end) = filter.end_year {
        params.push(Box::new(end));
        conditions.push(format!("year <= ${}", params.len()));
    }
    if let Some(prefix) = &filter.name_prefix {
        params.push(Box::new(format!("{}%", escape_like(prefix))));
        conditions.push(format!("name LIKE ${} ESCAPE '\\'", params.len()));
    }

    if conditions.is_empty() {
        (String::new(), params)
    } else {
        (format!(" WHERE {}", conditions.join(" AND ")), params)
    }
}

fn param_refs(params: &[Param]) -> Vec<&(dyn ToSql + Sync)> {
    params
        .iter()
        .map(|p| &**p as &(dyn ToSql + Sync))
        .collect()
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn to_u64(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

fn query_failed(err: tokio_postgres::Error) -> StoreError {
    tracing::error!("Database error: {:?}", err);
    StoreError::QueryFailed {
        reason: err.to_string(),
    }
}

fn decode_failed(err: tokio_postgres::Error) -> StoreError {
    StoreError::Decode {
        reason: err.to_string(),
    }
}

fn row_to_battle(row: &Row) -> StoreResult<Battle> {
    let sources: Option<Json<SourceLinks>> = row.try_get("sources").map_err(decode_failed)?;
    let media_urls: Option<Json<Vec<MediaEntry>>> =
        row.try_get("media_urls").map_err(decode_failed)?;

    Ok(Battle {
        id: row.try_get("id").map_err(decode_failed)?,
        name: row.try_get("name").map_err(decode_failed)?,
        year: row.try_get("year").map_err(decode_failed)?,
        latitude: row.try_get("latitude").map_err(decode_failed)?,
        longitude: row.try_get("longitude").map_err(decode_failed)?,
        description: row.try_get("description").map_err(decode_failed)?,
        participants: row.try_get("participants").map_err(decode_failed)?,
        outcome: row.try_get("outcome").map_err(decode_failed)?,
        historical_context: row.try_get("historical_context").map_err(decode_failed)?,
        sources: sources.map(|Json(links)| links),
        image_url: row.try_get("image_url").map_err(decode_failed)?,
        media_urls: media_urls.map(|Json(media)| media),
    })
}

// ============================================================================
// POSTGRES STORE
// ============================================================================

/// [`BattleStore`] over a deadpool-postgres pool.
///
/// `insert_batch` and `update` each run in their own transaction.
#[derive(Clone)]
pub struct PgBattleStore {
    pool: Pool,
}

impl std::fmt::Debug for PgBattleStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = self.pool.status();
        f.debug_struct("PgBattleStore")
            .field("pool_size", &status.size)
            .field("pool_available", &status.available)
            .finish()
    }
}

impl PgBattleStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    pub fn from_config(config: &DbConfig) -> ApiResult<Self> {
        let pool = config.create_pool()?;
        Ok(Self::new(pool))
    }

    /// Get the current pool size for observability.
    pub fn pool_size(&self) -> usize {
        self.pool.status().size
    }

    async fn get_conn(&self) -> StoreResult<deadpool_postgres::Object> {
        self.pool.get().await.map_err(|e| {
            tracing::error!("Connection pool error: {:?}", e);
            StoreError::Connection {
                reason: e.to_string(),
            }
        })
    }

    /// Create the battle table and its year index if missing.
    pub async fn ensure_schema(&self) -> StoreResult<()> {
        let conn = self.get_conn().await?;
        conn.batch_execute(&format!("{};\n{};", CREATE_TABLE, CREATE_YEAR_INDEX))
            .await
            .map_err(query_failed)?;
        tracing::info!("Battle table ready");
        Ok(())
    }

    /// Health check - verifies database connectivity.
    pub async fn health_check(&self) -> ApiResult<()> {
        let conn = self.pool.get().await?;
        conn.query_one("SELECT 1", &[]).await?;
        Ok(())
    }
}

#[async_trait]
impl BattleStore for PgBattleStore {
    async fn insert_batch(&self, battles: &[NewBattle]) -> StoreResult<u64> {
        let mut conn = self.get_conn().await?;
        let batch_failed = |e: tokio_postgres::Error| StoreError::BatchFailed {
            size: battles.len(),
            reason: e.to_string(),
        };

        let tx = conn.transaction().await.map_err(batch_failed)?;
        let statement = tx.prepare(INSERT).await.map_err(batch_failed)?;

        let mut inserted = 0;
        for battle in battles {
            let sources = battle.sources.as_ref().map(Json);
            let media_urls = battle.media_urls.as_ref().map(Json);
            inserted += tx
                .execute(
                    &statement,
                    &[
                        &battle.name,
                        &battle.year,
                        &battle.latitude,
                        &battle.longitude,
                        &battle.description,
                        &battle.participants,
                        &battle.outcome,
                        &battle.historical_context,
                        &sources,
                        &battle.image_url,
                        &media_urls,
                    ],
                )
                .await
                .map_err(batch_failed)?;
        }

        // Dropping the transaction on an early return rolls the batch back.
        tx.commit().await.map_err(batch_failed)?;
        Ok(inserted)
    }

    async fn query(&self, filter: &BattleFilter) -> StoreResult<Vec<Battle>> {
        let conn = self.get_conn().await?;
        let (where_sql, mut params) = where_clause(filter);

        let mut sql = format!("SELECT {} FROM battle{} ORDER BY id", COLUMNS, where_sql);
        if let Some(limit) = filter.limit {
            params.push(Box::new(to_i64(limit)));
            sql.push_str(&format!(" LIMIT ${}", params.len()));
        }
        if filter.offset > 0 {
            params.push(Box::new(to_i64(filter.offset)));
            sql.push_str(&format!(" OFFSET ${}", params.len()));
        }

        let rows = conn
            .query(sql.as_str(), &param_refs(&params))
            .await
            .map_err(query_failed)?;
        rows.iter().map(row_to_battle).collect()
    }

    async fn count(&self, filter: &BattleFilter) -> StoreResult<u64> {
        let conn = self.get_conn().await?;
        let (where_sql, params) = where_clause(filter);
        let sql = format!("SELECT COUNT(*) FROM battle{}", where_sql);

        let row = conn
            .query_one(sql.as_str(), &param_refs(&params))
            .await
            .map_err(query_failed)?;
        let count: i64 = row.try_get(0).map_err(decode_failed)?;
        Ok(to_u64(count))
    }

    async fn get(&self, id: BattleId) -> StoreResult<Option<Battle>> {
        let conn = self.get_conn().await?;
        let sql = format!("SELECT {} FROM battle WHERE id = $1", COLUMNS);
        let row = conn.query_opt(sql.as_str(), &[&id]).await.map_err(query_failed)?;
        row.as_ref().map(row_to_battle).transpose()
    }

    async fn update(&self, battle: &Battle) -> StoreResult<()> {
        let mut conn = self.get_conn().await?;
        let failed = |e: tokio_postgres::Error| StoreError::TransactionFailed {
            reason: e.to_string(),
        };

        let tx = conn.transaction().await.map_err(failed)?;
        let sources = battle.sources.as_ref().map(Json);
        let media_urls = battle.media_urls.as_ref().map(Json);
        let updated = tx
            .execute(
                UPDATE,
                &[
                    &battle.id,
                    &battle.name,
                    &battle.year,
                    &battle.latitude,
                    &battle.longitude,
                    &battle.description,
                    &battle.participants,
                    &battle.outcome,
                    &battle.historical_context,
                    &sources,
                    &battle.image_url,
                    &media_urls,
                ],
            )
            .await
            .map_err(failed)?;

        if updated == 0 {
            return Err(StoreError::NotFound { id: battle.id });
        }
        tx.commit().await.map_err(failed)
    }

    async fn delete_all(&self) -> StoreResult<u64> {
        let conn = self.get_conn().await?;
        conn.execute("DELETE FROM battle", &[])
            .await
            .map_err(query_failed)
    }

    async fn year_span(&self) -> StoreResult<Option<YearSpan>> {
        let conn = self.get_conn().await?;
        let row = conn
            .query_one("SELECT MIN(year), MAX(year) FROM battle", &[])
            .await
            .map_err(query_failed)?;
        let earliest: Option<i32> = row.try_get(0).map_err(decode_failed)?;
        let latest: Option<i32> = row.try_get(1).map_err(decode_failed)?;
        Ok(earliest
            .zip(latest)
            .map(|(earliest, latest)| YearSpan { earliest, latest }))
    }

    async fn century_counts(&self) -> StoreResult<Vec<(i64, u64)>> {
        let conn = self.get_conn().await?;
        let rows = conn.query(CENTURY_COUNTS, &[]).await.map_err(query_failed)?;
        rows.iter()
            .map(|row| {
                let century: i64 = row.try_get(0).map_err(decode_failed)?;
                let count: i64 = row.try_get(1).map_err(decode_failed)?;
                Ok((century, to_u64(count)))
            })
            .collect()
    }
}
