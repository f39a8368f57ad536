use async_trait::async_trait;
use detour_core::{
    FromPath, ReadStore, RedirectKey, RedirectRecord, RedirectStore, Result, SiteScope,
    StorageError, WriteMode,
};
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};
use tracing::{debug, trace};

/// Schema for the `redirects` table.
pub const SCHEMA: &str = include_str!("../ddl/mysql/redirects.sql");

/// MySQL implementation of the redirect store.
///
/// The global scope and an absent query are stored as `NULL`. Uniqueness is
/// enforced by the table over `(site_scope, from_base, from_query)` with
/// `NULL`s compared as equal; see [`SCHEMA`].
#[derive(Debug, Clone)]
pub struct MySqlRedirectStore {
    pool: MySqlPool,
}

impl MySqlRedirectStore {
    /// Creates a store from an existing MySQL connection pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Creates a store by opening a new MySQL connection pool.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = MySqlPool::connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Creates the `redirects` table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

fn site_key(site: SiteScope) -> u64 {
    site.as_raw().unwrap_or(0)
}

fn query_key(from: &FromPath) -> &str {
    from.query().unwrap_or("")
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

fn record_from_row(row: &MySqlRow) -> Result<RedirectRecord> {
    let site: Option<u64> = row.try_get("site_scope").map_err(map_sqlx_error)?;
    let base: String = row.try_get("from_base").map_err(map_sqlx_error)?;
    let query: Option<String> = row.try_get("from_query").map_err(map_sqlx_error)?;
    let to: String = row.try_get("to_path").map_err(map_sqlx_error)?;
    let locale: Option<String> = row.try_get("locale").map_err(map_sqlx_error)?;

    let invalid = |e: detour_core::PathError| {
        StorageError::InvalidData(format!("stored redirect '{}' is invalid: {e}", base))
    };
    let from = FromPath::from_parts(&base, query.as_deref()).map_err(invalid)?;
    let record = RedirectRecord::with_from(from, &to)
        .map_err(invalid)?
        .with_site(SiteScope::from(site));

    Ok(match locale {
        Some(locale) => record.with_locale(locale),
        None => record,
    })
}

#[async_trait]
impl ReadStore for MySqlRedirectStore {
    async fn find_exact(&self, site: SiteScope, from: &FromPath) -> Result<Option<RedirectRecord>> {
        let row = sqlx::query(
            r#"
            SELECT site_scope, from_base, from_query, to_path, locale
            FROM redirects
            WHERE site_key = ?
              AND from_base = ?
              AND query_key = ?
            LIMIT 1
            "#,
        )
        .bind(site_key(site))
        .bind(from.base())
        .bind(query_key(from))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let Some(row) = row else {
            trace!(from = %from, site = %site, "no redirect stored");
            return Ok(None);
        };

        record_from_row(&row).map(Some)
    }

    async fn list(&self) -> Result<Vec<RedirectRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT site_scope, from_base, from_query, to_path, locale
            FROM redirects
            ORDER BY site_key, from_base, query_key
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.iter().map(record_from_row).collect()
    }
}

#[async_trait]
impl RedirectStore for MySqlRedirectStore {
    async fn put(&self, record: RedirectRecord, mode: WriteMode) -> Result<()> {
        let key = record.key();
        let sql = match mode {
            WriteMode::Create => {
                r#"
                INSERT INTO redirects (site_scope, from_base, from_query, to_path, locale)
                VALUES (?, ?, ?, ?, ?)
                "#
            }
            WriteMode::Overwrite => {
                r#"
                INSERT INTO redirects (site_scope, from_base, from_query, to_path, locale)
                VALUES (?, ?, ?, ?, ?) AS incoming
                ON DUPLICATE KEY UPDATE
                    to_path = incoming.to_path,
                    locale = incoming.locale
                "#
            }
        };

        let result = sqlx::query(sql)
            .bind(record.site().as_raw())
            .bind(record.from_path().base())
            .bind(record.from_path().query())
            .bind(record.to())
            .bind(record.locale())
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => {
                debug!(key = %key, to = %record.to(), ?mode, "stored redirect");
                Ok(())
            }
            Err(err) if is_unique_violation(&err) => Err(StorageError::DuplicateKey(key.to_string())),
            Err(err) => Err(map_sqlx_error(err)),
        }
    }

    async fn remove(&self, site: SiteScope, from: &FromPath) -> Result<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM redirects
            WHERE site_key = ?
              AND from_base = ?
              AND query_key = ?
            "#,
        )
        .bind(site_key(site))
        .bind(from.base())
        .bind(query_key(from))
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let key = RedirectKey::new(site, from.clone());
        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(key.to_string()));
        }

        debug!(key = %key, "removed redirect");
        Ok(())
    }
}
