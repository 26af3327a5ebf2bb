//! Wa repository: records wa replies and answers "best waer" / "best waable" queries.

use chrono::{DateTime, Utc};
use sqlx::Row;
use tracing::{debug, info, instrument};

use crate::error::StorageError;
use crate::models::WaEntry;
use crate::sqlite_pool::SqlitePoolManager;

/// SQLite-backed store of wa entries (`was` table).
#[derive(Clone)]
pub struct WaRepository {
    pool_manager: SqlitePoolManager,
}

impl WaRepository {
    /// Opens (or creates) the database and ensures the `was` table exists.
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let pool_manager = SqlitePoolManager::new(database_url).await?;
        let repo = Self { pool_manager };
        repo.init().await?;
        Ok(repo)
    }

    async fn init(&self) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS was (
                id INTEGER PRIMARY KEY,
                wa_to INTEGER,
                waer INTEGER,
                waer_name TEXT NOT NULL,
                time INTEGER
            )
            "#,
        )
        .execute(self.pool_manager.pool())
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_was_wa_to ON was(wa_to)")
            .execute(self.pool_manager.pool())
            .await?;

        info!("Wa repository initialized");
        Ok(())
    }

    /// Stores `wa` and returns how many wa-s its target message now has.
    #[instrument(skip(self, wa), fields(wa_id = wa.id, wa_to = wa.wa_to))]
    pub async fn add_wa(&self, wa: WaEntry) -> Result<u32, StorageError> {
        // Writing first takes the write lock up front, so concurrent adds queue instead of
        // failing a read-to-write upgrade.
        let mut tx = self.pool_manager.pool().begin().await?;

        sqlx::query("INSERT INTO was (id, wa_to, waer, waer_name, time) VALUES (?, ?, ?, ?, ?)")
            .bind(wa.id)
            .bind(wa.wa_to)
            .bind(wa.waer)
            .bind(&wa.waer_name)
            .bind(wa.time.timestamp())
            .execute(&mut *tx)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    StorageError::AlreadyExists(format!("wa {}", wa.id))
                }
                _ => StorageError::from(e),
            })?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM was WHERE wa_to = ?")
            .bind(wa.wa_to)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        let count = count_to_u32(total);
        debug!(count, "Wa recorded");
        Ok(count)
    }

    /// The user with the most wa-s sent after `since`: `(display name, count)`.
    pub async fn best_waer(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Option<(String, u32)>, StorageError> {
        let row = sqlx::query(
            r#"
            SELECT waer_name, COUNT(*) AS count FROM was
            WHERE time > ?
            GROUP BY waer
            ORDER BY count DESC
            LIMIT 1
            "#,
        )
        .bind(since.timestamp())
        .fetch_optional(self.pool_manager.pool())
        .await?;

        row.map(|row| {
            let name: String = row.try_get("waer_name")?;
            let count: i64 = row.try_get("count")?;
            Ok::<_, StorageError>((name, count_to_u32(count)))
        })
        .transpose()
    }

    /// The message with the most wa-s sent after `since`: `(message id, count)`.
    pub async fn best_waable(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Option<(i64, u32)>, StorageError> {
        let row = sqlx::query(
            r#"
            SELECT wa_to, COUNT(*) AS count FROM was
            WHERE time > ?
            GROUP BY wa_to
            ORDER BY count DESC
            LIMIT 1
            "#,
        )
        .bind(since.timestamp())
        .fetch_optional(self.pool_manager.pool())
        .await?;

        row.map(|row| {
            let wa_to: i64 = row.try_get("wa_to")?;
            let count: i64 = row.try_get("count")?;
            Ok::<_, StorageError>((wa_to, count_to_u32(count)))
        })
        .transpose()
    }

    /// Number of wa-s recorded for `wa_to`.
    pub async fn count_for(&self, wa_to: i64) -> Result<u32, StorageError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM was WHERE wa_to = ?")
            .bind(wa_to)
            .fetch_one(self.pool_manager.pool())
            .await?;
        Ok(count_to_u32(count))
    }
}

fn count_to_u32(count: i64) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}
