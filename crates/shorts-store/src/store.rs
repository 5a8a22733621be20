//! Store handle and schema management.

use std::path::Path;
use std::str::FromStr;

use aes_gcm::aead::OsRng;
use aes_gcm::{Aes256Gcm, KeyInit};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

use crate::crypto::SecretCipher;
use crate::error::StoreResult;

/// Statements run on every startup; all idempotent.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS credentials (
        service     TEXT PRIMARY KEY,
        secret      TEXT NOT NULL,
        updated_at  TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS videos (
        id              TEXT PRIMARY KEY,
        title           TEXT NOT NULL,
        description     TEXT NOT NULL DEFAULT '',
        script          TEXT NOT NULL,
        video_path      TEXT,
        thumbnail_path  TEXT,
        youtube_id      TEXT,
        youtube_url     TEXT,
        status          TEXT NOT NULL DEFAULT 'pending',
        tags            TEXT NOT NULL DEFAULT '[]',
        duration_secs   INTEGER,
        created_at      TEXT NOT NULL,
        completed_at    TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS jobs (
        id             TEXT PRIMARY KEY,
        video_id       TEXT NOT NULL REFERENCES videos(id),
        status         TEXT NOT NULL DEFAULT 'pending',
        progress       INTEGER NOT NULL DEFAULT 0,
        current_step   TEXT,
        error_message  TEXT,
        created_at     TEXT NOT NULL,
        started_at     TEXT,
        completed_at   TEXT
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_jobs_status_created ON jobs (status, created_at)",
    "CREATE INDEX IF NOT EXISTS idx_videos_status_created ON videos (status, created_at)",
    r#"
    CREATE TABLE IF NOT EXISTS schedules (
        id             TEXT PRIMARY KEY,
        name           TEXT NOT NULL,
        frequency      TEXT NOT NULL,
        time           TEXT,
        days           TEXT NOT NULL DEFAULT '[]',
        script_source  TEXT,
        auto_upload    INTEGER NOT NULL DEFAULT 0,
        active         INTEGER NOT NULL DEFAULT 1,
        last_run       TEXT,
        next_run       TEXT,
        created_at     TEXT NOT NULL
    )
    "#,
];

/// Handle over the SQLite database and the credential cipher.
///
/// Cloning is cheap; all clones share the same pool.
#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
    cipher: SecretCipher,
}

impl Store {
    /// Open (or create) the database at `db_path`, loading the credential
    /// encryption key from `key_path` (generated on first use).
    pub async fn connect(
        db_path: impl AsRef<Path>,
        key_path: impl AsRef<Path>,
    ) -> StoreResult<Self> {
        let db_path = db_path.as_ref();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let cipher = SecretCipher::load_or_generate(key_path)?;

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let store = Self { pool, cipher };
        store.init_schema().await?;

        info!("Store ready at {}", db_path.display());
        Ok(store)
    }

    /// Open an in-memory database with a throwaway encryption key.
    ///
    /// Intended for tests; the single-connection pool keeps every query on
    /// the same in-memory database.
    pub async fn in_memory() -> StoreResult<Self> {
        let key = Aes256Gcm::generate_key(&mut OsRng);
        let cipher = SecretCipher::from_key(key.as_slice())?;

        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        let store = Self { pool, cipher };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> StoreResult<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Check database connectivity (used by the health endpoint).
    pub async fn health_check(&self) -> StoreResult<()> {
        sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }

    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub(crate) fn cipher(&self) -> &SecretCipher {
        &self.cipher
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn in_memory_store_passes_health_check() {
        let store = Store::in_memory().await.unwrap();
        store.health_check().await.unwrap();
    }

    #[tokio::test]
    async fn connect_creates_database_and_key_file() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("data/shorts.db");
        let key_path = dir.path().join("data/.secret_key");

        let store = Store::connect(&db_path, &key_path).await.unwrap();
        store.health_check().await.unwrap();

        assert!(db_path.exists());
        assert!(key_path.exists());
    }
}
