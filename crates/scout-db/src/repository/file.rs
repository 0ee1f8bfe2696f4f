//! # File Record Repository
//!
//! Lookups against stored-file metadata. The image normalizer consults
//! this when a product's raw image reference looks like a file-record id
//! rather than a path.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use scout_core::{CatalogResult, FileRecord, FileStore};

/// Row mapping for the `file_records` table.
#[derive(Debug, FromRow)]
struct FileRow {
    id: String,
    file_name: String,
    file_url: Option<String>,
    is_private: bool,
}

impl From<FileRow> for FileRecord {
    fn from(row: FileRow) -> Self {
        FileRecord {
            id: row.id,
            file_name: row.file_name,
            file_url: row.file_url,
            is_private: row.is_private,
        }
    }
}

/// Repository for stored-file metadata.
///
/// Implements [`scout_core::FileStore`].
#[derive(Debug, Clone)]
pub struct FileRepository {
    pool: SqlitePool,
}

impl FileRepository {
    /// Creates a new FileRepository.
    pub fn new(pool: SqlitePool) -> Self {
        FileRepository { pool }
    }

    /// Looks up a file record by id.
    pub async fn fetch(&self, id: &str) -> DbResult<Option<FileRecord>> {
        let row: Option<FileRow> = sqlx::query_as(
            "SELECT id, file_name, file_url, is_private FROM file_records WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(FileRecord::from))
    }

    /// Most recently created records, for the image diagnosis endpoint.
    pub async fn recent(&self, limit: u32) -> DbResult<Vec<FileRecord>> {
        let rows: Vec<FileRow> = sqlx::query_as(
            "SELECT id, file_name, file_url, is_private FROM file_records \
             ORDER BY created_at DESC LIMIT ?1",
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(FileRecord::from).collect())
    }

    /// Inserts a file record.
    pub async fn insert(&self, record: &FileRecord, created_at: DateTime<Utc>) -> DbResult<()> {
        debug!(id = %record.id, "Inserting file record");

        sqlx::query(
            "INSERT INTO file_records (id, file_name, file_url, is_private, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&record.id)
        .bind(&record.file_name)
        .bind(&record.file_url)
        .bind(record.is_private)
        .bind(created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// =============================================================================
// FileStore Trait Implementation
// =============================================================================

#[async_trait]
impl FileStore for FileRepository {
    async fn get_record(&self, id: &str) -> CatalogResult<Option<FileRecord>> {
        Ok(self.fetch(id).await?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::Duration;

    fn record(id: &str, url: Option<&str>) -> FileRecord {
        FileRecord {
            id: id.into(),
            file_name: format!("{id}.png"),
            file_url: url.map(String::from),
            is_private: false,
        }
    }

    #[tokio::test]
    async fn test_fetch_roundtrip_and_miss() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.files();

        repo.insert(&record("rec_9f2c", Some("/files/real.png")), Utc::now())
            .await
            .unwrap();

        let found = repo.fetch("rec_9f2c").await.unwrap().unwrap();
        assert_eq!(found.file_url.as_deref(), Some("/files/real.png"));

        assert!(repo.fetch("rec_missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_recent_orders_newest_first() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.files();

        let now = Utc::now();
        repo.insert(&record("rec_old", None), now - Duration::hours(2))
            .await
            .unwrap();
        repo.insert(&record("rec_new", None), now).await.unwrap();

        let recent = repo.recent(10).await.unwrap();
        assert_eq!(recent[0].id, "rec_new");
        assert_eq!(recent[1].id, "rec_old");
    }
}
