//! SQLite Voice Repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::path::PathBuf;

use super::DbPool;
use crate::application::ports::{RepositoryError, VoiceRecord, VoiceRepositoryPort};

/// SQLite Voice Repository
pub struct SqliteVoiceRepository {
    pool: DbPool,
}

impl SqliteVoiceRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct VoiceRow {
    id: String,
    audio_path: String,
    duration_seconds: f64,
    created_at: String,
}

impl TryFrom<VoiceRow> for VoiceRecord {
    type Error = RepositoryError;

    fn try_from(row: VoiceRow) -> Result<Self, Self::Error> {
        Ok(VoiceRecord {
            id: row.id,
            audio_path: PathBuf::from(row.audio_path),
            duration_seconds: row.duration_seconds,
            created_at: DateTime::parse_from_rfc3339(&row.created_at)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?
                .with_timezone(&Utc),
        })
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

#[async_trait]
impl VoiceRepositoryPort for SqliteVoiceRepository {
    async fn insert(&self, voice: &VoiceRecord) -> Result<(), RepositoryError> {
        // 注意: 不做 upsert，重复 ID 必须拒绝而不是覆盖
        sqlx::query(
            r#"
            INSERT INTO voices (id, audio_path, duration_seconds, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&voice.id)
        .bind(voice.audio_path.to_string_lossy().to_string())
        .bind(voice.duration_seconds)
        .bind(voice.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                RepositoryError::Duplicate(voice.id.clone())
            } else {
                RepositoryError::DatabaseError(e.to_string())
            }
        })?;

        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<VoiceRecord>, RepositoryError> {
        let row: Option<VoiceRow> = sqlx::query_as(
            "SELECT id, audio_path, duration_seconds, created_at FROM voices WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        row.map(VoiceRecord::try_from).transpose()
    }

    async fn find_all(&self) -> Result<Vec<VoiceRecord>, RepositoryError> {
        let rows: Vec<VoiceRow> = sqlx::query_as(
            "SELECT id, audio_path, duration_seconds, created_at FROM voices ORDER BY created_at ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(VoiceRecord::try_from).collect()
    }

    async fn delete(&self, id: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM voices WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(id.to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::sqlite::{create_pool, run_migrations, DatabaseConfig};
    use chrono::Duration;

    async fn test_repo() -> SqliteVoiceRepository {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteVoiceRepository::new(pool)
    }

    fn record(id: &str, created_at: DateTime<Utc>) -> VoiceRecord {
        VoiceRecord {
            id: id.to_string(),
            audio_path: PathBuf::from(format!("data/voices/{}.wav", id)),
            duration_seconds: 12.5,
            created_at,
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let repo = test_repo().await;
        repo.insert(&record("v1", Utc::now())).await.unwrap();

        let found = repo.find_by_id("v1").await.unwrap().unwrap();
        assert_eq!(found.id, "v1");
        assert!((found.duration_seconds - 12.5).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_duplicate_insert_rejected_without_overwrite() {
        let repo = test_repo().await;
        repo.insert(&record("v1", Utc::now())).await.unwrap();

        let mut dup = record("v1", Utc::now());
        dup.duration_seconds = 99.0;
        let err = repo.insert(&dup).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Duplicate(_)));

        let kept = repo.find_by_id("v1").await.unwrap().unwrap();
        assert!((kept.duration_seconds - 12.5).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_find_all_ordered_by_creation() {
        let repo = test_repo().await;
        let base = Utc::now();
        repo.insert(&record("later", base + Duration::seconds(10)))
            .await
            .unwrap();
        repo.insert(&record("earlier", base)).await.unwrap();

        let all = repo.find_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, "earlier");
        assert_eq!(all[1].id, "later");
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let repo = test_repo().await;
        let err = repo.delete("missing").await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound(_)));
    }
}
