//! SQLite Task Repository
//!
//! 状态转移以条件 UPDATE 实现，WHERE 子句携带前置状态，
//! 保证单写者语义下的转移合法性；终态与产物引用在同一条
//! UPDATE 中写入，任务不可能被观察到 completed 而产物引用缺失

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use super::DbPool;
use crate::application::ports::{RepositoryError, TaskRecord, TaskRepositoryPort};
use crate::domain::task::TaskStatus;

/// SQLite Task Repository
pub struct SqliteTaskRepository {
    pool: DbPool,
}

impl SqliteTaskRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// rows_affected == 0 时区分 NotFound 与非法转移
    async fn transition_conflict(
        &self,
        task_id: &str,
        to: TaskStatus,
    ) -> RepositoryError {
        match self.find_by_id(task_id).await {
            Ok(Some(task)) => RepositoryError::InvalidTransition {
                id: task_id.to_string(),
                from: task.status.as_str().to_string(),
                to: to.as_str().to_string(),
            },
            Ok(None) => RepositoryError::NotFound(task_id.to_string()),
            Err(e) => e,
        }
    }
}

#[derive(FromRow)]
struct TaskRow {
    task_id: String,
    text: String,
    voice_id: String,
    status: String,
    output_audio: Option<String>,
    error: Option<String>,
    created_at: String,
    updated_at: String,
}

impl TryFrom<TaskRow> for TaskRecord {
    type Error = RepositoryError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        let parse_ts = |s: &str| -> Result<DateTime<Utc>, RepositoryError> {
            DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))
        };

        Ok(TaskRecord {
            status: TaskStatus::from_str(&row.status).ok_or_else(|| {
                RepositoryError::SerializationError(format!("unknown task status: {}", row.status))
            })?,
            task_id: row.task_id,
            text: row.text,
            voice_id: row.voice_id,
            output_audio: row.output_audio,
            error: row.error,
            created_at: parse_ts(&row.created_at)?,
            updated_at: parse_ts(&row.updated_at)?,
        })
    }
}

const SELECT_COLUMNS: &str =
    "task_id, text, voice_id, status, output_audio, error, created_at, updated_at";

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

#[async_trait]
impl TaskRepositoryPort for SqliteTaskRepository {
    async fn insert(&self, task: &TaskRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO text_tasks
                (task_id, text, voice_id, status, output_audio, error, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&task.task_id)
        .bind(&task.text)
        .bind(&task.voice_id)
        .bind(task.status.as_str())
        .bind(&task.output_audio)
        .bind(&task.error)
        .bind(task.created_at.to_rfc3339())
        .bind(task.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                RepositoryError::Duplicate(task.task_id.clone())
            } else {
                RepositoryError::DatabaseError(e.to_string())
            }
        })?;

        Ok(())
    }

    async fn find_by_id(&self, task_id: &str) -> Result<Option<TaskRecord>, RepositoryError> {
        let row: Option<TaskRow> = sqlx::query_as(&format!(
            "SELECT {} FROM text_tasks WHERE task_id = ?",
            SELECT_COLUMNS
        ))
        .bind(task_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        row.map(TaskRecord::try_from).transpose()
    }

    async fn find_all(
        &self,
        status: Option<TaskStatus>,
    ) -> Result<Vec<TaskRecord>, RepositoryError> {
        let rows: Vec<TaskRow> = match status {
            Some(status) => {
                sqlx::query_as(&format!(
                    "SELECT {} FROM text_tasks WHERE status = ? ORDER BY created_at ASC, task_id ASC",
                    SELECT_COLUMNS
                ))
                .bind(status.as_str())
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as(&format!(
                    "SELECT {} FROM text_tasks ORDER BY created_at ASC, task_id ASC",
                    SELECT_COLUMNS
                ))
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(TaskRecord::try_from).collect()
    }

    async fn mark_processing(&self, task_id: &str) -> Result<(), RepositoryError> {
        // pending/failed → processing，重试时清空上一次错误
        let result = sqlx::query(
            r#"
            UPDATE text_tasks
            SET status = 'processing', error = NULL, updated_at = ?
            WHERE task_id = ? AND status IN ('pending', 'failed')
            "#,
        )
        .bind(Utc::now().to_rfc3339())
        .bind(task_id)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(self.transition_conflict(task_id, TaskStatus::Processing).await);
        }
        Ok(())
    }

    async fn mark_completed(
        &self,
        task_id: &str,
        output_audio: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE text_tasks
            SET status = 'completed', output_audio = ?, error = NULL, updated_at = ?
            WHERE task_id = ? AND status = 'processing'
            "#,
        )
        .bind(output_audio)
        .bind(Utc::now().to_rfc3339())
        .bind(task_id)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(self.transition_conflict(task_id, TaskStatus::Completed).await);
        }
        Ok(())
    }

    async fn mark_failed(&self, task_id: &str, error: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE text_tasks
            SET status = 'failed', output_audio = NULL, error = ?, updated_at = ?
            WHERE task_id = ? AND status = 'processing'
            "#,
        )
        .bind(error)
        .bind(Utc::now().to_rfc3339())
        .bind(task_id)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(self.transition_conflict(task_id, TaskStatus::Failed).await);
        }
        Ok(())
    }

    async fn delete(&self, task_id: &str) -> Result<(), RepositoryError> {
        // 状态条件与删除在同一条语句中，合成引擎赢得 mark_processing
        // 之后该行不可能再被删掉
        let result = sqlx::query(
            "DELETE FROM text_tasks WHERE task_id = ? AND status <> 'processing'",
        )
        .bind(task_id)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return match self.find_by_id(task_id).await? {
                Some(task) if task.status == TaskStatus::Processing => {
                    Err(RepositoryError::Busy(task_id.to_string()))
                }
                Some(_) => Err(RepositoryError::DatabaseError(format!(
                    "delete raced with a concurrent update: {}",
                    task_id
                ))),
                None => Err(RepositoryError::NotFound(task_id.to_string())),
            };
        }
        Ok(())
    }

    async fn reset_stale_processing(&self) -> Result<u64, RepositoryError> {
        // 崩溃恢复：上一进程遗留的 processing 行回到 pending，可重新触发
        let result = sqlx::query(
            r#"
            UPDATE text_tasks
            SET status = 'pending', updated_at = ?
            WHERE status = 'processing'
            "#,
        )
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::sqlite::{create_pool, run_migrations, DatabaseConfig};
    use chrono::Duration;

    async fn test_repo() -> SqliteTaskRepository {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteTaskRepository::new(pool)
    }

    fn pending(task_id: &str) -> TaskRecord {
        TaskRecord::new_pending(
            task_id.to_string(),
            "课".repeat(1000),
            "voice-1".to_string(),
        )
    }

    #[tokio::test]
    async fn test_insert_duplicate_rejected() {
        let repo = test_repo().await;
        repo.insert(&pending("t1")).await.unwrap();
        let err = repo.insert(&pending("t1")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_full_success_lifecycle() {
        let repo = test_repo().await;
        repo.insert(&pending("t1")).await.unwrap();

        repo.mark_processing("t1").await.unwrap();
        let task = repo.find_by_id("t1").await.unwrap().unwrap();
        assert_eq!(task.status, TaskStatus::Processing);
        assert!(task.output_audio.is_none());

        repo.mark_completed("t1", "t1.wav").await.unwrap();
        let task = repo.find_by_id("t1").await.unwrap().unwrap();
        assert_eq!(task.status, TaskStatus::Completed);
        assert_eq!(task.output_audio.as_deref(), Some("t1.wav"));
        assert!(task.error.is_none());
    }

    #[tokio::test]
    async fn test_failure_records_error_and_is_retryable() {
        let repo = test_repo().await;
        repo.insert(&pending("t1")).await.unwrap();
        repo.mark_processing("t1").await.unwrap();
        repo.mark_failed("t1", "model exploded").await.unwrap();

        let task = repo.find_by_id("t1").await.unwrap().unwrap();
        assert_eq!(task.status, TaskStatus::Failed);
        assert_eq!(task.error.as_deref(), Some("model exploded"));
        assert!(task.output_audio.is_none());

        // failed → processing 是显式恢复路径，清空错误
        repo.mark_processing("t1").await.unwrap();
        let task = repo.find_by_id("t1").await.unwrap().unwrap();
        assert_eq!(task.status, TaskStatus::Processing);
        assert!(task.error.is_none());
    }

    #[tokio::test]
    async fn test_no_transition_out_of_completed() {
        let repo = test_repo().await;
        repo.insert(&pending("t1")).await.unwrap();
        repo.mark_processing("t1").await.unwrap();
        repo.mark_completed("t1", "t1.wav").await.unwrap();

        let err = repo.mark_processing("t1").await.unwrap_err();
        assert!(matches!(err, RepositoryError::InvalidTransition { .. }));
        let err = repo.mark_failed("t1", "nope").await.unwrap_err();
        assert!(matches!(err, RepositoryError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn test_mark_completed_requires_processing() {
        let repo = test_repo().await;
        repo.insert(&pending("t1")).await.unwrap();
        let err = repo.mark_completed("t1", "t1.wav").await.unwrap_err();
        assert!(matches!(err, RepositoryError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn test_transition_on_missing_task_is_not_found() {
        let repo = test_repo().await;
        let err = repo.mark_processing("missing").await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_find_all_with_status_filter_and_order() {
        let repo = test_repo().await;
        let base = Utc::now();

        let mut t1 = pending("t1");
        t1.created_at = base;
        let mut t2 = pending("t2");
        t2.created_at = base + Duration::seconds(5);
        let mut t3 = pending("t3");
        t3.created_at = base + Duration::seconds(10);

        repo.insert(&t1).await.unwrap();
        repo.insert(&t2).await.unwrap();
        repo.insert(&t3).await.unwrap();
        repo.mark_processing("t2").await.unwrap();
        repo.mark_completed("t2", "t2.wav").await.unwrap();

        let all = repo.find_all(None).await.unwrap();
        assert_eq!(
            all.iter().map(|t| t.task_id.as_str()).collect::<Vec<_>>(),
            vec!["t1", "t2", "t3"]
        );

        let pending_only = repo.find_all(Some(TaskStatus::Pending)).await.unwrap();
        assert_eq!(pending_only.len(), 2);

        let completed = repo.find_all(Some(TaskStatus::Completed)).await.unwrap();
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].task_id, "t2");
    }

    #[tokio::test]
    async fn test_delete_removes_from_list() {
        let repo = test_repo().await;
        repo.insert(&pending("t1")).await.unwrap();
        repo.delete("t1").await.unwrap();
        assert!(repo.find_by_id("t1").await.unwrap().is_none());
        assert!(repo.find_all(None).await.unwrap().is_empty());

        let err = repo.delete("t1").await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_refuses_processing_row() {
        let repo = test_repo().await;
        repo.insert(&pending("t1")).await.unwrap();
        repo.mark_processing("t1").await.unwrap();

        // 调用方在状态读取后才发 delete 也删不掉合成中的行，
        // 条件在 DELETE 语句里，不在调用方的读里
        let err = repo.delete("t1").await.unwrap_err();
        assert!(matches!(err, RepositoryError::Busy(_)));
        assert!(repo.find_by_id("t1").await.unwrap().is_some());

        // 离开 processing 后可正常删除
        repo.mark_failed("t1", "boom").await.unwrap();
        repo.delete("t1").await.unwrap();
        assert!(repo.find_by_id("t1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reset_stale_processing() {
        let repo = test_repo().await;
        repo.insert(&pending("t1")).await.unwrap();
        repo.insert(&pending("t2")).await.unwrap();
        repo.mark_processing("t1").await.unwrap();

        let reset = repo.reset_stale_processing().await.unwrap();
        assert_eq!(reset, 1);
        let task = repo.find_by_id("t1").await.unwrap().unwrap();
        assert_eq!(task.status, TaskStatus::Pending);
    }
}
