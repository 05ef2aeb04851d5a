use dashboard_core::model::{ProgressRecord, StudentId};

use super::SqliteRepository;
use super::mapping::{course_ref_columns, map_progress_row};
use crate::repository::{ProgressRepository, StorageError};

#[async_trait::async_trait]
impl ProgressRepository for SqliteRepository {
    async fn list_for_student(
        &self,
        student_id: &StudentId,
    ) -> Result<Vec<ProgressRecord>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, course_id, course_title, completion, updated_at
            FROM progress
            WHERE student_id = ?1
            ORDER BY rowid ASC
            ",
        )
        .bind(student_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            records.push(map_progress_row(&row)?);
        }
        tracing::debug!(student_id = %student_id, count = records.len(), "listed progress");
        Ok(records)
    }

    async fn upsert_progress(
        &self,
        student_id: &StudentId,
        record: &ProgressRecord,
    ) -> Result<(), StorageError> {
        let (course_id, course_title) = course_ref_columns(record.course());

        sqlx::query(
            r"
            INSERT INTO progress (id, student_id, course_id, course_title, completion, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(id) DO UPDATE SET
                course_id = excluded.course_id,
                course_title = excluded.course_title,
                completion = excluded.completion,
                updated_at = excluded.updated_at
            ",
        )
        .bind(record.id().as_str())
        .bind(student_id.as_str())
        .bind(course_id)
        .bind(course_title)
        .bind(i64::from(record.completion().value()))
        .bind(record.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => StorageError::NotFound,
            other => StorageError::Connection(other.to_string()),
        })?;

        Ok(())
    }
}
