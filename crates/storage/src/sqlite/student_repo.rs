use dashboard_core::model::{Student, UserId};

use super::SqliteRepository;
use super::mapping::map_student_row;
use crate::repository::{StorageError, StudentRepository};

#[async_trait::async_trait]
impl StudentRepository for SqliteRepository {
    async fn find_by_user(&self, user_id: &UserId) -> Result<Option<Student>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, user_id, display_name
            FROM students WHERE user_id = ?1
            ",
        )
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        row.as_ref().map(map_student_row).transpose()
    }

    async fn upsert_student(&self, student: &Student) -> Result<(), StorageError> {
        let res = sqlx::query(
            r"
            INSERT INTO students (id, user_id, display_name)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(id) DO UPDATE SET
                user_id = excluded.user_id,
                display_name = excluded.display_name
            ",
        )
        .bind(student.id().as_str())
        .bind(student.user_id().as_str())
        .bind(student.display_name())
        .execute(&self.pool)
        .await;

        match res {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(StorageError::Conflict)
            }
            Err(e) => Err(StorageError::Connection(e.to_string())),
        }
    }
}
