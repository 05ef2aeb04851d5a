use dashboard_core::model::Course;

use super::SqliteRepository;
use super::mapping::map_course_row;
use crate::repository::{CourseRepository, StorageError};

#[async_trait::async_trait]
impl CourseRepository for SqliteRepository {
    async fn list_courses(&self) -> Result<Vec<Course>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, title, language, sub_type, description, rating, status, tier, created_at, updated_at
            FROM courses
            ORDER BY created_at ASC, id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut courses = Vec::with_capacity(rows.len());
        for row in rows {
            courses.push(map_course_row(&row)?);
        }
        tracing::debug!(count = courses.len(), "listed courses");
        Ok(courses)
    }

    async fn upsert_course(&self, course: &Course) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO courses (id, title, language, sub_type, description, rating, status, tier, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                language = excluded.language,
                sub_type = excluded.sub_type,
                description = excluded.description,
                rating = excluded.rating,
                status = excluded.status,
                tier = excluded.tier,
                updated_at = excluded.updated_at
            ",
        )
        .bind(course.id().as_str())
        .bind(course.title())
        .bind(course.language())
        .bind(course.sub_type())
        .bind(course.description())
        .bind(f64::from(course.rating()))
        .bind(course.status().as_str())
        .bind(course.tier().as_str())
        .bind(course.created_at())
        .bind(course.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }
}
