use dashboard_core::model::{
    Completion, Course, CourseId, CourseRef, CourseStatus, EmbeddedCourse, PlanTier, ProgressId,
    ProgressRecord, Student, StudentId, UserId,
};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn parse_tier(s: &str) -> Result<PlanTier, StorageError> {
    PlanTier::parse(s).ok_or_else(|| StorageError::Serialization(format!("invalid tier: {s}")))
}

pub(crate) fn map_course_row(row: &SqliteRow) -> Result<Course, StorageError> {
    let status: String = row.try_get("status").map_err(ser)?;
    let tier: String = row.try_get("tier").map_err(ser)?;
    // REAL columns come back as f64.
    #[allow(clippy::cast_possible_truncation)]
    let rating = row.try_get::<f64, _>("rating").map_err(ser)? as f32;

    Course::new(
        CourseId::new(row.try_get::<String, _>("id").map_err(ser)?),
        row.try_get::<String, _>("title").map_err(ser)?,
        row.try_get::<String, _>("language").map_err(ser)?,
        row.try_get::<String, _>("sub_type").map_err(ser)?,
        row.try_get::<String, _>("description").map_err(ser)?,
        rating,
        CourseStatus::parse(&status).map_err(ser)?,
        parse_tier(&tier)?,
        row.try_get("created_at").map_err(ser)?,
        row.try_get("updated_at").map_err(ser)?,
    )
    .map_err(ser)
}

pub(crate) fn map_student_row(row: &SqliteRow) -> Result<Student, StorageError> {
    Ok(Student::new(
        StudentId::new(row.try_get::<String, _>("id").map_err(ser)?),
        UserId::new(row.try_get::<String, _>("user_id").map_err(ser)?),
        row.try_get::<Option<String>, _>("display_name")
            .map_err(ser)?,
    ))
}

/// Storage shape of a course reference: `(course_id, course_title)`.
///
/// Only the id and title of an embedded course survive a round trip. A NULL
/// title marks a bare id; an untitled embedded course stores an empty title.
pub(crate) fn course_ref_columns(course: &CourseRef) -> (Option<String>, Option<String>) {
    match course {
        CourseRef::Id(id) => (Some(id.as_str().to_owned()), None),
        CourseRef::Embedded(embedded) => (
            embedded.id.as_ref().map(|id| id.as_str().to_owned()),
            Some(embedded.title.clone().unwrap_or_default()),
        ),
        CourseRef::Missing => (None, None),
    }
}

pub(crate) fn course_ref_from_columns(id: Option<String>, title: Option<String>) -> CourseRef {
    match (id, title) {
        (None, None) => CourseRef::Missing,
        (Some(id), None) => CourseRef::Id(CourseId::new(id)),
        (id, title) => CourseRef::Embedded(EmbeddedCourse {
            id: id.map(CourseId::new),
            title: title.filter(|t| !t.is_empty()),
            ..EmbeddedCourse::default()
        }),
    }
}

pub(crate) fn map_progress_row(row: &SqliteRow) -> Result<ProgressRecord, StorageError> {
    let completion_raw: i64 = row.try_get("completion").map_err(ser)?;
    let completion = u32::try_from(completion_raw)
        .map_err(|_| StorageError::Serialization(format!("invalid completion: {completion_raw}")))
        .and_then(|v| Completion::new(v).map_err(ser))?;

    Ok(ProgressRecord::new(
        ProgressId::new(row.try_get::<String, _>("id").map_err(ser)?),
        course_ref_from_columns(
            row.try_get("course_id").map_err(ser)?,
            row.try_get("course_title").map_err(ser)?,
        ),
        completion,
        row.try_get("updated_at").map_err(ser)?,
    ))
}
