//! Wire shapes of the course, student, and progress endpoints.
//!
//! Field-level problems degrade to defaults; only a payload that is not the
//! expected JSON shape at all is an error.

use chrono::{DateTime, Utc};
use dashboard_core::model::{
    Completion, Course, CourseDraft, CourseId, CourseRef, CourseStatus, EmbeddedCourse, PlanTier,
    ProgressId, ProgressRecord, Student, StudentId, UserId,
};
use dashboard_core::time::parse_timestamp;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Accepts any JSON value. Strings and numbers become text; the rest is dropped.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Document stores often send both `_id` and a virtual `id`; `_id` wins.
fn document_id(underscore_id: Option<String>, id: Option<String>) -> Option<String> {
    underscore_id
        .filter(|v| !v.trim().is_empty())
        .or(id)
        .filter(|v| !v.trim().is_empty())
}

fn timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(parse_timestamp)
}

fn status(raw: Option<&str>) -> Option<CourseStatus> {
    let raw = raw?;
    match CourseStatus::parse(raw) {
        Ok(status) => Some(status),
        Err(err) => {
            tracing::warn!(error = %err, "ignoring course status");
            None
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn rating(value: Option<&Value>) -> Option<f32> {
    number(value).map(|r| r as f32)
}

//
// ─── COURSES ─────────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CourseDto {
    #[serde(default, rename = "_id", deserialize_with = "lenient_string")]
    pub underscore_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub language: Option<String>,
    #[serde(default, alias = "sub_type", deserialize_with = "lenient_string")]
    pub sub_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(default)]
    pub rating: Option<Value>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: Option<String>,
    #[serde(default, alias = "plan", deserialize_with = "lenient_string")]
    pub tier: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub updated_at: Option<String>,
}

impl CourseDto {
    /// `None` when the course has no usable id.
    pub(crate) fn into_course(self, now: DateTime<Utc>) -> Option<Course> {
        let id = CourseId::new(document_id(self.underscore_id, self.id)?);
        let draft = CourseDraft {
            title: self.title,
            language: self.language,
            sub_type: self.sub_type,
            description: self.description,
            rating: rating(self.rating.as_ref()),
            status: status(self.status.as_deref()),
            tier: self.tier.as_deref().and_then(PlanTier::parse),
            created_at: timestamp(self.created_at.as_deref()),
            updated_at: timestamp(self.updated_at.as_deref()),
            ..CourseDraft::new(id)
        };
        match draft.fill_defaults(now) {
            Ok(course) => Some(course),
            Err(err) => {
                tracing::warn!(error = %err, "dropping catalog course");
                None
            }
        }
    }

    fn into_embedded(self) -> EmbeddedCourse {
        EmbeddedCourse {
            id: document_id(self.underscore_id, self.id).map(CourseId::new),
            title: self.title,
            language: self.language,
            sub_type: self.sub_type,
            description: self.description,
            rating: rating(self.rating.as_ref()),
            status: status(self.status.as_deref()),
            created_at: timestamp(self.created_at.as_deref()),
            updated_at: timestamp(self.updated_at.as_deref()),
        }
    }
}

//
// ─── STUDENTS ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StudentDto {
    #[serde(default, rename = "_id", deserialize_with = "lenient_string")]
    pub underscore_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, alias = "user", deserialize_with = "lenient_string")]
    pub user_id: Option<String>,
    #[serde(default, alias = "name", deserialize_with = "lenient_string")]
    pub display_name: Option<String>,
}

impl StudentDto {
    /// The requested user id fills in when the payload omits its own.
    pub(crate) fn into_student(self, requested: &UserId) -> Option<Student> {
        let id = document_id(self.underscore_id, self.id)?;
        let user_id = self
            .user_id
            .map(UserId::new)
            .unwrap_or_else(|| requested.clone());
        Some(Student::new(StudentId::new(id), user_id, self.display_name))
    }
}

//
// ─── PROGRESS ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProgressDto {
    #[serde(default, rename = "_id", deserialize_with = "lenient_string")]
    pub underscore_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default)]
    pub course_id: Option<Value>,
    #[serde(default)]
    pub completion_percentage: Option<Value>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub updated_at: Option<String>,
}

impl ProgressDto {
    pub(crate) fn into_record(self) -> ProgressRecord {
        let id = document_id(self.underscore_id, self.id)
            .map_or_else(ProgressId::generate, ProgressId::new);
        let completion = number(self.completion_percentage.as_ref())
            .map_or(Completion::ZERO, Completion::saturating);
        ProgressRecord::new(
            id,
            course_ref(self.course_id),
            completion,
            timestamp(self.updated_at.as_deref()),
        )
    }
}

/// `courseId` is a bare id, a populated course object, or null.
fn course_ref(value: Option<Value>) -> CourseRef {
    match value {
        Some(Value::String(id)) if !id.trim().is_empty() => CourseRef::Id(CourseId::new(id)),
        Some(object @ Value::Object(_)) => match serde_json::from_value::<CourseDto>(object) {
            Ok(dto) => CourseRef::Embedded(dto.into_embedded()),
            Err(err) => {
                tracing::debug!(error = %err, "unreadable embedded course");
                CourseRef::Missing
            }
        },
        _ => CourseRef::Missing,
    }
}
