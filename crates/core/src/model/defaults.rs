//! The fill-defaults table for partially known courses.
//!
//! Progress records and loosely typed catalog payloads often carry only a few
//! course fields. `CourseDraft::fill_defaults` is the single place where the
//! missing ones are filled in:
//!
//! | field        | default            |
//! |--------------|--------------------|
//! | title        | `"Unknown Course"` |
//! | language     | `"Unknown"`        |
//! | sub_type     | `"Unknown"`        |
//! | description  | `""`               |
//! | rating       | `0.0`              |
//! | status       | `Active`           |
//! | tier         | `Free`             |
//! | created_at   | `now`              |
//! | updated_at   | `now`              |

use chrono::{DateTime, Utc};

use crate::model::course::{Course, CourseError, CourseStatus, MAX_RATING};
use crate::model::ids::CourseId;
use crate::model::subscription::PlanTier;

pub const UNKNOWN_COURSE_TITLE: &str = "Unknown Course";
pub const UNKNOWN_LANGUAGE: &str = "Unknown";
pub const UNKNOWN_SUB_TYPE: &str = "Unknown";
pub const DEFAULT_DESCRIPTION: &str = "";
pub const DEFAULT_RATING: f32 = 0.0;
pub const DEFAULT_STATUS: CourseStatus = CourseStatus::Active;
pub const DEFAULT_TIER: PlanTier = PlanTier::Free;

/// A course where everything but the identifier may be unknown.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseDraft {
    pub id: CourseId,
    pub title: Option<String>,
    pub language: Option<String>,
    pub sub_type: Option<String>,
    pub description: Option<String>,
    pub rating: Option<f32>,
    pub status: Option<CourseStatus>,
    pub tier: Option<PlanTier>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl CourseDraft {
    #[must_use]
    pub fn new(id: CourseId) -> Self {
        Self {
            id,
            title: None,
            language: None,
            sub_type: None,
            description: None,
            rating: None,
            status: None,
            tier: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Completes the draft using the default table.
    ///
    /// Blank strings count as missing. A rating that is not a finite value in
    /// `0..=5` is replaced by the default rather than rejected.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::EmptyId` if the draft has a blank identifier;
    /// that is the one field no default can stand in for.
    pub fn fill_defaults(self, now: DateTime<Utc>) -> Result<Course, CourseError> {
        let title = present(self.title).unwrap_or_else(|| UNKNOWN_COURSE_TITLE.to_owned());
        let language = present(self.language).unwrap_or_else(|| UNKNOWN_LANGUAGE.to_owned());
        let sub_type = present(self.sub_type).unwrap_or_else(|| UNKNOWN_SUB_TYPE.to_owned());
        let description = self
            .description
            .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_owned());
        let rating = self
            .rating
            .filter(|r| r.is_finite() && (0.0..=MAX_RATING).contains(r))
            .unwrap_or(DEFAULT_RATING);

        Course::new(
            self.id,
            title,
            language,
            sub_type,
            description,
            rating,
            self.status.unwrap_or(DEFAULT_STATUS),
            self.tier.unwrap_or(DEFAULT_TIER),
            self.created_at.unwrap_or(now),
            self.updated_at.unwrap_or(now),
        )
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn empty_draft_uses_every_default() {
        let now = fixed_now();
        let course = CourseDraft::new(CourseId::new("c9")).fill_defaults(now).unwrap();

        assert_eq!(course.id(), &CourseId::new("c9"));
        assert_eq!(course.title(), UNKNOWN_COURSE_TITLE);
        assert_eq!(course.language(), UNKNOWN_LANGUAGE);
        assert_eq!(course.sub_type(), UNKNOWN_SUB_TYPE);
        assert_eq!(course.description(), "");
        assert!(course.rating().abs() < f32::EPSILON);
        assert_eq!(course.status(), CourseStatus::Active);
        assert_eq!(course.tier(), PlanTier::Free);
        assert_eq!(course.created_at(), now);
        assert_eq!(course.updated_at(), now);
    }

    #[test]
    fn known_fields_are_kept() {
        let draft = CourseDraft {
            title: Some("Py".into()),
            language: Some("python".into()),
            rating: Some(4.0),
            status: Some(CourseStatus::Inactive),
            ..CourseDraft::new(CourseId::new("c1"))
        };
        let course = draft.fill_defaults(fixed_now()).unwrap();
        assert_eq!(course.title(), "Py");
        assert_eq!(course.language(), "python");
        assert!((course.rating() - 4.0).abs() < f32::EPSILON);
        assert_eq!(course.status(), CourseStatus::Inactive);
    }

    #[test]
    fn blank_strings_and_bad_ratings_fall_back() {
        let draft = CourseDraft {
            title: Some("   ".into()),
            sub_type: Some(String::new()),
            rating: Some(-3.0),
            ..CourseDraft::new(CourseId::new("c2"))
        };
        let course = draft.fill_defaults(fixed_now()).unwrap();
        assert_eq!(course.title(), UNKNOWN_COURSE_TITLE);
        assert_eq!(course.sub_type(), UNKNOWN_SUB_TYPE);
        assert!(course.rating().abs() < f32::EPSILON);
    }

    #[test]
    fn blank_id_cannot_be_defaulted() {
        let err = CourseDraft::new(CourseId::new(" "))
            .fill_defaults(fixed_now())
            .unwrap_err();
        assert_eq!(err, CourseError::EmptyId);
    }
}
