use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::model::course::CourseStatus;
use crate::model::defaults::CourseDraft;
use crate::model::ids::{CourseId, ProgressId};

//
// ─── COMPLETION ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("completion percentage must be within 0..=100, got {0}")]
pub struct CompletionError(pub u32);

/// How much of a course has been finished, in whole percent (0–100).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Completion(u8);

impl Completion {
    pub const ZERO: Completion = Completion(0);
    pub const FULL: Completion = Completion(100);

    /// # Errors
    ///
    /// Returns `CompletionError` if `percent` exceeds 100.
    pub fn new(percent: u32) -> Result<Self, CompletionError> {
        u8::try_from(percent)
            .ok()
            .filter(|p| *p <= 100)
            .map(Self)
            .ok_or(CompletionError(percent))
    }

    /// Clamps any reading into range. Non-finite input becomes zero.
    #[must_use]
    pub fn saturating(percent: f64) -> Self {
        if !percent.is_finite() || percent <= 0.0 {
            return Self::ZERO;
        }
        if percent >= 100.0 {
            return Self::FULL;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Self(percent.round() as u8)
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn is_complete(self) -> bool {
        self.0 == 100
    }
}

impl TryFrom<u32> for Completion {
    type Error = CompletionError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Completion> for u32 {
    fn from(value: Completion) -> Self {
        u32::from(value.0)
    }
}

impl fmt::Display for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

//
// ─── COURSE REFERENCE ──────────────────────────────────────────────────────────
//

/// Partial course object the progress service embeds in a record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedCourse {
    pub id: Option<CourseId>,
    pub title: Option<String>,
    pub language: Option<String>,
    pub sub_type: Option<String>,
    pub description: Option<String>,
    pub rating: Option<f32>,
    pub status: Option<CourseStatus>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl EmbeddedCourse {
    /// Shorthand for the common `{ id, title }` shape.
    #[must_use]
    pub fn titled(id: CourseId, title: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// The reference is usable only with both a non-blank id and title.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        let has_id = self.id.as_ref().is_some_and(|id| !id.is_blank());
        let has_title = self.title.as_deref().is_some_and(|t| !t.trim().is_empty());
        has_id && has_title
    }

    /// Converts into a draft for the default table. `None` without an id.
    #[must_use]
    pub fn to_draft(&self) -> Option<CourseDraft> {
        let id = self.id.clone().filter(|id| !id.is_blank())?;
        Some(CourseDraft {
            title: self.title.clone(),
            language: self.language.clone(),
            sub_type: self.sub_type.clone(),
            description: self.description.clone(),
            rating: self.rating,
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
            ..CourseDraft::new(id)
        })
    }
}

/// How a progress record points at its course.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum CourseRef {
    Id(CourseId),
    Embedded(EmbeddedCourse),
    #[default]
    Missing,
}

impl CourseRef {
    /// Identifier referenced by either form, if any.
    #[must_use]
    pub fn course_id(&self) -> Option<&CourseId> {
        match self {
            CourseRef::Id(id) => Some(id),
            CourseRef::Embedded(embedded) => embedded.id.as_ref(),
            CourseRef::Missing => None,
        }
        .filter(|id| !id.is_blank())
    }

    #[must_use]
    pub fn references(&self, id: &CourseId) -> bool {
        self.course_id() == Some(id)
    }

    /// The embedded object, only when it is well formed.
    #[must_use]
    pub fn embedded(&self) -> Option<&EmbeddedCourse> {
        match self {
            CourseRef::Embedded(embedded) if embedded.is_well_formed() => Some(embedded),
            _ => None,
        }
    }
}

//
// ─── PROGRESS RECORD ───────────────────────────────────────────────────────────
//

/// One student's progress on one course, as tracked by the progress service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressRecord {
    id: ProgressId,
    course: CourseRef,
    completion: Completion,
    updated_at: Option<DateTime<Utc>>,
}

impl ProgressRecord {
    #[must_use]
    pub fn new(
        id: ProgressId,
        course: CourseRef,
        completion: Completion,
        updated_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            course,
            completion,
            updated_at,
        }
    }

    #[must_use]
    pub fn id(&self) -> &ProgressId {
        &self.id
    }

    #[must_use]
    pub fn course(&self) -> &CourseRef {
        &self.course
    }

    #[must_use]
    pub fn completion(&self) -> Completion {
        self.completion
    }

    #[must_use]
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
