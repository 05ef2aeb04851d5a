use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::CourseId;
use crate::model::subscription::PlanTier;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum CourseError {
    #[error("course id cannot be empty")]
    EmptyId,

    #[error("course title cannot be empty")]
    EmptyTitle,

    #[error("course rating must be within 0..=5, got {0}")]
    InvalidRating(f32),

    #[error("unknown course status: {0}")]
    UnknownStatus(String),
}

//
// ─── STATUS ────────────────────────────────────────────────────────────────────
//

/// Publication state of a course in the catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CourseStatus {
    #[default]
    Active,
    Inactive,
}

impl CourseStatus {
    /// Parses the catalog's status label.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::UnknownStatus` for labels other than active/inactive.
    pub fn parse(raw: &str) -> Result<Self, CourseError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            other => Err(CourseError::UnknownStatus(other.to_owned())),
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
        }
    }

    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

//
// ─── COURSE ────────────────────────────────────────────────────────────────────
//

pub const MAX_RATING: f32 = 5.0;

/// A catalog course. Owned by the catalog service; read-only here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    id: CourseId,
    title: String,
    language: String,
    sub_type: String,
    description: String,
    rating: f32,
    status: CourseStatus,
    tier: PlanTier,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Course {
    /// Creates a validated course.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::EmptyId` / `EmptyTitle` for blank identity fields,
    /// and `CourseError::InvalidRating` when the rating is not finite or out of range.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: CourseId,
        title: impl Into<String>,
        language: impl Into<String>,
        sub_type: impl Into<String>,
        description: impl Into<String>,
        rating: f32,
        status: CourseStatus,
        tier: PlanTier,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, CourseError> {
        if id.is_blank() {
            return Err(CourseError::EmptyId);
        }
        let title = title.into();
        if title.trim().is_empty() {
            return Err(CourseError::EmptyTitle);
        }
        if !rating.is_finite() || !(0.0..=MAX_RATING).contains(&rating) {
            return Err(CourseError::InvalidRating(rating));
        }

        Ok(Self {
            id,
            title: title.trim().to_owned(),
            language: language.into(),
            sub_type: sub_type.into(),
            description: description.into(),
            rating,
            status,
            tier,
            created_at,
            updated_at,
        })
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> &CourseId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    #[must_use]
    pub fn sub_type(&self) -> &str {
        &self.sub_type
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn rating(&self) -> f32 {
        self.rating
    }

    #[must_use]
    pub fn status(&self) -> CourseStatus {
        self.status
    }

    /// Minimum subscription tier that may see this course.
    #[must_use]
    pub fn tier(&self) -> PlanTier {
        self.tier
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// A course may appear in the activity feed only with a non-blank id and title.
    ///
    /// Always true for values built through `Course::new`; deserialized values
    /// skip construction and are checked here.
    #[must_use]
    pub fn is_displayable(&self) -> bool {
        !self.id.is_blank() && !self.title.trim().is_empty()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
