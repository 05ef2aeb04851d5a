use chrono::{DateTime, Utc};

use crate::model::course::Course;
use crate::model::progress::{Completion, ProgressRecord};

/// A course paired with the progress made on it. Derived, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityEntry {
    course: Course,
    progress: ProgressRecord,
}

impl ActivityEntry {
    /// Pairs a course with its progress record.
    ///
    /// Returns `None` when the course is missing its id or title, so a
    /// constructed entry is always fit for display.
    #[must_use]
    pub fn new(course: Course, progress: ProgressRecord) -> Option<Self> {
        course
            .is_displayable()
            .then_some(Self { course, progress })
    }

    #[must_use]
    pub fn course(&self) -> &Course {
        &self.course
    }

    #[must_use]
    pub fn progress(&self) -> &ProgressRecord {
        &self.progress
    }

    #[must_use]
    pub fn completion(&self) -> Completion {
        self.progress.completion()
    }

    #[must_use]
    pub fn last_activity(&self) -> Option<DateTime<Utc>> {
        self.progress.updated_at()
    }
}
