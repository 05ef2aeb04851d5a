use crate::model::{Course, ProgressRecord};

/// Accessible courses with at least one progress record, in accessible order.
///
/// A record matches through either a bare course id or an embedded one.
#[must_use]
pub fn enrolled_courses(accessible: &[Course], progress: &[ProgressRecord]) -> Vec<Course> {
    accessible
        .iter()
        .filter(|course| {
            progress
                .iter()
                .any(|record| record.course().references(course.id()))
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Completion, CourseDraft, CourseId, CourseRef, EmbeddedCourse, ProgressId};
    use crate::time::fixed_now;

    fn course(id: &str) -> Course {
        CourseDraft::new(CourseId::new(id))
            .fill_defaults(fixed_now())
            .unwrap()
    }

    fn record(course: CourseRef) -> ProgressRecord {
        ProgressRecord::new(ProgressId::generate(), course, Completion::ZERO, None)
    }

    #[test]
    fn matches_bare_and_embedded_references() {
        let accessible = vec![course("a"), course("b"), course("c")];
        let progress = vec![
            record(CourseRef::Embedded(EmbeddedCourse::titled(CourseId::new("c"), "C"))),
            record(CourseRef::Id(CourseId::new("a"))),
            record(CourseRef::Missing),
        ];
        let enrolled = enrolled_courses(&accessible, &progress);
        let ids: Vec<_> = enrolled.iter().map(|c| c.id().as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn ignores_progress_for_inaccessible_courses() {
        let accessible = vec![course("a")];
        let progress = vec![record(CourseRef::Id(CourseId::new("z")))];
        assert!(enrolled_courses(&accessible, &progress).is_empty());
    }

    #[test]
    fn embedded_reference_without_title_still_enrolls() {
        let accessible = vec![course("a")];
        let progress = vec![record(CourseRef::Embedded(EmbeddedCourse {
            id: Some(CourseId::new("a")),
            ..EmbeddedCourse::default()
        }))];
        assert_eq!(enrolled_courses(&accessible, &progress).len(), 1);
    }
}
