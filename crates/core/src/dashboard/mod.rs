//! Pure dashboard pipeline: access filter, activity join, aggregate, enrollment.
//!
//! Everything here is synchronous and side-effect free apart from warnings
//! for dropped records. Fetching lives in the services crate.

mod access;
mod aggregate;
mod enrollment;
mod join;

use chrono::{DateTime, Utc};

use crate::model::{ActivityEntry, Completion, Course, PlanTier, ProgressRecord};

pub use access::{AccessPolicy, TierPolicy, accessible_courses, accessible_courses_with};
pub use aggregate::average_completion;
pub use enrollment::enrolled_courses;
pub use join::join_activity;

/// Everything the dashboard renders, derived in one pass.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSnapshot {
    pub tier: PlanTier,
    pub accessible: Vec<Course>,
    pub progress: Vec<ProgressRecord>,
    pub activity: Vec<ActivityEntry>,
    pub enrolled: Vec<Course>,
    pub average: Completion,
}

impl DashboardSnapshot {
    /// The "no data" state: zero average, no activity, no enrollment.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            tier: PlanTier::Free,
            accessible: Vec::new(),
            progress: Vec::new(),
            activity: Vec::new(),
            enrolled: Vec::new(),
            average: Completion::ZERO,
        }
    }

    /// Newest `limit` activity entries.
    #[must_use]
    pub fn recent_activity(&self, limit: usize) -> &[ActivityEntry] {
        &self.activity[..self.activity.len().min(limit)]
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.progress.is_empty() && self.accessible.is_empty()
    }
}

impl Default for DashboardSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

/// Inputs for `build_snapshot`.
#[derive(Debug, Clone, Copy)]
pub struct SnapshotInput<'a> {
    pub catalog: &'a [Course],
    pub progress: &'a [ProgressRecord],
    pub plan: Option<&'a str>,
    pub now: DateTime<Utc>,
}

/// Runs the whole pipeline with the default tier policy.
#[must_use]
pub fn build_snapshot(input: SnapshotInput<'_>) -> DashboardSnapshot {
    build_snapshot_with(&TierPolicy, input)
}

#[must_use]
pub fn build_snapshot_with(policy: &dyn AccessPolicy, input: SnapshotInput<'_>) -> DashboardSnapshot {
    let tier = PlanTier::from_plan_name(input.plan);
    let accessible = accessible_courses_with(policy, input.catalog, tier);
    let activity = join_activity(input.catalog, input.progress, input.now);
    let average = average_completion(input.progress);
    let enrolled = enrolled_courses(&accessible, input.progress);

    DashboardSnapshot {
        tier,
        accessible,
        progress: input.progress.to_vec(),
        activity,
        enrolled,
        average,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CourseDraft, CourseId, CourseRef, EmbeddedCourse, ProgressId};
    use crate::time::{fixed_now, parse_timestamp};

    fn progress(course: CourseRef, pct: u32, updated: &str) -> ProgressRecord {
        ProgressRecord::new(
            ProgressId::generate(),
            course,
            Completion::new(pct).unwrap(),
            parse_timestamp(updated),
        )
    }

    fn embedded(id: &str, title: &str) -> CourseRef {
        CourseRef::Embedded(EmbeddedCourse::titled(CourseId::new(id), title))
    }

    #[test]
    fn two_course_scenario() {
        let records = vec![
            progress(embedded("c1", "Py"), 40, "2024-01-02"),
            progress(embedded("c2", "JS"), 80, "2024-01-05"),
        ];
        let snapshot = build_snapshot(SnapshotInput {
            catalog: &[],
            progress: &records,
            plan: None,
            now: fixed_now(),
        });

        assert_eq!(snapshot.average.value(), 60);
        let order: Vec<_> = snapshot
            .activity
            .iter()
            .map(|e| e.course().id().as_str())
            .collect();
        assert_eq!(order, vec!["c2", "c1"]);
        assert!(snapshot.enrolled.is_empty());
    }

    #[test]
    fn empty_progress_scenario() {
        let snapshot = build_snapshot(SnapshotInput {
            catalog: &[],
            progress: &[],
            plan: Some("premium"),
            now: fixed_now(),
        });
        assert_eq!(snapshot.average, Completion::ZERO);
        assert!(snapshot.activity.is_empty());
        assert!(snapshot.enrolled.is_empty());
        assert_eq!(snapshot.tier, PlanTier::Premium);
    }

    #[test]
    fn unknown_plan_resolves_to_free_for_both_tier_and_access() {
        let catalog = vec![
            CourseDraft {
                tier: Some(PlanTier::Basic),
                ..CourseDraft::new(CourseId::new("b"))
            }
            .fill_defaults(fixed_now())
            .unwrap(),
        ];
        let snapshot = build_snapshot(SnapshotInput {
            catalog: &catalog,
            progress: &[],
            plan: Some("platinum"),
            now: fixed_now(),
        });
        assert_eq!(snapshot.tier, PlanTier::Free);
        assert!(snapshot.accessible.is_empty());
    }

    #[test]
    fn null_course_reference_still_counts_toward_average() {
        let records = vec![
            progress(CourseRef::Missing, 20, "2024-01-01"),
            progress(embedded("c1", "Py"), 40, "2024-01-02"),
        ];
        let snapshot = build_snapshot(SnapshotInput {
            catalog: &[],
            progress: &records,
            plan: None,
            now: fixed_now(),
        });
        assert_eq!(snapshot.activity.len(), 1);
        assert_eq!(snapshot.average.value(), 30);
    }

    #[test]
    fn enrollment_is_subset_of_accessible() {
        let catalog: Vec<Course> = ["c1", "c2", "c3"]
            .iter()
            .map(|id| {
                CourseDraft::new(CourseId::new(*id))
                    .fill_defaults(fixed_now())
                    .unwrap()
            })
            .collect();
        let records = vec![
            progress(CourseRef::Id(CourseId::new("c3")), 10, "2024-01-01"),
            progress(CourseRef::Id(CourseId::new("zz")), 10, "2024-01-01"),
        ];
        let snapshot = build_snapshot(SnapshotInput {
            catalog: &catalog,
            progress: &records,
            plan: None,
            now: fixed_now(),
        });
        for course in &snapshot.enrolled {
            assert!(snapshot.accessible.contains(course));
            assert!(records.iter().any(|r| r.course().references(course.id())));
        }
        assert_eq!(snapshot.enrolled.len(), 1);
    }

    #[test]
    fn recent_activity_is_capped() {
        let records: Vec<_> = (1..=5)
            .map(|day| progress(embedded(&format!("c{day}"), "T"), 10, &format!("2024-01-0{day}")))
            .collect();
        let snapshot = build_snapshot(SnapshotInput {
            catalog: &[],
            progress: &records,
            plan: None,
            now: fixed_now(),
        });
        let recent = snapshot.recent_activity(3);
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].course().id().as_str(), "c5");
        assert!(DashboardSnapshot::empty().recent_activity(3).is_empty());
    }
}
