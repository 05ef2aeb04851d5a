use crate::model::{Course, PlanTier};

/// Decides whether a subscriber on a tier may see a course.
pub trait AccessPolicy: Send + Sync {
    fn allows(&self, course: &Course, tier: PlanTier) -> bool;
}

/// Plan hierarchy rule: a tier sees every course gated at or below it.
#[derive(Debug, Clone, Copy, Default)]
pub struct TierPolicy;

impl AccessPolicy for TierPolicy {
    fn allows(&self, course: &Course, tier: PlanTier) -> bool {
        tier.permits(course.tier())
    }
}

/// Active courses the plan may see, in catalog order.
///
/// An absent plan name counts as the free tier.
#[must_use]
pub fn accessible_courses(courses: &[Course], plan: Option<&str>) -> Vec<Course> {
    accessible_courses_with(&TierPolicy, courses, PlanTier::from_plan_name(plan))
}

/// Active courses `policy` admits for an already resolved tier.
#[must_use]
pub fn accessible_courses_with(
    policy: &dyn AccessPolicy,
    courses: &[Course],
    tier: PlanTier,
) -> Vec<Course> {
    courses
        .iter()
        .filter(|course| course.status().is_active())
        .filter(|course| policy.allows(course, tier))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CourseDraft, CourseId, CourseStatus};
    use crate::time::fixed_now;

    fn course(id: &str, status: CourseStatus, tier: PlanTier) -> Course {
        CourseDraft {
            title: Some(format!("Course {id}")),
            status: Some(status),
            tier: Some(tier),
            ..CourseDraft::new(CourseId::new(id))
        }
        .fill_defaults(fixed_now())
        .unwrap()
    }

    fn ids(courses: &[Course]) -> Vec<&str> {
        courses.iter().map(|c| c.id().as_str()).collect()
    }

    #[test]
    fn drops_inactive_courses() {
        let catalog = vec![
            course("a", CourseStatus::Active, PlanTier::Free),
            course("b", CourseStatus::Inactive, PlanTier::Free),
        ];
        assert_eq!(ids(&accessible_courses(&catalog, Some("premium"))), vec!["a"]);
    }

    #[test]
    fn narrows_by_tier_and_keeps_order() {
        let catalog = vec![
            course("p", CourseStatus::Active, PlanTier::Premium),
            course("f", CourseStatus::Active, PlanTier::Free),
            course("b", CourseStatus::Active, PlanTier::Basic),
        ];
        assert_eq!(ids(&accessible_courses(&catalog, None)), vec!["f"]);
        assert_eq!(ids(&accessible_courses(&catalog, Some("basic"))), vec!["f", "b"]);
        assert_eq!(
            ids(&accessible_courses(&catalog, Some("premium"))),
            vec!["p", "f", "b"]
        );
    }

    struct DenyAll;

    impl AccessPolicy for DenyAll {
        fn allows(&self, _course: &Course, _tier: PlanTier) -> bool {
            false
        }
    }

    #[test]
    fn custom_policy_is_consulted() {
        let catalog = vec![course("a", CourseStatus::Active, PlanTier::Free)];
        assert!(accessible_courses_with(&DenyAll, &catalog, PlanTier::Premium).is_empty());
    }
}
