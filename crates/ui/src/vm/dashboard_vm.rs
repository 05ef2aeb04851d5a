use dashboard_core::dashboard::DashboardSnapshot;
use dashboard_core::model::{ActivityEntry, Course, CourseId, PlanTier};
use services::LaunchError;

use crate::vm::markdown_vm::description_html;
use crate::vm::time_fmt::format_last_activity;

/// How many activity entries the overview feed shows.
pub const FEED_LIMIT: usize = 3;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DashboardTab {
    #[default]
    Overview,
    Courses,
    Children,
}

impl DashboardTab {
    pub const ALL: [DashboardTab; 3] = [Self::Overview, Self::Courses, Self::Children];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Courses => "Courses",
            Self::Children => "Children",
        }
    }

    /// Guardian views never open for a student session.
    #[must_use]
    pub fn is_enabled(self) -> bool {
        !matches!(self, Self::Children)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatCardVm {
    pub label: &'static str,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActivityItemVm {
    pub course_id: CourseId,
    pub title: String,
    pub subtitle: String,
    pub completion: u8,
    pub completion_label: String,
    pub complete: bool,
    pub last_activity_str: String,
}

impl From<&ActivityEntry> for ActivityItemVm {
    fn from(entry: &ActivityEntry) -> Self {
        let course = entry.course();
        Self {
            course_id: course.id().clone(),
            title: course.title().to_owned(),
            subtitle: format!("{} · {}", course.language(), course.sub_type()),
            completion: entry.completion().value(),
            completion_label: entry.completion().to_string(),
            complete: entry.completion().is_complete(),
            last_activity_str: format_last_activity(entry.last_activity()),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CourseCardVm {
    pub id: CourseId,
    pub title: String,
    pub meta: String,
    pub rating_str: String,
    pub tier_label: &'static str,
    pub description_html: Option<String>,
    pub enrolled: bool,
}

impl CourseCardVm {
    fn new(course: &Course, enrolled: bool) -> Self {
        Self {
            id: course.id().clone(),
            title: course.title().to_owned(),
            meta: format!("{} · {}", course.language(), course.sub_type()),
            rating_str: format!("{:.1}", course.rating()),
            tier_label: tier_label(course.tier()),
            description_html: description_html(course.description()),
            enrolled,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DashboardVm {
    pub plan_label: &'static str,
    pub stats: Vec<StatCardVm>,
    pub average: u8,
    pub average_label: String,
    pub feed: Vec<ActivityItemVm>,
    pub courses: Vec<CourseCardVm>,
}

impl DashboardVm {
    #[must_use]
    pub fn has_activity(&self) -> bool {
        !self.feed.is_empty()
    }

    #[must_use]
    pub fn has_courses(&self) -> bool {
        !self.courses.is_empty()
    }
}

#[must_use]
pub fn tier_label(tier: PlanTier) -> &'static str {
    match tier {
        PlanTier::Free => "Free",
        PlanTier::Basic => "Basic",
        PlanTier::Premium => "Premium",
    }
}

/// Convert a dashboard snapshot into display-ready strings.
#[must_use]
pub fn map_dashboard(snapshot: &DashboardSnapshot) -> DashboardVm {
    let stats = vec![
        StatCardVm {
            label: "Enrolled courses",
            value: snapshot.enrolled.len().to_string(),
        },
        StatCardVm {
            label: "Average progress",
            value: snapshot.average.to_string(),
        },
        StatCardVm {
            label: "Activities",
            value: snapshot.activity.len().to_string(),
        },
        StatCardVm {
            label: "Available courses",
            value: snapshot.accessible.len().to_string(),
        },
    ];

    let courses = snapshot
        .accessible
        .iter()
        .map(|course| {
            let enrolled = snapshot.enrolled.iter().any(|c| c.id() == course.id());
            CourseCardVm::new(course, enrolled)
        })
        .collect();

    DashboardVm {
        plan_label: tier_label(snapshot.tier),
        stats,
        average: snapshot.average.value(),
        average_label: snapshot.average.to_string(),
        feed: snapshot
            .recent_activity(FEED_LIMIT)
            .iter()
            .map(ActivityItemVm::from)
            .collect(),
        courses,
    }
}

#[must_use]
pub fn launch_error_message(err: &LaunchError) -> &'static str {
    match err {
        LaunchError::Disabled => "Course links are not available right now.",
        LaunchError::MissingEmail => "Sign in with an email address to open courses.",
        _ => "Could not open the course. Please try again.",
    }
}
