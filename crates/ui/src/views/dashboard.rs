use dashboard_core::model::CourseId;
use dioxus::prelude::*;
use services::LaunchError;

use crate::context::AppContext;
use crate::views::{ViewState, view_state_from_resource};
use crate::vm::{
    ActivityItemVm, CourseCardVm, DashboardTab, DashboardVm, StatCardVm, launch_error_message,
    map_dashboard,
};

/// Resolve the launch link for a course and hand it to the platform opener.
pub(crate) async fn open_course(ctx: &AppContext, course_id: &CourseId) -> Result<(), LaunchError> {
    let email = ctx.session().email().map(str::to_owned);
    let url = ctx
        .dashboard()
        .launch_url(course_id, email.as_deref())
        .await?;
    ctx.link_opener().open_url(url.as_str());
    Ok(())
}

#[component]
pub fn DashboardView(#[props(default)] initial_tab: DashboardTab) -> Element {
    let ctx = use_context::<AppContext>();
    let dashboard = ctx.dashboard();
    let session = use_signal(|| ctx.session().clone());

    // Reading `session` subscribes the resource, so a new user or plan restarts it.
    let mut resource = use_resource(move || {
        let dashboard = dashboard.clone();
        let session = session();
        async move { map_dashboard(&dashboard.ensure_loaded(&session).await) }
    });

    let state = view_state_from_resource(&resource);
    let plan_label = match &state {
        ViewState::Ready(data) => Some(data.plan_label),
        _ => None,
    };
    let refresh_dashboard = ctx.dashboard();
    let mut active_tab = use_signal(|| initial_tab);
    let mut launch_error = use_signal(|| None::<String>);
    let on_launch_error = move |message: String| launch_error.set(Some(message));

    rsx! {
        div { class: "page dashboard",
            header { class: "dashboard-header",
                h2 { "My Dashboard" }
                if let Some(plan) = plan_label {
                    span { class: "plan-badge", "{plan} plan" }
                }
                button {
                    class: "dashboard-refresh",
                    r#type: "button",
                    onclick: move |_| {
                        refresh_dashboard.invalidate();
                        resource.restart();
                    },
                    "Refresh"
                }
            }

            nav { class: "dashboard-tabs", role: "tablist",
                for tab in DashboardTab::ALL {
                    button {
                        key: "{tab.label()}",
                        class: if active_tab() == tab { "dashboard-tab dashboard-tab--active" } else { "dashboard-tab" },
                        r#type: "button",
                        role: "tab",
                        disabled: !tab.is_enabled(),
                        title: if tab.is_enabled() { "" } else { "Only available to guardians" },
                        onclick: move |_| active_tab.set(tab),
                        "{tab.label()}"
                    }
                }
            }

            if let Some(message) = launch_error() {
                p { class: "dashboard-error", role: "alert", "{message}" }
            }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading dashboard..." }
                },
                ViewState::Ready(data) => match active_tab() {
                    DashboardTab::Overview => rsx! {
                        OverviewPanel { data, on_launch_error }
                    },
                    DashboardTab::Courses => rsx! {
                        CoursesPanel { courses: data.courses.clone() }
                    },
                    DashboardTab::Children => rsx! {
                        ChildrenPanel {}
                    },
                },
            }
        }
    }
}

#[component]
fn OverviewPanel(data: DashboardVm, on_launch_error: EventHandler<String>) -> Element {
    rsx! {
        section { class: "dashboard-overview",
            div { class: "stat-grid",
                for stat in data.stats.clone() {
                    StatCard { key: "{stat.label}", stat }
                }
            }

            div { class: "progress-summary",
                span { class: "progress-summary__label", "Average progress" }
                div { class: "progress-bar",
                    div { class: "progress-bar__fill", style: "width: {data.average}%" }
                }
                span { class: "progress-summary__value", "{data.average_label}" }
            }

            section { class: "activity-feed",
                h3 { "Recent activity" }
                if data.has_activity() {
                    ul {
                        for item in data.feed.clone() {
                            ActivityItem { item, on_launch_error }
                        }
                    }
                } else {
                    p { class: "empty-state", "No recent activity yet" }
                }
            }

            section { class: "goals",
                h3 { "Learning goals" }
                p { class: "empty-state", "Goal tracking is coming soon." }
            }
        }
    }
}

#[component]
fn StatCard(stat: StatCardVm) -> Element {
    rsx! {
        div { class: "stat-card",
            span { class: "stat-card__value", "{stat.value}" }
            span { class: "stat-card__label", "{stat.label}" }
        }
    }
}

#[component]
fn ActivityItem(item: ActivityItemVm, on_launch_error: EventHandler<String>) -> Element {
    let ctx = use_context::<AppContext>();
    let course_id = item.course_id.clone();

    rsx! {
        li { class: "activity-item",
            div { class: "activity-item__text",
                span { class: "activity-item__title", "{item.title}" }
                span { class: "activity-item__meta", "{item.subtitle} · {item.last_activity_str}" }
            }
            div { class: "progress-bar progress-bar--small",
                div { class: "progress-bar__fill", style: "width: {item.completion}%" }
            }
            span { class: "activity-item__pct", "{item.completion_label}" }
            if item.complete {
                span { class: "activity-item__badge", "Completed" }
            }
            button {
                class: "activity-item__cta",
                r#type: "button",
                onclick: move |_| {
                    let ctx = ctx.clone();
                    let course_id = course_id.clone();
                    spawn(async move {
                        if let Err(err) = open_course(&ctx, &course_id).await {
                            tracing::warn!(course = %course_id, error = %err, "course launch failed");
                            on_launch_error.call(launch_error_message(&err).to_owned());
                        }
                    });
                },
                "Continue"
            }
        }
    }
}

#[component]
fn CoursesPanel(courses: Vec<CourseCardVm>) -> Element {
    rsx! {
        section { class: "course-grid",
            if courses.is_empty() {
                p { class: "empty-state", "No courses available for your plan" }
            } else {
                for course in courses {
                    CourseCard { key: "{course.id}", course }
                }
            }
        }
    }
}

#[component]
fn CourseCard(course: CourseCardVm) -> Element {
    rsx! {
        article { class: "course-card",
            header {
                h3 { "{course.title}" }
                span { class: "course-card__tier", "{course.tier_label}" }
            }
            p { class: "course-card__meta", "{course.meta} · ★ {course.rating_str}" }
            if let Some(html) = course.description_html.clone() {
                div { class: "course-card__desc", dangerous_inner_html: "{html}" }
            }
            if course.enrolled {
                span { class: "course-card__badge", "Enrolled" }
            }
        }
    }
}

#[component]
fn ChildrenPanel() -> Element {
    rsx! {
        section { class: "children-placeholder",
            p { "Guardian views are not available for student accounts." }
        }
    }
}
