use std::sync::Arc;

use async_trait::async_trait;
use dashboard_core::model::{
    Completion, CourseDraft, CourseId, CourseRef, EmbeddedCourse, PlanTier, ProgressId,
    ProgressRecord, Student, StudentId, UserId,
};
use dashboard_core::time::{fixed_now, parse_timestamp};
use services::{
    Clock, DashboardContext, DashboardService, EmailSealer, LaunchError, LaunchUrlBuilder,
    SessionUser,
};
use storage::repository::Storage;
use url::Url;

use super::dashboard::open_course;
use super::test_harness::{setup_view_harness, test_context};
use crate::vm::DashboardTab;

fn record(id: &str, title: &str, pct: u32, day: u32) -> ProgressRecord {
    ProgressRecord::new(
        ProgressId::new(format!("p-{id}")),
        CourseRef::Embedded(EmbeddedCourse::titled(CourseId::new(id), title)),
        Completion::new(pct).unwrap(),
        parse_timestamp(&format!("2024-01-{day:02}")),
    )
}

async fn storage_with(records: &[ProgressRecord]) -> Storage {
    let storage = Storage::in_memory();
    let student = StudentId::new("s1");
    storage
        .students
        .upsert_student(&Student::new(student.clone(), UserId::new("u1"), None))
        .await
        .expect("seed student");
    for r in records {
        storage
            .progress
            .upsert_progress(&student, r)
            .await
            .expect("seed progress");
    }
    storage
}

fn student() -> DashboardContext {
    DashboardContext::for_user(SessionUser::new(UserId::new("u1")))
}

#[tokio::test(flavor = "current_thread")]
async fn overview_renders_stats_and_ordered_feed() {
    let storage = storage_with(&[
        record("c1", "Python Basics", 40, 2),
        record("c2", "JavaScript Games", 80, 5),
    ])
    .await;
    let mut harness = setup_view_harness(&storage, student(), DashboardTab::Overview);
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("60%"), "missing average in {html}");
    assert!(html.contains("Average progress"), "missing stat label in {html}");
    let js = html.find("JavaScript Games").expect("c2 in feed");
    let py = html.find("Python Basics").expect("c1 in feed");
    assert!(js < py, "feed should be newest first: {html}");
    assert!(html.contains("Learning goals"));
    assert!(html.contains("Free plan"), "missing plan badge in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn feed_shows_at_most_three_entries() {
    let records: Vec<_> = (1..=5)
        .map(|d| record(&format!("c{d}"), &format!("Course {d}"), 10 * d, d))
        .collect();
    let storage = storage_with(&records).await;
    let mut harness = setup_view_harness(&storage, student(), DashboardTab::Overview);
    harness.settle().await;

    let html = harness.render();
    assert_eq!(html.matches(">Continue<").count(), 3, "{html}");
    assert!(html.contains("Course 5"));
    assert!(!html.contains("Course 1<"));
}

#[tokio::test(flavor = "current_thread")]
async fn unknown_user_sees_empty_states() {
    let storage = Storage::in_memory();
    let mut harness = setup_view_harness(&storage, student(), DashboardTab::Overview);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("No recent activity yet"), "{html}");
    assert!(html.contains("0%"));

    let mut courses = setup_view_harness(&storage, student(), DashboardTab::Courses);
    courses.settle().await;
    let html = courses.render();
    assert!(html.contains("No courses available for your plan"), "{html}");
}

#[tokio::test(flavor = "current_thread")]
async fn courses_tab_renders_markdown_for_plan() {
    let storage = storage_with(&[]).await;
    for (id, title, tier) in [
        ("py", "Python Basics", PlanTier::Free),
        ("ai", "Python and AI", PlanTier::Premium),
    ] {
        let course = CourseDraft {
            title: Some(title.into()),
            description: Some("Build **games** <script>x()</script>".into()),
            tier: Some(tier),
            ..CourseDraft::new(CourseId::new(id))
        }
        .fill_defaults(fixed_now())
        .expect("course");
        storage.courses.upsert_course(&course).await.expect("seed");
    }

    let mut harness = setup_view_harness(&storage, student(), DashboardTab::Courses);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Python Basics"));
    assert!(!html.contains("Python and AI"), "premium course leaked: {html}");
    assert!(html.contains("<strong>games</strong>"));
    assert!(!html.contains("<script"));
}

#[tokio::test(flavor = "current_thread")]
async fn children_tab_is_disabled_with_placeholder() {
    let storage = Storage::in_memory();
    let mut harness = setup_view_harness(&storage, student(), DashboardTab::Children);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("disabled"), "{html}");
    assert!(html.contains("Guardian views are not available"), "{html}");
    assert!(harness.opener.opened.lock().unwrap().is_empty());
}

struct PlainSealer;

#[async_trait]
impl EmailSealer for PlainSealer {
    async fn seal(&self, email: &str) -> Result<String, LaunchError> {
        Ok(format!("sealed-{email}"))
    }
}

fn signed_in_with_email() -> DashboardContext {
    DashboardContext::for_user(SessionUser::new(UserId::new("u1")).with_email("kid@example.com"))
}

#[tokio::test(flavor = "current_thread")]
async fn continue_opens_the_sealed_course_link() {
    let launcher = LaunchUrlBuilder::new(
        Url::parse("https://lab.example.com/").expect("url"),
        Arc::new(PlainSealer),
    );
    let dashboard = DashboardService::new(Clock::fixed(fixed_now()), &Storage::in_memory())
        .with_launcher(launcher);
    let (ctx, opener) = test_context(dashboard, signed_in_with_email());

    open_course(&ctx, &CourseId::new("c1")).await.expect("open course");
    assert_eq!(
        *opener.opened.lock().unwrap(),
        vec!["https://lab.example.com/course/c1?token=sealed-kid%40example.com".to_owned()]
    );
}

#[tokio::test(flavor = "current_thread")]
async fn continue_without_launcher_opens_nothing() {
    let dashboard = DashboardService::new(Clock::fixed(fixed_now()), &Storage::in_memory());
    let (ctx, opener) = test_context(dashboard, signed_in_with_email());

    let err = open_course(&ctx, &CourseId::new("c1")).await.unwrap_err();
    assert!(matches!(err, LaunchError::Disabled));
    assert!(opener.opened.lock().unwrap().is_empty());
}
