use std::sync::Arc;

use dashboard_core::dashboard::{
    AccessPolicy, DashboardSnapshot, SnapshotInput, TierPolicy, build_snapshot_with,
};
use dashboard_core::model::{CourseId, StudentId, UserId};
use storage::repository::{CourseRepository, ProgressRepository, Storage, StudentRepository};
use url::Url;

use super::context::DashboardContext;
use super::loader::DashboardLoader;
use crate::Clock;
use crate::error::{DashboardError, LaunchError};
use crate::launch::LaunchUrlBuilder;

/// Fetches a student's progress and the catalog, then derives the dashboard.
#[derive(Clone)]
pub struct DashboardService {
    clock: Clock,
    courses: Arc<dyn CourseRepository>,
    students: Arc<dyn StudentRepository>,
    progress: Arc<dyn ProgressRepository>,
    policy: Arc<dyn AccessPolicy>,
    launcher: Option<LaunchUrlBuilder>,
    loader: Arc<DashboardLoader>,
}

impl DashboardService {
    #[must_use]
    pub fn new(clock: Clock, storage: &Storage) -> Self {
        Self {
            clock,
            courses: Arc::clone(&storage.courses),
            students: Arc::clone(&storage.students),
            progress: Arc::clone(&storage.progress),
            policy: Arc::new(TierPolicy),
            launcher: None,
            loader: Arc::new(DashboardLoader::new()),
        }
    }

    /// Replace the default plan-tier access rule.
    #[must_use]
    pub fn with_policy(mut self, policy: Arc<dyn AccessPolicy>) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn with_launcher(mut self, launcher: LaunchUrlBuilder) -> Self {
        self.launcher = Some(launcher);
        self
    }

    #[must_use]
    pub fn launch_enabled(&self) -> bool {
        self.launcher.is_some()
    }

    /// Run the full fetch for the context's user.
    ///
    /// Without a user this is a no-op that returns the empty snapshot.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::StudentNotFound` if the user has no student
    /// record, or `DashboardError::Storage` if any repository call fails.
    pub async fn fetch(&self, ctx: &DashboardContext) -> Result<DashboardSnapshot, DashboardError> {
        let Some(user_id) = ctx.user_id() else {
            return Ok(DashboardSnapshot::empty());
        };

        let student = self.find_student(user_id).await?;
        tracing::debug!(user = %user_id, student = %student, "listing progress");
        let progress = self.progress.list_for_student(&student).await?;
        let catalog = self.courses.list_courses().await?;
        tracing::debug!(
            records = progress.len(),
            courses = catalog.len(),
            "dashboard inputs fetched"
        );

        Ok(build_snapshot_with(
            self.policy.as_ref(),
            SnapshotInput {
                catalog: &catalog,
                progress: &progress,
                plan: ctx.plan(),
                now: self.clock.now(),
            },
        ))
    }

    async fn find_student(&self, user_id: &UserId) -> Result<StudentId, DashboardError> {
        let student = self
            .students
            .find_by_user(user_id)
            .await?
            .ok_or_else(|| DashboardError::StudentNotFound(user_id.clone()))?;
        Ok(student.id().clone())
    }

    /// Like `fetch`, but any failure yields the empty snapshot.
    pub async fn load(&self, ctx: &DashboardContext) -> DashboardSnapshot {
        match self.fetch(ctx).await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::warn!(error = %err, "dashboard fetch failed; showing empty dashboard");
                DashboardSnapshot::empty()
            }
        }
    }

    /// Load and publish a snapshot, unless a newer refresh started meanwhile.
    ///
    /// Returns the snapshot when it was committed, `None` when it was stale.
    pub async fn refresh(&self, ctx: &DashboardContext) -> Option<DashboardSnapshot> {
        let ticket = self.loader.begin(ctx.load_key());
        let snapshot = self.load(ctx).await;
        self.loader
            .commit(&ticket, snapshot.clone())
            .then_some(snapshot)
    }

    /// Refresh only when the user or plan changed since the last load, or the
    /// cache was invalidated; otherwise hand back the cached snapshot.
    pub async fn ensure_loaded(&self, ctx: &DashboardContext) -> DashboardSnapshot {
        if !self.needs_reload(ctx) {
            return self.current();
        }
        match self.refresh(ctx).await {
            Some(snapshot) => snapshot,
            // A newer refresh already committed.
            None => self.current(),
        }
    }

    /// The last committed snapshot.
    #[must_use]
    pub fn current(&self) -> DashboardSnapshot {
        self.loader.current()
    }

    #[must_use]
    pub fn needs_reload(&self, ctx: &DashboardContext) -> bool {
        self.loader.needs_reload(&ctx.load_key())
    }

    /// Force the next `needs_reload` to report true.
    pub fn invalidate(&self) {
        self.loader.invalidate();
    }

    /// Link into the learning environment for a course.
    ///
    /// # Errors
    ///
    /// Returns `LaunchError::Disabled` when no lab URL is configured,
    /// `LaunchError::MissingEmail` without an email, or whatever sealing reports.
    pub async fn launch_url(
        &self,
        course_id: &CourseId,
        email: Option<&str>,
    ) -> Result<Url, LaunchError> {
        let launcher = self.launcher.as_ref().ok_or(LaunchError::Disabled)?;
        let email = email.ok_or(LaunchError::MissingEmail)?;
        launcher.build(course_id, email).await
    }
}
