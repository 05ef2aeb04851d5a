use std::sync::Arc;

use services::{DashboardContext, DashboardService};

use crate::platform::LinkOpenerRef;

pub trait UiApp: Send + Sync {
    fn dashboard(&self) -> Arc<DashboardService>;
    fn session(&self) -> DashboardContext;
    fn link_opener(&self) -> LinkOpenerRef;
}

#[derive(Clone)]
pub struct AppContext {
    dashboard: Arc<DashboardService>,
    session: DashboardContext,
    link_opener: LinkOpenerRef,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            dashboard: app.dashboard(),
            session: app.session(),
            link_opener: app.link_opener(),
        }
    }

    #[must_use]
    pub fn dashboard(&self) -> Arc<DashboardService> {
        Arc::clone(&self.dashboard)
    }

    /// Who is signed in and on which plan.
    #[must_use]
    pub fn session(&self) -> &DashboardContext {
        &self.session
    }

    #[must_use]
    pub fn link_opener(&self) -> LinkOpenerRef {
        Arc::clone(&self.link_opener)
    }
}

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
