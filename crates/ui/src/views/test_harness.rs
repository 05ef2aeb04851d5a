use std::sync::{Arc, Mutex};

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use dashboard_core::time::fixed_now;
use services::{Clock, DashboardContext, DashboardService};
use storage::repository::Storage;

use crate::context::{AppContext, UiApp, build_app_context};
use crate::platform::{LinkOpenerRef, UiLinkOpener};
use crate::views::DashboardView;
use crate::vm::DashboardTab;

/// Captures links instead of spawning a browser.
#[derive(Default)]
pub struct RecordingOpener {
    pub opened: Mutex<Vec<String>>,
}

impl UiLinkOpener for RecordingOpener {
    fn open_url(&self, url: &str) {
        if let Ok(mut opened) = self.opened.lock() {
            opened.push(url.to_owned());
        }
    }
}

struct TestApp {
    dashboard: Arc<DashboardService>,
    session: DashboardContext,
    opener: Arc<RecordingOpener>,
}

impl UiApp for TestApp {
    fn dashboard(&self) -> Arc<DashboardService> {
        Arc::clone(&self.dashboard)
    }

    fn session(&self) -> DashboardContext {
        self.session.clone()
    }

    fn link_opener(&self) -> LinkOpenerRef {
        self.opener.clone()
    }
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    tab: DashboardTab,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.tab);
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let tab = use_context::<DashboardTab>();
    rsx! { DashboardView { initial_tab: tab } }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub opener: Arc<RecordingOpener>,
}

impl ViewHarness {
    /// Build the DOM and let the dashboard resource settle.
    pub async fn settle(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
        for _ in 0..3 {
            self.drive_async().await;
        }
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn setup_view_harness(
    storage: &Storage,
    session: DashboardContext,
    tab: DashboardTab,
) -> ViewHarness {
    let dashboard = Arc::new(DashboardService::new(Clock::fixed(fixed_now()), storage));
    let opener = Arc::new(RecordingOpener::default());
    let app = Arc::new(TestApp {
        dashboard,
        session,
        opener: Arc::clone(&opener),
    });

    let dom = VirtualDom::new_with_props(ViewRouterHarness, ViewHarnessProps { app, tab });
    ViewHarness { dom, opener }
}

/// Context for driving view helpers directly, with links captured.
pub fn test_context(
    dashboard: DashboardService,
    session: DashboardContext,
) -> (AppContext, Arc<RecordingOpener>) {
    let opener = Arc::new(RecordingOpener::default());
    let app: Arc<dyn UiApp> = Arc::new(TestApp {
        dashboard: Arc::new(dashboard),
        session,
        opener: Arc::clone(&opener),
    });
    (build_app_context(&app), opener)
}
