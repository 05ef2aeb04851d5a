use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::views::DashboardView;

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", DashboardView)] Dashboard {},
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            Sidebar {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn Sidebar() -> Element {
    rsx! {
        nav { class: "sidebar",
            h1 { "Learn" }
            ul {
                li { Link { to: Route::Dashboard {}, "Dashboard" } }
            }
        }
    }
}
