#![forbid(unsafe_code)]

pub mod app_services;
pub mod dashboard;
pub mod error;
pub mod launch;
pub mod remote;

pub use dashboard_core::Clock;

pub use app_services::{AppServices, Backend};
pub use dashboard::{DashboardContext, DashboardLoader, DashboardService, LoadKey, SessionUser};
pub use error::{AppServicesError, DashboardError, LaunchError};
pub use launch::{EmailSealer, LaunchUrlBuilder, RemoteEmailSealer};
pub use remote::{RemoteBackend, RemoteConfig};
