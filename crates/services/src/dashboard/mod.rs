mod context;
mod loader;
mod service;

pub use context::{DashboardContext, LoadKey, SessionUser};
pub use loader::{DashboardLoader, LoadTicket};
pub use service::DashboardService;
