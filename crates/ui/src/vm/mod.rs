mod dashboard_vm;
mod markdown_vm;
mod time_fmt;

pub use dashboard_vm::{
    ActivityItemVm, CourseCardVm, DashboardTab, DashboardVm, FEED_LIMIT, StatCardVm,
    launch_error_message, map_dashboard, tier_label,
};
pub use markdown_vm::{description_html, markdown_to_html, sanitize_html};
pub use time_fmt::{format_date, format_last_activity};
