#![forbid(unsafe_code)]

pub mod dashboard;
pub mod error;
pub mod launch;
pub mod model;
pub mod time;

pub use error::Error;
pub use time::Clock;
