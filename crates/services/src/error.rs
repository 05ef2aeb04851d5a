//! Shared error types for the services crate.

use thiserror::Error;

use dashboard_core::model::UserId;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted while building a learning-environment link.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LaunchError {
    #[error("learning environment links are not configured")]
    Disabled,
    #[error("an email is required to open the learning environment")]
    MissingEmail,
    #[error("email sealing returned an empty token")]
    EmptyToken,
    #[error("email sealing failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Url(#[from] url::ParseError),
}

/// Errors emitted by the dashboard fetch sequence.
///
/// `DashboardService::load` swallows these; only `fetch` returns them.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DashboardError {
    #[error("no student record for user {0}")]
    StudentNotFound(UserId),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}
