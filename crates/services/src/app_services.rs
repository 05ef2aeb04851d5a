use std::sync::Arc;

use storage::repository::Storage;
use url::Url;

use crate::Clock;
use crate::dashboard::DashboardService;
use crate::error::AppServicesError;
use crate::launch::{LaunchUrlBuilder, RemoteEmailSealer};
use crate::remote::{RemoteBackend, RemoteConfig};

/// Where dashboard data comes from.
#[derive(Clone, Debug)]
pub enum Backend {
    Sqlite { db_url: String },
    Remote(RemoteConfig),
}

/// Assembles app-facing services for the selected backend.
#[derive(Clone)]
pub struct AppServices {
    dashboard: Arc<DashboardService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// Launch links stay disabled; sealing needs the remote API.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(db_url: &str, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        tracing::info!(db_url, "using sqlite backend");
        Ok(Self::from_storage(clock, &storage, None))
    }

    /// Build services against the remote HTTP API.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Url` if the seal endpoint cannot be derived.
    pub fn new_remote(
        config: RemoteConfig,
        lab_url: Url,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        let sealer = RemoteEmailSealer::new(&config.base_url, config.api_key.clone())?;
        tracing::info!(api = %config.base_url, lab = %lab_url, "using remote backend");
        let storage = Storage::from_repo(RemoteBackend::new(config, clock));
        let launcher = LaunchUrlBuilder::new(lab_url, Arc::new(sealer));
        Ok(Self::from_storage(clock, &storage, Some(launcher)))
    }

    /// # Errors
    ///
    /// Returns `AppServicesError` if the backend cannot be initialized.
    pub async fn connect(
        backend: Backend,
        lab_url: Url,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        match backend {
            Backend::Sqlite { db_url } => Self::new_sqlite(&db_url, clock).await,
            Backend::Remote(config) => Self::new_remote(config, lab_url, clock),
        }
    }

    /// Wire services over an already-built storage.
    #[must_use]
    pub fn from_storage(
        clock: Clock,
        storage: &Storage,
        launcher: Option<LaunchUrlBuilder>,
    ) -> Self {
        let mut dashboard = DashboardService::new(clock, storage);
        if let Some(launcher) = launcher {
            dashboard = dashboard.with_launcher(launcher);
        }
        Self {
            dashboard: Arc::new(dashboard),
        }
    }

    #[must_use]
    pub fn dashboard(&self) -> Arc<DashboardService> {
        Arc::clone(&self.dashboard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_services_enable_launch_links() {
        let config = RemoteConfig::new("https://api.example.com", None).unwrap();
        let services = AppServices::new_remote(
            config,
            Url::parse("https://lab.example.com").unwrap(),
            Clock::default_clock(),
        )
        .unwrap();
        assert!(services.dashboard().launch_enabled());
    }

    #[test]
    fn in_memory_services_have_no_launcher() {
        let services =
            AppServices::from_storage(Clock::default_clock(), &Storage::in_memory(), None);
        assert!(!services.dashboard().launch_enabled());
    }
}
