use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use dashboard_core::dashboard::DashboardSnapshot;

use super::context::LoadKey;

/// Proof that a load was started; only the newest ticket may commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    key: LoadKey,
}

#[derive(Debug, Default)]
struct LoaderState {
    last_key: Option<LoadKey>,
    invalidated: bool,
    snapshot: DashboardSnapshot,
}

/// Generation-guarded holder of the latest dashboard snapshot.
///
/// Loads may finish out of order. A result is stored only if no newer load
/// began after it, so a slow response for an old user never overwrites the
/// current one.
#[derive(Debug, Default)]
pub struct DashboardLoader {
    generation: AtomicU64,
    state: Mutex<LoaderState>,
}

impl DashboardLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, LoaderState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start a load for `key`, superseding any load still in flight.
    ///
    /// The generation is bumped under the state lock so `last_key` always
    /// belongs to the newest ticket.
    pub fn begin(&self, key: LoadKey) -> LoadTicket {
        let mut state = self.state();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        state.last_key = Some(key.clone());
        state.invalidated = false;
        LoadTicket { generation, key }
    }

    /// Store `snapshot` if `ticket` is still the newest load.
    ///
    /// Returns whether the snapshot was accepted.
    pub fn commit(&self, ticket: &LoadTicket, snapshot: DashboardSnapshot) -> bool {
        let mut state = self.state();
        let latest = self.generation.load(Ordering::SeqCst);
        if ticket.generation != latest {
            tracing::debug!(
                stale = ticket.generation,
                latest,
                "discarding superseded dashboard load"
            );
            return false;
        }
        state.snapshot = snapshot;
        true
    }

    /// Whether the inputs changed since the last `begin`, or the cached
    /// snapshot was invalidated.
    #[must_use]
    pub fn needs_reload(&self, key: &LoadKey) -> bool {
        let state = self.state();
        state.invalidated || state.last_key.as_ref() != Some(key)
    }

    /// Mark the cached snapshot stale, e.g. after the catalog changed.
    pub fn invalidate(&self) {
        self.state().invalidated = true;
    }

    #[must_use]
    pub fn current(&self) -> DashboardSnapshot {
        self.state().snapshot.clone()
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;
    use dashboard_core::model::{Completion, UserId};

    fn key(user: &str) -> LoadKey {
        LoadKey {
            user: Some(UserId::new(user)),
            plan: None,
        }
    }

    fn snapshot_with_average(pct: u32) -> DashboardSnapshot {
        DashboardSnapshot {
            average: Completion::new(pct).unwrap(),
            ..DashboardSnapshot::empty()
        }
    }

    #[test]
    fn superseded_ticket_is_rejected() {
        let loader = DashboardLoader::new();
        let old = loader.begin(key("u1"));
        let new = loader.begin(key("u2"));

        assert!(loader.commit(&new, snapshot_with_average(70)));
        assert!(!loader.commit(&old, snapshot_with_average(10)));
        assert_eq!(loader.current().average.value(), 70);
    }

    #[test]
    fn late_old_result_does_not_clobber_pending_new_load() {
        let loader = DashboardLoader::new();
        let old = loader.begin(key("u1"));
        let _pending = loader.begin(key("u2"));

        assert!(!loader.commit(&old, snapshot_with_average(10)));
        assert_eq!(loader.current(), DashboardSnapshot::empty());
    }

    #[test]
    fn needs_reload_follows_key_and_invalidation() {
        let loader = DashboardLoader::new();
        assert!(loader.needs_reload(&key("u1")));

        loader.begin(key("u1"));
        assert!(!loader.needs_reload(&key("u1")));
        assert!(loader.needs_reload(&key("u2")));

        loader.invalidate();
        assert!(loader.needs_reload(&key("u1")));

        loader.begin(key("u1"));
        assert!(!loader.needs_reload(&key("u1")));
        assert_eq!(loader.generation(), 2);
    }

    #[test]
    fn concurrent_begins_leave_newest_key_current() {
        let loader = Arc::new(DashboardLoader::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let loader = Arc::clone(&loader);
                thread::spawn(move || {
                    (0..200)
                        .map(|i| loader.begin(key(&format!("u{t}-{i}"))))
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        let tickets: Vec<LoadTicket> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();

        let newest = tickets.iter().max_by_key(|t| t.generation).unwrap();
        assert_eq!(newest.generation, loader.generation());
        assert!(!loader.needs_reload(&newest.key));
        assert!(loader.commit(newest, snapshot_with_average(50)));
    }
}
