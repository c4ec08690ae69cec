use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use crate::api::ReturnsClient;
use crate::models::Role;
use crate::services::return_details::ReturnDetails;

/// Identifies one open details view
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DetailsKey {
    pub session: String,
    pub role: Role,
    pub return_id: String,
}

pub struct OpenDetails {
    pub details: ReturnDetails<ReturnsClient>,
    last_used: Instant,
    /// Loaded or changed by an action and not shown yet
    unseen: bool,
}

impl OpenDetails {
    fn new(details: ReturnDetails<ReturnsClient>) -> Self {
        Self {
            details,
            last_used: Instant::now(),
            unseen: true,
        }
    }

    pub fn touch(&mut self) {
        self.last_used = Instant::now();
    }

    /// Flag the current state as the outcome of an action
    pub fn mark_unseen(&mut self) {
        self.unseen = true;
    }

    /// Whether the state still has to be shown as-is; clears the flag
    pub fn take_unseen(&mut self) -> bool {
        std::mem::take(&mut self.unseen)
    }
}

/// Open details views, one per session, role and return
#[derive(Default)]
pub struct DetailsStore {
    entries: RwLock<HashMap<DetailsKey, Arc<Mutex<OpenDetails>>>>,
}

impl DetailsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock the view, opening it first when it is not open.
    ///
    /// An existing entry is never replaced, so a holder keeps the only
    /// lock for its key. Returns `None` while another request holds the view.
    pub async fn acquire(
        &self,
        key: DetailsKey,
        client: ReturnsClient,
    ) -> Option<OwnedMutexGuard<OpenDetails>> {
        let existing = self.entries.read().await.get(&key).cloned();
        let entry = match existing {
            Some(entry) => entry,
            None => {
                let details = ReturnDetails::open(client.clone(), key.return_id.clone(), key.role).await;
                let opened = Arc::new(Mutex::new(OpenDetails::new(details)));
                // Another request may have opened it meanwhile
                self.entries
                    .write()
                    .await
                    .entry(key)
                    .or_insert(opened)
                    .clone()
            }
        };

        let mut guard = entry.try_lock_owned().ok()?;
        guard.details.rebind(client);
        guard.touch();
        Some(guard)
    }

    /// Drop views idle for longer than `max_idle`; views in use are kept
    pub async fn prune_idle(&self, max_idle: Duration) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| match entry.try_lock() {
            Ok(open) => open.last_used.elapsed() <= max_idle,
            Err(_) => true,
        });
        before - entries.len()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}
