//! Per-post mutual exclusion.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use uuid::Uuid;

/// Keyed async locks, one per post id with an active holder or waiter.
///
/// Entries are created on demand and removed when the last holder or waiter
/// for a post goes away, so the map only holds posts that are being mutated
/// right now.
#[derive(Default)]
pub struct PostLocks {
    inner: Mutex<HashMap<Uuid, Entry>>,
}

#[derive(Default)]
struct Entry {
    lock: Arc<AsyncMutex<()>>,
    users: usize,
}

impl PostLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `id`.
    pub async fn acquire(&self, id: Uuid) -> PostGuard<'_> {
        let lock = {
            let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            let entry = map.entry(id).or_default();
            entry.users += 1;
            entry.lock.clone()
        };

        // Registered before waiting: a cancelled waiter still releases its slot.
        let mut guard = PostGuard {
            locks: self,
            id,
            held: None,
        };
        guard.held = Some(lock.lock_owned().await);
        guard
    }

    /// Number of posts currently locked or waited on.
    pub fn active(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Held while a post is being read, mutated and saved.
pub struct PostGuard<'a> {
    locks: &'a PostLocks,
    id: Uuid,
    held: Option<OwnedMutexGuard<()>>,
}

impl Drop for PostGuard<'_> {
    fn drop(&mut self) {
        drop(self.held.take());

        let mut map = self
            .locks
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(entry) = map.get_mut(&self.id) {
            entry.users = entry.users.saturating_sub(1);
            if entry.users == 0 {
                map.remove(&self.id);
            }
        }
    }
}
