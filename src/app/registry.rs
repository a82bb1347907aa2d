//! The rumor registry — exclusive-access collection plus snapshot persistence.
//!
//! One `std::sync::Mutex` guards the collection; every operation holds it for
//! its full duration, including the snapshot write, so registry operations
//! are linearizable against each other and against the storage path. The
//! HTTP handlers, the dispatch worker, and startup all go through this type —
//! nothing else may hold a reference to the collection.
//!
//! Lock acquisition is bounded: callers get [`Error::Busy`] instead of an
//! unbounded wait, and decide themselves whether to retry.

use std::sync::{Mutex, MutexGuard, TryLockError};
use std::time::{Duration, Instant};

use log::{error, info, warn};

use crate::error::{Error, Result};

use super::ports::SnapshotStore;
use super::rumor::{Rumor, RumorDraft, RumorPatch};

/// Spacing between `try_lock` attempts while waiting for the guard.
const LOCK_RETRY: Duration = Duration::from_millis(2);

struct Shelf {
    rumors: Vec<Rumor>,
    /// Id watermark. Strictly increasing for the process lifetime, so ids
    /// are never reused even after the highest-numbered rumor is deleted.
    next_id: u32,
}

/// Mutex-guarded rumor collection synchronized to a [`SnapshotStore`].
pub struct RumorRegistry<S: SnapshotStore> {
    shelf: Mutex<Shelf>,
    store: S,
    lock_timeout: Duration,
    default_max_prints: u16,
}

impl<S: SnapshotStore> RumorRegistry<S> {
    /// Build a registry over an already-loaded collection.
    pub fn new(
        store: S,
        rumors: Vec<Rumor>,
        lock_timeout: Duration,
        default_max_prints: u16,
    ) -> Self {
        let next_id = rumors.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        Self {
            shelf: Mutex::new(Shelf { rumors, next_id }),
            store,
            lock_timeout,
            default_max_prints,
        }
    }

    /// Load the snapshot from `store` and build the registry.
    ///
    /// A failed load degrades to an empty collection — the controller keeps
    /// serving and printing rather than refusing to start.
    pub fn open(store: S, lock_timeout: Duration, default_max_prints: u16) -> Self {
        let rumors = match store.load() {
            Ok(rumors) => {
                info!("registry: loaded {} rumors", rumors.len());
                rumors
            }
            Err(e) => {
                error!("registry: snapshot load failed ({e}), starting empty");
                Vec::new()
            }
        };
        Self::new(store, rumors, lock_timeout, default_max_prints)
    }

    // ── Operations ────────────────────────────────────────────

    /// All rumors whose tags match `filter` (see [`Rumor::matches_filter`]),
    /// in insertion order. `None` or an empty filter returns everything.
    pub fn list(&self, filter: Option<&str>) -> Result<Vec<Rumor>> {
        let shelf = self.lock()?;
        let needle = filter.unwrap_or("");
        Ok(shelf
            .rumors
            .iter()
            .filter(|r| r.matches_filter(needle))
            .cloned()
            .collect())
    }

    /// Create a rumor under the next id and persist.
    pub fn create(&self, draft: RumorDraft) -> Result<Rumor> {
        let mut shelf = self.lock()?;
        let id = shelf.next_id;
        shelf.next_id += 1;
        let rumor = draft.into_rumor(id, self.default_max_prints);
        shelf.rumors.push(rumor.clone());
        self.persist(&shelf.rumors);
        Ok(rumor)
    }

    /// Merge `patch` onto the rumor with `id` and persist.
    pub fn update(&self, id: u32, patch: RumorPatch) -> Result<Rumor> {
        let mut shelf = self.lock()?;
        let rumor = shelf
            .rumors
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(Error::NotFound)?;
        patch.apply(rumor);
        let updated = rumor.clone();
        self.persist(&shelf.rumors);
        Ok(updated)
    }

    /// Remove the rumor with `id` and persist.
    pub fn delete(&self, id: u32) -> Result<()> {
        let mut shelf = self.lock()?;
        let idx = shelf
            .rumors
            .iter()
            .position(|r| r.id == id)
            .ok_or(Error::NotFound)?;
        shelf.rumors.remove(idx);
        self.persist(&shelf.rumors);
        Ok(())
    }

    /// Set one rumor's printed count back to zero and persist.
    pub fn reset_count(&self, id: u32) -> Result<()> {
        let mut shelf = self.lock()?;
        let rumor = shelf
            .rumors
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(Error::NotFound)?;
        rumor.printed_count = 0;
        self.persist(&shelf.rumors);
        Ok(())
    }

    /// Set every rumor's printed count back to zero and persist.
    pub fn reset_all_counts(&self) -> Result<()> {
        let mut shelf = self.lock()?;
        for rumor in &mut shelf.rumors {
            rumor.printed_count = 0;
        }
        self.persist(&shelf.rumors);
        Ok(())
    }

    /// Pick one eligible rumor uniformly at random, charge one print against
    /// its quota, persist, and return it. `Ok(None)` when nothing qualifies.
    ///
    /// The increment and its snapshot happen under the same guard as the
    /// selection, so no other operation can observe the pre-increment state
    /// once this returns.
    pub fn select_eligible(&self) -> Result<Option<Rumor>> {
        let mut shelf = self.lock()?;
        let eligible: Vec<usize> = shelf
            .rumors
            .iter()
            .enumerate()
            .filter(|(_, r)| r.eligible())
            .map(|(i, _)| i)
            .collect();
        if eligible.is_empty() {
            return Ok(None);
        }
        let idx = eligible[random_below(eligible.len())];
        shelf.rumors[idx].printed_count += 1;
        let chosen = shelf.rumors[idx].clone();
        self.persist(&shelf.rumors);
        Ok(Some(chosen))
    }

    /// Number of stored rumors.
    pub fn count(&self) -> Result<usize> {
        Ok(self.lock()?.rumors.len())
    }

    /// The snapshot store this registry persists through.
    pub fn store(&self) -> &S {
        &self.store
    }

    // ── Internal ──────────────────────────────────────────────

    /// Bounded lock acquisition. `try_lock` is retried at a short interval
    /// until the configured timeout, then the caller gets [`Error::Busy`].
    fn lock(&self) -> Result<MutexGuard<'_, Shelf>> {
        let deadline = Instant::now() + self.lock_timeout;
        loop {
            match self.shelf.try_lock() {
                Ok(guard) => return Ok(guard),
                // A panicked holder must not brick the controller; report
                // the lock as contended and let the caller retry.
                Err(TryLockError::Poisoned(_)) => return Err(Error::Busy),
                Err(TryLockError::WouldBlock) => {
                    if Instant::now() >= deadline {
                        return Err(Error::Busy);
                    }
                    std::thread::sleep(LOCK_RETRY);
                }
            }
        }
    }

    /// Snapshot the collection while the guard is held. A failed save is a
    /// warning, not an error: the in-memory mutation stands and the next
    /// successful save closes the gap.
    fn persist(&self, rumors: &[Rumor]) {
        if let Err(e) = self.store.save(rumors) {
            warn!("registry: snapshot save failed ({e}), memory ahead of flash");
        }
    }
}

// ── Platform randomness ──────────────────────────────────────

/// Uniform index below `n` from the hardware RNG.
#[cfg(target_os = "espidf")]
fn random_below(n: usize) -> usize {
    // SAFETY: esp_random reads the hardware RNG register; no preconditions.
    (unsafe { esp_idf_sys::esp_random() } as usize) % n
}

/// Simulation fallback — hasher-seeded, non-cryptographic. Selection only
/// needs "roughly uniform", not secure randomness.
#[cfg(not(target_os = "espidf"))]
fn random_below(n: usize) -> usize {
    use std::collections::hash_map::RandomState;
    use std::hash::{BuildHasher, Hasher};

    let s = RandomState::new();
    (s.build_hasher().finish() as usize) % n
}
