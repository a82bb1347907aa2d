//! Registry scenarios end-to-end against recording and real file stores.

use std::time::Duration;

use rumormill::adapters::fs_store::FsStore;
use rumormill::app::{RumorPatch, RumorRegistry};
use rumormill::error::Error;

use crate::mock_hw::{MemStore, draft};

const TIMEOUT: Duration = Duration::from_millis(200);

fn registry() -> RumorRegistry<MemStore> {
    RumorRegistry::new(MemStore::new(), Vec::new(), TIMEOUT, 5)
}

#[test]
fn single_quota_rumor_prints_once_then_runs_dry() {
    let reg = registry();
    let a = reg.create(draft("A", true, Some(1))).unwrap();

    let selected = reg.select_eligible().unwrap().expect("A is eligible");
    assert_eq!(selected.id, a.id);
    assert_eq!(selected.printed_count, 1);

    assert_eq!(reg.select_eligible().unwrap(), None);
}

#[test]
fn inactive_rumors_are_invisible_to_selection() {
    let reg = registry();
    reg.create(draft("A", false, Some(100))).unwrap();
    let b = reg.create(draft("B", true, Some(5))).unwrap();

    for _ in 0..5 {
        assert_eq!(reg.select_eligible().unwrap().unwrap().id, b.id);
    }
    assert_eq!(reg.select_eligible().unwrap(), None);
}

#[test]
fn every_mutation_snapshots_before_returning() {
    let reg = registry();
    let a = reg.create(draft("A", true, None)).unwrap();
    assert_eq!(reg.store().save_count(), 1);

    reg.update(a.id, RumorPatch::default()).unwrap();
    assert_eq!(reg.store().save_count(), 2);

    reg.select_eligible().unwrap().unwrap();
    assert_eq!(reg.store().save_count(), 3);
    assert_eq!(reg.store().snapshot()[0].printed_count, 1);

    reg.reset_all_counts().unwrap();
    assert_eq!(reg.store().save_count(), 4);

    reg.delete(a.id).unwrap();
    assert_eq!(reg.store().save_count(), 5);
    assert!(reg.store().snapshot().is_empty());
}

#[test]
fn selection_survives_a_process_restart() {
    let path = std::env::temp_dir().join(format!(
        "rumormill-reload-{}.json",
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);

    let reg = RumorRegistry::open(FsStore::new(&path), TIMEOUT, 5);
    reg.create(draft("A", true, Some(3))).unwrap();
    reg.select_eligible().unwrap().unwrap();

    // Second registry over the same document — the "rebooted" device.
    let reopened = RumorRegistry::open(FsStore::new(&path), TIMEOUT, 5);
    let rumors = reopened.list(None).unwrap();
    assert_eq!(rumors.len(), 1);
    assert_eq!(rumors[0].printed_count, 1);
    assert_eq!(rumors[0].title, "A");

    std::fs::remove_file(path).unwrap();
}

#[test]
fn reset_targets_only_the_requested_rumor() {
    let reg = registry();
    let a = reg.create(draft("A", true, Some(5))).unwrap();
    let b = reg.create(draft("B", false, Some(5))).unwrap();

    // Spend two prints on A (B is inactive, so never chosen).
    reg.select_eligible().unwrap().unwrap();
    reg.select_eligible().unwrap().unwrap();
    reg.update(b.id, patch_counts(4)).unwrap();

    reg.reset_count(a.id).unwrap();
    let rumors = reg.list(None).unwrap();
    assert_eq!(find(&rumors, a.id).printed_count, 0);
    assert_eq!(find(&rumors, b.id).max_prints, 4);
}

/// Store whose saves take long enough to pin the lock — persistence I/O
/// happens under the guard, so a slow flash serializes every caller.
struct SlowStore(Duration);

impl rumormill::app::ports::SnapshotStore for SlowStore {
    fn save(
        &self,
        _rumors: &[rumormill::app::Rumor],
    ) -> Result<(), rumormill::error::StorageError> {
        std::thread::sleep(self.0);
        Ok(())
    }

    fn load(&self) -> Result<Vec<rumormill::app::Rumor>, rumormill::error::StorageError> {
        Ok(Vec::new())
    }
}

#[test]
fn busy_callers_get_a_typed_retryable_error() {
    let reg = RumorRegistry::new(
        SlowStore(Duration::from_millis(300)),
        Vec::new(),
        Duration::from_millis(60),
        5,
    );

    std::thread::scope(|s| {
        let writer = s.spawn(|| reg.create(draft("A", true, None)).unwrap());
        // Let the writer take the lock and start its slow save...
        std::thread::sleep(Duration::from_millis(50));
        // ...and watch a second caller bounce off the bound.
        assert_eq!(reg.list(None).unwrap_err(), Error::Busy);
        writer.join().unwrap();
    });

    // Once the save finishes the same call goes through.
    assert_eq!(reg.list(None).unwrap().len(), 1);
}

fn patch_counts(max_prints: u16) -> RumorPatch {
    RumorPatch {
        max_prints: Some(max_prints),
        ..RumorPatch::default()
    }
}

fn find(rumors: &[rumormill::app::Rumor], id: u32) -> &rumormill::app::Rumor {
    rumors.iter().find(|r| r.id == id).unwrap()
}
