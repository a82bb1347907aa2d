//! The snapshot loader must never panic on a mangled document — a corrupt
//! flash page degrades to `StorageError::Corrupted`, not a boot loop.

#![no_main]

use libfuzzer_sys::fuzz_target;
use rumormill::app::rumor::Rumor;

fuzz_target!(|data: &[u8]| {
    let _ = serde_json::from_slice::<Vec<Rumor>>(data);
});
