//! Query-string parsing takes attacker-shaped input straight off the AP.

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(query) = std::str::from_utf8(data) {
        let _ = rumormill::web::query_param(query, "name");
    }
});
