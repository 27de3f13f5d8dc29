// SPDX-License-Identifier: PMPL-1.0-or-later
//
// Fuzz target for comment directive extraction.
// Run with: cargo +nightly fuzz run fuzz_directives
//
// Extraction must never panic, and every line it keeps must come from the
// input unchanged.

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        if input.len() <= 4096 {
            let found = druidq_query::extract(input);
            if !found.query.is_empty() {
                let original: Vec<&str> = input.split('\n').collect();
                for line in found.query.split('\n') {
                    assert!(original.contains(&line), "invented line {line:?}");
                }
            }
        }
    }
});
