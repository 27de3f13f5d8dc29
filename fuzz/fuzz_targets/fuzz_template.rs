// SPDX-License-Identifier: PMPL-1.0-or-later
//
// Fuzz target for placeholder resolution.
// Run with: cargo +nightly fuzz run fuzz_template
//
// With every name defined as the empty string, resolution must succeed and
// never grow the text.

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        if input.len() <= 4096 {
            // Undefined names must be reported, never panic.
            let _ = druidq_query::resolve_with(input, None, |_| None);

            let resolved = druidq_query::resolve_with(input, None, |_| Some(String::new()))
                .expect("every name is defined");
            assert!(resolved.len() <= input.len());
        }
    }
});
