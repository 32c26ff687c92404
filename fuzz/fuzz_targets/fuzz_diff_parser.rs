// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

#![no_main]

use libfuzzer_sys::fuzz_target;

use commitflow::domain::parse_unified_diff;
use commitflow::services::llm::local::LocalHeuristic;

fuzz_target!(|data: &[u8]| {
    let Ok(diff) = std::str::from_utf8(data) else {
        return;
    };

    let files = parse_unified_diff(diff);
    let subject = LocalHeuristic::generate(diff, true);
    assert_eq!(files.is_empty(), subject.is_none());
});
