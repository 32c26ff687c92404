// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

#![no_main]

use libfuzzer_sys::fuzz_target;

use commitflow::domain::GenerationOptions;
use commitflow::services::sanitizer::CommitSanitizer;

fuzz_target!(|data: &[u8]| {
    let Ok(raw) = std::str::from_utf8(data) else {
        return;
    };

    for body in [false, true] {
        let options = GenerationOptions {
            body,
            ..GenerationOptions::default()
        };
        let message = CommitSanitizer::sanitize(raw, &options);
        assert!(!message.subject.is_empty());
        assert!(!message.subject.contains(['\n', '`']));

        let again = CommitSanitizer::sanitize(&message.subject, &options);
        assert_eq!(again.subject, message.subject);
    }
});
