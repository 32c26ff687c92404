// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

use commitflow::domain::{FileStat, RenamedFile};
use commitflow::services::git::{parse_numstat, parse_porcelain};

// ─── Numstat ─────────────────────────────────────────────────────────────────

#[test]
fn numstat_lines_become_file_stats() {
    let output = "12\t3\tsrc/lib.rs\n0\t7\tREADME.md\n-\t-\tassets/logo.png\n";

    let stats = parse_numstat(output);

    assert_eq!(
        stats,
        vec![
            FileStat {
                path: "src/lib.rs".into(),
                insertions: 12,
                deletions: 3
            },
            FileStat {
                path: "README.md".into(),
                insertions: 0,
                deletions: 7
            },
            FileStat {
                path: "assets/logo.png".into(),
                insertions: 0,
                deletions: 0
            },
        ]
    );
    insta::assert_snapshot!(stats[0].to_string(), @"src/lib.rs: +12 -3");
}

#[test]
fn numstat_ignores_garbage() {
    assert!(parse_numstat("").is_empty());
    assert!(parse_numstat("not numstat output").is_empty());
}

// ─── Porcelain status ────────────────────────────────────────────────────────

#[test]
fn porcelain_splits_index_and_worktree_changes() {
    let output = "M  src/staged.rs\0 M src/unstaged.rs\0A  src/new.rs\0D  old.rs\0?? scratch.txt\0";

    let status = parse_porcelain(output);

    assert_eq!(status.staged, vec!["src/staged.rs", "src/new.rs", "old.rs"]);
    assert_eq!(status.modified, vec!["src/staged.rs", "src/unstaged.rs"]);
    assert_eq!(status.created, vec!["src/new.rs"]);
    assert_eq!(status.deleted, vec!["old.rs"]);
    assert_eq!(status.not_added, vec!["scratch.txt"]);
}

#[test]
fn porcelain_renames_read_the_source_entry() {
    let output = "R  src/new_name.rs\0src/old_name.rs\0M  other.rs\0";

    let status = parse_porcelain(output);

    assert_eq!(
        status.renamed,
        vec![RenamedFile {
            from: "src/old_name.rs".into(),
            to: "src/new_name.rs".into(),
        }]
    );
    assert_eq!(status.modified, vec!["other.rs"]);
    assert_eq!(status.staged, vec!["src/new_name.rs", "other.rs"]);
}

#[test]
fn porcelain_modified_in_both_columns_is_listed_once() {
    let status = parse_porcelain("MM src/lib.rs\0");
    assert_eq!(status.modified, vec!["src/lib.rs"]);
}
