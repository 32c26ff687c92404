// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

mod helpers;

use std::path::Path;

use commitflow::domain::{ChangeStatus, FileCategory, parse_unified_diff};
use commitflow::services::llm::local::LocalHeuristic;
use helpers::{added_file_diff, deleted_file_diff, modified_file_diff};

fn conventional(diff: &str) -> String {
    LocalHeuristic::generate(diff, true).unwrap()
}

// ─── Diff parsing ────────────────────────────────────────────────────────────

#[test]
fn parses_git_headers() {
    let diff = [
        added_file_diff("src/new.rs", &["fn a() {}", "fn b() {}"]),
        modified_file_diff("src/lib.rs", 2, 1),
        deleted_file_diff("src/old.rs", 4),
    ]
    .concat();

    let files = parse_unified_diff(&diff);
    assert_eq!(files.len(), 3);

    assert_eq!(files[0].path, Path::new("src/new.rs"));
    assert_eq!(files[0].status, ChangeStatus::Added);
    assert_eq!((files[0].additions, files[0].deletions), (2, 0));

    assert_eq!(files[1].status, ChangeStatus::Modified);
    assert_eq!((files[1].additions, files[1].deletions), (2, 1));

    assert_eq!(files[2].path, Path::new("src/old.rs"));
    assert_eq!(files[2].status, ChangeStatus::Deleted);
    assert_eq!(files[2].deletions, 4);
}

#[test]
fn parses_plain_unified_diff_pairs() {
    let diff = "--- a/one.txt\n+++ b/one.txt\n@@ -1 +1 @@\n-a\n+b\n--- /dev/null\n+++ b/two.txt\n@@ -0,0 +1 @@\n+new\n";

    let files = parse_unified_diff(diff);
    assert_eq!(files.len(), 2);
    assert_eq!((files[0].additions, files[0].deletions), (1, 1));
    assert_eq!(files[1].path, Path::new("two.txt"));
    assert_eq!(files[1].status, ChangeStatus::Added);
}

#[test]
fn parses_renames() {
    let diff = "diff --git a/old.rs b/new.rs\nsimilarity index 100%\nrename from old.rs\nrename to new.rs\n";

    let files = parse_unified_diff(diff);
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].status, ChangeStatus::Renamed);
    assert_eq!(files[0].path, Path::new("new.rs"));
}

#[test]
fn header_lookalikes_inside_a_hunk_are_content() {
    let diff = [
        "diff --git a/schema.sql b/schema.sql\n",
        "index 1111111..2222222 100644\n",
        "--- a/schema.sql\n",
        "+++ b/schema.sql\n",
        "@@ -1,2 +1,2 @@\n",
        "--- drop the legacy table\n",
        "+++ keep the legacy table\n",
        " CREATE TABLE users (id INT);\n",
        "@@ -10,1 +10,2 @@\n",
        " -- trailing context\n",
        "+INSERT INTO users VALUES (1);\n",
    ]
    .concat();

    let files = parse_unified_diff(&diff);
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].path, Path::new("schema.sql"));
    assert_eq!((files[0].additions, files[0].deletions), (2, 1));
}

#[test]
fn no_newline_marker_is_not_counted() {
    let diff = "--- a/a.txt\n+++ b/a.txt\n@@ -1 +1 @@\n-a\n\\ No newline at end of file\n+b\n";

    let files = parse_unified_diff(diff);
    assert_eq!(files.len(), 1);
    assert_eq!((files[0].additions, files[0].deletions), (1, 1));
}

#[test]
fn categorizes_paths() {
    assert_eq!(FileCategory::from_path(Path::new("README.md")), FileCategory::Docs);
    assert_eq!(FileCategory::from_path(Path::new("docs/guide.rst")), FileCategory::Docs);
    assert_eq!(FileCategory::from_path(Path::new("tests/parser.rs")), FileCategory::Test);
    assert_eq!(FileCategory::from_path(Path::new("src/app.test.ts")), FileCategory::Test);
    assert_eq!(FileCategory::from_path(Path::new("src/main.rs")), FileCategory::Source);
    assert_eq!(FileCategory::from_path(Path::new("requirements.txt")), FileCategory::Source);
}

// ─── Classification ──────────────────────────────────────────────────────────

#[test]
fn new_file_is_a_feature() {
    let diff = added_file_diff("app.js", &["export function foo(){}"]);
    let subject = conventional(&diff);

    assert!(subject.starts_with("feat: add "), "{subject}");
    insta::assert_snapshot!(subject, @"feat: add app.js");
}

#[test]
fn net_removal_is_a_cleanup_chore() {
    let diff = modified_file_diff("util.js", 2, 25);
    insta::assert_snapshot!(conventional(&diff), @"chore: clean up util.js");
}

#[test]
fn deleted_files_are_a_removal_chore() {
    let diff = [deleted_file_diff("a.js", 3), deleted_file_diff("b.js", 1)].concat();
    assert_eq!(conventional(&diff), "chore: remove 2 files");
}

#[test]
fn mixed_changes_are_an_update_chore() {
    let diff = [
        added_file_diff("src/new.rs", &["fn a() {}"]),
        modified_file_diff("src/lib.rs", 5, 1),
    ]
    .concat();
    assert_eq!(conventional(&diff), "chore: update 2 files");
}

#[test]
fn documentation_only_is_docs() {
    let diff = modified_file_diff("README.md", 3, 1);
    assert_eq!(conventional(&diff), "docs: update README.md");
}

#[test]
fn test_only_is_test() {
    let diff = modified_file_diff("tests/parser.rs", 4, 2);
    assert_eq!(conventional(&diff), "test: update parser.rs");
}

#[test]
fn touching_tests_alongside_source_is_test() {
    let diff = [
        modified_file_diff("src/lib.rs", 3, 1),
        modified_file_diff("tests/lib_test.rs", 12, 0),
    ]
    .concat();
    assert_eq!(conventional(&diff), "test: update 2 files");
}

#[test]
fn touching_docs_alongside_source_is_docs() {
    let diff = [
        modified_file_diff("src/lib.rs", 3, 1),
        modified_file_diff("README.md", 2, 2),
    ]
    .concat();
    assert_eq!(conventional(&diff), "docs: update 2 files");
}

#[test]
fn test_paths_take_precedence_over_docs_and_new_files() {
    let diff = [
        added_file_diff("docs/guide.md", &["# Guide"]),
        added_file_diff("tests/guide_test.rs", &["#[test] fn t() {}"]),
    ]
    .concat();
    assert_eq!(conventional(&diff), "test: add 2 files");
}

#[test]
fn plain_style_is_capitalized_without_prefix() {
    let diff = added_file_diff("app.js", &["export function foo(){}"]);
    assert_eq!(LocalHeuristic::generate(&diff, false).unwrap(), "Add app.js");
}

#[test]
fn long_file_names_become_a_count() {
    let name = format!("{}.rs", "very_long_module_name_".repeat(3));
    let diff = modified_file_diff(&name, 1, 0);
    assert_eq!(conventional(&diff), "chore: update 1 file");
}

#[test]
fn empty_diff_has_no_heuristic_message() {
    assert_eq!(LocalHeuristic::generate("", true), None);
    assert_eq!(LocalHeuristic::generate("not a diff", true), None);
}
