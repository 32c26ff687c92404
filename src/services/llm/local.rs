// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

//! Rule-based commit messages for when no backend answers.

use crate::domain::{ChangeStatus, CommitType, FileCategory, FileChange, parse_unified_diff};

/// File names longer than this are replaced by a file count
const MAX_TARGET_CHARS: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Add,
    Remove,
    CleanUp,
    Update,
}

impl Action {
    fn verb(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Remove => "remove",
            Self::CleanUp => "clean up",
            Self::Update => "update",
        }
    }
}

pub struct LocalHeuristic;

impl LocalHeuristic {
    /// Derive a subject from file statuses and line counts in `diff`.
    /// Returns `None` when the diff names no files.
    pub fn generate(diff: &str, conventional: bool) -> Option<String> {
        let files = parse_unified_diff(diff);
        if files.is_empty() {
            return None;
        }

        let (commit_type, action) = Self::classify(&files);
        let description = format!("{} {}", action.verb(), Self::target(&files));

        Some(if conventional {
            format!("{commit_type}: {description}")
        } else {
            capitalize(&description)
        })
    }

    fn classify(files: &[FileChange]) -> (CommitType, Action) {
        let count = files.len();
        let added = files
            .iter()
            .filter(|f| f.status == ChangeStatus::Added)
            .count();
        let deleted = files
            .iter()
            .filter(|f| f.status == ChangeStatus::Deleted)
            .count();
        let insertions: usize = files.iter().map(|f| f.additions).sum();
        let deletions: usize = files.iter().map(|f| f.deletions).sum();

        let action = if added == count {
            Action::Add
        } else if deleted == count {
            Action::Remove
        } else if added == 0 && deleted == 0 && deletions > insertions {
            Action::CleanUp
        } else {
            Action::Update
        };

        let touches = |category: FileCategory| files.iter().any(|f| f.category == category);

        // Test and docs paths win over the status-based types
        let commit_type = if touches(FileCategory::Test) {
            CommitType::Test
        } else if touches(FileCategory::Docs) {
            CommitType::Docs
        } else if action == Action::Add {
            CommitType::Feat
        } else {
            CommitType::Chore
        };

        (commit_type, action)
    }

    fn target(files: &[FileChange]) -> String {
        if let [file] = files {
            let name = file
                .path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default();
            if !name.is_empty() && name.chars().count() <= MAX_TARGET_CHARS {
                return name.to_string();
            }
            return "1 file".to_string();
        }
        format!("{} files", files.len())
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
