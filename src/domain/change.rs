// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

use std::fmt;
use std::path::{Path, PathBuf};

/// Per-category cap when rendering a status listing
pub const STATUS_LIST_CAP: usize = 10;

/// Above this many files a status listing reports how many were left out
pub const STATUS_TOTAL_CAP: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeStatus {
    Added,
    Modified,
    Deleted,
    Renamed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileCategory {
    Source,
    Test,
    Docs,
}

impl FileCategory {
    pub fn from_path(path: &Path) -> Self {
        let path_str = path.to_string_lossy();
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        if name.contains("_test.")
            || name.contains(".test.")
            || name.contains("_spec.")
            || name.contains(".spec.")
            || name.starts_with("test_")
            || path.starts_with("tests/")
            || path.starts_with("test/")
            || path.starts_with("__tests__/")
            || path_str.contains("/tests/")
            || path_str.contains("/test/")
            || path_str.contains("/__tests__/")
        {
            return Self::Test;
        }

        let stem = name.split('.').next().unwrap_or("").to_ascii_uppercase();
        if path.starts_with("docs/")
            || path.starts_with("doc/")
            || path_str.contains("/docs/")
            || matches!(ext, "md" | "mdx" | "rst" | "adoc")
            || matches!(stem.as_str(), "README" | "CHANGELOG" | "CONTRIBUTING" | "LICENSE")
        {
            return Self::Docs;
        }

        Self::Source
    }
}

/// One file touched by a unified diff
#[derive(Debug, Clone)]
pub struct FileChange {
    pub path: PathBuf,
    pub status: ChangeStatus,
    pub additions: usize,
    pub deletions: usize,
    pub category: FileCategory,
}

impl FileChange {
    fn new(path: &str) -> Self {
        let path = PathBuf::from(path);
        Self {
            category: FileCategory::from_path(&path),
            path,
            status: ChangeStatus::Modified,
            additions: 0,
            deletions: 0,
        }
    }

    fn set_path(&mut self, path: &str) {
        self.path = PathBuf::from(path);
        self.category = FileCategory::from_path(&self.path);
    }
}

/// Split a unified diff into per-file status and line counts.
///
/// Understands `git diff` headers (`new file mode`, `deleted file mode`,
/// `rename to`) as well as plain `---`/`+++` pairs using `/dev/null`.
/// Hunk bodies are consumed by the line counts in their `@@` header, so
/// content lines that look like headers are still counted as content.
pub fn parse_unified_diff(diff: &str) -> Vec<FileChange> {
    let mut files: Vec<FileChange> = Vec::new();
    let mut hunk = HunkRemaining::default();

    for line in diff.lines() {
        if !hunk.is_done() {
            let Some(current) = files.last_mut() else {
                hunk = HunkRemaining::default();
                continue;
            };
            match line.as_bytes().first() {
                Some(b'+') => {
                    current.additions += 1;
                    hunk.new = hunk.new.saturating_sub(1);
                }
                Some(b'-') => {
                    current.deletions += 1;
                    hunk.old = hunk.old.saturating_sub(1);
                }
                // "\ No newline at end of file"
                Some(b'\\') => {}
                _ => {
                    hunk.old = hunk.old.saturating_sub(1);
                    hunk.new = hunk.new.saturating_sub(1);
                }
            }
            continue;
        }

        if let Some(rest) = line.strip_prefix("diff --git ") {
            let path = rest
                .rsplit_once(" b/")
                .map(|(_, p)| p)
                .unwrap_or(rest)
                .trim_matches('"');
            files.push(FileChange::new(path));
            continue;
        }

        if line.starts_with("@@") {
            hunk = HunkRemaining::parse(line).unwrap_or_default();
            continue;
        }

        if let Some(old) = line.strip_prefix("--- ") {
            // A plain unified diff has no `diff --git` line to open the file
            if files.is_empty() || files.last().is_some_and(|f| f.additions + f.deletions > 0) {
                files.push(FileChange::new(strip_side_prefix(old, "a/")));
            }
            if old.trim() == "/dev/null" {
                if let Some(current) = files.last_mut() {
                    current.status = ChangeStatus::Added;
                }
            }
            continue;
        }
        if let Some(new) = line.strip_prefix("+++ ") {
            if let Some(current) = files.last_mut() {
                if new.trim() == "/dev/null" {
                    current.status = ChangeStatus::Deleted;
                } else {
                    current.set_path(strip_side_prefix(new, "b/"));
                }
            }
            continue;
        }

        let Some(current) = files.last_mut() else {
            continue;
        };
        if line.starts_with("new file mode") {
            current.status = ChangeStatus::Added;
        } else if line.starts_with("deleted file mode") {
            current.status = ChangeStatus::Deleted;
        } else if let Some(to) = line.strip_prefix("rename to ") {
            current.status = ChangeStatus::Renamed;
            current.set_path(to);
        }
    }

    files
}

/// Old and new side lines still expected in the current hunk
#[derive(Debug, Default, Clone, Copy)]
struct HunkRemaining {
    old: usize,
    new: usize,
}

impl HunkRemaining {
    /// `@@ -a[,b] +c[,d] @@`, where an omitted count means one line
    fn parse(header: &str) -> Option<Self> {
        let mut ranges = header.strip_prefix("@@")?.split_whitespace();
        let old = ranges.next()?.strip_prefix('-')?;
        let new = ranges.next()?.strip_prefix('+')?;
        Some(Self {
            old: range_len(old)?,
            new: range_len(new)?,
        })
    }

    fn is_done(&self) -> bool {
        self.old == 0 && self.new == 0
    }
}

fn range_len(range: &str) -> Option<usize> {
    match range.split_once(',') {
        Some((_, len)) => len.parse().ok(),
        None => range.parse::<usize>().ok().map(|_| 1),
    }
}

fn strip_side_prefix<'a>(path: &'a str, prefix: &str) -> &'a str {
    let path = path.trim().trim_matches('"');
    path.strip_prefix(prefix).unwrap_or(path)
}

/// Which changes a diff covers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DiffScope {
    /// Index against HEAD
    #[default]
    Staged,
    /// Working tree (staged and unstaged) against HEAD
    WorkingTree,
}

/// Insertion/deletion counts for one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStat {
    pub path: String,
    pub insertions: usize,
    pub deletions: usize,
}

impl fmt::Display for FileStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: +{} -{}", self.path, self.insertions, self.deletions)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenamedFile {
    pub from: String,
    pub to: String,
}

/// Working tree state as reported by the repository
#[derive(Debug, Clone, Default)]
pub struct RepoStatus {
    /// Any path with an index change
    pub staged: Vec<String>,
    pub modified: Vec<String>,
    pub created: Vec<String>,
    pub deleted: Vec<String>,
    pub renamed: Vec<RenamedFile>,
    /// Untracked paths
    pub not_added: Vec<String>,
}

/// Categorized path lists used when even per-file counts are too large
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusListing {
    pub added: Vec<String>,
    pub modified: Vec<String>,
    pub deleted: Vec<String>,
    pub renamed: Vec<RenamedFile>,
}

impl StatusListing {
    /// Staged scope keeps index changes only; working-tree scope adds
    /// unstaged and untracked paths.
    pub fn from_status(status: &RepoStatus, scope: DiffScope) -> Self {
        let in_scope = |path: &String| scope == DiffScope::WorkingTree || status.staged.contains(path);

        let mut added: Vec<String> = status.created.iter().filter(|p| in_scope(p)).cloned().collect();
        if scope == DiffScope::WorkingTree {
            added.extend(status.not_added.iter().cloned());
        }
        Self {
            added,
            modified: status.modified.iter().filter(|p| in_scope(p)).cloned().collect(),
            deleted: status.deleted.iter().filter(|p| in_scope(p)).cloned().collect(),
            renamed: status
                .renamed
                .iter()
                .filter(|r| in_scope(&r.to))
                .cloned()
                .collect(),
        }
    }

    pub fn total(&self) -> usize {
        self.added.len() + self.modified.len() + self.deleted.len() + self.renamed.len()
    }
}

impl fmt::Display for StatusListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let renamed: Vec<String> = self
            .renamed
            .iter()
            .map(|r| format!("{}→{}", r.from, r.to))
            .collect();

        let sections: [(&str, &[String]); 4] = [
            ("Added", &self.added),
            ("Modified", &self.modified),
            ("Deleted", &self.deleted),
            ("Renamed", &renamed),
        ];

        let mut listed = 0;
        let mut first = true;
        for (label, paths) in sections {
            if paths.is_empty() {
                continue;
            }
            if !first {
                writeln!(f)?;
            }
            first = false;

            let shown: Vec<&str> = paths
                .iter()
                .take(STATUS_LIST_CAP)
                .map(String::as_str)
                .collect();
            listed += shown.len();
            write!(f, "{label} ({}): {}", paths.len(), shown.join(", "))?;
            if paths.len() > shown.len() {
                write!(f, " (+{} more)", paths.len() - shown.len())?;
            }
        }

        let total = self.total();
        if total > STATUS_TOTAL_CAP && total > listed {
            write!(f, "\n... and {} more files not listed", total - listed)?;
        }

        Ok(())
    }
}

/// Raw representation of a pending change at one level of detail
#[derive(Debug, Clone)]
pub enum ChangeSet {
    Diff(String),
    Summary(Vec<FileStat>),
    Status(StatusListing),
}

impl ChangeSet {
    pub fn render(&self) -> String {
        match self {
            Self::Diff(diff) => diff.clone(),
            Self::Summary(stats) => stats
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("\n"),
            Self::Status(listing) => listing.to_string(),
        }
    }
}

/// Which reduction tier produced the prompt content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReductionStrategy {
    Full,
    Summary,
    Status,
    Truncated,
    Fallback,
}

impl ReductionStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Summary => "summary",
            Self::Status => "status",
            Self::Truncated => "truncated",
            Self::Fallback => "fallback",
        }
    }
}

impl fmt::Display for ReductionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct ReducedContent {
    pub content: String,
    pub strategy: ReductionStrategy,
}
