// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::domain::{DiffScope, FileStat, RenamedFile, RepoStatus};
use crate::error::{Error, Result};

/// Read-only view of a repository used by the generation pipeline.
#[async_trait]
pub trait Repository: Send + Sync {
    async fn status(&self) -> Result<RepoStatus>;

    /// Unified diff text for the scope
    async fn diff(&self, scope: DiffScope) -> Result<String>;

    /// Per-file insertion/deletion counts for the scope
    async fn diff_summary(&self, scope: DiffScope) -> Result<Vec<FileStat>>;
}

pub struct GitService {
    work_dir: PathBuf,
    state: Option<gix::state::InProgress>,
}

impl GitService {
    pub fn discover() -> Result<Self> {
        let repo = gix::discover(".").map_err(|_| Error::NotAGitRepo)?;

        let work_dir = repo
            .work_dir()
            .ok_or_else(|| Error::Git("Bare repository not supported".into()))?
            .to_path_buf();

        Ok(Self {
            work_dir,
            state: repo.state(),
        })
    }

    pub fn check_state(&self) -> Result<()> {
        if matches!(self.state, Some(gix::state::InProgress::Merge)) {
            return Err(Error::MergeInProgress);
        }
        Ok(())
    }

    pub fn work_dir(&self) -> &std::path::Path {
        &self.work_dir
    }

    async fn git(&self, args: &[&str]) -> Result<String> {
        debug!(?args, "running git");
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.work_dir)
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Git(stderr.trim().to_string()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn diff_args(scope: DiffScope) -> Vec<&'static str> {
        // --no-ext-diff: don't use external diff tools
        let mut args = vec!["diff", "--no-ext-diff", "--no-color", "--unified=3"];
        match scope {
            DiffScope::Staged => args.push("--cached"),
            DiffScope::WorkingTree => args.push("HEAD"),
        }
        args
    }

    /// Stage every change in the working tree, including untracked files
    pub async fn stage_all(&self) -> Result<()> {
        self.git(&["add", "-A"]).await.map(|_| ())
    }

    pub async fn commit(&self, message: &str) -> Result<()> {
        self.git(&["commit", "-m", message]).await.map(|_| ())
    }
}

#[async_trait]
impl Repository for GitService {
    async fn status(&self) -> Result<RepoStatus> {
        let output = self
            .git(&["status", "--porcelain=v1", "-z", "--untracked-files=all"])
            .await?;
        Ok(parse_porcelain(&output))
    }

    async fn diff(&self, scope: DiffScope) -> Result<String> {
        self.git(&Self::diff_args(scope)).await
    }

    async fn diff_summary(&self, scope: DiffScope) -> Result<Vec<FileStat>> {
        let mut args = Self::diff_args(scope);
        args.push("--numstat");
        let output = self.git(&args).await?;
        Ok(parse_numstat(&output))
    }
}

/// Parse `git diff --numstat` output. Binary files report `-` and count as zero.
pub fn parse_numstat(output: &str) -> Vec<FileStat> {
    output
        .lines()
        .filter_map(|line| {
            let mut parts = line.splitn(3, '\t');
            let insertions = parts.next()?;
            let deletions = parts.next()?;
            let path = parts.next()?;
            Some(FileStat {
                path: path.to_string(),
                insertions: insertions.parse().unwrap_or(0),
                deletions: deletions.parse().unwrap_or(0),
            })
        })
        .collect()
}

/// Parse `git status --porcelain=v1 -z` output.
pub fn parse_porcelain(output: &str) -> RepoStatus {
    let mut status = RepoStatus::default();
    let mut entries = output.split('\0').filter(|e| !e.is_empty());

    fn push_unique(list: &mut Vec<String>, path: &str) {
        if !list.iter().any(|p| p == path) {
            list.push(path.to_string());
        }
    }

    while let Some(entry) = entries.next() {
        if entry.len() < 4 || !entry.is_char_boundary(3) {
            continue;
        }
        let mut code = entry[..2].chars();
        let (Some(x), Some(y)) = (code.next(), code.next()) else {
            continue;
        };
        let path = &entry[3..];

        if x == '?' && y == '?' {
            push_unique(&mut status.not_added, path);
            continue;
        }

        if x != ' ' {
            push_unique(&mut status.staged, path);
        }

        match x {
            // With -z the source path follows as its own entry
            'R' => {
                let from = entries.next().unwrap_or_default();
                status.renamed.push(RenamedFile {
                    from: from.to_string(),
                    to: path.to_string(),
                });
            }
            'C' => {
                entries.next();
                push_unique(&mut status.created, path);
            }
            'A' => push_unique(&mut status.created, path),
            _ => {}
        }

        if x == 'M' || y == 'M' {
            push_unique(&mut status.modified, path);
        }
        if x == 'D' || y == 'D' {
            push_unique(&mut status.deleted, path);
        }
    }

    status
}
