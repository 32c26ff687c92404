// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use commitflow::config::Backend;
use commitflow::domain::{DiffScope, FileStat, RepoStatus};
use commitflow::error::{Error, Result};
use commitflow::services::git::Repository;
use commitflow::services::llm::{LlmProvider, RequestParams};

// ─── Repository fake ─────────────────────────────────────────────────────────

/// In-memory repository returning canned views. `None` fields fail.
#[allow(dead_code)]
#[derive(Default)]
pub struct FakeRepository {
    pub diff: Option<String>,
    pub summary: Option<Vec<FileStat>>,
    pub status: Option<RepoStatus>,
}

#[allow(dead_code)]
impl FakeRepository {
    pub fn with_diff(diff: impl Into<String>) -> Self {
        Self {
            diff: Some(diff.into()),
            summary: Some(Vec::new()),
            status: Some(RepoStatus::default()),
        }
    }

    pub fn summary(mut self, summary: Vec<FileStat>) -> Self {
        self.summary = Some(summary);
        self
    }

    pub fn status(mut self, status: RepoStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn failing_summary(mut self) -> Self {
        self.summary = None;
        self
    }

    pub fn failing_status(mut self) -> Self {
        self.status = None;
        self
    }
}

#[async_trait]
impl Repository for FakeRepository {
    async fn status(&self) -> Result<RepoStatus> {
        self.status
            .clone()
            .ok_or_else(|| Error::Git("status unavailable".into()))
    }

    async fn diff(&self, _scope: DiffScope) -> Result<String> {
        self.diff
            .clone()
            .ok_or_else(|| Error::Git("diff unavailable".into()))
    }

    async fn diff_summary(&self, _scope: DiffScope) -> Result<Vec<FileStat>> {
        self.summary
            .clone()
            .ok_or_else(|| Error::Git("summary unavailable".into()))
    }
}

// ─── Scripted provider ───────────────────────────────────────────────────────

#[allow(dead_code)]
#[derive(Clone)]
pub enum Script {
    Reply(String),
    Fail,
    Sleep(Duration),
}

/// Provider that follows a fixed script and counts its calls
#[allow(dead_code)]
pub struct ScriptedProvider {
    backend: Backend,
    script: Script,
    calls: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl ScriptedProvider {
    pub fn new(backend: Backend, script: Script) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                backend,
                script,
                calls: Arc::clone(&calls),
            },
            calls,
        )
    }

    pub fn replying(backend: Backend, text: &str) -> (Self, Arc<AtomicUsize>) {
        Self::new(backend, Script::Reply(text.to_string()))
    }

    pub fn failing(backend: Backend) -> (Self, Arc<AtomicUsize>) {
        Self::new(backend, Script::Fail)
    }

    pub fn boxed(self) -> Box<dyn LlmProvider> {
        Box::new(self)
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    async fn generate(&self, _prompt: &str, _params: &RequestParams) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.script {
            Script::Reply(text) => Ok(text.clone()),
            Script::Fail => Err(Error::Provider {
                provider: self.backend.as_str().into(),
                message: "HTTP 401 Unauthorized".into(),
            }),
            Script::Sleep(duration) => {
                tokio::time::sleep(*duration).await;
                Ok("late reply".into())
            }
        }
    }

    fn backend(&self) -> Backend {
        self.backend
    }
}

#[allow(dead_code)]
pub fn calls(counter: &Arc<AtomicUsize>) -> usize {
    counter.load(Ordering::SeqCst)
}

// ─── Diff builders ───────────────────────────────────────────────────────────

/// `git diff` text for a newly added file
#[allow(dead_code)]
pub fn added_file_diff(path: &str, lines: &[&str]) -> String {
    let mut diff = format!(
        "diff --git a/{path} b/{path}\nnew file mode 100644\nindex 0000000..e69de29\n--- /dev/null\n+++ b/{path}\n@@ -0,0 +1,{} @@\n",
        lines.len()
    );
    for line in lines {
        diff.push('+');
        diff.push_str(line);
        diff.push('\n');
    }
    diff
}

/// `git diff` text for a modified file with the given line counts
#[allow(dead_code)]
pub fn modified_file_diff(path: &str, added: usize, removed: usize) -> String {
    let mut diff = format!(
        "diff --git a/{path} b/{path}\nindex 1111111..2222222 100644\n--- a/{path}\n+++ b/{path}\n@@ -1,{removed} +1,{added} @@\n"
    );
    for i in 0..removed {
        diff.push_str(&format!("-old line {i}\n"));
    }
    for i in 0..added {
        diff.push_str(&format!("+new line {i}\n"));
    }
    diff
}

/// `git diff` text for a deleted file
#[allow(dead_code)]
pub fn deleted_file_diff(path: &str, removed: usize) -> String {
    let mut diff = format!(
        "diff --git a/{path} b/{path}\ndeleted file mode 100644\nindex 3333333..0000000\n--- a/{path}\n+++ /dev/null\n@@ -1,{removed} +0,0 @@\n"
    );
    for i in 0..removed {
        diff.push_str(&format!("-gone {i}\n"));
    }
    diff
}

#[allow(dead_code)]
pub fn stat(path: &str, insertions: usize, deletions: usize) -> FileStat {
    FileStat {
        path: path.to_string(),
        insertions,
        deletions,
    }
}
