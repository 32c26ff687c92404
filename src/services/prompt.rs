// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

use crate::domain::{CommitType, GenerationOptions, ReductionStrategy};

pub struct PromptBuilder;

impl PromptBuilder {
    pub fn build(content: &str, strategy: ReductionStrategy, options: &GenerationOptions) -> String {
        format!(
            "{lead}\n\n{content}\n\n{subject}\n{body}",
            lead = Self::lead(strategy),
            content = content.trim_end(),
            subject = Self::subject_directive(options.conventional),
            body = Self::body_directive(options.body),
        )
    }

    /// Tells the model how much of the change it is actually seeing
    fn lead(strategy: ReductionStrategy) -> &'static str {
        match strategy {
            ReductionStrategy::Full => "Write a git commit message for the following diff:",
            ReductionStrategy::Summary => {
                "The diff is too large to show. Write a git commit message based on this \
                 per-file summary of inserted and deleted lines:"
            }
            ReductionStrategy::Status => {
                "The change is too large to show line counts. Write a git commit message \
                 based on this list of changed files:"
            }
            ReductionStrategy::Truncated => {
                "The following change description was cut off to fit the size limit. Write a \
                 git commit message based on the visible part:"
            }
            ReductionStrategy::Fallback => {
                "Details of the change are unavailable. Write a general git commit message \
                 for this description:"
            }
        }
    }

    fn subject_directive(conventional: bool) -> String {
        if conventional {
            format!(
                "Use the Conventional Commits format for the subject: a type prefix ({}) \
                 followed by a colon and a short imperative description, e.g. \"feat: add login form\".",
                CommitType::ALL.join(", ")
            )
        } else {
            "Write the subject as a single short line in the imperative mood, \
             e.g. \"Add login form\"."
                .to_string()
        }
    }

    fn body_directive(body: bool) -> &'static str {
        if body {
            "Reply with a short subject line, then a blank line, then an optional body of \
             a few lines explaining what changed and why."
        } else {
            "Reply with the subject line only, without surrounding quotation marks."
        }
    }
}
