// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

use tracing::debug;

use crate::domain::{ChangeSet, DiffScope, ReducedContent, ReductionStrategy, StatusListing};
use crate::services::git::Repository;

pub const CHARS_PER_TOKEN: usize = 4;

/// Characters kept free for the prompt framing when hard-truncating
pub const TRUNCATION_RESERVE: usize = 1_000;

pub const TRUNCATION_MARKER: &str = "\n\n[... truncated to fit the token budget ...]";

/// Content used when the repository cannot describe the change
pub const FALLBACK_CONTENT: &str = "Large changes across multiple files";

/// Rough token count: one token per four characters.
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(CHARS_PER_TOKEN)
}

/// Shrinks a change set until it fits the token budget:
/// full diff → per-file summary → status listing → hard truncation.
pub struct ContentReducer {
    token_budget: usize,
}

impl ContentReducer {
    pub fn new(token_budget: usize) -> Self {
        Self { token_budget }
    }

    pub fn token_budget(&self) -> usize {
        self.token_budget
    }

    pub fn fits(&self, text: &str) -> bool {
        estimate_tokens(text) <= self.token_budget
    }

    /// Never fails: repository errors degrade to [`FALLBACK_CONTENT`].
    pub async fn reduce(
        &self,
        diff: &str,
        repo: &dyn Repository,
        scope: DiffScope,
    ) -> ReducedContent {
        if self.fits(diff) {
            return ReducedContent {
                content: diff.to_string(),
                strategy: ReductionStrategy::Full,
            };
        }

        debug!(
            tokens = estimate_tokens(diff),
            budget = self.token_budget,
            "diff over budget, trying file summary"
        );

        let summary = match repo.diff_summary(scope).await {
            Ok(stats) => ChangeSet::Summary(stats).render(),
            Err(e) => {
                debug!(error = %e, "diff summary unavailable");
                return Self::fallback();
            }
        };

        if self.fits(&summary) {
            return ReducedContent {
                content: summary,
                strategy: ReductionStrategy::Summary,
            };
        }

        debug!(
            tokens = estimate_tokens(&summary),
            "summary over budget, trying status listing"
        );

        let listing = match repo.status().await {
            Ok(status) => ChangeSet::Status(StatusListing::from_status(&status, scope)).render(),
            Err(e) => {
                debug!(error = %e, "status unavailable");
                return Self::fallback();
            }
        };

        if self.fits(&listing) {
            return ReducedContent {
                content: listing,
                strategy: ReductionStrategy::Status,
            };
        }

        debug!(
            tokens = estimate_tokens(&listing),
            "status listing over budget, truncating"
        );

        ReducedContent {
            content: self.truncate(&listing),
            strategy: ReductionStrategy::Truncated,
        }
    }

    /// Keep the first `budget × 4 − 1000` characters and append the marker.
    pub fn truncate(&self, content: &str) -> String {
        let limit = (self.token_budget * CHARS_PER_TOKEN).saturating_sub(TRUNCATION_RESERVE);
        let mut truncated: String = content.chars().take(limit).collect();
        truncated.push_str(TRUNCATION_MARKER);
        truncated
    }

    fn fallback() -> ReducedContent {
        ReducedContent {
            content: FALLBACK_CONTENT.to_string(),
            strategy: ReductionStrategy::Fallback,
        }
    }
}
