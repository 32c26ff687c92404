// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

use tracing::{debug, warn};

use crate::config::Config;
use crate::domain::{CommitMessage, DiffScope, GenerationOptions, ReductionStrategy};
use crate::services::cache::ResponseCache;
use crate::services::dispatcher::{ABSOLUTE_FALLBACK, ProviderDispatcher};
use crate::services::git::Repository;
use crate::services::prompt::PromptBuilder;
use crate::services::reducer::{ContentReducer, estimate_tokens};
use crate::services::sanitizer::CommitSanitizer;

/// Outcome of one generation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    pub message: CommitMessage,
    pub used_local: bool,
    /// Backend that answered; `None` for cache hits and the oversize guard
    pub provider: Option<String>,
    pub strategy: Option<ReductionStrategy>,
    pub prompt: Option<String>,
    pub cached: bool,
}

/// Runs reduce → prompt → dispatch → normalize with a read-through cache.
pub struct CommitGenerator {
    reducer: ContentReducer,
    dispatcher: ProviderDispatcher,
    cache: ResponseCache,
}

impl CommitGenerator {
    pub fn new(config: &Config) -> Self {
        Self::with_parts(
            ContentReducer::new(config.token_budget),
            ProviderDispatcher::from_config(config),
            ResponseCache::from_config(&config.cache),
        )
    }

    pub fn with_parts(
        reducer: ContentReducer,
        dispatcher: ProviderDispatcher,
        cache: ResponseCache,
    ) -> Self {
        Self {
            reducer,
            dispatcher,
            cache,
        }
    }

    pub fn dispatcher(&self) -> &ProviderDispatcher {
        &self.dispatcher
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Produce a commit message for the change in `scope`. Never fails.
    pub async fn generate_commit_message(
        &mut self,
        repo: &dyn Repository,
        scope: DiffScope,
        options: &GenerationOptions,
    ) -> Generated {
        let diff = match repo.diff(scope).await {
            Ok(diff) => diff,
            Err(e) => {
                warn!(error = %e, "could not read diff, continuing without it");
                String::new()
            }
        };

        let key = ResponseCache::fingerprint(&diff, options);
        if let Some(hit) = self.cache.get(&key) {
            debug!(key = %key, "cache hit");
            return Generated {
                message: hit.message,
                used_local: hit.used_local,
                provider: None,
                strategy: None,
                prompt: None,
                cached: true,
            };
        }

        let reduced = self.reducer.reduce(&diff, repo, scope).await;
        let prompt = PromptBuilder::build(&reduced.content, reduced.strategy, options);

        if !self.reducer.fits(&prompt) {
            warn!(
                tokens = estimate_tokens(&prompt),
                budget = self.reducer.token_budget(),
                "prompt over budget, using default message"
            );
            return Generated {
                message: oversize_message(options),
                used_local: true,
                provider: None,
                strategy: Some(reduced.strategy),
                prompt: Some(prompt),
                cached: false,
            };
        }

        debug!(strategy = %reduced.strategy, "dispatching prompt");
        let result = self.dispatcher.dispatch(&prompt, &diff, options).await;
        let message = CommitSanitizer::sanitize(&result.text, options);

        self.cache.put(key, message.clone(), result.used_local);

        Generated {
            message,
            used_local: result.used_local,
            provider: Some(result.provider),
            strategy: Some(reduced.strategy),
            prompt: Some(prompt),
            cached: false,
        }
    }

    /// Generate up to `count` style variants and return their distinct
    /// subjects in order. Always returns at least one subject.
    pub async fn generate_multiple_suggestions(
        &mut self,
        repo: &dyn Repository,
        scope: DiffScope,
        options: &GenerationOptions,
        count: usize,
    ) -> Vec<String> {
        // plain, conventional, conventional with body
        const VARIANTS: [(bool, bool); 3] = [(false, false), (true, false), (true, true)];

        let mut subjects: Vec<String> = Vec::new();
        for (conventional, body) in VARIANTS.into_iter().cycle().take(count.max(1)) {
            let variant = GenerationOptions {
                conventional,
                body,
                ..options.clone()
            };

            let generated = self.generate_commit_message(repo, scope, &variant).await;
            let subject = generated.message.subject;
            if !subject.is_empty() && !subjects.contains(&subject) {
                subjects.push(subject);
            }
        }

        if subjects.is_empty() {
            subjects.push(ABSOLUTE_FALLBACK.to_string());
        }
        subjects
    }
}

fn oversize_message(options: &GenerationOptions) -> CommitMessage {
    if options.conventional {
        CommitMessage::new("chore: update project files")
    } else {
        CommitMessage::new(ABSOLUTE_FALLBACK)
    }
}
