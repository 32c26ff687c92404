// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::{Config, ProviderChoice};
use crate::domain::GenerationOptions;
use crate::error::{Error, Result};
use crate::services::llm::local::LocalHeuristic;
use crate::services::llm::{LlmProvider, RequestParams, configured_providers};

/// Name reported for results that did not come from a remote backend
pub const LOCAL_PROVIDER: &str = "local";

/// Returned when even the local heuristic has nothing to say
pub const ABSOLUTE_FALLBACK: &str = "Update project files";

/// Raw completion and where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderResult {
    pub text: String,
    pub provider: String,
    pub used_local: bool,
}

impl ProviderResult {
    fn local(text: String) -> Self {
        Self {
            text,
            provider: LOCAL_PROVIDER.to_string(),
            used_local: true,
        }
    }
}

/// Tries configured backends in order and ends at the local heuristic.
pub struct ProviderDispatcher {
    providers: Vec<Box<dyn LlmProvider>>,
    timeout: Duration,
    cancel: Option<CancellationToken>,
}

impl ProviderDispatcher {
    /// `providers` must already be in preference order.
    pub fn new(providers: Vec<Box<dyn LlmProvider>>, timeout: Duration) -> Self {
        Self {
            providers,
            timeout,
            cancel: None,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            configured_providers(config),
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Stop trying remote backends once `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Remote backends to try for `choice`, in order. The local heuristic is
    /// always appended implicitly by [`dispatch`](Self::dispatch).
    pub fn resolve_chain(&self, choice: ProviderChoice) -> Vec<&dyn LlmProvider> {
        match choice {
            ProviderChoice::None => Vec::new(),
            ProviderChoice::Named(backend) => self
                .providers
                .iter()
                .filter(|p| p.backend() == backend)
                .take(1)
                .map(|p| p.as_ref())
                .collect(),
            ProviderChoice::Auto => self.providers.iter().map(|p| p.as_ref()).collect(),
        }
    }

    /// Names of the resolved chain including the local terminal member
    pub fn chain_names(&self, choice: ProviderChoice) -> Vec<String> {
        self.resolve_chain(choice)
            .into_iter()
            .map(|p| p.name().to_string())
            .chain(std::iter::once(LOCAL_PROVIDER.to_string()))
            .collect()
    }

    /// First successful completion along the chain. Never fails.
    pub async fn dispatch(
        &self,
        prompt: &str,
        diff: &str,
        options: &GenerationOptions,
    ) -> ProviderResult {
        let params = RequestParams::from(options);

        for provider in self.resolve_chain(options.provider) {
            if self.is_cancelled() {
                debug!("generation cancelled, skipping remaining backends");
                break;
            }

            match self.attempt(provider, prompt, &params).await {
                Some(Ok(text)) if !text.trim().is_empty() => {
                    debug!(provider = provider.name(), "backend succeeded");
                    return ProviderResult {
                        text,
                        provider: provider.name().to_string(),
                        used_local: false,
                    };
                }
                Some(Ok(_)) => {
                    report(options, provider.name(), "empty response");
                }
                Some(Err(e)) => {
                    report(options, provider.name(), &e.to_string());
                }
                None => break,
            }
        }

        match LocalHeuristic::generate(diff, options.conventional) {
            Some(text) if !text.trim().is_empty() => ProviderResult::local(text),
            _ => ProviderResult::local(ABSOLUTE_FALLBACK.to_string()),
        }
    }

    /// `None` when cancelled mid-request
    async fn attempt(
        &self,
        provider: &dyn LlmProvider,
        prompt: &str,
        params: &RequestParams,
    ) -> Option<Result<String>> {
        let call = async {
            match tokio::time::timeout(self.timeout, provider.generate(prompt, params)).await {
                Ok(result) => result,
                Err(_) => Err(Error::provider(
                    provider.name(),
                    format!("no response within {}s", self.timeout.as_secs()),
                )),
            }
        };

        match &self.cancel {
            Some(token) => tokio::select! {
                _ = token.cancelled() => None,
                result = call => Some(result),
            },
            None => Some(call.await),
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|t| t.is_cancelled())
    }
}

fn report(options: &GenerationOptions, provider: &str, reason: &str) {
    if options.verbose {
        warn!(provider, reason, "backend failed, trying next");
    } else {
        debug!(provider, reason, "backend failed, trying next");
    }
}
