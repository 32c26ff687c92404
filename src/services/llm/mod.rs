// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

pub mod gemini;
pub mod local;
pub mod openai;

use crate::config::{Backend, Config};
use crate::domain::GenerationOptions;
use crate::error::Result;

pub(crate) const SYSTEM_PROMPT: &str = "You write git commit messages. \
Reply with the commit message only: no explanations, no markdown, no code fences.";

/// Per-request generation parameters
#[derive(Debug, Clone, PartialEq)]
pub struct RequestParams {
    /// Overrides the backend's default model
    pub model: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl From<&GenerationOptions> for RequestParams {
    fn from(options: &GenerationOptions) -> Self {
        Self {
            model: options.model.clone(),
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        }
    }
}

#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Return the raw completion for `prompt`
    async fn generate(&self, prompt: &str, params: &RequestParams) -> Result<String>;

    fn backend(&self) -> Backend;

    fn name(&self) -> &str {
        self.backend().as_str()
    }
}

/// Build the provider for `backend`, or `None` when its credential is missing.
pub fn create_provider(backend: Backend, config: &Config) -> Option<Box<dyn LlmProvider>> {
    let api_key = SecretString::from(config.credentials.get(backend)?.expose_secret().to_owned());
    let timeout = std::time::Duration::from_secs(config.timeout_secs);

    Some(match backend {
        Backend::Gemini => Box::new(gemini::GeminiProvider::new(api_key, timeout)),
        Backend::Groq => Box::new(openai::OpenAiProvider::groq(api_key, timeout)),
        Backend::OpenAI => Box::new(openai::OpenAiProvider::openai(
            api_key,
            config.openai_base_url.as_deref(),
            timeout,
        )),
    })
}

/// Providers for every configured backend, in preference order
pub fn configured_providers(config: &Config) -> Vec<Box<dyn LlmProvider>> {
    Backend::ALL
        .into_iter()
        .filter_map(|backend| create_provider(backend, config))
        .collect()
}
