// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::{LlmProvider, RequestParams, SYSTEM_PROMPT};
use crate::config::Backend;
use crate::error::{Error, Result};

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Chat-completions client for OpenAI and OpenAI-compatible APIs (Groq).
pub struct OpenAiProvider {
    client: Client,
    backend: Backend,
    base_url: String,
    api_key: SecretString,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl OpenAiProvider {
    pub fn new(backend: Backend, api_key: SecretString, base_url: &str, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Self {
            client,
            backend,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    pub fn openai(api_key: SecretString, base_url: Option<&str>, timeout: Duration) -> Self {
        Self::new(
            Backend::OpenAI,
            api_key,
            base_url.unwrap_or(OPENAI_BASE_URL),
            timeout,
        )
    }

    pub fn groq(api_key: SecretString, timeout: Duration) -> Self {
        Self::new(Backend::Groq, api_key, GROQ_BASE_URL, timeout)
    }

    fn error(&self, message: impl Into<String>) -> Error {
        Error::provider(self.backend.as_str(), message)
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn generate(&self, prompt: &str, params: &RequestParams) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let model = params
            .model
            .as_deref()
            .unwrap_or_else(|| self.backend.default_model());

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&ChatRequest {
                model,
                messages: vec![
                    Message {
                        role: "system",
                        content: SYSTEM_PROMPT,
                    },
                    Message {
                        role: "user",
                        content: prompt,
                    },
                ],
                temperature: params.temperature,
                max_tokens: params.max_tokens,
            })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    self.error("request timed out")
                } else {
                    self.error(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(self.error(format!("HTTP {status}: {body}")));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| self.error(format!("malformed response: {e}")))?;

        let text = body
            .choices
            .into_iter()
            .find_map(|c| c.message.content)
            .map(|t| t.trim().to_string())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(self.error("empty response"));
        }

        Ok(text)
    }

    fn backend(&self) -> Backend {
        self.backend
    }
}
