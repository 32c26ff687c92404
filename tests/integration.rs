// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for the HTTP backends and the full generation pipeline.
//!
//! Uses `wiremock` to mock HTTP endpoints so no real LLM services are needed.

mod helpers;

use std::time::Duration;

use secrecy::SecretString;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use commitflow::config::{Backend, Config, ProviderChoice};
use commitflow::domain::{DiffScope, GenerationOptions};
use commitflow::error::Error;
use commitflow::services::generator::CommitGenerator;
use commitflow::services::llm::gemini::GeminiProvider;
use commitflow::services::llm::openai::OpenAiProvider;
use commitflow::services::llm::{LlmProvider, RequestParams};
use helpers::{FakeRepository, added_file_diff};

const TIMEOUT: Duration = Duration::from_secs(5);

// ─── Test helpers ────────────────────────────────────────────────────────────

fn key() -> SecretString {
    SecretString::from("test-key".to_string())
}

fn params() -> RequestParams {
    RequestParams {
        model: None,
        temperature: 0.3,
        max_tokens: 256,
    }
}

fn chat_reply(content: &str) -> serde_json::Value {
    serde_json::json!({
        "choices": [{ "message": { "role": "assistant", "content": content } }]
    })
}

fn assert_provider_error(err: Error, expected_provider: &str, fragment: &str) {
    match err {
        Error::Provider { provider, message } => {
            assert_eq!(provider, expected_provider);
            assert!(
                message.contains(fragment),
                "expected message to contain {fragment:?}, got: {message}"
            );
        }
        other => panic!("expected Provider error, got: {other:?}"),
    }
}

// ─── OpenAI-compatible backends ──────────────────────────────────────────────

#[tokio::test]
async fn openai_chat_completion() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(serde_json::json!({
            "model": "gpt-4o-mini",
            "max_tokens": 256
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply("feat: add test\n")))
        .expect(1)
        .mount(&server)
        .await;

    let provider = OpenAiProvider::openai(key(), Some(&server.uri()), TIMEOUT);
    let result = provider.generate("test prompt", &params()).await.unwrap();

    assert_eq!(result, "feat: add test");
    assert_eq!(provider.name(), "openai");
}

#[tokio::test]
async fn model_override_is_sent() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(serde_json::json!({ "model": "llama-3.3-70b" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply("fix: x")))
        .expect(1)
        .mount(&server)
        .await;

    let provider = OpenAiProvider::new(Backend::Groq, key(), &server.uri(), TIMEOUT);
    let params = RequestParams {
        model: Some("llama-3.3-70b".into()),
        ..params()
    };

    assert_eq!(provider.generate("p", &params).await.unwrap(), "fix: x");
}

#[tokio::test]
async fn openai_unauthorized() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(serde_json::json!({"error": {"message": "invalid API key"}})),
        )
        .mount(&server)
        .await;

    let provider = OpenAiProvider::openai(key(), Some(&server.uri()), TIMEOUT);
    let err = provider.generate("p", &params()).await.unwrap_err();

    assert_provider_error(err, "openai", "401");
}

#[tokio::test]
async fn groq_malformed_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let provider = OpenAiProvider::new(Backend::Groq, key(), &server.uri(), TIMEOUT);
    let err = provider.generate("p", &params()).await.unwrap_err();

    assert_provider_error(err, "groq", "malformed response");
}

#[tokio::test]
async fn empty_choice_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply("   ")))
        .mount(&server)
        .await;

    let provider = OpenAiProvider::openai(key(), Some(&server.uri()), TIMEOUT);
    let err = provider.generate("p", &params()).await.unwrap_err();

    assert_provider_error(err, "openai", "empty response");
}

// ─── Gemini ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn gemini_generate_content() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-2.0-flash:generateContent"))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(serde_json::json!({
            "generationConfig": { "maxOutputTokens": 256 }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": "docs: " }, { "text": "update guide" }] }
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = GeminiProvider::with_base_url(key(), &server.uri(), TIMEOUT);
    let result = provider.generate("p", &params()).await.unwrap();

    assert_eq!(result, "docs: update guide");
}

#[tokio::test]
async fn gemini_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let provider = GeminiProvider::with_base_url(key(), &server.uri(), TIMEOUT);
    let err = provider.generate("p", &params()).await.unwrap_err();

    assert_provider_error(err, "gemini", "500");
}

#[tokio::test]
async fn gemini_without_candidates_is_empty() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&server)
        .await;

    let provider = GeminiProvider::with_base_url(key(), &server.uri(), TIMEOUT);
    let err = provider.generate("p", &params()).await.unwrap_err();

    assert_provider_error(err, "gemini", "empty response");
}

// ─── Full pipeline ───────────────────────────────────────────────────────────

#[tokio::test]
async fn pipeline_uses_configured_openai_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(chat_reply("Here is the commit message:\n\n`feat: export foo`")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut config = Config {
        provider: ProviderChoice::Named(Backend::OpenAI),
        openai_base_url: Some(server.uri()),
        timeout_secs: 5,
        ..Config::default()
    };
    config.credentials.set(Backend::OpenAI, key());

    let repo = FakeRepository::with_diff(added_file_diff("app.js", &["export function foo(){}"]));
    let options = GenerationOptions::from_config(&config);
    let mut generator = CommitGenerator::new(&config);

    let generated = generator
        .generate_commit_message(&repo, DiffScope::Staged, &options)
        .await;

    assert_eq!(generated.message.subject, "feat: export foo");
    assert_eq!(generated.provider.as_deref(), Some("openai"));
    assert!(!generated.used_local);
}

#[tokio::test]
async fn pipeline_falls_back_to_local_when_backend_fails() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = Config {
        openai_base_url: Some(server.uri()),
        timeout_secs: 5,
        ..Config::default()
    };
    config.credentials.set(Backend::OpenAI, key());

    let repo = FakeRepository::with_diff(added_file_diff("app.js", &["export function foo(){}"]));
    let mut generator = CommitGenerator::new(&config);

    let generated = generator
        .generate_commit_message(&repo, DiffScope::Staged, &GenerationOptions::default())
        .await;

    assert!(generated.used_local);
    assert_eq!(generated.message.subject, "feat: add app.js");
}
