//! HTTP providers against mock endpoints.

use ai_tutor_rust::config::{ChainSettings, LocalSettings, RemoteSettings};
use ai_tutor_rust::providers::{AnthropicProvider, LocalProvider, OpenAiProvider};
use ai_tutor_rust::transport::HttpTransport;
use ai_tutor_rust::{OfflineResponder, ProviderChain, ResponseProvider};
use mockito::{Matcher, Server};
use serde_json::json;

fn remote(base_url: &str, model: &str) -> RemoteSettings {
    RemoteSettings {
        base_url: base_url.to_string(),
        model: model.to_string(),
        max_tokens: 256,
        temperature: 0.2,
    }
}

fn transport() -> HttpTransport {
    HttpTransport::new(None).expect("transport")
}

#[tokio::test]
async fn test_openai_success_extracts_message_content() {
    std::env::set_var("AI_TUTOR_IT_OPENAI_KEY_OK", "sk-test");
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .match_header("authorization", "Bearer sk-test")
        .match_body(Matcher::PartialJson(json!({
            "model": "gpt-test",
            "max_tokens": 256,
            "messages": [{"role": "user", "content": "Explain traits"}]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"Traits define shared behaviour."}}]}"#)
        .create_async()
        .await;

    let provider = OpenAiProvider::new(transport(), remote(&server.url(), "gpt-test"))
        .with_api_key_env("AI_TUTOR_IT_OPENAI_KEY_OK");
    let text = provider.respond("Explain traits").await.unwrap();

    assert_eq!(text, "Traits define shared behaviour.");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_openai_non_success_status_is_error() {
    std::env::set_var("AI_TUTOR_IT_OPENAI_KEY_429", "sk-test");
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(429)
        .with_body(r#"{"error":{"message":"Rate limit exceeded"}}"#)
        .create_async()
        .await;

    let provider = OpenAiProvider::new(transport(), remote(&server.url(), "gpt-test"))
        .with_api_key_env("AI_TUTOR_IT_OPENAI_KEY_429");
    let err = provider.respond("hi").await.unwrap_err();

    assert_eq!(err.kind(), "http_status");
    assert!(err.to_string().contains("429"));
}

#[tokio::test]
async fn test_openai_missing_key_never_hits_network() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .expect(0)
        .create_async()
        .await;

    let provider = OpenAiProvider::new(transport(), remote(&server.url(), "gpt-test"))
        .with_api_key_env("AI_TUTOR_IT_OPENAI_KEY_UNSET");
    let err = provider.respond("hi").await.unwrap_err();

    assert_eq!(err.kind(), "missing_credential");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_openai_key_set_after_construction_is_used() {
    std::env::remove_var("AI_TUTOR_IT_OPENAI_KEY_LATE");
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .match_header("authorization", "Bearer sk-late")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"choices":[{"message":{"content":"Now configured."}}]}"#)
        .expect(1)
        .create_async()
        .await;

    let provider = OpenAiProvider::new(transport(), remote(&server.url(), "gpt-test"))
        .with_api_key_env("AI_TUTOR_IT_OPENAI_KEY_LATE");
    assert!(!provider.is_configured());
    let err = provider.respond("hi").await.unwrap_err();
    assert_eq!(err.kind(), "missing_credential");

    std::env::set_var("AI_TUTOR_IT_OPENAI_KEY_LATE", "sk-late");
    assert!(provider.is_configured());
    let text = provider.respond("hi").await.unwrap();

    assert_eq!(text, "Now configured.");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_anthropic_sends_version_and_key_headers() {
    std::env::set_var("AI_TUTOR_IT_ANTHROPIC_KEY_OK", "ak-test");
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/messages")
        .match_header("x-api-key", "ak-test")
        .match_header("anthropic-version", "2023-06-01")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"content":[{"type":"text","text":"Lifetimes name scopes."}],"stop_reason":"end_turn"}"#)
        .create_async()
        .await;

    let provider = AnthropicProvider::new(transport(), remote(&server.url(), "claude-test"))
        .with_api_key_env("AI_TUTOR_IT_ANTHROPIC_KEY_OK");
    let text = provider.respond("Lifetimes?").await.unwrap();

    assert_eq!(text, "Lifetimes name scopes.");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_local_malformed_payload_is_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/generate")
        .match_body(Matcher::PartialJson(json!({"stream": false})))
        .with_status(200)
        .with_body(r#"{"choices":[]}"#)
        .create_async()
        .await;

    let provider = LocalProvider::new(
        transport(),
        LocalSettings {
            base_url: server.url(),
            model: "llama-test".into(),
        },
    );
    let err = provider.respond("hi").await.unwrap_err();
    assert_eq!(err.kind(), "malformed_payload");
}

#[tokio::test]
async fn test_local_unreachable_is_transport_error() {
    let provider = LocalProvider::new(
        transport(),
        LocalSettings {
            base_url: "http://127.0.0.1:1".into(),
            model: "llama-test".into(),
        },
    );
    let err = provider.respond("hi").await.unwrap_err();
    assert_eq!(err.kind(), "transport");
    assert_eq!(err.provider(), "local");
}

#[tokio::test]
async fn test_chain_over_http_falls_back_in_order() {
    std::env::set_var("AI_TUTOR_IT_CHAIN_OPENAI_KEY", "sk-test");
    std::env::set_var("AI_TUTOR_IT_CHAIN_ANTHROPIC_KEY", "ak-test");

    let mut openai = Server::new_async().await;
    let openai_mock = openai
        .mock("POST", "/v1/chat/completions")
        .with_status(500)
        .with_body("internal error")
        .expect(1)
        .create_async()
        .await;

    let mut local = Server::new_async().await;
    let local_mock = local
        .mock("POST", "/api/generate")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"model":"llama-test","response":"Local model answer.","done":true}"#)
        .expect(1)
        .create_async()
        .await;

    let mut anthropic = Server::new_async().await;
    let anthropic_mock = anthropic
        .mock("POST", "/v1/messages")
        .expect(0)
        .create_async()
        .await;

    let transport = transport();
    let chain = ProviderChain::builder()
        .provider(
            OpenAiProvider::new(transport.clone(), remote(&openai.url(), "gpt-test"))
                .with_api_key_env("AI_TUTOR_IT_CHAIN_OPENAI_KEY"),
        )
        .provider(LocalProvider::new(
            transport.clone(),
            LocalSettings {
                base_url: local.url(),
                model: "llama-test".into(),
            },
        ))
        .provider(
            AnthropicProvider::new(transport, remote(&anthropic.url(), "claude-test"))
                .with_api_key_env("AI_TUTOR_IT_CHAIN_ANTHROPIC_KEY"),
        )
        .build();

    let text = chain.chat("What is a slice?", None).await;

    assert_eq!(text, "Local model answer.");
    openai_mock.assert_async().await;
    local_mock.assert_async().await;
    anthropic_mock.assert_async().await;
}

#[tokio::test]
async fn test_default_chain_with_nothing_reachable_answers_offline() {
    let mut settings = ChainSettings::default();
    settings.openai.base_url = "http://127.0.0.1:1".into();
    settings.local.base_url = "http://127.0.0.1:1".into();
    settings.anthropic.base_url = "http://127.0.0.1:1".into();
    let chain = ProviderChain::from_settings(&settings).unwrap();

    let text = chain.chat("How do I debug my code?", None).await;

    assert!(OfflineResponder::pool(ai_tutor_rust::offline::Category::Coding).contains(&text.as_str()));
}
