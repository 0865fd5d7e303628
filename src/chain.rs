//! 提供者解析链：按固定优先级依次尝试，全部失败时使用离线应答。
//!
//! Provider resolution chain.
//!
//! Providers are tried strictly in order and awaited one at a time; the first one that
//! returns non-blank text wins and the rest are never called. Every provider failure is
//! logged and swallowed. When the list is exhausted the [`OfflineResponder`] answers, so
//! callers always receive a non-empty `String` and never an error.

use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::config::ChainSettings;
use crate::offline::OfflineResponder;
use crate::prompt::{Prompt, PromptBuilder};
use crate::providers::{
    AnthropicProvider, LocalProvider, OpenAiProvider, ProviderError, ResponseProvider,
};
use crate::transport::HttpTransport;
use crate::types::ContentRequest;
use crate::Result;

/// How one provider attempt ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AttemptOutcome {
    Answered,
    Failed { kind: String, message: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct AttemptRecord {
    pub provider: String,
    pub outcome: AttemptOutcome,
    pub duration_ms: u64,
}

/// Diagnostics for one resolution. Never part of the response text.
#[derive(Debug, Clone, Serialize)]
pub struct ResolutionStats {
    pub request_id: String,
    pub attempts: Vec<AttemptRecord>,
    /// Provider that answered; `None` when the offline responder did.
    pub answered_by: Option<String>,
    pub duration_ms: u64,
}

impl ResolutionStats {
    pub fn used_offline(&self) -> bool {
        self.answered_by.is_none()
    }

    /// Providers that were tried and failed, in order.
    pub fn failed_providers(&self) -> Vec<&str> {
        self.attempts
            .iter()
            .filter(|a| matches!(a.outcome, AttemptOutcome::Failed { .. }))
            .map(|a| a.provider.as_str())
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct ProviderChain {
    providers: Vec<Arc<dyn ResponseProvider>>,
    offline: OfflineResponder,
}

impl ProviderChain {
    pub fn builder() -> ProviderChainBuilder {
        ProviderChainBuilder::new()
    }

    /// The fixed default order: hosted OpenAI, then the local server, then Anthropic.
    pub fn from_settings(settings: &ChainSettings) -> Result<Self> {
        let transport = HttpTransport::new(settings.timeout())?;
        Ok(Self::builder()
            .provider(OpenAiProvider::new(transport.clone(), settings.openai.clone()))
            .provider(LocalProvider::new(transport.clone(), settings.local.clone()))
            .provider(AnthropicProvider::new(transport, settings.anthropic.clone()))
            .build())
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    pub fn providers(&self) -> &[Arc<dyn ResponseProvider>] {
        &self.providers
    }

    pub fn offline(&self) -> &OfflineResponder {
        &self.offline
    }

    /// Host entry point for a free-form chat message.
    pub async fn chat(&self, message: &str, context: Option<&str>) -> String {
        let request = ContentRequest::chat(message);
        self.generate(&request, context).await
    }

    /// Build the prompt for `request` and resolve it.
    pub async fn generate(&self, request: &ContentRequest, context: Option<&str>) -> String {
        let prompt = PromptBuilder::build(request, context);
        self.resolve(&prompt, request).await
    }

    /// Resolve an already-built prompt. `fallback` feeds the offline responder.
    pub async fn resolve(&self, prompt: &Prompt, fallback: &ContentRequest) -> String {
        self.resolve_with_stats(prompt, fallback).await.0
    }

    pub async fn resolve_with_stats(
        &self,
        prompt: &Prompt,
        fallback: &ContentRequest,
    ) -> (String, ResolutionStats) {
        let request_id = Uuid::new_v4().to_string();
        let span = info_span!("resolve", request_id = request_id.as_str(), kind = %fallback.kind);

        async move {
            let started = Instant::now();
            let mut attempts = Vec::with_capacity(self.providers.len());

            for provider in &self.providers {
                let name = provider.name().to_string();
                let attempt_started = Instant::now();
                debug!(provider = name.as_str(), "trying provider");

                let result = match provider.respond(prompt.as_str()).await {
                    Ok(text) if text.trim().is_empty() => Err(ProviderError::MalformedPayload {
                        provider: name.clone(),
                        details: "provider returned empty text".to_string(),
                    }),
                    other => other,
                };
                let duration_ms = attempt_started.elapsed().as_millis() as u64;

                match result {
                    Ok(text) => {
                        info!(provider = name.as_str(), duration_ms, "provider answered");
                        attempts.push(AttemptRecord {
                            provider: name.clone(),
                            outcome: AttemptOutcome::Answered,
                            duration_ms,
                        });
                        let stats = ResolutionStats {
                            request_id,
                            attempts,
                            answered_by: Some(name),
                            duration_ms: started.elapsed().as_millis() as u64,
                        };
                        return (text, stats);
                    }
                    Err(e) => {
                        warn!(
                            provider = name.as_str(),
                            error_kind = e.kind(),
                            error = %e,
                            duration_ms,
                            "provider unavailable, trying next"
                        );
                        attempts.push(AttemptRecord {
                            provider: name,
                            outcome: AttemptOutcome::Failed {
                                kind: e.kind().to_string(),
                                message: e.to_string(),
                            },
                            duration_ms,
                        });
                    }
                }
            }

            let text = self.offline.respond_to(fallback);
            info!(
                attempted = attempts.len(),
                "all providers unavailable, answering offline"
            );
            let stats = ResolutionStats {
                request_id,
                attempts,
                answered_by: None,
                duration_ms: started.elapsed().as_millis() as u64,
            };
            (text, stats)
        }
        .instrument(span)
        .await
    }
}

/// Builder for a chain with an explicit provider order.
#[derive(Default)]
pub struct ProviderChainBuilder {
    providers: Vec<Arc<dyn ResponseProvider>>,
    offline: Option<OfflineResponder>,
}

impl ProviderChainBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a provider; order of calls is priority order.
    pub fn provider<P: ResponseProvider + 'static>(mut self, provider: P) -> Self {
        self.providers.push(Arc::new(provider));
        self
    }

    pub fn provider_arc(mut self, provider: Arc<dyn ResponseProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn providers<I>(mut self, providers: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn ResponseProvider>>,
    {
        self.providers.extend(providers);
        self
    }

    /// Replace the offline responder (e.g. to inject a seeded selector).
    pub fn offline(mut self, offline: OfflineResponder) -> Self {
        self.offline = Some(offline);
        self
    }

    pub fn build(self) -> ProviderChain {
        ProviderChain {
            providers: self.providers,
            offline: self.offline.unwrap_or_default(),
        }
    }
}
