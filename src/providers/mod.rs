//! Provider 抽象层：通过 trait 统一 "发送提示文本，接收回复文本"
//!
//! Response provider abstraction. Every backend the chain can query implements
//! [`ResponseProvider`]; the chain treats them uniformly through `Arc<dyn ResponseProvider>`.
//! Concrete providers differ only in endpoint, headers and request/response shape.

pub mod anthropic;
pub mod local;
pub mod openai;

use async_trait::async_trait;
use serde_json::Value;

use crate::transport::{HttpReply, TransportError};

pub use anthropic::AnthropicProvider;
pub use local::LocalProvider;
pub use openai::OpenAiProvider;

/// Why a provider could not produce text. Every variant means "unavailable" to the chain.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("{provider}: credential {variable} is not set")]
    MissingCredential { provider: String, variable: String },

    #[error("{provider}: {source}")]
    Transport {
        provider: String,
        #[source]
        source: TransportError,
    },

    #[error("{provider}: HTTP {status}: {body}")]
    Status {
        provider: String,
        status: u16,
        body: String,
    },

    #[error("{provider}: malformed payload: {details}")]
    MalformedPayload { provider: String, details: String },
}

impl ProviderError {
    pub fn provider(&self) -> &str {
        match self {
            ProviderError::MissingCredential { provider, .. }
            | ProviderError::Transport { provider, .. }
            | ProviderError::Status { provider, .. }
            | ProviderError::MalformedPayload { provider, .. } => provider,
        }
    }

    /// Short machine-friendly label used in logs and resolution stats.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::MissingCredential { .. } => "missing_credential",
            ProviderError::Transport { .. } => "transport",
            ProviderError::Status { .. } => "http_status",
            ProviderError::MalformedPayload { .. } => "malformed_payload",
        }
    }
}

/// One text-generation backend.
#[async_trait]
pub trait ResponseProvider: Send + Sync + std::fmt::Debug {
    /// Stable provider name used in logs (e.g. "openai").
    fn name(&self) -> &str;

    /// Cheap, local availability check. Does not touch the network.
    ///
    /// Returning `false` lets callers report a provider as disabled without
    /// spending a request on it. The chain still calls `respond`, which fails fast.
    fn is_configured(&self) -> bool {
        true
    }

    /// Send the prompt, receive text.
    async fn respond(&self, prompt: &str) -> Result<String, ProviderError>;
}

/// Read a credential from the environment. Blank values count as missing.
pub(crate) fn read_credential(provider: &str, variable: &str) -> Result<String, ProviderError> {
    std::env::var(variable)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ProviderError::MissingCredential {
            provider: provider.to_string(),
            variable: variable.to_string(),
        })
}

pub(crate) fn credential_present(variable: &str) -> bool {
    std::env::var(variable)
        .map(|v| !v.trim().is_empty())
        .unwrap_or(false)
}

/// Join a base URL and an absolute path without doubling the slash.
pub(crate) fn join_url(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

/// Turn an HTTP reply into text by following a JSON pointer.
///
/// Non-2xx, unparsable JSON, a missing/non-string field and blank text are all failures.
pub(crate) fn extract_text(
    provider: &str,
    reply: HttpReply,
    pointer: &str,
) -> Result<String, ProviderError> {
    if !reply.is_success() {
        return Err(ProviderError::Status {
            provider: provider.to_string(),
            status: reply.status,
            body: reply.body,
        });
    }

    let json: Value =
        serde_json::from_str(&reply.body).map_err(|e| ProviderError::MalformedPayload {
            provider: provider.to_string(),
            details: format!("invalid JSON: {}", e),
        })?;

    let text = json
        .pointer(pointer)
        .and_then(|v| v.as_str())
        .ok_or_else(|| ProviderError::MalformedPayload {
            provider: provider.to_string(),
            details: format!("no string at {}", pointer),
        })?;

    if text.trim().is_empty() {
        return Err(ProviderError::MalformedPayload {
            provider: provider.to_string(),
            details: format!("empty text at {}", pointer),
        });
    }

    Ok(text.to_string())
}
