//! Local inference server provider (Ollama-compatible `/api/generate`).
//!
//! Unauthenticated; talks to a loopback port. Streaming is disabled so the whole
//! completion arrives in one JSON object with a `response` field.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::config::LocalSettings;
use crate::transport::HttpTransport;

use super::{extract_text, join_url, ProviderError, ResponseProvider};

const GENERATE_PATH: &str = "/api/generate";
const TEXT_POINTER: &str = "/response";

#[derive(Debug, Clone)]
pub struct LocalProvider {
    transport: HttpTransport,
    settings: LocalSettings,
}

impl LocalProvider {
    pub fn new(transport: HttpTransport, settings: LocalSettings) -> Self {
        Self {
            transport,
            settings,
        }
    }

    pub(crate) fn build_body(&self, prompt: &str) -> Value {
        serde_json::json!({
            "model": self.settings.model,
            "prompt": prompt,
            "stream": false,
        })
    }
}

#[async_trait]
impl ResponseProvider for LocalProvider {
    fn name(&self) -> &str {
        "local"
    }

    async fn respond(&self, prompt: &str) -> Result<String, ProviderError> {
        let url = join_url(&self.settings.base_url, GENERATE_PATH);
        debug!(
            provider = self.name(),
            url = url.as_str(),
            model = self.settings.model.as_str(),
            "sending generate request"
        );

        let reply = self
            .transport
            .post_json(&url, &[], &self.build_body(prompt))
            .await
            .map_err(|source| ProviderError::Transport {
                provider: self.name().to_string(),
                source,
            })?;

        extract_text(self.name(), reply, TEXT_POINTER)
    }
}
