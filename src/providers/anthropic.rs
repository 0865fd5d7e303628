//! Anthropic Messages API provider.
//!
//! Differences from the OpenAI shape:
//! - The credential travels in `x-api-key`, alongside a required `anthropic-version`.
//! - `max_tokens` is required.
//! - Text is read from `content[0].text`.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::config::{RemoteSettings, ANTHROPIC_API_KEY_ENV};
use crate::transport::HttpTransport;

use super::{
    credential_present, extract_text, join_url, read_credential, ProviderError, ResponseProvider,
};

const MESSAGES_PATH: &str = "/v1/messages";
const TEXT_POINTER: &str = "/content/0/text";
const API_VERSION: &str = "2023-06-01";

#[derive(Debug, Clone)]
pub struct AnthropicProvider {
    transport: HttpTransport,
    settings: RemoteSettings,
    api_key_env: String,
}

impl AnthropicProvider {
    pub fn new(transport: HttpTransport, settings: RemoteSettings) -> Self {
        Self {
            transport,
            settings,
            api_key_env: ANTHROPIC_API_KEY_ENV.to_string(),
        }
    }

    pub fn with_api_key_env(mut self, variable: impl Into<String>) -> Self {
        self.api_key_env = variable.into();
        self
    }

    pub(crate) fn build_body(&self, prompt: &str) -> Value {
        serde_json::json!({
            "model": self.settings.model,
            "max_tokens": self.settings.max_tokens,
            "temperature": self.settings.temperature,
            "messages": [{ "role": "user", "content": prompt }],
        })
    }
}

#[async_trait]
impl ResponseProvider for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    fn is_configured(&self) -> bool {
        credential_present(&self.api_key_env)
    }

    async fn respond(&self, prompt: &str) -> Result<String, ProviderError> {
        let api_key = read_credential(self.name(), &self.api_key_env)?;
        let url = join_url(&self.settings.base_url, MESSAGES_PATH);
        debug!(
            provider = self.name(),
            url = url.as_str(),
            model = self.settings.model.as_str(),
            "sending messages request"
        );

        let reply = self
            .transport
            .post_json(
                &url,
                &[
                    ("x-api-key", api_key),
                    ("anthropic-version", API_VERSION.to_string()),
                ],
                &self.build_body(prompt),
            )
            .await
            .map_err(|source| ProviderError::Transport {
                provider: self.name().to_string(),
                source,
            })?;

        extract_text(self.name(), reply, TEXT_POINTER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChainSettings;

    #[test]
    fn test_anthropic_build_body() {
        let provider = AnthropicProvider::new(
            HttpTransport::new(None).unwrap(),
            ChainSettings::default().anthropic,
        );
        let body = provider.build_body("Quiz me on lifetimes");
        assert_eq!(body["model"], "claude-3-haiku-20240307");
        assert_eq!(body["max_tokens"], 1000);
        assert_eq!(body["messages"][0]["content"], "Quiz me on lifetimes");
        assert!(body.get("system").is_none());
    }
}
