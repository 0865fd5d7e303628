//! OpenAI Chat Completions provider.
//!
//! Sends the prompt as a single user message and reads `choices[0].message.content`.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::config::{RemoteSettings, OPENAI_API_KEY_ENV};
use crate::transport::HttpTransport;

use super::{
    credential_present, extract_text, join_url, read_credential, ProviderError, ResponseProvider,
};

const CHAT_PATH: &str = "/v1/chat/completions";
const TEXT_POINTER: &str = "/choices/0/message/content";

#[derive(Debug, Clone)]
pub struct OpenAiProvider {
    transport: HttpTransport,
    settings: RemoteSettings,
    api_key_env: String,
}

impl OpenAiProvider {
    pub fn new(transport: HttpTransport, settings: RemoteSettings) -> Self {
        Self {
            transport,
            settings,
            api_key_env: OPENAI_API_KEY_ENV.to_string(),
        }
    }

    /// Read the credential from a different environment variable.
    pub fn with_api_key_env(mut self, variable: impl Into<String>) -> Self {
        self.api_key_env = variable.into();
        self
    }

    pub(crate) fn build_body(&self, prompt: &str) -> Value {
        serde_json::json!({
            "model": self.settings.model,
            "messages": [{ "role": "user", "content": prompt }],
            "max_tokens": self.settings.max_tokens,
            "temperature": self.settings.temperature,
        })
    }
}

#[async_trait]
impl ResponseProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn is_configured(&self) -> bool {
        credential_present(&self.api_key_env)
    }

    async fn respond(&self, prompt: &str) -> Result<String, ProviderError> {
        let api_key = read_credential(self.name(), &self.api_key_env)?;
        let url = join_url(&self.settings.base_url, CHAT_PATH);
        debug!(
            provider = self.name(),
            url = url.as_str(),
            model = self.settings.model.as_str(),
            "sending chat completion"
        );

        let reply = self
            .transport
            .post_json(
                &url,
                &[("authorization", format!("Bearer {}", api_key))],
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
    fn test_openai_build_body() {
        let provider = OpenAiProvider::new(
            HttpTransport::new(None).unwrap(),
            ChainSettings::default().openai,
        );
        let body = provider.build_body("Explain ownership");
        assert_eq!(body["model"], "gpt-3.5-turbo");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "Explain ownership");
        assert_eq!(body["max_tokens"], 1000);
    }

    #[tokio::test]
    async fn test_openai_missing_key_fails_without_network() {
        let provider = OpenAiProvider::new(
            HttpTransport::new(None).unwrap(),
            ChainSettings::default().openai,
        )
        .with_api_key_env("AI_TUTOR_TEST_OPENAI_KEY_NEVER_SET");
        assert!(!provider.is_configured());
        let err = provider.respond("hi").await.unwrap_err();
        assert_eq!(err.kind(), "missing_credential");
    }
}
