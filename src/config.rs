//! 提供者配置：默认值、YAML 文件与环境变量覆盖。
//!
//! Provider settings.
//!
//! Settings carry endpoints, model names and generation knobs only. Credentials are
//! deliberately absent: providers read `OPENAI_API_KEY` / `ANTHROPIC_API_KEY` from the
//! environment on every call.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::{Error, ErrorContext, Result};

pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const ANTHROPIC_API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_LOCAL_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";

/// Settings for one hosted completion API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteSettings {
    pub base_url: String,
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
}

/// Settings for the local inference server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalSettings {
    pub base_url: String,
    pub model: String,
}

/// Full settings for the default provider chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainSettings {
    pub openai: RemoteSettings,
    pub local: LocalSettings,
    pub anthropic: RemoteSettings,
    /// Per-request timeout. Absent means no timeout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

fn default_max_tokens() -> u32 {
    1000
}

fn default_temperature() -> f64 {
    0.7
}

impl Default for ChainSettings {
    fn default() -> Self {
        Self {
            openai: RemoteSettings {
                base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
                model: "gpt-3.5-turbo".to_string(),
                max_tokens: default_max_tokens(),
                temperature: default_temperature(),
            },
            local: LocalSettings {
                base_url: DEFAULT_LOCAL_BASE_URL.to_string(),
                model: "llama2".to_string(),
            },
            anthropic: RemoteSettings {
                base_url: DEFAULT_ANTHROPIC_BASE_URL.to_string(),
                model: "claude-3-haiku-20240307".to_string(),
                max_tokens: default_max_tokens(),
                temperature: default_temperature(),
            },
            timeout_secs: None,
        }
    }
}

impl ChainSettings {
    /// Defaults overlaid with `AI_TUTOR_*` environment overrides.
    pub fn from_env() -> Result<Self> {
        let mut settings = Self::default();
        settings.apply_env_with(|key| std::env::var(key).ok());
        settings.validate()?;
        Ok(settings)
    }

    /// Parse YAML settings, then apply environment overrides on top.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let mut settings: Self = serde_yaml::from_str(yaml)?;
        settings.apply_env_with(|key| std::env::var(key).ok());
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::configuration_with_context(
                format!("cannot read settings file: {}", e),
                ErrorContext::new()
                    .with_details(path.display().to_string())
                    .with_source("settings_loader"),
            )
        })?;
        Self::from_yaml_str(&text)
    }

    /// Overlay overrides from an arbitrary key lookup. Blank values are ignored.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(v) = get("AI_TUTOR_OPENAI_BASE_URL") {
            self.openai.base_url = v;
        }
        if let Some(v) = get("AI_TUTOR_OPENAI_MODEL") {
            self.openai.model = v;
        }
        if let Some(v) = get("AI_TUTOR_LOCAL_BASE_URL") {
            self.local.base_url = v;
        }
        if let Some(v) = get("AI_TUTOR_LOCAL_MODEL") {
            self.local.model = v;
        }
        if let Some(v) = get("AI_TUTOR_ANTHROPIC_BASE_URL") {
            self.anthropic.base_url = v;
        }
        if let Some(v) = get("AI_TUTOR_ANTHROPIC_MODEL") {
            self.anthropic.model = v;
        }
        if let Some(secs) = get("AI_TUTOR_HTTP_TIMEOUT_SECS").and_then(|s| s.parse::<u64>().ok()) {
            self.timeout_secs = Some(secs).filter(|s| *s > 0);
        }
    }

    /// Check that every base URL parses and every model name is present.
    pub fn validate(&self) -> Result<()> {
        let endpoints = [
            ("openai", &self.openai.base_url, &self.openai.model),
            ("local", &self.local.base_url, &self.local.model),
            ("anthropic", &self.anthropic.base_url, &self.anthropic.model),
        ];
        for (name, base_url, model) in endpoints {
            if let Err(e) = url::Url::parse(base_url) {
                return Err(Error::configuration_with_context(
                    format!("invalid base URL: {}", e),
                    ErrorContext::new()
                        .with_field_path(format!("{}.base_url", name))
                        .with_details(base_url.clone())
                        .with_source("settings_validator"),
                ));
            }
            if model.trim().is_empty() {
                return Err(Error::configuration_with_context(
                    "model name must not be empty",
                    ErrorContext::new()
                        .with_field_path(format!("{}.model", name))
                        .with_source("settings_validator"),
                ));
            }
        }
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
