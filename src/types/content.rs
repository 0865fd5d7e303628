//! Content requests: what the user asked for, before it becomes a prompt.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, ErrorContext};

/// Category of content to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Outline,
    Lesson,
    Exercise,
    Quiz,
    Summary,
    Chat,
}

impl ContentKind {
    pub const ALL: [ContentKind; 6] = [
        ContentKind::Outline,
        ContentKind::Lesson,
        ContentKind::Exercise,
        ContentKind::Quiz,
        ContentKind::Summary,
        ContentKind::Chat,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Outline => "outline",
            ContentKind::Lesson => "lesson",
            ContentKind::Exercise => "exercise",
            ContentKind::Quiz => "quiz",
            ContentKind::Summary => "summary",
            ContentKind::Chat => "chat",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ContentKind::ALL
            .into_iter()
            .find(|k| k.as_str() == wanted)
            .ok_or_else(|| {
                Error::validation_with_context(
                    format!("unknown content kind '{}'", s),
                    ErrorContext::new()
                        .with_field_path("request.kind")
                        .with_details("expected one of outline, lesson, exercise, quiz, summary, chat"),
                )
            })
    }
}

/// A user's request. For `Chat`, `message` is the raw user message and `topic` is unused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRequest {
    pub kind: ContentKind,
    pub topic: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default)]
    pub message: String,
}

impl ContentRequest {
    pub fn new(kind: ContentKind, topic: impl Into<String>) -> Self {
        Self {
            kind,
            topic: topic.into(),
            domain: None,
            message: String::new(),
        }
    }

    pub fn chat(message: impl Into<String>) -> Self {
        Self {
            kind: ContentKind::Chat,
            topic: String::new(),
            domain: None,
            message: message.into(),
        }
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Domain with blank values treated as absent.
    pub fn domain(&self) -> Option<&str> {
        self.domain
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }
}
