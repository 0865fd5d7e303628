//! Host session: owns the chain, the activity log and the optional content writer.
//!
//! Input validation lives here, not in the chain. An empty topic or message is
//! rejected before any provider is contacted.

use std::path::PathBuf;

use crate::activity::{ActivityKind, ActivityLog};
use crate::chain::{ProviderChain, ResolutionStats};
use crate::config::ChainSettings;
use crate::output::ContentWriter;
use crate::prompt::PromptBuilder;
use crate::types::{ContentKind, ContentRequest};
use crate::{Error, ErrorContext, Result};

const ACTIVITY_DETAIL_MAX_CHARS: usize = 80;

#[derive(Debug)]
pub struct TutorSession {
    chain: ProviderChain,
    activity: ActivityLog,
    writer: Option<ContentWriter>,
}

impl TutorSession {
    pub fn new(chain: ProviderChain) -> Self {
        Self {
            chain,
            activity: ActivityLog::new(),
            writer: None,
        }
    }

    pub fn from_settings(settings: &ChainSettings) -> Result<Self> {
        Ok(Self::new(ProviderChain::from_settings(settings)?))
    }

    pub fn with_writer(mut self, writer: ContentWriter) -> Self {
        self.writer = Some(writer);
        self
    }

    pub fn with_activity_log(mut self, activity: ActivityLog) -> Self {
        self.activity = activity;
        self
    }

    pub fn chain(&self) -> &ProviderChain {
        &self.chain
    }

    pub fn activity(&self) -> &ActivityLog {
        &self.activity
    }

    /// Record something the host observed (a file opened, a command run).
    pub fn record(&mut self, kind: ActivityKind, detail: impl Into<String>) {
        self.activity.record(kind, detail);
    }

    pub async fn ask(&mut self, message: &str) -> Result<String> {
        self.generate(&ContentRequest::chat(message)).await
    }

    pub async fn generate(&mut self, request: &ContentRequest) -> Result<String> {
        Ok(self.generate_with_stats(request).await?.0)
    }

    pub async fn generate_with_stats(
        &mut self,
        request: &ContentRequest,
    ) -> Result<(String, ResolutionStats)> {
        validate(request)?;

        let context = self.activity.summary();
        let prompt = PromptBuilder::build(request, context.as_deref());
        let (text, stats) = self.chain.resolve_with_stats(&prompt, request).await;

        let (kind, detail) = match request.kind {
            ContentKind::Chat => (ActivityKind::ChatMessage, request.message.clone()),
            kind => (ActivityKind::ContentGenerated, format!("{} on {}", kind, request.topic.trim())),
        };
        self.activity.record(kind, truncate(&detail));

        Ok((text, stats))
    }

    /// Save content through the configured writer.
    pub async fn save(&mut self, filename: &str, content: &str) -> Result<PathBuf> {
        let writer = self.writer.as_ref().ok_or_else(|| {
            Error::configuration_with_context(
                "no output directory configured",
                ErrorContext::new().with_source("session"),
            )
        })?;
        let path = writer.write(filename, content).await?;
        self.activity
            .record(ActivityKind::FileSaved, path.display().to_string());
        Ok(path)
    }
}

fn validate(request: &ContentRequest) -> Result<()> {
    let (field, value) = match request.kind {
        ContentKind::Chat => ("request.message", &request.message),
        _ => ("request.topic", &request.topic),
    };
    if value.trim().is_empty() {
        return Err(Error::validation_with_context(
            format!("{} must not be empty", field.trim_start_matches("request.")),
            ErrorContext::new()
                .with_field_path(field)
                .with_details(format!("kind: {}", request.kind))
                .with_source("session"),
        ));
    }
    Ok(())
}

fn truncate(text: &str) -> String {
    let single_line = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if single_line.chars().count() <= ACTIVITY_DETAIL_MAX_CHARS {
        return single_line;
    }
    let mut cut: String = single_line.chars().take(ACTIVITY_DETAIL_MAX_CHARS).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_blank_fields() {
        let err = validate(&ContentRequest::new(ContentKind::Lesson, "  ")).unwrap_err();
        assert_eq!(
            err.context().and_then(|c| c.field_path.as_deref()),
            Some("request.topic")
        );
        let err = validate(&ContentRequest::chat("")).unwrap_err();
        assert_eq!(
            err.context().and_then(|c| c.field_path.as_deref()),
            Some("request.message")
        );
        assert!(validate(&ContentRequest::chat("hello")).is_ok());
    }

    #[test]
    fn test_truncate_collapses_whitespace_and_limits_length() {
        assert_eq!(truncate("a\n  b\tc"), "a b c");
        let long = "é".repeat(200);
        let cut = truncate(&long);
        assert_eq!(cut.chars().count(), ACTIVITY_DETAIL_MAX_CHARS + 1);
        assert!(cut.ends_with('…'));
    }

    #[tokio::test]
    async fn test_save_without_writer_is_configuration_error() {
        let mut session = TutorSession::new(ProviderChain::builder().build());
        let err = session.save("notes", "text").await.unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }
}
