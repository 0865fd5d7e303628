//! Prompt assembly.
//!
//! Steps: preamble → kind requirements → optional recent activity → request fields.
//! Pure formatting; nothing here validates the request.

use std::fmt;

use crate::types::{ContentKind, ContentRequest};

const PREAMBLE: &str = "You are an AI learning assistant built into a code editor. \
You help developers learn technologies and practices by producing clear, accurate and \
well-structured educational material. Prefer concrete examples over abstract description.";

/// Fully assembled instruction text sent to a provider. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt(String);

impl Prompt {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Prompt {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

pub struct PromptBuilder;

impl PromptBuilder {
    /// Assemble the prompt for a request. `context` is the recent-activity summary, if any.
    pub fn build(request: &ContentRequest, context: Option<&str>) -> Prompt {
        let mut sections = vec![PREAMBLE.to_string(), Self::requirements(request.kind).to_string()];

        if let Some(ctx) = context.map(str::trim).filter(|c| !c.is_empty()) {
            sections.push(format!("Recent activity in this session:\n{}", ctx));
        }

        sections.push(Self::fields(request));
        Prompt(sections.join("\n\n"))
    }

    /// Convenience for a free-form chat message.
    pub fn chat(message: &str, context: Option<&str>) -> Prompt {
        Self::build(&ContentRequest::chat(message), context)
    }

    fn requirements(kind: ContentKind) -> &'static str {
        match kind {
            ContentKind::Outline => "Produce a course outline in Markdown with:\n\
                - a title and a one-paragraph overview\n\
                - 5 to 8 modules, each with a one-line goal and 3 to 5 subtopics\n\
                - a closing list of prerequisites",
            ContentKind::Lesson => "Write a lesson in Markdown with:\n\
                - learning objectives\n\
                - an explanation split into short sections\n\
                - at least one worked code example\n\
                - a short recap",
            ContentKind::Exercise => "Write a hands-on exercise in Markdown with:\n\
                - a problem statement\n\
                - starter code\n\
                - step-by-step hints\n\
                - a reference solution in its own section",
            ContentKind::Quiz => "Write a quiz in Markdown with:\n\
                - 5 multiple-choice questions, options labelled A to D\n\
                - an answer key with a one-sentence explanation per answer",
            ContentKind::Summary => "Write a concise summary in Markdown with:\n\
                - key concepts as bullet points\n\
                - common pitfalls\n\
                - suggested next steps",
            ContentKind::Chat => "Answer the developer's message conversationally and concisely. \
                Use fenced code blocks for any code.",
        }
    }

    fn fields(request: &ContentRequest) -> String {
        if request.kind == ContentKind::Chat {
            return format!("User message:\n{}", request.message);
        }

        let mut lines = vec![format!("Topic: {}", request.topic)];
        if let Some(domain) = request.domain() {
            lines.push(format!("Domain: {}", domain));
        }
        if !request.message.trim().is_empty() {
            lines.push(format!("Additional notes: {}", request.message));
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_prompt_keeps_message_verbatim() {
        let msg = "How do I debug my code?  (tabs\tand ünïcödé)";
        let prompt = PromptBuilder::chat(msg, None);
        assert!(prompt.as_str().starts_with(PREAMBLE));
        assert!(prompt.as_str().ends_with(msg));
        assert!(!prompt.as_str().contains("Recent activity"));
    }

    #[test]
    fn test_context_section_is_inserted_before_fields() {
        let req = ContentRequest::new(ContentKind::Quiz, "Borrowing").with_domain("Rust");
        let prompt = PromptBuilder::build(&req, Some("- opened src/main.rs"));
        let text = prompt.as_str();
        let ctx_at = text.find("Recent activity").unwrap();
        let topic_at = text.find("Topic: Borrowing").unwrap();
        assert!(ctx_at < topic_at);
        assert!(text.contains("Domain: Rust"));
        assert!(text.contains("multiple-choice"));
    }

    #[test]
    fn test_blank_context_is_skipped() {
        let prompt = PromptBuilder::chat("hi", Some("   "));
        assert!(!prompt.as_str().contains("Recent activity"));
    }

    #[test]
    fn test_each_kind_has_distinct_requirements() {
        let mut seen = std::collections::HashSet::new();
        for kind in ContentKind::ALL {
            assert!(seen.insert(PromptBuilder::requirements(kind)));
        }
    }

    #[test]
    fn test_empty_topic_does_not_panic() {
        let req = ContentRequest::new(ContentKind::Lesson, "");
        let prompt = PromptBuilder::build(&req, None);
        assert!(prompt.as_str().ends_with("Topic: "));
        assert!(!prompt.is_empty());
    }

    #[test]
    fn test_notes_are_appended_when_present() {
        let req = ContentRequest::new(ContentKind::Exercise, "Iterators")
            .with_message("Keep it under 30 lines");
        let text = PromptBuilder::build(&req, None).into_string();
        assert!(text.contains("Additional notes: Keep it under 30 lines"));
    }
}
