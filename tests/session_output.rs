//! Session flows: validation, activity context and saving output.

use ai_tutor_rust::{
    ActivityKind, ContentKind, ContentRequest, ContentWriter, Error, ProviderChain, ProviderError,
    ResponseProvider, TutorSession,
};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Echoes the prompt and counts calls.
#[derive(Debug, Default)]
struct Echo {
    calls: AtomicUsize,
}

#[async_trait]
impl ResponseProvider for Echo {
    fn name(&self) -> &str {
        "echo"
    }

    async fn respond(&self, prompt: &str) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(prompt.to_string())
    }
}

fn session_with_echo() -> (TutorSession, Arc<Echo>) {
    let echo = Arc::new(Echo::default());
    let chain = ProviderChain::builder().provider_arc(echo.clone()).build();
    (TutorSession::new(chain), echo)
}

#[tokio::test]
async fn test_empty_topic_is_rejected_before_the_chain() {
    let (mut session, echo) = session_with_echo();

    let err = session
        .generate(&ContentRequest::new(ContentKind::Lesson, ""))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Validation { .. }));
    assert_eq!(echo.calls.load(Ordering::SeqCst), 0);
    assert!(session.activity().is_empty());
}

#[tokio::test]
async fn test_empty_chat_message_is_rejected() {
    let (mut session, echo) = session_with_echo();
    assert!(session.ask("   ").await.is_err());
    assert_eq!(echo.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_activity_feeds_later_prompts() {
    let (mut session, _echo) = session_with_echo();
    session.record(ActivityKind::FileOpened, "src/parser.rs");

    let first = session.ask("What does this parser do?").await.unwrap();
    assert!(first.contains("opened file: src/parser.rs"));

    let second = session
        .generate(&ContentRequest::new(ContentKind::Exercise, "Parsing").with_domain("Rust"))
        .await
        .unwrap();
    assert!(second.contains("asked: What does this parser do?"));

    let kinds: Vec<ActivityKind> = session.activity().snapshot().iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ActivityKind::FileOpened,
            ActivityKind::ChatMessage,
            ActivityKind::ContentGenerated
        ]
    );
}

#[tokio::test]
async fn test_save_writes_into_generated_subdirectory() {
    let dir = tempfile::tempdir().unwrap();
    let (session, _echo) = session_with_echo();
    let mut session = session.with_writer(ContentWriter::new(dir.path()));

    let path = session.save("Rust Ownership: Lesson 1", "# Ownership\n\nü ✓\n").await.unwrap();

    assert_eq!(path, dir.path().join("generated").join("rust-ownership-lesson-1.md"));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "# Ownership\n\nü ✓\n");
    let last = session.activity().snapshot().pop().unwrap();
    assert_eq!(last.kind, ActivityKind::FileSaved);
}

#[tokio::test]
async fn test_writer_overwrites_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let writer = ContentWriter::new(dir.path());

    writer.write("notes.md", "first").await.unwrap();
    let path = writer.write("notes.md", "second").await.unwrap();

    assert_eq!(std::fs::read_to_string(path).unwrap(), "second");
    assert_eq!(std::fs::read_dir(writer.output_dir()).unwrap().count(), 1);
}
