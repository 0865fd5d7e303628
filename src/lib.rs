//! # ai-tutor-rust
//!
//! 面向编辑器内学习助手的多提供者运行时：按优先级依次调用文本生成服务，全部不可用时退回离线模板。
//!
//! Runtime for an in-editor learning assistant. A user's request is turned into a prompt,
//! sent to an ordered list of text-generation providers, and answered by the first one
//! that succeeds. When none are reachable a deterministic offline responder answers, so
//! every request gets a non-empty reply.
//!
//! ## Core Behaviour
//!
//! - **Ordered fallback**: hosted OpenAI → local Ollama-compatible server → hosted Anthropic
//! - **Absorbed failures**: missing credentials, network errors, bad statuses and malformed
//!   payloads are logged and skipped, never returned to the caller
//! - **Offline templates**: keyword-classified canned replies for chat, Markdown templates
//!   for outlines, lessons, exercises, quizzes and summaries
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ai_tutor_rust::{ChainSettings, ContentKind, ContentRequest, TutorSession};
//!
//! #[tokio::main]
//! async fn main() -> ai_tutor_rust::Result<()> {
//!     let mut session = TutorSession::from_settings(&ChainSettings::from_env()?)?;
//!
//!     let answer = session.ask("How do I debug my code?").await?;
//!     println!("{answer}");
//!
//!     let lesson = ContentRequest::new(ContentKind::Lesson, "Ownership").with_domain("Rust");
//!     println!("{}", session.generate(&lesson).await?);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`chain`] | Provider resolution chain and resolution stats |
//! | [`providers`] | `ResponseProvider` trait and the OpenAI, local and Anthropic providers |
//! | [`offline`] | Keyword-classified canned replies and content templates |
//! | [`prompt`] | Prompt assembly |
//! | [`activity`] | Bounded session activity log used as prompt context |
//! | [`session`] | Host session: validation, activity recording, saving output |
//! | [`output`] | Filename sanitizing and content writing |
//! | [`config`] | Provider settings from defaults, YAML and environment |
//! | [`transport`] | Shared HTTP client |

pub mod activity;
pub mod chain;
pub mod config;
pub mod offline;
pub mod output;
pub mod prompt;
pub mod providers;
pub mod session;
pub mod transport;
pub mod types;

// Re-export main types for convenience
pub use activity::{ActivityEntry, ActivityKind, ActivityLog};
pub use chain::{AttemptOutcome, AttemptRecord, ProviderChain, ProviderChainBuilder, ResolutionStats};
pub use config::ChainSettings;
pub use offline::{IndexSelector, OfflineResponder, SeededSelector};
pub use output::{sanitize_filename, ContentWriter};
pub use prompt::{Prompt, PromptBuilder};
pub use providers::{ProviderError, ResponseProvider};
pub use session::TutorSession;
pub use types::{ContentKind, ContentRequest};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
