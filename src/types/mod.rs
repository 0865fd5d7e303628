//! Core request types.

pub mod content;

pub use content::{ContentKind, ContentRequest};
