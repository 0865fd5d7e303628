//! Writing generated content to disk.

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::Result;

/// Subdirectory under the writer's root that receives every file.
pub const OUTPUT_DIR: &str = "generated";

const DEFAULT_EXTENSION: &str = "md";

static UNSAFE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9._-]+").expect("static regex is valid"));

/// Reduce an arbitrary name to a safe, flat file name.
///
/// Lower-cases, collapses anything outside `[a-z0-9._-]` into `-`, strips leading and
/// trailing `-`/`.` (so no hidden files or `..`), and adds `.md` when there is no extension.
pub fn sanitize_filename(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    let replaced = UNSAFE_RUN.replace_all(&lowered, "-");
    let trimmed = replaced.trim_matches(|c: char| c == '-' || c == '.');

    let base = if trimmed.is_empty() { "untitled" } else { trimmed };
    if base.contains('.') {
        base.to_string()
    } else {
        format!("{}.{}", base, DEFAULT_EXTENSION)
    }
}

/// Writes content verbatim as UTF-8 into `<root>/generated/`.
#[derive(Debug, Clone)]
pub struct ContentWriter {
    root: PathBuf,
}

impl ContentWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root.join(OUTPUT_DIR)
    }

    /// Write `content` under a sanitized `filename`, creating the output directory if needed.
    /// An existing file with the same name is overwritten.
    pub async fn write(&self, filename: &str, content: &str) -> Result<PathBuf> {
        let dir = self.output_dir();
        tokio::fs::create_dir_all(&dir).await?;

        let path = dir.join(sanitize_filename(filename));
        tokio::fs::write(&path, content.as_bytes()).await?;

        info!(path = %path.display(), bytes = content.len(), "wrote generated content");
        Ok(path)
    }
}
