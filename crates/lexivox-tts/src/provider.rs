//! The synthesis provider trait

use crate::error::TtsResult;
use crate::types::ProviderKind;
use async_trait::async_trait;
use std::path::Path;
use tracing::debug;

/// Uniform capability wrapper around one synthesis backend.
///
/// Implementations write a complete audio file to `out` on success. On any
/// failure they return an error and leave no partial output behind (see
/// [`discard_partial_output`]). Availability is resolved once at
/// construction; an unavailable provider must be skipped by callers without
/// attempting I/O.
///
/// No panic may cross this boundary — failures are converted into
/// [`crate::TtsError`] values the orchestrator treats uniformly.
#[async_trait]
pub trait SpeechProvider: Send + Sync {
    /// Which backend this is
    fn kind(&self) -> ProviderKind;

    /// Whether required credentials/binaries were present at startup
    fn is_available(&self) -> bool;

    /// Synthesize `text` with the given voice or language code into `out`.
    ///
    /// `voice_or_lang` is a named voice for cloud backends and a bare
    /// language code for the generic/espeak backends.
    async fn synthesize(&self, text: &str, voice_or_lang: &str, out: &Path) -> TtsResult<()>;
}

/// Best-effort removal of a partially written output artifact.
///
/// Adapters call this on their failure paths so a failed attempt never
/// leaves a truncated file where the next chain candidate will write.
/// Never raises.
pub fn discard_partial_output(path: &Path) {
    if path.exists() {
        if let Err(e) = std::fs::remove_file(path) {
            debug!(path = %path.display(), error = %e, "Failed to remove partial output");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discard_partial_output_is_best_effort() {
        // Removing a path that does not exist must not panic.
        discard_partial_output(Path::new("/nonexistent/lexivox-partial.wav"));
    }

    #[test]
    fn discard_partial_output_removes_file() {
        let dir = std::env::temp_dir();
        let path = dir.join("lexivox_partial_test.wav");
        std::fs::write(&path, b"truncated").unwrap();
        discard_partial_output(&path);
        assert!(!path.exists());
    }
}
