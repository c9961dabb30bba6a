//! espeak-ng synthesis backend for Lexivox
//!
//! Wraps the espeak-ng (or espeak) command-line engine. The binary is
//! resolved once at construction; when it is missing the provider reports
//! itself unavailable and the orchestrator skips it without spawning
//! anything.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use lexivox_tts::{discard_partial_output, ProviderKind, SpeechProvider, TtsError, TtsResult};
use tokio::process::Command;
use tracing::{debug, warn};

mod tests;

/// Local espeak-ng provider.
///
/// Synthesizes WAV files via `espeak-ng -v <lang> -w <out> <text>`. The
/// voice argument is a bare language code ("en", "la", "it").
pub struct EspeakProvider {
    binary: Option<PathBuf>,
}

impl EspeakProvider {
    /// Resolve the engine binary from `ESPEAK_BIN` or `PATH`.
    ///
    /// Prefers espeak-ng, falls back to classic espeak.
    pub fn new() -> Self {
        let binary = resolve_binary();
        match &binary {
            Some(bin) => debug!(bin = %bin.display(), "Detected espeak binary"),
            None => warn!("espeak-ng not found; local synthesis disabled"),
        }
        Self { binary }
    }

    /// Construct with an explicit binary path (used by tests).
    pub fn with_binary(binary: PathBuf) -> Self {
        Self {
            binary: Some(binary),
        }
    }
}

impl Default for EspeakProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn resolve_binary() -> Option<PathBuf> {
    if let Ok(p) = std::env::var("ESPEAK_BIN") {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return Some(pb);
        }
    }
    find_in_path("espeak-ng").or_else(|| find_in_path("espeak"))
}

fn find_in_path(bin: &str) -> Option<PathBuf> {
    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths)
        .map(|dir| dir.join(bin))
        .find(|candidate| candidate.exists())
}

#[async_trait]
impl SpeechProvider for EspeakProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Espeak
    }

    fn is_available(&self) -> bool {
        self.binary.is_some()
    }

    async fn synthesize(&self, text: &str, voice_or_lang: &str, out: &Path) -> TtsResult<()> {
        let bin = self
            .binary
            .as_ref()
            .ok_or_else(|| TtsError::NotAvailable("espeak-ng not found".to_string()))?;

        if text.trim().is_empty() {
            return Err(TtsError::InvalidInput("empty text".to_string()));
        }

        let lang = if voice_or_lang.is_empty() {
            "en"
        } else {
            voice_or_lang
        };

        debug!(lang, out = %out.display(), "Running espeak synthesis");

        let output = Command::new(bin)
            .arg("-v")
            .arg(lang)
            .arg("-w")
            .arg(out)
            .arg(text)
            .output()
            .await?;

        if !output.status.success() {
            discard_partial_output(out);
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TtsError::Provider {
                provider: "espeak".to_string(),
                message: stderr.trim().to_string(),
            });
        }

        // An exit status of 0 with no file written still counts as failure.
        let wrote_audio = tokio::fs::metadata(out).await.map(|m| m.len() > 0)?;
        if !wrote_audio {
            discard_partial_output(out);
            return Err(TtsError::MalformedResponse(
                "espeak produced no audio".to_string(),
            ));
        }

        Ok(())
    }
}
