//! Scripted fake providers for chain tests

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use lexivox_tts::{ProviderKind, SpeechProvider, TtsError, TtsResult};

/// A provider with a fixed, observable behavior: succeed, fail, hang, or
/// report itself unavailable. Call counts expose which chain stages ran.
pub struct ScriptedProvider {
    kind: ProviderKind,
    available: bool,
    fail: bool,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn succeeding(kind: ProviderKind) -> Self {
        Self {
            kind,
            available: true,
            fail: false,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(kind: ProviderKind) -> Self {
        Self {
            fail: true,
            ..Self::succeeding(kind)
        }
    }

    pub fn unavailable(kind: ProviderKind) -> Self {
        Self {
            available: false,
            ..Self::succeeding(kind)
        }
    }

    pub fn slow(kind: ProviderKind, delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::succeeding(kind)
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

/// Minimal RIFF-prefixed payload; enough for format sniffing.
pub fn fake_wav_bytes() -> Vec<u8> {
    let mut bytes = b"RIFF\x24\x00\x00\x00WAVE".to_vec();
    bytes.extend_from_slice(&[0u8; 32]);
    bytes
}

#[async_trait]
impl SpeechProvider for ScriptedProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    fn is_available(&self) -> bool {
        self.available
    }

    async fn synthesize(&self, text: &str, _voice: &str, out: &Path) -> TtsResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        // Real adapters refuse empty input; mirror that contract.
        if text.trim().is_empty() {
            return Err(TtsError::InvalidInput("empty text".to_string()));
        }
        if self.fail {
            return Err(TtsError::Synthesis("scripted failure".to_string()));
        }
        tokio::fs::write(out, fake_wav_bytes()).await?;
        Ok(())
    }
}
