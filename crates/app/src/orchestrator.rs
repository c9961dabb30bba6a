//! Fallback orchestrator
//!
//! Walks a segment's candidate chain through the registered providers until
//! one produces audio. Every attempt gets its own scoped temp file and a
//! bounded deadline; an exhausted chain becomes a fixed-duration silence so
//! one bad segment never aborts the batch.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use lexivox_tts::{
    ClipFormat, ProviderKind, Segment, SegmentAudio, SpeechProvider, TtsError, TtsResult,
    VoiceCandidate,
};
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::policy::VoicePolicy;

/// Duration of the silence substituted when a whole chain fails.
pub const FALLBACK_SILENCE_MS: u64 = 700;

/// The process-wide, read-only set of constructed providers.
#[derive(Default)]
pub struct ProviderSet {
    providers: HashMap<ProviderKind, Arc<dyn SpeechProvider>>,
}

impl ProviderSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, provider: Arc<dyn SpeechProvider>) {
        self.providers.insert(provider.kind(), provider);
    }

    pub fn get(&self, kind: ProviderKind) -> Option<&Arc<dyn SpeechProvider>> {
        self.providers.get(&kind)
    }

    /// Availability flags for the health surface.
    pub fn availability(&self) -> HashMap<String, bool> {
        self.providers
            .iter()
            .map(|(kind, p)| (kind.to_string(), p.is_available()))
            .collect()
    }
}

pub struct Orchestrator {
    providers: Arc<ProviderSet>,
    policy: VoicePolicy,
    attempt_timeout: Duration,
    temp_dir: PathBuf,
}

impl Orchestrator {
    pub fn new(
        providers: Arc<ProviderSet>,
        policy: VoicePolicy,
        attempt_timeout: Duration,
        temp_dir: PathBuf,
    ) -> Self {
        Self {
            providers,
            policy,
            attempt_timeout,
            temp_dir,
        }
    }

    /// Synthesize one segment via its policy-resolved chain.
    pub async fn synthesize_segment(&self, segment: &Segment) -> SegmentAudio {
        let chain = self.policy.chain_for(segment);
        self.first_success(&segment.text, &chain).await
    }

    /// Synthesize via the generic provider only, bypassing the policy.
    ///
    /// Used by the single-snippet surface. Unlike the chain walk this
    /// surfaces the failure instead of substituting silence.
    pub async fn synthesize_generic(&self, text: &str, lang: &str) -> TtsResult<SegmentAudio> {
        let candidate = VoiceCandidate::new(ProviderKind::Generic, lang);
        let provider = self
            .providers
            .get(ProviderKind::Generic)
            .ok_or_else(|| TtsError::NotAvailable("generic provider not registered".to_string()))?;
        self.attempt(provider, text, &candidate.voice).await
    }

    /// First-success combinator over an ordered candidate list.
    ///
    /// Unavailable providers are skipped without I/O; the first candidate
    /// that produces audio wins and later ones are never invoked. When the
    /// chain is exhausted the result is a fixed-duration silence entry.
    pub async fn first_success(&self, text: &str, chain: &[VoiceCandidate]) -> SegmentAudio {
        for candidate in chain {
            let Some(provider) = self.providers.get(candidate.provider) else {
                continue;
            };
            if !provider.is_available() {
                debug!(provider = %candidate.provider, "Skipping unavailable provider");
                continue;
            }
            match self.attempt(provider, text, &candidate.voice).await {
                Ok(audio) => {
                    debug!(provider = %candidate.provider, voice = %candidate.voice, "Chain candidate succeeded");
                    return audio;
                }
                Err(e) => {
                    debug!(provider = %candidate.provider, voice = %candidate.voice, error = %e, "Chain candidate failed");
                }
            }
        }
        warn!(
            text_len = text.len(),
            "All chain candidates failed; substituting silence"
        );
        SegmentAudio::Silence {
            ms: FALLBACK_SILENCE_MS,
        }
    }

    /// One bounded attempt against one provider, through a scoped temp file
    /// that is removed on every exit path.
    async fn attempt(
        &self,
        provider: &Arc<dyn SpeechProvider>,
        text: &str,
        voice: &str,
    ) -> TtsResult<SegmentAudio> {
        let scratch = tempfile::Builder::new()
            .prefix("lexivox_seg_")
            .suffix(".clip")
            .tempfile_in(&self.temp_dir)?;
        let path = scratch.path().to_path_buf();

        let result = timeout(self.attempt_timeout, provider.synthesize(text, voice, &path)).await;
        match result {
            Ok(Ok(())) => {
                let bytes = tokio::fs::read(&path).await?;
                if bytes.is_empty() {
                    return Err(TtsError::MalformedResponse(
                        "provider wrote no audio".to_string(),
                    ));
                }
                let format = ClipFormat::sniff(&bytes);
                Ok(SegmentAudio::Clip { bytes, format })
            }
            Ok(Err(e)) => Err(e),
            Err(_) => Err(TtsError::Synthesis(format!(
                "attempt timed out after {:?}",
                self.attempt_timeout
            ))),
        }
        // `scratch` drops here, deleting the file best-effort.
    }
}
