//! Generic translate-TTS adapter
//!
//! The provider-agnostic fallback: an unauthenticated endpoint that accepts
//! a bare language code, with an optional local-engine fallback behind it.
//! This mirrors the original service's generic path (public endpoint first,
//! local engine as last resort) and is the terminal stage of every chain.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use lexivox_tts::{discard_partial_output, ProviderKind, SpeechProvider, TtsError, TtsResult};
use tracing::{debug, warn};

const TRANSLATE_TTS_URL: &str = "https://translate.google.com/translate_tts";
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36";

pub struct GenericProvider {
    client: reqwest::Client,
    fallback: Option<Arc<dyn SpeechProvider>>,
}

impl GenericProvider {
    /// `fallback` is typically the local espeak provider; it is consulted
    /// only when the network path fails and it reports itself available.
    pub fn new(client: reqwest::Client, fallback: Option<Arc<dyn SpeechProvider>>) -> Self {
        Self { client, fallback }
    }

    async fn synthesize_remote(&self, text: &str, lang: &str, out: &Path) -> TtsResult<()> {
        let response = self
            .client
            .get(TRANSLATE_TTS_URL)
            .header("User-Agent", USER_AGENT)
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", lang),
                ("q", text),
            ])
            .send()
            .await
            .map_err(|e| TtsError::Provider {
                provider: "generic".to_string(),
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(TtsError::Provider {
                provider: "generic".to_string(),
                message: format!("HTTP {}", response.status()),
            });
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| TtsError::MalformedResponse(e.to_string()))?;
        if audio.is_empty() {
            return Err(TtsError::MalformedResponse("empty audio response".to_string()));
        }

        if let Err(e) = tokio::fs::write(out, &audio).await {
            discard_partial_output(out);
            return Err(e.into());
        }
        Ok(())
    }
}

#[async_trait]
impl SpeechProvider for GenericProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Generic
    }

    /// The endpoint needs no credentials, so the generic provider is always
    /// a candidate. Network failures are handled per attempt.
    fn is_available(&self) -> bool {
        true
    }

    async fn synthesize(&self, text: &str, voice_or_lang: &str, out: &Path) -> TtsResult<()> {
        if text.trim().is_empty() {
            return Err(TtsError::InvalidInput("empty text".to_string()));
        }
        let lang = if voice_or_lang.is_empty() {
            "en"
        } else {
            voice_or_lang
        };

        match self.synthesize_remote(text, lang, out).await {
            Ok(()) => Ok(()),
            Err(remote_err) => {
                let Some(fallback) = self.fallback.as_ref().filter(|f| f.is_available()) else {
                    return Err(remote_err);
                };
                warn!(lang, error = %remote_err, "Translate endpoint failed, trying local engine");
                // espeak voices are bare lowercase codes ("it", not "it-IT").
                let root = lang.split('-').next().unwrap_or(lang).to_lowercase();
                fallback.synthesize(text, &root, out).await.map_err(|e| {
                    debug!(error = %e, "Local fallback failed as well");
                    e
                })
            }
        }
    }
}
