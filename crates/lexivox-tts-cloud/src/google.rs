//! Google Cloud Text-to-Speech adapter

use std::path::Path;

use async_trait::async_trait;
use base64::Engine;
use lexivox_tts::{discard_partial_output, ProviderKind, SpeechProvider, TtsError, TtsResult};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::split_locale_voice;

const SYNTHESIZE_URL: &str = "https://texttospeech.googleapis.com/v1/text:synthesize";

#[derive(Deserialize)]
struct SynthesizeResponse {
    #[serde(rename = "audioContent")]
    audio_content: String,
}

/// Google Cloud TTS over the REST surface, keyed by `GOOGLE_API_KEY`.
///
/// Requests LINEAR16 output so clips arrive as WAV. The voice argument is
/// either a named voice ("it-IT-Wavenet-A") or a bare language code, in
/// which case Google picks a default voice for the locale.
pub struct GoogleProvider {
    client: reqwest::Client,
    api_key: Option<String>,
    sample_rate: u32,
}

impl GoogleProvider {
    pub fn new(client: reqwest::Client, sample_rate: u32) -> Self {
        let api_key = std::env::var("GOOGLE_API_KEY").ok().filter(|k| !k.is_empty());
        Self {
            client,
            api_key,
            sample_rate,
        }
    }
}

#[async_trait]
impl SpeechProvider for GoogleProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Google
    }

    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    async fn synthesize(&self, text: &str, voice_or_lang: &str, out: &Path) -> TtsResult<()> {
        let key = self
            .api_key
            .as_ref()
            .ok_or_else(|| TtsError::NotAvailable("GOOGLE_API_KEY not set".to_string()))?;

        let (language_code, voice_name) = split_locale_voice(voice_or_lang);
        let mut voice = json!({ "languageCode": language_code });
        if let Some(name) = voice_name {
            voice["name"] = json!(name);
        } else {
            voice["ssmlGender"] = json!("NEUTRAL");
        }

        let body = json!({
            "input": { "text": text },
            "voice": voice,
            "audioConfig": {
                "audioEncoding": "LINEAR16",
                "sampleRateHertz": self.sample_rate,
            },
        });

        debug!(voice = voice_or_lang, "Google TTS request");

        let response = self
            .client
            .post(SYNTHESIZE_URL)
            .query(&[("key", key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| TtsError::Provider {
                provider: "google".to_string(),
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(TtsError::Provider {
                provider: "google".to_string(),
                message: format!("HTTP {}", response.status()),
            });
        }

        let parsed: SynthesizeResponse =
            response.json().await.map_err(|e| TtsError::MalformedResponse(e.to_string()))?;
        let audio = base64::engine::general_purpose::STANDARD
            .decode(parsed.audio_content)
            .map_err(|e| TtsError::MalformedResponse(e.to_string()))?;
        if audio.is_empty() {
            return Err(TtsError::MalformedResponse("empty audio content".to_string()));
        }

        if let Err(e) = tokio::fs::write(out, &audio).await {
            discard_partial_output(out);
            return Err(e.into());
        }
        Ok(())
    }
}
