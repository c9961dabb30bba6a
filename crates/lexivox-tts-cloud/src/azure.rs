//! Azure Cognitive Services Speech adapter
//!
//! Serves the same voice catalog the original edge-tts voices come from
//! (en-US-AriaNeural, it-IT-ElsaNeural, ...), over the documented REST
//! surface. Keyed by `AZURE_SPEECH_KEY` + `AZURE_SPEECH_REGION`.

use std::path::Path;

use async_trait::async_trait;
use lexivox_tts::{discard_partial_output, ProviderKind, SpeechProvider, TtsError, TtsResult};
use tracing::debug;

use crate::split_locale_voice;

const OUTPUT_FORMAT: &str = "riff-24khz-16bit-mono-pcm";

pub struct AzureProvider {
    client: reqwest::Client,
    key: Option<String>,
    region: Option<String>,
}

impl AzureProvider {
    pub fn new(client: reqwest::Client) -> Self {
        let key = std::env::var("AZURE_SPEECH_KEY").ok().filter(|k| !k.is_empty());
        let region = std::env::var("AZURE_SPEECH_REGION")
            .ok()
            .filter(|r| !r.is_empty());
        Self {
            client,
            key,
            region,
        }
    }

    fn endpoint(&self) -> Option<String> {
        self.region
            .as_ref()
            .map(|r| format!("https://{r}.tts.speech.microsoft.com/cognitiveservices/v1"))
    }
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[async_trait]
impl SpeechProvider for AzureProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Azure
    }

    fn is_available(&self) -> bool {
        self.key.is_some() && self.region.is_some()
    }

    async fn synthesize(&self, text: &str, voice_or_lang: &str, out: &Path) -> TtsResult<()> {
        let key = self
            .key
            .as_ref()
            .ok_or_else(|| TtsError::NotAvailable("AZURE_SPEECH_KEY not set".to_string()))?;
        let endpoint = self
            .endpoint()
            .ok_or_else(|| TtsError::NotAvailable("AZURE_SPEECH_REGION not set".to_string()))?;

        let (lang, _) = split_locale_voice(voice_or_lang);
        let ssml = format!(
            "<speak version='1.0' xml:lang='{lang}'><voice name='{voice}'>{text}</voice></speak>",
            voice = voice_or_lang,
            text = escape_xml(text),
        );

        debug!(voice = voice_or_lang, "Azure TTS request");

        let response = self
            .client
            .post(&endpoint)
            .header("Ocp-Apim-Subscription-Key", key)
            .header("Content-Type", "application/ssml+xml")
            .header("X-Microsoft-OutputFormat", OUTPUT_FORMAT)
            .header("User-Agent", "lexivox")
            .body(ssml)
            .send()
            .await
            .map_err(|e| TtsError::Provider {
                provider: "azure".to_string(),
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(TtsError::Provider {
                provider: "azure".to_string(),
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

#[cfg(test)]
mod tests {
    use super::escape_xml;

    #[test]
    fn xml_escaping_covers_markup_characters() {
        assert_eq!(escape_xml("bread & <butter>"), "bread &amp; &lt;butter&gt;");
    }
}
