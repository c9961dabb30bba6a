//! AWS Polly adapter

use std::io::Cursor;
use std::path::Path;

use async_trait::async_trait;
use aws_sdk_polly::types::{OutputFormat, VoiceId};
use hound::{SampleFormat, WavSpec, WavWriter};
use lexivox_tts::{discard_partial_output, ProviderKind, SpeechProvider, TtsError, TtsResult};
use tracing::debug;

/// Polly emits headerless PCM; 16 kHz is the highest rate it supports.
const PCM_SAMPLE_RATE: u32 = 16_000;

/// AWS Polly over the official SDK.
///
/// Availability requires AWS credentials in the environment; the client is
/// only constructed when they are present. Polly's PCM output carries no
/// container, so clips are wrapped into WAV before they hit disk.
pub struct PollyProvider {
    client: Option<aws_sdk_polly::Client>,
}

impl PollyProvider {
    pub async fn new() -> Self {
        let has_credentials =
            std::env::var("AWS_ACCESS_KEY_ID").is_ok() || std::env::var("AWS_PROFILE").is_ok();
        if !has_credentials {
            return Self { client: None };
        }
        let config = aws_config::load_from_env().await;
        Self {
            client: Some(aws_sdk_polly::Client::new(&config)),
        }
    }

    /// A provider that always reports unavailable (used by tests).
    pub fn disabled() -> Self {
        Self { client: None }
    }
}

fn pcm_to_wav(pcm: &[u8]) -> TtsResult<Vec<u8>> {
    let spec = WavSpec {
        channels: 1,
        sample_rate: PCM_SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    let mut writer = WavWriter::new(&mut cursor, spec)
        .map_err(|e| TtsError::MalformedResponse(e.to_string()))?;
    for sample in pcm.chunks_exact(2) {
        writer
            .write_sample(i16::from_le_bytes([sample[0], sample[1]]))
            .map_err(|e| TtsError::MalformedResponse(e.to_string()))?;
    }
    writer
        .finalize()
        .map_err(|e| TtsError::MalformedResponse(e.to_string()))?;
    Ok(cursor.into_inner())
}

#[async_trait]
impl SpeechProvider for PollyProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Polly
    }

    fn is_available(&self) -> bool {
        self.client.is_some()
    }

    async fn synthesize(&self, text: &str, voice_or_lang: &str, out: &Path) -> TtsResult<()> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| TtsError::NotAvailable("AWS credentials not set".to_string()))?;

        debug!(voice = voice_or_lang, "Polly request");

        let response = client
            .synthesize_speech()
            .text(text)
            .voice_id(VoiceId::from(voice_or_lang))
            .output_format(OutputFormat::Pcm)
            .sample_rate(PCM_SAMPLE_RATE.to_string())
            .send()
            .await
            .map_err(|e| TtsError::Provider {
                provider: "polly".to_string(),
                message: e.to_string(),
            })?;

        let pcm = response
            .audio_stream
            .collect()
            .await
            .map_err(|e| TtsError::MalformedResponse(e.to_string()))?
            .into_bytes();
        if pcm.is_empty() {
            return Err(TtsError::MalformedResponse("empty audio stream".to_string()));
        }

        let wav = pcm_to_wav(&pcm)?;
        if let Err(e) = tokio::fs::write(out, &wav).await {
            discard_partial_output(out);
            return Err(e.into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pcm_wrap_produces_riff_header() {
        let pcm: Vec<u8> = (0i16..64).flat_map(|s| s.to_le_bytes()).collect();
        let wav = pcm_to_wav(&pcm).unwrap();
        assert_eq!(&wav[0..4], b"RIFF");
        let reader = hound::WavReader::new(Cursor::new(wav)).unwrap();
        assert_eq!(reader.spec().sample_rate, PCM_SAMPLE_RATE);
        assert_eq!(reader.len(), 64);
    }

    #[tokio::test]
    async fn disabled_provider_is_unavailable() {
        let provider = PollyProvider::disabled();
        assert!(!provider.is_available());
        let out = std::env::temp_dir().join("lexivox_polly_disabled.wav");
        let err = provider.synthesize("salve", "Carla", &out).await.unwrap_err();
        assert!(matches!(err, TtsError::NotAvailable(_)));
    }
}
