//! Core types for speech synthesis

use serde::{Deserialize, Serialize};

/// Which half of a row a segment belongs to.
///
/// Front is the primary-language side of a card, Back the secondary
/// ("foreign") side. The voice resolution policy keys off this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Front,
    Back,
}

/// One unit of text to synthesize, produced per table cell.
///
/// Consumed exactly once by the fallback orchestrator.
#[derive(Debug, Clone)]
pub struct Segment {
    /// Text to speak
    pub text: String,
    /// Language hint, e.g. "en", "la", "it-IT". Coarse prefix matching only.
    pub lang_hint: String,
    /// Front or back of the row
    pub role: Role,
}

impl Segment {
    pub fn new(text: impl Into<String>, lang_hint: impl Into<String>, role: Role) -> Self {
        Self {
            text: text.into(),
            lang_hint: lang_hint.into(),
            role,
        }
    }
}

/// Identifies a synthesis backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderKind {
    /// Unauthenticated translate-TTS endpoint with a local-engine fallback
    Generic,
    /// Google Cloud Text-to-Speech
    Google,
    /// Azure Cognitive Services Speech
    Azure,
    /// AWS Polly
    Polly,
    /// Local espeak-ng engine
    Espeak,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Generic => "generic",
            ProviderKind::Google => "google",
            ProviderKind::Azure => "azure",
            ProviderKind::Polly => "polly",
            ProviderKind::Espeak => "espeak",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One (provider, voice) entry in a fallback chain.
///
/// `voice` is provider-specific: a named voice for the cloud backends, a
/// bare language code for the generic and espeak backends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceCandidate {
    pub provider: ProviderKind,
    pub voice: String,
}

impl VoiceCandidate {
    pub fn new(provider: ProviderKind, voice: impl Into<String>) -> Self {
        Self {
            provider,
            voice: voice.into(),
        }
    }
}

/// Container format of a synthesized clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipFormat {
    Wav,
    Mp3,
}

impl ClipFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ClipFormat::Wav => "wav",
            ClipFormat::Mp3 => "mp3",
        }
    }

    /// Classify clip bytes by container signature.
    ///
    /// Providers differ in what they emit (espeak writes RIFF/WAV, the
    /// translate endpoint returns MP3), so the tag is derived from the data
    /// rather than from which backend happened to win the chain.
    pub fn sniff(bytes: &[u8]) -> Self {
        if bytes.len() >= 4 && &bytes[0..4] == b"RIFF" {
            ClipFormat::Wav
        } else {
            ClipFormat::Mp3
        }
    }
}

/// Result of synthesizing one segment.
///
/// Either a clip loaded into memory, or a fixed-duration silence used when
/// every candidate in the segment's chain failed. Transient; never outlives
/// the request that produced it.
#[derive(Debug, Clone)]
pub enum SegmentAudio {
    Clip { bytes: Vec<u8>, format: ClipFormat },
    Silence { ms: u64 },
}

impl SegmentAudio {
    pub fn is_silence(&self) -> bool {
        matches!(self, SegmentAudio::Silence { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_kind_names_are_stable() {
        assert_eq!(ProviderKind::Generic.as_str(), "generic");
        assert_eq!(ProviderKind::Azure.to_string(), "azure");
    }

    #[test]
    fn clip_format_extensions() {
        assert_eq!(ClipFormat::Wav.extension(), "wav");
        assert_eq!(ClipFormat::Mp3.extension(), "mp3");
    }

    #[test]
    fn sniff_recognizes_riff_header() {
        assert_eq!(ClipFormat::sniff(b"RIFF\x24\x00\x00\x00WAVE"), ClipFormat::Wav);
        assert_eq!(ClipFormat::sniff(&[0xFF, 0xFB, 0x90, 0x00]), ClipFormat::Mp3);
        assert_eq!(ClipFormat::sniff(b""), ClipFormat::Mp3);
    }

    #[test]
    fn silence_is_silence() {
        assert!(SegmentAudio::Silence { ms: 700 }.is_silence());
        assert!(!SegmentAudio::Clip {
            bytes: vec![0u8; 4],
            format: ClipFormat::Wav
        }
        .is_silence());
    }
}
