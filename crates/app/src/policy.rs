//! Voice resolution policy
//!
//! Maps a segment's (role, language-class) pair to an ordered chain of
//! (provider, voice) candidates. Language-class is a coarse prefix bucket,
//! not locale resolution: a back-side hint beginning with "la" selects the
//! extended Latin chain, everything else the plain generic chain.

use lexivox_tts::{ProviderKind, Role, Segment, VoiceCandidate};

use crate::config::AppConfig;

/// Coarse class check for the secondary-language role.
pub fn is_latin_class(hint: &str) -> bool {
    hint.to_lowercase().starts_with("la")
}

/// Fallback language codes for a non-Latin back segment, tried after the
/// raw hint itself: the hint's root, then Italian, then English.
///
/// The root is included only when the hint is not already English, matching
/// the service this replaces.
pub fn fallback_codes(hint: &str) -> Vec<String> {
    let mut codes = Vec::new();
    if !hint.is_empty() && hint != "en" {
        codes.push(hint.split('-').next().unwrap_or(hint).to_string());
    }
    codes.push("it".to_string());
    codes.push("en".to_string());
    codes
}

/// Builds candidate chains from the immutable configuration.
pub struct VoicePolicy {
    config: AppConfig,
}

impl VoicePolicy {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// The ordered chain for one segment. The first candidate that
    /// synthesizes wins; the orchestrator substitutes silence when the
    /// whole chain fails.
    pub fn chain_for(&self, segment: &Segment) -> Vec<VoiceCandidate> {
        match segment.role {
            Role::Front => self.front_chain(&segment.lang_hint),
            Role::Back => {
                if is_latin_class(&segment.lang_hint) {
                    self.latin_chain()
                } else {
                    self.back_chain(&segment.lang_hint)
                }
            }
        }
    }

    /// Front: the preferred provider with its single configured voice, then
    /// the generic provider with the raw hint.
    fn front_chain(&self, hint: &str) -> Vec<VoiceCandidate> {
        let mut chain = Vec::new();

        let preferred = self.config.preferred_front_provider;
        let voice = match preferred {
            ProviderKind::Google => &self.config.google_front_voice,
            ProviderKind::Polly => &self.config.polly_front_voice,
            _ => &self.config.azure_front_voice,
        };
        // An unset voice falls back to the language hint, which the cloud
        // adapters accept as a bare locale.
        let voice = if voice.is_empty() { hint } else { voice };
        chain.push(VoiceCandidate::new(preferred, voice));

        let generic_lang = if hint.to_lowercase().starts_with("en") {
            "en"
        } else {
            hint
        };
        chain.push(VoiceCandidate::new(ProviderKind::Generic, generic_lang));
        chain
    }

    /// Back, Latin class: the fixed five-stage chain. Stages with empty
    /// voice lists contribute nothing and the walk moves straight on.
    fn latin_chain(&self) -> Vec<VoiceCandidate> {
        let mut chain = vec![VoiceCandidate::new(ProviderKind::Generic, "la")];
        for voice in &self.config.google_latin_voices {
            chain.push(VoiceCandidate::new(ProviderKind::Google, voice));
        }
        for voice in &self.config.azure_latin_voices {
            chain.push(VoiceCandidate::new(ProviderKind::Azure, voice));
        }
        for voice in &self.config.polly_latin_voices {
            chain.push(VoiceCandidate::new(ProviderKind::Polly, voice));
        }
        // Terminal stage: generic English always closes the chain.
        chain.push(VoiceCandidate::new(ProviderKind::Generic, "en"));
        chain
    }

    /// Back, any other language: generic with the hint, then the fallback
    /// code list, all through the generic provider.
    fn back_chain(&self, hint: &str) -> Vec<VoiceCandidate> {
        let mut chain = vec![VoiceCandidate::new(ProviderKind::Generic, hint)];
        for code in fallback_codes(hint) {
            chain.push(VoiceCandidate::new(ProviderKind::Generic, code));
        }
        chain
    }
}
