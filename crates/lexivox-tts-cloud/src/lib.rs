//! HTTP-backed synthesis providers for Lexivox
//!
//! Four adapters share this crate: the unauthenticated translate-TTS
//! endpoint (with an optional local-engine fallback), Google Cloud TTS,
//! Azure Cognitive Speech, and AWS Polly. Each resolves its availability
//! once at construction from the environment and converts every transport
//! failure into the uniform [`lexivox_tts::TtsError`] contract.

pub mod azure;
pub mod generic;
pub mod google;
pub mod polly;

pub use azure::AzureProvider;
pub use generic::GenericProvider;
pub use google::GoogleProvider;
pub use polly::PollyProvider;

/// Split a cloud voice identifier into (language code, named voice).
///
/// "it-IT-Wavenet-A" is a named voice in locale "it-IT"; "en" or "en-US"
/// are bare language codes with no named voice.
pub(crate) fn split_locale_voice(voice: &str) -> (String, Option<String>) {
    let parts: Vec<&str> = voice.split('-').collect();
    if parts.len() > 2 {
        (format!("{}-{}", parts[0], parts[1]), Some(voice.to_string()))
    } else {
        (voice.to_string(), None)
    }
}

#[cfg(test)]
mod tests {
    use super::split_locale_voice;

    #[test]
    fn named_voice_keeps_locale_prefix() {
        let (lang, name) = split_locale_voice("it-IT-Wavenet-A");
        assert_eq!(lang, "it-IT");
        assert_eq!(name.as_deref(), Some("it-IT-Wavenet-A"));
    }

    #[test]
    fn bare_codes_have_no_voice_name() {
        assert_eq!(split_locale_voice("la"), ("la".to_string(), None));
        assert_eq!(split_locale_voice("en-US"), ("en-US".to_string(), None));
    }
}
