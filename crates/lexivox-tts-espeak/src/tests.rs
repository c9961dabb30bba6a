//! Tests for the espeak backend

#[cfg(test)]
mod tests {
    use crate::EspeakProvider;
    use lexivox_tts::{ProviderKind, SpeechProvider, TtsError};

    #[test]
    fn provider_kind_is_espeak() {
        let provider = EspeakProvider::new();
        assert_eq!(provider.kind(), ProviderKind::Espeak);
    }

    #[test]
    fn availability_probe_does_not_panic() {
        // The test environment may or may not have espeak installed; the
        // probe itself must be safe either way.
        let provider = EspeakProvider::new();
        let _ = provider.is_available();
    }

    #[tokio::test]
    async fn empty_text_is_rejected_before_spawning() {
        let provider = EspeakProvider::with_binary("/nonexistent/espeak-ng".into());
        let out = std::env::temp_dir().join("lexivox_espeak_empty.wav");
        let err = provider.synthesize("   ", "en", &out).await.unwrap_err();
        assert!(matches!(err, TtsError::InvalidInput(_)));
        assert!(!out.exists());
    }

    #[tokio::test]
    async fn missing_binary_fails_without_partial_output() {
        let provider = EspeakProvider::with_binary("/nonexistent/espeak-ng".into());
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("clip.wav");
        let result = provider.synthesize("salve munde", "la", &out).await;
        assert!(result.is_err());
        assert!(!out.exists());
    }
}
