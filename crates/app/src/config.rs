//! Process-wide configuration
//!
//! Read once at startup from environment variables and immutable for the
//! process lifetime. Concurrent requests share it read-only.

use std::path::PathBuf;
use std::time::Duration;

use lexivox_tts::ProviderKind;

/// Pause and repeat defaults applied when a request omits an override.
#[derive(Debug, Clone, Copy)]
pub struct RowDefaults {
    pub front_to_back_ms: u64,
    pub between_rows_ms: u64,
    pub repeat_gap_ms: u64,
    pub repeat_count: u32,
}

impl Default for RowDefaults {
    fn default() -> Self {
        Self {
            front_to_back_ms: 350,
            between_rows_ms: 700,
            repeat_gap_ms: 400,
            repeat_count: 1,
        }
    }
}

/// Immutable application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Which cloud provider speaks the front (primary-language) side
    pub preferred_front_provider: ProviderKind,
    pub azure_front_voice: String,
    pub google_front_voice: String,
    pub polly_front_voice: String,
    /// Ordered voice lists for the Latin-class back chain
    pub google_latin_voices: Vec<String>,
    pub azure_latin_voices: Vec<String>,
    pub polly_latin_voices: Vec<String>,
    pub defaults: RowDefaults,
    /// Deadline for a single provider attempt; expiry counts as failure
    pub synth_timeout: Duration,
    /// Where per-attempt scratch files live
    pub temp_dir: PathBuf,
    /// PCM rate of the rendered composite track
    pub sample_rate: u32,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let preferred_front_provider =
            match env_or("PREFERRED_FRONT_PROVIDER", "azure").to_lowercase().as_str() {
                "google" => ProviderKind::Google,
                "polly" => ProviderKind::Polly,
                _ => ProviderKind::Azure,
            };

        let synth_timeout = std::env::var("SYNTH_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(Duration::from_millis(20_000));

        let temp_dir = std::env::var("SYNTH_TEMP_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| std::env::temp_dir());

        Self {
            preferred_front_provider,
            azure_front_voice: env_or("AZURE_FRONT_VOICE", "en-US-AriaNeural"),
            google_front_voice: env_or("GOOGLE_FRONT_VOICE", ""),
            polly_front_voice: env_or("POLLY_FRONT_VOICE", "Joanna"),
            google_latin_voices: parse_voice_list(&env_or("GOOGLE_LATIN_VOICES", "it-IT-Wavenet-A")),
            azure_latin_voices: parse_voice_list(&env_or("AZURE_LATIN_VOICES", "it-IT-ElsaNeural")),
            polly_latin_voices: parse_voice_list(&env_or("POLLY_LATIN_VOICES", "Carla")),
            defaults: RowDefaults::default(),
            synth_timeout,
            temp_dir,
            sample_rate: 22_050,
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a comma-separated voice list: split, trim, drop empties.
///
/// An empty result means the stage contributes no candidates at all.
pub fn parse_voice_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voice_list_splits_and_trims() {
        assert_eq!(
            parse_voice_list(" it-IT-Wavenet-A , it-IT-Wavenet-B "),
            vec!["it-IT-Wavenet-A", "it-IT-Wavenet-B"]
        );
    }

    #[test]
    fn voice_list_drops_empty_entries() {
        assert_eq!(parse_voice_list(""), Vec::<String>::new());
        assert_eq!(parse_voice_list(" , ,"), Vec::<String>::new());
        assert_eq!(parse_voice_list("Carla,,Vitoria"), vec!["Carla", "Vitoria"]);
    }

    #[test]
    fn row_defaults_match_service_defaults() {
        let d = RowDefaults::default();
        assert_eq!(d.front_to_back_ms, 350);
        assert_eq!(d.between_rows_ms, 700);
        assert_eq!(d.repeat_gap_ms, 400);
        assert_eq!(d.repeat_count, 1);
    }
}
