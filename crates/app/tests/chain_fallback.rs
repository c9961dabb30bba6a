//! Fallback orchestrator properties: chain order, skip semantics, silence
//! substitution, and attempt deadlines.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::ScriptedProvider;
use lexivox_app::config::AppConfig;
use lexivox_app::orchestrator::{Orchestrator, ProviderSet, FALLBACK_SILENCE_MS};
use lexivox_app::policy::VoicePolicy;
use lexivox_tts::{ProviderKind, Role, Segment, VoiceCandidate};

fn orchestrator_with(
    providers: Vec<Arc<ScriptedProvider>>,
    timeout: Duration,
) -> (Orchestrator, tempfile::TempDir) {
    let mut set = ProviderSet::new();
    for provider in providers {
        set.insert(provider);
    }
    let temp = tempfile::tempdir().unwrap();
    let config = AppConfig::from_env();
    let orchestrator = Orchestrator::new(
        Arc::new(set),
        VoicePolicy::new(config),
        timeout,
        temp.path().to_path_buf(),
    );
    (orchestrator, temp)
}

#[tokio::test]
async fn terminal_stage_prevents_silence_substitution() {
    let failing = Arc::new(ScriptedProvider::failing(ProviderKind::Google));
    let terminal = Arc::new(ScriptedProvider::succeeding(ProviderKind::Generic));
    let (orchestrator, _temp) =
        orchestrator_with(vec![failing.clone(), terminal.clone()], Duration::from_secs(1));

    let chain = vec![
        VoiceCandidate::new(ProviderKind::Google, "it-IT-Wavenet-A"),
        VoiceCandidate::new(ProviderKind::Generic, "en"),
    ];
    let result = orchestrator.first_success("amare", &chain).await;

    assert!(!result.is_silence());
    assert_eq!(failing.calls(), 1);
    assert_eq!(terminal.calls(), 1);
}

#[tokio::test]
async fn exhausted_chain_becomes_fixed_silence() {
    let failing = Arc::new(ScriptedProvider::failing(ProviderKind::Generic));
    let (orchestrator, _temp) = orchestrator_with(vec![failing.clone()], Duration::from_secs(1));

    let chain = vec![
        VoiceCandidate::new(ProviderKind::Generic, "la"),
        VoiceCandidate::new(ProviderKind::Generic, "en"),
    ];
    let result = orchestrator.first_success("amare", &chain).await;

    match result {
        lexivox_tts::SegmentAudio::Silence { ms } => assert_eq!(ms, FALLBACK_SILENCE_MS),
        other => panic!("expected silence, got {other:?}"),
    }
    assert_eq!(failing.calls(), 2);
}

#[tokio::test]
async fn unavailable_providers_are_skipped_without_io() {
    let offline = Arc::new(ScriptedProvider::unavailable(ProviderKind::Google));
    let (orchestrator, _temp) = orchestrator_with(vec![offline.clone()], Duration::from_secs(1));

    let chain = vec![VoiceCandidate::new(ProviderKind::Google, "it-IT-Wavenet-A")];
    let result = orchestrator.first_success("amare", &chain).await;

    assert!(result.is_silence());
    assert_eq!(offline.calls(), 0, "unavailable provider must not be invoked");
}

#[tokio::test]
async fn later_stages_never_run_after_a_success() {
    let generic = Arc::new(ScriptedProvider::failing(ProviderKind::Generic));
    let google = Arc::new(ScriptedProvider::succeeding(ProviderKind::Google));
    let azure = Arc::new(ScriptedProvider::succeeding(ProviderKind::Azure));
    let polly = Arc::new(ScriptedProvider::succeeding(ProviderKind::Polly));
    let (orchestrator, _temp) = orchestrator_with(
        vec![generic.clone(), google.clone(), azure.clone(), polly.clone()],
        Duration::from_secs(1),
    );

    // The Latin-class shape: generic, then the three cloud stages, then the
    // generic terminal.
    let chain = vec![
        VoiceCandidate::new(ProviderKind::Generic, "la"),
        VoiceCandidate::new(ProviderKind::Google, "it-IT-Wavenet-A"),
        VoiceCandidate::new(ProviderKind::Azure, "it-IT-ElsaNeural"),
        VoiceCandidate::new(ProviderKind::Polly, "Carla"),
        VoiceCandidate::new(ProviderKind::Generic, "en"),
    ];
    let result = orchestrator.first_success("amare", &chain).await;

    assert!(!result.is_silence());
    assert_eq!(generic.calls(), 1, "stage 1 attempted once");
    assert_eq!(google.calls(), 1, "stage 2 wins");
    assert_eq!(azure.calls(), 0, "stage 3 never invoked");
    assert_eq!(polly.calls(), 0, "stage 4 never invoked");
}

#[tokio::test]
async fn hung_attempt_expires_and_the_chain_moves_on() {
    let slow = Arc::new(ScriptedProvider::slow(
        ProviderKind::Azure,
        Duration::from_millis(500),
    ));
    let fast = Arc::new(ScriptedProvider::succeeding(ProviderKind::Generic));
    let (orchestrator, _temp) =
        orchestrator_with(vec![slow.clone(), fast.clone()], Duration::from_millis(50));

    let chain = vec![
        VoiceCandidate::new(ProviderKind::Azure, "en-US-AriaNeural"),
        VoiceCandidate::new(ProviderKind::Generic, "en"),
    ];
    let result = orchestrator.first_success("hello", &chain).await;

    assert!(!result.is_silence());
    assert_eq!(slow.calls(), 1);
    assert_eq!(fast.calls(), 1);
}

#[tokio::test]
async fn policy_driven_segment_walks_the_latin_chain() {
    let generic = Arc::new(ScriptedProvider::failing(ProviderKind::Generic));
    let google = Arc::new(ScriptedProvider::unavailable(ProviderKind::Google));
    let azure = Arc::new(ScriptedProvider::succeeding(ProviderKind::Azure));
    let polly = Arc::new(ScriptedProvider::succeeding(ProviderKind::Polly));

    let mut set = ProviderSet::new();
    for p in [generic.clone(), google.clone(), azure.clone(), polly.clone()] {
        set.insert(p);
    }
    let temp = tempfile::tempdir().unwrap();
    let mut config = AppConfig::from_env();
    config.google_latin_voices = vec!["it-IT-Wavenet-A".to_string()];
    config.azure_latin_voices = vec!["it-IT-ElsaNeural".to_string()];
    config.polly_latin_voices = vec!["Carla".to_string()];
    let orchestrator = Orchestrator::new(
        Arc::new(set),
        VoicePolicy::new(config),
        Duration::from_secs(1),
        temp.path().to_path_buf(),
    );

    let segment = Segment::new("amare", "la", Role::Back);
    let result = orchestrator.synthesize_segment(&segment).await;

    assert!(!result.is_silence());
    assert_eq!(generic.calls(), 1, "generic 'la' stage failed first");
    assert_eq!(google.calls(), 0, "unavailable google skipped");
    assert_eq!(azure.calls(), 1, "azure stage won");
    assert_eq!(polly.calls(), 0);
}
