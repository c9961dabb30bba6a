use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use lexivox_app::assembly::{AssemblyMode, Mixer};
use lexivox_app::config::AppConfig;
use lexivox_app::orchestrator::{Orchestrator, ProviderSet};
use lexivox_app::policy::VoicePolicy;
use lexivox_app::server::{self, AppState};
use lexivox_tts::SpeechProvider;
use lexivox_tts_cloud::{AzureProvider, GenericProvider, GoogleProvider, PollyProvider};
use lexivox_tts_espeak::EspeakProvider;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "lexivox", about = "Flashcard audio synthesis service")]
struct Args {
    #[arg(long, env = "LEXIVOX_HOST", default_value = "0.0.0.0")]
    host: String,

    #[arg(long, env = "LEXIVOX_PORT", default_value_t = 5000)]
    port: u16,
}

fn init_logging() {
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt().with_env_filter(log_level).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let args = Args::parse();

    let config = AppConfig::from_env();
    let client = reqwest::Client::new();

    // Providers resolve their availability here, once, and never again.
    let espeak: Arc<dyn SpeechProvider> = Arc::new(EspeakProvider::new());
    let mut providers = ProviderSet::new();
    providers.insert(Arc::new(GenericProvider::new(
        client.clone(),
        Some(espeak.clone()),
    )));
    providers.insert(Arc::new(GoogleProvider::new(
        client.clone(),
        config.sample_rate,
    )));
    providers.insert(Arc::new(AzureProvider::new(client.clone())));
    providers.insert(Arc::new(PollyProvider::new().await));
    providers.insert(espeak);
    let providers = Arc::new(providers);

    let mixer = Arc::new(Mixer::probe(config.sample_rate, config.temp_dir.clone()));
    let mode = if mixer.available() {
        AssemblyMode::Continuous
    } else {
        AssemblyMode::Discrete
    };
    info!(mode = mode.as_str(), "Assembly mode selected");

    let policy = VoicePolicy::new(config.clone());
    let orchestrator = Orchestrator::new(
        providers.clone(),
        policy,
        config.synth_timeout,
        config.temp_dir.clone(),
    );

    let state = Arc::new(AppState {
        config,
        orchestrator,
        providers,
        mixer,
        mode,
        start_time: Instant::now(),
    });

    let listener = tokio::net::TcpListener::bind((args.host.as_str(), args.port)).await?;
    info!(addr = %listener.local_addr()?, "Lexivox listening");
    axum::serve(listener, server::router(state)).await?;
    Ok(())
}
