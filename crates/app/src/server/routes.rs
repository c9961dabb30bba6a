//! Route handlers

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use lexivox_tts::{ClipFormat, Role, Segment, SegmentAudio};
use serde_json::json;
use thiserror::Error;
use tracing::{info, warn};

use super::types::{CombinedRequest, HealthResponse, TextRequest};
use super::AppState;
use crate::assembly::{new_assembler, AssemblyError, RowAudio, RowPauses, Timeline};
use crate::table::{parse_table, TableError, TableRow};

/// Silence substituted for a failed segment on the combined surface.
const COMBINED_FAILURE_SILENCE_MS: u64 = 500;
/// Leading silence on the combined surface (shorter than batch mode).
const COMBINED_LEAD_SILENCE_MS: u64 = 200;

#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed request; surfaced before any synthesis begins.
    #[error("{0}")]
    Input(String),

    #[error("Cannot combine audio: mixing capability unavailable")]
    MixingUnavailable,

    #[error("Synthesis failed")]
    SynthesisFailed,

    #[error(transparent)]
    Assembly(#[from] AssemblyError),

    #[error("{0}")]
    Table(#[from] TableError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Input(_) | ApiError::Table(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            warn!(error = %self, "Request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

fn audio_response(filename: &str, content_type: &str, bytes: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}

/// Pick the first present field from `names`; absent means the default,
/// present-but-unparsable is a hard input error. The asymmetry is
/// deliberate and load-bearing for existing clients.
fn int_field<T: std::str::FromStr>(
    fields: &HashMap<String, String>,
    names: &[&str],
    default: T,
) -> Result<T, ApiError> {
    for name in names {
        if let Some(raw) = fields.get(*name) {
            return raw
                .trim()
                .parse()
                .map_err(|_| ApiError::Input("invalid numeric parameter".to_string()));
        }
    }
    Ok(default)
}

fn lang_field(fields: &HashMap<String, String>, role_key: &str, default: &str) -> String {
    fields
        .get(role_key)
        .filter(|v| !v.is_empty())
        .or_else(|| fields.get("language").filter(|v| !v.is_empty()))
        .cloned()
        .unwrap_or_else(|| default.to_string())
}

/// `POST /synthesize` — CSV upload to combined track or clip archive.
pub async fn synthesize(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let mut file: Option<Vec<u8>> = None;
    let mut fields: HashMap<String, String> = HashMap::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Input(format!("malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();
        if name == "file" {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::Input(format!("unreadable upload: {e}")))?;
            file = Some(bytes.to_vec());
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| ApiError::Input(format!("unreadable field {name}: {e}")))?;
            fields.insert(name, value);
        }
    }
    let file = file.ok_or_else(|| ApiError::Input("no file uploaded".to_string()))?;

    let defaults = state.config.defaults;
    let pauses = RowPauses {
        front_to_back_ms: int_field(
            &fields,
            &["pause_en_la_ms", "pause_ms_front_to_back"],
            defaults.front_to_back_ms,
        )?,
        between_rows_ms: int_field(
            &fields,
            &["pause_between_ms", "pause_between_rows"],
            defaults.between_rows_ms,
        )?,
        repeat_gap_ms: int_field(
            &fields,
            &["latin_repeat_pause_ms", "repeat_pause_ms"],
            defaults.repeat_gap_ms,
        )?,
    };
    let repeat_count: u32 = int_field(
        &fields,
        &["repeat_latin", "repeat_times"],
        defaults.repeat_count,
    )?;

    let lang_front = lang_field(&fields, "language_for_front", "en");
    let lang_back = lang_field(&fields, "language_for_back", "la");

    // Collect rows up front so table problems surface before any synthesis.
    let rows: Vec<TableRow> = parse_table(file)?.collect::<Result<_, _>>()?;
    info!(
        rows = rows.len(),
        mode = state.mode.as_str(),
        "Synthesizing table"
    );

    let mut assembler = new_assembler(state.mode, state.mixer.clone(), state.config.sample_rate);
    for row in &rows {
        let front = state
            .orchestrator
            .synthesize_segment(&Segment::new(&row.front_text, &lang_front, Role::Front))
            .await;
        let back = state
            .orchestrator
            .synthesize_segment(&Segment::new(&row.back_text, &lang_back, Role::Back))
            .await;
        assembler
            .push_row(RowAudio {
                front,
                back,
                repeat_count,
                pauses,
            })
            .await?;
    }

    let artifact = assembler.finish().await?;
    Ok(audio_response(
        artifact.filename,
        artifact.content_type,
        artifact.bytes,
    ))
}

/// `POST /synthesize_text` — one snippet through the generic path only.
pub async fn synthesize_text(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TextRequest>,
) -> Result<Response, ApiError> {
    let text = request
        .text
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| ApiError::Input("no text provided".to_string()))?;
    let lang = request.lang.unwrap_or_else(|| "en".to_string());

    match state.orchestrator.synthesize_generic(&text, &lang).await {
        Ok(SegmentAudio::Clip { bytes, format }) => {
            let (filename, content_type) = match format {
                ClipFormat::Wav => ("speech.wav", "audio/wav"),
                ClipFormat::Mp3 => ("speech.mp3", "audio/mpeg"),
            };
            Ok(audio_response(filename, content_type, bytes))
        }
        Ok(SegmentAudio::Silence { .. }) => Err(ApiError::SynthesisFailed),
        Err(e) => {
            warn!(error = %e, "Single-snippet synthesis failed");
            Err(ApiError::SynthesisFailed)
        }
    }
}

/// `POST /synthesize_combined` — explicit segment list, continuous mode only.
pub async fn synthesize_combined(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CombinedRequest>,
) -> Result<Response, ApiError> {
    if !state.mixer.available() {
        return Err(ApiError::MixingUnavailable);
    }
    if request.segments.is_empty() {
        return Err(ApiError::Input("no segments provided".to_string()));
    }
    let pause_ms = request.pause_ms.unwrap_or(500);
    let row_pause_ms = request.row_pause_ms.unwrap_or(1000);

    let mut timeline = Timeline::new(state.config.sample_rate);
    timeline.push_silence(COMBINED_LEAD_SILENCE_MS);

    let last = request.segments.len() - 1;
    for (idx, segment) in request.segments.iter().enumerate() {
        if segment.text.is_empty() {
            continue;
        }
        let decoded = match state
            .orchestrator
            .synthesize_generic(&segment.text, &segment.lang)
            .await
        {
            Ok(SegmentAudio::Clip { bytes, .. }) => state.mixer.decode_clip(&bytes).await.ok(),
            _ => None,
        };
        match decoded {
            Some(samples) => {
                timeline.push_samples(samples);
                if idx < last {
                    let gap = if segment.is_row_boundary {
                        row_pause_ms
                    } else {
                        pause_ms
                    };
                    timeline.push_silence(gap);
                }
            }
            None => {
                warn!(index = idx, "Segment synthesis failed; substituting silence");
                timeline.push_silence(COMBINED_FAILURE_SILENCE_MS);
            }
        }
    }

    let bytes = timeline.render_wav()?;
    Ok(audio_response("combined.wav", "audio/wav", bytes))
}

/// `GET /health`
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        mode: state.mode.as_str(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        providers: state.providers.availability(),
    })
}
