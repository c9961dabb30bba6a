//! Request and response bodies

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Body of `POST /synthesize_text`.
#[derive(Debug, Deserialize)]
pub struct TextRequest {
    pub text: Option<String>,
    pub lang: Option<String>,
}

/// Body of `POST /synthesize_combined`.
#[derive(Debug, Deserialize)]
pub struct CombinedRequest {
    #[serde(default)]
    pub segments: Vec<CombinedSegment>,
    pub pause_ms: Option<u64>,
    pub row_pause_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct CombinedSegment {
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_lang")]
    pub lang: String,
    #[serde(default)]
    pub is_row_boundary: bool,
}

fn default_lang() -> String {
    "en".to_string()
}

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub mode: &'static str,
    pub uptime_secs: u64,
    pub providers: HashMap<String, bool>,
}
