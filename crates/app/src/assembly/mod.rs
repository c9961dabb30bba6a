//! Audio assembly
//!
//! Two mutually exclusive output strategies, selected once at startup by
//! whether the mixing capability (ffmpeg) is present: continuous mode
//! renders one timed composite track, discrete mode packages per-row clips
//! into an archive.

pub mod archive;
pub mod mixer;
pub mod timeline;

use std::sync::Arc;

use async_trait::async_trait;
use lexivox_tts::SegmentAudio;
use thiserror::Error;

pub use archive::DiscreteAssembler;
pub use mixer::Mixer;
pub use timeline::{ContinuousAssembler, Timeline};

#[derive(Error, Debug)]
pub enum AssemblyError {
    #[error("Mixing capability unavailable")]
    MixingUnavailable,

    #[error("Clip decode failed: {0}")]
    Decode(String),

    #[error("Export failed: {0}")]
    Export(String),

    #[error("Archive failed: {0}")]
    Archive(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Pause durations applied around one row's segments.
#[derive(Debug, Clone, Copy)]
pub struct RowPauses {
    pub front_to_back_ms: u64,
    pub between_rows_ms: u64,
    pub repeat_gap_ms: u64,
}

/// One row's synthesized audio, ready for assembly.
#[derive(Debug)]
pub struct RowAudio {
    pub front: SegmentAudio,
    pub back: SegmentAudio,
    pub repeat_count: u32,
    pub pauses: RowPauses,
}

/// The final response body.
pub struct Artifact {
    pub filename: &'static str,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Assembly strategy. One instance per request; rows arrive strictly in
/// input order and are consumed sequentially.
#[async_trait]
pub trait Assembler: Send {
    async fn push_row(&mut self, row: RowAudio) -> Result<(), AssemblyError>;

    /// Render the final artifact. Consumes the assembler.
    async fn finish(self: Box<Self>) -> Result<Artifact, AssemblyError>;
}

/// Output mode, fixed for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblyMode {
    Continuous,
    Discrete,
}

impl AssemblyMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssemblyMode::Continuous => "continuous",
            AssemblyMode::Discrete => "discrete",
        }
    }
}

/// Construct the per-request assembler for the process-wide mode.
pub fn new_assembler(mode: AssemblyMode, mixer: Arc<Mixer>, sample_rate: u32) -> Box<dyn Assembler> {
    match mode {
        AssemblyMode::Continuous => Box::new(ContinuousAssembler::new(mixer, sample_rate)),
        AssemblyMode::Discrete => Box::new(DiscreteAssembler::new(sample_rate)),
    }
}
