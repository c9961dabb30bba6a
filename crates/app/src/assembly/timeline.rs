//! Timeline and continuous assembly

use std::io::Cursor;
use std::sync::Arc;

use async_trait::async_trait;
use hound::{SampleFormat, WavSpec, WavWriter};
use lexivox_tts::SegmentAudio;
use tracing::warn;

use super::{Artifact, Assembler, AssemblyError, Mixer, RowAudio};
use crate::orchestrator::FALLBACK_SILENCE_MS;

/// Silence prepended to every continuous track.
pub const LEAD_SILENCE_MS: u64 = 500;

#[derive(Debug, Clone)]
pub enum TimelineEntry {
    Samples(Vec<i16>),
    Silence { ms: u64 },
}

/// Append-only sequence of audio and silence entries.
///
/// Invariant: total duration equals the sum of appended entry durations;
/// entries are never reordered.
pub struct Timeline {
    entries: Vec<TimelineEntry>,
    sample_rate: u32,
}

impl Timeline {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            entries: Vec::new(),
            sample_rate,
        }
    }

    pub fn push_samples(&mut self, samples: Vec<i16>) {
        self.entries.push(TimelineEntry::Samples(samples));
    }

    pub fn push_silence(&mut self, ms: u64) {
        self.entries.push(TimelineEntry::Silence { ms });
    }

    pub fn push_entry(&mut self, entry: TimelineEntry) {
        self.entries.push(entry);
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Total duration, summed entry by entry.
    pub fn duration_ms(&self) -> u64 {
        self.entries
            .iter()
            .map(|entry| match entry {
                TimelineEntry::Samples(s) => s.len() as u64 * 1000 / self.sample_rate as u64,
                TimelineEntry::Silence { ms } => *ms,
            })
            .sum()
    }

    fn silence_len(&self, ms: u64) -> usize {
        (self.sample_rate as u64 * ms / 1000) as usize
    }

    /// Render the whole timeline once, as a WAV file.
    pub fn render_wav(&self) -> Result<Vec<u8>, AssemblyError> {
        let spec = WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::new());
        let mut writer =
            WavWriter::new(&mut cursor, spec).map_err(|e| AssemblyError::Export(e.to_string()))?;
        for entry in &self.entries {
            match entry {
                TimelineEntry::Samples(samples) => {
                    for sample in samples {
                        writer
                            .write_sample(*sample)
                            .map_err(|e| AssemblyError::Export(e.to_string()))?;
                    }
                }
                TimelineEntry::Silence { ms } => {
                    for _ in 0..self.silence_len(*ms) {
                        writer
                            .write_sample(0i16)
                            .map_err(|e| AssemblyError::Export(e.to_string()))?;
                    }
                }
            }
        }
        writer
            .finalize()
            .map_err(|e| AssemblyError::Export(e.to_string()))?;
        Ok(cursor.into_inner())
    }
}

/// A complete silent WAV clip, used by discrete mode to keep archive shape
/// when a segment's chain failed.
pub fn silent_wav(ms: u64, sample_rate: u32) -> Result<Vec<u8>, AssemblyError> {
    let mut timeline = Timeline::new(sample_rate);
    timeline.push_silence(ms);
    timeline.render_wav()
}

/// Continuous-mode assembler: one running timeline, rendered once.
pub struct ContinuousAssembler {
    mixer: Arc<Mixer>,
    timeline: Timeline,
}

impl ContinuousAssembler {
    pub fn new(mixer: Arc<Mixer>, sample_rate: u32) -> Self {
        let mut timeline = Timeline::new(sample_rate);
        timeline.push_silence(LEAD_SILENCE_MS);
        Self { mixer, timeline }
    }

    /// Decode a segment result into a timeline entry. A clip that fails to
    /// decode degrades to the standard substitution silence, matching the
    /// treatment of a failed chain.
    async fn decode(&self, audio: &SegmentAudio) -> TimelineEntry {
        match audio {
            SegmentAudio::Silence { ms } => TimelineEntry::Silence { ms: *ms },
            SegmentAudio::Clip { bytes, .. } => match self.mixer.decode_clip(bytes).await {
                Ok(samples) => TimelineEntry::Samples(samples),
                Err(e) => {
                    warn!(error = %e, "Clip decode failed; substituting silence");
                    TimelineEntry::Silence {
                        ms: FALLBACK_SILENCE_MS,
                    }
                }
            },
        }
    }
}

#[async_trait]
impl Assembler for ContinuousAssembler {
    async fn push_row(&mut self, row: RowAudio) -> Result<(), AssemblyError> {
        let front = self.decode(&row.front).await;
        self.timeline.push_entry(front);
        self.timeline.push_silence(row.pauses.front_to_back_ms);

        let back = self.decode(&row.back).await;
        let repeats = row.repeat_count.max(1);
        for i in 0..repeats {
            self.timeline.push_entry(back.clone());
            if i < repeats - 1 {
                self.timeline.push_silence(row.pauses.repeat_gap_ms);
            }
        }
        self.timeline.push_silence(row.pauses.between_rows_ms);
        Ok(())
    }

    async fn finish(self: Box<Self>) -> Result<Artifact, AssemblyError> {
        let bytes = self.timeline.render_wav()?;
        Ok(Artifact {
            filename: "combined.wav",
            content_type: "audio/wav",
            bytes,
        })
    }
}
