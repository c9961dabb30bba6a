//! Discrete assembly
//!
//! When the mixing capability is absent, rows cannot be concatenated;
//! instead each row contributes two sequentially numbered clips to a zip
//! archive. No timing information is embedded.

use std::io::{Cursor, Write};

use async_trait::async_trait;
use lexivox_tts::SegmentAudio;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use super::timeline::silent_wav;
use super::{Artifact, Assembler, AssemblyError, RowAudio};

pub struct DiscreteAssembler {
    zip: ZipWriter<Cursor<Vec<u8>>>,
    sample_rate: u32,
    rows: usize,
}

impl DiscreteAssembler {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
            sample_rate,
            rows: 0,
        }
    }

    fn add_clip(&mut self, name_stem: &str, audio: &SegmentAudio) -> Result<(), AssemblyError> {
        let (bytes, extension) = match audio {
            SegmentAudio::Clip { bytes, format } => (bytes.clone(), format.extension()),
            // Keep the archive's shape: a failed segment becomes a real
            // silent clip, not a missing entry.
            SegmentAudio::Silence { ms } => (silent_wav(*ms, self.sample_rate)?, "wav"),
        };
        let name = format!("{name_stem}.{extension}");
        self.zip
            .start_file(name, SimpleFileOptions::default())
            .map_err(|e| AssemblyError::Archive(e.to_string()))?;
        self.zip.write_all(&bytes)?;
        Ok(())
    }
}

#[async_trait]
impl Assembler for DiscreteAssembler {
    async fn push_row(&mut self, row: RowAudio) -> Result<(), AssemblyError> {
        self.rows += 1;
        let index = self.rows;
        self.add_clip(&format!("row{index:03}_front"), &row.front)?;
        self.add_clip(&format!("row{index:03}_back"), &row.back)?;
        Ok(())
    }

    async fn finish(self: Box<Self>) -> Result<Artifact, AssemblyError> {
        let cursor = self
            .zip
            .finish()
            .map_err(|e| AssemblyError::Archive(e.to_string()))?;
        Ok(Artifact {
            filename: "rows.zip",
            content_type: "application/zip",
            bytes: cursor.into_inner(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexivox_tts::ClipFormat;

    fn row(front: SegmentAudio, back: SegmentAudio) -> RowAudio {
        RowAudio {
            front,
            back,
            repeat_count: 1,
            pauses: super::super::RowPauses {
                front_to_back_ms: 350,
                between_rows_ms: 700,
                repeat_gap_ms: 400,
            },
        }
    }

    #[tokio::test]
    async fn each_row_contributes_two_numbered_artifacts() {
        let mut assembler = Box::new(DiscreteAssembler::new(22_050));
        for _ in 0..3 {
            assembler
                .push_row(row(
                    SegmentAudio::Clip {
                        bytes: b"RIFFxxxxWAVEdata".to_vec(),
                        format: ClipFormat::Wav,
                    },
                    SegmentAudio::Silence { ms: 700 },
                ))
                .await
                .unwrap();
        }
        let artifact = assembler.finish().await.unwrap();
        assert_eq!(artifact.filename, "rows.zip");

        let mut archive = zip::ZipArchive::new(Cursor::new(artifact.bytes)).unwrap();
        assert_eq!(archive.len(), 6);
        let names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        assert!(names.contains(&"row001_front.wav".to_string()));
        assert!(names.contains(&"row001_back.wav".to_string()));
        assert!(names.contains(&"row003_back.wav".to_string()));
        // Numbering starts at 1.
        assert!(!names.iter().any(|n| n.starts_with("row000")));
    }

    #[tokio::test]
    async fn mp3_clips_keep_their_extension() {
        let mut assembler = Box::new(DiscreteAssembler::new(22_050));
        assembler
            .push_row(row(
                SegmentAudio::Clip {
                    bytes: vec![0xFF, 0xFB, 0x90, 0x00],
                    format: ClipFormat::Mp3,
                },
                SegmentAudio::Clip {
                    bytes: vec![0xFF, 0xFB, 0x90, 0x00],
                    format: ClipFormat::Mp3,
                },
            ))
            .await
            .unwrap();
        let artifact = assembler.finish().await.unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(artifact.bytes)).unwrap();
        assert!(archive.by_name("row001_front.mp3").is_ok());
    }
}
