//! The mixing capability
//!
//! Decoding arbitrary provider output (WAV from the local engine and most
//! cloud backends, MP3 from the translate endpoint) into uniform PCM goes
//! through an ffmpeg subprocess. The binary is resolved once at startup;
//! its absence switches the whole service into discrete mode.

use std::io::Write;
use std::path::PathBuf;

use tokio::process::Command;
use tracing::debug;

use super::AssemblyError;

pub struct Mixer {
    ffmpeg: Option<PathBuf>,
    sample_rate: u32,
    temp_dir: PathBuf,
}

impl Mixer {
    /// Resolve ffmpeg from `FFMPEG_BIN` or `PATH`.
    pub fn probe(sample_rate: u32, temp_dir: PathBuf) -> Self {
        let ffmpeg = resolve_ffmpeg();
        match &ffmpeg {
            Some(bin) => debug!(bin = %bin.display(), "Detected ffmpeg binary"),
            None => debug!("ffmpeg not found; continuous assembly disabled"),
        }
        Self {
            ffmpeg,
            sample_rate,
            temp_dir,
        }
    }

    /// Construct without an ffmpeg binary (used by tests).
    pub fn unavailable(sample_rate: u32) -> Self {
        Self {
            ffmpeg: None,
            sample_rate,
            temp_dir: std::env::temp_dir(),
        }
    }

    pub fn available(&self) -> bool {
        self.ffmpeg.is_some()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Decode one clip to 16-bit mono PCM at the output rate.
    pub async fn decode_clip(&self, clip: &[u8]) -> Result<Vec<i16>, AssemblyError> {
        let ffmpeg = self.ffmpeg.as_ref().ok_or(AssemblyError::MixingUnavailable)?;

        // ffmpeg wants a seekable input for container probing, so the clip
        // goes through a scoped scratch file.
        let mut scratch = tempfile::Builder::new()
            .prefix("lexivox_mix_")
            .tempfile_in(&self.temp_dir)?;
        scratch.write_all(clip)?;
        scratch.flush()?;

        let output = Command::new(ffmpeg)
            .arg("-v")
            .arg("error")
            .arg("-i")
            .arg(scratch.path())
            .arg("-f")
            .arg("s16le")
            .arg("-ac")
            .arg("1")
            .arg("-ar")
            .arg(self.sample_rate.to_string())
            .arg("-")
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AssemblyError::Decode(stderr.trim().to_string()));
        }
        if output.stdout.is_empty() {
            return Err(AssemblyError::Decode("no samples decoded".to_string()));
        }

        let samples = output
            .stdout
            .chunks_exact(2)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        Ok(samples)
    }
}

fn resolve_ffmpeg() -> Option<PathBuf> {
    if let Ok(p) = std::env::var("FFMPEG_BIN") {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return Some(pb);
        }
    }
    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths)
        .map(|dir| dir.join("ffmpeg"))
        .find(|candidate| candidate.exists())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unavailable_mixer_refuses_to_decode() {
        let mixer = Mixer::unavailable(22_050);
        assert!(!mixer.available());
        let err = mixer.decode_clip(b"RIFF....WAVE").await.unwrap_err();
        assert!(matches!(err, AssemblyError::MixingUnavailable));
    }
}
