use anyhow::{Context, Result};
use hound::WavReader;
use std::path::Path;
use tracing::info;

/// A fully-loaded audio file, normalized to f32 samples.
///
/// The whole file is read up front so streaming never touches the
/// filesystem; the sample buffer is immutable for the rest of the run.
pub struct AudioFile {
    pub path: String,
    pub duration_seconds: f64,
    pub sample_rate: u32,
    pub channels: u16,
    pub samples: Vec<f32>,
}

impl AudioFile {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading audio file: {}", path.display());

        let reader = WavReader::open(path)
            .context("Failed to open WAV file")?;

        let spec = reader.spec();
        let raw: Vec<i16> = reader
            .into_samples::<i16>()
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to read audio samples")?;

        // Normalize 16-bit PCM to [-1.0, 1.0)
        let samples: Vec<f32> = raw.iter().map(|&s| s as f32 / 32768.0).collect();

        let duration_seconds = samples.len() as f64 /
            (spec.sample_rate as f64 * spec.channels as f64);

        info!(
            "Audio file loaded: {:.1}s ({:.1} min), {}Hz, {} channels, {:.1} MB",
            duration_seconds,
            duration_seconds / 60.0,
            spec.sample_rate,
            spec.channels,
            (raw.len() * 2) as f64 / 1024.0 / 1024.0
        );

        Ok(Self {
            path: path.display().to_string(),
            duration_seconds,
            sample_rate: spec.sample_rate,
            channels: spec.channels,
            samples,
        })
    }

    /// Consecutive non-overlapping frames of exactly `frame_samples`
    /// samples. A trailing remainder shorter than one frame is dropped.
    pub fn frames(&self, frame_samples: usize) -> impl Iterator<Item = &[f32]> {
        self.samples.chunks_exact(frame_samples)
    }

    /// Number of full frames `frames()` will yield.
    pub fn frame_count(&self, frame_samples: usize) -> usize {
        self.samples.len() / frame_samples
    }
}
