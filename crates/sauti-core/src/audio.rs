//! Decoding of uploaded voice samples.

use crate::error::{Error, Result};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Decoded waveform ready to ship to a peer.
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceSample {
    /// Mono samples in `[-1.0, 1.0]`.
    pub waveform: Vec<f32>,
    pub sample_rate: u32,
}

impl VoiceSample {
    /// Decode WAV bytes into a mono waveform.
    ///
    /// Integer and float encodings are both accepted; multi-channel input is
    /// mixed down, and non-finite samples are zeroed.
    pub fn from_wav_bytes(wav_bytes: &[u8]) -> Result<Self> {
        let cursor = std::io::Cursor::new(wav_bytes);
        let mut reader = hound::WavReader::new(cursor)
            .map_err(|e| Error::Validation(format!("Audio file could not be decoded: {}", e)))?;

        let spec = reader.spec();
        let sample_rate = spec.sample_rate;
        let channels = spec.channels.max(1) as usize;

        let mut samples: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Int => {
                let bits = spec.bits_per_sample.max(1) as u32;
                let max_val = if bits > 1 {
                    ((1i64 << (bits - 1)) - 1) as f32
                } else {
                    1.0
                };
                reader
                    .samples::<i32>()
                    .filter_map(|s| s.ok())
                    .map(|s| (s as f32 / max_val).clamp(-1.0, 1.0))
                    .collect()
            }
            hound::SampleFormat::Float => reader.samples::<f32>().filter_map(|s| s.ok()).collect(),
        };

        if samples.is_empty() {
            return Err(Error::Validation(
                "Audio file contains no samples".to_string(),
            ));
        }

        if channels > 1 {
            let mut mono = Vec::with_capacity(samples.len() / channels + 1);
            for frame in samples.chunks(channels) {
                let sum: f32 = frame.iter().copied().sum();
                mono.push(sum / frame.len() as f32);
            }
            samples = mono;
        }

        for sample in &mut samples {
            if !sample.is_finite() {
                *sample = 0.0;
            } else {
                *sample = sample.clamp(-1.0, 1.0);
            }
        }

        debug!(
            "Decoded voice sample: {} samples @ {} Hz",
            samples.len(),
            sample_rate
        );

        Ok(Self {
            waveform: samples,
            sample_rate,
        })
    }

    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.waveform.len() as f32 / self.sample_rate as f32
    }
}

/// An uploaded voice sample spooled to a scoped temporary file.
///
/// The file exists for the duration of one request only: it is removed when
/// this guard drops, on success and on every failure path alike.
#[derive(Debug)]
pub struct SpooledUpload {
    file: NamedTempFile,
    pub sample: VoiceSample,
}

impl SpooledUpload {
    /// Write the upload to a temp file and decode it. Decode failures report
    /// as validation errors and still clean the file up via the guard drop.
    pub fn spool(bytes: &[u8]) -> Result<Self> {
        let mut file = NamedTempFile::new()?;
        file.write_all(bytes)?;
        file.flush()?;

        let sample = VoiceSample::from_wav_bytes(bytes)?;
        Ok(Self { file, sample })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}
