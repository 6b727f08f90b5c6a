//! WAV decoding into a mono playback buffer.

use std::path::Path;

use crate::error::AudioError;

/// Decoded audio mixed down to mono f32 in [-1, 1]
#[derive(Debug, Clone)]
pub struct DecodedTrack {
    pub samples: Vec<f32>,
    pub sample_rate_hz: u32,
}

impl DecodedTrack {
    /// Decode a WAV file (integer or float PCM, any channel count)
    pub fn from_wav(path: &Path) -> Result<Self, AudioError> {
        let decode_err = |source| AudioError::Decode {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = hound::WavReader::open(path).map_err(decode_err)?;
        let spec = reader.spec();

        let interleaved: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .samples::<f32>()
                .collect::<Result<_, _>>()
                .map_err(decode_err)?,
            hound::SampleFormat::Int => {
                let full_scale = (1_i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / full_scale))
                    .collect::<Result<_, _>>()
                    .map_err(decode_err)?
            }
        };

        let samples = mix_to_mono(&interleaved, spec.channels.max(1) as usize);
        if samples.is_empty() {
            return Err(AudioError::EmptyTrack(path.to_path_buf()));
        }

        let track = Self {
            samples,
            sample_rate_hz: spec.sample_rate,
        };
        log::info!(
            "Decoded {}: {} Hz, {} ch, {:.1}s",
            path.display(),
            spec.sample_rate,
            spec.channels,
            track.duration_secs()
        );

        Ok(track)
    }

    pub fn duration_secs(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate_hz as f32
    }
}

/// Average interleaved frames into one channel; a trailing partial frame is dropped
fn mix_to_mono(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels == 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}
