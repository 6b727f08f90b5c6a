//! Audio session: plays a decoded file through cpal and publishes spectrum snapshots.

use arc_swap::ArcSwapOption;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SizedSample};
use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use super::{AnalysisSession, DecodedTrack, SpectrumAnalyser, SpectrumSnapshot};
use crate::error::AudioError;
use crate::params::AnalyserConfig;

/// Window of most recently played samples (shared with the analysis thread)
type SampleWindow = Arc<Mutex<VecDeque<f32>>>;

/// Playing audio file with background spectrum analysis
pub struct AudioSession {
    /// Latest snapshot, replaced wholesale by the analysis thread
    latest: Arc<ArcSwapOption<SpectrumSnapshot>>,

    shutdown: Arc<AtomicBool>,

    /// Shared with the output callback and the analysis thread
    paused: Arc<AtomicBool>,

    /// Audio output stream (dropped on close)
    stream: Option<cpal::Stream>,

    analysis_thread: Option<thread::JoinHandle<()>>,

    closed: bool,
}

impl AudioSession {
    /// Decode `path`, start playback on the default output device and begin analysis
    pub fn start(path: &Path, config: AnalyserConfig) -> Result<Self, AudioError> {
        config.validate()?;
        let track = DecodedTrack::from_wav(path)?;

        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(AudioError::NoOutputDevice)?;
        let supported = device.default_output_config()?;
        let sample_format = supported.sample_format();
        let stream_config: cpal::StreamConfig = supported.into();

        log::info!(
            "Audio: {} @ {}Hz, {} ch ({:?})",
            device.name().unwrap_or_else(|_| "Unknown".to_string()),
            stream_config.sample_rate.0,
            stream_config.channels,
            sample_format
        );

        let window: SampleWindow = Arc::new(Mutex::new(VecDeque::with_capacity(config.fft_size)));
        let playback = Playback::new(
            track,
            stream_config.sample_rate.0,
            Arc::clone(&window),
            config.fft_size,
        );
        let paused = playback.pause_flag();

        let stream = match sample_format {
            cpal::SampleFormat::F32 => build_stream::<f32>(&device, &stream_config, playback)?,
            cpal::SampleFormat::I16 => build_stream::<i16>(&device, &stream_config, playback)?,
            cpal::SampleFormat::U16 => build_stream::<u16>(&device, &stream_config, playback)?,
            other => return Err(AudioError::SampleFormat(other)),
        };
        stream.play()?;

        let latest = Arc::new(ArcSwapOption::empty());
        let shutdown = Arc::new(AtomicBool::new(false));
        let analyser = SpectrumAnalyser::new(config)?;
        let analysis_thread = spawn_analysis_thread(
            analyser,
            window,
            Arc::clone(&latest),
            Arc::clone(&shutdown),
            Arc::clone(&paused),
        )?;

        log::info!("Audio session started: {}", path.display());

        Ok(Self {
            latest,
            shutdown,
            paused,
            stream: Some(stream),
            analysis_thread: Some(analysis_thread),
            closed: false,
        })
    }
}

impl AnalysisSession for AudioSession {
    fn snapshot(&self) -> Option<SpectrumSnapshot> {
        if self.closed {
            return None;
        }
        self.latest.load_full().map(|s| SpectrumSnapshot::clone(&s))
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        self.shutdown.store(true, Ordering::Release);
        drop(self.stream.take());
        if let Some(handle) = self.analysis_thread.take() {
            if handle.join().is_err() {
                log::warn!("Spectrum analysis thread panicked");
            }
        }
        self.latest.store(None);
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn set_paused(&mut self, paused: bool) {
        if self.closed || self.is_paused() == paused {
            return;
        }
        self.paused.store(paused, Ordering::Release);

        // Hosts that cannot pause keep the stream running; the callback
        // still emits silence without advancing the track
        if let Some(stream) = &self.stream {
            let result = if paused {
                stream.pause().map_err(|e| e.to_string())
            } else {
                stream.play().map_err(|e| e.to_string())
            };
            if let Err(e) = result {
                let verb = if paused { "pause" } else { "resume" };
                log::warn!("Audio stream did not {}: {}", verb, e);
            }
        }
        log::info!("Audio {}", if paused { "paused" } else { "resumed" });
    }

    fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }
}

impl Drop for AudioSession {
    fn drop(&mut self) {
        self.close();
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut playback: Playback,
) -> Result<cpal::Stream, AudioError>
where
    T: SizedSample + FromSample<f32>,
{
    let channels = config.channels.max(1) as usize;
    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| playback.fill(data, channels),
        |err| log::warn!("Audio stream error: {}", err),
        None,
    )?;
    Ok(stream)
}

/// Spawn the thread that turns the sample window into snapshots
fn spawn_analysis_thread(
    mut analyser: SpectrumAnalyser,
    window: SampleWindow,
    latest: Arc<ArcSwapOption<SpectrumSnapshot>>,
    shutdown: Arc<AtomicBool>,
    paused: Arc<AtomicBool>,
) -> Result<thread::JoinHandle<()>, AudioError> {
    let interval = Duration::from_millis(analyser.config().update_interval_ms);
    let mut samples = Vec::with_capacity(analyser.config().fft_size);

    let handle = thread::Builder::new()
        .name("spectrum-analysis".to_string())
        .spawn(move || {
            while !shutdown.load(Ordering::Acquire) {
                thread::sleep(interval);

                samples.clear();
                // Paused: analyse silence so smoothing lets the spectrum decay
                if !paused.load(Ordering::Acquire) {
                    match window.lock() {
                        Ok(w) => samples.extend(w.iter().copied()),
                        Err(_) => break,
                    }
                }

                let snapshot = analyser.analyse(&samples);
                latest.store(Some(Arc::new(snapshot)));
            }
        })?;

    Ok(handle)
}

/// Playback cursor over a decoded track, resampled to the device rate
struct Playback {
    track: Vec<f32>,
    /// Fractional read position in track samples
    position: f64,
    /// Track samples advanced per output frame
    step: f64,
    window: SampleWindow,
    window_len: usize,
    paused: Arc<AtomicBool>,
}

impl Playback {
    fn new(
        track: DecodedTrack,
        device_rate_hz: u32,
        window: SampleWindow,
        window_len: usize,
    ) -> Self {
        Self {
            step: track.sample_rate_hz as f64 / device_rate_hz.max(1) as f64,
            track: track.samples,
            position: 0.0,
            window,
            window_len,
            paused: Arc::new(AtomicBool::new(false)),
        }
    }

    fn pause_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.paused)
    }

    /// Next mono sample (nearest-sample resampling); silence past the end
    ///
    /// While paused the cursor holds and the output is silence.
    fn next_sample(&mut self) -> f32 {
        if self.paused.load(Ordering::Acquire) {
            return 0.0;
        }
        let sample = self
            .track
            .get(self.position as usize)
            .copied()
            .unwrap_or(0.0)
            .clamp(-1.0, 1.0);
        self.position += self.step;
        sample
    }

    /// Fill an interleaved output buffer and record what was played
    fn fill<T: Sample + FromSample<f32>>(&mut self, data: &mut [T], channels: usize) {
        // A poisoned window only costs analysis input; playback continues
        let window = Arc::clone(&self.window);
        let mut window = window.lock().ok();

        for frame in data.chunks_mut(channels) {
            let sample = self.next_sample();
            for out in frame.iter_mut() {
                *out = T::from_sample(sample);
            }

            if let Some(w) = window.as_mut() {
                if w.len() >= self.window_len {
                    w.pop_front();
                }
                w.push_back(sample);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playback(
        samples: Vec<f32>,
        track_rate: u32,
        device_rate: u32,
        window_len: usize,
    ) -> Playback {
        let track = DecodedTrack {
            samples,
            sample_rate_hz: track_rate,
        };
        Playback::new(
            track,
            device_rate,
            Arc::new(Mutex::new(VecDeque::new())),
            window_len,
        )
    }

    #[test]
    fn test_fill_duplicates_across_channels() {
        let mut p = playback(vec![0.1, 0.2, 0.3], 48000, 48000, 16);
        let mut out = [0.0_f32; 6];
        p.fill(&mut out, 2);
        assert_eq!(out, [0.1, 0.1, 0.2, 0.2, 0.3, 0.3]);
    }

    #[test]
    fn test_silence_after_end_of_track() {
        let mut p = playback(vec![0.5], 48000, 48000, 16);
        let mut out = [1.0_f32; 3];
        p.fill(&mut out, 1);
        assert_eq!(out, [0.5, 0.0, 0.0]);
    }

    #[test]
    fn test_resampling_steps_through_track() {
        // 24 kHz track on a 48 kHz device: every sample plays twice
        let mut p = playback(vec![0.1, 0.2], 24000, 48000, 16);
        let mut out = [0.0_f32; 4];
        p.fill(&mut out, 1);
        assert_eq!(out, [0.1, 0.1, 0.2, 0.2]);
    }

    #[test]
    fn test_window_keeps_most_recent_samples() {
        let mut p = playback((0..10).map(|i| i as f32 / 10.0).collect(), 48000, 48000, 4);
        let mut out = [0.0_f32; 10];
        p.fill(&mut out, 1);

        let window: Vec<f32> = p.window.lock().unwrap().iter().copied().collect();
        assert_eq!(window, vec![0.6, 0.7, 0.8, 0.9]);
    }

    #[test]
    fn test_paused_playback_holds_position() {
        let mut p = playback(vec![0.1, 0.2, 0.3], 48000, 48000, 16);
        let mut out = [0.0_f32; 1];
        p.fill(&mut out, 1);
        assert_eq!(out, [0.1]);

        p.pause_flag().store(true, Ordering::Release);
        let mut out = [1.0_f32; 4];
        p.fill(&mut out, 2);
        assert_eq!(out, [0.0; 4]);
        assert_eq!(p.position, 1.0);

        p.pause_flag().store(false, Ordering::Release);
        let mut out = [0.0_f32; 2];
        p.fill(&mut out, 1);
        assert_eq!(out, [0.2, 0.3]);
    }

    #[test]
    fn test_integer_output_format() {
        let mut p = playback(vec![1.0, -1.0], 48000, 48000, 4);
        let mut out = [0_i16; 2];
        p.fill(&mut out, 1);
        assert!(out[0] > 32000);
        assert!(out[1] < -32000);
    }
}
