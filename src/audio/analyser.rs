//! Byte-spectrum analysis with rustfft.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::f32::consts::PI;
use std::sync::Arc;

use super::SpectrumSnapshot;
use crate::error::ConfigError;
use crate::params::AnalyserConfig;

/// Windowed FFT producing smoothed 0..=255 magnitudes per bin
pub struct SpectrumAnalyser {
    config: AnalyserConfig,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    buffer: Vec<Complex<f32>>,
    /// Smoothed linear magnitudes carried between frames
    smoothed: Vec<f32>,
}

impl SpectrumAnalyser {
    pub fn new(config: AnalyserConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(config.fft_size);
        let window = (0..config.fft_size)
            .map(|i| blackman_window(i, config.fft_size))
            .collect();

        Ok(Self {
            fft,
            window,
            buffer: vec![Complex::new(0.0, 0.0); config.fft_size],
            smoothed: vec![0.0; config.bin_count()],
            config,
        })
    }

    pub fn config(&self) -> &AnalyserConfig {
        &self.config
    }

    /// Analyse the most recent `fft_size` samples of `samples`
    ///
    /// Shorter input is zero-padded at the front, so the newest sample is
    /// always the last one in the window.
    pub fn analyse(&mut self, samples: &[f32]) -> SpectrumSnapshot {
        let n = self.config.fft_size;
        let take = samples.len().min(n);
        let recent = &samples[samples.len() - take..];
        let pad = n - take;

        for (i, slot) in self.buffer.iter_mut().enumerate() {
            let sample = if i < pad { 0.0 } else { recent[i - pad] };
            *slot = Complex::new(sample * self.window[i], 0.0);
        }

        self.fft.process(&mut self.buffer);

        let tau = self.config.smoothing_time_constant;
        let scale = 255.0 / (self.config.max_decibels - self.config.min_decibels);

        let bins: Vec<u8> = self
            .smoothed
            .iter_mut()
            .zip(&self.buffer)
            .map(|(smoothed, bin)| {
                let magnitude = bin.norm() / n as f32;
                let next = tau * *smoothed + (1.0 - tau) * magnitude;
                *smoothed = if next.is_finite() { next } else { 0.0 };

                let db = 20.0 * smoothed.log10();
                let byte = (scale * (db - self.config.min_decibels)).floor();
                // -inf dB (silence) lands below zero and clamps to 0
                byte.clamp(0.0, 255.0) as u8
            })
            .collect();

        SpectrumSnapshot::from(bins)
    }
}

/// Blackman window (alpha = 0.16)
pub fn blackman_window(index: usize, size: usize) -> f32 {
    let x = index as f32 / size as f32;
    0.42 - 0.5 * (2.0 * PI * x).cos() + 0.08 * (4.0 * PI * x).cos()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq_hz: f32, sample_rate: f32, len: usize, amplitude: f32) -> Vec<f32> {
        (0..len)
            .map(|i| (2.0 * PI * freq_hz * i as f32 / sample_rate).sin() * amplitude)
            .collect()
    }

    #[test]
    fn test_blackman_window() {
        let size = 512;

        // Blackman window is ~0 at the start, 1 at center
        assert!(blackman_window(0, size).abs() < 1e-6);
        assert!((blackman_window(size / 2, size) - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_silence_maps_to_zero() {
        let mut analyser = SpectrumAnalyser::new(AnalyserConfig::default()).unwrap();
        let snapshot = analyser.analyse(&vec![0.0; 512]);

        assert_eq!(snapshot.len(), 256);
        assert!(snapshot.bins().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_sine_peaks_at_its_bin() {
        let config = AnalyserConfig {
            smoothing_time_constant: 0.0,
            ..Default::default()
        };
        let mut analyser = SpectrumAnalyser::new(config).unwrap();

        // 44100 / 512 ≈ 86.13 Hz per bin; bin 20 ≈ 1722.7 Hz.
        // Quiet enough that the main lobe stays inside the dB range.
        let bin_hz = 44100.0 / 512.0;
        let samples = sine(20.0 * bin_hz, 44100.0, 512, 0.001);
        let snapshot = analyser.analyse(&samples);

        let (peak, _) = snapshot
            .bins()
            .iter()
            .enumerate()
            .max_by_key(|&(_, &b)| b)
            .unwrap();
        let bins = snapshot.bins();
        assert_eq!(peak, 20);
        assert!(bins[20] > bins[19] && bins[20] > bins[21]);
        assert!(bins[100] < bins[20] / 2);
    }

    #[test]
    fn test_smoothing_decays_gradually() {
        let mut analyser = SpectrumAnalyser::new(AnalyserConfig::default()).unwrap();
        let bin_hz = 44100.0 / 512.0;
        let loud = sine(10.0 * bin_hz, 44100.0, 512, 0.8);

        let first = analyser.analyse(&loud).bins()[10];
        let second = analyser.analyse(&loud).bins()[10];
        assert!(second >= first);

        // Silence after signal: smoothed magnitude keeps the bin lit for a while
        let after = analyser.analyse(&vec![0.0; 512]).bins()[10];
        assert!(after > 0);

        // A fresh analyser has no history
        let mut fresh = SpectrumAnalyser::new(AnalyserConfig::default()).unwrap();
        let cleared = fresh.analyse(&vec![0.0; 512]).bins()[10];
        assert_eq!(cleared, 0);
    }

    #[test]
    fn test_short_input_is_padded() {
        let mut analyser = SpectrumAnalyser::new(AnalyserConfig::default()).unwrap();
        let snapshot = analyser.analyse(&[0.5; 10]);
        assert_eq!(snapshot.len(), 256);
    }
}
