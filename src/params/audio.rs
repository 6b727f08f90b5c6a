//! Spectrum analysis configuration.

use crate::error::ConfigError;

/// Byte-spectrum analyser configuration
///
/// Semantics follow the browser analyser node the visuals were tuned against:
/// magnitudes are smoothed over time, converted to decibels and mapped
/// linearly from `[min_decibels, max_decibels]` onto `0..=255`.
#[derive(Debug, Clone)]
pub struct AnalyserConfig {
    /// FFT window size (power of 2); yields `fft_size / 2` bins
    pub fft_size: usize,

    /// Exponential smoothing between frames (0 = none, 1 = frozen)
    pub smoothing_time_constant: f32,

    /// Magnitude mapped to byte 0 (dBFS)
    pub min_decibels: f32,

    /// Magnitude mapped to byte 255 (dBFS)
    pub max_decibels: f32,

    /// Analysis update interval (milliseconds), ~one display frame
    pub update_interval_ms: u64,
}

impl Default for AnalyserConfig {
    fn default() -> Self {
        Self {
            fft_size: 512,
            smoothing_time_constant: 0.8,
            min_decibels: -100.0,
            max_decibels: -30.0,
            update_interval_ms: 16,
        }
    }
}

impl AnalyserConfig {
    /// Number of frequency bins per snapshot
    pub fn bin_count(&self) -> usize {
        self.fft_size / 2
    }

    /// Validate configuration (FFT size must be power of 2, etc.)
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.fft_size.is_power_of_two() || self.fft_size < 32 {
            return Err(ConfigError::FftSize(self.fft_size));
        }
        if !(0.0..=1.0).contains(&self.smoothing_time_constant) {
            return Err(ConfigError::Smoothing(self.smoothing_time_constant));
        }
        if self.min_decibels >= self.max_decibels {
            return Err(ConfigError::DecibelRange {
                min: self.min_decibels,
                max: self.max_decibels,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AnalyserConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.bin_count(), 256);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = AnalyserConfig {
            fft_size: 500,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::FftSize(500)));

        let config = AnalyserConfig {
            smoothing_time_constant: 1.5,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::Smoothing(1.5)));

        let config = AnalyserConfig {
            min_decibels: -10.0,
            max_decibels: -30.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DecibelRange { .. })
        ));
    }
}
