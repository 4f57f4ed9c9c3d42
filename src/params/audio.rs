//! Audio analysis configuration.

use crate::error::AudioError;

/// Spectrum analyser configuration (byte-scaled output, fixed sample bins)
#[derive(Debug, Clone)]
pub struct AnalyserConfig {
    /// Analysis window size in samples (must be power of 2)
    /// Yields fft_size / 2 frequency bins
    pub fft_size: usize,

    /// Level mapped to byte 0 (dBFS)
    pub min_decibels: f32,

    /// Level mapped to byte 255 (dBFS)
    pub max_decibels: f32,

    /// Weight of the previous magnitude in the running average (0.0-1.0)
    pub smoothing: f32,

    /// Bin feeding the `audio_low` uniform
    pub low_bin: usize,

    /// Bin feeding the `audio_high` uniform
    pub high_bin: usize,
}

impl Default for AnalyserConfig {
    fn default() -> Self {
        Self {
            fft_size: 32,
            min_decibels: -55.0,
            max_decibels: -30.0,
            smoothing: 0.8,
            low_bin: 2,
            high_bin: 5,
        }
    }
}

impl AnalyserConfig {
    /// Number of frequency bins produced per analysis
    pub fn bin_count(&self) -> usize {
        self.fft_size / 2
    }

    /// Center frequency (Hz) of a bin at the given sample rate
    pub fn bin_to_hz(&self, bin: usize, sample_rate_hz: u32) -> f32 {
        bin as f32 * sample_rate_hz as f32 / self.fft_size as f32
    }

    /// Validate configuration (FFT size must be power of 2, bins in range, etc.)
    pub fn validate(&self) -> Result<(), AudioError> {
        if !self.fft_size.is_power_of_two() || self.fft_size < 2 {
            return Err(AudioError::InvalidConfig(format!(
                "FFT size must be a power of 2, got {}",
                self.fft_size
            )));
        }
        if self.min_decibels >= self.max_decibels {
            return Err(AudioError::InvalidConfig(format!(
                "min_decibels ({}) must be below max_decibels ({})",
                self.min_decibels, self.max_decibels
            )));
        }
        if !(0.0..=1.0).contains(&self.smoothing) {
            return Err(AudioError::InvalidConfig(format!(
                "smoothing must be within 0..=1, got {}",
                self.smoothing
            )));
        }
        for bin in [self.low_bin, self.high_bin] {
            if bin >= self.bin_count() {
                return Err(AudioError::InvalidConfig(format!(
                    "bin {} out of range (only {} bins)",
                    bin,
                    self.bin_count()
                )));
            }
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
        assert_eq!(config.bin_count(), 16);
    }

    #[test]
    fn test_bin_to_hz() {
        let config = AnalyserConfig::default();

        // 44100 / 32 ≈ 1378 Hz per bin
        assert_eq!(config.bin_to_hz(0, 44100), 0.0);
        assert!((config.bin_to_hz(2, 44100) - 2756.25).abs() < 0.01);
    }

    #[test]
    fn test_validate_rejects_bad_config() {
        let mut config = AnalyserConfig::default();
        config.fft_size = 30;
        assert!(config.validate().is_err());

        let mut config = AnalyserConfig::default();
        config.high_bin = 16;
        assert!(config.validate().is_err());

        let mut config = AnalyserConfig::default();
        config.min_decibels = -20.0;
        assert!(config.validate().is_err());
    }
}
