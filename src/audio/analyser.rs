//! Byte-scaled spectrum analysis over a short window.
//!
//! Per call: Blackman window → FFT → magnitude / N → exponential smoothing
//! against the previous call → decibels → linear map of
//! `[min_decibels, max_decibels]` onto `0..=255`.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::collections::VecDeque;
use std::f32::consts::PI;
use std::sync::Arc;

use crate::error::AudioError;
use crate::params::AnalyserConfig;

/// Spectrum analyser with smoothing state carried between calls
pub struct FrequencyAnalyser {
    config: AnalyserConfig,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    scratch: Vec<Complex<f32>>,
    /// Smoothed magnitudes from the previous call
    smoothed: Vec<f32>,
}

impl FrequencyAnalyser {
    pub fn new(config: AnalyserConfig) -> Result<Self, AudioError> {
        config.validate()?;

        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(config.fft_size);
        let window = (0..config.fft_size)
            .map(|i| blackman_window(i, config.fft_size))
            .collect();

        Ok(Self {
            fft,
            window,
            scratch: vec![Complex::new(0.0, 0.0); config.fft_size],
            smoothed: vec![0.0; config.bin_count()],
            config,
        })
    }

    pub fn config(&self) -> &AnalyserConfig {
        &self.config
    }

    /// Analyse the most recent `fft_size` samples.
    ///
    /// Shorter input is treated as zero-padded at the front (silence before
    /// playback started). Returns `fft_size / 2` byte-scaled bins.
    pub fn byte_frequency_data(&mut self, samples: &[f32]) -> Vec<u8> {
        let n = self.config.fft_size;
        let recent = &samples[samples.len().saturating_sub(n)..];
        let pad = n - recent.len();

        for (i, slot) in self.scratch.iter_mut().enumerate() {
            let sample = if i < pad { 0.0 } else { recent[i - pad] };
            *slot = Complex::new(sample * self.window[i], 0.0);
        }

        self.fft.process(&mut self.scratch);

        let tau = self.config.smoothing;
        let range = self.config.max_decibels - self.config.min_decibels;

        self.smoothed
            .iter_mut()
            .zip(self.scratch.iter())
            .map(|(smoothed, bin)| {
                let magnitude = bin.norm() / n as f32;
                *smoothed = tau * *smoothed + (1.0 - tau) * magnitude;
                // Flush denormals so silence settles at exactly zero
                if *smoothed < 1e-20 {
                    *smoothed = 0.0;
                }

                let db = 20.0 * smoothed.log10();
                let scaled = 255.0 / range * (db - self.config.min_decibels);
                if scaled.is_nan() {
                    0
                } else {
                    scaled.clamp(0.0, 255.0) as u8
                }
            })
            .collect()
    }
}

/// Blackman window coefficient (a0 = 0.42, a1 = 0.5, a2 = 0.08)
pub fn blackman_window(index: usize, size: usize) -> f32 {
    let x = index as f32 / size as f32;
    0.42 - 0.5 * (2.0 * PI * x).cos() + 0.08 * (4.0 * PI * x).cos()
}

/// Fixed-capacity window of the most recent mono samples
#[derive(Debug, Clone)]
pub struct SampleWindow {
    samples: VecDeque<f32>,
    capacity: usize,
}

impl SampleWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push_slice(&mut self, samples: &[f32]) {
        let skip = samples.len().saturating_sub(self.capacity);
        for &sample in &samples[skip..] {
            if self.samples.len() == self.capacity {
                self.samples.pop_front();
            }
            self.samples.push_back(sample);
        }
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Oldest-to-newest copy
    pub fn to_vec(&self) -> Vec<f32> {
        self.samples.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyser() -> FrequencyAnalyser {
        FrequencyAnalyser::new(AnalyserConfig::default()).unwrap()
    }

    /// Sine centered exactly on `bin` of a 32-point window
    fn tone(bin: usize, amplitude: f32) -> Vec<f32> {
        (0..32)
            .map(|i| amplitude * (2.0 * PI * bin as f32 * i as f32 / 32.0).sin())
            .collect()
    }

    #[test]
    fn test_silence_is_zero() {
        let mut analyser = analyser();
        let bins = analyser.byte_frequency_data(&[0.0; 32]);
        assert_eq!(bins.len(), 16);
        assert!(bins.iter().all(|b| *b == 0));
    }

    #[test]
    fn test_empty_input_is_silence() {
        let mut analyser = analyser();
        let bins = analyser.byte_frequency_data(&[]);
        assert!(bins.iter().all(|b| *b == 0));
    }

    #[test]
    fn test_tone_peaks_at_its_bin() {
        let mut analyser = analyser();
        let signal = tone(5, 0.8);

        // Let smoothing converge
        let mut bins = Vec::new();
        for _ in 0..60 {
            bins = analyser.byte_frequency_data(&signal);
        }

        assert_eq!(bins[5], 255);
        assert!(bins[5] > bins[2]);
        assert!(bins[5] > bins[10]);
    }

    #[test]
    fn test_smoothing_rises_gradually() {
        let mut analyser = analyser();
        let signal = tone(2, 0.02);

        let first = analyser.byte_frequency_data(&signal)[2];
        let mut last = first;
        for _ in 0..30 {
            last = analyser.byte_frequency_data(&signal)[2];
        }
        assert!(last > first);
    }

    #[test]
    fn test_smoothing_decays_after_silence() {
        let mut analyser = analyser();
        let signal = tone(2, 0.8);
        for _ in 0..60 {
            analyser.byte_frequency_data(&signal);
        }

        let loud = analyser.byte_frequency_data(&[0.0; 32])[2];
        let mut quiet = loud;
        for _ in 0..60 {
            quiet = analyser.byte_frequency_data(&[0.0; 32])[2];
        }
        assert!(loud > 0);
        assert_eq!(quiet, 0);
    }

    #[test]
    fn test_uses_most_recent_samples() {
        let mut analyser = analyser();
        let mut samples = tone(5, 0.8);
        samples.extend(std::iter::repeat(0.0).take(32));

        // Tone scrolled out of the window
        let bins = analyser.byte_frequency_data(&samples);
        assert!(bins.iter().all(|b| *b == 0));
    }

    #[test]
    fn test_blackman_window() {
        assert!(blackman_window(0, 32).abs() < 1e-6);
        assert!((blackman_window(16, 32) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_sample_window_keeps_latest() {
        let mut window = SampleWindow::new(4);
        window.push_slice(&[1.0, 2.0, 3.0]);
        window.push_slice(&[4.0, 5.0]);
        assert_eq!(window.to_vec(), vec![2.0, 3.0, 4.0, 5.0]);

        window.push_slice(&[6.0, 7.0, 8.0, 9.0, 10.0]);
        assert_eq!(window.to_vec(), vec![7.0, 8.0, 9.0, 10.0]);

        window.clear();
        assert!(window.is_empty());
    }
}
