//! Per-frame frequency bin sampling.

/// The two byte-scaled bins the galaxy reacts to
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrequencyBins {
    pub low: u8,
    pub high: u8,
}

/// Source of per-frame frequency bins
pub trait AudioSampler {
    /// Sample the low and high bins; called once per frame
    fn sample_frequency_bins(&mut self) -> FrequencyBins;
}

/// Stand-in when no audio is available: always silent
#[derive(Debug, Default)]
pub struct SilentSampler;

impl AudioSampler for SilentSampler {
    fn sample_frequency_bins(&mut self) -> FrequencyBins {
        FrequencyBins::default()
    }
}

/// Pick the configured bins out of a full byte spectrum
pub fn pick_bins(spectrum: &[u8], low_bin: usize, high_bin: usize) -> FrequencyBins {
    FrequencyBins {
        low: spectrum.get(low_bin).copied().unwrap_or(0),
        high: spectrum.get(high_bin).copied().unwrap_or(0),
    }
}
