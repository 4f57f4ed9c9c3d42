//! Background track playback with a spectrum tap.

use cpal::traits::{DeviceTrait, HostTrait};
use rodio::{Decoder, OutputStream, Sink, Source};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::analyser::{FrequencyAnalyser, SampleWindow};
use super::controls::PlaybackAction;
use super::sampler::{pick_bins, AudioSampler, FrequencyBins};
use crate::error::AudioError;
use crate::params::AnalyserConfig;

/// Mono samples handed from the audio thread in batches of this size
const TAP_BATCH: usize = 64;

/// Audio system playing a track and analysing what it plays
pub struct PlaybackSystem {
    /// Most recent mono samples (shared with the audio thread)
    window: Arc<Mutex<SampleWindow>>,

    analyser: FrequencyAnalyser,

    sink: Sink,

    /// Audio output stream (kept alive)
    _stream: OutputStream,

    /// Returned when the window cannot be read
    last_bins: FrequencyBins,
}

impl PlaybackSystem {
    /// Open the default output device and queue `path`, paused
    pub fn open(path: &Path, config: AnalyserConfig) -> Result<Self, AudioError> {
        let analyser = FrequencyAnalyser::new(config)?;
        let window = Arc::new(Mutex::new(SampleWindow::new(analyser.config().fft_size)));

        // Probe the output device up front for a clear error
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(AudioError::NoOutputDevice)?;
        let device_config = device
            .default_output_config()
            .map_err(|e| AudioError::Stream(e.to_string()))?;

        log::info!(
            "Audio: {} @ {}Hz",
            device.name().unwrap_or_else(|_| "Unknown".to_string()),
            device_config.sample_rate().0
        );

        let (stream, stream_handle) = OutputStream::try_default()?;
        let sink = Sink::try_new(&stream_handle)?;
        sink.pause();

        log::info!("Loading audio track: {}", path.display());
        let source = Decoder::new(BufReader::new(File::open(path)?))?;
        log::info!(
            "Audio format: {} Hz, {} channels",
            source.sample_rate(),
            source.channels()
        );
        let config = analyser.config();
        log::info!(
            "Reactive bins: low {:.0} Hz, high {:.0} Hz",
            config.bin_to_hz(config.low_bin, source.sample_rate()),
            config.bin_to_hz(config.high_bin, source.sample_rate())
        );

        sink.append(TappedSource::new(
            source.convert_samples::<f32>(),
            Arc::clone(&window),
        ));

        Ok(Self {
            window,
            analyser,
            sink,
            _stream: stream,
            last_bins: FrequencyBins::default(),
        })
    }

    pub fn play(&self) {
        log::debug!("Playback resumed");
        self.sink.play();
    }

    /// Pause output; the analyser sees silence until playback resumes
    pub fn pause(&self) {
        log::debug!("Playback paused");
        self.sink.pause();
        if let Ok(mut window) = self.window.lock() {
            window.clear();
        }
    }

    /// Apply a playback button action
    pub fn apply(&self, action: PlaybackAction) {
        match action {
            PlaybackAction::Start | PlaybackAction::Resume => self.play(),
            PlaybackAction::Pause => self.pause(),
        }
    }
}

impl AudioSampler for PlaybackSystem {
    fn sample_frequency_bins(&mut self) -> FrequencyBins {
        let samples = match self.window.lock() {
            Ok(mut window) => {
                // Track over: nothing is sounding any more
                if self.sink.empty() {
                    window.clear();
                }
                window.to_vec()
            }
            Err(_) => return self.last_bins,
        };

        let spectrum = self.analyser.byte_frequency_data(&samples);
        let config = self.analyser.config();
        self.last_bins = pick_bins(&spectrum, config.low_bin, config.high_bin);
        self.last_bins
    }
}

/// Pass-through source that downmixes what it yields into the sample window
struct TappedSource<I> {
    inner: I,
    window: Arc<Mutex<SampleWindow>>,
    channels: u16,
    /// Sum of the current frame's channels
    frame_sum: f32,
    frame_pos: u16,
    batch: Vec<f32>,
}

impl<I> TappedSource<I>
where
    I: Source<Item = f32>,
{
    fn new(inner: I, window: Arc<Mutex<SampleWindow>>) -> Self {
        let channels = inner.channels().max(1);
        Self {
            inner,
            window,
            channels,
            frame_sum: 0.0,
            frame_pos: 0,
            batch: Vec::with_capacity(TAP_BATCH),
        }
    }

    fn flush(&mut self) {
        if self.batch.is_empty() {
            return;
        }
        if let Ok(mut window) = self.window.lock() {
            window.push_slice(&self.batch);
        }
        self.batch.clear();
    }
}

impl<I> Iterator for TappedSource<I>
where
    I: Source<Item = f32>,
{
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        let Some(sample) = self.inner.next() else {
            self.flush();
            return None;
        };

        self.frame_sum += sample;
        self.frame_pos += 1;
        if self.frame_pos == self.channels {
            self.batch.push(self.frame_sum / self.channels as f32);
            self.frame_sum = 0.0;
            self.frame_pos = 0;
            if self.batch.len() >= TAP_BATCH {
                self.flush();
            }
        }

        Some(sample)
    }
}

impl<I> Source for TappedSource<I>
where
    I: Source<Item = f32>,
{
    fn current_frame_len(&self) -> Option<usize> {
        self.inner.current_frame_len()
    }

    fn channels(&self) -> u16 {
        self.inner.channels()
    }

    fn sample_rate(&self) -> u32 {
        self.inner.sample_rate()
    }

    fn total_duration(&self) -> Option<Duration> {
        self.inner.total_duration()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rodio::buffer::SamplesBuffer;

    #[test]
    fn test_tap_downmixes_and_passes_through() {
        let window = Arc::new(Mutex::new(SampleWindow::new(128)));
        // Stereo frames: (1, 0), (0.5, 0.5), (-1, 1)
        let source = SamplesBuffer::new(2, 44100, vec![1.0f32, 0.0, 0.5, 0.5, -1.0, 1.0]);
        let tapped = TappedSource::new(source, Arc::clone(&window));

        let passed: Vec<f32> = tapped.collect();
        assert_eq!(passed, vec![1.0, 0.0, 0.5, 0.5, -1.0, 1.0]);

        // Flushed at end of stream
        assert_eq!(window.lock().unwrap().to_vec(), vec![0.5, 0.5, 0.0]);
    }

    #[test]
    fn test_tap_flushes_in_batches() {
        let window = Arc::new(Mutex::new(SampleWindow::new(32)));
        let source = SamplesBuffer::new(1, 44100, vec![0.25f32; TAP_BATCH + 3]);
        let mut tapped = TappedSource::new(source, Arc::clone(&window));

        for _ in 0..TAP_BATCH {
            tapped.next();
        }
        // One full batch delivered, trimmed to the window capacity
        assert_eq!(window.lock().unwrap().len(), 32);
    }
}
