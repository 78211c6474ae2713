//! Windowed accumulation of streaming audio samples.
//!
//! Incoming fragments are appended at the tail; fixed-size transcription
//! windows are consumed from the head. A trailing overlap segment of each
//! window is re-inserted at the head so consecutive windows share acoustic
//! context across the cut. "Not enough samples yet" is an `Option::None`,
//! never an error.

use std::collections::VecDeque;

use crate::config::{AudioSettings, ConfigError};

/// Streaming audio buffer with overlapping window extraction.
///
/// One buffer serves exactly one session; there is no internal locking.
#[derive(Debug)]
pub struct StreamingBuffer {
    samples: VecDeque<f32>,
    window_size: usize,
    overlap_size: usize,
    sample_rate: u32,
    /// All samples ever appended. Statistics only, never decremented.
    total_samples: u64,
}

impl StreamingBuffer {
    /// Build a buffer from validated audio settings.
    ///
    /// Fails with a `ConfigError` when the geometry is unusable; the caller
    /// must refuse to start the session in that case.
    pub fn new(settings: &AudioSettings) -> Result<Self, ConfigError> {
        settings.validate()?;
        Ok(Self {
            samples: VecDeque::new(),
            window_size: settings.window_size(),
            overlap_size: settings.overlap_size(),
            sample_rate: settings.sample_rate,
            total_samples: 0,
        })
    }

    /// Append samples at the tail. Empty chunks are fine.
    pub fn append(&mut self, chunk: &[f32]) {
        self.samples.extend(chunk.iter().copied());
        self.total_samples += chunk.len() as u64;
    }

    /// True iff a full window can be extracted right now.
    pub fn has_complete_window(&self) -> bool {
        self.samples.len() >= self.window_size
    }

    /// Extract one window from the head, or `None` if not enough samples.
    ///
    /// With `keep_overlap`, the trailing `overlap_size` samples of the
    /// extracted window are re-inserted at the head, so the net consumption
    /// per call is `window_size - overlap_size`. The returned window is
    /// always `window_size` long.
    pub fn extract_window(&mut self, keep_overlap: bool) -> Option<Vec<f32>> {
        if !self.has_complete_window() {
            return None;
        }

        let window: Vec<f32> = self.samples.drain(..self.window_size).collect();

        if keep_overlap && self.overlap_size > 0 {
            for &sample in window[self.window_size - self.overlap_size..].iter().rev() {
                self.samples.push_front(sample);
            }
        }

        Some(window)
    }

    /// Remove and return everything still held, or `None` when empty.
    ///
    /// Used once at stream termination; the leftover may be shorter than a
    /// full window.
    pub fn drain_remaining(&mut self) -> Option<Vec<f32>> {
        if self.samples.is_empty() {
            return None;
        }
        Some(self.samples.drain(..).collect())
    }

    /// Discard all held samples. `total_samples` is preserved.
    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Number of samples currently held.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration of the held samples in seconds.
    pub fn held_duration(&self) -> f64 {
        self.samples.len() as f64 / f64::from(self.sample_rate)
    }

    /// Duration of all audio ever appended, in seconds.
    pub fn total_duration(&self) -> f64 {
        self.total_samples as f64 / f64::from(self.sample_rate)
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn overlap_size(&self) -> usize {
        self.overlap_size
    }
}
