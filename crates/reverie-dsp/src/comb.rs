//! Damped feedback comb filter.
//!
//! A fixed-length comb filter with a one-pole lowpass in the feedback path,
//! the parallel stage of a Freeverb network.

use alloc::vec;
use alloc::vec::Vec;

use crate::flush_denormal;

/// Comb filter with feedback and damping.
///
/// Damping and feedback are passed per sample rather than stored, so the
/// owning engine can ramp them with one smoother shared by all combs.
///
/// # Example
///
/// ```rust
/// use reverie_dsp::CombFilter;
///
/// let mut comb = CombFilter::new(1000);
/// let output = comb.process(1.0, 0.2, 0.84);
/// assert_eq!(output, 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct CombFilter {
    buffer: Vec<f32>,
    index: usize,
    last: f32,
}

impl CombFilter {
    /// Create a comb filter with the given delay length in samples (at least 1).
    pub fn new(delay_samples: usize) -> Self {
        Self {
            buffer: vec![0.0; delay_samples.max(1)],
            index: 0,
            last: 0.0,
        }
    }

    /// Process one sample.
    ///
    /// - `damp`: 0.0 = bright, towards 1.0 = dark
    /// - `feedback`: decay per trip around the loop, 1.0 = infinite sustain
    #[inline]
    pub fn process(&mut self, input: f32, damp: f32, feedback: f32) -> f32 {
        let output = self.buffer[self.index];

        // One-pole lowpass in the feedback path
        self.last = flush_denormal(output * (1.0 - damp) + self.last * damp);

        self.buffer[self.index] = input + self.last * feedback;
        self.index += 1;
        if self.index >= self.buffer.len() {
            self.index = 0;
        }

        output
    }

    /// Zero the delay line and the damping filter.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.last = 0.0;
        self.index = 0;
    }

    /// Delay length in samples.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Always false; a comb holds at least one sample.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}
