//! Allpass filter for reverb diffusion.
//!
//! The series stage of a Freeverb network. Freeverb's "allpass" is the
//! classic Schroeder approximation with a fixed 0.5 feedback; it smears the
//! comb output into a dense tail without adding obvious coloration.

use alloc::vec;
use alloc::vec::Vec;

use crate::flush_denormal;

/// Freeverb diffusion coefficient.
const ALLPASS_FEEDBACK: f32 = 0.5;

/// Schroeder allpass filter for diffusion.
///
/// # Example
///
/// ```rust
/// use reverie_dsp::AllpassFilter;
///
/// let mut allpass = AllpassFilter::new(556);
/// let output = allpass.process(1.0);
/// assert_eq!(output, -1.0);
/// ```
#[derive(Debug, Clone)]
pub struct AllpassFilter {
    buffer: Vec<f32>,
    index: usize,
}

impl AllpassFilter {
    /// Create an allpass filter with the given delay length in samples (at least 1).
    pub fn new(delay_samples: usize) -> Self {
        Self {
            buffer: vec![0.0; delay_samples.max(1)],
            index: 0,
        }
    }

    /// Process one sample.
    ///
    /// output = delayed - input
    /// delay_input = input + delayed * 0.5
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let delayed = self.buffer[self.index];

        self.buffer[self.index] = flush_denormal(input + delayed * ALLPASS_FEEDBACK);
        self.index += 1;
        if self.index >= self.buffer.len() {
            self.index = 0;
        }

        delayed - input
    }

    /// Zero the delay line.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.index = 0;
    }

    /// Delay length in samples.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Always false; an allpass holds at least one sample.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}
