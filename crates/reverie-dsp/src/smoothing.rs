//! Linear parameter smoothing for zipper-free gain and feedback changes.
//!
//! ```rust
//! use reverie_dsp::LinearSmoothedParam;
//!
//! let mut gain = LinearSmoothedParam::new(1.0);
//! gain.reset(48000.0, 0.01); // 10ms ramps
//! gain.set_target(0.5);
//!
//! for _ in 0..480 {
//!     let _g = gain.advance();
//! }
//! assert_eq!(gain.get(), 0.5);
//! ```

/// A parameter with linear smoothing (constant rate of change).
#[derive(Debug, Clone)]
pub struct LinearSmoothedParam {
    /// Current value
    current: f32,
    /// Target value
    target: f32,
    /// Increment per sample (can be positive or negative)
    increment: f32,
    /// Samples remaining until target reached
    samples_remaining: u32,
    /// Length of a full ramp in samples
    ramp_samples: u32,
}

impl LinearSmoothedParam {
    /// Create a smoother resting at `initial`, with instant changes until
    /// [`reset`](Self::reset) configures a ramp length.
    pub fn new(initial: f32) -> Self {
        Self {
            current: initial,
            target: initial,
            increment: 0.0,
            samples_remaining: 0,
            ramp_samples: 0,
        }
    }

    /// Configure the ramp length from a sample rate and ramp time, and snap
    /// to the current target.
    pub fn reset(&mut self, sample_rate: f64, ramp_seconds: f64) {
        self.ramp_samples = libm::floor(ramp_seconds * sample_rate).max(0.0) as u32;
        self.snap_to_target();
    }

    /// Set the target value.
    pub fn set_target(&mut self, target: f32) {
        if target == self.target {
            return;
        }

        self.target = target;

        if self.ramp_samples == 0 {
            self.current = target;
            self.increment = 0.0;
            self.samples_remaining = 0;
        } else {
            self.increment = (target - self.current) / self.ramp_samples as f32;
            self.samples_remaining = self.ramp_samples;
        }
    }

    /// Set value immediately.
    pub fn set_immediate(&mut self, value: f32) {
        self.target = value;
        self.snap_to_target();
    }

    /// Get next smoothed value.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        if self.samples_remaining > 0 {
            self.current += self.increment;
            self.samples_remaining -= 1;
            if self.samples_remaining == 0 {
                self.current = self.target; // Snap to exact target
            }
        }
        self.current
    }

    /// Get current value without advancing.
    #[inline]
    pub fn get(&self) -> f32 {
        self.current
    }

    /// Get target value.
    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Check if transition is complete.
    #[inline]
    pub fn is_settled(&self) -> bool {
        self.samples_remaining == 0
    }

    /// Snap to target immediately.
    pub fn snap_to_target(&mut self) {
        self.current = self.target;
        self.increment = 0.0;
        self.samples_remaining = 0;
    }
}

impl Default for LinearSmoothedParam {
    fn default() -> Self {
        Self::new(0.0)
    }
}
