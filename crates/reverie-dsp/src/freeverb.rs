//! Freeverb stereo reverb engine.
//!
//! Jezar's public-domain Freeverb: a mono sum feeds 8 parallel damped comb
//! filters and 4 series allpass filters per channel. The right channel's
//! delay lines are 23 samples longer than the left's, which decorrelates the
//! two tails and gives the stereo image.

use crate::math::scale_delay;
use crate::{AllpassFilter, CombFilter, LinearSmoothedParam, ReverbEngine, ReverbParameters};

/// Comb filter delay times (at 44.1kHz reference).
/// These are mutually prime to avoid resonances.
const COMB_TUNINGS_44K: [usize; 8] = [1116, 1188, 1277, 1356, 1422, 1491, 1557, 1617];

/// Allpass filter delay times (at 44.1kHz reference).
const ALLPASS_TUNINGS_44K: [usize; 4] = [556, 441, 341, 225];

/// Extra delay for the right channel, in samples at the reference rate.
const STEREO_SPREAD: usize = 23;

/// Reference sample rate for tuning constants.
const REFERENCE_RATE: f64 = 44100.0;

/// Parameter ramp time in seconds.
const SMOOTHING_SECONDS: f64 = 0.01;

/// Input gain into the comb bank; muted while frozen.
const FIXED_GAIN: f32 = 0.015;

const WET_SCALE: f32 = 3.0;
const DRY_SCALE: f32 = 2.0;
const DAMP_SCALE: f32 = 0.4;
const ROOM_SCALE: f32 = 0.28;
const ROOM_OFFSET: f32 = 0.7;

/// One channel's filter network.
#[derive(Debug, Clone)]
struct Tank {
    combs: [CombFilter; 8],
    allpasses: [AllpassFilter; 4],
}

impl Tank {
    fn new(sample_rate: f64, spread: usize) -> Self {
        Self {
            combs: core::array::from_fn(|i| {
                CombFilter::new(scale_delay(
                    COMB_TUNINGS_44K[i] + spread,
                    sample_rate,
                    REFERENCE_RATE,
                ))
            }),
            allpasses: core::array::from_fn(|i| {
                AllpassFilter::new(scale_delay(
                    ALLPASS_TUNINGS_44K[i] + spread,
                    sample_rate,
                    REFERENCE_RATE,
                ))
            }),
        }
    }

    #[inline]
    fn process(&mut self, input: f32, damp: f32, feedback: f32) -> f32 {
        let mut out = 0.0;
        for comb in &mut self.combs {
            out += comb.process(input, damp, feedback);
        }
        for allpass in &mut self.allpasses {
            out = allpass.process(out);
        }
        out
    }

    fn clear(&mut self) {
        self.combs.iter_mut().for_each(CombFilter::clear);
        self.allpasses.iter_mut().for_each(AllpassFilter::clear);
    }
}

/// Freeverb stereo reverb.
///
/// # Parameters
///
/// - `room_size`: comb feedback, 0.7 to 0.98
/// - `damping`: comb lowpass, 0.0 to 0.4
/// - `wet_level`: wet gain, 0.0 to 3.0
/// - `dry_level`: dry gain, 0.0 to 2.0
/// - `width`: crossfeed between the two tails
/// - `freeze`: feedback 1.0, damping 0.0, input muted
///
/// Gains, damping and feedback ramp over 10ms so automation does not zipper.
///
/// # Example
///
/// ```rust
/// use reverie_dsp::{Freeverb, ReverbEngine, ReverbParameters};
///
/// let mut reverb = Freeverb::new(44100.0);
/// let params = ReverbParameters { wet_level: 0.5, ..Default::default() };
/// reverb.set_parameters(&params);
/// assert_eq!(reverb.parameters(), params);
/// ```
#[derive(Debug, Clone)]
pub struct Freeverb {
    left: Tank,
    right: Tank,
    parameters: ReverbParameters,
    sample_rate: f64,
    gain: f32,
    damping: LinearSmoothedParam,
    feedback: LinearSmoothedParam,
    dry_gain: LinearSmoothedParam,
    wet_gain1: LinearSmoothedParam,
    wet_gain2: LinearSmoothedParam,
}

impl Freeverb {
    /// Create a reverb at the given sample rate with default parameters.
    pub fn new(sample_rate: f64) -> Self {
        let mut reverb = Self {
            left: Tank::new(sample_rate, 0),
            right: Tank::new(sample_rate, STEREO_SPREAD),
            parameters: ReverbParameters::default(),
            sample_rate,
            gain: FIXED_GAIN,
            damping: LinearSmoothedParam::default(),
            feedback: LinearSmoothedParam::default(),
            dry_gain: LinearSmoothedParam::default(),
            wet_gain1: LinearSmoothedParam::default(),
            wet_gain2: LinearSmoothedParam::default(),
        };
        reverb.set_parameters(&ReverbParameters::default());
        reverb.reset_smoothers();
        reverb
    }

    /// Current sample rate in Hz.
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    fn reset_smoothers(&mut self) {
        for smoother in [
            &mut self.damping,
            &mut self.feedback,
            &mut self.dry_gain,
            &mut self.wet_gain1,
            &mut self.wet_gain2,
        ] {
            smoother.reset(self.sample_rate, SMOOTHING_SECONDS);
        }
    }

    fn update_damping(&mut self) {
        if self.parameters.freeze {
            self.damping.set_target(0.0);
            self.feedback.set_target(1.0);
        } else {
            self.damping.set_target(self.parameters.damping * DAMP_SCALE);
            self.feedback
                .set_target(self.parameters.room_size * ROOM_SCALE + ROOM_OFFSET);
        }
    }

    #[inline]
    fn tick(&mut self, in_l: f32, in_r: f32) -> (f32, f32) {
        let input = (in_l + in_r) * self.gain;
        let damp = self.damping.advance();
        let feedback = self.feedback.advance();

        let out_l = self.left.process(input, damp, feedback);
        let out_r = self.right.process(input, damp, feedback);

        let dry = self.dry_gain.advance();
        let wet1 = self.wet_gain1.advance();
        let wet2 = self.wet_gain2.advance();

        (
            out_l * wet1 + out_r * wet2 + in_l * dry,
            out_r * wet1 + out_l * wet2 + in_r * dry,
        )
    }
}

impl Default for Freeverb {
    fn default() -> Self {
        Self::new(REFERENCE_RATE)
    }
}

impl ReverbEngine for Freeverb {
    fn set_sample_rate(&mut self, sample_rate: f64) {
        // Same rate: the delay lines already have the right lengths.
        if sample_rate == self.sample_rate {
            self.reset_smoothers();
            return;
        }
        self.sample_rate = sample_rate;
        self.left = Tank::new(sample_rate, 0);
        self.right = Tank::new(sample_rate, STEREO_SPREAD);
        self.reset_smoothers();
    }

    fn set_parameters(&mut self, parameters: &ReverbParameters) {
        self.parameters = *parameters;

        let wet = parameters.wet_level * WET_SCALE;
        self.dry_gain.set_target(parameters.dry_level * DRY_SCALE);
        self.wet_gain1
            .set_target(0.5 * wet * (1.0 + parameters.width));
        self.wet_gain2
            .set_target(0.5 * wet * (1.0 - parameters.width));
        self.gain = if parameters.freeze { 0.0 } else { FIXED_GAIN };

        self.update_damping();
    }

    fn parameters(&self) -> ReverbParameters {
        self.parameters
    }

    fn reset(&mut self) {
        self.left.clear();
        self.right.clear();
        self.reset_smoothers();
    }

    fn process_stereo(
        &mut self,
        left_in: &[f32],
        right_in: &[f32],
        left_out: &mut [f32],
        right_out: &mut [f32],
    ) {
        let frames = left_in
            .len()
            .min(right_in.len())
            .min(left_out.len())
            .min(right_out.len());

        for i in 0..frames {
            let (l, r) = self.tick(left_in[i], right_in[i]);
            left_out[i] = l;
            right_out[i] = r;
        }
    }

    fn process_stereo_inplace(&mut self, left: &mut [f32], right: &mut [f32]) {
        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            (*l, *r) = self.tick(*l, *r);
        }
    }
}
