//! The engine contract the plugin core drives.

use crate::ReverbParameters;

/// A stereo reverb engine.
///
/// The plugin core owns exactly one engine per active instance and only ever
/// touches it from the audio thread. Apart from [`set_sample_rate`], which
/// may allocate, implementations must be callable from a real-time callback:
/// no locks, no allocation, no I/O.
///
/// [`set_sample_rate`]: ReverbEngine::set_sample_rate
pub trait ReverbEngine: Send {
    /// Prepare delay lines and smoothers for `sample_rate` (Hz).
    fn set_sample_rate(&mut self, sample_rate: f64);

    /// Apply a full parameter snapshot.
    ///
    /// Callers batch changes and call this at most once per block, so an
    /// engine may do non-trivial recomputation here.
    fn set_parameters(&mut self, parameters: &ReverbParameters);

    /// The snapshot most recently applied with [`set_parameters`](Self::set_parameters).
    fn parameters(&self) -> ReverbParameters;

    /// Clear all internal state, silencing any ringing tail.
    ///
    /// Parameter values are kept.
    fn reset(&mut self);

    /// Process a stereo block from separate input and output buffers.
    ///
    /// Processes `min` of the four buffer lengths.
    fn process_stereo(
        &mut self,
        left_in: &[f32],
        right_in: &[f32],
        left_out: &mut [f32],
        right_out: &mut [f32],
    );

    /// Process a stereo block in place.
    fn process_stereo_inplace(&mut self, left: &mut [f32], right: &mut [f32]);
}
