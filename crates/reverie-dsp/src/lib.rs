//! Reverie DSP - the stereo reverb engine behind the reverie plugins.
//!
//! This crate holds everything that touches samples. The plugin front ends
//! never reach into it directly; they talk to it through the
//! [`ReverbEngine`] trait and exchange whole [`ReverbParameters`] snapshots.
//!
//! # Contents
//!
//! - [`ReverbParameters`] - the five continuous controls plus the freeze flag,
//!   the unit of transfer between the parameter store and the engine
//! - [`ReverbEngine`] - the engine contract (`set_sample_rate`,
//!   `set_parameters`, `parameters`, `reset`, `process_stereo`)
//! - [`Freeverb`] - Jezar's Freeverb topology: 8 damped combs and
//!   4 allpasses per channel with a fixed stereo spread
//! - [`CombFilter`], [`AllpassFilter`], [`LinearSmoothedParam`] - building blocks
//!
//! # Real-time guarantees
//!
//! Only [`ReverbEngine::set_sample_rate`] allocates (delay buffers are
//! resized to the new rate). Every other engine method is allocation-free and
//! lock-free, so it may be called from the audio thread.
//!
//! # no_std Support
//!
//! Disable the default `std` feature to use the engine on targets without the
//! standard library (an allocator is still required for the delay buffers).
//!
//! # Example
//!
//! ```rust
//! use reverie_dsp::{Freeverb, ReverbEngine, ReverbParameters};
//!
//! let mut reverb = Freeverb::new(48000.0);
//! reverb.set_parameters(&ReverbParameters {
//!     room_size: 0.8,
//!     ..ReverbParameters::default()
//! });
//!
//! let input = [0.5_f32; 64];
//! let (mut left, mut right) = ([0.0_f32; 64], [0.0_f32; 64]);
//! reverb.process_stereo(&input, &input, &mut left, &mut right);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod allpass;
pub mod comb;
pub mod engine;
pub mod freeverb;
pub mod math;
pub mod params;
pub mod smoothing;

pub use allpass::AllpassFilter;
pub use comb::CombFilter;
pub use engine::ReverbEngine;
pub use freeverb::Freeverb;
pub use math::flush_denormal;
pub use params::ReverbParameters;
pub use smoothing::LinearSmoothedParam;
