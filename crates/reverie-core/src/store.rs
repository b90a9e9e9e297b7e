//! The parameter store shared by the control and audio threads.
//!
//! One [`ReverbParameters`] snapshot behind a `parking_lot::Mutex`. Every
//! critical section is a fixed-size copy or a single field assignment, so the
//! worst-case hold time is constant and the audio thread can take the lock
//! without risking a deadline. Nothing inside the lock allocates, logs, or
//! touches I/O.
//!
//! A generation counter is bumped (inside the lock) on every accepted write.
//! The audio thread compares it against the generation it last applied and
//! only takes the lock when something changed.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use reverie_dsp::ReverbParameters;

use crate::param::ParamId;

/// Canonical parameter values for one plugin instance.
///
/// Holds the requested values; the engine holds its own applied copy, which
/// only the audio thread updates (see [`ReverbProcessor`](crate::ReverbProcessor)).
#[derive(Debug)]
pub struct ParamStore {
    snapshot: Mutex<ReverbParameters>,
    generation: AtomicU64,
}

impl ParamStore {
    /// Create a store holding `initial` (clamped).
    pub fn new(initial: ReverbParameters) -> Self {
        Self {
            snapshot: Mutex::new(initial.clamped()),
            generation: AtomicU64::new(0),
        }
    }

    /// Write one control parameter by raw id.
    ///
    /// Ids outside the control range and non-finite values are ignored;
    /// other values are clamped to `[0.0, 1.0]`. Returns whether the write
    /// was accepted.
    pub fn write(&self, raw_id: u32, value: f32) -> bool {
        match ParamId::from_raw(raw_id) {
            Some(id) => self.set(id, value),
            None => false,
        }
    }

    /// Write one control parameter.
    ///
    /// Non-finite values are ignored; other values are clamped to
    /// `[0.0, 1.0]`. Returns whether the write was accepted.
    pub fn set(&self, id: ParamId, value: f32) -> bool {
        if !value.is_finite() {
            return false;
        }
        let value = value.clamp(0.0, 1.0);

        let mut guard = self.snapshot.lock();
        id.set(&mut guard, value);
        self.generation.fetch_add(1, Ordering::Release);
        true
    }

    /// Read one control parameter.
    pub fn get(&self, id: ParamId) -> f32 {
        id.get(&self.snapshot.lock())
    }

    /// Set the freeze flag.
    pub fn set_freeze(&self, freeze: bool) {
        let mut guard = self.snapshot.lock();
        guard.freeze = freeze;
        self.generation.fetch_add(1, Ordering::Release);
    }

    /// A consistent copy of the whole snapshot.
    pub fn snapshot(&self) -> ReverbParameters {
        *self.snapshot.lock()
    }

    /// A consistent copy of the snapshot together with the generation it
    /// corresponds to.
    pub fn snapshot_with_generation(&self) -> (ReverbParameters, u64) {
        let guard = self.snapshot.lock();
        (*guard, self.generation.load(Ordering::Acquire))
    }

    /// Replace the whole snapshot at once (state load, presets).
    pub fn replace(&self, parameters: ReverbParameters) {
        let parameters = parameters.clamped();
        let mut guard = self.snapshot.lock();
        *guard = parameters;
        self.generation.fetch_add(1, Ordering::Release);
    }

    /// Number of accepted writes so far. Lock-free.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }
}

impl Default for ParamStore {
    fn default() -> Self {
        Self::new(ReverbParameters::default())
    }
}
