//! Audio-thread side of the bridge.
//!
//! [`ReverbProcessor`] owns the engine. Each block it ingests the host's
//! events into the [`ParamStore`], and if anything was written (by those
//! events or by the control thread since the last block) it compares one
//! consistent snapshot against the engine's applied parameters and calls the
//! engine setter at most once. Rendering always sees the end-of-event-pass
//! state; nothing is applied mid-block.

use reverie_dsp::ReverbEngine;

use crate::events::{ParamEvent, ingest};
use crate::store::ParamStore;

/// The engine plus the bookkeeping that keeps it in step with the store.
///
/// Only ever touched from the audio thread (or from whichever thread the
/// host uses for activation, which is never concurrent with processing).
#[derive(Debug)]
pub struct ReverbProcessor<E> {
    engine: E,
    applied_generation: u64,
}

impl<E: ReverbEngine> ReverbProcessor<E> {
    /// Wrap an engine. Call [`activate`](Self::activate) before rendering.
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            applied_generation: 0,
        }
    }

    /// Fix the sample rate, seed the engine from the store, and clear any
    /// tail. Allocates (delay lines are sized to the rate).
    pub fn activate(&mut self, store: &ParamStore, sample_rate: f64) {
        self.engine.set_sample_rate(sample_rate);
        let (snapshot, generation) = store.snapshot_with_generation();
        self.engine.set_parameters(&snapshot);
        self.applied_generation = generation;
        self.engine.reset();
    }

    /// Push the store's snapshot into the engine if any field differs from
    /// what the engine last applied. Returns whether the setter was called.
    pub fn apply_to_engine(&mut self, store: &ParamStore) -> bool {
        let (snapshot, generation) = store.snapshot_with_generation();
        self.applied_generation = generation;

        if snapshot == self.engine.parameters() {
            return false;
        }
        self.engine.set_parameters(&snapshot);
        true
    }

    /// Run the per-block event pass.
    ///
    /// Writes `events` into the store, then applies once if those events or
    /// any control-thread write since the last apply changed the store.
    /// Returns whether the engine setter was called.
    pub fn begin_block<I>(&mut self, store: &ParamStore, events: I) -> bool
    where
        I: IntoIterator<Item = ParamEvent>,
    {
        let wrote = ingest(store, events);
        if wrote || store.generation() != self.applied_generation {
            self.apply_to_engine(store)
        } else {
            false
        }
    }

    /// Render a stereo block from separate buffers.
    pub fn process_stereo(
        &mut self,
        left_in: &[f32],
        right_in: &[f32],
        left_out: &mut [f32],
        right_out: &mut [f32],
    ) {
        self.engine
            .process_stereo(left_in, right_in, left_out, right_out);
    }

    /// Render a stereo block in place.
    pub fn process_stereo_inplace(&mut self, left: &mut [f32], right: &mut [f32]) {
        self.engine.process_stereo_inplace(left, right);
    }

    /// Clear the engine's tail. Parameter values are kept.
    pub fn reset(&mut self) {
        self.engine.reset();
    }

    /// The wrapped engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }
}
