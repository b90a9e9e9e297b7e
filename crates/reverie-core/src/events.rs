//! Host parameter events.
//!
//! Both plugin shells decode their native event batches into [`ParamEvent`]s
//! and hand them to [`ingest`]. Events are applied in delivery order, so for
//! repeated events on one parameter within a block the last one wins.

use crate::store::ParamStore;

/// One timestamped parameter-value event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamEvent {
    /// Sample offset within the block.
    pub time: u32,
    /// Raw parameter id as delivered by the host (not yet validated).
    pub param_id: u32,
    /// Requested value.
    pub value: f32,
}

impl ParamEvent {
    /// Create an event.
    pub fn new(time: u32, param_id: u32, value: f32) -> Self {
        Self {
            time,
            param_id,
            value,
        }
    }
}

/// Write a batch of events into the store.
///
/// Events with unknown ids or non-finite values are skipped. Returns whether
/// any write was accepted, which is what decides if the engine needs an
/// update this block.
pub fn ingest<I>(store: &ParamStore, events: I) -> bool
where
    I: IntoIterator<Item = ParamEvent>,
{
    let mut wrote = false;
    for event in events {
        wrote |= store.write(event.param_id, event.value);
    }
    wrote
}
