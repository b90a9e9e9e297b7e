//! Thread-safe shared state for the CLAP shell.
//!
//! [`ReverbShared`] lives for the whole plugin instance and is reachable from
//! the main thread (params, state, GUI, timer) and the audio thread. It holds
//! the core [`ParamStore`], the [`Lifecycle`] cell, and [`HostOutbound`]: the
//! per-parameter flags through which editor gestures reach the host.

use std::sync::atomic::{AtomicU8, Ordering};

use clack_plugin::events::EventFlags;
use clack_plugin::events::event_types::{
    ParamGestureBeginEvent, ParamGestureEndEvent, ParamValueEvent,
};
use clack_plugin::prelude::*;
use clack_plugin::utils::Cookie;
use reverie_core::{Lifecycle, PARAM_COUNT, ParamChange, ParamId, ParamStore, SurfaceMessage};

/// A gesture-begin is pending for the host.
pub const GESTURE_BEGIN: u8 = 1;
/// A value change is pending for the host.
pub const VALUE_CHANGED: u8 = 2;
/// A gesture-end is pending for the host.
pub const GESTURE_END: u8 = 4;

/// Shared state accessible from all plugin threads.
#[derive(Debug)]
pub struct ReverbShared {
    /// Canonical parameter values.
    pub store: ParamStore,
    /// Host-driven lifecycle.
    pub lifecycle: Lifecycle,
    /// Editor changes not yet reported to the host.
    pub outbound: HostOutbound,
}

impl ReverbShared {
    /// Fresh state: default parameters, uninitialized lifecycle.
    pub fn new() -> Self {
        Self {
            store: ParamStore::default(),
            lifecycle: Lifecycle::new(),
            outbound: HostOutbound::new(),
        }
    }
}

impl Default for ReverbShared {
    fn default() -> Self {
        Self::new()
    }
}

impl PluginShared<'_> for ReverbShared {}

/// Pending host notifications, one bitmask per parameter.
///
/// The main thread sets bits with `fetch_or` as it drains editor messages;
/// whichever thread next runs an event pass (audio `process`/`flush`, or the
/// main-thread `flush` while inactive) clears them with `swap(0)` and turns
/// them into CLAP output events. Several drags between two passes collapse
/// into one begin/value/end triple. Bits whose event the host queue refused
/// are set again and retried on the next pass.
#[derive(Debug)]
pub struct HostOutbound {
    flags: [AtomicU8; PARAM_COUNT],
}

impl HostOutbound {
    /// No notifications pending.
    pub fn new() -> Self {
        Self {
            flags: std::array::from_fn(|_| AtomicU8::new(0)),
        }
    }

    /// Record an editor message for the host. Freeze is not a host
    /// parameter and is not reported.
    pub fn push(&self, message: SurfaceMessage) {
        let (id, bit) = match message {
            SurfaceMessage::GestureBegin(id) => (id, GESTURE_BEGIN),
            SurfaceMessage::Changed(change) => (change.id, VALUE_CHANGED),
            SurfaceMessage::GestureEnd(id) => (id, GESTURE_END),
            SurfaceMessage::Freeze(_) => return,
        };
        self.flags[id.index()].fetch_or(bit, Ordering::AcqRel);
    }

    /// Read and clear the pending bits for one parameter.
    pub fn take(&self, id: ParamId) -> u8 {
        self.flags[id.index()].swap(0, Ordering::AcqRel)
    }

    /// Whether anything is waiting to be reported.
    pub fn is_pending(&self) -> bool {
        self.flags.iter().any(|f| f.load(Ordering::Acquire) != 0)
    }

    /// Report pending changes to the host.
    ///
    /// Per parameter, in order: gesture begin, the store's current value,
    /// gesture end. Allocation-free; safe on the audio thread.
    pub fn emit(&self, store: &ParamStore, output: &mut OutputEvents) {
        self.emit_with(store, |message| {
            let pushed = match message {
                SurfaceMessage::GestureBegin(id) => output.try_push(
                    ParamGestureBeginEvent::new(0, ClapId::new(id.raw()))
                        .with_flags(EventFlags::IS_LIVE),
                ),
                SurfaceMessage::Changed(change) => output.try_push(
                    ParamValueEvent::new(
                        0,
                        ClapId::new(change.id.raw()),
                        Pckn::match_all(),
                        f64::from(change.value),
                        Cookie::empty(),
                    )
                    .with_flags(EventFlags::IS_LIVE),
                ),
                SurfaceMessage::GestureEnd(id) => output.try_push(
                    ParamGestureEndEvent::new(0, ClapId::new(id.raw()))
                        .with_flags(EventFlags::IS_LIVE),
                ),
                SurfaceMessage::Freeze(_) => return true,
            };
            pushed.is_ok()
        });
    }

    /// Hand pending notifications to `push` in host order. Value messages
    /// carry the store's current value.
    ///
    /// When `push` returns `false` the refused bit and every later bit of
    /// that parameter are set again, and the pass stops; parameters not yet
    /// visited keep their bits untouched.
    pub fn emit_with(&self, store: &ParamStore, mut push: impl FnMut(SurfaceMessage) -> bool) {
        let mut snapshot = None;

        for id in ParamId::ALL {
            let flags = self.take(id);
            if flags == 0 {
                continue;
            }

            for bit in [GESTURE_BEGIN, VALUE_CHANGED, GESTURE_END] {
                if flags & bit == 0 {
                    continue;
                }
                let message = match bit {
                    GESTURE_BEGIN => SurfaceMessage::GestureBegin(id),
                    GESTURE_END => SurfaceMessage::GestureEnd(id),
                    _ => {
                        let params = *snapshot.get_or_insert_with(|| store.snapshot());
                        SurfaceMessage::Changed(ParamChange {
                            id,
                            value: id.get(&params),
                        })
                    }
                };
                if !push(message) {
                    let unsent = flags & !(bit - 1);
                    self.flags[id.index()].fetch_or(unsent, Ordering::AcqRel);
                    return;
                }
            }
        }
    }
}

impl Default for HostOutbound {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clack_plugin::events::io::EventBuffer;
    use clack_plugin::events::spaces::CoreEventSpace;
    use reverie_core::LifecycleState;

    fn changed(id: ParamId, value: f32) -> SurfaceMessage {
        SurfaceMessage::Changed(ParamChange { id, value })
    }

    #[test]
    fn new_shared_is_default() {
        let shared = ReverbShared::new();
        assert_eq!(shared.lifecycle.state(), LifecycleState::Uninitialized);
        assert_eq!(shared.store.generation(), 0);
        assert!(!shared.outbound.is_pending());
    }

    #[test]
    fn gesture_flags_begin_end() {
        let outbound = HostOutbound::new();

        outbound.push(SurfaceMessage::GestureBegin(ParamId::Wet));
        assert!(outbound.is_pending());
        assert_eq!(outbound.take(ParamId::Wet), GESTURE_BEGIN);
        assert_eq!(outbound.take(ParamId::Wet), 0);

        outbound.push(SurfaceMessage::GestureEnd(ParamId::Wet));
        assert_eq!(outbound.take(ParamId::Wet), GESTURE_END);
        assert!(!outbound.is_pending());
    }

    #[test]
    fn flags_accumulate_per_param() {
        let outbound = HostOutbound::new();

        outbound.push(SurfaceMessage::GestureBegin(ParamId::Width));
        outbound.push(changed(ParamId::Width, 0.4));
        outbound.push(changed(ParamId::Width, 0.5));
        outbound.push(SurfaceMessage::GestureEnd(ParamId::Width));

        assert_eq!(
            outbound.take(ParamId::Width),
            GESTURE_BEGIN | VALUE_CHANGED | GESTURE_END
        );
        assert_eq!(outbound.take(ParamId::Dry), 0);
    }

    #[test]
    fn params_are_independent() {
        let outbound = HostOutbound::new();
        outbound.push(SurfaceMessage::GestureBegin(ParamId::Wet));
        outbound.push(SurfaceMessage::GestureBegin(ParamId::Damping));

        assert_eq!(outbound.take(ParamId::Damping), GESTURE_BEGIN);
        assert!(outbound.is_pending());
        assert_eq!(outbound.take(ParamId::Wet), GESTURE_BEGIN);
        assert!(!outbound.is_pending());
    }

    #[test]
    fn freeze_is_not_reported() {
        let outbound = HostOutbound::new();
        outbound.push(SurfaceMessage::Freeze(true));
        assert!(!outbound.is_pending());
    }

    #[test]
    fn emit_writes_begin_value_end_with_store_value() {
        let store = ParamStore::default();
        let outbound = HostOutbound::new();

        outbound.push(SurfaceMessage::GestureBegin(ParamId::Damping));
        outbound.push(changed(ParamId::Damping, 0.2));
        outbound.push(SurfaceMessage::GestureEnd(ParamId::Damping));
        // A later write lands before the pass; the host hears the latest.
        store.set(ParamId::Damping, 0.7);

        let mut buffer = EventBuffer::new();
        outbound.emit(&store, &mut OutputEvents::from_buffer(&mut buffer));

        let events: Vec<_> = buffer.iter().filter_map(|e| e.as_core_event()).collect();
        assert_eq!(events.len(), 3);
        let damping = ClapId::new(ParamId::Damping.raw());
        assert!(matches!(
            events[0],
            CoreEventSpace::ParamGestureBegin(e) if e.param_id() == Some(damping)
        ));
        assert!(matches!(
            events[1],
            CoreEventSpace::ParamValue(e)
                if e.param_id() == Some(damping) && e.value() == f64::from(0.7f32)
        ));
        assert!(matches!(
            events[2],
            CoreEventSpace::ParamGestureEnd(e) if e.param_id() == Some(damping)
        ));
        assert!(!outbound.is_pending());
    }

    #[test]
    fn emit_with_nothing_pending_writes_nothing() {
        let store = ParamStore::default();
        let mut buffer = EventBuffer::new();
        HostOutbound::new().emit(&store, &mut OutputEvents::from_buffer(&mut buffer));
        assert_eq!(buffer.iter().count(), 0);
    }

    #[test]
    fn refused_push_is_retried_next_pass() {
        let store = ParamStore::default();
        let outbound = HostOutbound::new();
        outbound.push(SurfaceMessage::GestureBegin(ParamId::Wet));
        outbound.push(changed(ParamId::Wet, 0.5));
        outbound.push(SurfaceMessage::GestureEnd(ParamId::Wet));
        outbound.push(changed(ParamId::Width, 0.1));

        // Queue full after the gesture begin.
        let mut sent = Vec::new();
        outbound.emit_with(&store, |m| {
            if sent.is_empty() {
                sent.push(m);
                true
            } else {
                false
            }
        });
        assert_eq!(sent, vec![SurfaceMessage::GestureBegin(ParamId::Wet)]);
        assert!(outbound.is_pending());

        // Room again: the rest goes out in order.
        let mut sent = Vec::new();
        outbound.emit_with(&store, |m| {
            sent.push(m);
            true
        });
        assert_eq!(
            sent,
            vec![
                changed(ParamId::Wet, store.get(ParamId::Wet)),
                SurfaceMessage::GestureEnd(ParamId::Wet),
                changed(ParamId::Width, store.get(ParamId::Width)),
            ]
        );
        assert!(!outbound.is_pending());
    }
}
