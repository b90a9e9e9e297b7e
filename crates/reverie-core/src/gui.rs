//! GUI reflection bridge.
//!
//! A control surface (the editor window) and the control thread talk through
//! a pair of channels created by [`surface_link`]:
//!
//! ```text
//!            SurfaceMessage (user gestures)
//! SurfaceModel ─────────────────────────────► ControlLink ──► ParamStore
//!   (GUI thread) ◄─────────────────────────── (main thread)
//!            SurfaceUpdate (host values, visibility)
//! ```
//!
//! Every display update carries an [`Origin`]. Only [`Origin::User`] updates
//! produce outbound messages, so a value pushed from the host side can never
//! loop back out as a new gesture. The control side tracks what the surface
//! is known to display and only reflects fields that differ.
//!
//! A user change and a host value can cross in the two queues, so the control
//! side never assumes the surface shows what the user last sent: draining a
//! user change marks that field unknown and the next reflect resends the
//! store's value as [`Origin::Host`]. While a control is grabbed the surface
//! drops host values for it, so a drag is never yanked back mid-gesture.

use crossbeam_channel::{Receiver, Sender, TryRecvError, unbounded};
use reverie_dsp::ReverbParameters;

use crate::param::{PARAM_COUNT, ParamId};
use crate::store::ParamStore;

/// Who caused a display change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// The user moved a control; the host must hear about it.
    User,
    /// The value came from the store (automation, state load, show).
    Host,
}

/// One parameter value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamChange {
    /// Which parameter.
    pub id: ParamId,
    /// New value.
    pub value: f32,
}

/// Surface → control thread.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceMessage {
    /// The user grabbed a control.
    GestureBegin(ParamId),
    /// The user changed a value.
    Changed(ParamChange),
    /// The user released a control.
    GestureEnd(ParamId),
    /// The user switched the tail freeze (preset recall).
    Freeze(bool),
}

/// Control thread → surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceUpdate {
    /// Display this value without emitting a gesture.
    Value(ParamChange),
    /// Show or hide the surface contents.
    Visible(bool),
}

/// What a control surface must offer the bridge.
pub trait ControlSurface {
    /// Set a displayed value. [`Origin::User`] also notifies the control side.
    fn set_value(&mut self, id: ParamId, value: f32, origin: Origin);

    /// Currently displayed value.
    fn value(&self, id: ParamId) -> f32;

    /// Show or hide the surface.
    fn set_visible(&mut self, visible: bool);

    /// Whether the surface is shown.
    fn is_visible(&self) -> bool;

    /// Logical size in pixels.
    fn size(&self) -> (u32, u32);
}

/// GUI-thread half of the link: the displayed values.
#[derive(Debug)]
pub struct SurfaceModel {
    values: [f32; PARAM_COUNT],
    /// Controls held by an open gesture.
    grabbed: [bool; PARAM_COUNT],
    visible: bool,
    size: (u32, u32),
    outbound: Sender<SurfaceMessage>,
    inbound: Receiver<SurfaceUpdate>,
}

impl SurfaceModel {
    /// Apply every pending update from the control side with
    /// [`Origin::Host`]. Values for grabbed controls are dropped. Returns how
    /// many updates were applied.
    pub fn poll(&mut self) -> usize {
        let mut applied = 0;
        loop {
            match self.inbound.try_recv() {
                Ok(SurfaceUpdate::Value(change)) => {
                    if self.grabbed[change.id.index()] {
                        continue;
                    }
                    self.set_value(change.id, change.value, Origin::Host);
                }
                Ok(SurfaceUpdate::Visible(visible)) => self.set_visible(visible),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
            applied += 1;
        }
        applied
    }

    /// Tell the control side a drag started.
    pub fn begin_gesture(&mut self, id: ParamId) {
        self.grabbed[id.index()] = true;
        let _ = self.outbound.send(SurfaceMessage::GestureBegin(id));
    }

    /// Tell the control side a drag ended.
    pub fn end_gesture(&mut self, id: ParamId) {
        self.grabbed[id.index()] = false;
        let _ = self.outbound.send(SurfaceMessage::GestureEnd(id));
    }

    /// Whether `id` is held by an open gesture.
    pub fn is_grabbed(&self, id: ParamId) -> bool {
        self.grabbed[id.index()]
    }

    /// Apply a whole snapshot as user changes (preset recall), bracketed by
    /// gestures so hosts record one undo step per parameter. The freeze flag
    /// follows the controls.
    pub fn apply_user_snapshot(&mut self, params: &ReverbParameters) {
        for id in ParamId::ALL {
            self.begin_gesture(id);
            self.set_value(id, id.get(params), Origin::User);
            self.end_gesture(id);
        }
        let _ = self.outbound.send(SurfaceMessage::Freeze(params.freeze));
    }
}

impl ControlSurface for SurfaceModel {
    fn set_value(&mut self, id: ParamId, value: f32, origin: Origin) {
        let value = id.descriptor().clamp(value);
        self.values[id.index()] = value;
        if origin == Origin::User {
            let _ = self
                .outbound
                .send(SurfaceMessage::Changed(ParamChange { id, value }));
        }
    }

    fn value(&self, id: ParamId) -> f32 {
        self.values[id.index()]
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn size(&self) -> (u32, u32) {
        self.size
    }
}

/// Marks a displayed value the control side cannot vouch for. NaN never
/// compares equal, so the next reflect resends the field.
const UNKNOWN: f32 = f32::NAN;

/// Control-thread half of the link.
#[derive(Debug)]
pub struct ControlLink {
    inbound: Receiver<SurfaceMessage>,
    outbound: Sender<SurfaceUpdate>,
    shown: [f32; PARAM_COUNT],
}

impl ControlLink {
    /// Drain user messages from the surface.
    ///
    /// Value changes and freeze switches are written into `store`. A changed
    /// or released control is marked unknown so the next [`reflect`] resyncs
    /// it. Every message (including gestures) is also passed to `forward` so
    /// the shell can notify its host. Returns the number of messages drained.
    ///
    /// [`reflect`]: ControlLink::reflect
    pub fn drain(&mut self, store: &ParamStore, mut forward: impl FnMut(SurfaceMessage)) -> usize {
        let mut drained = 0;
        while let Ok(message) = self.inbound.try_recv() {
            match message {
                SurfaceMessage::Changed(change) => {
                    store.set(change.id, change.value);
                    self.shown[change.id.index()] = UNKNOWN;
                }
                SurfaceMessage::GestureEnd(id) => self.shown[id.index()] = UNKNOWN,
                SurfaceMessage::Freeze(freeze) => store.set_freeze(freeze),
                SurfaceMessage::GestureBegin(_) => {}
            }
            forward(message);
            drained += 1;
        }
        drained
    }

    /// Push store values to the surface.
    ///
    /// Sends only fields that differ from what the surface is known to show,
    /// or every field when `force` is set (first show, state load). Returns
    /// the number of values sent.
    pub fn reflect(&mut self, snapshot: &ReverbParameters, force: bool) -> usize {
        let mut sent = 0;
        for id in ParamId::ALL {
            let value = id.get(snapshot);
            let shown = &mut self.shown[id.index()];
            if force || value.to_bits() != shown.to_bits() {
                *shown = value;
                let _ = self
                    .outbound
                    .send(SurfaceUpdate::Value(ParamChange { id, value }));
                sent += 1;
            }
        }
        sent
    }

    /// Show or hide the surface.
    pub fn set_visible(&self, visible: bool) {
        let _ = self.outbound.send(SurfaceUpdate::Visible(visible));
    }
}

/// Create a connected surface/control pair.
///
/// The surface starts hidden, displaying `initial`.
pub fn surface_link(initial: &ReverbParameters, size: (u32, u32)) -> (ControlLink, SurfaceModel) {
    let (to_control, from_surface) = unbounded();
    let (to_surface, from_control) = unbounded();

    let values = ParamId::ALL.map(|id| id.get(initial));

    let link = ControlLink {
        inbound: from_surface,
        outbound: to_surface,
        shown: values,
    };
    let surface = SurfaceModel {
        values,
        grabbed: [false; PARAM_COUNT],
        visible: false,
        size,
        outbound: to_control,
        inbound: from_control,
    };
    (link, surface)
}
