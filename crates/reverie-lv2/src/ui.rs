//! Port protocol for an LV2 UI.
//!
//! An LV2 UI never touches the plugin instance. The host forwards control
//! port values to it (`port_event`) and carries its edits back as port
//! writes (`write_function`). [`PortUi`] implements that protocol on top of
//! the core surface link: incoming port events update a mirror store and are
//! reflected to the [`SurfaceModel`] as host-origin values, so they never
//! turn into writes; user edits drained on `idle` become exactly one write
//! each. Freeze has no port and stays in the editor.
//!
//! The exported descriptor that hosts load lives in [`crate::lv2ui`].

use reverie_core::{
    ControlLink, ParamId, ParamStore, SurfaceMessage, SurfaceModel, surface_link,
};

/// `port_event` format for plain float control values.
pub const FLOAT_PROTOCOL: u32 = 0;

/// Host callback that writes one control port. Called on the UI thread only.
pub type PortWrite = Box<dyn FnMut(u32, f32)>;

/// UI-side state for one plugin UI instance.
pub struct PortUi {
    mirror: ParamStore,
    link: ControlLink,
    surface: Option<SurfaceModel>,
    write: PortWrite,
}

impl PortUi {
    /// Create a UI with default values, sized `size`.
    pub fn new(write: PortWrite, size: (u32, u32)) -> Self {
        let mirror = ParamStore::default();
        let (link, surface) = surface_link(&mirror.snapshot(), size);
        Self {
            mirror,
            link,
            surface: Some(surface),
            write,
        }
    }

    /// Hand the surface to whatever draws it. Returns `None` after the first
    /// call.
    pub fn take_surface(&mut self) -> Option<SurfaceModel> {
        self.surface.take()
    }

    /// The host reports a port value.
    ///
    /// Only float-protocol events for control ports are accepted; anything
    /// else is ignored. Returns whether the value was applied.
    pub fn port_event(&mut self, port: u32, buffer_size: u32, format: u32, buffer: &[u8]) -> bool {
        if format != FLOAT_PROTOCOL || buffer_size != 4 {
            return false;
        }
        let (Some(id), Some(bytes)) = (ParamId::from_raw(port), buffer.first_chunk::<4>()) else {
            return false;
        };
        if !self.mirror.set(id, f32::from_ne_bytes(*bytes)) {
            return false;
        }
        self.link.reflect(&self.mirror.snapshot(), false);
        true
    }

    /// Periodic UI tick: forward user edits to the host. Returns the number
    /// of port writes issued.
    pub fn idle(&mut self) -> usize {
        let write = &mut self.write;
        let mut writes = 0;
        self.link.drain(&self.mirror, |message| {
            if let SurfaceMessage::Changed(change) = message {
                write(change.id.raw(), change.value);
                writes += 1;
            }
        });
        writes
    }

    /// Show the UI, refreshing every control.
    pub fn show(&mut self) {
        self.link.reflect(&self.mirror.snapshot(), true);
        self.link.set_visible(true);
    }

    /// Hide the UI.
    pub fn hide(&self) {
        self.link.set_visible(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reverie_core::Origin;
    use reverie_core::gui::ControlSurface;
    use std::sync::{Arc, Mutex};

    type Writes = Arc<Mutex<Vec<(u32, f32)>>>;

    fn ui() -> (PortUi, SurfaceModel, Writes) {
        let writes: Writes = Arc::default();
        let sink = Arc::clone(&writes);
        let mut ui = PortUi::new(
            Box::new(move |port, value| sink.lock().unwrap().push((port, value))),
            (512, 150),
        );
        let surface = ui.take_surface().unwrap();
        (ui, surface, writes)
    }

    fn event(ui: &mut PortUi, port: u32, value: f32) -> bool {
        ui.port_event(port, 4, FLOAT_PROTOCOL, &value.to_ne_bytes())
    }

    #[test]
    fn port_event_updates_display_without_writing() {
        let (mut ui, mut surface, writes) = ui();

        assert!(event(&mut ui, ParamId::Damping.raw(), 0.2));
        surface.poll();
        assert_eq!(surface.value(ParamId::Damping), 0.2);

        assert_eq!(ui.idle(), 0);
        assert!(writes.lock().unwrap().is_empty());
    }

    #[test]
    fn user_edit_writes_once() {
        let (mut ui, mut surface, writes) = ui();

        surface.begin_gesture(ParamId::Width);
        surface.set_value(ParamId::Width, 0.6, Origin::User);
        surface.end_gesture(ParamId::Width);

        assert_eq!(ui.idle(), 1);
        assert_eq!(*writes.lock().unwrap(), vec![(ParamId::Width.raw(), 0.6)]);
        assert_eq!(ui.idle(), 0);
    }

    #[test]
    fn host_echo_of_user_edit_is_quiet() {
        let (mut ui, mut surface, writes) = ui();

        surface.set_value(ParamId::Wet, 0.9, Origin::User);
        ui.idle();
        // The host echoes the write back as a port event.
        event(&mut ui, ParamId::Wet.raw(), 0.9);
        surface.poll();
        assert_eq!(surface.value(ParamId::Wet), 0.9);
        assert_eq!(ui.idle(), 0);
        assert_eq!(writes.lock().unwrap().len(), 1);
    }

    #[test]
    fn preset_recall_writes_controls_only() {
        let (mut ui, mut surface, writes) = ui();
        let frozen = reverie_core::ReverbParameters {
            room_size: 0.9,
            freeze: true,
            ..Default::default()
        };

        surface.apply_user_snapshot(&frozen);
        assert_eq!(ui.idle(), reverie_core::PARAM_COUNT);
        let writes = writes.lock().unwrap();
        assert!(writes.contains(&(ParamId::RoomSize.raw(), 0.9)));
        assert!(writes.iter().all(|(port, _)| ParamId::from_raw(*port).is_some()));
    }

    #[test]
    fn malformed_port_events_ignored() {
        let (mut ui, _surface, _writes) = ui();
        let bytes = 0.5f32.to_ne_bytes();

        assert!(!ui.port_event(ParamId::Wet.raw(), 4, 7, &bytes));
        assert!(!ui.port_event(ParamId::Wet.raw(), 8, FLOAT_PROTOCOL, &bytes));
        assert!(!ui.port_event(ParamId::Wet.raw(), 4, FLOAT_PROTOCOL, &bytes[..2]));
        assert!(!ui.port_event(0, 4, FLOAT_PROTOCOL, &bytes));
        assert!(!ui.port_event(99, 4, FLOAT_PROTOCOL, &bytes));
        assert!(!event(&mut ui, ParamId::Wet.raw(), f32::NAN));
    }

    #[test]
    fn show_refreshes_every_control() {
        let (mut ui, mut surface, _writes) = ui();
        ui.show();
        assert_eq!(surface.poll(), reverie_core::PARAM_COUNT + 1);
        assert!(surface.is_visible());

        ui.hide();
        surface.poll();
        assert!(!surface.is_visible());
    }

    #[test]
    fn surface_handed_out_once() {
        let (mut ui, _surface, _writes) = ui();
        assert!(ui.take_surface().is_none());
    }
}
