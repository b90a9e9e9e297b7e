//! Editor window: host parent handle to an egui panel.
//!
//! The window runs on baseview's thread and owns the [`SurfaceModel`] half of
//! the surface link. Each frame it applies whatever the control side reflected
//! (automation, state loads, show/hide) and draws the knobs; user drags go
//! back through the link as gesture messages. No plugin state is shared with
//! the window beyond the link's two queues.

use std::time::Duration;

use baseview::WindowHandle;
use raw_window_handle::{HasRawWindowHandle, RawWindowHandle};
use reverie_core::gui::ControlSurface;
use reverie_core::{Preset, SurfaceModel};

use crate::egui_bridge;
use crate::widgets;

/// Repaint period while the window is open. Host-side value changes only
/// reach the knobs on a repaint, so this bounds their display latency.
const REPAINT_INTERVAL: Duration = Duration::from_millis(33);

/// Wraps the host's [`RawWindowHandle`] for baseview's `open_parented`, which
/// requires [`HasRawWindowHandle`] (raw-window-handle 0.5).
struct ParentWindow(RawWindowHandle);

#[allow(unsafe_code)]
// SAFETY: HasRawWindowHandle is unsafe in rwh 0.5. The impl returns a Copy
// value received from the host, and both plugin GUI protocols keep the parent
// alive until the editor is dropped.
unsafe impl HasRawWindowHandle for ParentWindow {
    fn raw_window_handle(&self) -> RawWindowHandle {
        self.0
    }
}

/// Per-window editor state, moved into the render loop.
pub(crate) struct EditorState {
    pub(crate) surface: SurfaceModel,
    pub(crate) presets: Vec<Preset>,
    /// Index of the last recalled preset, for the selector label.
    pub(crate) selected: Option<usize>,
}

/// Holds the baseview window for one plugin instance.
///
/// Dropping this value closes the window.
pub struct ReverbEditor {
    window: WindowHandle,
}

impl ReverbEditor {
    /// Open the editor as a child of the host's window.
    pub fn open(
        parent_rwh: RawWindowHandle,
        surface: SurfaceModel,
        presets: Vec<Preset>,
        scale: f64,
    ) -> Self {
        let (width, height) = surface.size();
        let state = EditorState {
            surface,
            presets,
            selected: None,
        };

        let window = egui_bridge::open_parented(
            &ParentWindow(parent_rwh),
            crate::EDITOR_TITLE.to_owned(),
            width,
            height,
            scale,
            state,
            |ctx, _state| widgets::apply_theme(ctx),
            |ctx, state| {
                state.surface.poll();
                ctx.request_repaint_after(REPAINT_INTERVAL);
                if !state.surface.is_visible() {
                    return;
                }
                egui::CentralPanel::default().show(ctx, |ui| widgets::reverb_panel(ui, state));
            },
        );

        tracing::debug!(width, height, scale, "editor window opened");
        Self { window }
    }

    /// The editor's own child window, for hosts that need to embed it.
    pub fn raw_window_handle(&self) -> RawWindowHandle {
        self.window.raw_window_handle()
    }
}
