//! Editor window shared by the reverie CLAP and LV2 plugins.
//!
//! The editor is a child window inside a host-provided parent, drawn with
//! egui over OpenGL. It knows nothing about either plugin ABI: it owns the
//! [`SurfaceModel`](reverie_core::SurfaceModel) half of a surface link and
//! talks to the plugin only through that link. Each shell keeps the
//! [`ControlLink`](reverie_core::ControlLink) half and drives it from its own
//! idle callback (a CLAP host timer, the LV2 UI idle interface).

mod egui_bridge;
pub mod editor;
mod widgets;

pub use editor::ReverbEditor;

/// Window title and panel heading.
pub const EDITOR_TITLE: &str = "Reverie";
