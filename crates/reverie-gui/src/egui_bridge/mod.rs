//! Minimal egui-in-baseview bridge for the editor window.
//!
//! Only the pieces a parented plugin editor needs: an OpenGL child window,
//! mouse and modifier input, and the egui frame loop.
//!
//! ```text
//! host parent window (RawWindowHandle)
//!     │
//!     ▼
//! baseview::Window (child window + GL context)
//!     │
//!     ▼
//! EguiBridgeHandler
//!     ├── input: baseview events → egui RawInput
//!     ├── frame: run pass → tessellate
//!     └── paint: egui_glow::Painter → OpenGL
//! ```

mod handler;
mod input;

pub use handler::open_parented;
