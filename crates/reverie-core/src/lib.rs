//! Real-time-safe parameter bridge for the reverie reverb plugins.
//!
//! Both plugin front ends (the CLAP shell in `reverie-clap` and the LV2 shell
//! in `reverie-lv2`) are thin adapters over this crate. Everything that
//! decides how a control value travels between the host, a GUI, persisted
//! state and the audio callback lives here, free of any plugin ABI.
//!
//! # Architecture
//!
//! ```text
//!  host events ──┐                        ┌──► ReverbProcessor ──► engine
//!  GUI gestures ─┼─► ParamStore (guarded) ─┤       (audio thread)
//!  state load ───┘                        └──► ControlLink ──► SurfaceModel
//!                                               (main thread)     (GUI thread)
//! ```
//!
//! | Module | Role |
//! |--------|------|
//! | [`param`] | Parameter ids, port layout, descriptors, text conversion |
//! | [`store`] | [`ParamStore`]: one guarded snapshot plus a write generation |
//! | [`events`] | Decoding host parameter events into store writes |
//! | [`processor`] | [`ReverbProcessor`]: once-per-block engine updates |
//! | [`lifecycle`] | [`Lifecycle`]: the host-driven activation state machine |
//! | [`state`] | Fixed-size binary save/load |
//! | [`gui`] | Store ↔ control surface reflection with echo suppression |
//! | [`preset`] | Factory presets |
//! | [`config`] | Plugin configuration (GUI size, idle tick) |
//!
//! # Real-time rules
//!
//! The audio thread only ever calls [`ParamStore::write`],
//! [`ParamStore::snapshot`], [`ParamStore::generation`] and the
//! [`ReverbProcessor`] methods. None of them allocate, log, or hold the store
//! lock for longer than a fixed-size copy.

pub mod config;
pub mod error;
pub mod events;
pub mod gui;
pub mod lifecycle;
pub mod param;
pub mod preset;
pub mod processor;
pub mod state;
pub mod store;

pub use config::PluginConfig;
pub use error::{ConfigError, LifecycleError, StateError};
pub use events::{ParamEvent, ingest};
pub use gui::{
    ControlLink, ControlSurface, Origin, ParamChange, SurfaceMessage, SurfaceModel,
    SurfaceUpdate, surface_link,
};
pub use lifecycle::{Lifecycle, LifecycleState};
pub use param::{AudioPort, PARAM_COUNT, ParamDescriptor, ParamId};
pub use preset::{Preset, factory_presets};
pub use processor::ReverbProcessor;
pub use store::ParamStore;

pub use reverie_dsp::{Freeverb, ReverbEngine, ReverbParameters};
