//! LV2 plugin shell for the reverie reverb.
//!
//! Bus-style ABI: the host connects nine ports by index and calls `run` with
//! a frame count. Control ports carry plain values; every `run` turns the
//! controls that moved since the previous call into parameter events for the
//! core event pass, so a block always renders with the values it was handed.
//!
//! | Port | Symbol | Kind |
//! |------|--------|------|
//! | 0, 1 | `in_l`, `in_r` | audio in |
//! | 2, 3 | `out_l`, `out_r` | audio out |
//! | 4 | `wet` | control |
//! | 5 | `dry` | control |
//! | 6 | `room_size` | control |
//! | 7 | `damping` | control |
//! | 8 | `width` | control |
//!
//! The bundle's Turtle files live in `bundle/`. The same binary also
//! exports an X11 UI ([`lv2ui::lv2ui_descriptor`]) that embeds the reverie
//! editor and speaks the port protocol in [`ui::PortUi`].

// The lv2 derive and descriptor macros, and the UI descriptor, are
// `extern "C"` entry points.
#![allow(unsafe_code)]

pub mod lv2ui;
pub mod ui;

use lv2::prelude::*;
use reverie_core::{
    Freeverb, Lifecycle, PARAM_COUNT, ParamEvent, ParamId, ParamStore, ReverbProcessor,
};

/// Plugin URI, matching `bundle/reverie.ttl`.
pub const PLUGIN_URI: &str = "https://github.com/ampactor-labs/reverie";

/// Port layout. Field order is the port index order.
#[derive(PortCollection)]
pub struct Ports {
    in_l: InputPort<Audio>,
    in_r: InputPort<Audio>,
    out_l: OutputPort<Audio>,
    out_r: OutputPort<Audio>,
    wet: InputPort<Control>,
    dry: InputPort<Control>,
    room_size: InputPort<Control>,
    damping: InputPort<Control>,
    width: InputPort<Control>,
}

impl Ports {
    /// Control values in [`ParamId`] order.
    fn controls(&self) -> [f32; PARAM_COUNT] {
        [
            *self.wet,
            *self.dry,
            *self.room_size,
            *self.damping,
            *self.width,
        ]
    }
}

/// Everything an instance owns, independent of the LV2 port plumbing.
pub struct Bridge {
    store: ParamStore,
    lifecycle: Lifecycle,
    processor: ReverbProcessor<Freeverb>,
    sample_rate: f64,
    /// Control values seen by the last `run`; NaN until the first one.
    last_controls: [f32; PARAM_COUNT],
}

impl Bridge {
    /// An initialized, inactive instance at `sample_rate`.
    pub fn new(sample_rate: f64) -> Self {
        let lifecycle = Lifecycle::new();
        // A fresh cell is always Uninitialized.
        let _ = lifecycle.init();

        Self {
            store: ParamStore::default(),
            lifecycle,
            processor: ReverbProcessor::new(Freeverb::new(sample_rate)),
            sample_rate,
            last_controls: [f32::NAN; PARAM_COUNT],
        }
    }

    /// The instance's parameter store.
    pub fn store(&self) -> &ParamStore {
        &self.store
    }

    /// The instance's lifecycle.
    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    /// The wrapped processor.
    pub fn processor(&self) -> &ReverbProcessor<Freeverb> {
        &self.processor
    }

    /// LV2 `activate`: reset the tail, seed the engine, start processing.
    ///
    /// LV2 has no separate start/stop-processing calls, so both transitions
    /// happen here.
    pub fn activate(&mut self) {
        if let Err(err) = self.lifecycle.activate() {
            tracing::error!(error = %err, "activate rejected");
            return;
        }
        self.processor.activate(&self.store, self.sample_rate);
        // Re-send every control on the first run after activation.
        self.last_controls = [f32::NAN; PARAM_COUNT];
        let _ = self.lifecycle.start_processing();
        tracing::info!(sample_rate = self.sample_rate, "reverb activated");
    }

    /// LV2 `deactivate`.
    pub fn deactivate(&mut self) {
        let _ = self.lifecycle.stop_processing();
        match self.lifecycle.deactivate() {
            Ok(()) => tracing::info!("reverb deactivated"),
            Err(err) => tracing::error!(error = %err, "deactivate rejected"),
        }
    }

    /// LV2 `run`: event pass for moved controls, then render.
    pub fn run(
        &mut self,
        controls: [f32; PARAM_COUNT],
        in_l: &[f32],
        in_r: &[f32],
        out_l: &mut [f32],
        out_r: &mut [f32],
    ) {
        let last = &mut self.last_controls;
        let moved = ParamId::ALL
            .into_iter()
            .zip(controls)
            .filter_map(|(id, value)| {
                let seen = &mut last[id.index()];
                if value.to_bits() == seen.to_bits() {
                    return None;
                }
                *seen = value;
                Some(ParamEvent::new(0, id.raw(), value))
            });
        self.processor.begin_block(&self.store, moved);
        self.processor.process_stereo(in_l, in_r, out_l, out_r);
    }
}

/// The LV2 plugin instance.
#[uri("https://github.com/ampactor-labs/reverie")]
pub struct Reverie {
    bridge: Bridge,
}

impl Plugin for Reverie {
    type Ports = Ports;
    type InitFeatures = ();
    type AudioFeatures = ();

    fn new(plugin_info: &PluginInfo, _features: &mut ()) -> Option<Self> {
        Some(Self {
            bridge: Bridge::new(plugin_info.sample_rate()),
        })
    }

    fn activate(&mut self, _features: &mut ()) {
        self.bridge.activate();
    }

    fn deactivate(&mut self, _features: &mut ()) {
        self.bridge.deactivate();
    }

    fn run(&mut self, ports: &mut Ports, _features: &mut (), _sample_count: u32) {
        let controls = ports.controls();
        self.bridge.run(
            controls,
            &ports.in_l,
            &ports.in_r,
            &mut ports.out_l,
            &mut ports.out_r,
        );
    }
}

impl Drop for Reverie {
    fn drop(&mut self) {
        if let Err(err) = self.bridge.lifecycle.check_destroy() {
            tracing::error!(error = %err, "plugin destroyed while active");
        }
    }
}

lv2_descriptors!(Reverie);
