//! CLAP plugin shell for the reverie reverb.
//!
//! A thin adapter between the `clack-plugin` safe wrapper and
//! [`reverie_core`]. Everything that decides how a value moves between the
//! host, the editor, persisted state and the engine lives in the core; this
//! crate only maps CLAP callbacks onto it.
//!
//! # Architecture
//!
//! | reverie-core | CLAP |
//! |--------------|------|
//! | [`ParamId`](reverie_core::ParamId) (`4..9`) | `clap_id` |
//! | [`ParamDescriptor::format_value`](reverie_core::ParamDescriptor::format_value) | `value_to_text()` |
//! | [`ReverbProcessor::begin_block`](reverie_core::ReverbProcessor::begin_block) | `process()` / `flush()` event pass |
//! | [`state::save`](reverie_core::state::save) / [`state::load`](reverie_core::state::load) | state extension |
//! | [`ControlLink`](reverie_core::ControlLink) + [`ReverbEditor`](reverie_gui::ReverbEditor) | gui + timer extensions |
//! | [`Lifecycle`](reverie_core::Lifecycle) | activate / start_processing / reset / destroy |
//!
//! # Plugin binary
//!
//! The `clap_entry` symbol is exported from the `reverie` cdylib example:
//!
//! ```rust,ignore
//! clack_plugin::clack_export_entry!(
//!     clack_plugin::prelude::SinglePluginEntry<reverie_clap::ReverbPlugin>
//! );
//! ```

pub mod audio;
pub mod main_thread;
pub mod shared;

pub use audio::ReverbAudioProcessor;
pub use main_thread::ReverbMainThread;
pub use shared::{HostOutbound, ReverbShared};

use clack_extensions::audio_ports::PluginAudioPorts;
use clack_extensions::gui::PluginGui;
use clack_extensions::params::PluginParams;
use clack_extensions::state::PluginState;
use clack_extensions::timer::PluginTimer;
use clack_plugin::prelude::*;

/// Reverse-DNS plugin identifier.
pub const PLUGIN_ID: &str = "com.ampactor.reverie";

/// Name shown by hosts.
pub const PLUGIN_NAME: &str = "Reverie";

/// The reverie stereo reverb as a CLAP plugin.
pub struct ReverbPlugin;

impl Plugin for ReverbPlugin {
    type AudioProcessor<'a> = ReverbAudioProcessor<'a>;
    type Shared<'a> = ReverbShared;
    type MainThread<'a> = ReverbMainThread<'a>;

    fn declare_extensions(builder: &mut PluginExtensions<Self>, _shared: Option<&ReverbShared>) {
        builder.register::<PluginAudioPorts>();
        builder.register::<PluginGui>();
        builder.register::<PluginParams>();
        builder.register::<PluginState>();
        builder.register::<PluginTimer>();
    }
}

impl DefaultPluginFactory for ReverbPlugin {
    fn get_descriptor() -> PluginDescriptor {
        use clack_plugin::plugin::features::{AUDIO_EFFECT, REVERB, STEREO};

        PluginDescriptor::new(PLUGIN_ID, PLUGIN_NAME).with_features([AUDIO_EFFECT, REVERB, STEREO])
    }

    fn new_shared(_host: HostSharedHandle<'_>) -> Result<ReverbShared, PluginError> {
        let shared = ReverbShared::new();
        shared
            .lifecycle
            .init()
            .map_err(|_| PluginError::Message("plugin initialized twice"))?;
        Ok(shared)
    }

    fn new_main_thread<'a>(
        host: HostMainThreadHandle<'a>,
        shared: &'a ReverbShared,
    ) -> Result<ReverbMainThread<'a>, PluginError> {
        Ok(ReverbMainThread::new(host, shared))
    }
}
