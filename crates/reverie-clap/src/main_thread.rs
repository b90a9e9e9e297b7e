//! Main-thread plugin implementation.
//!
//! Parameter metadata, state save/restore, audio port layout, and the editor
//! lifecycle. The editor is driven by a host timer: every tick drains the
//! user's gestures into the store (flagging them for the host) and reflects
//! store changes back to the knobs. All methods run on the host's main
//! thread, never on the audio thread.

use clack_extensions::audio_ports::{
    AudioPortFlags, AudioPortInfo, AudioPortInfoWriter, AudioPortType, PluginAudioPortsImpl,
};
use clack_extensions::gui::{GuiApiType, GuiConfiguration, GuiSize, PluginGuiImpl, Window};
use clack_extensions::params::{
    HostParams, ParamDisplayWriter, ParamInfo, ParamInfoFlags, ParamInfoWriter,
    PluginMainThreadParams,
};
use clack_extensions::state::PluginStateImpl;
use clack_extensions::timer::{HostTimer, PluginTimerImpl, TimerId};
use clack_plugin::prelude::*;
use clack_plugin::stream::{InputStream, OutputStream};
use clack_plugin::utils::Cookie;
use reverie_core::{
    ControlLink, PARAM_COUNT, ParamId, PluginConfig, Preset, SurfaceModel, factory_presets,
    ingest, state, surface_link,
};
use reverie_gui::ReverbEditor;

use crate::audio::decode_event;
use crate::shared::ReverbShared;

/// Editor resources that exist between `gui.create` and `gui.destroy`.
struct GuiSession {
    link: ControlLink,
    /// Handed to the editor window on `set_parent`.
    surface: Option<SurfaceModel>,
    editor: Option<ReverbEditor>,
    timer_id: TimerId,
}

/// Main-thread state for the reverie CLAP plugin.
pub struct ReverbMainThread<'a> {
    shared: &'a ReverbShared,
    host: HostMainThreadHandle<'a>,
    host_timer: Option<HostTimer>,
    host_params: Option<HostParams>,
    config: PluginConfig,
    presets: Vec<Preset>,
    gui: Option<GuiSession>,
    /// DPI scale factor from the host (default 1.0).
    scale: f64,
}

impl<'a> ReverbMainThread<'a> {
    /// Create the main-thread handler and negotiate host capabilities.
    pub fn new(host: HostMainThreadHandle<'a>, shared: &'a ReverbShared) -> Self {
        let config = PluginConfig::from_env();
        let presets = factory_presets().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "factory presets unavailable");
            Vec::new()
        });

        let host_timer = host.shared().get_extension::<HostTimer>();
        let host_params = host.shared().get_extension::<HostParams>();
        tracing::debug!(
            timer = host_timer.is_some(),
            params = host_params.is_some(),
            "host capabilities"
        );

        Self {
            shared,
            host,
            host_timer,
            host_params,
            config,
            presets,
            gui: None,
            scale: 1.0,
        }
    }

    /// Ask the host to run an event pass so pending editor changes reach the
    /// engine and the host's automation display.
    fn request_event_pass(&self) {
        match &self.host_params {
            Some(params) => params.request_flush(&self.host.shared()),
            None => self.host.shared().request_process(),
        }
    }

    fn destroy_gui(&mut self) {
        let Some(session) = self.gui.take() else {
            return;
        };
        // Closing the window first stops the editor from sending into a
        // link that is about to go away.
        drop(session.editor);

        if let Some(timer) = &self.host_timer
            && let Err(err) = timer.unregister_timer(&mut self.host, session.timer_id)
        {
            tracing::warn!(error = ?err, "failed to unregister editor timer");
        }
        tracing::debug!("editor destroyed");
    }
}

impl<'a> PluginMainThread<'a, ReverbShared> for ReverbMainThread<'a> {}

impl Drop for ReverbMainThread<'_> {
    fn drop(&mut self) {
        self.destroy_gui();
        if let Err(err) = self.shared.lifecycle.check_destroy() {
            tracing::error!(error = %err, "plugin destroyed while active");
        }
    }
}

// ── Parameter Extension ─────────────────────────────────────────────────────

impl PluginMainThreadParams for ReverbMainThread<'_> {
    fn count(&mut self) -> u32 {
        PARAM_COUNT as u32
    }

    fn get_info(&mut self, param_index: u32, info: &mut ParamInfoWriter) {
        let Some(id) = ParamId::from_index(param_index as usize) else {
            return;
        };
        let desc = id.descriptor();

        let mut flags = ParamInfoFlags::empty();
        if desc.automatable {
            flags |= ParamInfoFlags::IS_AUTOMATABLE;
        }

        info.set(&ParamInfo {
            id: ClapId::new(id.raw()),
            name: desc.name.as_bytes(),
            module: desc.group.as_bytes(),
            min_value: 0.0,
            max_value: 1.0,
            default_value: f64::from(desc.default),
            flags,
            cookie: Cookie::default(),
        });
    }

    fn get_value(&mut self, param_id: ClapId) -> Option<f64> {
        let id = ParamId::from_raw(param_id.get())?;
        Some(f64::from(self.shared.store.get(id)))
    }

    fn value_to_text(
        &mut self,
        param_id: ClapId,
        value: f64,
        writer: &mut ParamDisplayWriter,
    ) -> core::fmt::Result {
        use core::fmt::Write;

        match ParamId::from_raw(param_id.get()) {
            Some(id) => write!(writer, "{}", id.descriptor().format_value(value as f32)),
            None => write!(writer, "{value:.2}"),
        }
    }

    fn text_to_value(&mut self, param_id: ClapId, text: &core::ffi::CStr) -> Option<f64> {
        let id = ParamId::from_raw(param_id.get())?;
        let s = text.to_str().ok()?;
        id.descriptor().parse_value(s).map(f64::from)
    }

    fn flush(&mut self, input: &InputEvents, output: &mut OutputEvents) {
        // Only called while inactive; the next activation seeds the engine
        // from the store.
        ingest(&self.shared.store, input.into_iter().filter_map(decode_event));
        self.shared.outbound.emit(&self.shared.store, output);
    }
}

// ── State Extension ─────────────────────────────────────────────────────────

impl PluginStateImpl for ReverbMainThread<'_> {
    fn save(&mut self, output: &mut OutputStream) -> Result<(), PluginError> {
        state::save(&self.shared.store, output).map_err(|err| {
            tracing::error!(error = %err, "state save failed");
            PluginError::Message("Failed to write state")
        })?;
        tracing::debug!("state saved");
        Ok(())
    }

    fn load(&mut self, input: &mut InputStream) -> Result<(), PluginError> {
        let loaded = state::load(&self.shared.store, input).map_err(|err| {
            tracing::error!(error = %err, "state load failed");
            PluginError::Message("Failed to read state")
        })?;

        if let Some(session) = &mut self.gui {
            session.link.reflect(&loaded, true);
        }
        if self.shared.lifecycle.state().is_active() {
            self.host.shared().request_process();
        }

        tracing::info!(?loaded, "state loaded");
        Ok(())
    }
}

// ── Audio Ports Extension ───────────────────────────────────────────────────

impl PluginAudioPortsImpl for ReverbMainThread<'_> {
    fn count(&mut self, _is_input: bool) -> u32 {
        1
    }

    fn get(&mut self, index: u32, _is_input: bool, writer: &mut AudioPortInfoWriter) {
        if index == 0 {
            writer.set(&AudioPortInfo {
                id: ClapId::new(0),
                name: b"Main",
                channel_count: 2,
                flags: AudioPortFlags::IS_MAIN,
                port_type: Some(AudioPortType::STEREO),
                in_place_pair: None,
            });
        }
    }
}

// ── GUI Extension ──────────────────────────────────────────────────────────

impl PluginGuiImpl for ReverbMainThread<'_> {
    fn is_api_supported(&mut self, config: GuiConfiguration) -> bool {
        let platform_api = GuiApiType::default_for_current_platform();
        !config.is_floating && platform_api == Some(config.api_type)
    }

    fn get_preferred_api(&mut self) -> Option<GuiConfiguration<'_>> {
        let api = GuiApiType::default_for_current_platform();
        Some(GuiConfiguration {
            api_type: api?,
            is_floating: false,
        })
    }

    fn create(&mut self, _config: GuiConfiguration) -> Result<(), PluginError> {
        if self.gui.is_some() {
            return Err(PluginError::Message("Editor already created"));
        }

        // Without a timer nothing would move values between the editor and
        // the store, so the editor is not offered at all.
        let Some(timer) = &self.host_timer else {
            tracing::warn!("host has no timer support; editor unavailable");
            return Err(PluginError::Message("Host timer support required"));
        };
        let timer_id = timer
            .register_timer(&mut self.host, self.config.idle_interval_ms)
            .map_err(|err| {
                tracing::warn!(error = ?err, "failed to register editor timer");
                PluginError::Message("Failed to register timer")
            })?;

        let size = (self.config.gui.width, self.config.gui.height);
        let (link, surface) = surface_link(&self.shared.store.snapshot(), size);
        self.gui = Some(GuiSession {
            link,
            surface: Some(surface),
            editor: None,
            timer_id,
        });

        tracing::debug!(width = size.0, height = size.1, "editor created");
        Ok(())
    }

    fn destroy(&mut self) {
        self.destroy_gui();
    }

    fn set_scale(&mut self, scale: f64) -> Result<(), PluginError> {
        self.scale = scale;
        Ok(())
    }

    fn get_size(&mut self) -> Option<GuiSize> {
        Some(GuiSize {
            width: self.config.gui.width,
            height: self.config.gui.height,
        })
    }

    fn can_resize(&mut self) -> bool {
        false
    }

    fn set_parent(&mut self, window: Window) -> Result<(), PluginError> {
        use raw_window_handle::HasRawWindowHandle;

        let session = self
            .gui
            .as_mut()
            .ok_or(PluginError::Message("set_parent before create"))?;
        let surface = session
            .surface
            .take()
            .ok_or(PluginError::Message("Editor already has a parent"))?;

        session.editor = Some(ReverbEditor::open(
            window.raw_window_handle(),
            surface,
            self.presets.clone(),
            self.scale,
        ));
        Ok(())
    }

    fn show(&mut self) -> Result<(), PluginError> {
        let session = self
            .gui
            .as_mut()
            .ok_or(PluginError::Message("show before create"))?;
        session.link.reflect(&self.shared.store.snapshot(), true);
        session.link.set_visible(true);
        Ok(())
    }

    fn hide(&mut self) -> Result<(), PluginError> {
        if let Some(session) = &self.gui {
            session.link.set_visible(false);
        }
        Ok(())
    }

    fn set_transient(&mut self, _window: Window) -> Result<(), PluginError> {
        Ok(())
    }
}

// ── Timer Extension ────────────────────────────────────────────────────────

impl PluginTimerImpl for ReverbMainThread<'_> {
    fn on_timer(&mut self, timer_id: TimerId) {
        let shared = self.shared;
        let Some(session) = self.gui.as_mut().filter(|s| s.timer_id == timer_id) else {
            return;
        };

        let drained = session
            .link
            .drain(&shared.store, |message| shared.outbound.push(message));
        session.link.reflect(&shared.store.snapshot(), false);

        if drained > 0 {
            self.request_event_pass();
        }
    }
}
