//! Audio processor for the CLAP shell.
//!
//! Created in `activate()`, dropped in `deactivate()`. Each `process()` call
//! runs one event pass (host parameter events into the store, then at most
//! one engine update), reports pending editor changes to the host, and
//! renders the block. Nothing here allocates, logs or blocks beyond the
//! store's fixed-size critical section.

use clack_extensions::params::PluginAudioProcessorParams;
use clack_plugin::events::UnknownEvent;
use clack_plugin::events::spaces::CoreEventSpace;
use clack_plugin::prelude::*;
use reverie_core::{Freeverb, ParamEvent, ReverbEngine, ReverbProcessor};

use crate::main_thread::ReverbMainThread;
use crate::shared::ReverbShared;

/// Audio-thread processor owning the engine.
pub struct ReverbAudioProcessor<'a> {
    shared: &'a ReverbShared,
    processor: ReverbProcessor<Freeverb>,
}

impl<'a> PluginAudioProcessor<'a, ReverbShared, ReverbMainThread<'a>> for ReverbAudioProcessor<'a> {
    fn activate(
        _host: HostAudioProcessorHandle<'a>,
        _main_thread: &mut ReverbMainThread<'a>,
        shared: &'a ReverbShared,
        audio_config: PluginAudioConfiguration,
    ) -> Result<Self, PluginError> {
        shared.lifecycle.activate().map_err(|err| {
            tracing::error!(error = %err, "activate rejected");
            PluginError::Message("activate called in the wrong lifecycle state")
        })?;

        let sample_rate = audio_config.sample_rate;
        let mut processor = ReverbProcessor::new(Freeverb::new(sample_rate));
        processor.activate(&shared.store, sample_rate);

        tracing::info!(
            sample_rate,
            max_frames = audio_config.max_frames_count,
            "reverb activated"
        );
        Ok(Self { shared, processor })
    }

    fn process(
        &mut self,
        _process: Process,
        mut audio: Audio,
        events: Events,
    ) -> Result<ProcessStatus, PluginError> {
        self.event_pass(events.input, events.output);
        self.process_audio(&mut audio)?;

        if self.processor.engine().parameters().freeze {
            Ok(ProcessStatus::Continue)
        } else {
            Ok(ProcessStatus::ContinueIfNotQuiet)
        }
    }

    fn deactivate(self, _main_thread: &mut ReverbMainThread<'_>) {
        match self.shared.lifecycle.deactivate() {
            Ok(()) => tracing::info!("reverb deactivated"),
            Err(err) => tracing::error!(error = %err, "deactivate rejected"),
        }
    }

    fn reset(&mut self) {
        if self.shared.lifecycle.check_reset().is_ok() {
            self.processor.reset();
        }
    }

    fn start_processing(&mut self) -> Result<(), PluginError> {
        self.shared
            .lifecycle
            .start_processing()
            .map_err(|_| PluginError::Message("start_processing called while not idle"))
    }

    fn stop_processing(&mut self) {
        // Nothing to report from the audio thread; an out-of-order stop
        // leaves the state untouched.
        let _ = self.shared.lifecycle.stop_processing();
    }
}

impl ReverbAudioProcessor<'_> {
    /// Ingest host events, update the engine once, and report editor changes.
    fn event_pass(&mut self, input: &InputEvents, output: &mut OutputEvents) {
        self.processor
            .begin_block(&self.shared.store, input.into_iter().filter_map(decode_event));
        self.shared.outbound.emit(&self.shared.store, output);
    }

    /// Render the main stereo port. Anything that is not a stereo pair of
    /// f32 channels is passed through untouched.
    fn process_audio(&mut self, audio: &mut Audio) -> Result<(), PluginError> {
        for mut port_pair in audio {
            let channels = port_pair.channels()?;

            let Some(mut channels) = channels.into_f32() else {
                continue;
            };

            if channels.channel_pair_count() < 2 {
                if let Some(pair) = channels.channel_pair(0) {
                    pass_through(pair);
                }
                continue;
            }

            let left = channels.channel_pair(0);
            let right = channels.channel_pair(1);

            match (left, right) {
                (
                    Some(ChannelPair::InputOutput(left_in, left_out)),
                    Some(ChannelPair::InputOutput(right_in, right_out)),
                ) => {
                    self.processor
                        .process_stereo(left_in, right_in, left_out, right_out);
                }
                (Some(ChannelPair::InPlace(left)), Some(ChannelPair::InPlace(right))) => {
                    self.processor.process_stereo_inplace(left, right);
                }
                (left, right) => {
                    // Mixed layout: keep the signal flowing.
                    for pair in [left, right].into_iter().flatten() {
                        pass_through(pair);
                    }
                }
            }
        }

        Ok(())
    }
}

impl PluginAudioProcessorParams for ReverbAudioProcessor<'_> {
    fn flush(&mut self, input: &InputEvents, output: &mut OutputEvents) {
        self.event_pass(input, output);
    }
}

/// Copy input to output where the host gave separate buffers.
fn pass_through(pair: ChannelPair<f32>) {
    if let ChannelPair::InputOutput(input, output) = pair {
        let n = input.len().min(output.len());
        output[..n].copy_from_slice(&input[..n]);
    }
}

/// Turn a CLAP event into a core parameter event, if it is one.
///
/// The value is narrowed to `f32`; the id is passed through unchecked and
/// validated by the store.
pub(crate) fn decode_event(event: &UnknownEvent) -> Option<ParamEvent> {
    let CoreEventSpace::ParamValue(ev) = event.as_core_event()? else {
        return None;
    };
    let param_id = ev.param_id()?;
    Some(ParamEvent::new(
        event.header().time(),
        param_id.get(),
        ev.value() as f32,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clack_plugin::events::event_types::{ParamGestureBeginEvent, ParamValueEvent};
    use clack_plugin::events::io::EventBuffer;
    use clack_plugin::utils::Cookie;
    use reverie_core::{ParamId, ParamStore, ReverbParameters};

    fn value_event(time: u32, param_id: u32, value: f64) -> ParamValueEvent {
        ParamValueEvent::new(
            time,
            ClapId::new(param_id),
            Pckn::match_all(),
            value,
            Cookie::empty(),
        )
    }

    fn decode_all(input: &InputEvents) -> Vec<ParamEvent> {
        input.into_iter().filter_map(decode_event).collect()
    }

    #[test]
    fn decoder_keeps_only_param_values() {
        let mut buffer = EventBuffer::new();
        buffer.push(ParamGestureBeginEvent::new(0, ClapId::new(ParamId::Wet.raw())).as_ref());
        buffer.push(value_event(3, 99, 0.7).as_ref());
        buffer.push(value_event(5, ParamId::Wet.raw(), 0.2).as_ref());

        let decoded = decode_all(&InputEvents::from_buffer(&buffer));
        assert_eq!(
            decoded,
            vec![
                ParamEvent::new(3, 99, 0.7),
                ParamEvent::new(5, ParamId::Wet.raw(), 0.2),
            ]
        );
    }

    #[test]
    fn event_pass_ignores_unknown_ids_and_other_events() {
        let store = ParamStore::default();
        let mut processor = ReverbProcessor::new(Freeverb::new(48000.0));
        processor.activate(&store, 48000.0);

        let mut buffer = EventBuffer::new();
        buffer.push(ParamGestureBeginEvent::new(0, ClapId::new(ParamId::Dry.raw())).as_ref());
        buffer.push(value_event(0, 99, 0.9).as_ref());
        let decoded = decode_all(&InputEvents::from_buffer(&buffer));
        assert!(!processor.begin_block(&store, decoded));
        assert_eq!(store.snapshot(), ReverbParameters::default());

        buffer.push(value_event(8, ParamId::RoomSize.raw(), 0.25).as_ref());
        let decoded = decode_all(&InputEvents::from_buffer(&buffer));
        assert!(processor.begin_block(&store, decoded));
        assert_eq!(processor.engine().parameters().room_size, 0.25);
        assert_eq!(store.generation(), 1);
    }
}
