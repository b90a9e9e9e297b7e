//! End-to-end scenarios for the parameter bridge with the real engine.

use reverie_core::gui::ControlSurface;
use reverie_core::state::{self, RECORD_SIZE};
use reverie_core::{
    Freeverb, Lifecycle, LifecycleState, Origin, ParamEvent, ParamId, ParamStore, ReverbEngine,
    ReverbParameters, ReverbProcessor, StateError, SurfaceMessage, surface_link,
};

fn render(processor: &mut ReverbProcessor<Freeverb>, frames: usize, impulse: bool) -> Vec<f32> {
    let mut in_l = vec![0.0; frames];
    let mut in_r = vec![0.0; frames];
    if impulse {
        in_l[0] = 1.0;
        in_r[0] = 1.0;
    }
    let mut out_l = vec![0.0; frames];
    let mut out_r = vec![0.0; frames];
    processor.process_stereo(&in_l, &in_r, &mut out_l, &mut out_r);
    out_l.extend(out_r);
    out_l
}

#[test]
fn block_with_repeated_events_lands_last_values() {
    let store = ParamStore::default();
    let mut processor = ReverbProcessor::new(Freeverb::new(48000.0));
    processor.activate(&store, 48000.0);

    let applied = processor.begin_block(
        &store,
        [
            ParamEvent::new(0, ParamId::Wet.raw(), 0.2),
            ParamEvent::new(64, ParamId::Wet.raw(), 0.5),
            ParamEvent::new(128, ParamId::Wet.raw(), 0.9),
            ParamEvent::new(200, ParamId::RoomSize.raw(), 0.3),
        ],
    );

    assert!(applied);
    let engine = processor.engine().parameters();
    assert_eq!(engine.wet_level, 0.9);
    assert_eq!(engine.room_size, 0.3);
}

/// Ring the reverb, then cycle stop/deactivate/activate/start at `rate`.
fn reactivated_output(
    lifecycle: &Lifecycle,
    processor: &mut ReverbProcessor<Freeverb>,
    store: &ParamStore,
    rate: f64,
) -> Vec<f32> {
    render(processor, 4096, true);
    lifecycle.stop_processing().unwrap();
    lifecycle.deactivate().unwrap();

    lifecycle.activate().unwrap();
    processor.activate(store, rate);
    assert_eq!(processor.engine().parameters(), store.snapshot());

    lifecycle.start_processing().unwrap();
    render(processor, 4096, false)
}

#[test]
fn reactivation_at_same_rate_clears_tail() {
    let store = ParamStore::default();
    store.set(ParamId::RoomSize, 0.95);
    store.set(ParamId::Damping, 0.1);
    store.set(ParamId::Wet, 0.7);

    let lifecycle = Lifecycle::new();
    lifecycle.init().unwrap();
    let mut processor = ReverbProcessor::new(Freeverb::new(48000.0));
    lifecycle.activate().unwrap();
    processor.activate(&store, 48000.0);
    lifecycle.start_processing().unwrap();

    // Without the reset the tank would still be ringing here.
    let out = reactivated_output(&lifecycle, &mut processor, &store, 48000.0);
    assert!(out.iter().all(|&s| s == 0.0), "tail survived activation");
}

#[test]
fn activation_resets_tail_and_seeds_parameters() {
    let store = ParamStore::default();
    store.set(ParamId::RoomSize, 0.95);
    store.set(ParamId::Wet, 0.7);

    let lifecycle = Lifecycle::new();
    lifecycle.init().unwrap();

    let mut processor = ReverbProcessor::new(Freeverb::new(44100.0));
    lifecycle.activate().unwrap();
    processor.activate(&store, 44100.0);
    lifecycle.start_processing().unwrap();

    let out = reactivated_output(&lifecycle, &mut processor, &store, 48000.0);
    assert!(out.iter().all(|&s| s == 0.0), "tail survived activation");
    assert_eq!(lifecycle.state(), LifecycleState::Processing);
}

#[test]
fn reset_kills_tail_but_keeps_values() {
    let store = ParamStore::default();
    store.set(ParamId::Damping, 0.05);
    let mut processor = ReverbProcessor::new(Freeverb::new(48000.0));
    processor.activate(&store, 48000.0);

    render(&mut processor, 2048, true);
    processor.reset();

    assert_eq!(processor.engine().parameters().damping, 0.05);
    assert!(render(&mut processor, 2048, false).iter().all(|&s| s == 0.0));
}

#[test]
fn loaded_state_reflects_without_host_writes() {
    let saved = ParamStore::default();
    saved.set(ParamId::Width, 0.25);
    saved.set(ParamId::Dry, 0.75);
    let mut bytes = Vec::new();
    state::save(&saved, &mut bytes).unwrap();

    let store = ParamStore::default();
    let (mut link, mut surface) = surface_link(&store.snapshot(), (512, 150));

    let loaded = state::load(&store, &mut bytes.as_slice()).unwrap();
    link.reflect(&loaded, true);
    surface.poll();

    assert_eq!(surface.value(ParamId::Width), 0.25);
    assert_eq!(surface.value(ParamId::Dry), 0.75);

    let mut host_writes = 0;
    link.drain(&store, |_| host_writes += 1);
    assert_eq!(host_writes, 0);
}

#[test]
fn truncated_state_leaves_engine_path_untouched() {
    let store = ParamStore::default();
    let mut processor = ReverbProcessor::new(Freeverb::new(48000.0));
    processor.activate(&store, 48000.0);

    let mut bytes = Vec::new();
    state::save(&ParamStore::default(), &mut bytes).unwrap();
    let err = state::load(&store, &mut &bytes[..RECORD_SIZE - 1]).unwrap_err();
    assert!(matches!(err, StateError::ShortRead { .. }));

    assert!(!processor.begin_block(&store, []));
}

#[test]
fn state_load_reaches_engine_next_block() {
    let mut bytes = Vec::new();
    let saved = ParamStore::default();
    saved.set(ParamId::RoomSize, 0.1);
    saved.set_freeze(true);
    state::save(&saved, &mut bytes).unwrap();

    let store = ParamStore::default();
    let mut processor = ReverbProcessor::new(Freeverb::new(48000.0));
    processor.activate(&store, 48000.0);

    state::load(&store, &mut bytes.as_slice()).unwrap();
    assert!(processor.begin_block(&store, []));
    assert_eq!(processor.engine().parameters(), saved.snapshot());
}

#[test]
fn gui_gesture_round_trip() {
    let store = ParamStore::default();
    let mut processor = ReverbProcessor::new(Freeverb::new(48000.0));
    processor.activate(&store, 48000.0);
    let (mut link, mut surface) = surface_link(&store.snapshot(), (512, 150));

    surface.begin_gesture(ParamId::Damping);
    surface.set_value(ParamId::Damping, 0.9, Origin::User);
    surface.end_gesture(ParamId::Damping);

    let mut to_host = Vec::new();
    link.drain(&store, |m| to_host.push(m));
    assert_eq!(to_host.len(), 3);
    assert!(matches!(to_host[1], SurfaceMessage::Changed(c) if c.value == 0.9));

    // The surface gets one host-origin resync and sends nothing back.
    assert_eq!(link.reflect(&store.snapshot(), false), 1);
    surface.poll();
    assert_eq!(surface.value(ParamId::Damping), 0.9);
    assert_eq!(link.drain(&store, |_| {}), 0);

    assert!(processor.begin_block(&store, []));
    assert_eq!(processor.engine().parameters().damping, 0.9);
}

#[test]
fn automation_reflects_to_open_surface() {
    let store = ParamStore::default();
    let mut processor = ReverbProcessor::new(Freeverb::new(48000.0));
    processor.activate(&store, 48000.0);
    let (mut link, mut surface) = surface_link(&store.snapshot(), (512, 150));

    processor.begin_block(&store, [ParamEvent::new(0, ParamId::Wet.raw(), 0.05)]);
    assert_eq!(link.reflect(&store.snapshot(), false), 1);
    assert_eq!(surface.poll(), 1);
    assert_eq!(surface.value(ParamId::Wet), 0.05);
    assert_eq!(link.drain(&store, |_| {}), 0);
}

#[test]
fn invalid_ids_everywhere_are_noops() {
    let store = ParamStore::default();
    let mut processor = ReverbProcessor::new(Freeverb::new(48000.0));
    processor.activate(&store, 48000.0);

    assert!(!store.write(99, 0.5));
    assert!(!processor.begin_block(&store, [ParamEvent::new(0, 99, 0.5)]));
    assert_eq!(store.snapshot(), ReverbParameters::default());
    assert_eq!(processor.engine().parameters(), ReverbParameters::default());
}
