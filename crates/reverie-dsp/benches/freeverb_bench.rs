//! Criterion benchmarks for the Freeverb engine
//!
//! Run with: cargo bench -p reverie-dsp
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use reverie_dsp::{Freeverb, ReverbEngine, ReverbParameters};

const SAMPLE_RATE: f64 = 48000.0;
const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512, 1024];

fn generate_test_signal(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE as f32;
            (2.0 * std::f32::consts::PI * 440.0 * t).sin() * 0.5
        })
        .collect()
}

fn bench_process(c: &mut Criterion) {
    let mut group = c.benchmark_group("Freeverb");

    for &block_size in BLOCK_SIZES {
        let input = generate_test_signal(block_size);

        group.bench_with_input(
            BenchmarkId::new("process_stereo", block_size),
            &block_size,
            |b, &size| {
                let mut reverb = Freeverb::new(SAMPLE_RATE);
                let mut out_l = vec![0.0; size];
                let mut out_r = vec![0.0; size];
                b.iter(|| {
                    reverb.process_stereo(
                        black_box(&input),
                        black_box(&input),
                        &mut out_l,
                        &mut out_r,
                    );
                    black_box((&out_l, &out_r));
                });
            },
        );
    }

    group.finish();
}

/// Cost of a full snapshot apply, paid at most once per block.
fn bench_set_parameters(c: &mut Criterion) {
    let mut reverb = Freeverb::new(SAMPLE_RATE);
    let a = ReverbParameters::default();
    let b = ReverbParameters {
        room_size: 0.9,
        wet_level: 0.6,
        ..a
    };
    let mut flip = false;

    c.bench_function("Freeverb/set_parameters", |bench| {
        bench.iter(|| {
            flip = !flip;
            reverb.set_parameters(black_box(if flip { &a } else { &b }));
        });
    });
}

criterion_group!(benches, bench_process, bench_set_parameters);
criterion_main!(benches);
