//! Benchmark for the full engine: seven voices, four filters, stereo mix.
//!
//! This is the exact workload of the audio callback, so the numbers here
//! bound the block sizes the session can sustain.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use droner_dsp::engine::DroneEngine;

use crate::BLOCK_SIZES;

pub fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/engine");

    for &size in BLOCK_SIZES {
        let mut engine = DroneEngine::new(48_000.0, size);
        let mut left = vec![0.0f32; size];
        let mut right = vec![0.0f32; size];

        // Run past the fade-in so the filters work on real signal
        for _ in 0..32 {
            left.fill(0.0);
            right.fill(0.0);
            engine.process_block(&mut left, &mut right);
        }

        group.bench_with_input(BenchmarkId::new("process_block", size), &size, |b, _| {
            b.iter(|| {
                left.fill(0.0);
                right.fill(0.0);
                engine.process_block(black_box(&mut left), black_box(&mut right));
            })
        });
    }

    group.finish();
}
