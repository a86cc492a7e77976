//! Benchmarks for the wavetable oscillator.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use droner_dsp::dsp::oscillator::{Oscillator, Waveform};

use crate::BLOCK_SIZES;

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    for &size in BLOCK_SIZES {
        for (name, waveform) in [
            ("sine", Waveform::Sine),
            ("saw", Waveform::Saw),
            ("triangle", Waveform::Triangle),
            ("noise", Waveform::Noise),
        ] {
            let mut osc = Oscillator::new(waveform, 48_000.0, 220.0);
            let mut buffer = vec![0.0f32; size];
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    osc.render(black_box(&mut buffer), None, None, true, 0.8);
                })
            });
        }

        // Frequency modulation adds a buffer read and phase adjust per sample
        let mut osc = Oscillator::new(Waveform::Triangle, 48_000.0, 220.0);
        let freq_mod: Vec<f32> = (0..size).map(|i| (i as f32 * 0.01).sin() * 5.0).collect();
        let mut buffer = vec![0.0f32; size];
        group.bench_with_input(BenchmarkId::new("triangle_fm", size), &size, |b, _| {
            b.iter(|| {
                osc.render(black_box(&mut buffer), Some(&freq_mod), None, true, 0.8);
            })
        });
    }

    group.finish();
}
