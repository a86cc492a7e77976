//! Benchmarks for the nonlinear ladder filter.
//!
//! The per-sample solve iterates until convergence, so cost depends on how
//! hard the filter is driven. Benchmarked at a gentle and a saturating
//! operating point.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use droner_dsp::dsp::ladder::{LadderFilter, LadderParams};
use droner_dsp::dsp::lfo::Lfo;
use droner_dsp::dsp::oscillator::Waveform;

use crate::BLOCK_SIZES;

fn filter(size: usize, params: LadderParams, lfo_depth: f32) -> LadderFilter {
    LadderFilter::new(
        48_000.0,
        params,
        Lfo::new(Waveform::Sine, 48_000.0, size, 0.05, lfo_depth),
        Lfo::new(Waveform::Sine, 48_000.0, size, 0.0005, 0.0),
    )
}

pub fn bench_ladder(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/ladder");

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();
        let mut output = vec![0.0f32; size];

        // Gentle: low resonance, unity gain, converges in a step or two
        let mut gentle = filter(
            size,
            LadderParams {
                resonance: 0.2,
                cutoff: 2_000.0,
                input_gain: 1.0,
                output_gain: 1.0,
            },
            0.0,
        );
        group.bench_with_input(BenchmarkId::new("gentle", size), &size, |b, _| {
            b.iter(|| {
                output.fill(0.0);
                gentle.process_block(black_box(&input), black_box(&mut output));
            })
        });

        // Driven: high resonance and heavy input gain keep the solver busy
        let mut driven = filter(
            size,
            LadderParams {
                resonance: 1.5,
                cutoff: 600.0,
                input_gain: 20.0,
                output_gain: 1.0,
            },
            600.0,
        );
        group.bench_with_input(BenchmarkId::new("driven", size), &size, |b, _| {
            b.iter(|| {
                output.fill(0.0);
                driven.process_block(black_box(&input), black_box(&mut output));
            })
        });
    }

    group.finish();
}
