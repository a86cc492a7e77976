//! Benchmarks for DSP primitives and the full drone engine.
//!
//! Run with: cargo bench
//!
//! These benchmarks measure the per-block cost of the iterative filter
//! solve and the oscillator path against real-time audio deadlines.
//!
//! Reference timing at 48kHz sample rate:
//!   - 64 samples  = 1.33ms deadline
//!   - 128 samples = 2.67ms deadline
//!   - 256 samples = 5.33ms deadline
//!   - 512 samples = 10.67ms deadline
//!
//! Benchmark groups:
//!   - dsp/*        Low-level primitives (oscillator, ladder filter)
//!   - scenarios/*  The full engine as it runs in the audio callback

use criterion::{criterion_group, criterion_main};

mod dsp;
mod scenarios;

/// Common buffer sizes used in audio applications.
pub const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512];

criterion_group!(
    benches,
    // Low-level DSP primitives
    dsp::bench_oscillator,
    dsp::bench_ladder,
    // Real-world scenarios
    scenarios::bench_engine,
);
criterion_main!(benches);
