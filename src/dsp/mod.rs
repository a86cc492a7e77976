//! Low-level DSP primitives used by the voice bank and the engine.
//!
//! These components are allocation-free and realtime-safe once constructed,
//! making them safe to drive from an audio callback. They stay focused on
//! the signal-processing math; routing and orchestration live in `engine`.

/// Nonlinear resonant low-pass ladder filter.
pub mod ladder;
/// Low frequency oscillators for parameter modulation.
pub mod lfo;
/// Oscillator waveforms and noise sources.
pub mod oscillator;
/// Band-limited per-octave wavetables.
pub mod wavetable;
