//! Audio-band and control-band waveform generator.
//!
//! Table waveforms (saw, square, triangle) read the band-limited wavetable
//! for the oscillator's current octave; sine is computed directly; noise
//! draws uniform samples. One struct serves both audible voices and LFOs;
//! the only difference is the frequency range it is driven at.

use std::f32::consts::TAU;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::wavetable::{self, WavetableBank};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Saw,
    Square,
    Triangle,
    Noise,
}

pub struct Oscillator {
    waveform: Waveform,
    sample_rate: f32,
    frequency: f32,
    /// Normalized phase, always kept in [0, 1).
    phase: f32,
    /// Wavetable octave index, recomputed whenever frequency changes.
    octave: usize,
    /// Resolved at construction so the table build never lands in the
    /// audio callback.
    bank: &'static WavetableBank,
    rng: SmallRng,
}

impl Oscillator {
    pub fn new(waveform: Waveform, sample_rate: f32, frequency: f32) -> Self {
        let mut osc = Self {
            waveform,
            sample_rate,
            frequency: 0.0,
            phase: 0.0,
            octave: 0,
            bank: WavetableBank::shared(),
            rng: SmallRng::seed_from_u64(0xD120_4E55),
        };
        osc.set_frequency(frequency);
        osc
    }

    /// Change the base frequency and reselect the wavetable octave.
    pub fn set_frequency(&mut self, frequency: f32) {
        self.frequency = frequency;
        self.octave = wavetable::octave_for(frequency);
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    #[inline]
    fn advance_phase(&mut self, frequency_mod: f32) {
        let delta = (self.frequency + frequency_mod) / self.sample_rate;
        self.phase = (self.phase + delta).rem_euclid(1.0);
        // rem_euclid of a tiny negative operand can round up to exactly 1.0
        if self.phase >= 1.0 {
            self.phase = 0.0;
        }
    }

    /// Advance one sample and return it, scaled by `amplitude`.
    #[inline]
    pub fn next_sample(&mut self, frequency_mod: f32, amplitude: f32) -> f32 {
        match self.waveform {
            Waveform::Sine => {
                self.advance_phase(frequency_mod);
                amplitude * (TAU * self.phase).sin()
            }
            Waveform::Noise => {
                // Phase-free; modulating frequency has no effect on noise
                amplitude * self.rng.gen_range(-1.0f32..=1.0)
            }
            Waveform::Saw | Waveform::Square | Waveform::Triangle => {
                self.advance_phase(frequency_mod);
                let table = match self.waveform {
                    Waveform::Saw => self.bank.saw(self.octave),
                    Waveform::Square => self.bank.square(self.octave),
                    _ => self.bank.triangle(self.octave),
                };
                amplitude * wavetable::interpolate(table, self.phase)
            }
        }
    }

    /// Render a mono block. Per-sample amplitude is
    /// `amplitude + amplitude_mod[i]` when a modulation buffer is given.
    /// `overwrite` selects overwrite vs. accumulate into `out`.
    pub fn render(
        &mut self,
        out: &mut [f32],
        frequency_mod: Option<&[f32]>,
        amplitude_mod: Option<&[f32]>,
        overwrite: bool,
        amplitude: f32,
    ) {
        debug_assert!(frequency_mod.map_or(true, |m| m.len() >= out.len()));
        debug_assert!(amplitude_mod.map_or(true, |m| m.len() >= out.len()));

        for (i, slot) in out.iter_mut().enumerate() {
            let fm = frequency_mod.map_or(0.0, |m| m[i]);
            let am = amplitude + amplitude_mod.map_or(0.0, |m| m[i]);
            let sample = self.next_sample(fm, am);
            if overwrite {
                *slot = sample;
            } else {
                *slot += sample;
            }
        }
    }

    /// Render a stereo block; both channels receive the same samples.
    pub fn render_stereo(
        &mut self,
        left: &mut [f32],
        right: &mut [f32],
        frequency_mod: Option<&[f32]>,
        amplitude_mod: Option<&[f32]>,
        overwrite: bool,
        amplitude: f32,
    ) {
        debug_assert_eq!(left.len(), right.len());
        debug_assert!(frequency_mod.map_or(true, |m| m.len() >= left.len()));
        debug_assert!(amplitude_mod.map_or(true, |m| m.len() >= left.len()));

        for i in 0..left.len() {
            let fm = frequency_mod.map_or(0.0, |m| m[i]);
            let am = amplitude + amplitude_mod.map_or(0.0, |m| m[i]);
            let sample = self.next_sample(fm, am);
            if overwrite {
                left[i] = sample;
                right[i] = sample;
            } else {
                left[i] += sample;
                right[i] += sample;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sine_matches_closed_form() {
        let sample_rate = 48_000.0;
        let frequency = 440.0;
        let mut osc = Oscillator::new(Waveform::Sine, sample_rate, frequency);

        let mut buffer = vec![0.0f32; 128];
        osc.render(&mut buffer, None, None, true, 1.0);

        // Phase advances before sampling, so sample i sits at (i + 1) ticks
        for (i, &actual) in buffer.iter().enumerate() {
            let expected = (TAU * frequency * (i + 1) as f32 / sample_rate).sin();
            assert!(
                (actual - expected).abs() < 1e-4,
                "sample {}: expected {expected}, got {actual}",
                i
            );
        }
    }

    #[test]
    fn phase_stays_in_unit_interval_under_negative_modulation() {
        let mut osc = Oscillator::new(Waveform::Sine, 48_000.0, 100.0);
        // Net phase delta is negative every sample
        for _ in 0..10_000 {
            osc.next_sample(-700.0, 1.0);
            assert!(
                osc.phase() >= 0.0 && osc.phase() < 1.0,
                "phase escaped unit interval: {}",
                osc.phase()
            );
        }
    }

    #[test]
    fn phase_stays_in_unit_interval_under_positive_modulation() {
        let mut osc = Oscillator::new(Waveform::Saw, 48_000.0, 220.0);
        for _ in 0..10_000 {
            osc.next_sample(15_000.0, 1.0);
            assert!(osc.phase() >= 0.0 && osc.phase() < 1.0);
        }
    }

    #[test]
    fn set_frequency_reselects_octave() {
        let mut osc = Oscillator::new(Waveform::Triangle, 48_000.0, 30.0);
        let mut last = wavetable::octave_for(30.0);
        for freq in [50.0, 90.0, 200.0, 500.0, 2_000.0, 10_000.0] {
            osc.set_frequency(freq);
            let octave = wavetable::octave_for(freq);
            assert!(octave >= last);
            last = octave;
        }
    }

    #[test]
    fn construction_resolves_the_shared_table_bank() {
        // Table synthesis must happen before the first render call, so a
        // fresh oscillator already holds the process-wide bank
        let osc = Oscillator::new(Waveform::Triangle, 48_000.0, 220.0);
        assert!(std::ptr::eq(osc.bank, WavetableBank::shared()));
    }

    #[test]
    fn noise_is_bounded() {
        let mut osc = Oscillator::new(Waveform::Noise, 48_000.0, 440.0);
        let mut buffer = vec![0.0f32; 4096];
        osc.render(&mut buffer, None, None, true, 1.0);
        for &sample in &buffer {
            assert!((-1.0..=1.0).contains(&sample));
        }
        // A uniform source should not be stuck at one value
        let distinct = buffer.iter().filter(|&&s| s != buffer[0]).count();
        assert!(distinct > 0);
    }

    #[test]
    fn render_accumulates_when_not_overwriting() {
        let mut osc_a = Oscillator::new(Waveform::Sine, 48_000.0, 440.0);
        let mut osc_b = Oscillator::new(Waveform::Sine, 48_000.0, 440.0);

        let mut overwritten = vec![0.5f32; 64];
        osc_a.render(&mut overwritten, None, None, true, 1.0);

        let mut accumulated = vec![0.5f32; 64];
        osc_b.render(&mut accumulated, None, None, false, 1.0);

        for (o, a) in overwritten.iter().zip(&accumulated) {
            assert!((a - (o + 0.5)).abs() < 1e-6);
        }
    }

    #[test]
    fn stereo_channels_are_identical() {
        let mut osc = Oscillator::new(Waveform::Square, 48_000.0, 110.0);
        let mut left = vec![0.0f32; 256];
        let mut right = vec![0.0f32; 256];
        osc.render_stereo(&mut left, &mut right, None, None, true, 0.8);
        assert_eq!(left, right);
    }

    #[test]
    fn amplitude_modulation_is_added_to_base() {
        let mut plain = Oscillator::new(Waveform::Sine, 48_000.0, 440.0);
        let mut modded = Oscillator::new(Waveform::Sine, 48_000.0, 440.0);

        let mut base = vec![0.0f32; 64];
        plain.render(&mut base, None, None, true, 1.0);

        let amp_mod = vec![1.0f32; 64];
        let mut doubled = vec![0.0f32; 64];
        modded.render(&mut doubled, None, Some(&amp_mod), true, 1.0);

        for (b, d) in base.iter().zip(&doubled) {
            assert!((d - 2.0 * b).abs() < 1e-5);
        }
    }
}
