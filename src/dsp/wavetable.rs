//! Band-limited wavetables for the table-backed oscillator waveforms.
//!
//! One single-cycle table per octave, per waveform. Each octave's table only
//! contains partials that stay below the audible limit when the table is
//! played back at that octave's band, so reading the right table for a given
//! frequency avoids aliasing without any runtime filtering.

use std::f32::consts::{PI, TAU};
use std::sync::OnceLock;

/// Samples per single-cycle table.
pub const TABLE_LEN: usize = 2048;

/// Fundamental frequency of the lowest octave's band, in Hz.
pub const BASE_FREQUENCY: f32 = 40.0;

/// Highest octave index; tables cover octaves `0..=MAX_OCTAVE`.
pub const MAX_OCTAVE: usize = 9;

/// Partials above this frequency are left out of every table.
const PARTIAL_LIMIT_HZ: f32 = 20_000.0;

const NUM_TABLES: usize = MAX_OCTAVE + 1;

/// Read-only bank of band-limited tables, one row per octave.
pub struct WavetableBank {
    saw: Vec<f32>,
    square: Vec<f32>,
    triangle: Vec<f32>,
}

impl WavetableBank {
    /// Process-wide bank, built once on first use.
    pub fn shared() -> &'static WavetableBank {
        static BANK: OnceLock<WavetableBank> = OnceLock::new();
        BANK.get_or_init(WavetableBank::build)
    }

    fn build() -> Self {
        let mut saw = vec![0.0; NUM_TABLES * TABLE_LEN];
        let mut square = vec![0.0; NUM_TABLES * TABLE_LEN];
        let mut triangle = vec![0.0; NUM_TABLES * TABLE_LEN];

        for octave in 0..NUM_TABLES {
            let fundamental = BASE_FREQUENCY * 2.0_f32.powi(octave as i32);
            let max_harmonic = ((PARTIAL_LIMIT_HZ / fundamental) as usize).max(1);
            let row = octave * TABLE_LEN;

            for i in 0..TABLE_LEN {
                let x = i as f32 / TABLE_LEN as f32;
                saw[row + i] = saw_partial_sum(x, max_harmonic);
                square[row + i] = square_partial_sum(x, max_harmonic);
                triangle[row + i] = triangle_partial_sum(x, max_harmonic);
            }
        }

        Self {
            saw,
            square,
            triangle,
        }
    }

    pub fn saw(&self, octave: usize) -> &[f32] {
        row(&self.saw, octave)
    }

    pub fn square(&self, octave: usize) -> &[f32] {
        row(&self.square, octave)
    }

    pub fn triangle(&self, octave: usize) -> &[f32] {
        row(&self.triangle, octave)
    }
}

#[inline]
fn row(tables: &[f32], octave: usize) -> &[f32] {
    debug_assert!(octave <= MAX_OCTAVE);
    &tables[octave * TABLE_LEN..(octave + 1) * TABLE_LEN]
}

/// Pick the table octave for a frequency: the lowest octave whose doubled
/// band fundamental still exceeds the frequency, capped at [`MAX_OCTAVE`].
/// Frequencies at or below [`BASE_FREQUENCY`] map to octave 0.
pub fn octave_for(frequency: f32) -> usize {
    let mut octave = 0;
    if frequency > BASE_FREQUENCY {
        let mut band = BASE_FREQUENCY;
        for n in 0..=MAX_OCTAVE {
            octave = n;
            if frequency < band * 2.0 {
                break;
            }
            band *= 2.0;
        }
    }
    octave
}

/// Linearly interpolate a single-cycle table at a fractional phase in [0, 1).
/// The second tap wraps around, so the cycle stays continuous at the seam.
#[inline]
pub fn interpolate(table: &[f32], phase: f32) -> f32 {
    let position = phase * table.len() as f32;
    let index = (position as usize).min(table.len() - 1);
    let next = (index + 1) % table.len();
    let frac = position - index as f32;
    table[index] + frac * (table[next] - table[index])
}

fn saw_partial_sum(x: f32, max_harmonic: usize) -> f32 {
    let mut sum = 0.0;
    for k in 1..=max_harmonic {
        let sign = if k % 2 == 0 { -1.0 } else { 1.0 };
        sum += sign * (TAU * k as f32 * x).sin() / k as f32;
    }
    2.0 / PI * sum
}

fn square_partial_sum(x: f32, max_harmonic: usize) -> f32 {
    let mut sum = 0.0;
    for k in (1..=max_harmonic).step_by(2) {
        sum += (TAU * k as f32 * x).sin() / k as f32;
    }
    4.0 / PI * sum
}

fn triangle_partial_sum(x: f32, max_harmonic: usize) -> f32 {
    let mut sum = 0.0;
    for k in (1..=max_harmonic).step_by(2) {
        let sign = if (k / 2) % 2 == 0 { 1.0 } else { -1.0 };
        sum += sign * (TAU * k as f32 * x).sin() / (k as f32 * k as f32);
    }
    8.0 / (PI * PI) * sum
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn octave_selection_is_monotonic() {
        let mut last = 0;
        let mut freq = 10.0;
        while freq < 25_000.0 {
            let octave = octave_for(freq);
            assert!(
                octave >= last,
                "octave went backwards at {} Hz: {} -> {}",
                freq,
                last,
                octave
            );
            last = octave;
            freq *= 1.03;
        }
    }

    #[test]
    fn octave_selection_boundaries() {
        assert_eq!(octave_for(10.0), 0);
        assert_eq!(octave_for(BASE_FREQUENCY), 0);
        assert_eq!(octave_for(BASE_FREQUENCY * 1.5), 0);
        assert_eq!(octave_for(BASE_FREQUENCY * 2.0), 1);
        // Far above the top band it stays capped
        assert_eq!(octave_for(1_000_000.0), MAX_OCTAVE);
    }

    #[test]
    fn tables_are_finite_and_bounded() {
        let bank = WavetableBank::shared();
        for octave in 0..=MAX_OCTAVE {
            for table in [bank.saw(octave), bank.square(octave), bank.triangle(octave)] {
                assert_eq!(table.len(), TABLE_LEN);
                for &sample in table {
                    assert!(sample.is_finite());
                    // Gibbs overshoot stays well under this bound
                    assert!(sample.abs() < 1.5, "sample {} out of range", sample);
                }
            }
        }
    }

    #[test]
    fn top_octave_square_is_nearly_sinusoidal() {
        // 40 Hz * 2^9 = 20480 Hz band: only the fundamental survives the
        // partial limit, so the table should look like a sine.
        let bank = WavetableBank::shared();
        let table = bank.square(MAX_OCTAVE);
        for (i, &sample) in table.iter().enumerate() {
            let x = i as f32 / TABLE_LEN as f32;
            let expected = 4.0 / PI * (TAU * x).sin();
            assert!(
                (sample - expected).abs() < 1e-4,
                "sample {} at index {} differs from fundamental {}",
                sample,
                i,
                expected
            );
        }
    }

    #[test]
    fn interpolation_matches_endpoints_and_midpoints() {
        let table = [0.0, 1.0, 0.0, -1.0];
        assert!((interpolate(&table, 0.0) - 0.0).abs() < 1e-6);
        assert!((interpolate(&table, 0.25) - 1.0).abs() < 1e-6);
        // Halfway between two taps
        assert!((interpolate(&table, 0.125) - 0.5).abs() < 1e-6);
        // Wraps: last tap blends back toward the first
        assert!((interpolate(&table, 0.875) - (-0.5)).abs() < 1e-6);
    }
}
