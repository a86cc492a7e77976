//! A single drone voice and its per-block modulation refresh.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::lfo::Lfo;
use crate::dsp::oscillator::Oscillator;

/// Where a voice's output goes: straight to the stereo mix, or into one of
/// the two filter input groups.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterRouting {
    Direct,
    Harsh,
    Soft,
}

/// One voice of the drone: an oscillator, two optional modulation chains
/// (amplitude and frequency, each with an optional meta-LFO that drifts the
/// LFO's own rate), a routing tag, and mix levels.
///
/// Configuration is fixed after construction; only oscillator and LFO
/// phases evolve from block to block.
pub struct Voice {
    pub volume: f32,
    pub pan: f32,
    pub routing: FilterRouting,

    oscillator: Oscillator,

    meta_frequency_lfo: Option<Lfo>,
    frequency_lfo: Option<Lfo>,
    meta_amplitude_lfo: Option<Lfo>,
    amplitude_lfo: Option<Lfo>,
}

impl Voice {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        volume: f32,
        pan: f32,
        routing: FilterRouting,
        oscillator: Oscillator,
        meta_frequency_lfo: Option<Lfo>,
        frequency_lfo: Option<Lfo>,
        meta_amplitude_lfo: Option<Lfo>,
        amplitude_lfo: Option<Lfo>,
    ) -> Self {
        Self {
            volume,
            pan,
            routing,
            oscillator,
            meta_frequency_lfo,
            frequency_lfo,
            meta_amplitude_lfo,
            amplitude_lfo,
        }
    }

    /// Refresh enabled modulation chains for the coming block: meta-LFOs
    /// first (free-running), then the primary LFOs with the meta output as
    /// their rate modulation.
    fn refresh_modulation(&mut self, len: usize) {
        if let Some(lfo) = &mut self.meta_frequency_lfo {
            lfo.render(len, None);
        }
        if let Some(lfo) = &mut self.frequency_lfo {
            let meta = self.meta_frequency_lfo.as_ref().map(|m| m.output(len));
            lfo.render(len, meta);
        }
        if let Some(lfo) = &mut self.meta_amplitude_lfo {
            lfo.render(len, None);
        }
        if let Some(lfo) = &mut self.amplitude_lfo {
            let meta = self.meta_amplitude_lfo.as_ref().map(|m| m.output(len));
            lfo.render(len, meta);
        }
    }

    /// Render one mono block (used when the voice feeds a filter input).
    pub fn render(&mut self, out: &mut [f32], overwrite: bool) {
        self.refresh_modulation(out.len());
        let freq_mod = self.frequency_lfo.as_ref().map(|l| l.output(out.len()));
        let amp_mod = self.amplitude_lfo.as_ref().map(|l| l.output(out.len()));
        self.oscillator
            .render(out, freq_mod, amp_mod, overwrite, self.volume);
    }

    /// Render one stereo block, both channels identical (used when the
    /// voice bypasses the filters).
    pub fn render_stereo(&mut self, left: &mut [f32], right: &mut [f32], overwrite: bool) {
        self.refresh_modulation(left.len());
        let freq_mod = self.frequency_lfo.as_ref().map(|l| l.output(left.len()));
        let amp_mod = self.amplitude_lfo.as_ref().map(|l| l.output(left.len()));
        self.oscillator
            .render_stereo(left, right, freq_mod, amp_mod, overwrite, self.volume);
    }
}
