//! Low frequency oscillator: an [`Oscillator`] plus a modulation depth and
//! an owned per-block sample buffer.
//!
//! The buffer is overwritten on every render, scaled by `depth`, and read by
//! whatever the LFO targets (a voice parameter or a filter cutoff). Chaining
//! a meta-LFO is done by passing its output buffer as the frequency
//! modulation input, which makes the LFO's own rate drift over time.

use crate::dsp::oscillator::{Oscillator, Waveform};

pub struct Lfo {
    osc: Oscillator,
    depth: f32,
    buffer: Vec<f32>,
}

impl Lfo {
    pub fn new(
        waveform: Waveform,
        sample_rate: f32,
        block_size: usize,
        frequency: f32,
        depth: f32,
    ) -> Self {
        Self {
            osc: Oscillator::new(waveform, sample_rate, frequency),
            depth,
            buffer: vec![0.0; block_size],
        }
    }

    /// Fill the first `len` modulation samples for the coming block,
    /// optionally rate-modulated by a meta-LFO's output.
    pub fn render(&mut self, len: usize, frequency_mod: Option<&[f32]>) {
        debug_assert!(len <= self.buffer.len());
        self.osc
            .render(&mut self.buffer[..len], frequency_mod, None, true, self.depth);
    }

    /// Modulation samples produced by the last [`render`](Self::render) call.
    pub fn output(&self, len: usize) -> &[f32] {
        &self.buffer[..len]
    }

    #[inline]
    pub fn value(&self, index: usize) -> f32 {
        self.buffer[index]
    }

    pub fn depth(&self) -> f32 {
        self.depth
    }
}
