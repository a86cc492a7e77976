//! Block orchestration: route the voice bank through the filters into a
//! stereo mix.
//!
//! The engine is the session context: it owns the voices, the four ladder
//! filters, and every buffer the per-block path touches, all allocated at
//! construction. [`DroneEngine::process_block`] is meant to be called from
//! a realtime audio callback: it takes no locks, performs no allocation,
//! and does no I/O.

use crate::dsp::ladder::LadderFilter;
use crate::voices::{drone_filters, drone_voices, FilterRouting, FilterSpec, Voice, VoiceSpec};

/// Length of the linear fade-in applied at session start, in seconds.
/// Avoids a discontinuity when playback begins mid-drone.
const FADE_IN_SECONDS: f32 = 10.0;

pub struct DroneEngine {
    sample_rate: f32,
    block_size: usize,

    voices: Vec<Voice>,

    harsh_left: LadderFilter,
    harsh_right: LadderFilter,
    soft_left: LadderFilter,
    soft_right: LadderFilter,

    // Per-block working buffers, sized to block_size at construction
    harsh_input: Vec<f32>,
    soft_input: Vec<f32>,
    mix_left: Vec<f32>,
    mix_right: Vec<f32>,

    /// Samples elapsed since session start, saturating at the ramp length.
    ramp_position: u64,
}

impl DroneEngine {
    /// Build the engine with the compiled-in drone bank and filter tunings.
    pub fn new(sample_rate: f32, block_size: usize) -> Self {
        Self::with_config(sample_rate, block_size, &drone_voices(), &drone_filters())
    }

    /// Build the engine from explicit voice and filter specs. The filter
    /// array is [harsh L, harsh R, soft L, soft R].
    pub fn with_config(
        sample_rate: f32,
        block_size: usize,
        voice_specs: &[VoiceSpec],
        filter_specs: &[FilterSpec; 4],
    ) -> Self {
        let voices = voice_specs
            .iter()
            .map(|spec| spec.build(sample_rate, block_size))
            .collect();
        let [harsh_l, harsh_r, soft_l, soft_r] = filter_specs;

        Self {
            sample_rate,
            block_size,
            voices,
            harsh_left: harsh_l.build(sample_rate, block_size),
            harsh_right: harsh_r.build(sample_rate, block_size),
            soft_left: soft_l.build(sample_rate, block_size),
            soft_right: soft_r.build(sample_rate, block_size),
            harsh_input: vec![0.0; block_size],
            soft_input: vec![0.0; block_size],
            mix_left: vec![0.0; block_size],
            mix_right: vec![0.0; block_size],
            ramp_position: 0,
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Process one block, accumulating into `left`/`right`. Callers must
    /// pre-clear the buffers or accept accumulation. Blocks may be shorter
    /// than the configured block size (e.g. a driver's trailing chunk).
    pub fn process_block(&mut self, left: &mut [f32], right: &mut [f32]) {
        debug_assert_eq!(left.len(), right.len());
        debug_assert!(!left.is_empty());
        debug_assert!(left.len() <= self.block_size);
        let len = left.len();

        let Self {
            voices,
            harsh_left,
            harsh_right,
            soft_left,
            soft_right,
            harsh_input,
            soft_input,
            mix_left,
            mix_right,
            ramp_position,
            sample_rate,
            ..
        } = self;

        let harsh_input = &mut harsh_input[..len];
        let soft_input = &mut soft_input[..len];
        let mix_left = &mut mix_left[..len];
        let mix_right = &mut mix_right[..len];

        // First voice into each buffer group overwrites, the rest accumulate
        let mut wrote_direct = false;
        let mut wrote_harsh = false;
        let mut wrote_soft = false;

        for voice in voices.iter_mut() {
            match voice.routing {
                FilterRouting::Direct => {
                    voice.render_stereo(mix_left, mix_right, !wrote_direct);
                    wrote_direct = true;
                }
                FilterRouting::Harsh => {
                    voice.render(harsh_input, !wrote_harsh);
                    wrote_harsh = true;
                }
                FilterRouting::Soft => {
                    voice.render(soft_input, !wrote_soft);
                    wrote_soft = true;
                }
            }
        }

        // A group nothing wrote to still holds the previous block
        if !wrote_direct {
            mix_left.fill(0.0);
            mix_right.fill(0.0);
        }
        if !wrote_harsh {
            harsh_input.fill(0.0);
        }
        if !wrote_soft {
            soft_input.fill(0.0);
        }

        harsh_left.process_block(harsh_input, mix_left);
        harsh_right.process_block(harsh_input, mix_right);
        soft_left.process_block(soft_input, mix_left);
        soft_right.process_block(soft_input, mix_right);

        let ramp_total = (FADE_IN_SECONDS * *sample_rate) as u64;
        for i in 0..len {
            let gain = if *ramp_position < ramp_total {
                *ramp_position += 1;
                *ramp_position as f32 / ramp_total as f32
            } else {
                1.0
            };
            left[i] += mix_left[i] * gain;
            right[i] += mix_right[i] * gain;
        }
    }
}
