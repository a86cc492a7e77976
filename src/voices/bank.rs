//! Data-driven specs for voices and filters, plus the literal tunings of
//! the drone bank. These are creative constants, not a protocol: they were
//! dialed in by ear and compiled into the session.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::ladder::{LadderFilter, LadderParams};
use crate::dsp::lfo::Lfo;
use crate::dsp::oscillator::{Oscillator, Waveform};
use crate::voices::{FilterRouting, Voice};

const MASTER_LEVEL: f32 = 0.8;

/// Spec for one LFO: waveform, rate in Hz, and modulation depth in the
/// target parameter's unit.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy)]
pub struct LfoSpec {
    pub waveform: Waveform,
    pub frequency: f32,
    pub depth: f32,
}

impl LfoSpec {
    pub fn build(&self, sample_rate: f32, block_size: usize) -> Lfo {
        Lfo::new(
            self.waveform,
            sample_rate,
            block_size,
            self.frequency,
            self.depth,
        )
    }
}

/// Spec for one voice of the bank.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy)]
pub struct VoiceSpec {
    pub waveform: Waveform,
    pub frequency: f32,
    pub volume: f32,
    pub pan: f32,
    pub routing: FilterRouting,
    pub meta_frequency_lfo: Option<LfoSpec>,
    pub frequency_lfo: Option<LfoSpec>,
    pub meta_amplitude_lfo: Option<LfoSpec>,
    pub amplitude_lfo: Option<LfoSpec>,
}

impl VoiceSpec {
    fn with_defaults(
        waveform: Waveform,
        frequency: f32,
        volume: f32,
        routing: FilterRouting,
    ) -> Self {
        Self {
            waveform,
            frequency,
            volume,
            pan: 0.5,
            routing,
            meta_frequency_lfo: None,
            frequency_lfo: None,
            meta_amplitude_lfo: None,
            amplitude_lfo: None,
        }
    }

    pub fn build(&self, sample_rate: f32, block_size: usize) -> Voice {
        let lfo = |spec: Option<LfoSpec>| spec.map(|s| s.build(sample_rate, block_size));
        Voice::new(
            self.volume,
            self.pan,
            self.routing,
            Oscillator::new(self.waveform, sample_rate, self.frequency),
            lfo(self.meta_frequency_lfo),
            lfo(self.frequency_lfo),
            lfo(self.meta_amplitude_lfo),
            lfo(self.amplitude_lfo),
        )
    }
}

/// Spec for one ladder filter instance: static tuning plus its cutoff
/// modulation chain.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy)]
pub struct FilterSpec {
    pub params: LadderParams,
    pub cutoff_lfo: LfoSpec,
    pub meta_cutoff_lfo: LfoSpec,
}

impl FilterSpec {
    pub fn build(&self, sample_rate: f32, block_size: usize) -> LadderFilter {
        LadderFilter::new(
            sample_rate,
            self.params,
            self.cutoff_lfo.build(sample_rate, block_size),
            self.meta_cutoff_lfo.build(sample_rate, block_size),
        )
    }
}

/// The static voice bank of the drone.
pub fn drone_voices() -> Vec<VoiceSpec> {
    let mut voices = Vec::new();

    // Sub: a pure sine at the bottom of the wavetable range, unfiltered
    voices.push(VoiceSpec::with_defaults(
        Waveform::Sine,
        40.0,
        0.2 * MASTER_LEVEL,
        FilterRouting::Direct,
    ));

    // Body: slightly inharmonic triangles driving the harsh filter
    for i in 0..3 {
        voices.push(VoiceSpec::with_defaults(
            Waveform::Triangle,
            50.0 + i as f32 * 50.2,
            0.1 * MASTER_LEVEL,
            FilterRouting::Harsh,
        ));
    }

    // Leads: a detuned triad into the soft filter. The first two carry slow
    // modulation chains so the texture keeps moving.
    let mut lead_a = VoiceSpec::with_defaults(
        Waveform::Triangle,
        440.33,
        0.2 * MASTER_LEVEL,
        FilterRouting::Soft,
    );
    lead_a.frequency_lfo = Some(LfoSpec {
        waveform: Waveform::Sine,
        frequency: 0.1,
        depth: 1.5,
    });
    lead_a.meta_frequency_lfo = Some(LfoSpec {
        waveform: Waveform::Sine,
        frequency: 0.01,
        depth: 0.02,
    });
    voices.push(lead_a);

    let mut lead_b = VoiceSpec::with_defaults(
        Waveform::Triangle,
        587.33,
        0.2 * MASTER_LEVEL,
        FilterRouting::Soft,
    );
    lead_b.amplitude_lfo = Some(LfoSpec {
        waveform: Waveform::Sine,
        frequency: 0.07,
        depth: 0.05,
    });
    lead_b.meta_amplitude_lfo = Some(LfoSpec {
        waveform: Waveform::Sine,
        frequency: 0.009,
        depth: 0.01,
    });
    voices.push(lead_b);

    voices.push(VoiceSpec::with_defaults(
        Waveform::Triangle,
        659.26,
        0.2 * MASTER_LEVEL,
        FilterRouting::Soft,
    ));

    voices
}

/// The four filter instances: [harsh L, harsh R, soft L, soft R].
/// Left and right are tuned slightly apart so the image drifts.
pub fn drone_filters() -> [FilterSpec; 4] {
    [
        // Gainy resonant pair
        FilterSpec {
            params: LadderParams {
                resonance: 1.5,
                cutoff: 600.0,
                input_gain: 20.0,
                output_gain: 1.0,
            },
            cutoff_lfo: LfoSpec {
                waveform: Waveform::Sine,
                frequency: 0.05,
                depth: 600.0,
            },
            meta_cutoff_lfo: LfoSpec {
                waveform: Waveform::Sine,
                frequency: 0.0005,
                depth: 0.09,
            },
        },
        FilterSpec {
            params: LadderParams {
                resonance: 1.5,
                cutoff: 600.0,
                input_gain: 20.0,
                output_gain: 1.0,
            },
            cutoff_lfo: LfoSpec {
                waveform: Waveform::Sine,
                frequency: 0.004,
                depth: 550.0,
            },
            meta_cutoff_lfo: LfoSpec {
                waveform: Waveform::Sine,
                frequency: 0.0006,
                depth: 0.087,
            },
        },
        // Gentle pair for the leads
        FilterSpec {
            params: LadderParams {
                resonance: 0.2,
                cutoff: 2_000.0,
                input_gain: 1.0,
                output_gain: 1.0,
            },
            cutoff_lfo: LfoSpec {
                waveform: Waveform::Sine,
                frequency: 0.03,
                depth: 1_000.0,
            },
            meta_cutoff_lfo: LfoSpec {
                waveform: Waveform::Sine,
                frequency: 0.001,
                depth: 0.02,
            },
        },
        FilterSpec {
            params: LadderParams {
                resonance: 0.3,
                cutoff: 2_000.0,
                input_gain: 1.0,
                output_gain: 1.0,
            },
            cutoff_lfo: LfoSpec {
                waveform: Waveform::Sine,
                frequency: 0.0025,
                depth: 1_000.0,
            },
            meta_cutoff_lfo: LfoSpec {
                waveform: Waveform::Sine,
                frequency: 0.0015,
                depth: 0.02,
            },
        },
    ]
}
