//! Nonlinear resonant low-pass ladder filter.
//!
//! Time-domain simulation of the classic four-stage transistor ladder
//! circuit. Each stage is a saturating one-pole section and the fourth
//! stage feeds back to the input through the resonance path:
//!
//! ```text
//!   s0' = omega * (-tanh(s0) - tanh(4*res*s3 + input))
//!   s1' = omega * (-tanh(s1) + tanh(s0))
//!   s2' = omega * (-tanh(s2) + tanh(s1))
//!   s3' = omega * (-tanh(s3) + tanh(s2))
//! ```
//!
//! The ODE system is discretized with the trapezoidal rule, which is
//! implicit: every sample requires solving a 4-dimensional nonlinear
//! equation for the next state. We use Newton-Raphson with a hard
//! iteration cap so the per-sample cost stays bounded. The Jacobian of the
//! residual is sparse (a main diagonal, one sub-diagonal band, and a single
//! corner entry from the feedback path) so its inverse is written out in
//! closed form by cofactor expansion instead of running a general 4x4
//! solve. No allocation happens anywhere in the per-sample path.
//!
//! High resonance makes the filter self-oscillate. That is the circuit
//! behaving as intended, not an error; nothing here clamps the parameters.

use std::f32::consts::TAU;

use crate::dsp::lfo::Lfo;

/// Convergence threshold for the Newton step, L1 norm over the state.
const NEWTON_EPSILON: f32 = 1e-5;

/// Hard cap on Newton iterations per sample. If the iteration has not
/// converged by then, the best available guess is used as-is; an audible
/// artifact in rare degenerate cases is preferable to a missed deadline.
const NEWTON_MAX_ITERS: u32 = 10;

/// Static tuning of one filter instance.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy)]
pub struct LadderParams {
    pub resonance: f32,
    /// Base cutoff in Hz, before per-sample modulation.
    pub cutoff: f32,
    /// Applied to the raw input before it enters the ladder.
    pub input_gain: f32,
    /// Applied to stage 3 when producing the output sample.
    pub output_gain: f32,
}

pub struct LadderFilter {
    resonance: f32,
    cutoff: f32,
    input_gain: f32,
    output_gain: f32,
    /// 1 / sample rate.
    timestep: f32,

    cutoff_lfo: Lfo,
    meta_cutoff_lfo: Lfo,

    /// Raw input from the previous sample, for the trapezoidal t-side.
    prev_sample: f32,
    /// One entry per ladder stage; the filter's entire memory. Persists
    /// across blocks and is never reset after construction.
    state: [f32; 4],
}

impl LadderFilter {
    pub fn new(
        sample_rate: f32,
        params: LadderParams,
        cutoff_lfo: Lfo,
        meta_cutoff_lfo: Lfo,
    ) -> Self {
        Self {
            resonance: params.resonance,
            cutoff: params.cutoff,
            input_gain: params.input_gain,
            output_gain: params.output_gain,
            timestep: 1.0 / sample_rate,
            cutoff_lfo,
            meta_cutoff_lfo,
            prev_sample: 0.0,
            state: [0.0; 4],
        }
    }

    /// Current stage states, s0..s3.
    pub fn state(&self) -> [f32; 4] {
        self.state
    }

    /// Filter one block, accumulating into `output`.
    ///
    /// The filter's own modulation chain runs first: the meta-cutoff LFO
    /// renders a block, then the cutoff LFO renders a block with the meta
    /// output as its rate modulation. Each filtered sample then consumes
    /// one cutoff modulation value.
    pub fn process_block(&mut self, input: &[f32], output: &mut [f32]) {
        debug_assert_eq!(input.len(), output.len());
        let len = input.len();

        self.meta_cutoff_lfo.render(len, None);
        let Self {
            cutoff_lfo,
            meta_cutoff_lfo,
            ..
        } = self;
        cutoff_lfo.render(len, Some(meta_cutoff_lfo.output(len)));

        for i in 0..len {
            let cutoff_mod = self.cutoff_lfo.value(i);
            output[i] += self.process_sample(input[i], cutoff_mod);
        }
    }

    /// Advance the filter by one sample and return the filtered output.
    pub fn process_sample(&mut self, sample: f32, cutoff_mod: f32) -> f32 {
        let omega = (self.cutoff + cutoff_mod) * TAU;
        let drive = sample * self.input_gain;
        let res = self.resonance;
        let s = self.state;

        // t-side of the trapezoidal rule, fixed for the whole solve.
        // Stage 3's difference term cancels: it has no downstream stage.
        let prev_feedback = (4.0 * res * s[3] + self.prev_sample).tanh();
        let prev_f = [
            omega * (-s[0].tanh() - prev_feedback),
            omega * (-s[1].tanh() + s[0].tanh()),
            omega * (-s[2].tanh() + s[1].tanh()),
            0.0,
        ];

        let half_dt = self.timestep * 0.5;
        let mut guess;
        let mut next_guess = s;
        let mut iters = 0u32;

        loop {
            guess = next_guess;

            // tanh is expensive; each value is used twice below
            let t = [
                guess[0].tanh(),
                guess[1].tanh(),
                guess[2].tanh(),
                guess[3].tanh(),
            ];
            let feedback = (4.0 * res * guess[3] + drive).tanh();

            let f = [
                omega * (-t[0] - feedback),
                omega * (-t[1] + t[0]),
                omega * (-t[2] + t[1]),
                omega * (-t[3] + t[2]),
            ];

            // Residual of the implicit trapezoidal step
            let r = [
                guess[0] - s[0] - half_dt * (f[0] + prev_f[0]),
                guess[1] - s[1] - half_dt * (f[1] + prev_f[1]),
                guess[2] - s[2] - half_dt * (f[2] + prev_f[2]),
                guess[3] - s[3] - half_dt * (f[3] + prev_f[3]),
            ];

            // sech^2 = 1 - tanh^2
            let sech2 = [
                1.0 - t[0] * t[0],
                1.0 - t[1] * t[1],
                1.0 - t[2] * t[2],
                1.0 - t[3] * t[3],
            ];

            let a = self.timestep * omega * 0.5;

            // Jacobian diagonal
            let x = [
                1.0 + a * sech2[0],
                1.0 + a * sech2[1],
                1.0 + a * sech2[2],
                1.0 + a * sech2[3],
            ];

            // Sub-diagonal band, plus the corner entry that closes the
            // feedback loop from stage 3 back into stage 0
            let y = [
                -2.0 * self.timestep * omega * res * (1.0 - feedback * feedback),
                a * sech2[0],
                a * sech2[1],
                a * sech2[2],
            ];

            // Closed-form inverse of the tridiagonal-plus-corner Jacobian,
            // by cofactor expansion
            let det = x[0] * x[1] * x[2] * x[3] - y[0] * y[1] * y[2] * y[3];
            let delta = [
                (r[0] * x[1] * x[2] * x[3]
                    + r[3] * y[0] * x[1] * x[2]
                    + r[2] * y[0] * y[3] * x[1]
                    + r[1] * y[0] * y[2] * y[3])
                    / det,
                (r[1] * x[0] * x[2] * x[3]
                    + r[0] * y[1] * x[2] * x[3]
                    + r[3] * y[0] * y[1] * x[2]
                    + r[2] * y[0] * y[1] * y[3])
                    / det,
                (r[2] * x[0] * x[1] * x[3]
                    + r[1] * y[2] * x[0] * x[3]
                    + r[0] * y[1] * y[2] * x[3]
                    + r[3] * y[0] * y[1] * y[2])
                    / det,
                (r[3] * x[0] * x[1] * x[2]
                    + r[2] * y[3] * x[0] * x[1]
                    + r[1] * y[2] * y[3] * x[0]
                    + r[0] * y[1] * y[2] * y[3])
                    / det,
            ];

            next_guess = [
                guess[0] - delta[0],
                guess[1] - delta[1],
                guess[2] - delta[2],
                guess[3] - delta[3],
            ];

            iters += 1;
            let step = (next_guess[0] - guess[0]).abs()
                + (next_guess[1] - guess[1]).abs()
                + (next_guess[2] - guess[2]).abs()
                + (next_guess[3] - guess[3]).abs();
            if step <= NEWTON_EPSILON || iters >= NEWTON_MAX_ITERS {
                break;
            }
        }

        self.state = next_guess;
        self.prev_sample = sample;
        self.state[3] * self.output_gain
    }
}
