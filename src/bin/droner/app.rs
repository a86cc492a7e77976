//! Audio setup: cpal stream driving the engine, with a lock-free tap
//! feeding the visualizer.

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::RingBuffer;

use droner_dsp::{engine::DroneEngine, MAX_BLOCK_SIZE};

use super::ui::UiApp;

/// Capacity of the audio tap ring buffer, in mono samples. Sized for a few
/// UI frames of latency at 48 kHz before old samples get dropped.
const TAP_CAPACITY: usize = 8192;

pub struct DronerApp;

impl DronerApp {
    pub fn new() -> Self {
        Self
    }

    /// Open the default output device, run the engine in its callback, and
    /// hand the terminal to the visualizer until the user quits.
    pub fn run(self) -> EyreResult<()> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;
        if channels == 0 {
            return Err(eyre!("output device reports zero channels"));
        }

        let (mut tap_tx, tap_rx) = RingBuffer::<f32>::new(TAP_CAPACITY);

        let mut engine = DroneEngine::new(sample_rate, MAX_BLOCK_SIZE);
        let mut left = vec![0.0f32; MAX_BLOCK_SIZE];
        let mut right = vec![0.0f32; MAX_BLOCK_SIZE];

        let stream = device
            .build_output_stream(
                &config.into(),
                move |data: &mut [f32], _| {
                    let total_frames = data.len() / channels;
                    let mut frames_written = 0;

                    while frames_written < total_frames {
                        let frames = (total_frames - frames_written).min(MAX_BLOCK_SIZE);

                        let left = &mut left[..frames];
                        let right = &mut right[..frames];
                        left.fill(0.0);
                        right.fill(0.0);
                        engine.process_block(left, right);

                        let out_off = frames_written * channels;
                        for i in 0..frames {
                            let frame = &mut data[out_off + i * channels..][..channels];
                            frame[0] = left[i];
                            if channels > 1 {
                                frame[1] = right[i];
                                for s in &mut frame[2..] {
                                    *s = 0.0;
                                }
                            }

                            // Tap a mono mix for the UI; drop when it lags
                            let _ = tap_tx.push(0.5 * (left[i] + right[i]));
                        }

                        frames_written += frames;
                    }
                },
                |err| eprintln!("audio error: {}", err),
                None,
            )
            .wrap_err("failed to build output stream")?;

        stream.play().wrap_err("failed to start output stream")?;

        let mut terminal = ratatui::init();
        let result = UiApp::new(tap_rx, sample_rate).run(&mut terminal);
        ratatui::restore();
        result
    }
}

impl Default for DronerApp {
    fn default() -> Self {
        Self::new()
    }
}
