//! Waveform oscilloscope widget
//!
//! The drone never pauses, so an unanchored trace scrolls and smears. The
//! view triggers on the first near-zero sample and shows half the capture
//! window from there, which holds the slow waveform still between frames.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

/// Samples within this of zero count as a trigger point.
const TRIGGER_THRESHOLD: f32 = 0.01;

/// Index of the first near-zero sample, or 0 when the buffer never comes
/// close enough (silence triggers at the start, loud noise stays unanchored).
fn trigger_offset(audio_buffer: &[f32]) -> usize {
    audio_buffer
        .iter()
        .position(|s| s.abs() <= TRIGGER_THRESHOLD)
        .unwrap_or(0)
}

pub fn render_waveform(frame: &mut Frame, area: Rect, audio_buffer: &[f32]) {
    let block = Block::default().title(" Waveform ").borders(Borders::ALL);

    let start = trigger_offset(audio_buffer);
    let end = (start + audio_buffer.len() / 2).min(audio_buffer.len());
    let window = &audio_buffer[start..end];

    let data: Vec<(f64, f64)> = window
        .iter()
        .enumerate()
        .map(|(i, &sample)| (i as f64 / window.len().max(1) as f64, sample as f64))
        .collect();

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan))
        .data(&data);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, 1.0])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([-1.0, 1.0])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
