//! TUI for the drone: oscilloscope and spectrum views of the live output.

mod spectrum;
mod waveform;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    DefaultTerminal, Frame,
};
use rtrb::Consumer;
use std::time::{Duration, Instant};

use spectrum::{render_spectrum, SpectrumAnalyzer};
use waveform::render_waveform;

/// Samples shown in the oscilloscope (also the FFT size).
const VIS_BUFFER_SIZE: usize = 1024;

pub struct UiApp {
    audio_rx: Consumer<f32>,
    sample_rate: f32,
    /// Rolling window of the most recent tap samples
    audio_buffer: Vec<f32>,
    spectrum: SpectrumAnalyzer,
    started_at: Instant,
    should_quit: bool,
}

impl UiApp {
    pub fn new(audio_rx: Consumer<f32>, sample_rate: f32) -> Self {
        Self {
            audio_rx,
            sample_rate,
            audio_buffer: vec![0.0; VIS_BUFFER_SIZE],
            spectrum: SpectrumAnalyzer::new(VIS_BUFFER_SIZE, sample_rate),
            started_at: Instant::now(),
            should_quit: false,
        }
    }

    /// Run the event loop at roughly 60 fps until the user quits.
    pub fn run(mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_audio();
            self.spectrum.update(&self.audio_buffer);

            terminal.draw(|frame| self.render(frame))?;

            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        Ok(())
    }

    /// Drain the tap, keeping the last VIS_BUFFER_SIZE samples.
    fn poll_audio(&mut self) {
        let mut received = 0;
        while let Ok(sample) = self.audio_rx.pop() {
            self.audio_buffer.push(sample);
            received += 1;
        }
        if received > 0 && self.audio_buffer.len() > VIS_BUFFER_SIZE {
            let excess = self.audio_buffer.len() - VIS_BUFFER_SIZE;
            self.audio_buffer.drain(0..excess);
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            _ => {}
        }
    }

    fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(8),    // Waveform
                Constraint::Length(10), // Spectrum
                Constraint::Length(1), // Help bar
            ])
            .split(frame.area());

        self.render_header(frame, chunks[0]);
        render_waveform(frame, chunks[1], &self.audio_buffer);
        render_spectrum(frame, chunks[2], self.spectrum.data());

        let help = Paragraph::new(" [Q] Quit").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[3]);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().title(" droner ").borders(Borders::ALL);

        let peak = self
            .audio_buffer
            .iter()
            .fold(0.0f32, |acc, &x| acc.max(x.abs()));
        let rms = (self.audio_buffer.iter().map(|&x| x * x).sum::<f32>()
            / self.audio_buffer.len() as f32)
            .sqrt();
        let elapsed = self.started_at.elapsed().as_secs();

        let line = Line::from(vec![
            Span::styled(
                format!(" {:.1}kHz  ", self.sample_rate / 1000.0),
                Style::default().fg(Color::Cyan),
            ),
            Span::styled(
                format!("{:02}:{:02}  ", elapsed / 60, elapsed % 60),
                Style::default().fg(Color::White),
            ),
            Span::styled(
                format!("Peak: {:.2}  RMS: {:.2}", peak, rms),
                Style::default().fg(Color::Magenta),
            ),
        ]);

        frame.render_widget(Paragraph::new(line).block(block), area);
    }
}
