//! droner - endless drone synthesizer with a terminal visualizer
//!
//! Run with: cargo run

mod app;
mod ui;

use app::DronerApp;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    DronerApp::new().run()
}
