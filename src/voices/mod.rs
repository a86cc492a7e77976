//! The drone voice bank: one oscillator per voice, up to four modulation
//! chains, and a routing tag that decides which filter (if any) hears it.
//!
//! Voices are configuration, not polymorphism: every voice is the same
//! struct built from a [`VoiceSpec`] record, and the whole bank is a list
//! of those records constructed once at engine start.

mod bank;
mod voice;

pub use bank::{drone_filters, drone_voices, FilterSpec, LfoSpec, VoiceSpec};
pub use voice::{FilterRouting, Voice};
