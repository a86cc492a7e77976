pub mod dsp;
pub mod engine; // Block orchestration: voices -> filters -> stereo output
pub mod voices; // Voice struct and the static drone bank

/// Largest block size the engine's owned buffers are sized for.
pub const MAX_BLOCK_SIZE: usize = 2048;
