//! Benchmarks for real-world scenarios.

mod engine;

pub use engine::bench_engine;
