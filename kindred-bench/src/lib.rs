//! Benchmark-only crate. The interesting code lives in
//! `benches/memory_core.rs`.
