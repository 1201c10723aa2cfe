//! Per-mode latency and weight-memory comparison.

pub mod benchmark;

pub use benchmark::{argmax, print_report, run_benchmark, BenchmarkResult, LayerMetrics, ModeMetrics};
