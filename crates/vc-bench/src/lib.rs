//! # vc-bench
//!
//! Benchmark harness for the four VocalCut difference backends.
//!
//! Every [`BenchmarkHarness::run`] times exactly one backend call and
//! appends one [`BenchmarkEntry`] to the shared [`ResultLog`]. Failed runs
//! are returned to the caller and never recorded.
//!
//! ## Running Benchmarks
//!
//! ```bash
//! # Criterion comparison of all backends
//! cargo bench -p vc-bench
//!
//! # Specific group
//! cargo bench -p vc-bench -- backends
//! ```

pub mod config;
pub mod generators;
pub mod harness;
pub mod results;

pub use config::HarnessConfig;
pub use generators::*;
pub use harness::{BenchmarkHarness, RunOutcome};
pub use results::{BenchmarkEntry, ResultLog};
