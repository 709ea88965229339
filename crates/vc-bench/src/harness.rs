//! Single-shot benchmark harness

use crate::config::HarnessConfig;
use crate::results::{BenchmarkEntry, ResultLog};
use std::time::Instant;
use vc_bridge::{BridgeHandle, BridgeRuntime};
use vc_core::{BackendId, ByteBuffer, DifferenceKernel, VcError, VcResult};
use vc_dsp::{ScalarBackend, VectorBackend};

/// Result of one successful run
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Entry appended to the log
    pub entry: BenchmarkEntry,
    /// Buffer produced by the backend, owned by the caller
    pub output: ByteBuffer,
}

/// Times backend calls and records them in a [`ResultLog`].
///
/// The in-process backends are always present. The foreign ones are only
/// reachable once a [`BridgeHandle`] has been injected.
#[derive(Debug)]
pub struct BenchmarkHarness {
    scalar: ScalarBackend,
    vector: VectorBackend,
    bridge: Option<BridgeHandle>,
    log: ResultLog,
}

impl BenchmarkHarness {
    /// Harness with in-process backends only and an unbounded log
    pub fn new() -> Self {
        Self {
            scalar: ScalarBackend::new(),
            vector: VectorBackend::new(),
            bridge: None,
            log: ResultLog::new(),
        }
    }

    /// Build everything a config describes, loading the bridge runtime
    pub fn from_config(config: &HarnessConfig) -> VcResult<Self> {
        config.validate()?;

        let vector = match config.force_simd_level {
            Some(level) => VectorBackend::with_level(level),
            None => VectorBackend::new(),
        };
        let log = match config.log_capacity {
            Some(capacity) => ResultLog::with_capacity(capacity),
            None => ResultLog::new(),
        };

        log::info!(
            "Harness ready (vector: {}, log capacity: {:?})",
            vector.level().name(),
            config.log_capacity
        );

        Ok(Self {
            scalar: ScalarBackend::new(),
            vector,
            bridge: Some(BridgeRuntime::load(config.bridge.clone())),
            log,
        })
    }

    /// Inject an initialised bridge for the foreign backends
    pub fn with_bridge(mut self, bridge: BridgeHandle) -> Self {
        self.bridge = Some(bridge);
        self
    }

    pub fn with_vector(mut self, vector: VectorBackend) -> Self {
        self.vector = vector;
        self
    }

    pub fn with_log(mut self, log: ResultLog) -> Self {
        self.log = log;
        self
    }

    pub fn bridge(&self) -> Option<&BridgeHandle> {
        self.bridge.as_ref()
    }

    pub fn vector(&self) -> &VectorBackend {
        &self.vector
    }

    pub fn log(&self) -> &ResultLog {
        &self.log
    }

    /// Implementation registered for `backend`
    pub fn kernel(&self, backend: BackendId) -> VcResult<&dyn DifferenceKernel> {
        match backend {
            BackendId::Scalar => Ok(&self.scalar),
            BackendId::Vector => Ok(&self.vector),
            BackendId::ForeignDirect | BackendId::ForeignGenerated => self
                .bridge
                .as_ref()
                .and_then(|bridge| bridge.kernel(backend))
                .ok_or(VcError::UnsupportedBackend(backend)),
        }
    }

    /// Run `backend` once on `a - b`, timing exactly that call.
    ///
    /// On failure nothing is appended and the error is returned as is.
    pub fn run(&self, backend: BackendId, a: &[u8], b: &[u8]) -> VcResult<RunOutcome> {
        let kernel = self.kernel(backend)?;

        let start = Instant::now();
        let result = kernel.difference(a, b);
        let elapsed = start.elapsed();

        let output = match result {
            Ok(output) => output,
            Err(err) => {
                log::warn!("{} run failed after {:?}: {}", backend.label(), elapsed, err);
                return Err(err);
            }
        };

        let entry = self
            .log
            .append(backend, elapsed, output.len(), output.checksum());
        log::info!("{}", entry.display_line());

        Ok(RunOutcome { entry, output })
    }

    /// Run every backend in [`BackendId::ALL`] order, stopping at the first
    /// failure.
    pub fn run_all(&self, a: &[u8], b: &[u8]) -> VcResult<Vec<RunOutcome>> {
        BackendId::ALL
            .iter()
            .map(|&backend| self.run(backend, a, b))
            .collect()
    }
}

impl Default for BenchmarkHarness {
    fn default() -> Self {
        Self::new()
    }
}
