//! Bridge runtime: one-time native initialisation and injectable handles
//!
//! The native side is initialised once per process. Each [`BridgeHandle`]
//! returned by [`BridgeRuntime::load`] carries its own open/closed flag, so
//! a handle can be torn down without touching any global state.

use crate::direct::DirectBridge;
use crate::ffi_error::{FFIError, codes};
use crate::generated::GeneratedBridge;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Instant;
use vc_core::{BackendId, DifferenceKernel, VcResult};
use vc_dsp::{SimdLevel, detect_simd_level};

/// Kernel the native side runs behind the boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InnerKernel {
    /// SIMD-dispatched kernel
    #[default]
    Vector,
    /// Native library built without SIMD
    Scalar,
}

/// Bridge configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Expose the hand-declared C ABI adapter
    pub direct_enabled: bool,
    /// Expose the generated-bridge adapter
    pub generated_enabled: bool,
    /// Kernel behind both adapters
    pub inner: InnerKernel,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            direct_enabled: true,
            generated_enabled: true,
            inner: InnerKernel::Vector,
        }
    }
}

/// Process-wide native library state
#[derive(Debug)]
pub struct NativeLibrary {
    pub simd_level: SimdLevel,
    pub loaded_at: Instant,
}

static NATIVE_LIBRARY: OnceLock<NativeLibrary> = OnceLock::new();

fn native_library() -> &'static NativeLibrary {
    NATIVE_LIBRARY.get_or_init(|| {
        let library = NativeLibrary {
            simd_level: detect_simd_level(),
            loaded_at: Instant::now(),
        };
        log::info!(
            "Native bridge library loaded (SIMD: {})",
            library.simd_level.name()
        );
        library
    })
}

/// Shared per-handle state checked before every boundary crossing
#[derive(Debug)]
pub(crate) struct BridgeState {
    open: AtomicBool,
    config: BridgeConfig,
}

impl BridgeState {
    pub(crate) fn new(config: BridgeConfig) -> Self {
        Self {
            open: AtomicBool::new(true),
            config,
        }
    }

    pub(crate) fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub(crate) fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    fn close(&self) -> bool {
        self.open.swap(false, Ordering::AcqRel)
    }

    /// Fail with a boundary error when the adapter cannot be reached
    pub(crate) fn ensure_available(&self, backend: BackendId) -> VcResult<()> {
        if !self.is_open() {
            return Err(FFIError::invalid_state(codes::SHUT_DOWN, "bridge has been shut down")
                .with_context(backend.name())
                .into_vc_error(backend));
        }

        let enabled = match backend {
            BackendId::ForeignDirect => self.config.direct_enabled,
            BackendId::ForeignGenerated => self.config.generated_enabled,
            _ => false,
        };
        if !enabled {
            return Err(
                FFIError::invalid_state(codes::DISABLED, "adapter disabled by configuration")
                    .with_context(backend.name())
                    .into_vc_error(backend),
            );
        }

        Ok(())
    }
}

/// Entry point for bringing the bridge up
pub struct BridgeRuntime;

impl BridgeRuntime {
    /// Initialise the native side (once per process) and build a handle.
    pub fn load(config: BridgeConfig) -> BridgeHandle {
        let library = native_library();
        log::debug!(
            "Bridge handle created (inner: {:?}, native up for {:?})",
            config.inner,
            library.loaded_at.elapsed()
        );

        let state = Arc::new(BridgeState::new(config));
        BridgeHandle {
            direct: DirectBridge::new(Arc::clone(&state)),
            generated: GeneratedBridge::new(Arc::clone(&state)),
            state,
        }
    }

    /// Whether native initialisation has already happened
    pub fn is_loaded() -> bool {
        NATIVE_LIBRARY.get().is_some()
    }
}

/// Initialised pair of foreign adapters, injected into the harness
#[derive(Clone)]
pub struct BridgeHandle {
    state: Arc<BridgeState>,
    direct: DirectBridge,
    generated: GeneratedBridge,
}

impl BridgeHandle {
    pub fn config(&self) -> &BridgeConfig {
        self.state.config()
    }

    pub fn direct(&self) -> &DirectBridge {
        &self.direct
    }

    pub fn generated(&self) -> &GeneratedBridge {
        &self.generated
    }

    /// Adapter for a foreign backend id, `None` for in-process ids
    pub fn kernel(&self, id: BackendId) -> Option<&dyn DifferenceKernel> {
        match id {
            BackendId::ForeignDirect => Some(&self.direct),
            BackendId::ForeignGenerated => Some(&self.generated),
            BackendId::Scalar | BackendId::Vector => None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    /// Tear both adapters down; later calls fail with a boundary error.
    /// Clones of this handle share the same state.
    pub fn shutdown(&self) {
        if self.state.close() {
            log::info!("Bridge handle shut down");
        }
    }
}

impl std::fmt::Debug for BridgeHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeHandle")
            .field("config", self.config())
            .field("open", &self.is_open())
            .finish()
    }
}
