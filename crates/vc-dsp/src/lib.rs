//! vc-dsp: Difference kernels for VocalCut
//!
//! ## Modules
//! - `scalar` - byte-at-a-time reference kernel (the correctness oracle)
//! - `simd` - lane-batched kernel with runtime SIMD dispatch (SSE2/AVX2/NEON)
//!
//! Both are exposed as [`DifferenceKernel`] backends.

pub mod scalar;
pub mod simd;

pub use scalar::{difference_scalar, difference_scalar_into};
pub use simd::{
    KernelDispatch, SimdLevel, detect_simd_level, difference_simd, difference_simd_with,
    simd_level, supported_levels,
};

use vc_core::{BackendId, ByteBuffer, DifferenceKernel, VcResult};

/// Reference backend, one byte at a time
#[derive(Debug, Clone, Copy, Default)]
pub struct ScalarBackend;

impl ScalarBackend {
    pub fn new() -> Self {
        Self
    }
}

impl DifferenceKernel for ScalarBackend {
    fn id(&self) -> BackendId {
        BackendId::Scalar
    }

    fn difference(&self, a: &[u8], b: &[u8]) -> VcResult<ByteBuffer> {
        Ok(ByteBuffer::from(difference_scalar(a, b)))
    }
}

/// Lane-batched backend bound to one SIMD dispatch table
#[derive(Debug, Clone, Copy)]
pub struct VectorBackend {
    dispatch: KernelDispatch,
}

impl VectorBackend {
    /// Use the best level the CPU offers
    pub fn new() -> Self {
        Self {
            dispatch: *KernelDispatch::get(),
        }
    }

    /// Pin a specific level; unsupported levels fall back to scalar
    pub fn with_level(level: SimdLevel) -> Self {
        Self {
            dispatch: KernelDispatch::for_level(level),
        }
    }

    pub fn level(&self) -> SimdLevel {
        self.dispatch.level
    }

    /// Lane width L in bytes
    pub fn lane_width(&self) -> usize {
        self.dispatch.lane_width()
    }
}

impl Default for VectorBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl DifferenceKernel for VectorBackend {
    fn id(&self) -> BackendId {
        BackendId::Vector
    }

    fn difference(&self, a: &[u8], b: &[u8]) -> VcResult<ByteBuffer> {
        Ok(ByteBuffer::from(self.dispatch.run(a, b)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_ids() {
        assert_eq!(ScalarBackend::new().id(), BackendId::Scalar);
        assert_eq!(VectorBackend::new().id(), BackendId::Vector);
    }

    #[test]
    fn test_backends_agree_on_scenario() {
        let a = [5u8, 10, 250];
        let b = [3u8, 20, 10];
        let scalar = ScalarBackend::new().difference(&a, &b).unwrap();
        let vector = VectorBackend::new().difference(&a, &b).unwrap();
        assert_eq!(scalar, vec![2u8, 246, 240]);
        assert_eq!(scalar, vector);
    }

    #[test]
    fn test_forced_scalar_level() {
        let backend = VectorBackend::with_level(SimdLevel::Scalar);
        assert_eq!(backend.level(), SimdLevel::Scalar);
        assert_eq!(backend.lane_width(), 1);
        assert_eq!(backend.difference(&[0], &[1]).unwrap(), vec![255u8]);
    }
}
