//! SIMD Dispatch for the byte difference kernel
//!
//! Runtime SIMD feature detection with a static dispatch table.
//! Supports AVX2, SSE2 and NEON (ARM).
//!
//! # Design
//! - Detection happens once, on first use
//! - The dispatch table holds plain function pointers
//! - Full lanes go through one vector subtract, the `n mod L` tail through
//!   the scalar path
//! - Graceful fallback to scalar code

use crate::scalar::{difference_scalar_into, difference_tail};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

// ============ SIMD Level Detection ============

/// Detected SIMD capability level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum SimdLevel {
    /// No SIMD, scalar fallback
    Scalar = 0,
    /// SSE2 (128-bit, 16 bytes)
    Sse2 = 1,
    /// AVX2 (256-bit, 32 bytes)
    Avx2 = 2,
    /// ARM NEON (128-bit, 16 bytes)
    Neon = 3,
}

impl SimdLevel {
    pub const ALL: [SimdLevel; 4] = [
        SimdLevel::Scalar,
        SimdLevel::Sse2,
        SimdLevel::Avx2,
        SimdLevel::Neon,
    ];

    /// Lane width in bytes
    pub const fn width(self) -> usize {
        match self {
            SimdLevel::Scalar => 1,
            SimdLevel::Sse2 | SimdLevel::Neon => 16,
            SimdLevel::Avx2 => 32,
        }
    }

    /// Get human-readable name
    pub const fn name(self) -> &'static str {
        match self {
            SimdLevel::Scalar => "Scalar",
            SimdLevel::Sse2 => "SSE2",
            SimdLevel::Avx2 => "AVX2",
            SimdLevel::Neon => "NEON",
        }
    }

    /// Whether the running CPU can execute this level
    pub fn is_supported(self) -> bool {
        match self {
            SimdLevel::Scalar => true,
            #[cfg(target_arch = "x86_64")]
            SimdLevel::Sse2 => is_x86_feature_detected!("sse2"),
            #[cfg(target_arch = "x86_64")]
            SimdLevel::Avx2 => is_x86_feature_detected!("avx2"),
            #[cfg(target_arch = "aarch64")]
            SimdLevel::Neon => true,
            #[allow(unreachable_patterns)]
            _ => false,
        }
    }
}

/// Widest lane width any level uses
pub const MAX_LANE_WIDTH: usize = 32;

/// Global SIMD level detection (computed once)
static DETECTED_SIMD_LEVEL: OnceLock<SimdLevel> = OnceLock::new();

/// Detect the best available SIMD level
pub fn detect_simd_level() -> SimdLevel {
    *DETECTED_SIMD_LEVEL.get_or_init(|| {
        let level = probe_simd_level();
        log::debug!(
            "SIMD level detected: {} ({} byte lanes)",
            level.name(),
            level.width()
        );
        level
    })
}

fn probe_simd_level() -> SimdLevel {
    #[cfg(target_arch = "x86_64")]
    {
        if is_x86_feature_detected!("avx2") {
            return SimdLevel::Avx2;
        }
        if is_x86_feature_detected!("sse2") {
            return SimdLevel::Sse2;
        }
        SimdLevel::Scalar
    }

    #[cfg(target_arch = "aarch64")]
    {
        // NEON is always available on aarch64
        SimdLevel::Neon
    }

    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    {
        SimdLevel::Scalar
    }
}

/// Get the current SIMD level (cached)
#[inline]
pub fn simd_level() -> SimdLevel {
    detect_simd_level()
}

/// All levels the running CPU supports, scalar first
pub fn supported_levels() -> Vec<SimdLevel> {
    SimdLevel::ALL
        .into_iter()
        .filter(|level| level.is_supported())
        .collect()
}

// ============ Dispatch Table ============

/// Function pointer type for the difference kernel.
///
/// Writes `a[i] - b[i]` into `out[i]` for `i < out.len()`; both inputs must
/// be at least `out.len()` long.
pub type DifferenceFn = fn(&[u8], &[u8], &mut [u8]);

/// Dispatch table for the difference kernel
#[derive(Debug, Clone, Copy)]
pub struct KernelDispatch {
    /// Elementwise wraparound subtraction
    pub difference: DifferenceFn,
    /// SIMD level used
    pub level: SimdLevel,
}

impl KernelDispatch {
    /// Get the global dispatch table
    pub fn get() -> &'static Self {
        static DISPATCH: OnceLock<KernelDispatch> = OnceLock::new();
        DISPATCH.get_or_init(|| Self::for_level(detect_simd_level()))
    }

    /// Create dispatch table for a specific SIMD level.
    ///
    /// Levels the CPU cannot execute resolve to the scalar table.
    pub fn for_level(level: SimdLevel) -> Self {
        if !level.is_supported() {
            log::warn!(
                "SIMD level {} not supported on this CPU, using scalar",
                level.name()
            );
            return Self::for_level(SimdLevel::Scalar);
        }

        match level {
            SimdLevel::Avx2 => Self {
                difference: difference_avx2,
                level,
            },
            SimdLevel::Sse2 => Self {
                difference: difference_sse2,
                level,
            },
            SimdLevel::Neon => Self {
                difference: difference_neon,
                level,
            },
            SimdLevel::Scalar => Self {
                difference: difference_scalar_into,
                level,
            },
        }
    }

    /// Lane width of this table
    #[inline]
    pub fn lane_width(&self) -> usize {
        self.level.width()
    }

    /// Allocate the output and run the kernel over the common prefix
    pub fn run(&self, a: &[u8], b: &[u8]) -> Vec<u8> {
        let len = a.len().min(b.len());
        let mut out = vec![0u8; len];
        (self.difference)(&a[..len], &b[..len], &mut out);
        out
    }
}

// ============ x86_64 SIMD Implementations ============

#[cfg(target_arch = "x86_64")]
mod x86_impl {
    use super::difference_tail;
    use std::arch::x86_64::*;

    // --- SSE2 (128-bit, 16 bytes) ---

    #[target_feature(enable = "sse2")]
    pub unsafe fn difference_sse2_impl(a: &[u8], b: &[u8], out: &mut [u8]) {
        const LANES: usize = 16;
        let len = out.len();
        debug_assert!(a.len() >= len && b.len() >= len);
        let simd_len = len - (len % LANES);
        let a_ptr = a.as_ptr();
        let b_ptr = b.as_ptr();
        let out_ptr = out.as_mut_ptr();

        for i in (0..simd_len).step_by(LANES) {
            // SAFETY: i + LANES <= simd_len <= len, and both inputs hold at least len bytes
            unsafe {
                let va = _mm_loadu_si128(a_ptr.add(i) as *const __m128i);
                let vb = _mm_loadu_si128(b_ptr.add(i) as *const __m128i);
                _mm_storeu_si128(out_ptr.add(i) as *mut __m128i, _mm_sub_epi8(va, vb));
            }
        }

        difference_tail(a, b, out, simd_len);
    }

    // --- AVX2 (256-bit, 32 bytes) ---

    #[target_feature(enable = "avx2")]
    pub unsafe fn difference_avx2_impl(a: &[u8], b: &[u8], out: &mut [u8]) {
        const LANES: usize = 32;
        let len = out.len();
        debug_assert!(a.len() >= len && b.len() >= len);
        let simd_len = len - (len % LANES);
        let a_ptr = a.as_ptr();
        let b_ptr = b.as_ptr();
        let out_ptr = out.as_mut_ptr();

        for i in (0..simd_len).step_by(LANES) {
            // SAFETY: i + LANES <= simd_len <= len, and both inputs hold at least len bytes
            unsafe {
                let va = _mm256_loadu_si256(a_ptr.add(i) as *const __m256i);
                let vb = _mm256_loadu_si256(b_ptr.add(i) as *const __m256i);
                _mm256_storeu_si256(out_ptr.add(i) as *mut __m256i, _mm256_sub_epi8(va, vb));
            }
        }

        difference_tail(a, b, out, simd_len);
    }
}

// ============ ARM NEON Implementations ============

#[cfg(target_arch = "aarch64")]
mod arm_impl {
    use super::difference_tail;
    use std::arch::aarch64::*;

    #[target_feature(enable = "neon")]
    pub unsafe fn difference_neon_impl(a: &[u8], b: &[u8], out: &mut [u8]) {
        const LANES: usize = 16;
        let len = out.len();
        debug_assert!(a.len() >= len && b.len() >= len);
        let simd_len = len - (len % LANES);
        let a_ptr = a.as_ptr();
        let b_ptr = b.as_ptr();
        let out_ptr = out.as_mut_ptr();

        for i in (0..simd_len).step_by(LANES) {
            // SAFETY: i + LANES <= simd_len <= len, and both inputs hold at least len bytes
            unsafe {
                let va = vld1q_u8(a_ptr.add(i));
                let vb = vld1q_u8(b_ptr.add(i));
                vst1q_u8(out_ptr.add(i), vsubq_u8(va, vb));
            }
        }

        difference_tail(a, b, out, simd_len);
    }
}

// ============ Safe Wrappers ============
// Only reachable through KernelDispatch::for_level, which checks support first.

#[cfg(target_arch = "x86_64")]
fn difference_sse2(a: &[u8], b: &[u8], out: &mut [u8]) {
    unsafe { x86_impl::difference_sse2_impl(a, b, out) }
}

#[cfg(target_arch = "x86_64")]
fn difference_avx2(a: &[u8], b: &[u8], out: &mut [u8]) {
    unsafe { x86_impl::difference_avx2_impl(a, b, out) }
}

#[cfg(target_arch = "aarch64")]
fn difference_neon(a: &[u8], b: &[u8], out: &mut [u8]) {
    unsafe { arm_impl::difference_neon_impl(a, b, out) }
}

// Fallbacks for non-native architectures

#[cfg(not(target_arch = "x86_64"))]
fn difference_sse2(a: &[u8], b: &[u8], out: &mut [u8]) {
    difference_scalar_into(a, b, out)
}

#[cfg(not(target_arch = "x86_64"))]
fn difference_avx2(a: &[u8], b: &[u8], out: &mut [u8]) {
    difference_scalar_into(a, b, out)
}

#[cfg(not(target_arch = "aarch64"))]
fn difference_neon(a: &[u8], b: &[u8], out: &mut [u8]) {
    difference_scalar_into(a, b, out)
}

// ============ Convenience Functions ============

/// Subtract using best available SIMD
#[inline]
pub fn difference_simd(a: &[u8], b: &[u8]) -> Vec<u8> {
    KernelDispatch::get().run(a, b)
}

/// Subtract using a specific SIMD level (scalar if unsupported)
pub fn difference_simd_with(level: SimdLevel, a: &[u8], b: &[u8]) -> Vec<u8> {
    KernelDispatch::for_level(level).run(a, b)
}

// ============ Tests ============
