//! Direct bridge: hand-declared C ABI entry points
//!
//! The exported functions are what a foreign runtime binds to directly.
//! [`DirectBridge`] calls them through `extern "C"` function pointers,
//! paying the same copy-in / copy-out cost a foreign caller would.

use crate::ffi_bounds::{check_buffer_size, slice_from_raw};
use crate::ffi_error::{FFIError, codes};
use crate::runtime::{BridgeState, InnerKernel};
use std::sync::Arc;
use vc_core::{BackendId, ByteBuffer, DifferenceKernel, VcResult, output_len};
use vc_dsp::{difference_scalar, difference_simd};

/// Native subtract entry point: `(a, a_len, b, b_len, out, out_len) -> status`.
/// Status 0 means success, anything else is an [`FFIError::full_code`].
pub type SubTwoBytearrayFn =
    unsafe extern "C" fn(*const u8, usize, *const u8, usize, *mut *mut u8, *mut usize) -> u32;

/// Releases a buffer returned by a [`SubTwoBytearrayFn`]
pub type FreeBytearrayFn = unsafe extern "C" fn(*mut u8, usize);

// ═══════════════════════════════════════════════════════════════════════════════
// C FFI FUNCTIONS
// ═══════════════════════════════════════════════════════════════════════════════

/// Subtract `b` from `a` (mod 256) with the SIMD kernel.
///
/// On success `*out_ptr`/`*out_len` describe a new buffer the caller must
/// release with [`vc_free_bytearray`].
///
/// # Safety
/// `a_ptr`/`b_ptr` must be null (with zero length) or point to `a_len`/`b_len`
/// readable bytes. `out_ptr` and `out_len` must be valid for writes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn vc_sub_two_bytearray(
    a_ptr: *const u8,
    a_len: usize,
    b_ptr: *const u8,
    b_len: usize,
    out_ptr: *mut *mut u8,
    out_len: *mut usize,
) -> u32 {
    unsafe { sub_two_bytearray_with(difference_simd, a_ptr, a_len, b_ptr, b_len, out_ptr, out_len) }
}

/// Same contract as [`vc_sub_two_bytearray`], computed without SIMD.
///
/// # Safety
/// See [`vc_sub_two_bytearray`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn vc_sub_two_bytearray_scalar(
    a_ptr: *const u8,
    a_len: usize,
    b_ptr: *const u8,
    b_len: usize,
    out_ptr: *mut *mut u8,
    out_len: *mut usize,
) -> u32 {
    unsafe {
        sub_two_bytearray_with(difference_scalar, a_ptr, a_len, b_ptr, b_len, out_ptr, out_len)
    }
}

/// Free a buffer returned by one of the subtract entry points
///
/// # Safety
/// `ptr`/`len` must come from a successful subtract call and must not be
/// freed twice.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn vc_free_bytearray(ptr: *mut u8, len: usize) {
    if ptr.is_null() {
        return;
    }
    // SAFETY: ptr/len were produced by Box::into_raw on a Box<[u8]> of len bytes
    drop(unsafe { Box::from_raw(std::ptr::slice_from_raw_parts_mut(ptr, len)) });
}

unsafe fn sub_two_bytearray_with(
    kernel: fn(&[u8], &[u8]) -> Vec<u8>,
    a_ptr: *const u8,
    a_len: usize,
    b_ptr: *const u8,
    b_len: usize,
    out_ptr: *mut *mut u8,
    out_len: *mut usize,
) -> u32 {
    if out_ptr.is_null() || out_len.is_null() {
        return FFIError::invalid_input(codes::NULL_OUTPUT, "output pointers must not be null")
            .full_code();
    }

    let a = match unsafe { slice_from_raw(a_ptr, a_len) } {
        Ok(slice) => slice,
        Err(err) => return err.with_context("a").full_code(),
    };
    let b = match unsafe { slice_from_raw(b_ptr, b_len) } {
        Ok(slice) => slice,
        Err(err) => return err.with_context("b").full_code(),
    };

    let result = kernel(a, b).into_boxed_slice();
    let len = result.len();
    // SAFETY: both out pointers were checked non-null above
    unsafe {
        *out_ptr = Box::into_raw(result) as *mut u8;
        *out_len = len;
    }
    0
}

// ═══════════════════════════════════════════════════════════════════════════════
// ADAPTER
// ═══════════════════════════════════════════════════════════════════════════════

/// Adapter invoking the native entry point directly
#[derive(Clone)]
pub struct DirectBridge {
    entry: SubTwoBytearrayFn,
    free: FreeBytearrayFn,
    state: Arc<BridgeState>,
}

impl DirectBridge {
    pub(crate) fn new(state: Arc<BridgeState>) -> Self {
        let entry: SubTwoBytearrayFn = match state.config().inner {
            InnerKernel::Vector => vc_sub_two_bytearray,
            InnerKernel::Scalar => vc_sub_two_bytearray_scalar,
        };
        Self {
            entry,
            free: vc_free_bytearray,
            state,
        }
    }

    /// Rebind this adapter to other entry points (e.g. a differently built
    /// native library).
    pub fn with_entry_points(mut self, entry: SubTwoBytearrayFn, free: FreeBytearrayFn) -> Self {
        self.entry = entry;
        self.free = free;
        self
    }
}

impl DifferenceKernel for DirectBridge {
    fn id(&self) -> BackendId {
        BackendId::ForeignDirect
    }

    fn difference(&self, a: &[u8], b: &[u8]) -> VcResult<ByteBuffer> {
        self.state.ensure_available(BackendId::ForeignDirect)?;

        // Copy-in: the native side gets its own pinned copies of the arguments
        let pinned_a: Box<[u8]> = Box::from(a);
        let pinned_b: Box<[u8]> = Box::from(b);
        let mut out_ptr: *mut u8 = std::ptr::null_mut();
        let mut out_len: usize = 0;

        // SAFETY: pinned buffers outlive the call, out params point to locals
        let status = unsafe {
            (self.entry)(
                pinned_a.as_ptr(),
                pinned_a.len(),
                pinned_b.as_ptr(),
                pinned_b.len(),
                &mut out_ptr,
                &mut out_len,
            )
        };
        if status != 0 {
            return Err(FFIError::from_full_code(status)
                .with_context("vc_sub_two_bytearray")
                .into_vc_error(BackendId::ForeignDirect));
        }

        let expected = output_len(a, b);
        if let Err(err) = check_buffer_size(expected, out_len).to_ffi_result() {
            // SAFETY: the pair came from the successful call above
            unsafe { (self.free)(out_ptr, out_len) };
            return Err(err.into_vc_error(BackendId::ForeignDirect));
        }

        // Copy-out into a buffer owned by this side, then release the native one
        // SAFETY: out_ptr holds out_len bytes written by the entry point
        let copied = unsafe { slice_from_raw(out_ptr, out_len) }
            .map(<[u8]>::to_vec)
            .map_err(|err| err.into_vc_error(BackendId::ForeignDirect))?;
        unsafe { (self.free)(out_ptr, out_len) };

        Ok(ByteBuffer::from(copied))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ffi_error::FFIErrorCategory;
    use crate::runtime::BridgeConfig;

    fn bridge(inner: InnerKernel) -> DirectBridge {
        DirectBridge::new(Arc::new(BridgeState::new(BridgeConfig {
            inner,
            ..Default::default()
        })))
    }

    #[test]
    fn test_entry_point_roundtrip() {
        let a = [5u8, 10, 250];
        let b = [3u8, 20, 10, 99];
        let mut out_ptr = std::ptr::null_mut();
        let mut out_len = 0usize;
        let status = unsafe {
            vc_sub_two_bytearray(a.as_ptr(), a.len(), b.as_ptr(), b.len(), &mut out_ptr, &mut out_len)
        };
        assert_eq!(status, 0);
        assert_eq!(out_len, 3);
        let out = unsafe { std::slice::from_raw_parts(out_ptr, out_len) }.to_vec();
        unsafe { vc_free_bytearray(out_ptr, out_len) };
        assert_eq!(out, vec![2, 246, 240]);
    }

    #[test]
    fn test_entry_point_rejects_null_input() {
        let b = [1u8];
        let mut out_ptr = std::ptr::null_mut();
        let mut out_len = 0usize;
        let status = unsafe {
            vc_sub_two_bytearray(std::ptr::null(), 4, b.as_ptr(), 1, &mut out_ptr, &mut out_len)
        };
        let err = FFIError::from_full_code(status);
        assert_eq!(err.category, FFIErrorCategory::InvalidInput);
        assert_eq!(err.code, codes::NULL_INPUT);
        assert!(out_ptr.is_null());
    }

    #[test]
    fn test_entry_point_rejects_null_output() {
        let a = [1u8];
        let status = unsafe {
            vc_sub_two_bytearray_scalar(
                a.as_ptr(),
                1,
                a.as_ptr(),
                1,
                std::ptr::null_mut(),
                std::ptr::null_mut(),
            )
        };
        assert_eq!(FFIError::from_full_code(status).code, codes::NULL_OUTPUT);
    }

    #[test]
    fn test_empty_result_is_freeable() {
        let b = [1u8, 2, 3];
        let mut out_ptr = std::ptr::null_mut();
        let mut out_len = 7usize;
        let status = unsafe {
            vc_sub_two_bytearray(std::ptr::null(), 0, b.as_ptr(), 3, &mut out_ptr, &mut out_len)
        };
        assert_eq!(status, 0);
        assert_eq!(out_len, 0);
        unsafe { vc_free_bytearray(out_ptr, out_len) };
    }

    #[test]
    fn test_adapter_both_inner_kernels() {
        for inner in [InnerKernel::Vector, InnerKernel::Scalar] {
            let out = bridge(inner).difference(&[5, 10, 250], &[3, 20, 10]).unwrap();
            assert_eq!(out, vec![2u8, 246, 240]);
        }
    }

    unsafe extern "C" fn short_entry(
        _a: *const u8,
        _a_len: usize,
        _b: *const u8,
        _b_len: usize,
        out_ptr: *mut *mut u8,
        out_len: *mut usize,
    ) -> u32 {
        let result: Box<[u8]> = Box::from(&[0u8][..]);
        unsafe {
            *out_len = result.len();
            *out_ptr = Box::into_raw(result) as *mut u8;
        }
        0
    }

    #[test]
    fn test_adapter_rejects_wrong_result_size() {
        let adapter = bridge(InnerKernel::Vector).with_entry_points(short_entry, vc_free_bytearray);
        let err = adapter.difference(&[1, 2, 3], &[1, 2, 3]).unwrap_err();
        assert!(err.is_boundary());
        assert!(err.to_string().contains("expected 3"));
    }
}
