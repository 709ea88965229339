/// VocalCut FFI Bounds Checker
///
/// Validates raw pointer/length pairs before they are turned into slices,
/// and the size of buffers handed back across the boundary.
use crate::ffi_error::{FFIError, codes};
use std::fmt;

/// Result type for bounds checking operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundsCheckResult {
    /// Pointer/size pair is valid
    Valid,
    /// Null pointer paired with a non-zero length
    NullPointer { len: usize },
    /// Buffer size mismatch
    BufferSizeMismatch { expected: usize, actual: usize },
}

impl fmt::Display for BoundsCheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundsCheckResult::Valid => write!(f, "Valid"),
            BoundsCheckResult::NullPointer { len } => {
                write!(f, "Null pointer with length {}", len)
            }
            BoundsCheckResult::BufferSizeMismatch { expected, actual } => {
                write!(f, "Buffer size mismatch: expected {}, got {}", expected, actual)
            }
        }
    }
}

impl BoundsCheckResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, BoundsCheckResult::Valid)
    }

    /// Convert to an FFI error for propagation
    pub fn to_ffi_result(self) -> Result<(), FFIError> {
        match self {
            BoundsCheckResult::Valid => Ok(()),
            BoundsCheckResult::NullPointer { .. } => {
                Err(FFIError::invalid_input(codes::NULL_INPUT, self.to_string()))
            }
            BoundsCheckResult::BufferSizeMismatch { .. } => {
                Err(FFIError::out_of_bounds(codes::SIZE_MISMATCH, self.to_string()))
            }
        }
    }
}

/// Validate buffer size for copy operations
#[inline]
pub fn check_buffer_size(expected: usize, actual: usize) -> BoundsCheckResult {
    if expected != actual {
        return BoundsCheckResult::BufferSizeMismatch { expected, actual };
    }

    BoundsCheckResult::Valid
}

/// Validate a raw pointer/length pair. A null pointer is only accepted for
/// an empty buffer.
#[inline]
pub fn check_raw_parts(ptr: *const u8, len: usize) -> BoundsCheckResult {
    if ptr.is_null() && len != 0 {
        return BoundsCheckResult::NullPointer { len };
    }

    BoundsCheckResult::Valid
}

/// Borrow a foreign buffer as a slice after validating it.
///
/// # Safety
/// When `ptr` is non-null it must point to `len` initialized bytes that stay
/// valid and unmodified for `'a`.
pub unsafe fn slice_from_raw<'a>(ptr: *const u8, len: usize) -> Result<&'a [u8], FFIError> {
    check_raw_parts(ptr, len).to_ffi_result()?;
    if len == 0 {
        return Ok(&[]);
    }
    // SAFETY: ptr is non-null here and the caller guarantees len valid bytes
    Ok(unsafe { std::slice::from_raw_parts(ptr, len) })
}
