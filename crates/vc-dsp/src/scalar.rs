//! Scalar reference kernel

/// Reference implementation: one byte per iteration, index by index.
///
/// Every other backend is validated against this function.
pub fn difference_scalar(a: &[u8], b: &[u8]) -> Vec<u8> {
    let len = a.len().min(b.len());
    let mut out = vec![0u8; len];
    difference_scalar_into(a, b, &mut out);
    out
}

/// Write `a[i] - b[i]` (mod 256) into `out[i]` for every `i < out.len()`.
///
/// Both inputs must be at least `out.len()` long.
#[inline]
pub fn difference_scalar_into(a: &[u8], b: &[u8], out: &mut [u8]) {
    difference_tail(a, b, out, 0);
}

/// Scalar remainder path shared by the SIMD implementations
#[inline]
pub(crate) fn difference_tail(a: &[u8], b: &[u8], out: &mut [u8], start: usize) {
    debug_assert!(a.len() >= out.len() && b.len() >= out.len());
    for i in start..out.len() {
        out[i] = a[i].wrapping_sub(b[i]);
    }
}
