//! The difference-kernel contract

use crate::{BackendId, ByteBuffer, VcResult};

/// Elementwise 8-bit wraparound subtraction.
///
/// For inputs `a` and `b` every implementation returns a new buffer of
/// length `min(a.len(), b.len())` with `out[i] = a[i].wrapping_sub(b[i])`.
/// The tail of the longer input is ignored. Outputs must be byte-identical
/// across implementations; only the cost of producing them differs.
pub trait DifferenceKernel: Send + Sync {
    /// Which backend this implementation represents
    fn id(&self) -> BackendId;

    /// Compute `a - b` (mod 256) over the common prefix
    fn difference(&self, a: &[u8], b: &[u8]) -> VcResult<ByteBuffer>;
}

/// Output length shared by every backend
#[inline]
pub fn output_len(a: &[u8], b: &[u8]) -> usize {
    a.len().min(b.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_len_is_min() {
        assert_eq!(output_len(&[1, 2, 3], &[1]), 1);
        assert_eq!(output_len(&[], &[1, 2, 3]), 0);
        assert_eq!(output_len(&[0; 17], &[0; 17]), 17);
    }
}
