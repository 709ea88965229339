//! Immutable byte buffers shared between decode, kernels and encode

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// Number of hex characters kept from the SHA-256 digest in [`ByteBuffer::checksum`]
const CHECKSUM_HEX_LEN: usize = 16;

/// Immutable ordered sequence of bytes.
///
/// Cloning is cheap: clones share the same allocation, which is never
/// mutated after construction. That makes a decoded input safe to hand to
/// several backends running on different threads.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ByteBuffer {
    bytes: Arc<[u8]>,
}

impl ByteBuffer {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes: Arc::from(bytes),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.bytes.to_vec()
    }

    /// Short SHA-256 fingerprint (hex) used to compare outputs without keeping them
    pub fn checksum(&self) -> String {
        let digest = Sha256::digest(&self.bytes);
        let mut hex = hex::encode(digest);
        hex.truncate(CHECKSUM_HEX_LEN);
        hex
    }
}

impl Default for ByteBuffer {
    fn default() -> Self {
        Self::empty()
    }
}

impl Deref for ByteBuffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.bytes
    }
}

impl AsRef<[u8]> for ByteBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl From<Vec<u8>> for ByteBuffer {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl From<Box<[u8]>> for ByteBuffer {
    fn from(bytes: Box<[u8]>) -> Self {
        Self {
            bytes: Arc::from(bytes),
        }
    }
}

impl From<&[u8]> for ByteBuffer {
    fn from(bytes: &[u8]) -> Self {
        Self {
            bytes: Arc::from(bytes),
        }
    }
}

impl<const N: usize> From<[u8; N]> for ByteBuffer {
    fn from(bytes: [u8; N]) -> Self {
        Self::from(&bytes[..])
    }
}

impl PartialEq<[u8]> for ByteBuffer {
    fn eq(&self, other: &[u8]) -> bool {
        self.as_slice() == other
    }
}

impl PartialEq<Vec<u8>> for ByteBuffer {
    fn eq(&self, other: &Vec<u8>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl fmt::Debug for ByteBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const PREVIEW: usize = 16;
        let head = &self.bytes[..self.len().min(PREVIEW)];
        write!(f, "ByteBuffer(len={}, head={:?}", self.len(), head)?;
        if self.len() > PREVIEW {
            write!(f, "..")?;
        }
        write!(f, ")")
    }
}

impl Serialize for ByteBuffer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(&self.bytes)
    }
}

impl<'de> Deserialize<'de> for ByteBuffer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<u8>::deserialize(deserializer).map(Self::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_shares_allocation() {
        let a = ByteBuffer::from(vec![1, 2, 3]);
        let b = a.clone();
        assert!(std::ptr::eq(a.as_slice().as_ptr(), b.as_slice().as_ptr()));
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty() {
        let buf = ByteBuffer::empty();
        assert!(buf.is_empty());
        assert_eq!(buf.len(), 0);
        assert_eq!(buf, ByteBuffer::default());
    }

    #[test]
    fn test_checksum_stable_and_distinct() {
        let a = ByteBuffer::from([2u8, 246, 240]);
        let b = ByteBuffer::from(vec![2u8, 246, 240]);
        let c = ByteBuffer::from([2u8, 246, 241]);
        assert_eq!(a.checksum(), b.checksum());
        assert_ne!(a.checksum(), c.checksum());
        assert_eq!(a.checksum().len(), CHECKSUM_HEX_LEN);
    }

    #[test]
    fn test_debug_truncates_long_buffers() {
        let buf = ByteBuffer::from(vec![7u8; 100]);
        let text = format!("{:?}", buf);
        assert!(text.contains("len=100"));
        assert!(text.ends_with("..)"));
    }

    #[test]
    fn test_serde_roundtrip_json() {
        let buf = ByteBuffer::from([5u8, 10, 250]);
        let json = serde_json::to_string(&buf).unwrap();
        assert_eq!(json, "[5,10,250]");
        let back: ByteBuffer = serde_json::from_str(&json).unwrap();
        assert_eq!(back, buf);
    }
}
