//! Backend identifiers

use crate::{VcError, VcResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of difference-kernel backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[repr(u8)]
pub enum BackendId {
    /// One byte at a time, the reference oracle
    Scalar = 0,
    /// Lane-batched SIMD subtraction
    Vector = 1,
    /// Hand-declared C ABI entry point
    ForeignDirect = 2,
    /// Call routed through the generated bridge layer
    ForeignGenerated = 3,
}

impl BackendId {
    pub const ALL: [BackendId; 4] = [
        BackendId::Scalar,
        BackendId::Vector,
        BackendId::ForeignDirect,
        BackendId::ForeignGenerated,
    ];

    /// Human-readable label used in result log lines
    pub const fn label(self) -> &'static str {
        match self {
            BackendId::Scalar => "Scalar",
            BackendId::Vector => "SIMD",
            BackendId::ForeignDirect => "FFI direct",
            BackendId::ForeignGenerated => "FFI generated",
        }
    }

    /// Stable token accepted by [`FromStr`]
    pub const fn name(self) -> &'static str {
        match self {
            BackendId::Scalar => "scalar",
            BackendId::Vector => "vector",
            BackendId::ForeignDirect => "foreign-direct",
            BackendId::ForeignGenerated => "foreign-generated",
        }
    }

    pub const fn is_foreign(self) -> bool {
        matches!(self, BackendId::ForeignDirect | BackendId::ForeignGenerated)
    }
}

impl fmt::Display for BackendId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BackendId {
    type Err = VcError;

    fn from_str(s: &str) -> VcResult<Self> {
        let token = s.trim();
        BackendId::ALL
            .into_iter()
            .find(|id| id.name().eq_ignore_ascii_case(token))
            .ok_or_else(|| {
                VcError::InvalidParam(format!(
                    "unknown backend '{}', expected one of: scalar, vector, foreign-direct, foreign-generated",
                    token
                ))
            })
    }
}
