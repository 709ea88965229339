/// VocalCut FFI Error System
///
/// Native entry points cannot return `Result`, so failures cross the
/// boundary as a packed status code (category << 16 | code) or, on the
/// generated bridge, as a serialized error object.
use serde::{Deserialize, Serialize};
use std::fmt;
use vc_core::{BackendId, VcError};

// =============================================================================
// ERROR CATEGORIES
// =============================================================================

/// Error category for grouping related errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum FFIErrorCategory {
    /// Invalid input parameters (null pointers, unknown method)
    InvalidInput = 1,
    /// Returned buffer does not have the promised size
    OutOfBounds = 2,
    /// Adapter shut down or disabled
    InvalidState = 3,
    /// Wire frame could not be encoded or decoded
    SerializationError = 4,
    /// Unknown or uncategorized error
    Unknown = 255,
}

impl FFIErrorCategory {
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::InvalidInput,
            2 => Self::OutOfBounds,
            3 => Self::InvalidState,
            4 => Self::SerializationError,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for FFIErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FFIErrorCategory::InvalidInput => write!(f, "Invalid Input"),
            FFIErrorCategory::OutOfBounds => write!(f, "Out of Bounds"),
            FFIErrorCategory::InvalidState => write!(f, "Invalid State"),
            FFIErrorCategory::SerializationError => write!(f, "Serialization Error"),
            FFIErrorCategory::Unknown => write!(f, "Unknown Error"),
        }
    }
}

/// Error codes, unique within their category
pub mod codes {
    pub const NULL_INPUT: u16 = 1;
    pub const NULL_OUTPUT: u16 = 2;
    pub const UNKNOWN_METHOD: u16 = 3;
    pub const SIZE_MISMATCH: u16 = 10;
    pub const SHUT_DOWN: u16 = 20;
    pub const DISABLED: u16 = 21;
    pub const ENCODE_FAILED: u16 = 30;
    pub const DECODE_FAILED: u16 = 31;
}

// =============================================================================
// ERROR STRUCT
// =============================================================================

/// FFI error with context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FFIError {
    /// Error category for programmatic handling
    pub category: FFIErrorCategory,
    /// Numeric error code (unique per category)
    pub code: u16,
    /// Human-readable error message
    pub message: String,
    /// Optional context (entry point name, frame method)
    pub context: Option<String>,
}

impl FFIError {
    pub fn new(category: FFIErrorCategory, code: u16, message: impl Into<String>) -> Self {
        Self {
            category,
            code,
            message: message.into(),
            context: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn invalid_input(code: u16, message: impl Into<String>) -> Self {
        Self::new(FFIErrorCategory::InvalidInput, code, message)
    }

    pub fn out_of_bounds(code: u16, message: impl Into<String>) -> Self {
        Self::new(FFIErrorCategory::OutOfBounds, code, message)
    }

    pub fn invalid_state(code: u16, message: impl Into<String>) -> Self {
        Self::new(FFIErrorCategory::InvalidState, code, message)
    }

    pub fn serialization_error(code: u16, message: impl Into<String>) -> Self {
        Self::new(FFIErrorCategory::SerializationError, code, message)
    }

    /// Rebuild an error from a packed status code returned by a native call
    pub fn from_full_code(full_code: u32) -> Self {
        let category = FFIErrorCategory::from_u8(vc_ffi_error_get_category(full_code));
        let code = vc_ffi_error_get_code(full_code);
        Self::new(
            category,
            code,
            format!("native call failed with status {:#010x}", full_code),
        )
    }

    /// Get full error code (category << 16 | code)
    pub fn full_code(&self) -> u32 {
        ((self.category as u32) << 16) | (self.code as u32)
    }

    /// Convert to JSON string for the foreign side
    pub fn to_json_string(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(
                r#"{{"category":{},"code":{},"message":"{}"}}"#,
                self.category as u8,
                self.code,
                self.message.escape_default()
            )
        })
    }

    /// Log and convert into the core error type for `backend`
    pub fn into_vc_error(self, backend: BackendId) -> VcError {
        log::error!("FFI error in {}: {}", backend, self);
        VcError::boundary(backend, self.to_string())
    }
}

impl fmt::Display for FFIError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}:{}] {}", self.category, self.code, self.message)?;
        if let Some(ref ctx) = self.context {
            write!(f, " (context: {})", ctx)?;
        }
        Ok(())
    }
}

impl std::error::Error for FFIError {}

/// FFI result type
pub type FFIResult<T> = Result<T, FFIError>;

// =============================================================================
// FFI C INTERFACE
// =============================================================================

/// Parse error category from full error code
#[unsafe(no_mangle)]
pub extern "C" fn vc_ffi_error_get_category(full_code: u32) -> u8 {
    ((full_code >> 16) & 0xFF) as u8
}

/// Parse error code from full error code
#[unsafe(no_mangle)]
pub extern "C" fn vc_ffi_error_get_code(full_code: u32) -> u16 {
    (full_code & 0xFFFF) as u16
}
