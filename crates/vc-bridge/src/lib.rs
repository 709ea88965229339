//! vc-bridge: Foreign-call bridges for the VocalCut difference kernel
//!
//! Two ways of reaching the same kernel across a language boundary:
//! - `direct` - hand-declared C ABI entry points, raw pointers in and out
//! - `generated` - flutter_rust_bridge API functions behind a serialized
//!   wire round trip
//!
//! Both adapters implement [`vc_core::DifferenceKernel`] and are handed out
//! by a [`BridgeHandle`] obtained from [`BridgeRuntime::load`].

// Flutter Rust Bridge uses custom cfg attributes
#![allow(unexpected_cfgs)]

pub mod direct;
pub mod ffi_bounds;
pub mod ffi_error;
pub mod generated;
mod runtime;

pub use direct::{DirectBridge, vc_free_bytearray, vc_sub_two_bytearray, vc_sub_two_bytearray_scalar};
pub use ffi_error::{FFIError, FFIErrorCategory, FFIResult};
pub use generated::{GeneratedBridge, WireCodec, WireRequest, WireResponse, handle_frame};
pub use runtime::{BridgeConfig, BridgeHandle, BridgeRuntime, InnerKernel, NativeLibrary};
