//! Generated bridge: API functions exposed through flutter_rust_bridge
//!
//! The functions marked `#[frb]` are what the binding generator exports.
//! Generated bindings never touch raw pointers: every call is encoded into
//! a wire frame, decoded on the Rust side, dispatched, and the response
//! travels back the same way. [`WireCodec`] and [`handle_frame`] reproduce
//! that round trip in-process so its cost shows up in the benchmarks.

use crate::ffi_bounds::check_buffer_size;
use crate::ffi_error::{FFIError, FFIResult, codes};
use crate::runtime::{BridgeState, InnerKernel};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use vc_core::{BackendId, ByteBuffer, DifferenceKernel, VcResult, output_len};
use vc_dsp::{difference_scalar, difference_simd};

pub const METHOD_SUB: &str = "sub_two_bytearray";
pub const METHOD_SUB_SCALAR: &str = "sub_two_bytearray_scalar";

// ═══════════════════════════════════════════════════════════════════════════
// EXPORTED API
// ═══════════════════════════════════════════════════════════════════════════

/// Subtract two byte arrays (mod 256) with the SIMD kernel
#[flutter_rust_bridge::frb(sync)]
pub fn sub_two_bytearray(a: Vec<u8>, b: Vec<u8>) -> Vec<u8> {
    difference_simd(&a, &b)
}

/// Subtract two byte arrays (mod 256) without SIMD
#[flutter_rust_bridge::frb(sync)]
pub fn sub_two_bytearray_scalar(a: Vec<u8>, b: Vec<u8>) -> Vec<u8> {
    difference_scalar(&a, &b)
}

// ═══════════════════════════════════════════════════════════════════════════
// WIRE FORMAT
// ═══════════════════════════════════════════════════════════════════════════

/// Request frame sent across the generated boundary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireRequest {
    pub method: String,
    pub a: Vec<u8>,
    pub b: Vec<u8>,
}

/// Response frame; exactly one of `data` / `error` is meaningful
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireResponse {
    #[serde(default)]
    pub data: Vec<u8>,
    #[serde(default)]
    pub error: Option<FFIError>,
}

impl WireResponse {
    fn ok(data: Vec<u8>) -> Self {
        Self { data, error: None }
    }

    fn err(error: FFIError) -> Self {
        Self {
            data: Vec::new(),
            error: Some(error),
        }
    }
}

/// Encoder/decoder for wire frames
pub struct WireCodec;

impl WireCodec {
    pub fn encode_request(request: &WireRequest) -> FFIResult<Vec<u8>> {
        serde_json::to_vec(request).map_err(|e| {
            FFIError::serialization_error(codes::ENCODE_FAILED, e.to_string())
                .with_context("request")
        })
    }

    pub fn decode_request(frame: &[u8]) -> FFIResult<WireRequest> {
        serde_json::from_slice(frame).map_err(|e| {
            FFIError::serialization_error(codes::DECODE_FAILED, e.to_string())
                .with_context("request")
        })
    }

    pub fn encode_response(response: &WireResponse) -> FFIResult<Vec<u8>> {
        serde_json::to_vec(response).map_err(|e| {
            FFIError::serialization_error(codes::ENCODE_FAILED, e.to_string())
                .with_context("response")
        })
    }

    pub fn decode_response(frame: &[u8]) -> FFIResult<WireResponse> {
        serde_json::from_slice(frame).map_err(|e| {
            FFIError::serialization_error(codes::DECODE_FAILED, e.to_string())
                .with_context("response")
        })
    }
}

/// Rust side of the generated boundary: decode, dispatch, encode.
///
/// Always answers with a frame; failures travel inside it.
pub fn handle_frame(frame: &[u8]) -> Vec<u8> {
    let response = match WireCodec::decode_request(frame) {
        Ok(request) => dispatch(request),
        Err(err) => WireResponse::err(err),
    };

    WireCodec::encode_response(&response).unwrap_or_else(|err| error_frame(&err))
}

/// Error-only response frame, built without going through the codec
fn error_frame(err: &FFIError) -> Vec<u8> {
    format!(r#"{{"error":{}}}"#, err.to_json_string()).into_bytes()
}

fn dispatch(request: WireRequest) -> WireResponse {
    let WireRequest { method, a, b } = request;
    match method.as_str() {
        METHOD_SUB => WireResponse::ok(sub_two_bytearray(a, b)),
        METHOD_SUB_SCALAR => WireResponse::ok(sub_two_bytearray_scalar(a, b)),
        other => WireResponse::err(
            FFIError::invalid_input(codes::UNKNOWN_METHOD, format!("unknown method '{}'", other))
                .with_context("dispatch"),
        ),
    }
}

/// Frame handler signature; the default is [`handle_frame`]
pub type FrameHandler = fn(&[u8]) -> Vec<u8>;

// ═══════════════════════════════════════════════════════════════════════════
// ADAPTER
// ═══════════════════════════════════════════════════════════════════════════

/// Adapter routing calls through the generated-bridge wire round trip
#[derive(Clone)]
pub struct GeneratedBridge {
    method: &'static str,
    handler: FrameHandler,
    state: Arc<BridgeState>,
}

impl GeneratedBridge {
    pub(crate) fn new(state: Arc<BridgeState>) -> Self {
        let method = match state.config().inner {
            InnerKernel::Vector => METHOD_SUB,
            InnerKernel::Scalar => METHOD_SUB_SCALAR,
        };
        Self {
            method,
            handler: handle_frame,
            state,
        }
    }

    /// Route frames to another handler (e.g. a remote runtime)
    pub fn with_handler(mut self, handler: FrameHandler) -> Self {
        self.handler = handler;
        self
    }

    fn call(&self, a: &[u8], b: &[u8]) -> FFIResult<Vec<u8>> {
        let request = WireRequest {
            method: self.method.to_string(),
            a: a.to_vec(),
            b: b.to_vec(),
        };
        let frame = WireCodec::encode_request(&request)?;
        let reply = (self.handler)(&frame);
        let response = WireCodec::decode_response(&reply)?;

        match response.error {
            Some(err) => Err(err),
            None => Ok(response.data),
        }
    }
}

impl DifferenceKernel for GeneratedBridge {
    fn id(&self) -> BackendId {
        BackendId::ForeignGenerated
    }

    fn difference(&self, a: &[u8], b: &[u8]) -> VcResult<ByteBuffer> {
        self.state.ensure_available(BackendId::ForeignGenerated)?;
        let data = self
            .call(a, b)
            .and_then(|data| {
                check_buffer_size(output_len(a, b), data.len())
                    .to_ffi_result()
                    .map(|()| data)
            })
            .map_err(|err| err.into_vc_error(BackendId::ForeignGenerated))?;
        Ok(ByteBuffer::from(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ffi_error::FFIErrorCategory;
    use crate::runtime::BridgeConfig;

    fn bridge() -> GeneratedBridge {
        GeneratedBridge::new(Arc::new(BridgeState::new(BridgeConfig::default())))
    }

    #[test]
    fn test_api_functions_agree() {
        let a = vec![5u8, 10, 250];
        let b = vec![3u8, 20, 10];
        assert_eq!(sub_two_bytearray(a.clone(), b.clone()), vec![2, 246, 240]);
        assert_eq!(sub_two_bytearray_scalar(a, b), vec![2, 246, 240]);
    }

    #[test]
    fn test_frame_roundtrip() {
        let request = WireRequest {
            method: METHOD_SUB.to_string(),
            a: vec![0, 1],
            b: vec![1, 1, 1],
        };
        let frame = WireCodec::encode_request(&request).unwrap();
        let reply = WireCodec::decode_response(&handle_frame(&frame)).unwrap();
        assert_eq!(reply.error, None);
        assert_eq!(reply.data, vec![255, 0]);
    }

    #[test]
    fn test_garbage_frame_yields_error_response() {
        let reply = WireCodec::decode_response(&handle_frame(b"not json")).unwrap();
        let err = reply.error.unwrap();
        assert_eq!(err.category, FFIErrorCategory::SerializationError);
        assert_eq!(err.code, codes::DECODE_FAILED);
    }

    #[test]
    fn test_unknown_method() {
        let request = WireRequest {
            method: "mul_two_bytearray".to_string(),
            a: vec![],
            b: vec![],
        };
        let frame = WireCodec::encode_request(&request).unwrap();
        let reply = WireCodec::decode_response(&handle_frame(&frame)).unwrap();
        assert_eq!(reply.error.unwrap().code, codes::UNKNOWN_METHOD);
    }

    #[test]
    fn test_adapter_scenario() {
        let out = bridge().difference(&[5, 10, 250], &[3, 20, 10]).unwrap();
        assert_eq!(out, vec![2u8, 246, 240]);
        assert!(bridge().difference(&[], &[1, 2, 3]).unwrap().is_empty());
    }

    #[test]
    fn test_adapter_rejects_wrong_result_size() {
        fn short_reply(_: &[u8]) -> Vec<u8> {
            br#"{"data":[1]}"#.to_vec()
        }
        let err = bridge()
            .with_handler(short_reply)
            .difference(&[5, 10, 250], &[3, 20, 10])
            .unwrap_err();
        assert!(err.is_boundary());
        assert!(err.to_string().contains("expected 3"), "{}", err);
    }

    #[test]
    fn test_error_fallback_frame_decodes_as_error() {
        let err = FFIError::serialization_error(codes::ENCODE_FAILED, "x");
        let reply = WireCodec::decode_response(&error_frame(&err)).unwrap();
        assert_eq!(reply.error, Some(err));
        assert!(reply.data.is_empty());
    }

    #[test]
    fn test_adapter_surfaces_handler_garbage() {
        fn broken(_: &[u8]) -> Vec<u8> {
            b"\x00\x01".to_vec()
        }
        let err = bridge().with_handler(broken).difference(&[1], &[1]).unwrap_err();
        assert!(err.is_boundary());
    }
}
