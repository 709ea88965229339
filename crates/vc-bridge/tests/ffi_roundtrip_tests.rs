//! FFI Roundtrip Tests for vc-bridge
//!
//! Tests data integrity across both boundaries:
//! - Direct entry points agree with the scalar oracle
//! - Generated wire round trip agrees with the scalar oracle
//! - Packed status codes decode back to their category/code
//! - Shut-down handles fail instead of returning data

use vc_bridge::ffi_error::{codes, vc_ffi_error_get_category, vc_ffi_error_get_code};
use vc_bridge::{
    BridgeConfig, BridgeRuntime, FFIError, FFIErrorCategory, InnerKernel, WireCodec, WireRequest,
    handle_frame, vc_free_bytearray, vc_sub_two_bytearray,
};
use vc_core::{BackendId, DifferenceKernel, VcError};
use vc_dsp::difference_scalar;

fn pattern(len: usize, mul: usize, add: usize) -> Vec<u8> {
    (0..len).map(|i| (i * mul + add) as u8).collect()
}

// ═══════════════════════════════════════════════════════════════════════════════
// IDENTITY ACROSS THE BOUNDARY
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_foreign_adapters_match_scalar_on_lane_boundaries() {
    for inner in [InnerKernel::Vector, InnerKernel::Scalar] {
        let handle = BridgeRuntime::load(BridgeConfig {
            inner,
            ..Default::default()
        });
        for len in 0..96 {
            let a = pattern(len, 31, 3);
            let b = pattern(len + (len % 3), 17, 190);
            let expected = difference_scalar(&a, &b);
            for id in [BackendId::ForeignDirect, BackendId::ForeignGenerated] {
                let out = handle.kernel(id).unwrap().difference(&a, &b).unwrap();
                assert_eq!(out, expected, "{:?} {:?} len {}", inner, id, len);
            }
        }
    }
}

#[test]
fn test_raw_entry_point_with_unequal_lengths() {
    let a = pattern(1000, 7, 1);
    let b = pattern(333, 9, 2);
    let mut out_ptr = std::ptr::null_mut();
    let mut out_len = 0usize;
    let status = unsafe {
        vc_sub_two_bytearray(a.as_ptr(), a.len(), b.as_ptr(), b.len(), &mut out_ptr, &mut out_len)
    };
    assert_eq!(status, 0);
    let out = unsafe { std::slice::from_raw_parts(out_ptr, out_len) }.to_vec();
    unsafe { vc_free_bytearray(out_ptr, out_len) };
    assert_eq!(out, difference_scalar(&a, &b));
}

#[test]
fn test_wire_frame_is_json() {
    let request = WireRequest {
        method: "sub_two_bytearray".to_string(),
        a: vec![5, 10, 250],
        b: vec![3, 20, 10],
    };
    let frame = WireCodec::encode_request(&request).unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(&frame).unwrap();
    assert_eq!(parsed["method"], "sub_two_bytearray");

    let reply: serde_json::Value = serde_json::from_slice(&handle_frame(&frame)).unwrap();
    assert_eq!(reply["data"], serde_json::json!([2, 246, 240]));
    assert!(reply["error"].is_null());
}

// ═══════════════════════════════════════════════════════════════════════════════
// ERROR SYSTEM
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_full_code_roundtrip_all_categories() {
    let cases = [
        (FFIErrorCategory::InvalidInput, codes::NULL_INPUT),
        (FFIErrorCategory::OutOfBounds, codes::SIZE_MISMATCH),
        (FFIErrorCategory::InvalidState, codes::SHUT_DOWN),
        (FFIErrorCategory::SerializationError, codes::DECODE_FAILED),
        (FFIErrorCategory::Unknown, 999),
    ];

    for (category, code) in cases {
        let full = FFIError::new(category, code, "test").full_code();
        assert_eq!(vc_ffi_error_get_category(full), category as u8);
        assert_eq!(vc_ffi_error_get_code(full), code);
    }
}

#[test]
fn test_error_json_is_valid_for_special_characters() {
    for msg in ["with \"quotes\"", "back\\slash", "new\nline", ""] {
        let json = FFIError::invalid_input(1, msg).to_json_string();
        let _: serde_json::Value = serde_json::from_str(&json)
            .unwrap_or_else(|e| panic!("invalid JSON for '{}': {}", msg, e));
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// LIFECYCLE
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_shutdown_turns_calls_into_boundary_failures() {
    let handle = BridgeRuntime::load(BridgeConfig::default());
    let shared = handle.clone();
    handle.shutdown();
    assert!(!shared.is_open());

    for id in [BackendId::ForeignDirect, BackendId::ForeignGenerated] {
        let err = shared.kernel(id).unwrap().difference(&[1, 2], &[3, 4]).unwrap_err();
        match err {
            VcError::Boundary { backend, reason } => {
                assert_eq!(backend, id);
                assert!(reason.contains("shut down"), "{}", reason);
            }
            other => panic!("expected boundary failure, got {:?}", other),
        }
    }
}

#[test]
fn test_disabled_direct_adapter() {
    let handle = BridgeRuntime::load(BridgeConfig {
        direct_enabled: false,
        ..Default::default()
    });
    let err = handle.direct().difference(&[1], &[1]).unwrap_err();
    assert!(err.to_string().contains("disabled"));
    assert!(handle.generated().difference(&[1], &[1]).is_ok());
}
