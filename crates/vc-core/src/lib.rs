//! vc-core: Shared types, traits, and errors for VocalCut
//!
//! This crate provides the foundational types used across all VocalCut crates:
//! the immutable [`ByteBuffer`], the closed [`BackendId`] set and the
//! [`DifferenceKernel`] contract every backend implements.

mod backend;
mod buffer;
mod error;
mod kernel;

pub use backend::*;
pub use buffer::*;
pub use error::*;
pub use kernel::*;

/// Standard sample rate options
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[repr(u32)]
pub enum SampleRate {
    Hz44100 = 44100,
    Hz48000 = 48000,
    Hz88200 = 88200,
    Hz96000 = 96000,
    Hz176400 = 176400,
    Hz192000 = 192000,
}

impl SampleRate {
    #[inline]
    pub fn as_u32(self) -> u32 {
        self as u32
    }

    /// Map a raw rate in Hz onto a supported variant
    pub fn from_hz(hz: u32) -> VcResult<Self> {
        match hz {
            44100 => Ok(Self::Hz44100),
            48000 => Ok(Self::Hz48000),
            88200 => Ok(Self::Hz88200),
            96000 => Ok(Self::Hz96000),
            176400 => Ok(Self::Hz176400),
            192000 => Ok(Self::Hz192000),
            other => Err(VcError::InvalidParam(format!(
                "unsupported sample rate: {} Hz",
                other
            ))),
        }
    }
}

impl Default for SampleRate {
    fn default() -> Self {
        Self::Hz44100
    }
}

/// Layout of the PCM bytes exchanged with the decode and encode collaborators.
///
/// The kernels treat buffers as opaque bytes; this only travels alongside
/// them so the encoder can write a playable file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PcmFormat {
    pub sample_rate: SampleRate,
    pub channels: u16,
    pub bits_per_sample: u16,
}

impl PcmFormat {
    #[inline]
    pub fn bytes_per_frame(&self) -> usize {
        self.channels as usize * (self.bits_per_sample as usize / 8)
    }
}

impl Default for PcmFormat {
    fn default() -> Self {
        Self {
            sample_rate: SampleRate::Hz44100,
            channels: 2,
            bits_per_sample: 16,
        }
    }
}
