//! Test data generators for benchmarks

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use vc_core::ByteBuffer;

/// Generate reproducible random bytes
pub fn generate_bytes(size: usize, seed: u64) -> Vec<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut bytes = vec![0u8; size];
    rng.fill_bytes(&mut bytes);
    bytes
}

/// Generate a reproducible (vocal, karaoke) pair of equal length
pub fn generate_track_pair(size: usize, seed: u64) -> (ByteBuffer, ByteBuffer) {
    (
        ByteBuffer::from(generate_bytes(size, seed)),
        ByteBuffer::from(generate_bytes(size, seed.wrapping_add(1))),
    )
}

/// Generate interleaved 16-bit LE PCM of a sine tone
pub fn generate_pcm_sine(frames: usize, freq: f64, sample_rate: u32, channels: u16) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(frames * channels as usize * 2);
    for i in 0..frames {
        let phase = 2.0 * std::f64::consts::PI * freq * i as f64 / sample_rate as f64;
        let sample = (phase.sin() * i16::MAX as f64 * 0.5) as i16;
        for _ in 0..channels {
            bytes.extend_from_slice(&sample.to_le_bytes());
        }
    }
    bytes
}

/// Every length from 0 to `2 * lane + (lane - 1)`, covering all remainders
/// on both sides of the first two full lanes
pub fn lane_boundary_lengths(lane: usize) -> std::ops::RangeInclusive<usize> {
    let lane = lane.max(1);
    0..=(2 * lane + lane - 1)
}

/// Common buffer sizes for benchmarks
pub const BUFFER_SIZES: &[usize] = &[256, 4096, 65536, 1 << 20];
