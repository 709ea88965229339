//! Decode and encode collaborators around the kernel
//!
//! Kernels only see bytes. WAV inputs are flattened to interleaved
//! little-endian 16-bit PCM; anything else is taken as raw PCM bytes.

use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use vc_core::{ByteBuffer, PcmFormat, SampleRate};

/// Rate and channel count read from a WAV header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    pub sample_rate: u32,
    pub channels: u16,
}

/// Decoded input track
#[derive(Debug, Clone)]
pub struct DecodedTrack {
    pub bytes: ByteBuffer,
    /// `None` for raw inputs
    pub header: Option<WavHeader>,
}

/// Read a track as PCM bytes
pub fn decode_track(path: &Path) -> Result<DecodedTrack> {
    let is_wav = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("wav"));

    if is_wav {
        return decode_wav(path);
    }

    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    log::debug!("Read {} raw PCM bytes from {}", bytes.len(), path.display());
    Ok(DecodedTrack {
        bytes: ByteBuffer::from(bytes),
        header: None,
    })
}

fn decode_wav(path: &Path) -> Result<DecodedTrack> {
    let reader =
        hound::WavReader::open(path).with_context(|| format!("opening {}", path.display()))?;
    let spec = reader.spec();

    let samples: Vec<i16> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .map(|s| s.map(|v| (v.clamp(-1.0, 1.0) * i16::MAX as f32) as i16))
            .collect::<std::result::Result<Vec<i16>, hound::Error>>(),
        hound::SampleFormat::Int => {
            let bits = spec.bits_per_sample;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| rescale_to_i16(v, bits)))
                .collect::<std::result::Result<Vec<i16>, hound::Error>>()
        }
    }
    .with_context(|| format!("decoding {}", path.display()))?;

    let mut bytes = Vec::with_capacity(samples.len() * 2);
    for sample in samples {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }

    log::debug!(
        "Decoded {} ({} Hz, {} ch, {} bit) to {} bytes",
        path.display(),
        spec.sample_rate,
        spec.channels,
        spec.bits_per_sample,
        bytes.len()
    );

    Ok(DecodedTrack {
        bytes: ByteBuffer::from(bytes),
        header: Some(WavHeader {
            sample_rate: spec.sample_rate,
            channels: spec.channels,
        }),
    })
}

fn rescale_to_i16(sample: i32, bits: u16) -> i16 {
    if bits > 16 {
        (sample >> (bits - 16)) as i16
    } else {
        (sample << (16 - bits)) as i16
    }
}

/// Layout of the output file.
///
/// Explicit flags win, then the vocal track's WAV header, then the 44.1 kHz
/// stereo default. A header rate the encoder cannot write is an error unless
/// `sample_rate` overrides it.
pub fn output_format(
    header: Option<WavHeader>,
    sample_rate: Option<u32>,
    channels: Option<u16>,
) -> Result<PcmFormat> {
    let mut format = PcmFormat::default();

    format.sample_rate = match (sample_rate, header) {
        (Some(hz), _) => SampleRate::from_hz(hz)?,
        (None, Some(header)) => SampleRate::from_hz(header.sample_rate).with_context(|| {
            format!(
                "vocal track is {} Hz, pass --sample-rate to choose an output rate",
                header.sample_rate
            )
        })?,
        (None, None) => format.sample_rate,
    };

    format.channels = match (channels, header) {
        (Some(0), _) => bail!("channel count must be at least 1"),
        (Some(n), _) => n,
        (None, Some(header)) => header.channels,
        (None, None) => format.channels,
    };

    Ok(format)
}

/// `vocal_only_<unix-epoch-millis>.wav`
pub fn output_file_name(epoch_millis: i64) -> String {
    format!("vocal_only_{}.wav", epoch_millis)
}

/// Timestamped output path inside `dir`
pub fn output_path(dir: &Path) -> PathBuf {
    dir.join(output_file_name(chrono::Utc::now().timestamp_millis()))
}

/// Write `bytes` as 16-bit PCM WAV. Returns the number of samples written.
///
/// Trailing bytes that do not fill a whole frame are dropped.
pub fn encode_wav(bytes: &[u8], format: PcmFormat, path: &Path) -> Result<usize> {
    let frame = format.channels.max(1) as usize * 2;
    let usable = bytes.len() - bytes.len() % frame;
    if usable != bytes.len() {
        log::warn!(
            "Output ends with a partial frame, dropping the last {} byte(s)",
            bytes.len() - usable
        );
    }

    let spec = hound::WavSpec {
        channels: format.channels,
        sample_rate: format.sample_rate.as_u32(),
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer =
        hound::WavWriter::create(path, spec).with_context(|| format!("creating {}", path.display()))?;

    let mut written = 0;
    for pair in bytes[..usable].chunks_exact(2) {
        writer.write_sample(i16::from_le_bytes([pair[0], pair[1]]))?;
        written += 1;
    }
    writer
        .finalize()
        .with_context(|| format!("finalizing {}", path.display()))?;

    log::info!("Wrote {} samples to {}", written, path.display());
    Ok(written)
}
