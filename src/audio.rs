//! PCM16 audio helpers.
//!
//! The realtime protocol exchanges audio as base64-encoded 16-bit little-endian
//! mono PCM at a fixed 24kHz. All millisecond offsets (truncation, speech
//! windows) are converted to sample indices at that rate.

use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine};

use crate::error::AudioError;

/// Sample rate of every buffer the engine holds, in Hz.
pub const DEFAULT_FREQUENCY: u32 = 24_000;

/// Convert a millisecond offset into a sample index: `floor(ms * 24000 / 1000)`.
pub fn sample_index(ms: u32) -> usize {
    let index = u64::from(ms) * u64::from(DEFAULT_FREQUENCY) / 1000;
    usize::try_from(index).unwrap_or(usize::MAX)
}

/// Decode a base64 chunk into PCM16 samples.
pub fn decode_pcm16(encoded: &str) -> Result<Vec<i16>, AudioError> {
    let bytes = BASE64_STANDARD.decode(encoded)?;
    if bytes.len() % 2 != 0 {
        return Err(AudioError::OddByteLength(bytes.len()));
    }
    Ok(bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect())
}

/// Encode PCM16 samples as base64, the inverse of [`decode_pcm16`].
pub fn encode_pcm16(samples: &[i16]) -> String {
    let bytes: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
    BASE64_STANDARD.encode(bytes)
}

/// Append `tail` onto `buffer`.
pub fn merge_samples(buffer: &mut Vec<i16>, tail: &[i16]) {
    buffer.reserve(tail.len());
    buffer.extend_from_slice(tail);
}

/// Copy the `[start_ms, end_ms)` window out of `buffer`.
///
/// Indices are clamped to the buffer, so a window past the end yields fewer
/// samples (or none) rather than failing.
pub fn slice_window(buffer: &[i16], start_ms: u32, end_ms: u32) -> Vec<i16> {
    let end = sample_index(end_ms).min(buffer.len());
    let start = sample_index(start_ms).min(end);
    buffer[start..end].to_vec()
}
