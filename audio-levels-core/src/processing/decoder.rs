//! Raw buffer → per-channel peak magnitude.
//!
//! Pure math on byte slices, no platform dependencies. Samples are
//! little-endian and interleaved: channel `i` of a frame starts at byte
//! offset `i * bytes_per_sample` within each `frame_size()`-byte frame.

use crate::models::error::CaptureError;
use crate::models::format::{AudioFormat, SampleEncoding};
use crate::models::levels::ChannelLevels;

/// Decode a raw capture buffer into per-channel peak levels in `[0, 1]`.
///
/// Peak, not RMS: the maximum absolute sample magnitude observed across
/// the buffer, per channel. Mono input duplicates left into right.
/// A trailing partial frame is ignored.
///
/// Returns `UnsupportedFormat` for any encoding/bit-depth combination
/// other than IEEE float 32, integer 16, or integer 32.
pub fn decode_peak_levels(
    buffer: &[u8],
    format: AudioFormat,
) -> Result<ChannelLevels, CaptureError> {
    format.validate()?;

    if buffer.is_empty() {
        return Ok(ChannelLevels::silent());
    }

    let levels = match (format.encoding, format.bits_per_sample) {
        (SampleEncoding::IeeeFloat, 32) => peak_f32(buffer, format.channels),
        (SampleEncoding::IntegerPcm, 16) => peak_i16(buffer, format.channels),
        (SampleEncoding::IntegerPcm, 32) => peak_i32(buffer, format.channels),
        // validate() has already rejected everything else
        (encoding, bits_per_sample) => {
            return Err(CaptureError::UnsupportedFormat {
                encoding,
                bits_per_sample,
            })
        }
    };

    Ok(levels.clamped())
}

fn peak_f32(buffer: &[u8], channels: u16) -> ChannelLevels {
    let mut left = 0.0f32;
    let mut right = 0.0f32;
    let stride = 4 * channels as usize;

    let mut i = 0;
    while i + stride <= buffer.len() {
        let l = f32::from_le_bytes([buffer[i], buffer[i + 1], buffer[i + 2], buffer[i + 3]]).abs();
        if l > left {
            left = l;
        }
        if channels > 1 {
            let r = f32::from_le_bytes([
                buffer[i + 4],
                buffer[i + 5],
                buffer[i + 6],
                buffer[i + 7],
            ])
            .abs();
            if r > right {
                right = r;
            }
        }
        i += stride;
    }

    if channels == 1 {
        right = left;
    }
    ChannelLevels::new(left, right)
}

fn peak_i16(buffer: &[u8], channels: u16) -> ChannelLevels {
    let mut left = 0.0f32;
    let mut right = 0.0f32;
    let stride = 2 * channels as usize;

    let mut i = 0;
    while i + stride <= buffer.len() {
        let l = i16::from_le_bytes([buffer[i], buffer[i + 1]]);
        let l = (l as f32).abs() / 32768.0;
        if l > left {
            left = l;
        }
        if channels > 1 {
            let r = i16::from_le_bytes([buffer[i + 2], buffer[i + 3]]);
            let r = (r as f32).abs() / 32768.0;
            if r > right {
                right = r;
            }
        }
        i += stride;
    }

    if channels == 1 {
        right = left;
    }
    ChannelLevels::new(left, right)
}

fn peak_i32(buffer: &[u8], channels: u16) -> ChannelLevels {
    let mut left = 0.0f32;
    let mut right = 0.0f32;
    let stride = 4 * channels as usize;

    let mut i = 0;
    while i + stride <= buffer.len() {
        let l = i32::from_le_bytes([buffer[i], buffer[i + 1], buffer[i + 2], buffer[i + 3]]);
        let l = (l as f64).abs() as f32 / 2147483648.0;
        if l > left {
            left = l;
        }
        if channels > 1 {
            let r = i32::from_le_bytes([
                buffer[i + 4],
                buffer[i + 5],
                buffer[i + 6],
                buffer[i + 7],
            ]);
            let r = (r as f64).abs() as f32 / 2147483648.0;
            if r > right {
                right = r;
            }
        }
        i += stride;
    }

    if channels == 1 {
        right = left;
    }
    ChannelLevels::new(left, right)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f32_stereo(frames: &[(f32, f32)]) -> Vec<u8> {
        let mut buf = Vec::with_capacity(frames.len() * 8);
        for &(l, r) in frames {
            buf.extend_from_slice(&l.to_le_bytes());
            buf.extend_from_slice(&r.to_le_bytes());
        }
        buf
    }

    fn i16_stereo(frames: &[(i16, i16)]) -> Vec<u8> {
        let mut buf = Vec::with_capacity(frames.len() * 4);
        for &(l, r) in frames {
            buf.extend_from_slice(&l.to_le_bytes());
            buf.extend_from_slice(&r.to_le_bytes());
        }
        buf
    }

    #[test]
    fn float_stereo_peak_per_channel() {
        let buf = f32_stereo(&[(0.1, -0.8), (-0.4, 0.2), (0.3, 0.5)]);
        let levels =
            decode_peak_levels(&buf, AudioFormat::float32_stereo()).unwrap();

        assert!((levels.left - 0.4).abs() < 1e-6);
        assert!((levels.right - 0.8).abs() < 1e-6);
    }

    #[test]
    fn float_mono_duplicates_right() {
        let mut buf = Vec::new();
        for s in [0.25f32, -0.6, 0.1] {
            buf.extend_from_slice(&s.to_le_bytes());
        }
        let format = AudioFormat::new(SampleEncoding::IeeeFloat, 32, 1);
        let levels = decode_peak_levels(&buf, format).unwrap();

        assert!((levels.left - 0.6).abs() < 1e-6);
        assert_eq!(levels.left, levels.right);
    }

    #[test]
    fn int16_full_scale_normalizes_to_one() {
        let buf = i16_stereo(&[(i16::MIN, 16384)]);
        let format = AudioFormat::new(SampleEncoding::IntegerPcm, 16, 2);
        let levels = decode_peak_levels(&buf, format).unwrap();

        // |-32768| / 32768 = 1.0, 16384 / 32768 = 0.5
        assert!((levels.left - 1.0).abs() < 1e-6);
        assert!((levels.right - 0.5).abs() < 1e-6);
    }

    #[test]
    fn int32_half_scale() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&(i32::MIN / 2).to_le_bytes());
        buf.extend_from_slice(&0i32.to_le_bytes());
        let format = AudioFormat::new(SampleEncoding::IntegerPcm, 32, 2);
        let levels = decode_peak_levels(&buf, format).unwrap();

        assert!((levels.left - 0.5).abs() < 1e-6);
        assert_eq!(levels.right, 0.0);
    }

    #[test]
    fn int32_min_is_exactly_one() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&i32::MIN.to_le_bytes());
        let format = AudioFormat::new(SampleEncoding::IntegerPcm, 32, 1);
        let levels = decode_peak_levels(&buf, format).unwrap();

        assert_eq!(levels.left, 1.0);
        assert_eq!(levels.right, 1.0);
    }

    #[test]
    fn hot_float_samples_clamp_to_one() {
        let buf = f32_stereo(&[(1.7, -2.3)]);
        let levels =
            decode_peak_levels(&buf, AudioFormat::float32_stereo()).unwrap();

        assert_eq!(levels.left, 1.0);
        assert_eq!(levels.right, 1.0);
    }

    #[test]
    fn trailing_partial_frame_is_ignored() {
        let mut buf = f32_stereo(&[(0.2, 0.3)]);
        buf.extend_from_slice(&[0xFF, 0xFF, 0xFF]); // torn frame
        let levels =
            decode_peak_levels(&buf, AudioFormat::float32_stereo()).unwrap();

        assert!((levels.left - 0.2).abs() < 1e-6);
        assert!((levels.right - 0.3).abs() < 1e-6);
    }

    #[test]
    fn empty_buffer_is_silence() {
        let levels = decode_peak_levels(&[], AudioFormat::float32_stereo()).unwrap();
        assert_eq!(levels, ChannelLevels::silent());
    }

    #[test]
    fn unsupported_depth_is_an_error() {
        let format = AudioFormat::new(SampleEncoding::IntegerPcm, 24, 2);
        let err = decode_peak_levels(&[0u8; 12], format).unwrap_err();
        assert!(matches!(
            err,
            CaptureError::UnsupportedFormat {
                bits_per_sample: 24,
                ..
            }
        ));
    }

    #[test]
    fn levels_always_within_unit_range() {
        // A grab-bag of extreme frames; decoded output must stay in [0, 1].
        let buf = f32_stereo(&[(f32::MAX, f32::MIN), (-1.0, 1.0), (0.0, -0.0)]);
        let levels =
            decode_peak_levels(&buf, AudioFormat::float32_stereo()).unwrap();

        assert!((0.0..=1.0).contains(&levels.left));
        assert!((0.0..=1.0).contains(&levels.right));
    }
}
