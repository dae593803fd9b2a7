use serde::{Deserialize, Serialize};

use super::error::CaptureError;

/// How samples in a raw buffer are encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleEncoding {
    IntegerPcm,
    IeeeFloat,
}

/// Format descriptor attached to every delivered buffer.
///
/// The device supplies this per buffer; the core re-derives its
/// interpretation every time rather than caching a stream format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AudioFormat {
    pub encoding: SampleEncoding,
    pub bits_per_sample: u16,
    pub channels: u16,
}

impl AudioFormat {
    pub fn new(encoding: SampleEncoding, bits_per_sample: u16, channels: u16) -> Self {
        Self {
            encoding,
            bits_per_sample,
            channels,
        }
    }

    /// Stereo IEEE float32, the shared-mode mix format on most systems.
    pub fn float32_stereo() -> Self {
        Self::new(SampleEncoding::IeeeFloat, 32, 2)
    }

    pub fn bytes_per_sample(&self) -> usize {
        self.bits_per_sample as usize / 8
    }

    /// Size in bytes of one interleaved frame (one sample per channel).
    pub fn frame_size(&self) -> usize {
        self.bytes_per_sample() * self.channels as usize
    }

    /// Whether the decoder can interpret this combination.
    ///
    /// Supported: IEEE float 32-bit, integer PCM 16- and 32-bit,
    /// mono or stereo.
    pub fn validate(&self) -> Result<(), CaptureError> {
        let supported = match self.encoding {
            SampleEncoding::IeeeFloat => self.bits_per_sample == 32,
            SampleEncoding::IntegerPcm => matches!(self.bits_per_sample, 16 | 32),
        };
        if !supported || !matches!(self.channels, 1 | 2) {
            return Err(CaptureError::UnsupportedFormat {
                encoding: self.encoding,
                bits_per_sample: self.bits_per_sample,
            });
        }
        Ok(())
    }
}
