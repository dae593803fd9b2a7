use thiserror::Error;

use super::format::SampleEncoding;

/// Errors that can occur during level capture.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CaptureError {
    /// No default output device, or the OS denied loopback access.
    /// Fatal to `start()`; never retried internally.
    #[error("capture unavailable: {0}")]
    CaptureUnavailable(String),

    /// The device stream ended unexpectedly while capturing. The session
    /// recovers to the stopped state; restart policy belongs to the caller.
    #[error("recording interrupted: {0}")]
    RecordingInterrupted(String),

    /// The decoder met a sample format it cannot interpret. Non-fatal:
    /// the offending buffer reads as silence and capture continues.
    #[error("unsupported sample format: {bits_per_sample}-bit {encoding:?}")]
    UnsupportedFormat {
        encoding: SampleEncoding,
        bits_per_sample: u16,
    },

    #[error("unknown error: {0}")]
    Unknown(String),
}
