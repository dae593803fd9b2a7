use std::sync::Arc;

use crate::models::error::CaptureError;
use crate::models::format::AudioFormat;
use crate::models::source::AudioSource;

/// Callback invoked when a raw audio buffer is available.
///
/// Delivers the buffer's bytes together with the `AudioFormat` in effect
/// for that buffer. The slice is only valid for the duration of the call;
/// consumers must not retain it. Fires on a dedicated capture thread —
/// keep processing minimal and never block.
pub type RawBufferCallback = Arc<dyn Fn(&[u8], AudioFormat) + Send + Sync + 'static>;

/// Callback invoked when the device stream terminates unexpectedly.
///
/// The provider has already released its device resources by the time
/// this fires; it will deliver no further buffers.
pub type StreamFaultCallback = Arc<dyn Fn(CaptureError) + Send + Sync + 'static>;

/// Interface for platform-specific loopback capture sources.
///
/// Implemented by `WasapiLoopbackCapture` (Windows) and by in-memory
/// providers in tests.
pub trait CaptureProvider: Send + Sync {
    /// Whether this capture source is currently usable.
    fn is_available(&self) -> bool;

    /// Start capturing, delivering buffers via `on_buffer` and reporting
    /// unexpected stream termination via `on_fault`.
    fn start(
        &mut self,
        on_buffer: RawBufferCallback,
        on_fault: StreamFaultCallback,
    ) -> Result<(), CaptureError>;

    /// Stop capturing and release device resources.
    ///
    /// Synchronous: once this returns, neither callback fires again.
    /// Safe to call when not capturing.
    fn stop(&mut self) -> Result<(), CaptureError>;

    /// Information about the audio endpoint backing this provider.
    fn device_info(&self) -> AudioSource;
}
