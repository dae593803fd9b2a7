//! WASAPI loopback capture provider for system audio.
//!
//! Captures the audio mix going to the default render endpoint using
//! `AUDCLNT_STREAMFLAGS_LOOPBACK` and delivers each packet's raw bytes
//! together with the format in effect, so the core decodes per buffer.
//!
//! Notes:
//! - Loopback reads from a RENDER endpoint, not a capture endpoint.
//! - DRM-protected audio arrives silenced.
//! - Shared mode only; the mix format decides encoding and layout.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;
use windows::core::{GUID, PCWSTR};
use windows::Win32::Media::Audio::*;
use windows::Win32::System::Com::*;
use windows::Win32::System::Threading::*;

use audio_levels_core::models::error::CaptureError;
use audio_levels_core::models::format::{AudioFormat, SampleEncoding};
use audio_levels_core::models::source::AudioSource;
use audio_levels_core::traits::capture_provider::{
    CaptureProvider, RawBufferCallback, StreamFaultCallback,
};

const WAVE_FORMAT_PCM_TAG: u16 = 0x0001;
const WAVE_FORMAT_IEEE_FLOAT_TAG: u16 = 0x0003;
const WAVE_FORMAT_EXTENSIBLE_TAG: u16 = 0xFFFE;

const SUBTYPE_PCM: GUID = GUID::from_u128(0x00000001_0000_0010_8000_00aa00389b71);
const SUBTYPE_IEEE_FLOAT: GUID = GUID::from_u128(0x00000003_0000_0010_8000_00aa00389b71);

/// WASAPI loopback capture on the default render device.
pub struct WasapiLoopbackCapture {
    device_name: String,
    running: Arc<AtomicBool>,
    capture_handle: Mutex<Option<thread::JoinHandle<()>>>,
}

// SAFETY: COM objects are confined to the capture thread.
unsafe impl Send for WasapiLoopbackCapture {}
unsafe impl Sync for WasapiLoopbackCapture {}

impl WasapiLoopbackCapture {
    /// Create a loopback capture on the default render device.
    pub fn default_device() -> Result<Self, CaptureError> {
        Ok(Self {
            device_name: "System Audio (Loopback)".into(),
            running: Arc::new(AtomicBool::new(false)),
            capture_handle: Mutex::new(None),
        })
    }
}

impl CaptureProvider for WasapiLoopbackCapture {
    fn is_available(&self) -> bool {
        // Render endpoints can disappear; the authoritative check is the
        // device acquisition performed by start().
        true
    }

    fn start(
        &mut self,
        on_buffer: RawBufferCallback,
        on_fault: StreamFaultCallback,
    ) -> Result<(), CaptureError> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        let running = Arc::clone(&self.running);
        let (ready_tx, ready_rx) = mpsc::channel::<Result<(), CaptureError>>();

        let handle = thread::Builder::new()
            .name("wasapi-loopback".into())
            .spawn(move || {
                // COM and the stream live on this thread only. Device
                // acquisition failures travel back through the handshake
                // channel so start() can report them synchronously.
                let stream = match LoopbackStream::open() {
                    Ok(stream) => stream,
                    Err(e) => {
                        running.store(false, Ordering::SeqCst);
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                let _ = ready_tx.send(Ok(()));
                drop(ready_tx);

                let result = stream.run(&running, on_buffer);
                let was_running = running.swap(false, Ordering::SeqCst);
                if let Err(e) = result {
                    log::error!("loopback capture error: {e}");
                    // A requested stop is not a fault; only a stream that
                    // died on its own counts as an interruption.
                    if was_running {
                        on_fault(CaptureError::RecordingInterrupted(e.to_string()));
                    }
                }
            })
            .map_err(|e| {
                self.running.store(false, Ordering::SeqCst);
                CaptureError::Unknown(format!("failed to spawn loopback thread: {e}"))
            })?;

        // Block until the endpoint is acquired and the stream started, so
        // a missing device or denied loopback access fails start() itself
        // instead of arriving later through on_fault.
        match ready_rx.recv() {
            Ok(Ok(())) => {
                *self.capture_handle.lock() = Some(handle);
                Ok(())
            }
            Ok(Err(e)) => {
                let _ = handle.join();
                Err(e)
            }
            Err(_) => {
                self.running.store(false, Ordering::SeqCst);
                let _ = handle.join();
                Err(CaptureError::Unknown(
                    "loopback thread exited during initialization".into(),
                ))
            }
        }
    }

    fn stop(&mut self) -> Result<(), CaptureError> {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.capture_handle.lock().take() {
            let _ = handle.join();
        }
        Ok(())
    }

    fn device_info(&self) -> AudioSource {
        AudioSource {
            id: "system-loopback".into(),
            name: self.device_name.clone(),
            is_default: true,
        }
    }
}

/// Derive the core's format descriptor from the endpoint mix format.
///
/// Shared-mode mix formats are usually `WAVE_FORMAT_EXTENSIBLE` wrapping
/// IEEE float32 stereo, but the descriptor is rebuilt here and attached
/// to every delivered buffer rather than assumed downstream.
fn derive_format(mix_format: &WAVEFORMATEX) -> Result<AudioFormat, CaptureError> {
    let encoding = match mix_format.wFormatTag {
        WAVE_FORMAT_PCM_TAG => SampleEncoding::IntegerPcm,
        WAVE_FORMAT_IEEE_FLOAT_TAG => SampleEncoding::IeeeFloat,
        WAVE_FORMAT_EXTENSIBLE_TAG => {
            // SAFETY: for the extensible tag the struct is guaranteed to
            // be a WAVEFORMATEXTENSIBLE by the WASAPI contract.
            let ext = unsafe { &*(mix_format as *const WAVEFORMATEX as *const WAVEFORMATEXTENSIBLE) };
            if ext.SubFormat == SUBTYPE_PCM {
                SampleEncoding::IntegerPcm
            } else if ext.SubFormat == SUBTYPE_IEEE_FLOAT {
                SampleEncoding::IeeeFloat
            } else {
                return Err(CaptureError::Unknown(format!(
                    "unrecognized mix subformat {:?}",
                    ext.SubFormat
                )));
            }
        }
        other => {
            return Err(CaptureError::Unknown(format!(
                "unrecognized mix format tag {other:#06x}"
            )))
        }
    };

    Ok(AudioFormat::new(
        encoding,
        mix_format.wBitsPerSample,
        mix_format.nChannels,
    ))
}

/// A started loopback stream, confined to the capture thread.
///
/// Field order matters for drop order: COM interfaces release before the
/// mix format allocation is freed, and CoUninitialize runs last.
struct LoopbackStream {
    audio_client: IAudioClient,
    capture_client: IAudioCaptureClient,
    format: AudioFormat,
    frame_size: usize,
    _mix_format: MixFormatGuard,
    _com: CoUninitializeGuard,
}

impl LoopbackStream {
    /// Acquire the default render endpoint and start a loopback stream.
    ///
    /// Sequence:
    /// 1. CoInitializeEx (MTA)
    /// 2. Get default render endpoint
    /// 3. Activate IAudioClient
    /// 4. Initialize with LOOPBACK flag in shared mode
    /// 5. Get IAudioCaptureClient
    /// 6. Register with MMCSS
    /// 7. Start
    ///
    /// Device and access failures map to `CaptureUnavailable`.
    fn open() -> Result<Self, CaptureError> {
        unsafe {
            CoInitializeEx(None, COINIT_MULTITHREADED)
                .ok()
                .map_err(|e| CaptureError::Unknown(format!("CoInitializeEx failed: {e}")))?;

            let com = CoUninitializeGuard;

            let enumerator: IMMDeviceEnumerator =
                CoCreateInstance(&MMDeviceEnumerator, None, CLSCTX_ALL).map_err(|e| {
                    CaptureError::CaptureUnavailable(format!("device enumerator: {e}"))
                })?;

            // Default RENDER endpoint — loopback reads the render mix
            let device = enumerator
                .GetDefaultAudioEndpoint(eRender, eConsole)
                .map_err(|_| CaptureError::CaptureUnavailable("no default output device".into()))?;

            let audio_client: IAudioClient = device
                .Activate(CLSCTX_ALL, None)
                .map_err(|e| CaptureError::CaptureUnavailable(format!("Activate failed: {e}")))?;

            let mix_format_ptr = audio_client.GetMixFormat().map_err(|e| {
                CaptureError::CaptureUnavailable(format!("GetMixFormat failed: {e}"))
            })?;
            let mix_format_guard = MixFormatGuard(mix_format_ptr);

            let mix_format = &*mix_format_ptr;
            let format = derive_format(mix_format)?;
            let frame_size = mix_format.nBlockAlign as usize;

            let buffer_duration = 1_000_000; // 100ms in 100ns units

            audio_client
                .Initialize(
                    AUDCLNT_SHAREMODE_SHARED,
                    AUDCLNT_STREAMFLAGS_LOOPBACK | AUDCLNT_STREAMFLAGS_NOPERSIST,
                    buffer_duration,
                    0,
                    mix_format,
                    None,
                )
                .map_err(|e| {
                    CaptureError::CaptureUnavailable(format!(
                        "IAudioClient::Initialize (loopback) failed: {e}"
                    ))
                })?;

            let capture_client: IAudioCaptureClient = audio_client
                .GetService()
                .map_err(|e| CaptureError::Unknown(format!("GetService failed: {e}")))?;

            // MMCSS registration for real-time priority
            let mut task_index: u32 = 0;
            let task_name: Vec<u16> = "Pro Audio\0".encode_utf16().collect();
            let _mmcss_handle =
                AvSetMmThreadCharacteristicsW(PCWSTR(task_name.as_ptr()), &mut task_index);

            audio_client.Start().map_err(|e| {
                CaptureError::CaptureUnavailable(format!("IAudioClient::Start failed: {e}"))
            })?;

            log::info!(
                "loopback capture started: {:?} {}-bit, {} ch, {} Hz",
                format.encoding,
                format.bits_per_sample,
                format.channels,
                mix_format.nSamplesPerSec
            );

            Ok(Self {
                audio_client,
                capture_client,
                format,
                frame_size,
                _mix_format: mix_format_guard,
                _com: com,
            })
        }
    }

    /// Poll for packets until `running` clears, then stop the client.
    fn run(&self, running: &AtomicBool, on_buffer: RawBufferCallback) -> Result<(), CaptureError> {
        let result = self.poll_packets(running, on_buffer);
        unsafe {
            let _ = self.audio_client.Stop();
        }
        result
    }

    /// Packet pump: poll every 10ms, draining all pending packets.
    fn poll_packets(
        &self,
        running: &AtomicBool,
        on_buffer: RawBufferCallback,
    ) -> Result<(), CaptureError> {
        unsafe {
            while running.load(Ordering::SeqCst) {
                thread::sleep(Duration::from_millis(10));

                let mut packet_length = self
                    .capture_client
                    .GetNextPacketSize()
                    .map_err(|e| CaptureError::Unknown(format!("GetNextPacketSize failed: {e}")))?;

                while packet_length > 0 {
                    let mut buffer_ptr: *mut u8 = std::ptr::null_mut();
                    let mut num_frames: u32 = 0;
                    let mut flags: u32 = 0;

                    self.capture_client
                        .GetBuffer(&mut buffer_ptr, &mut num_frames, &mut flags, None, None)
                        .map_err(|e| CaptureError::Unknown(format!("GetBuffer failed: {e}")))?;

                    if num_frames > 0 && !buffer_ptr.is_null() {
                        let byte_len = num_frames as usize * self.frame_size;

                        if flags & (AUDCLNT_BUFFERFLAGS_SILENT.0 as u32) != 0 {
                            // DRM or silence: deliver zeroed bytes of equal size
                            let silence = vec![0u8; byte_len];
                            on_buffer(&silence, self.format);
                        } else {
                            let bytes = std::slice::from_raw_parts(buffer_ptr, byte_len);
                            on_buffer(bytes, self.format);
                        }
                    }

                    self.capture_client
                        .ReleaseBuffer(num_frames)
                        .map_err(|e| CaptureError::Unknown(format!("ReleaseBuffer failed: {e}")))?;

                    packet_length = self
                        .capture_client
                        .GetNextPacketSize()
                        .map_err(|e| {
                            CaptureError::Unknown(format!("GetNextPacketSize failed: {e}"))
                        })?;
                }
            }
        }

        Ok(())
    }
}

/// Frees the `GetMixFormat` allocation, on success and error paths alike.
struct MixFormatGuard(*mut WAVEFORMATEX);

impl Drop for MixFormatGuard {
    fn drop(&mut self) {
        unsafe {
            CoTaskMemFree(Some(self.0 as *const _));
        }
    }
}

struct CoUninitializeGuard;

impl Drop for CoUninitializeGuard {
    fn drop(&mut self) {
        unsafe {
            CoUninitialize();
        }
    }
}
