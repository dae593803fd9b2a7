use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::models::error::CaptureError;
use crate::models::levels::ChannelLevels;
use crate::processing::decoder::decode_peak_levels;
use crate::processing::mailbox::LevelMailbox;
use crate::processing::shaper::shape;
use crate::traits::capture_provider::{CaptureProvider, RawBufferCallback, StreamFaultCallback};
use crate::traits::config_provider::ShapingConfigProvider;
use crate::traits::level_delegate::LevelDelegate;

/// Loopback level capture session, generic over the platform backend.
///
/// Wires the provider's buffer callback through decode → shape and fans
/// the result out to the level mailbox (for the visual tick thread) and
/// the optional delegate (per-buffer push notifications). The shaping
/// configuration is re-read as a snapshot for every buffer, so settings
/// changes apply live.
///
/// Per-buffer failures are isolated: an undecodable buffer reads as
/// silence and capture continues. An unexpected stream termination moves
/// the session to stopped and surfaces `RecordingInterrupted` through the
/// delegate; restarting is the caller's decision.
pub struct LevelCaptureSession<P: CaptureProvider> {
    provider: P,
    config: Arc<dyn ShapingConfigProvider>,
    delegate: Option<Arc<dyn LevelDelegate>>,
    mailbox: Arc<LevelMailbox>,
    capturing: Arc<AtomicBool>,
}

impl<P: CaptureProvider> LevelCaptureSession<P> {
    pub fn new(provider: P, config: Arc<dyn ShapingConfigProvider>) -> Self {
        Self {
            provider,
            config,
            delegate: None,
            mailbox: Arc::new(LevelMailbox::new()),
            capturing: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn set_delegate(&mut self, delegate: Arc<dyn LevelDelegate>) {
        self.delegate = Some(delegate);
    }

    /// The mailbox this session publishes into; hand it to a
    /// `VisualEngine` to drive meters.
    pub fn mailbox(&self) -> Arc<LevelMailbox> {
        Arc::clone(&self.mailbox)
    }

    pub fn is_capturing(&self) -> bool {
        self.capturing.load(Ordering::SeqCst)
    }

    /// Begin the loopback capture session.
    ///
    /// No-op when already capturing. Fails with `CaptureUnavailable` when
    /// the provider has no usable device.
    pub fn start(&mut self) -> Result<(), CaptureError> {
        if self.capturing.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        if !self.provider.is_available() {
            self.capturing.store(false, Ordering::SeqCst);
            return Err(CaptureError::CaptureUnavailable(
                "no usable loopback device".into(),
            ));
        }

        let on_buffer: RawBufferCallback = {
            let capturing = Arc::clone(&self.capturing);
            let config = Arc::clone(&self.config);
            let mailbox = Arc::clone(&self.mailbox);
            let delegate = self.delegate.clone();

            Arc::new(move |buffer, format| {
                if !capturing.load(Ordering::SeqCst) {
                    return;
                }

                let levels = match decode_peak_levels(buffer, format) {
                    Ok(raw) => shape(raw, &config.shaping_parameters()),
                    Err(e) => {
                        // Bad buffer, not a bad session: read as silence.
                        log::warn!("decode failed, substituting silence: {e}");
                        ChannelLevels::silent()
                    }
                };

                mailbox.publish(levels);
                if let Some(ref d) = delegate {
                    d.on_levels_changed(levels);
                }
            })
        };

        let on_fault: StreamFaultCallback = {
            let capturing = Arc::clone(&self.capturing);
            let delegate = self.delegate.clone();

            Arc::new(move |error| {
                // Flip to stopped before notifying so the delegate sees a
                // consistent session state.
                capturing.store(false, Ordering::SeqCst);
                log::error!("capture stream terminated unexpectedly: {error}");
                if let Some(ref d) = delegate {
                    d.on_interrupted(&error);
                }
            })
        };

        if let Err(e) = self.provider.start(on_buffer, on_fault) {
            self.capturing.store(false, Ordering::SeqCst);
            return Err(e);
        }

        log::info!("level capture started on {}", self.provider.device_info().name);
        Ok(())
    }

    /// Halt capture and release device resources.
    ///
    /// Idempotent and synchronous: once this returns, no further level
    /// notifications are delivered. Safe to call when not capturing.
    pub fn stop(&mut self) -> Result<(), CaptureError> {
        let was_capturing = self.capturing.swap(false, Ordering::SeqCst);
        // Provider stop joins the capture thread, so teardown is
        // complete, not merely requested, when it returns.
        self.provider.stop()?;
        if was_capturing {
            log::info!("level capture stopped");
        }
        Ok(())
    }
}

impl<P: CaptureProvider> Drop for LevelCaptureSession<P> {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}
