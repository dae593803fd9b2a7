use crate::models::error::CaptureError;
use crate::models::levels::ChannelLevels;

/// Event delegate for level capture notifications.
///
/// Both methods are called from the capture thread, not the UI thread.
/// Implementations should marshal to the UI thread if needed.
pub trait LevelDelegate: Send + Sync {
    /// Called for every captured buffer with the shaped channel levels.
    /// Cadence follows device buffer delivery, not a fixed rate.
    fn on_levels_changed(&self, levels: ChannelLevels);

    /// Called when the device stream ends unexpectedly. The session has
    /// already transitioned to stopped when this fires.
    fn on_interrupted(&self, error: &CaptureError);
}
