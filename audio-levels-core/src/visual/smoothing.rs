//! Asymmetric attack/decay smoothing for meter bar heights.
//!
//! Turns instantaneous shaped levels into visually stable heights:
//! a logarithmic perceptual curve maps level to a target height, and each
//! fixed tick moves the displayed height toward it — fast on the way up
//! (VU-meter attack), slow on the way down (graceful release).

use crate::models::levels::ChannelLevels;

/// Maximum bar height in output units.
pub const MAX_BAR_HEIGHT: f64 = 370.0;

/// Decay smoothing factor; each falling tick covers 20% of the gap.
const SMOOTHING_FACTOR: f64 = 0.8;

/// Fraction of the gap covered per rising tick.
const ATTACK_RATE: f64 = 0.3;

/// Levels at or below this are treated as silence.
const MIN_THRESHOLD: f64 = 0.01;

/// Within this distance the height snaps to target, ending the decay
/// instead of approaching it asymptotically forever.
const SNAP_DISTANCE: f64 = 0.5;

/// Map a level in `[0, 1]` to a bar height in `[0, MAX_BAR_HEIGHT]`.
///
/// `log10(level * 9 + 1)` runs 0 → 1 over the unit interval, giving the
/// low end more visual travel than a linear map would.
pub fn level_to_height(level: f32) -> f64 {
    let level = level.clamp(0.0, 1.0) as f64;
    let log_level = if level > MIN_THRESHOLD {
        (level * 9.0 + 1.0).log10()
    } else {
        0.0
    };
    log_level * MAX_BAR_HEIGHT
}

/// Advance `current` one tick toward `target` with asymmetric ballistics.
fn approach(current: f64, target: f64) -> f64 {
    let difference = target - current;
    if difference.abs() <= SNAP_DISTANCE {
        return target;
    }
    if difference > 0.0 {
        current + difference * ATTACK_RATE
    } else {
        current + difference * (1.0 - SMOOTHING_FACTOR)
    }
}

/// Smoothed height state for one channel.
#[derive(Debug, Clone, Default)]
pub struct ChannelSmoother {
    current: f64,
    target: f64,
}

impl ChannelSmoother {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target from a shaped level. Takes effect on the next tick.
    pub fn set_level(&mut self, level: f32) {
        self.target = level_to_height(level);
    }

    pub fn set_target(&mut self, target: f64) {
        self.target = target;
    }

    /// Advance one tick; returns the new height.
    pub fn tick(&mut self) -> f64 {
        self.current = approach(self.current, self.target);
        self.current
    }

    pub fn height(&self) -> f64 {
        self.current
    }

    pub fn target(&self) -> f64 {
        self.target
    }
}

/// Paired left/right smoothers driven from one `ChannelLevels` value.
#[derive(Debug, Clone, Default)]
pub struct LevelSmoother {
    left: ChannelSmoother,
    right: ChannelSmoother,
}

impl LevelSmoother {
    /// Fresh smoother with both channels at zero.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update_levels(&mut self, levels: ChannelLevels) {
        self.left.set_level(levels.left);
        self.right.set_level(levels.right);
    }

    /// Advance both channels one tick.
    pub fn tick(&mut self) {
        self.left.tick();
        self.right.tick();
    }

    pub fn heights(&self) -> (f64, f64) {
        (self.left.height(), self.right.height())
    }
}
