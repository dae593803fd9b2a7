//! Left/right dominance metric and balance bar geometry.
//!
//! Derives a signed dominance value from shaped levels and turns it into
//! a bar that grows left or right from a fixed center, with symmetric
//! smoothing (no attack/decay asymmetry, unlike the height meters).

use std::fmt;

use crate::models::levels::ChannelLevels;

/// Maximum bar width per side, in output units.
pub const MAX_BAR_WIDTH: f64 = 170.0;

/// X position of the bar's center anchor.
pub const CENTER_POSITION: f64 = 180.0;

/// Symmetric smoothing factor; each tick covers 30% of the gap.
const SMOOTHING_FACTOR: f64 = 0.7;

/// Absolute dominance below this reads as balanced.
const BALANCE_THRESHOLD: f32 = 0.02;

/// Snap-to-target distance, same rule as the height smoother.
const SNAP_DISTANCE: f64 = 0.5;

/// Human-readable balance description.
///
/// Percentages are the dominance intensity rounded to whole percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceLabel {
    Balanced,
    Left(u32),
    Right(u32),
}

impl Default for BalanceLabel {
    fn default() -> Self {
        Self::Balanced
    }
}

impl fmt::Display for BalanceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Balanced => write!(f, "Balanced"),
            Self::Left(pct) => write!(f, "L {pct}%"),
            Self::Right(pct) => write!(f, "R {pct}%"),
        }
    }
}

/// Balance meter state, updated per level event and advanced per tick.
#[derive(Debug, Clone)]
pub struct BalanceMeter {
    dominance: f32,

    left_width: f64,
    left_position: f64,
    right_width: f64,
    label: BalanceLabel,

    target_left_width: f64,
    target_left_position: f64,
    target_right_width: f64,
    target_label: BalanceLabel,
}

impl Default for BalanceMeter {
    fn default() -> Self {
        Self {
            dominance: 0.0,
            left_width: 0.0,
            left_position: CENTER_POSITION,
            right_width: 0.0,
            label: BalanceLabel::Balanced,
            target_left_width: 0.0,
            target_left_position: CENTER_POSITION,
            target_right_width: 0.0,
            target_label: BalanceLabel::Balanced,
        }
    }
}

impl BalanceMeter {
    /// Fresh meter: centered, zero widths, balanced.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute targets from the latest shaped levels.
    ///
    /// Dominance is `clamp(right - left, -1, 1)`: negative means the left
    /// channel is stronger. The left bar grows leftward from the center
    /// (its position moves with its width); the right bar grows rightward
    /// from a fixed anchor.
    pub fn update_levels(&mut self, levels: ChannelLevels) {
        let difference = (levels.right - levels.left).clamp(-1.0, 1.0);
        self.dominance = difference;

        if difference.abs() < BALANCE_THRESHOLD {
            self.target_left_width = 0.0;
            self.target_left_position = CENTER_POSITION;
            self.target_right_width = 0.0;
            self.target_label = BalanceLabel::Balanced;
        } else if difference < 0.0 {
            let intensity = difference.abs();
            self.target_left_width = intensity as f64 * MAX_BAR_WIDTH;
            self.target_left_position = CENTER_POSITION - self.target_left_width;
            self.target_right_width = 0.0;
            self.target_label = BalanceLabel::Left(percent(intensity));
        } else {
            let intensity = difference;
            self.target_left_width = 0.0;
            self.target_left_position = CENTER_POSITION;
            self.target_right_width = intensity as f64 * MAX_BAR_WIDTH;
            self.target_label = BalanceLabel::Right(percent(intensity));
        }
    }

    /// Advance widths and position one tick; the label is not smoothed
    /// and applies immediately.
    pub fn tick(&mut self) {
        self.left_width = approach(self.left_width, self.target_left_width);
        self.left_position = approach(self.left_position, self.target_left_position);
        self.right_width = approach(self.right_width, self.target_right_width);
        self.label = self.target_label;
    }

    /// Signed dominance in `[-1, 1]`; positive means right-dominant.
    pub fn dominance(&self) -> f32 {
        self.dominance
    }

    pub fn left_width(&self) -> f64 {
        self.left_width
    }

    pub fn left_position(&self) -> f64 {
        self.left_position
    }

    pub fn right_width(&self) -> f64 {
        self.right_width
    }

    pub fn label(&self) -> BalanceLabel {
        self.label
    }
}

fn percent(intensity: f32) -> u32 {
    (intensity * 100.0).round() as u32
}

fn approach(current: f64, target: f64) -> f64 {
    let difference = target - current;
    if difference.abs() <= SNAP_DISTANCE {
        target
    } else {
        current + difference * (1.0 - SMOOTHING_FACTOR)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn equal_levels_read_balanced() {
        let mut meter = BalanceMeter::new();
        meter.update_levels(ChannelLevels::new(0.1, 0.1));
        meter.tick();

        assert_eq!(meter.dominance(), 0.0);
        assert_eq!(meter.label(), BalanceLabel::Balanced);
        assert_eq!(meter.label().to_string(), "Balanced");
    }

    #[test]
    fn tiny_differences_stay_balanced() {
        let mut meter = BalanceMeter::new();
        meter.update_levels(ChannelLevels::new(0.50, 0.51));
        meter.tick();

        assert_eq!(meter.label(), BalanceLabel::Balanced);
    }

    #[test]
    fn right_dominance_label_and_width() {
        let mut meter = BalanceMeter::new();
        meter.update_levels(ChannelLevels::new(0.0, 0.5));

        assert_relative_eq!(meter.dominance(), 0.5);
        for _ in 0..100 {
            meter.tick();
        }
        assert_eq!(meter.label(), BalanceLabel::Right(50));
        assert_eq!(meter.label().to_string(), "R 50%");
        assert_relative_eq!(meter.right_width(), 0.5 * MAX_BAR_WIDTH, epsilon = 1e-9);
        assert_eq!(meter.left_width(), 0.0);
        assert_eq!(meter.left_position(), CENTER_POSITION);
    }

    #[test]
    fn left_dominance_moves_the_left_bar() {
        let mut meter = BalanceMeter::new();
        meter.update_levels(ChannelLevels::new(0.9, 0.1));

        assert_relative_eq!(meter.dominance(), -0.8);
        for _ in 0..100 {
            meter.tick();
        }
        assert_eq!(meter.label(), BalanceLabel::Left(80));
        assert_eq!(meter.label().to_string(), "L 80%");
        // f32 level subtraction carries a little rounding into the width
        assert_relative_eq!(meter.left_width(), 0.8 * MAX_BAR_WIDTH, epsilon = 1e-4);
        assert_relative_eq!(
            meter.left_position(),
            CENTER_POSITION - 0.8 * MAX_BAR_WIDTH,
            epsilon = 1e-4
        );
        assert_eq!(meter.right_width(), 0.0);
    }

    #[test]
    fn dominance_is_clamped() {
        let mut meter = BalanceMeter::new();
        // Levels arrive clamped in practice, but the meter still bounds.
        meter.update_levels(ChannelLevels::new(0.0, 2.0));
        assert_eq!(meter.dominance(), 1.0);
    }

    #[test]
    fn smoothing_is_symmetric() {
        let mut meter = BalanceMeter::new();
        meter.update_levels(ChannelLevels::new(0.0, 1.0));
        meter.tick();
        let grow_step = meter.right_width(); // 170 * 0.3

        for _ in 0..100 {
            meter.tick();
        }
        meter.update_levels(ChannelLevels::new(0.0, 0.0));
        let before = meter.right_width();
        meter.tick();
        let shrink_step = before - meter.right_width();

        assert_relative_eq!(grow_step, MAX_BAR_WIDTH * 0.3, epsilon = 1e-9);
        assert_relative_eq!(shrink_step, MAX_BAR_WIDTH * 0.3, epsilon = 1e-9);
    }

    #[test]
    fn snap_terminates_the_approach() {
        let mut meter = BalanceMeter::new();
        meter.update_levels(ChannelLevels::new(0.0, 0.5));
        for _ in 0..100 {
            meter.tick();
        }
        // Exactly at target, further ticks are fixed points.
        let settled = meter.right_width();
        meter.tick();
        assert_eq!(meter.right_width(), settled);
        assert_relative_eq!(settled, 0.5 * MAX_BAR_WIDTH, epsilon = 1e-9);
    }

    #[test]
    fn label_percent_rounds_to_whole() {
        let mut meter = BalanceMeter::new();
        meter.update_levels(ChannelLevels::new(0.0, 0.666));
        meter.tick();
        assert_eq!(meter.label(), BalanceLabel::Right(67));
    }
}
