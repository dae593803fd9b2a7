//! Level shaping: gain, stereo-separation exaggeration, sensitivity.

use crate::models::levels::ChannelLevels;
use crate::models::params::ShapingParameters;

/// Shape raw peak levels with a configuration snapshot.
///
/// The order is load-bearing and must not change:
/// 1. gain boost, each channel clamped to <= 1.0;
/// 2. separation (only when the factor exceeds 1.0): spread each channel
///    away from the shared average, clamped to [0, 1];
/// 3. sensitivity, clamped to <= 1.0.
///
/// Gain models raw signal boost ahead of separation; separation
/// exaggerates genuine stereo imbalance against the shared loudness
/// baseline; sensitivity is the final perceptual multiplier.
pub fn shape(levels: ChannelLevels, params: &ShapingParameters) -> ChannelLevels {
    let mut left = (levels.left * params.gain_boost).min(1.0);
    let mut right = (levels.right * params.gain_boost).min(1.0);

    if params.channel_separation > 1.0 {
        let average = (left + right) / 2.0;
        left = (average + (left - average) * params.channel_separation).clamp(0.0, 1.0);
        right = (average + (right - average) * params.channel_separation).clamp(0.0, 1.0);
    }

    left = (left * params.sensitivity).min(1.0);
    right = (right * params.sensitivity).min(1.0);

    ChannelLevels::new(left, right)
}
