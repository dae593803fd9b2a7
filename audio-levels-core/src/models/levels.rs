/// Instantaneous per-channel peak magnitudes, in `[0.0, 1.0]`.
///
/// For mono sources the single channel is duplicated into both fields,
/// so `left == right` always holds after decoding mono audio.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChannelLevels {
    pub left: f32,
    pub right: f32,
}

impl ChannelLevels {
    pub fn new(left: f32, right: f32) -> Self {
        Self { left, right }
    }

    /// Both channels at zero.
    pub fn silent() -> Self {
        Self::default()
    }

    /// Clamp both channels into `[0.0, 1.0]`.
    pub fn clamped(self) -> Self {
        Self {
            left: self.left.clamp(0.0, 1.0),
            right: self.right.clamp(0.0, 1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silent_is_zero() {
        let l = ChannelLevels::silent();
        assert_eq!(l.left, 0.0);
        assert_eq!(l.right, 0.0);
    }

    #[test]
    fn clamped_bounds_both_channels() {
        let l = ChannelLevels::new(-0.5, 1.7).clamped();
        assert_eq!(l.left, 0.0);
        assert_eq!(l.right, 1.0);
    }
}
