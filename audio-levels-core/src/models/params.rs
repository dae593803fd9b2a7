use serde::{Deserialize, Serialize};

/// Level-shaping configuration, owned by the caller's settings layer.
///
/// The core reads an immutable snapshot of these per shaping pass; it
/// never mutates or persists them. All factors default to 1.0 (neutral).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapingParameters {
    /// Final perceptual multiplier. 1.0 = normal, > 1.0 = more sensitive.
    pub sensitivity: f32,

    /// Stereo separation exaggeration. 1.0 = normal, > 1.0 amplifies the
    /// left/right difference relative to the channel average.
    pub channel_separation: f32,

    /// Raw signal boost applied before separation. 1.0 = normal.
    pub gain_boost: f32,
}

impl ShapingParameters {
    pub fn validate(&self) -> Result<(), String> {
        if self.sensitivity < 0.0 {
            return Err("sensitivity must be non-negative".into());
        }
        if self.channel_separation < 0.0 {
            return Err("channel separation must be non-negative".into());
        }
        if self.gain_boost < 0.0 {
            return Err("gain boost must be non-negative".into());
        }
        Ok(())
    }
}

impl Default for ShapingParameters {
    fn default() -> Self {
        Self {
            sensitivity: 1.0,
            channel_separation: 1.0,
            gain_boost: 1.0,
        }
    }
}
