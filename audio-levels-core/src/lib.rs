//! # audio-levels-core
//!
//! Platform-agnostic stereo loudness metering core.
//!
//! Converts a live loopback audio stream into per-channel, per-frame
//! loudness values suitable for real-time visual rendering. Platform
//! backends (Windows WASAPI loopback) implement the `CaptureProvider`
//! trait and plug into the generic `LevelCaptureSession`.
//!
//! ## Architecture
//!
//! ```text
//! audio-levels-core (this crate)
//! ├── traits/       ← CaptureProvider, LevelDelegate, ShapingConfigProvider
//! ├── models/       ← CaptureError, AudioFormat, ChannelLevels, ShapingParameters
//! ├── processing/   ← peak decoder, level shaper, single-slot level mailbox
//! ├── session/      ← LevelCaptureSession (generic orchestrator)
//! └── visual/       ← smoothing, balance meter, 60 Hz VisualEngine
//! ```
//!
//! Data flow:
//!
//! ```text
//! device → CaptureProvider → decode → shape ─┬→ LevelMailbox → VisualEngine (60 Hz)
//!                                            └→ LevelDelegate (per buffer)
//! ```

pub mod models;
pub mod processing;
pub mod session;
pub mod traits;
pub mod visual;

// Re-export key types at crate root for convenience.
pub use models::error::CaptureError;
pub use models::format::{AudioFormat, SampleEncoding};
pub use models::levels::ChannelLevels;
pub use models::params::ShapingParameters;
pub use models::source::AudioSource;
pub use processing::decoder::decode_peak_levels;
pub use processing::mailbox::LevelMailbox;
pub use processing::shaper::shape;
pub use session::level_session::LevelCaptureSession;
pub use traits::capture_provider::{CaptureProvider, RawBufferCallback, StreamFaultCallback};
pub use traits::config_provider::{ShapingConfigProvider, SharedShapingConfig};
pub use traits::level_delegate::LevelDelegate;
pub use visual::balance::{BalanceLabel, BalanceMeter};
pub use visual::engine::{VisualEngine, VisualFrame};
pub use visual::smoothing::{level_to_height, ChannelSmoother, LevelSmoother};
