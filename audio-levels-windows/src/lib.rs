//! # audio-levels-windows
//!
//! Windows WASAPI backend for audio-levels-core.
//!
//! Provides `WasapiLoopbackCapture`, a `CaptureProvider` that captures
//! the system's own audio output (the mix going to the default render
//! endpoint) via `AUDCLNT_STREAMFLAGS_LOOPBACK`. No special permissions
//! are needed on Windows.
//!
//! ## Platform Requirements
//! - Windows 10 1703+ (build 15063)
//! - Visual Studio Build Tools 2022 + Windows SDK for linking
//!
//! ## Usage
//! ```ignore
//! use audio_levels_core::{LevelCaptureSession, ShapingParameters, VisualEngine};
//! use audio_levels_windows::WasapiLoopbackCapture;
//! use std::sync::Arc;
//!
//! let provider = WasapiLoopbackCapture::default_device()?;
//! let mut session = LevelCaptureSession::new(provider, Arc::new(ShapingParameters::default()));
//! let mut engine = VisualEngine::new(session.mailbox());
//! session.start()?;
//! engine.start();
//! ```

#[cfg(target_os = "windows")]
pub mod wasapi_loopback;

#[cfg(target_os = "windows")]
pub use wasapi_loopback::WasapiLoopbackCapture;
