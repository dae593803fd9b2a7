//! Fixed-rate tick driver for the smoothing and balance state.
//!
//! Runs at ~60 Hz on its own thread, reading only the most recent levels
//! from the mailbox (intermediate events between ticks are dropped by
//! design). Presentation layers poll `frame()` whenever they redraw.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;

use crate::processing::mailbox::LevelMailbox;
use crate::visual::balance::{BalanceLabel, BalanceMeter, CENTER_POSITION};
use crate::visual::smoothing::LevelSmoother;

/// ~60 FPS animation cadence.
const TICK_INTERVAL: Duration = Duration::from_millis(16);

/// One tick's worth of visual output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualFrame {
    pub left_height: f64,
    pub right_height: f64,
    pub left_bar_width: f64,
    pub left_bar_position: f64,
    pub right_bar_width: f64,
    pub label: BalanceLabel,
}

/// The idle frame mirrors a fresh meter: zero heights and widths, with
/// the left balance bar anchored at the center position.
impl Default for VisualFrame {
    fn default() -> Self {
        Self {
            left_height: 0.0,
            right_height: 0.0,
            left_bar_width: 0.0,
            left_bar_position: CENTER_POSITION,
            right_bar_width: 0.0,
            label: BalanceLabel::Balanced,
        }
    }
}

/// Owns the tick thread and the published frame snapshot.
///
/// `start()` begins ticking from zeroed visual state; `stop()` halts the
/// thread deterministically (joins before returning). State never
/// survives a stop/start cycle.
pub struct VisualEngine {
    mailbox: Arc<LevelMailbox>,
    frame: Arc<Mutex<VisualFrame>>,
    running: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl VisualEngine {
    pub fn new(mailbox: Arc<LevelMailbox>) -> Self {
        Self {
            mailbox,
            frame: Arc::new(Mutex::new(VisualFrame::default())),
            running: Arc::new(AtomicBool::new(false)),
            handle: None,
        }
    }

    /// Start the tick thread with fresh (zeroed) smoothing state.
    /// No-op if already running.
    pub fn start(&mut self) {
        if self.running.swap(true, Ordering::SeqCst) {
            return;
        }

        *self.frame.lock() = VisualFrame::default();

        let running = Arc::clone(&self.running);
        let mailbox = Arc::clone(&self.mailbox);
        let frame = Arc::clone(&self.frame);

        let handle = thread::Builder::new()
            .name("visual-tick".into())
            .spawn(move || {
                let mut smoother = LevelSmoother::new();
                let mut balance = BalanceMeter::new();

                while running.load(Ordering::SeqCst) {
                    let levels = mailbox.latest();
                    smoother.update_levels(levels);
                    balance.update_levels(levels);
                    smoother.tick();
                    balance.tick();

                    let (left_height, right_height) = smoother.heights();
                    *frame.lock() = VisualFrame {
                        left_height,
                        right_height,
                        left_bar_width: balance.left_width(),
                        left_bar_position: balance.left_position(),
                        right_bar_width: balance.right_width(),
                        label: balance.label(),
                    };

                    thread::sleep(TICK_INTERVAL);
                }
            })
            .expect("failed to spawn visual tick thread");

        self.handle = Some(handle);
        log::info!("visual tick engine started");
    }

    /// Stop ticking and join the thread. Idempotent.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
            log::info!("visual tick engine stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Snapshot of the most recently published frame.
    pub fn frame(&self) -> VisualFrame {
        *self.frame.lock()
    }
}

impl Drop for VisualEngine {
    fn drop(&mut self) {
        self.stop();
    }
}
