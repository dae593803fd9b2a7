//! Single-slot handoff between the capture callback and the visual tick.
//!
//! The capture thread publishes at device-delivery cadence; the tick
//! thread reads at ~60 Hz. Only the most recent value matters, so the
//! slot overwrites rather than queues. Both `f32` levels are packed into
//! one `AtomicU64`, so a read can never observe a torn pair.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::models::levels::ChannelLevels;

/// Last-value-wins mailbox holding the most recent `ChannelLevels`.
///
/// Reads are non-destructive: a consumer that ticks between publishes
/// keeps seeing the prior value.
#[derive(Debug, Default)]
pub struct LevelMailbox {
    slot: AtomicU64,
}

impl LevelMailbox {
    /// A mailbox holding silence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the slot with `levels`, discarding whatever was there.
    pub fn publish(&self, levels: ChannelLevels) {
        self.slot.store(pack(levels), Ordering::Release);
    }

    /// The most recently published levels (silence before any publish).
    pub fn latest(&self) -> ChannelLevels {
        unpack(self.slot.load(Ordering::Acquire))
    }
}

fn pack(levels: ChannelLevels) -> u64 {
    (u64::from(levels.left.to_bits()) << 32) | u64::from(levels.right.to_bits())
}

fn unpack(bits: u64) -> ChannelLevels {
    ChannelLevels {
        left: f32::from_bits((bits >> 32) as u32),
        right: f32::from_bits(bits as u32),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_silent() {
        let mailbox = LevelMailbox::new();
        assert_eq!(mailbox.latest(), ChannelLevels::silent());
    }

    #[test]
    fn last_value_wins() {
        let mailbox = LevelMailbox::new();
        mailbox.publish(ChannelLevels::new(0.1, 0.2));
        mailbox.publish(ChannelLevels::new(0.3, 0.4));

        assert_eq!(mailbox.latest(), ChannelLevels::new(0.3, 0.4));
    }

    #[test]
    fn read_is_not_destructive() {
        let mailbox = LevelMailbox::new();
        mailbox.publish(ChannelLevels::new(0.5, 0.6));

        assert_eq!(mailbox.latest(), ChannelLevels::new(0.5, 0.6));
        assert_eq!(mailbox.latest(), ChannelLevels::new(0.5, 0.6));
    }

    #[test]
    fn round_trips_exact_bit_patterns() {
        let mailbox = LevelMailbox::new();
        let levels = ChannelLevels::new(1.0, f32::MIN_POSITIVE);
        mailbox.publish(levels);
        assert_eq!(mailbox.latest(), levels);
    }

    #[test]
    fn concurrent_publish_never_tears() {
        use std::sync::Arc;
        use std::thread;

        let mailbox = Arc::new(LevelMailbox::new());
        // Writers only publish pairs with left == right, so a torn read
        // would show up as left != right.
        let writers: Vec<_> = (0..2)
            .map(|_| {
                let mb = Arc::clone(&mailbox);
                thread::spawn(move || {
                    for i in 0..10_000u32 {
                        let v = (i % 100) as f32 / 100.0;
                        mb.publish(ChannelLevels::new(v, v));
                    }
                })
            })
            .collect();

        for _ in 0..10_000 {
            let levels = mailbox.latest();
            assert_eq!(levels.left, levels.right);
        }
        for w in writers {
            w.join().unwrap();
        }
    }
}
