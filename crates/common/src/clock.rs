//! Clock and rate-control utilities for playback sessions.
//!
//! A playback session is anchored to a monotonic epoch captured when the
//! session is opened. This module provides:
//! - The session clock
//! - A rate controller used to coalesce high-frequency position updates

use std::time::Instant;

/// A monotonic clock anchored to the moment a playback or export session
/// was opened.
#[derive(Debug, Clone)]
pub struct SessionClock {
    epoch: Instant,

    /// Wall-clock time at epoch (RFC 3339 string).
    epoch_wall: String,
}

impl SessionClock {
    /// Create a new clock anchored to now.
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
            epoch_wall: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Nanoseconds elapsed since the session opened.
    pub fn elapsed_ns(&self) -> u64 {
        self.epoch.elapsed().as_nanos() as u64
    }

    /// Wall-clock time at session start.
    pub fn epoch_wall(&self) -> &str {
        &self.epoch_wall
    }
}

/// Rate controller for coalescing notifications.
#[derive(Debug)]
pub struct RateController {
    target_interval_ns: u64,
    last_tick_ns: Option<u64>,
}

impl RateController {
    /// Create a controller targeting the given Hz rate.
    ///
    /// A rate of 0 is treated as 1 Hz.
    pub fn new(target_hz: u32) -> Self {
        Self {
            target_interval_ns: 1_000_000_000 / target_hz.max(1) as u64,
            last_tick_ns: None,
        }
    }

    /// Check if enough time has passed for the next tick.
    /// Returns true and updates internal state if ready.
    /// The first call always returns true.
    pub fn should_tick(&mut self, current_ns: u64) -> bool {
        match self.last_tick_ns {
            None => {
                self.last_tick_ns = Some(current_ns);
                true
            }
            Some(last) if current_ns >= last + self.target_interval_ns => {
                self.last_tick_ns = Some(current_ns);
                true
            }
            _ => false,
        }
    }

    /// Record an out-of-band tick (e.g. a forced publish) so the next
    /// regular tick is measured from `current_ns`.
    pub fn mark(&mut self, current_ns: u64) {
        self.last_tick_ns = Some(current_ns);
    }

    /// Target interval in nanoseconds.
    pub fn interval_ns(&self) -> u64 {
        self.target_interval_ns
    }
}
