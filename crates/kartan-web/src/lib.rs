#![forbid(unsafe_code)]

//! `kartan-web` drives the Kartan runtime from a browser shell.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding environment (JS) performs the HTTP
//!   requests this crate describes and pushes the responses back in.
//! - **Deterministic time**: the host advances a monotonic clock explicitly;
//!   toast expiry reads nothing else.
//! - **No blocking / no threads**: suitable for `wasm32-unknown-unknown`.
//!
//! The crate does not bind to `wasm-bindgen`. A thin JS wrapper owns a
//! [`WebSession`] and forwards clicks, resizes, and network completions.

pub mod mail;
pub mod notify;
pub mod payload;
pub mod session;

use std::time::Duration;

pub use mail::{MailError, MailRequest, decode_mail_response};
pub use notify::{Notification, NotificationId, NotificationQueue, QueueAction, QueueConfig};
pub use payload::{LoadError, decode_payload};
pub use session::{HostRequest, SessionStep, WebSession};

/// Deterministic monotonic clock controlled by the host.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Set current monotonic time. Going backwards is ignored.
    pub fn set(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }

    #[inline]
    pub const fn now(&self) -> Duration {
        self.now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_is_monotonic() {
        let mut clock = DeterministicClock::new();
        clock.advance(Duration::from_millis(16));
        clock.set(Duration::from_millis(10));
        assert_eq!(clock.now(), Duration::from_millis(16));
        clock.set(Duration::from_secs(1));
        assert_eq!(clock.now(), Duration::from_secs(1));
    }
}
