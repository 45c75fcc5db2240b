//! Keystroke-driven request bookkeeping: debounce and latest-request-wins.

use std::time::{Duration, Instant};

/// Identifies one issued search request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestToken(u64);

/// Hands out tokens and accepts only responses for the newest one.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: u64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a token for a new request, superseding all earlier ones.
    pub fn issue(&mut self) -> RequestToken {
        self.latest += 1;
        RequestToken(self.latest)
    }

    /// Whether a response carrying `token` is still current.
    pub fn accept(&self, token: RequestToken) -> bool {
        token.0 == self.latest
    }

    /// Invalidate every outstanding token without issuing a new one.
    pub fn cancel(&mut self) {
        self.latest += 1;
    }
}

/// Fires once `delay` after the most recent keystroke.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    last: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, last: None }
    }

    /// Record a keystroke at `now`.
    pub fn touch(&mut self, now: Instant) {
        self.last = Some(now);
    }

    /// Forget a pending burst so it never fires.
    pub fn cancel(&mut self) {
        self.last = None;
    }

    pub fn is_pending(&self) -> bool {
        self.last.is_some()
    }

    /// True once per burst, when `delay` has passed since the last touch.
    pub fn ready(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.saturating_duration_since(last) >= self.delay => {
                self.last = None;
                true
            }
            _ => false,
        }
    }
}
