//! Redraw coalescing
//!
//! Animation ticks and drag updates only mark the surface dirty. A flush
//! ticker turns pending marks into at most one redraw per interval and goes
//! quiet once an interval passes with nothing pending.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct RepaintScheduler {
    interval: Duration,
    pending: bool,
    armed: bool,
    last_flush: Option<Instant>,
    flush_count: u64,
}

/// What the flush ticker decided when it fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushDecision {
    /// Emit one redraw and fire again at the given time.
    Flush { rearm_at: Instant },
    /// Nothing was pending; the ticker disarms.
    Idle,
}

impl RepaintScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            pending: false,
            armed: false,
            last_flush: None,
            flush_count: 0,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Number of redraws flushed so far.
    pub fn flush_count(&self) -> u64 {
        self.flush_count
    }

    /// Record that something visible changed. Returns the deadline for the
    /// flush timer when it is not already armed.
    pub fn mark_dirty(&mut self, now: Instant) -> Option<Instant> {
        self.pending = true;
        if self.armed {
            return None;
        }
        self.armed = true;
        Some(self.earliest_flush(now))
    }

    /// The flush timer fired.
    pub fn on_timer(&mut self, now: Instant) -> FlushDecision {
        if !self.pending {
            self.armed = false;
            return FlushDecision::Idle;
        }
        self.pending = false;
        self.last_flush = Some(now);
        self.flush_count += 1;
        tracing::trace!(flushes = self.flush_count, "redraw flushed");
        FlushDecision::Flush {
            rearm_at: now + self.interval,
        }
    }

    /// The flush timer could not be armed or was dropped. A later
    /// `mark_dirty` or `rearm_deadline` arms it again.
    pub fn disarm(&mut self) {
        self.armed = false;
    }

    /// Deadline for re-arming after a failed schedule, if work is pending.
    pub fn rearm_deadline(&mut self, now: Instant) -> Option<Instant> {
        if self.pending && !self.armed {
            self.armed = true;
            Some(self.earliest_flush(now))
        } else {
            None
        }
    }

    fn earliest_flush(&self, now: Instant) -> Instant {
        match self.last_flush {
            Some(last) => (last + self.interval).max(now),
            None => now,
        }
    }
}
