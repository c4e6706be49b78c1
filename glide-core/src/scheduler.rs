//! Deadline-ordered timer queue
//!
//! The engine never sleeps or spawns. Anything that has to happen later is a
//! [`TimerKind`] entry with a deadline; the host calls `advance(now)` on the
//! carousel and due entries fire in deadline order. Every entry is addressed
//! by a [`TimerToken`] so its owner can cancel it before it fires.

use std::time::Instant;

use crate::error::ScheduleError;

/// Handle to a scheduled timer. Tokens are never reused within a queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(u64);

/// What a timer is for. The owning component decides what firing means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Transition progress tick.
    AnimationFrame,
    /// Momentum coast/bounce tick.
    MomentumFrame,
    /// Coalesced redraw flush.
    RepaintFlush,
    /// Auto-play advance.
    AutoAdvance,
    /// Auto-play interval progress report.
    AutoPlayProgress,
    /// Long-press recognition deadline for the active touch session.
    LongPress,
    /// End of the double-tap window that follows a tap.
    DoubleTapWindow,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    token: TimerToken,
    kind: TimerKind,
    deadline: Instant,
}

/// A fired timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueTimer {
    pub token: TimerToken,
    pub kind: TimerKind,
    pub deadline: Instant,
}

/// Bounded set of pending timers.
///
/// Capacity is small (a carousel owns at most one timer per kind), so entries
/// live in a flat vector and lookups are linear.
#[derive(Debug, Clone)]
pub struct TimerQueue {
    entries: Vec<Entry>,
    capacity: usize,
    next_id: u64,
}

impl TimerQueue {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
            next_id: 0,
        }
    }

    /// Arm a timer that fires once `deadline` has passed.
    pub fn schedule(
        &mut self,
        kind: TimerKind,
        deadline: Instant,
    ) -> Result<TimerToken, ScheduleError> {
        if self.entries.len() >= self.capacity {
            return Err(ScheduleError::QueueFull {
                capacity: self.capacity,
            });
        }
        let token = TimerToken(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            token,
            kind,
            deadline,
        });
        Ok(token)
    }

    /// Remove a pending timer. Returns false if it already fired or was
    /// cancelled, which callers treat as a no-op.
    pub fn cancel(&mut self, token: TimerToken) -> bool {
        match self.entries.iter().position(|e| e.token == token) {
            Some(pos) => {
                self.entries.swap_remove(pos);
                true
            }
            None => false,
        }
    }

    /// Pop the earliest timer whose deadline is at or before `now`.
    /// Ties fire in scheduling order.
    pub fn pop_due(&mut self, now: Instant) -> Option<DueTimer> {
        let pos = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.deadline <= now)
            .min_by_key(|(_, e)| (e.deadline, e.token))
            .map(|(pos, _)| pos)?;
        let entry = self.entries.swap_remove(pos);
        Some(DueTimer {
            token: entry.token,
            kind: entry.kind,
            deadline: entry.deadline,
        })
    }

    /// Earliest pending deadline, for hosts that want to sleep until the
    /// next call to `advance` is useful.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.iter().map(|e| e.deadline).min()
    }

    pub fn is_pending(&self, token: TimerToken) -> bool {
        self.entries.iter().any(|e| e.token == token)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn fires_in_deadline_order() {
        let t0 = Instant::now();
        let mut queue = TimerQueue::with_capacity(8);
        queue.schedule(TimerKind::RepaintFlush, t0 + ms(16)).unwrap();
        queue.schedule(TimerKind::AnimationFrame, t0 + ms(8)).unwrap();
        queue.schedule(TimerKind::AutoAdvance, t0 + ms(3000)).unwrap();

        assert!(queue.pop_due(t0).is_none());
        let now = t0 + ms(20);
        assert_eq!(queue.pop_due(now).unwrap().kind, TimerKind::AnimationFrame);
        assert_eq!(queue.pop_due(now).unwrap().kind, TimerKind::RepaintFlush);
        assert!(queue.pop_due(now).is_none());
        assert_eq!(queue.next_deadline(), Some(t0 + ms(3000)));
    }

    #[test]
    fn ties_fire_in_scheduling_order() {
        let t0 = Instant::now();
        let mut queue = TimerQueue::with_capacity(4);
        let first = queue.schedule(TimerKind::LongPress, t0).unwrap();
        let second = queue.schedule(TimerKind::DoubleTapWindow, t0).unwrap();
        assert_eq!(queue.pop_due(t0).unwrap().token, first);
        assert_eq!(queue.pop_due(t0).unwrap().token, second);
    }

    #[test]
    fn cancelled_timers_never_fire() {
        let t0 = Instant::now();
        let mut queue = TimerQueue::with_capacity(4);
        let token = queue.schedule(TimerKind::MomentumFrame, t0).unwrap();
        assert!(queue.cancel(token));
        assert!(!queue.cancel(token));
        assert!(queue.pop_due(t0 + ms(100)).is_none());
        assert!(queue.is_empty());
    }

    #[test]
    fn full_queue_rejects() {
        let t0 = Instant::now();
        let mut queue = TimerQueue::with_capacity(1);
        queue.schedule(TimerKind::AnimationFrame, t0).unwrap();
        let err = queue.schedule(TimerKind::RepaintFlush, t0).unwrap_err();
        assert_eq!(err, ScheduleError::QueueFull { capacity: 1 });
    }
}
