//! Index arithmetic for navigation requests
//!
//! Resolution is pure: given the index navigation should start from and the
//! item count, decide the target or reject the request.

use crate::config::WrapMode;

/// A navigation request before it has been resolved to an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationIntent {
    Next,
    Previous,
    First,
    Last,
    GoTo(usize),
}

impl NavigationIntent {
    /// Intent for a one-item step; negative steps go backwards.
    pub fn step(delta: i32) -> Option<Self> {
        match delta.signum() {
            1 => Some(Self::Next),
            -1 => Some(Self::Previous),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavigationController {
    wrap: WrapMode,
}

impl NavigationController {
    pub fn new(wrap: WrapMode) -> Self {
        Self { wrap }
    }

    pub fn wrap_mode(&self) -> WrapMode {
        self.wrap
    }

    /// Target index for `intent`, or `None` when the request is rejected or
    /// would land on `from` itself.
    pub fn resolve(
        &self,
        intent: NavigationIntent,
        from: Option<usize>,
        count: usize,
    ) -> Option<usize> {
        let from = from?;
        if count == 0 {
            return None;
        }
        let last = count - 1;
        let target = match intent {
            NavigationIntent::Next => self.offset(from, 1, count)?,
            NavigationIntent::Previous => self.offset(from, -1, count)?,
            NavigationIntent::First => 0,
            NavigationIntent::Last => last,
            NavigationIntent::GoTo(index) if index <= last => index,
            NavigationIntent::GoTo(_) => return None,
        };
        (target != from).then_some(target)
    }

    pub fn can_go_next(&self, from: Option<usize>, count: usize) -> bool {
        self.resolve(NavigationIntent::Next, from, count).is_some()
    }

    pub fn can_go_previous(&self, from: Option<usize>, count: usize) -> bool {
        self.resolve(NavigationIntent::Previous, from, count).is_some()
    }

    /// Whether `index` sits on a hard boundary: `(at_start, at_end)`.
    /// Wrapping carousels have none.
    pub fn boundaries(
        &self,
        index: Option<usize>,
        count: usize,
    ) -> (bool, bool) {
        match index {
            _ if self.wrap.wraps() && count > 0 => (false, false),
            Some(i) => (i == 0, i + 1 == count),
            None => (true, true),
        }
    }

    fn offset(&self, from: usize, delta: i64, count: usize) -> Option<usize> {
        let count = count as i64;
        let raw = from as i64 + delta;
        if self.wrap.wraps() {
            Some(raw.rem_euclid(count) as usize)
        } else if (0..count).contains(&raw) {
            Some(raw as usize)
        } else {
            None
        }
    }
}
