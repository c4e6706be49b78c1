//! Automatic advancing
//!
//! The player only decides *whether* it is running and *where* the next
//! advance goes. The carousel owns the timer and routes every advance
//! through the same navigation path as user input.

use std::time::Instant;

use crate::config::{AutoPlayConfig, AutoPlayDirection};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AutoPlayState {
    #[default]
    Stopped,
    Running,
    Paused,
}

#[derive(Debug, Clone)]
pub struct AutoPlayer {
    config: AutoPlayConfig,
    state: AutoPlayState,
    /// Current leg of a ping-pong cycle.
    forward: bool,
    interval_started: Option<Instant>,
    /// Last reported interval progress; frozen while paused.
    progress: f32,
}

impl AutoPlayer {
    pub fn new(config: AutoPlayConfig) -> Self {
        Self {
            config,
            state: AutoPlayState::Stopped,
            forward: true,
            interval_started: None,
            progress: 0.0,
        }
    }

    pub fn config(&self) -> &AutoPlayConfig {
        &self.config
    }

    pub fn state(&self) -> AutoPlayState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == AutoPlayState::Running
    }

    pub fn set_direction(&mut self, direction: AutoPlayDirection) {
        self.config.direction = direction;
        self.forward = direction != AutoPlayDirection::Backward;
    }

    /// Returns true when the player transitioned to running. A disabled
    /// direction or an empty carousel never starts.
    pub fn start(&mut self, count: usize) -> bool {
        if !self.config.direction.is_enabled() || count == 0 {
            return false;
        }
        if self.state == AutoPlayState::Running {
            return false;
        }
        self.state = AutoPlayState::Running;
        true
    }

    pub fn stop(&mut self) -> bool {
        if self.state == AutoPlayState::Stopped {
            return false;
        }
        self.state = AutoPlayState::Stopped;
        self.interval_started = None;
        self.progress = 0.0;
        true
    }

    pub fn pause(&mut self) -> bool {
        if self.state != AutoPlayState::Running {
            return false;
        }
        self.state = AutoPlayState::Paused;
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.state != AutoPlayState::Paused {
            return false;
        }
        self.state = AutoPlayState::Running;
        true
    }

    /// Restart the interval clock at `now`.
    pub fn begin_interval(&mut self, now: Instant) {
        self.interval_started = Some(now);
        self.progress = 0.0;
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Recompute interval progress in `[0, 1]`. Only a running player
    /// moves; a paused one keeps its last value.
    pub fn update_progress(&mut self, now: Instant) -> f32 {
        if self.state == AutoPlayState::Running
            && let Some(started) = self.interval_started
        {
            let elapsed = now.saturating_duration_since(started);
            let interval = self.config.interval().as_secs_f32();
            self.progress = (elapsed.as_secs_f32() / interval).min(1.0);
        }
        self.progress
    }

    /// Index the next automatic advance should go to.
    ///
    /// Forward and backward rewind to the opposite end once they run out of
    /// items; ping-pong reverses instead.
    pub fn next_target(
        &mut self,
        current: Option<usize>,
        count: usize,
    ) -> Option<usize> {
        let current = current?;
        if count < 2 {
            return None;
        }
        let last = count - 1;
        let target = match self.config.direction {
            AutoPlayDirection::None => return None,
            AutoPlayDirection::Forward => {
                if current >= last { 0 } else { current + 1 }
            }
            AutoPlayDirection::Backward => {
                if current == 0 { last } else { current - 1 }
            }
            AutoPlayDirection::PingPong => {
                if self.forward && current >= last {
                    self.forward = false;
                } else if !self.forward && current == 0 {
                    self.forward = true;
                }
                if self.forward { current + 1 } else { current - 1 }
            }
        };
        Some(target)
    }
}
