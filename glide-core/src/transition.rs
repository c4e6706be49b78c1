//! Index-to-index transition state machine
//!
//! `Idle -> Starting -> Running -> Finishing -> Idle`. The engine only tracks
//! progress; committing the target index to the model is the caller's job
//! when it sees [`TransitionSignal::Finished`].

use std::time::{Duration, Instant};

use crate::config::TransitionConfig;
use crate::easing::EasingFunction;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransitionPhase {
    #[default]
    Idle,
    /// Begun, no tick observed yet.
    Starting,
    Running,
    /// Progress is final; the target is being committed.
    Finishing,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionState {
    pub from: usize,
    pub to: usize,
    /// Linear time progress in `[0, 1]`. Never decreases.
    pub progress: f32,
    pub easing: EasingFunction,
    pub duration: Duration,
    pub started_at: Instant,
    last_tick: Instant,
}

impl TransitionState {
    pub fn eased(&self) -> f32 {
        self.easing.apply(self.progress)
    }
}

/// How the last transition ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionOutcome {
    pub from: usize,
    pub to: usize,
    /// Final progress: 1 when completed, the partial value when stopped.
    pub progress: f32,
    pub interrupted: bool,
}

/// Lifecycle notifications, in the order they happened.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionSignal {
    Started { from: usize, to: usize },
    Progress { progress: f32, eased: f32 },
    Finished { index: usize },
}

#[derive(Debug, Clone)]
pub struct TransitionEngine {
    config: TransitionConfig,
    phase: TransitionPhase,
    state: Option<TransitionState>,
    last_outcome: Option<TransitionOutcome>,
}

impl TransitionEngine {
    pub fn new(config: TransitionConfig) -> Self {
        Self {
            config,
            phase: TransitionPhase::Idle,
            state: None,
            last_outcome: None,
        }
    }

    pub fn phase(&self) -> TransitionPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase != TransitionPhase::Idle
    }

    pub fn state(&self) -> Option<&TransitionState> {
        self.state.as_ref()
    }

    pub fn last_outcome(&self) -> Option<TransitionOutcome> {
        self.last_outcome
    }

    /// Index the carousel is heading to, if a transition is in flight.
    pub fn target(&self) -> Option<usize> {
        self.state.map(|s| s.to)
    }

    pub fn progress(&self) -> f32 {
        self.state.map(|s| s.progress).unwrap_or(0.0)
    }

    /// Eased progress, for blending the outgoing and incoming items.
    pub fn blend_weight(&self) -> f32 {
        self.state.map(|s| s.eased()).unwrap_or(0.0)
    }

    pub fn frame_interval(&self) -> Duration {
        self.config.frame_interval()
    }

    /// Start animating `from -> to`. A transition already in flight is
    /// stopped first, so its `Finished` precedes the new `Started`.
    pub fn begin(
        &mut self,
        from: usize,
        to: usize,
        now: Instant,
    ) -> Vec<TransitionSignal> {
        let mut signals = self.stop();
        tracing::debug!(from, to, "transition started");
        self.state = Some(TransitionState {
            from,
            to,
            progress: 0.0,
            easing: self.config.easing,
            duration: self.config.duration(),
            started_at: now,
            last_tick: now,
        });
        self.phase = TransitionPhase::Starting;
        signals.push(TransitionSignal::Started { from, to });

        if self.config.duration().is_zero() {
            if let Some(state) = self.state.as_mut() {
                state.progress = 1.0;
            }
            signals.push(TransitionSignal::Progress {
                progress: 1.0,
                eased: 1.0,
            });
            signals.extend(self.finish(false));
        }
        signals
    }

    /// Advance progress by the time elapsed since the previous tick.
    pub fn tick(&mut self, now: Instant) -> Vec<TransitionSignal> {
        let Some(state) = self.state.as_mut() else {
            return Vec::new();
        };
        self.phase = TransitionPhase::Running;

        let dt = now.saturating_duration_since(state.last_tick);
        state.last_tick = now;
        let duration = state.duration.as_secs_f32();
        if duration > 0.0 {
            state.progress =
                (state.progress + dt.as_secs_f32() / duration).min(1.0);
        } else {
            state.progress = 1.0;
        }
        let progress = state.progress;
        let eased = state.eased();
        tracing::trace!(progress, eased, "transition tick");

        let mut signals = vec![TransitionSignal::Progress { progress, eased }];
        if progress >= 1.0 {
            signals.extend(self.finish(false));
        }
        signals
    }

    /// Stop whatever is in flight, keeping its partial progress, and commit
    /// its target. Idle engines return no signals.
    pub fn stop(&mut self) -> Vec<TransitionSignal> {
        if self.state.is_none() {
            return Vec::new();
        }
        self.finish(true).into_iter().collect()
    }

    fn finish(&mut self, interrupted: bool) -> Option<TransitionSignal> {
        let state = self.state.take()?;
        self.phase = TransitionPhase::Finishing;
        let interrupted = interrupted && state.progress < 1.0;
        self.last_outcome = Some(TransitionOutcome {
            from: state.from,
            to: state.to,
            progress: state.progress,
            interrupted,
        });
        tracing::debug!(
            index = state.to,
            progress = state.progress,
            interrupted,
            "transition finished"
        );
        self.phase = TransitionPhase::Idle;
        Some(TransitionSignal::Finished { index: state.to })
    }
}
