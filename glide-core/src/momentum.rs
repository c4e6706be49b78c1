//! Drag offset, edge policy and post-release momentum
//!
//! The simulator owns the live drag offset along the carousel axis. While the
//! pointer is down the offset follows the finger through the edge policy. On
//! release it either coasts (the release velocity is projected to decide
//! whether to step one item) or bounces back from an overscrolled edge. Both
//! animations settle the offset to zero.

use std::time::{Duration, Instant};

use crate::config::{EdgeBehavior, EdgeConfig, MomentumConfig};
use crate::easing::{EasingFunction, interpolate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MomentumKind {
    Coast,
    Bounce,
}

/// Hard boundaries at the index the drag started from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Edges {
    pub at_start: bool,
    pub at_end: bool,
}

impl Edges {
    pub fn new(at_start: bool, at_end: bool) -> Self {
        Self { at_start, at_end }
    }

    /// Positive offsets reveal the previous item, negative the next one.
    fn blocks(&self, offset: f32) -> bool {
        (self.at_start && offset > 0.0) || (self.at_end && offset < 0.0)
    }
}

/// Offset after the edge policy, and whether the policy engaged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragUpdate {
    pub offset: f32,
    pub at_edge: bool,
}

/// Where a release is headed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MomentumPlan {
    /// Clamped release velocity, px/s.
    pub velocity: f32,
    /// Projected coast distance. Only decides `step`; the coast itself
    /// always settles the offset to zero.
    pub target_offset: f32,
    /// `-1` previous, `1` next, `0` settle on the current item.
    pub step: i32,
    pub duration: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MomentumState {
    pub kind: MomentumKind,
    pub velocity: f32,
    pub start_offset: f32,
    pub started_at: Instant,
    pub duration: Duration,
    easing: EasingFunction,
}

/// One animation step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MomentumFrame {
    pub offset: f32,
    pub finished: bool,
}

#[derive(Debug, Clone)]
pub struct MomentumSimulator {
    config: MomentumConfig,
    edge: EdgeConfig,
    extent: f32,
    offset: f32,
    state: Option<MomentumState>,
}

impl MomentumSimulator {
    pub fn new(config: MomentumConfig, edge: EdgeConfig, extent: f32) -> Self {
        Self {
            config,
            edge,
            extent,
            offset: 0.0,
            state: None,
        }
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn extent(&self) -> f32 {
        self.extent
    }

    pub fn set_extent(&mut self, extent: f32) {
        if extent > 0.0 {
            self.extent = extent;
        }
    }

    /// Drag offset as a fraction of the viewport extent.
    pub fn drag_progress(&self) -> f32 {
        if self.extent > 0.0 {
            self.offset / self.extent
        } else {
            0.0
        }
    }

    pub fn is_active(&self) -> bool {
        self.state.is_some()
    }

    pub fn state(&self) -> Option<&MomentumState> {
        self.state.as_ref()
    }

    pub fn edge_behavior(&self) -> EdgeBehavior {
        self.edge.behavior
    }

    /// Apply the edge policy to a raw drag offset.
    pub fn apply_edge(&self, raw: f32, edges: Edges) -> DragUpdate {
        if !edges.blocks(raw) {
            return DragUpdate {
                offset: raw,
                at_edge: false,
            };
        }
        let offset = match self.edge.behavior {
            EdgeBehavior::Stop => 0.0,
            EdgeBehavior::Resist => raw * self.edge.resistance,
            EdgeBehavior::Bounce => {
                let limit = self.config.elasticity * self.extent;
                raw.clamp(-limit, limit)
            }
            EdgeBehavior::Wrap => {
                return DragUpdate {
                    offset: raw,
                    at_edge: false,
                };
            }
        };
        DragUpdate {
            offset,
            at_edge: true,
        }
    }

    /// Move the live offset to follow a drag.
    pub fn drag_to(&mut self, raw: f32, edges: Edges) -> DragUpdate {
        let update = self.apply_edge(raw, edges);
        self.offset = update.offset;
        update
    }

    /// Zero the offset without animating. Returns true if it moved.
    pub fn reset_offset(&mut self) -> bool {
        let moved = self.offset != 0.0;
        self.offset = 0.0;
        moved
    }

    /// Whether the offset sits past a boundary and should bounce back.
    pub fn overshoots(&self, edges: Edges) -> bool {
        self.edge.behavior == EdgeBehavior::Bounce && edges.blocks(self.offset)
    }

    /// Coast distance for a release velocity.
    pub fn project(&self, velocity: f32) -> f32 {
        let v = self.clamp_velocity(velocity);
        v * (v.abs() / (self.config.friction * 1000.0)) * 0.5
    }

    /// Decide the outcome of a release. Only the release velocity counts;
    /// how far the finger already dragged does not.
    pub fn plan(&self, velocity: f32) -> MomentumPlan {
        let velocity = self.clamp_velocity(velocity);
        let target_offset = self.project(velocity);
        let step = if target_offset.abs()
            > self.config.index_threshold * self.extent
        {
            if target_offset > 0.0 { -1 } else { 1 }
        } else {
            0
        };
        let stop_secs = velocity.abs() / (self.config.friction * 1000.0);
        let millis = ((stop_secs * 1000.0) as u64).clamp(
            self.config.min_duration_ms,
            self.config.max_duration_ms,
        );
        MomentumPlan {
            velocity,
            target_offset,
            step,
            duration: Duration::from_millis(millis),
        }
    }

    /// Start coasting the offset back to rest.
    pub fn start_coast(&mut self, plan: &MomentumPlan, now: Instant) {
        tracing::debug!(
            velocity = plan.velocity,
            target = plan.target_offset,
            step = plan.step,
            "momentum coast"
        );
        self.state = Some(MomentumState {
            kind: MomentumKind::Coast,
            velocity: plan.velocity,
            start_offset: self.offset,
            started_at: now,
            duration: plan.duration,
            easing: EasingFunction::EaseOutCubic,
        });
    }

    /// Animate an overscrolled offset back to the boundary.
    pub fn start_bounce(&mut self, velocity: f32, now: Instant) {
        tracing::debug!(offset = self.offset, "edge bounce");
        self.state = Some(MomentumState {
            kind: MomentumKind::Bounce,
            velocity: self.clamp_velocity(velocity),
            start_offset: self.offset,
            started_at: now,
            duration: Duration::from_millis(self.config.bounce_duration_ms),
            easing: EasingFunction::OutBounce,
        });
    }

    pub fn tick(&mut self, now: Instant) -> Option<MomentumFrame> {
        let state = self.state?;
        let elapsed = now.saturating_duration_since(state.started_at);
        let t = if state.duration.is_zero() {
            1.0
        } else {
            (elapsed.as_secs_f32() / state.duration.as_secs_f32()).min(1.0)
        };
        if t >= 1.0 {
            self.offset = 0.0;
            self.state = None;
            tracing::debug!("momentum finished");
            return Some(MomentumFrame {
                offset: 0.0,
                finished: true,
            });
        }
        let eased = state.easing.apply(t);
        self.offset = interpolate(state.start_offset, 0.0, eased);
        tracing::trace!(offset = self.offset, t, "momentum tick");
        Some(MomentumFrame {
            offset: self.offset,
            finished: false,
        })
    }

    /// End the animation where it is. Returns true only when something was
    /// running, so callers emit exactly one completion.
    pub fn stop(&mut self) -> bool {
        if self.state.take().is_some() {
            tracing::debug!(offset = self.offset, "momentum stopped");
            true
        } else {
            false
        }
    }

    fn clamp_velocity(&self, velocity: f32) -> f32 {
        velocity.clamp(-self.config.max_velocity, self.config.max_velocity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn simulator(behavior: EdgeBehavior) -> MomentumSimulator {
        MomentumSimulator::new(
            MomentumConfig::default(),
            EdgeConfig {
                behavior,
                resistance: 0.5,
            },
            400.0,
        )
    }

    #[test]
    fn stop_pins_offset_at_first_item() {
        let mut sim = simulator(EdgeBehavior::Stop);
        let edges = Edges::new(true, false);
        for raw in [5.0, 40.0, 120.0] {
            let update = sim.drag_to(raw, edges);
            assert_eq!(update.offset, 0.0);
            assert!(update.at_edge);
        }
        // Dragging toward the next item is unaffected.
        assert_eq!(sim.drag_to(-40.0, edges).offset, -40.0);
    }

    #[test]
    fn resist_scales_past_boundary() {
        let sim = simulator(EdgeBehavior::Resist);
        let update = sim.apply_edge(-100.0, Edges::new(false, true));
        assert_eq!(update.offset, -50.0);
        assert!(update.at_edge);
    }

    #[test]
    fn bounce_caps_overshoot_by_elasticity() {
        let mut sim = simulator(EdgeBehavior::Bounce);
        let edges = Edges::new(true, false);
        let update = sim.drag_to(300.0, edges);
        assert_eq!(update.offset, 0.3 * 400.0);
        assert!(sim.overshoots(edges));
    }

    #[test]
    fn wrap_ignores_boundaries() {
        let sim = simulator(EdgeBehavior::Wrap);
        let update = sim.apply_edge(80.0, Edges::new(true, true));
        assert_eq!(update.offset, 80.0);
        assert!(!update.at_edge);
    }

    #[test]
    fn projection_follows_friction_formula() {
        let sim = simulator(EdgeBehavior::Bounce);
        let expected = 800.0 * (800.0 / 850.0) * 0.5;
        assert!((sim.project(800.0) - expected).abs() < 1e-3);
        assert!((sim.project(-800.0) + expected).abs() < 1e-3);
        // Clamped to max velocity first.
        assert_eq!(sim.project(5000.0), sim.project(2000.0));
    }

    #[test]
    fn plan_steps_past_threshold() {
        let sim = simulator(EdgeBehavior::Bounce);
        let fast = sim.plan(-800.0);
        assert_eq!(fast.step, 1);
        assert_eq!(fast.duration, ms(941));

        let slow = sim.plan(300.0);
        // 300 * (300/850) * 0.5 ~= 53px, under 30% of 400px.
        assert_eq!(slow.step, 0);
        assert_eq!(slow.duration, ms(352));

        let backward = sim.plan(900.0);
        assert_eq!(backward.step, -1);
    }

    #[test]
    fn long_drag_with_slow_release_settles() {
        let mut sim = simulator(EdgeBehavior::Bounce);
        sim.drag_to(110.0, Edges::default());
        let plan = sim.plan(150.0);
        // 150 * (150/850) * 0.5 ~= 13px; the 110px already dragged is
        // not part of the projection.
        assert!((plan.target_offset - 13.235_294).abs() < 1e-3);
        assert_eq!(plan.step, 0);
    }

    #[test]
    fn coast_settles_and_finishes_once() {
        let t0 = Instant::now();
        let mut sim = simulator(EdgeBehavior::Bounce);
        sim.drag_to(-60.0, Edges::default());
        let plan = sim.plan(-800.0);
        sim.start_coast(&plan, t0);

        let frame = sim.tick(t0 + ms(100)).unwrap();
        assert!(!frame.finished);
        assert!(frame.offset > -60.0 && frame.offset < 0.0);

        let frame = sim.tick(t0 + plan.duration).unwrap();
        assert!(frame.finished);
        assert_eq!(sim.offset(), 0.0);
        assert!(sim.tick(t0 + ms(2000)).is_none());
        assert!(!sim.stop());
    }

    #[test]
    fn bounce_returns_to_zero() {
        let t0 = Instant::now();
        let mut sim = simulator(EdgeBehavior::Bounce);
        sim.drag_to(90.0, Edges::new(true, false));
        sim.start_bounce(0.0, t0);
        assert_eq!(sim.state().unwrap().kind, MomentumKind::Bounce);
        let frame = sim.tick(t0 + ms(300)).unwrap();
        assert!(frame.finished);
        assert_eq!(frame.offset, 0.0);
    }

    #[test]
    fn stop_is_idempotent() {
        let t0 = Instant::now();
        let mut sim = simulator(EdgeBehavior::Bounce);
        let plan = sim.plan(1000.0);
        sim.start_coast(&plan, t0);
        assert!(sim.stop());
        assert!(!sim.stop());
        assert!(!sim.is_active());
    }
}
