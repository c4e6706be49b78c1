//! Single-pointer gesture recognition
//!
//! One [`TouchSession`] exists between press and release. Pan and long press
//! are recognized while the pointer is down; everything else is decided once
//! on release, in this order: tap, swipe, fling, nothing.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::config::{Orientation, TouchThresholds};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Component along the carousel axis.
    pub fn along(self, orientation: Orientation) -> f32 {
        match orientation {
            Orientation::Horizontal => self.x,
            Orientation::Vertical => self.y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureKind {
    Tap,
    DoubleTap,
    LongPress,
    Pan,
    Swipe,
}

/// Direction the pointer travelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwipeDirection {
    Left,
    Right,
    Up,
    Down,
}

impl SwipeDirection {
    pub fn from_displacement(
        orientation: Orientation,
        displacement: f32,
    ) -> Self {
        match (orientation, displacement < 0.0) {
            (Orientation::Horizontal, true) => Self::Left,
            (Orientation::Horizontal, false) => Self::Right,
            (Orientation::Vertical, true) => Self::Up,
            (Orientation::Vertical, false) => Self::Down,
        }
    }

    /// Travel toward decreasing coordinates reveals the next item.
    pub fn navigates_forward(self) -> bool {
        matches!(self, Self::Left | Self::Up)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchSession {
    pub start: Point,
    pub current: Point,
    pub start_time: Instant,
    pub last_time: Instant,
    /// Signed axis velocity of the most recent moving sample, px/s.
    pub velocity: f32,
    pub panning: bool,
    pub long_pressed: bool,
}

impl TouchSession {
    fn new(position: Point, now: Instant) -> Self {
        Self {
            start: position,
            current: position,
            start_time: now,
            last_time: now,
            velocity: 0.0,
            panning: false,
            long_pressed: false,
        }
    }

    /// Signed axis displacement from the press position.
    pub fn displacement(&self, orientation: Orientation) -> f32 {
        self.current.along(orientation) - self.start.along(orientation)
    }

    fn sample(
        &mut self,
        position: Point,
        now: Instant,
        orientation: Orientation,
    ) {
        let dt = now.saturating_duration_since(self.last_time).as_secs_f32();
        let moved =
            position.along(orientation) - self.current.along(orientation);
        if dt > 0.0 {
            self.velocity = moved / dt;
        }
        self.current = position;
        self.last_time = now;
    }
}

/// Terminal classification of a released session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReleaseOutcome {
    Tap,
    DoubleTap,
    Swipe {
        direction: SwipeDirection,
        velocity: f32,
    },
    /// Fast enough to coast; the momentum simulator takes over.
    Fling { velocity: f32, displacement: f32 },
    /// Released without meeting any threshold.
    Settle { velocity: f32, displacement: f32 },
}

impl ReleaseOutcome {
    pub fn gesture(&self) -> Option<GestureKind> {
        match self {
            Self::Tap => Some(GestureKind::Tap),
            Self::DoubleTap => Some(GestureKind::DoubleTap),
            Self::Swipe { .. } => Some(GestureKind::Swipe),
            Self::Fling { .. } | Self::Settle { .. } => None,
        }
    }

    /// Release velocity along the axis, px/s. Taps report zero.
    pub fn velocity(&self) -> f32 {
        match *self {
            Self::Tap | Self::DoubleTap => 0.0,
            Self::Swipe { velocity, .. }
            | Self::Fling { velocity, .. }
            | Self::Settle { velocity, .. } => velocity,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GestureRecognizer {
    thresholds: TouchThresholds,
    orientation: Orientation,
    /// Minimum release speed for handing off to momentum; `None` disables it.
    momentum_floor: Option<f32>,
    session: Option<TouchSession>,
    last_tap: Option<Instant>,
}

impl GestureRecognizer {
    pub fn new(
        thresholds: TouchThresholds,
        orientation: Orientation,
        momentum_floor: Option<f32>,
    ) -> Self {
        Self {
            thresholds,
            orientation,
            momentum_floor,
            session: None,
            last_tap: None,
        }
    }

    pub fn thresholds(&self) -> &TouchThresholds {
        &self.thresholds
    }

    pub fn set_thresholds(&mut self, thresholds: TouchThresholds) {
        self.thresholds = thresholds;
    }

    pub fn session(&self) -> Option<&TouchSession> {
        self.session.as_ref()
    }

    pub fn is_tracking(&self) -> bool {
        self.session.is_some()
    }

    /// Start a session. A press while one is already open restarts it.
    pub fn begin(&mut self, position: Point, now: Instant) {
        self.session = Some(TouchSession::new(position, now));
    }

    /// Feed a pointer sample. Returns `Some(Pan)` on the sample that first
    /// crosses the pan threshold.
    pub fn update(
        &mut self,
        position: Point,
        now: Instant,
    ) -> Option<GestureKind> {
        let orientation = self.orientation;
        let pan = self.thresholds.pan;
        let session = self.session.as_mut()?;
        session.sample(position, now, orientation);
        if !session.panning && session.current.distance(session.start) > pan {
            session.panning = true;
            tracing::trace!(velocity = session.velocity, "pan recognized");
            return Some(GestureKind::Pan);
        }
        None
    }

    /// The long-press deadline passed. Returns true when the pointer is
    /// still down and has not panned.
    pub fn long_press(&mut self) -> bool {
        match self.session.as_mut() {
            Some(session) if !session.panning && !session.long_pressed => {
                session.long_pressed = true;
                true
            }
            _ => false,
        }
    }

    /// Close the session and classify it. Releases without a press are
    /// ignored.
    pub fn release(
        &mut self,
        position: Point,
        now: Instant,
    ) -> Option<ReleaseOutcome> {
        let mut session = self.session.take()?;
        if position != session.current {
            session.sample(position, now, self.orientation);
        } else {
            session.last_time = now;
        }

        let elapsed = now.saturating_duration_since(session.start_time);
        let displacement = session.displacement(self.orientation);
        let velocity = session.velocity;

        if elapsed < self.thresholds.tap_timeout()
            && session.current.distance(session.start) < self.thresholds.pan
            && !session.long_pressed
        {
            return Some(self.classify_tap(now));
        }

        if displacement.abs() >= self.thresholds.swipe_distance
            && velocity.abs() >= self.thresholds.swipe_velocity
        {
            return Some(ReleaseOutcome::Swipe {
                direction: SwipeDirection::from_displacement(
                    self.orientation,
                    displacement,
                ),
                velocity,
            });
        }

        match self.momentum_floor {
            Some(floor) if velocity.abs() > floor => {
                Some(ReleaseOutcome::Fling {
                    velocity,
                    displacement,
                })
            }
            _ => Some(ReleaseOutcome::Settle {
                velocity,
                displacement,
            }),
        }
    }

    /// Drop the session without classifying it.
    pub fn cancel(&mut self) -> bool {
        self.session.take().is_some()
    }

    /// The double-tap window closed.
    pub fn expire_double_tap(&mut self) {
        self.last_tap = None;
    }

    fn classify_tap(&mut self, now: Instant) -> ReleaseOutcome {
        match self.last_tap.take() {
            Some(previous)
                if now.saturating_duration_since(previous)
                    <= self.thresholds.double_tap_timeout() =>
            {
                ReleaseOutcome::DoubleTap
            }
            _ => {
                self.last_tap = Some(now);
                ReleaseOutcome::Tap
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn recognizer() -> GestureRecognizer {
        GestureRecognizer::new(
            TouchThresholds::default(),
            Orientation::Horizontal,
            Some(100.0),
        )
    }

    #[test]
    fn quick_still_release_is_tap() {
        let t0 = Instant::now();
        let mut rec = recognizer();
        rec.begin(Point::new(100.0, 100.0), t0);
        rec.update(Point::new(103.0, 101.0), t0 + ms(40));
        let outcome = rec.release(Point::new(103.0, 101.0), t0 + ms(80));
        assert_eq!(outcome, Some(ReleaseOutcome::Tap));
        assert!(!rec.is_tracking());
    }

    #[test]
    fn second_tap_in_window_is_double_tap() {
        let t0 = Instant::now();
        let mut rec = recognizer();
        rec.begin(Point::new(0.0, 0.0), t0);
        assert_eq!(
            rec.release(Point::new(0.0, 0.0), t0 + ms(50)),
            Some(ReleaseOutcome::Tap)
        );
        rec.begin(Point::new(0.0, 0.0), t0 + ms(150));
        assert_eq!(
            rec.release(Point::new(0.0, 0.0), t0 + ms(200)),
            Some(ReleaseOutcome::DoubleTap)
        );
        // The pair is consumed; a third tap starts over.
        rec.begin(Point::new(0.0, 0.0), t0 + ms(250));
        assert_eq!(
            rec.release(Point::new(0.0, 0.0), t0 + ms(300)),
            Some(ReleaseOutcome::Tap)
        );
    }

    #[test]
    fn expired_window_yields_plain_tap() {
        let t0 = Instant::now();
        let mut rec = recognizer();
        rec.begin(Point::default(), t0);
        rec.release(Point::default(), t0 + ms(50));
        rec.expire_double_tap();
        rec.begin(Point::default(), t0 + ms(100));
        assert_eq!(
            rec.release(Point::default(), t0 + ms(150)),
            Some(ReleaseOutcome::Tap)
        );
    }

    #[test]
    fn pan_is_reported_once() {
        let t0 = Instant::now();
        let mut rec = recognizer();
        rec.begin(Point::new(100.0, 0.0), t0);
        assert_eq!(rec.update(Point::new(95.0, 0.0), t0 + ms(10)), None);
        assert_eq!(
            rec.update(Point::new(80.0, 0.0), t0 + ms(20)),
            Some(GestureKind::Pan)
        );
        assert_eq!(rec.update(Point::new(60.0, 0.0), t0 + ms(30)), None);
    }

    #[test]
    fn fast_long_drag_is_swipe_toward_decreasing_x() {
        let t0 = Instant::now();
        let mut rec = recognizer();
        rec.begin(Point::new(100.0, 0.0), t0);
        rec.update(Point::new(40.0, 0.0), t0 + ms(120));
        let outcome =
            rec.release(Point::new(26.0, 0.0), t0 + ms(140)).unwrap();
        match outcome {
            ReleaseOutcome::Swipe { direction, velocity } => {
                assert_eq!(direction, SwipeDirection::Left);
                assert!(direction.navigates_forward());
                assert!((velocity + 700.0).abs() < 1.0);
            }
            other => panic!("expected swipe, got {other:?}"),
        }
    }

    #[test]
    fn stationary_release_keeps_last_velocity() {
        let t0 = Instant::now();
        let mut rec = recognizer();
        rec.begin(Point::new(0.0, 0.0), t0);
        rec.update(Point::new(80.0, 0.0), t0 + ms(100));
        let outcome =
            rec.release(Point::new(80.0, 0.0), t0 + ms(300)).unwrap();
        assert!(matches!(
            outcome,
            ReleaseOutcome::Swipe {
                direction: SwipeDirection::Right,
                ..
            }
        ));
    }

    #[test]
    fn slow_drag_hands_off_or_settles() {
        let t0 = Instant::now();
        let mut rec = recognizer();
        rec.begin(Point::new(0.0, 0.0), t0);
        rec.update(Point::new(-30.0, 0.0), t0 + ms(100));
        let outcome =
            rec.release(Point::new(-30.0, 0.0), t0 + ms(300)).unwrap();
        assert!(matches!(outcome, ReleaseOutcome::Fling { .. }));

        let mut rec = GestureRecognizer::new(
            TouchThresholds::default(),
            Orientation::Horizontal,
            None,
        );
        rec.begin(Point::new(0.0, 0.0), t0);
        rec.update(Point::new(-30.0, 0.0), t0 + ms(100));
        let outcome =
            rec.release(Point::new(-30.0, 0.0), t0 + ms(300)).unwrap();
        assert!(matches!(outcome, ReleaseOutcome::Settle { .. }));
    }

    #[test]
    fn long_press_blocks_tap() {
        let t0 = Instant::now();
        let mut rec = recognizer();
        rec.begin(Point::default(), t0);
        assert!(rec.long_press());
        assert!(!rec.long_press());
        let outcome = rec.release(Point::default(), t0 + ms(100)).unwrap();
        assert!(matches!(outcome, ReleaseOutcome::Settle { .. }));
    }

    #[test]
    fn release_without_press_is_ignored() {
        let mut rec = recognizer();
        assert_eq!(rec.release(Point::default(), Instant::now()), None);
        assert!(!rec.cancel());
    }

    #[test]
    fn vertical_orientation_uses_y() {
        let t0 = Instant::now();
        let mut rec = GestureRecognizer::new(
            TouchThresholds::default(),
            Orientation::Vertical,
            Some(100.0),
        );
        rec.begin(Point::new(0.0, 200.0), t0);
        rec.update(Point::new(0.0, 120.0), t0 + ms(100));
        let outcome =
            rec.release(Point::new(0.0, 120.0), t0 + ms(110)).unwrap();
        assert!(matches!(
            outcome,
            ReleaseOutcome::Swipe {
                direction: SwipeDirection::Up,
                ..
            }
        ));
    }
}
