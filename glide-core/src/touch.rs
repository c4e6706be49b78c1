//! Touch-driven carousel
//!
//! Wraps a [`Carousel`] with gesture recognition, a live drag offset under
//! the configured edge policy, and momentum after release. Timers share the
//! inner carousel's queue, so one `advance(now)` drives both.

use std::rc::Rc;
use std::time::Instant;

use crate::carousel::Carousel;
use crate::config::{
    AutoPlayDirection, CarouselConfig, TouchConfig, TouchThresholds,
};
use crate::constants;
use crate::error::ConfigError;
use crate::events::{CarouselEvent, EventKind, ListenerId};
use crate::gesture::{GestureKind, GestureRecognizer, Point, ReleaseOutcome};
use crate::model::CarouselItem;
use crate::momentum::{Edges, MomentumKind, MomentumSimulator};
use crate::navigation::NavigationIntent;
use crate::scheduler::{DueTimer, TimerKind, TimerToken};
use crate::surface::{Key, NavigableSurface, ThresholdProvider, Unscaled};

#[derive(Debug)]
pub struct TouchCarousel<H> {
    carousel: Carousel<H>,
    recognizer: GestureRecognizer,
    momentum: MomentumSimulator,
    provider: Rc<dyn ThresholdProvider>,
    momentum_timer: Option<TimerToken>,
    long_press_timer: Option<TimerToken>,
    double_tap_timer: Option<TimerToken>,
    /// EdgeReached goes out once per drag.
    edge_reported: bool,
}

impl<H> Default for TouchCarousel<H> {
    fn default() -> Self {
        Self::new(CarouselConfig::default())
    }
}

impl<H> TouchCarousel<H> {
    pub fn new(config: CarouselConfig) -> Self {
        Self::with_provider(config, Rc::new(Unscaled))
    }

    /// Thresholds from `config` pass through `provider` before use.
    pub fn with_provider(
        config: CarouselConfig,
        provider: Rc<dyn ThresholdProvider>,
    ) -> Self {
        let touch = config.touch;
        let momentum_floor = touch
            .momentum
            .enabled
            .then_some(touch.momentum.min_velocity);
        let recognizer = GestureRecognizer::new(
            provider.scale(touch.thresholds),
            config.orientation,
            momentum_floor,
        );
        let momentum = MomentumSimulator::new(
            touch.momentum,
            touch.edge,
            constants::DEFAULT_VIEWPORT_EXTENT,
        );
        Self {
            carousel: Carousel::new(config),
            recognizer,
            momentum,
            provider,
            momentum_timer: None,
            long_press_timer: None,
            double_tap_timer: None,
            edge_reported: false,
        }
    }

    pub fn try_new(
        config: CarouselConfig,
        provider: Rc<dyn ThresholdProvider>,
    ) -> Result<Self, ConfigError> {
        for warning in &config.validate()? {
            tracing::warn!(%warning, "questionable carousel config");
        }
        Ok(Self::with_provider(config, provider))
    }

    /// Phone-tuned thresholds.
    pub fn mobile() -> Self {
        Self::new(CarouselConfig::default().with_touch(TouchConfig::mobile()))
    }

    pub fn tablet() -> Self {
        Self::new(CarouselConfig::default().with_touch(TouchConfig::tablet()))
    }

    pub fn desktop() -> Self {
        Self::new(CarouselConfig::default().with_touch(TouchConfig::desktop()))
    }

    pub fn carousel(&self) -> &Carousel<H> {
        &self.carousel
    }

    pub fn recognizer(&self) -> &GestureRecognizer {
        &self.recognizer
    }

    pub fn momentum(&self) -> &MomentumSimulator {
        &self.momentum
    }

    /// Thresholds after provider scaling.
    pub fn thresholds(&self) -> &TouchThresholds {
        self.recognizer.thresholds()
    }

    /// Live drag/momentum offset along the axis, px.
    pub fn offset(&self) -> f32 {
        self.momentum.offset()
    }

    /// Offset as a fraction of the viewport extent.
    pub fn drag_progress(&self) -> f32 {
        self.momentum.drag_progress()
    }

    pub fn is_momentum_active(&self) -> bool {
        self.momentum.is_active()
    }

    pub fn set_viewport_extent(&mut self, extent: f32) {
        self.momentum.set_extent(extent);
    }

    pub fn set_threshold_provider(
        &mut self,
        provider: Rc<dyn ThresholdProvider>,
    ) {
        self.provider = provider;
        self.recalibrate();
    }

    /// Re-derive effective thresholds, e.g. after the screen changed.
    pub fn recalibrate(&mut self) {
        let base = self.carousel.config().touch.thresholds;
        let scaled = self.provider.scale(base);
        tracing::debug!(
            pan = scaled.pan,
            swipe_distance = scaled.swipe_distance,
            "touch thresholds recalibrated"
        );
        self.recognizer.set_thresholds(scaled);
    }

    // ---- listeners ---------------------------------------------------

    pub fn subscribe<F>(&mut self, kind: EventKind, listener: F) -> ListenerId
    where
        F: FnMut(&CarouselEvent) + 'static,
    {
        self.carousel.subscribe(kind, listener)
    }

    pub fn subscribe_all<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&CarouselEvent) + 'static,
    {
        self.carousel.subscribe_all(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.carousel.unsubscribe(id)
    }

    // ---- structure ---------------------------------------------------

    pub fn push(&mut self, item: CarouselItem<H>, now: Instant) {
        self.carousel.push(item, now);
    }

    pub fn insert(
        &mut self,
        index: usize,
        item: CarouselItem<H>,
        now: Instant,
    ) -> bool {
        if index > self.carousel.count() {
            return false;
        }
        self.stop_momentum(now);
        self.carousel.insert(index, item, now)
    }

    pub fn remove(
        &mut self,
        index: usize,
        now: Instant,
    ) -> Option<CarouselItem<H>> {
        if index >= self.carousel.count() {
            return None;
        }
        self.stop_momentum(now);
        self.carousel.remove(index, now)
    }

    pub fn clear(&mut self, now: Instant) -> usize {
        self.stop_momentum(now);
        self.carousel.clear(now)
    }

    pub fn set_item(
        &mut self,
        index: usize,
        item: CarouselItem<H>,
        now: Instant,
    ) -> Option<CarouselItem<H>> {
        self.carousel.set_item(index, item, now)
    }

    // ---- non-touch input ---------------------------------------------

    pub fn handle_key(&mut self, key: Key, now: Instant) -> bool {
        self.carousel.handle_key(key, now)
    }

    pub fn handle_wheel(&mut self, delta: f32, now: Instant) -> bool {
        self.carousel.handle_wheel(delta, now)
    }

    pub fn set_hovered(&mut self, hovered: bool, now: Instant) {
        self.carousel.set_hovered(hovered, now);
    }

    pub fn set_focused(&mut self, focused: bool, now: Instant) {
        self.carousel.set_focused(focused, now);
    }

    /// Disabling drops any touch session in progress.
    pub fn set_enabled(&mut self, enabled: bool, now: Instant) {
        if !enabled {
            self.cancel(now);
        }
        self.carousel.set_enabled(enabled);
    }

    pub fn start_autoplay(&mut self, now: Instant) -> bool {
        self.carousel.start_autoplay(now)
    }

    pub fn stop_autoplay(&mut self) -> bool {
        self.carousel.stop_autoplay()
    }

    pub fn pause_autoplay(&mut self) -> bool {
        self.carousel.pause_autoplay()
    }

    pub fn resume_autoplay(&mut self, now: Instant) -> bool {
        self.carousel.resume_autoplay(now)
    }

    pub fn toggle_autoplay_pause(&mut self, now: Instant) -> bool {
        self.carousel.toggle_autoplay_pause(now)
    }

    pub fn set_autoplay_direction(&mut self, direction: AutoPlayDirection) {
        self.carousel.set_autoplay_direction(direction);
    }

    /// See [`Carousel::navigate`].
    pub fn navigate(
        &mut self,
        intent: NavigationIntent,
        animated: bool,
        now: Instant,
    ) -> bool {
        self.carousel.navigate(intent, animated, now)
    }

    /// Switch wrap mode. A bounce running against an edge that no longer
    /// exists is stopped, and the next drag re-reports edges under the new
    /// mode.
    pub fn set_wrap_around(&mut self, wrap_around: bool, now: Instant) {
        self.carousel.set_wrap_around(wrap_around);
        self.edge_reported = false;
        let bouncing = self
            .momentum
            .state()
            .is_some_and(|s| s.kind == MomentumKind::Bounce);
        if bouncing && !self.momentum.overshoots(self.edges()) {
            self.stop_momentum(now);
        }
    }

    // ---- touch -------------------------------------------------------

    /// Pointer down. Running momentum stops where it is.
    pub fn press(&mut self, position: Point, now: Instant) -> bool {
        if !self.accepts_touch() {
            return false;
        }
        self.stop_momentum(now);
        self.carousel.cancel_timer(&mut self.long_press_timer);
        self.recognizer.begin(position, now);
        self.edge_reported = false;
        self.carousel.set_pressed(true);
        self.carousel.emit(CarouselEvent::TouchStarted { position });
        let at = now + self.recognizer.thresholds().long_press_timeout();
        self.long_press_timer =
            self.carousel.schedule(TimerKind::LongPress, at);
        true
    }

    /// Pointer moved. Returns true while a session is being tracked.
    pub fn move_to(&mut self, position: Point, now: Instant) -> bool {
        if !self.recognizer.is_tracking() {
            return false;
        }
        if let Some(GestureKind::Pan) = self.recognizer.update(position, now) {
            self.carousel.cancel_timer(&mut self.long_press_timer);
            let velocity = self.session_velocity();
            self.carousel.emit(CarouselEvent::GestureDetected {
                gesture: GestureKind::Pan,
                velocity,
            });
        }

        let Some(session) = self.recognizer.session().copied() else {
            return false;
        };
        self.carousel.emit(CarouselEvent::TouchMoved {
            position,
            velocity: session.velocity,
        });
        if !session.panning {
            return true;
        }

        let raw = session.displacement(self.carousel.orientation());
        let edges = self.edges();
        let before = self.momentum.offset();
        let update = self.momentum.drag_to(raw, edges);
        if update.offset != before {
            self.carousel.emit(CarouselEvent::OffsetChanged {
                offset: update.offset,
            });
            self.carousel.mark_dirty(now);
        }
        if update.at_edge && !self.edge_reported {
            self.edge_reported = true;
            self.carousel.emit(CarouselEvent::EdgeReached {
                at_start: edges.at_start,
                at_end: edges.at_end,
            });
        }
        true
    }

    /// Pointer up. Returns the classification, or `None` without a session.
    pub fn release(
        &mut self,
        position: Point,
        now: Instant,
    ) -> Option<ReleaseOutcome> {
        if !self.recognizer.is_tracking() {
            return None;
        }
        self.carousel.cancel_timer(&mut self.long_press_timer);
        self.carousel.set_pressed(false);
        let outcome = self.recognizer.release(position, now)?;
        tracing::debug!(?outcome, "touch released");
        self.carousel.emit(CarouselEvent::TouchEnded {
            position,
            velocity: outcome.velocity(),
        });

        match outcome {
            ReleaseOutcome::Tap => {
                self.gesture(GestureKind::Tap, 0.0);
                if let Some(index) = self.carousel.current_index() {
                    self.carousel.emit(CarouselEvent::ItemClicked { index });
                }
                self.carousel.cancel_timer(&mut self.double_tap_timer);
                let window = self.recognizer.thresholds().double_tap_timeout();
                let at = now + window;
                self.double_tap_timer =
                    self.carousel.schedule(TimerKind::DoubleTapWindow, at);
                self.settle(now);
            }
            ReleaseOutcome::DoubleTap => {
                self.gesture(GestureKind::DoubleTap, 0.0);
                if let Some(index) = self.carousel.current_index() {
                    self.carousel
                        .emit(CarouselEvent::ItemDoubleClicked { index });
                }
                self.carousel.cancel_timer(&mut self.double_tap_timer);
                self.settle(now);
            }
            ReleaseOutcome::Swipe {
                direction,
                velocity,
            } => {
                self.gesture(GestureKind::Swipe, velocity);
                self.carousel.emit(CarouselEvent::SwipePerformed {
                    direction,
                    velocity,
                });
                let intent = if direction.navigates_forward() {
                    NavigationIntent::Next
                } else {
                    NavigationIntent::Previous
                };
                let edges = self.edges();
                if self.carousel.navigate(intent, true, now) {
                    self.settle(now);
                } else if self.momentum.overshoots(edges) {
                    self.bounce(velocity, now);
                } else {
                    self.settle(now);
                }
            }
            ReleaseOutcome::Fling { velocity, .. } => {
                if self.momentum.overshoots(self.edges()) {
                    self.bounce(velocity, now);
                } else {
                    self.coast(velocity, now);
                }
            }
            ReleaseOutcome::Settle { velocity, .. } => {
                if self.momentum.overshoots(self.edges()) {
                    self.bounce(velocity, now);
                } else {
                    self.settle(now);
                }
            }
        }
        Some(outcome)
    }

    /// Abandon the session without classifying it.
    pub fn cancel(&mut self, now: Instant) -> bool {
        if !self.recognizer.cancel() {
            return false;
        }
        self.carousel.cancel_timer(&mut self.long_press_timer);
        self.carousel.set_pressed(false);
        self.settle(now);
        true
    }

    /// End momentum where it is. Emits `MomentumFinished` only if momentum
    /// was running.
    pub fn stop_momentum(&mut self, now: Instant) {
        if !self.momentum.stop() {
            return;
        }
        self.carousel.cancel_timer(&mut self.momentum_timer);
        self.carousel.emit(CarouselEvent::MomentumFinished);
        self.settle(now);
    }

    fn accepts_touch(&self) -> bool {
        self.carousel.config().touch.enabled && self.carousel.is_enabled()
    }

    fn edges(&self) -> Edges {
        let (at_start, at_end) = self.carousel.boundaries();
        Edges::new(at_start, at_end)
    }

    fn session_velocity(&self) -> f32 {
        self.recognizer.session().map(|s| s.velocity).unwrap_or(0.0)
    }

    fn gesture(&mut self, gesture: GestureKind, velocity: f32) {
        self.carousel
            .emit(CarouselEvent::GestureDetected { gesture, velocity });
    }

    /// Snap the offset home without animating.
    fn settle(&mut self, now: Instant) {
        if self.momentum.reset_offset() {
            self.carousel.emit(CarouselEvent::OffsetChanged { offset: 0.0 });
            self.carousel.mark_dirty(now);
        }
    }

    fn coast(&mut self, velocity: f32, now: Instant) {
        let plan = self.momentum.plan(velocity);
        self.momentum.start_coast(&plan, now);
        self.carousel.emit(CarouselEvent::MomentumStarted {
            velocity: plan.velocity,
        });
        if let Some(intent) = NavigationIntent::step(plan.step) {
            self.carousel.navigate(intent, true, now);
        }
        self.arm_momentum(now);
    }

    fn bounce(&mut self, velocity: f32, now: Instant) {
        self.momentum.start_bounce(velocity, now);
        self.carousel.emit(CarouselEvent::MomentumStarted {
            velocity: self.momentum.state().map(|s| s.velocity).unwrap_or(0.0),
        });
        self.arm_momentum(now);
    }

    fn arm_momentum(&mut self, now: Instant) {
        self.carousel.cancel_timer(&mut self.momentum_timer);
        let interval = self.carousel.config().touch.momentum.frame_interval();
        self.momentum_timer =
            self.carousel.schedule(TimerKind::MomentumFrame, now + interval);
    }

    fn momentum_tick(&mut self, now: Instant) {
        let Some(frame) = self.momentum.tick(now) else {
            return;
        };
        self.carousel.emit(CarouselEvent::OffsetChanged {
            offset: frame.offset,
        });
        self.carousel.mark_dirty(now);
        if frame.finished {
            self.carousel.emit(CarouselEvent::MomentumFinished);
        } else {
            self.arm_momentum(now);
        }
    }

    fn handle_timer(&mut self, due: DueTimer, now: Instant) -> bool {
        match due.kind {
            TimerKind::MomentumFrame => {
                if self.momentum_timer == Some(due.token) {
                    self.momentum_timer = None;
                    self.momentum_tick(now);
                }
            }
            TimerKind::LongPress => {
                if self.long_press_timer == Some(due.token) {
                    self.long_press_timer = None;
                    if self.recognizer.long_press() {
                        self.gesture(GestureKind::LongPress, 0.0);
                    }
                }
            }
            TimerKind::DoubleTapWindow => {
                if self.double_tap_timer == Some(due.token) {
                    self.double_tap_timer = None;
                    self.recognizer.expire_double_tap();
                }
            }
            _ => return self.carousel.handle_timer(due, now),
        }
        true
    }
}

impl<H: PartialEq> TouchCarousel<H> {
    pub fn remove_handle(
        &mut self,
        handle: &H,
        now: Instant,
    ) -> Option<CarouselItem<H>> {
        let index = self.carousel.position_of(handle)?;
        self.remove(index, now)
    }
}

impl<H> NavigableSurface for TouchCarousel<H> {
    fn current_index(&self) -> Option<usize> {
        self.carousel.current_index()
    }

    fn count(&self) -> usize {
        self.carousel.count()
    }

    fn is_transitioning(&self) -> bool {
        self.carousel.is_transitioning()
    }

    fn transition_progress(&self) -> f32 {
        self.carousel.transition().blend_weight()
    }

    fn next(&mut self, now: Instant) -> bool {
        self.carousel.next(now)
    }

    fn previous(&mut self, now: Instant) -> bool {
        self.carousel.previous(now)
    }

    fn go_to(&mut self, index: usize, now: Instant) -> bool {
        self.carousel.go_to(index, now)
    }

    fn first(&mut self, now: Instant) -> bool {
        self.carousel.first(now)
    }

    fn last(&mut self, now: Instant) -> bool {
        self.carousel.last(now)
    }

    fn can_go_next(&self) -> bool {
        self.carousel.can_go_next()
    }

    fn can_go_previous(&self) -> bool {
        self.carousel.can_go_previous()
    }

    fn stop_transition(&mut self, now: Instant) {
        self.carousel.stop_transition(now);
    }

    fn advance(&mut self, now: Instant) {
        self.carousel.rearm_missing(now);
        if self.momentum.is_active() && self.momentum_timer.is_none() {
            self.momentum_timer =
                self.carousel.schedule(TimerKind::MomentumFrame, now);
        }
        while let Some(due) = self.carousel.pop_due(now) {
            self.handle_timer(due, now);
        }
    }

    fn next_deadline(&self) -> Option<Instant> {
        self.carousel.next_deadline()
    }
}
