//! The carousel: items, navigation, transitions, auto-play and redraw pacing
//! composed behind one timestamp-driven API.
//!
//! Nothing here reads the clock. Every mutating call takes `now`, and the
//! host calls [`Carousel::advance`] whenever [`Carousel::next_deadline`]
//! passes (or simply once per frame).

use std::time::Instant;

use crate::autoplay::{AutoPlayState, AutoPlayer};
use crate::config::{AutoPlayDirection, CarouselConfig, Orientation, WrapMode};
use crate::error::ConfigError;
use crate::events::{CarouselEvent, EventBus, EventKind, ListenerId};
use crate::model::{CarouselItem, CarouselModel};
use crate::navigation::{NavigationController, NavigationIntent};
use crate::repaint::{FlushDecision, RepaintScheduler};
use crate::scheduler::{DueTimer, TimerKind, TimerQueue, TimerToken};
use crate::surface::{InteractionFlags, InteractionState, Key, NavigableSurface};
use crate::transition::{TransitionEngine, TransitionSignal};

/// Who asked for a navigation. User requests restart the auto-play interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    User,
    AutoPlay,
}

#[derive(Debug)]
pub struct Carousel<H> {
    config: CarouselConfig,
    model: CarouselModel<H>,
    navigation: NavigationController,
    transition: TransitionEngine,
    repaint: RepaintScheduler,
    autoplay: AutoPlayer,
    timers: TimerQueue,
    events: EventBus,
    interaction: InteractionFlags,
    transition_timer: Option<TimerToken>,
    repaint_timer: Option<TimerToken>,
    autoplay_timer: Option<TimerToken>,
    autoplay_progress_timer: Option<TimerToken>,
}

impl<H> Default for Carousel<H> {
    fn default() -> Self {
        Self::new(CarouselConfig::default())
    }
}

impl<H> Carousel<H> {
    pub fn new(config: CarouselConfig) -> Self {
        Self {
            model: CarouselModel::new(),
            navigation: NavigationController::new(config.wrap_mode),
            transition: TransitionEngine::new(config.transition),
            repaint: RepaintScheduler::new(config.repaint.interval()),
            autoplay: AutoPlayer::new(config.autoplay),
            timers: TimerQueue::with_capacity(config.timer_capacity),
            events: EventBus::new(),
            interaction: InteractionFlags::default(),
            transition_timer: None,
            repaint_timer: None,
            autoplay_timer: None,
            autoplay_progress_timer: None,
            config,
        }
    }

    /// Validate `config` first. Soft warnings are logged, not returned.
    pub fn try_new(config: CarouselConfig) -> Result<Self, ConfigError> {
        let warnings = config.validate()?;
        for warning in &warnings.items {
            tracing::warn!(
                hint = warning.hint.as_deref().unwrap_or(""),
                "{}",
                warning.message
            );
        }
        Ok(Self::new(config))
    }

    // ---- observation -------------------------------------------------

    pub fn config(&self) -> &CarouselConfig {
        &self.config
    }

    pub fn model(&self) -> &CarouselModel<H> {
        &self.model
    }

    pub fn item(&self, index: usize) -> Option<&CarouselItem<H>> {
        self.model.item(index)
    }

    pub fn current_item(&self) -> Option<&CarouselItem<H>> {
        self.model.current_item()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.model.current()
    }

    pub fn count(&self) -> usize {
        self.model.count()
    }

    /// Where the carousel is heading: the running transition's target, or
    /// the current index when idle. Navigation resolves from here.
    pub fn pending_index(&self) -> Option<usize> {
        self.transition.target().or(self.model.current())
    }

    pub fn transition(&self) -> &TransitionEngine {
        &self.transition
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_active()
    }

    pub fn repaint(&self) -> &RepaintScheduler {
        &self.repaint
    }

    pub fn autoplay_state(&self) -> AutoPlayState {
        self.autoplay.state()
    }

    pub fn interaction_state(&self) -> InteractionState {
        self.interaction.state()
    }

    pub fn is_enabled(&self) -> bool {
        self.interaction.enabled
    }

    pub fn orientation(&self) -> Orientation {
        self.config.orientation
    }

    pub fn wrap_around(&self) -> bool {
        self.config.wrap_around()
    }

    /// `(at_start, at_end)` for the pending index under the wrap policy.
    pub fn boundaries(&self) -> (bool, bool) {
        self.navigation
            .boundaries(self.pending_index(), self.model.count())
    }

    pub fn can_go_next(&self) -> bool {
        self.navigation
            .can_go_next(self.pending_index(), self.model.count())
    }

    pub fn can_go_previous(&self) -> bool {
        self.navigation
            .can_go_previous(self.pending_index(), self.model.count())
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    // ---- listeners ---------------------------------------------------

    pub fn subscribe<F>(&mut self, kind: EventKind, listener: F) -> ListenerId
    where
        F: FnMut(&CarouselEvent) + 'static,
    {
        self.events.subscribe(kind, listener)
    }

    pub fn subscribe_all<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&CarouselEvent) + 'static,
    {
        self.events.subscribe_all(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.events.unsubscribe(id)
    }

    // ---- structure ---------------------------------------------------

    /// Append an item. The first item becomes current.
    pub fn push(&mut self, item: CarouselItem<H>, now: Instant) {
        let was_empty = self.model.is_empty();
        self.model.push(item);
        self.emit(CarouselEvent::ItemCountChanged {
            count: self.model.count(),
        });
        if was_empty {
            self.current_changed(true);
        }
        self.mark_dirty(now);
    }

    /// Insert at `index`; `index == count` appends. Larger indices are
    /// rejected. A running transition is committed first.
    pub fn insert(
        &mut self,
        index: usize,
        item: CarouselItem<H>,
        now: Instant,
    ) -> bool {
        if index > self.model.count() {
            tracing::trace!(
                index,
                count = self.model.count(),
                "insert rejected"
            );
            return false;
        }
        self.stop_transition(now);
        let before = self.model.current();
        self.model.insert(index, item);
        self.emit(CarouselEvent::ItemCountChanged {
            count: self.model.count(),
        });
        if before != self.model.current() {
            self.current_changed(before.is_none());
        }
        self.mark_dirty(now);
        true
    }

    /// Remove the item at `index`. A running transition is committed first.
    pub fn remove(
        &mut self,
        index: usize,
        now: Instant,
    ) -> Option<CarouselItem<H>> {
        if index >= self.model.count() {
            return None;
        }
        self.stop_transition(now);
        let before = self.model.current();
        let removal = self.model.remove(index)?;
        self.emit(CarouselEvent::ItemCountChanged {
            count: self.model.count(),
        });
        if removal.removed_current || before != self.model.current() {
            self.current_changed(removal.removed_current);
        }
        if self.model.is_empty() {
            self.stop_autoplay();
        }
        self.mark_dirty(now);
        Some(removal.item)
    }

    /// Remove every item. Returns how many were removed.
    pub fn clear(&mut self, now: Instant) -> usize {
        if self.model.is_empty() {
            return 0;
        }
        self.stop_transition(now);
        let removed = self.model.clear();
        self.emit(CarouselEvent::ItemCountChanged { count: 0 });
        self.current_changed(false);
        self.stop_autoplay();
        self.mark_dirty(now);
        removed
    }

    /// Replace an item's data without touching indices.
    pub fn set_item(
        &mut self,
        index: usize,
        item: CarouselItem<H>,
        now: Instant,
    ) -> Option<CarouselItem<H>> {
        let old = self.model.set_item(index, item)?;
        self.mark_dirty(now);
        Some(old)
    }

    pub fn set_wrap_around(&mut self, wrap_around: bool) {
        self.config.wrap_mode = WrapMode::from_wrap_around(wrap_around);
        self.navigation = NavigationController::new(self.config.wrap_mode);
    }

    // ---- navigation --------------------------------------------------

    pub fn next(&mut self, now: Instant) -> bool {
        self.navigate(NavigationIntent::Next, true, now)
    }

    pub fn previous(&mut self, now: Instant) -> bool {
        self.navigate(NavigationIntent::Previous, true, now)
    }

    pub fn go_to(&mut self, index: usize, now: Instant) -> bool {
        self.navigate(NavigationIntent::GoTo(index), true, now)
    }

    pub fn first(&mut self, now: Instant) -> bool {
        self.navigate(NavigationIntent::First, true, now)
    }

    pub fn last(&mut self, now: Instant) -> bool {
        self.navigate(NavigationIntent::Last, true, now)
    }

    /// Resolve and apply a navigation request. With `animated == false`
    /// the target is committed immediately and no transition runs.
    pub fn navigate(
        &mut self,
        intent: NavigationIntent,
        animated: bool,
        now: Instant,
    ) -> bool {
        self.navigate_from(intent, animated, Origin::User, now)
    }

    /// Commit any running transition at its current progress.
    pub fn stop_transition(&mut self, now: Instant) {
        let signals = self.transition.stop();
        self.apply_transition_signals(signals, now);
    }

    fn navigate_from(
        &mut self,
        intent: NavigationIntent,
        animated: bool,
        origin: Origin,
        now: Instant,
    ) -> bool {
        let from = self.pending_index();
        let count = self.model.count();
        let Some(target) = self.navigation.resolve(intent, from, count) else {
            tracing::trace!(?intent, ?from, count, "navigation rejected");
            return false;
        };
        tracing::debug!(
            ?intent,
            ?from,
            target,
            animated,
            ?origin,
            "navigate"
        );

        if origin == Origin::User {
            self.restart_autoplay_interval(now);
        }

        if animated {
            // `begin` commits the previous target before starting, so the
            // new transition starts from what was pending.
            let signals = self.transition.begin(
                from.unwrap_or(target),
                target,
                now,
            );
            self.apply_transition_signals(signals, now);
        } else {
            self.stop_transition(now);
            self.commit(target, now);
        }
        true
    }

    fn apply_transition_signals(
        &mut self,
        signals: Vec<TransitionSignal>,
        now: Instant,
    ) {
        if signals.is_empty() {
            return;
        }
        for signal in signals {
            match signal {
                TransitionSignal::Started { from, to } => {
                    self.emit(CarouselEvent::TransitionStarted { from, to });
                }
                TransitionSignal::Progress { progress, eased } => {
                    self.emit(CarouselEvent::TransitionProgressChanged {
                        progress,
                        eased,
                    });
                }
                TransitionSignal::Finished { index } => {
                    self.commit(index, now);
                    self.emit(CarouselEvent::TransitionFinished { index });
                }
            }
        }
        self.mark_dirty(now);
        self.sync_transition_timer(now);
    }

    fn commit(&mut self, index: usize, now: Instant) {
        if self.model.current() == Some(index) {
            return;
        }
        if self.model.set_current(index) {
            self.current_changed(true);
            self.mark_dirty(now);
        }
    }

    fn current_changed(&mut self, announce: bool) {
        let index = self.model.current();
        self.emit(CarouselEvent::CurrentIndexChanged { index });
        if !(announce && self.config.announce_changes) {
            return;
        }
        if let Some(index) = index {
            let title = self.model.item(index).and_then(|i| i.title.clone());
            self.emit(CarouselEvent::AnnounceCurrentItem {
                index,
                count: self.model.count(),
                title,
            });
        }
    }

    fn sync_transition_timer(&mut self, now: Instant) {
        match (self.transition.is_active(), self.transition_timer) {
            (true, None) => {
                let at = now + self.transition.frame_interval();
                self.transition_timer =
                    self.schedule(TimerKind::AnimationFrame, at);
            }
            (false, Some(token)) => {
                self.timers.cancel(token);
                self.transition_timer = None;
            }
            _ => {}
        }
    }

    // ---- auto-play ---------------------------------------------------

    pub fn start_autoplay(&mut self, now: Instant) -> bool {
        if !self.autoplay.start(self.model.count()) {
            return false;
        }
        tracing::debug!(
            direction = ?self.autoplay.config().direction,
            "auto-play started"
        );
        self.emit(CarouselEvent::AutoPlayStarted);
        self.arm_autoplay(now);
        true
    }

    pub fn stop_autoplay(&mut self) -> bool {
        if !self.autoplay.stop() {
            return false;
        }
        self.cancel_autoplay_timer();
        self.emit(CarouselEvent::AutoPlayStopped);
        true
    }

    pub fn pause_autoplay(&mut self) -> bool {
        if !self.autoplay.pause() {
            return false;
        }
        self.cancel_autoplay_timer();
        self.emit(CarouselEvent::AutoPlayPaused);
        true
    }

    pub fn resume_autoplay(&mut self, now: Instant) -> bool {
        if !self.autoplay.resume() {
            return false;
        }
        self.emit(CarouselEvent::AutoPlayResumed);
        self.arm_autoplay(now);
        true
    }

    /// Pause a running auto-play or resume a paused one.
    pub fn toggle_autoplay_pause(&mut self, now: Instant) -> bool {
        match self.autoplay.state() {
            AutoPlayState::Running => self.pause_autoplay(),
            AutoPlayState::Paused => self.resume_autoplay(now),
            AutoPlayState::Stopped => false,
        }
    }

    pub fn set_autoplay_direction(&mut self, direction: AutoPlayDirection) {
        self.config.autoplay.direction = direction;
        self.autoplay.set_direction(direction);
        if !direction.is_enabled() {
            self.stop_autoplay();
        }
    }

    /// Start a fresh interval: advance timer, progress reports from zero.
    fn arm_autoplay(&mut self, now: Instant) {
        self.cancel_autoplay_timer();
        let at = now + self.autoplay.config().interval();
        self.autoplay_timer = self.schedule(TimerKind::AutoAdvance, at);

        let reported = self.autoplay.progress();
        self.autoplay.begin_interval(now);
        if reported > 0.0 {
            self.emit(CarouselEvent::PlaybackProgressChanged { progress: 0.0 });
        }
        self.arm_autoplay_progress(now);
    }

    fn arm_autoplay_progress(&mut self, now: Instant) {
        if let Some(period) = self.autoplay.config().progress_interval() {
            self.autoplay_progress_timer =
                self.schedule(TimerKind::AutoPlayProgress, now + period);
        }
    }

    fn cancel_autoplay_timer(&mut self) {
        if let Some(token) = self.autoplay_timer.take() {
            self.timers.cancel(token);
        }
        if let Some(token) = self.autoplay_progress_timer.take() {
            self.timers.cancel(token);
        }
    }

    fn report_autoplay_progress(&mut self, now: Instant) {
        let before = self.autoplay.progress();
        let progress = self.autoplay.update_progress(now);
        if progress != before {
            self.emit(CarouselEvent::PlaybackProgressChanged { progress });
        }
    }

    fn restart_autoplay_interval(&mut self, now: Instant) {
        if self.autoplay.is_running() {
            self.arm_autoplay(now);
        }
    }

    fn autoplay_tick(&mut self, now: Instant) {
        if !self.autoplay.is_running() {
            return;
        }
        self.report_autoplay_progress(now);
        self.emit(CarouselEvent::IntervalCompleted);
        let count = self.model.count();
        let from = self.pending_index();
        if let Some(target) = self.autoplay.next_target(from, count) {
            self.navigate_from(
                NavigationIntent::GoTo(target),
                true,
                Origin::AutoPlay,
                now,
            );
        }
        self.arm_autoplay(now);
    }

    // ---- interaction -------------------------------------------------

    /// Keyboard navigation. Returns true when the key did something.
    pub fn handle_key(&mut self, key: Key, now: Instant) -> bool {
        if !self.interaction.enabled || !self.config.keyboard_enabled {
            return false;
        }
        let horizontal = self.config.orientation == Orientation::Horizontal;
        match key {
            Key::Left if horizontal => self.previous(now),
            Key::Right if horizontal => self.next(now),
            Key::Up if !horizontal => self.previous(now),
            Key::Down if !horizontal => self.next(now),
            Key::Home => self.first(now),
            Key::End => self.last(now),
            Key::Space => self.toggle_autoplay_pause(now),
            _ => false,
        }
    }

    /// Wheel navigation along the carousel axis. One notch (120 units)
    /// moves one item; positive deltas go back.
    pub fn handle_wheel(&mut self, delta: f32, now: Instant) -> bool {
        if !self.interaction.enabled || !self.config.wheel_enabled {
            return false;
        }
        if delta.abs() < crate::constants::touch::WHEEL_STEP {
            return false;
        }
        if delta > 0.0 {
            self.previous(now)
        } else {
            self.next(now)
        }
    }

    pub fn set_hovered(&mut self, hovered: bool, now: Instant) {
        if self.interaction.hovered == hovered {
            return;
        }
        self.update_interaction(|flags| flags.hovered = hovered);
        if self.config.autoplay.pause_on_hover {
            self.hold_autoplay(now);
        }
    }

    pub fn set_focused(&mut self, focused: bool, now: Instant) {
        if self.interaction.focused == focused {
            return;
        }
        self.update_interaction(|flags| flags.focused = focused);
        if self.config.autoplay.pause_on_focus {
            self.hold_autoplay(now);
        }
    }

    pub fn set_pressed(&mut self, pressed: bool) {
        self.update_interaction(|flags| flags.pressed = pressed);
    }

    /// Disabled carousels ignore pointer, key and wheel input. Programmatic
    /// navigation still works.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.update_interaction(|flags| {
            flags.enabled = enabled;
            if !enabled {
                flags.pressed = false;
            }
        });
    }

    /// Pause while hovered/focused (per config), resume once neither holds.
    fn hold_autoplay(&mut self, now: Instant) {
        let ap = self.config.autoplay;
        let held = (ap.pause_on_hover && self.interaction.hovered)
            || (ap.pause_on_focus && self.interaction.focused);
        if held {
            self.pause_autoplay();
        } else {
            self.resume_autoplay(now);
        }
    }

    fn update_interaction(
        &mut self,
        change: impl FnOnce(&mut InteractionFlags),
    ) {
        let before = self.interaction.state();
        change(&mut self.interaction);
        let state = self.interaction.state();
        if state != before {
            tracing::trace!(?state, "interaction state");
            self.emit(CarouselEvent::InteractionStateChanged { state });
        }
    }

    // ---- timers ------------------------------------------------------

    /// Fire everything due at `now`, in deadline order.
    pub fn advance(&mut self, now: Instant) {
        self.rearm_missing(now);
        while let Some(due) = self.timers.pop_due(now) {
            self.handle_timer(due, now);
        }
    }

    pub(crate) fn pop_due(&mut self, now: Instant) -> Option<DueTimer> {
        self.timers.pop_due(now)
    }

    /// Handle a timer owned by the carousel. Returns false for kinds that
    /// belong to a wrapping surface.
    pub(crate) fn handle_timer(&mut self, due: DueTimer, now: Instant) -> bool {
        match due.kind {
            TimerKind::AnimationFrame => {
                if self.transition_timer == Some(due.token) {
                    self.transition_timer = None;
                    let signals = self.transition.tick(now);
                    self.apply_transition_signals(signals, now);
                }
            }
            TimerKind::RepaintFlush => {
                if self.repaint_timer == Some(due.token) {
                    self.repaint_timer = None;
                    self.flush(now);
                }
            }
            TimerKind::AutoAdvance => {
                if self.autoplay_timer == Some(due.token) {
                    self.autoplay_timer = None;
                    self.autoplay_tick(now);
                }
            }
            TimerKind::AutoPlayProgress => {
                if self.autoplay_progress_timer == Some(due.token) {
                    self.autoplay_progress_timer = None;
                    if self.autoplay.is_running() {
                        self.report_autoplay_progress(now);
                        self.arm_autoplay_progress(now);
                    }
                }
            }
            TimerKind::MomentumFrame
            | TimerKind::LongPress
            | TimerKind::DoubleTapWindow => return false,
        }
        true
    }

    /// Re-arm timers that failed to schedule earlier. A transition without
    /// a frame timer ticks on this call.
    pub(crate) fn rearm_missing(&mut self, now: Instant) {
        if self.transition.is_active() && self.transition_timer.is_none() {
            self.transition_timer =
                self.schedule(TimerKind::AnimationFrame, now);
        }
        if self.repaint_timer.is_none()
            && let Some(at) = self.repaint.rearm_deadline(now)
        {
            self.repaint_timer = self.schedule(TimerKind::RepaintFlush, at);
            if self.repaint_timer.is_none() {
                self.repaint.disarm();
            }
        }
        if self.autoplay.is_running() && self.autoplay_timer.is_none() {
            self.arm_autoplay(now);
        } else if self.autoplay.is_running()
            && self.autoplay_progress_timer.is_none()
        {
            self.arm_autoplay_progress(now);
        }
    }

    pub(crate) fn schedule(
        &mut self,
        kind: TimerKind,
        at: Instant,
    ) -> Option<TimerToken> {
        match self.timers.schedule(kind, at) {
            Ok(token) => Some(token),
            Err(err) => {
                tracing::warn!(
                    ?kind,
                    error = %err,
                    "failed to arm timer; will retry on next advance"
                );
                None
            }
        }
    }

    pub(crate) fn cancel_timer(&mut self, token: &mut Option<TimerToken>) {
        if let Some(token) = token.take() {
            self.timers.cancel(token);
        }
    }

    pub(crate) fn emit(&mut self, event: CarouselEvent) {
        self.events.emit(&event);
    }

    /// Note a visible change; the redraw happens on the next flush.
    pub(crate) fn mark_dirty(&mut self, now: Instant) {
        if let Some(at) = self.repaint.mark_dirty(now) {
            self.repaint_timer = self.schedule(TimerKind::RepaintFlush, at);
            if self.repaint_timer.is_none() {
                self.repaint.disarm();
            }
        }
    }

    fn flush(&mut self, now: Instant) {
        match self.repaint.on_timer(now) {
            FlushDecision::Flush { rearm_at } => {
                self.emit(CarouselEvent::RedrawRequested);
                self.repaint_timer =
                    self.schedule(TimerKind::RepaintFlush, rearm_at);
                if self.repaint_timer.is_none() {
                    self.repaint.disarm();
                }
            }
            FlushDecision::Idle => {}
        }
    }
}

impl<H: PartialEq> Carousel<H> {
    pub fn position_of(&self, handle: &H) -> Option<usize> {
        self.model.position_of(handle)
    }

    /// Remove the item carrying `handle`; unknown handles are a no-op.
    pub fn remove_handle(
        &mut self,
        handle: &H,
        now: Instant,
    ) -> Option<CarouselItem<H>> {
        let index = self.model.position_of(handle)?;
        self.remove(index, now)
    }
}

impl<H> NavigableSurface for Carousel<H> {
    fn current_index(&self) -> Option<usize> {
        Carousel::current_index(self)
    }

    fn count(&self) -> usize {
        Carousel::count(self)
    }

    fn is_transitioning(&self) -> bool {
        Carousel::is_transitioning(self)
    }

    fn transition_progress(&self) -> f32 {
        self.transition.blend_weight()
    }

    fn next(&mut self, now: Instant) -> bool {
        Carousel::next(self, now)
    }

    fn previous(&mut self, now: Instant) -> bool {
        Carousel::previous(self, now)
    }

    fn go_to(&mut self, index: usize, now: Instant) -> bool {
        Carousel::go_to(self, index, now)
    }

    fn first(&mut self, now: Instant) -> bool {
        Carousel::first(self, now)
    }

    fn last(&mut self, now: Instant) -> bool {
        Carousel::last(self, now)
    }

    fn can_go_next(&self) -> bool {
        Carousel::can_go_next(self)
    }

    fn can_go_previous(&self) -> bool {
        Carousel::can_go_previous(self)
    }

    fn stop_transition(&mut self, now: Instant) {
        Carousel::stop_transition(self, now)
    }

    fn advance(&mut self, now: Instant) {
        Carousel::advance(self, now)
    }

    fn next_deadline(&self) -> Option<Instant> {
        Carousel::next_deadline(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn carousel(
        n: usize,
        config: CarouselConfig,
    ) -> (Carousel<usize>, Instant) {
        let t0 = Instant::now();
        let mut carousel = Carousel::new(config);
        for i in 0..n {
            let item = CarouselItem::new(i).with_title(format!("Item {i}"));
            carousel.push(item, t0);
        }
        (carousel, t0)
    }

    fn record(
        carousel: &mut Carousel<usize>,
    ) -> Rc<RefCell<Vec<CarouselEvent>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        carousel.subscribe_all(move |e| sink.borrow_mut().push(e.clone()));
        log
    }

    #[test]
    fn animated_next_commits_after_duration() {
        let (mut c, t0) = carousel(3, CarouselConfig::default());
        assert!(c.next(t0));
        assert_eq!(c.current_index(), Some(0));
        assert_eq!(c.pending_index(), Some(1));
        c.advance(t0 + ms(150));
        assert_eq!(c.current_index(), Some(0));
        c.advance(t0 + ms(320));
        assert_eq!(c.current_index(), Some(1));
        assert!(!c.is_transitioning());
    }

    #[test]
    fn non_animated_emits_no_transition_events() {
        let (mut c, t0) = carousel(3, CarouselConfig::default());
        let log = record(&mut c);
        assert!(c.navigate(NavigationIntent::Last, false, t0));
        assert_eq!(c.current_index(), Some(2));
        assert!(log.borrow().iter().all(|e| !matches!(
            e,
            CarouselEvent::TransitionStarted { .. }
                | CarouselEvent::TransitionFinished { .. }
        )));
        assert!(log
            .borrow()
            .contains(&CarouselEvent::CurrentIndexChanged { index: Some(2) }));
    }

    #[test]
    fn rejected_request_leaves_transition_running() {
        let (mut c, t0) = carousel(3, CarouselConfig::default());
        c.go_to(2, t0);
        c.advance(t0 + ms(100));
        assert!(!c.next(t0 + ms(100)));
        assert!(c.is_transitioning());
        assert_eq!(c.pending_index(), Some(2));
    }

    #[test]
    fn announces_current_item() {
        let (mut c, t0) = carousel(2, CarouselConfig::default());
        let log = record(&mut c);
        c.navigate(NavigationIntent::Next, false, t0);
        assert!(log.borrow().contains(&CarouselEvent::AnnounceCurrentItem {
            index: 1,
            count: 2,
            title: Some("Item 1".into()),
        }));
    }

    #[test]
    fn removing_current_item_reports_change() {
        let (mut c, t0) = carousel(3, CarouselConfig::default());
        c.navigate(NavigationIntent::Last, false, t0);
        let log = record(&mut c);
        let removed = c.remove(2, t0).unwrap();
        assert_eq!(removed.handle, 2);
        assert_eq!(c.current_index(), Some(1));
        let log = log.borrow();
        assert!(log.contains(&CarouselEvent::ItemCountChanged { count: 2 }));
        assert!(
            log.contains(&CarouselEvent::CurrentIndexChanged { index: Some(1) })
        );
    }

    #[test]
    fn removing_unrelated_item_is_quiet_about_index() {
        let (mut c, t0) = carousel(3, CarouselConfig::default());
        let log = record(&mut c);
        c.remove(2, t0);
        assert!(!log
            .borrow()
            .iter()
            .any(|e| matches!(e, CarouselEvent::CurrentIndexChanged { .. })));
        assert!(c.remove(9, t0).is_none());
        assert!(c.remove_handle(&42, t0).is_none());
    }

    #[test]
    fn structural_change_commits_running_transition() {
        let (mut c, t0) = carousel(3, CarouselConfig::default());
        c.next(t0);
        c.insert(0, CarouselItem::new(10), t0 + ms(50));
        assert!(!c.is_transitioning());
        // Committed to 1, then shifted by the insert.
        assert_eq!(c.current_index(), Some(2));
        assert_eq!(c.current_item().unwrap().handle, 1);
    }

    #[test]
    fn clear_empties_and_stops_autoplay() {
        let config =
            CarouselConfig::default().with_autoplay(AutoPlayDirection::Forward);
        let (mut c, t0) = carousel(3, config);
        assert!(c.start_autoplay(t0));
        assert_eq!(c.clear(t0), 3);
        assert_eq!(c.current_index(), None);
        assert_eq!(c.autoplay_state(), AutoPlayState::Stopped);
        assert!(!c.next(t0));
    }

    #[test]
    fn keyboard_follows_orientation() {
        let (mut c, t0) = carousel(3, CarouselConfig::default());
        assert!(!c.handle_key(Key::Down, t0));
        assert!(c.handle_key(Key::Right, t0));
        assert!(c.handle_key(Key::End, t0));
        c.stop_transition(t0);
        assert_eq!(c.current_index(), Some(2));
        assert!(c.handle_key(Key::Home, t0));

        let config =
            CarouselConfig::default().with_orientation(Orientation::Vertical);
        let (mut v, t0) = carousel(3, config);
        assert!(!v.handle_key(Key::Right, t0));
        assert!(v.handle_key(Key::Down, t0));
    }

    #[test]
    fn wheel_needs_a_full_notch() {
        let (mut c, t0) = carousel(3, CarouselConfig::default());
        assert!(!c.handle_wheel(-60.0, t0));
        assert!(c.handle_wheel(-120.0, t0));
        assert_eq!(c.pending_index(), Some(1));
        assert!(c.handle_wheel(240.0, t0));
        assert_eq!(c.pending_index(), Some(0));
    }

    #[test]
    fn disabled_carousel_ignores_input() {
        let (mut c, t0) = carousel(3, CarouselConfig::default());
        let log = record(&mut c);
        c.set_enabled(false);
        assert_eq!(c.interaction_state(), InteractionState::Disabled);
        assert!(!c.handle_key(Key::Right, t0));
        assert!(!c.handle_wheel(-120.0, t0));
        assert!(c.next(t0));
        assert!(log.borrow().contains(&CarouselEvent::InteractionStateChanged {
            state: InteractionState::Disabled
        }));
    }

    #[test]
    fn autoplay_advances_and_hover_pauses() {
        let config =
            CarouselConfig::default().with_autoplay(AutoPlayDirection::Forward);
        let (mut c, t0) = carousel(3, config);
        assert!(c.start_autoplay(t0));
        c.advance(t0 + ms(3000));
        assert_eq!(c.pending_index(), Some(1));
        c.advance(t0 + ms(3400));
        assert_eq!(c.current_index(), Some(1));

        c.set_hovered(true, t0 + ms(3500));
        assert_eq!(c.autoplay_state(), AutoPlayState::Paused);
        c.advance(t0 + ms(9000));
        assert_eq!(c.current_index(), Some(1));

        c.set_hovered(false, t0 + ms(9000));
        assert_eq!(c.autoplay_state(), AutoPlayState::Running);
        c.advance(t0 + ms(12_000));
        assert_eq!(c.pending_index(), Some(2));
    }

    fn progress(log: &[CarouselEvent]) -> Vec<f32> {
        log.iter()
            .filter_map(|e| match e {
                CarouselEvent::PlaybackProgressChanged { progress } => {
                    Some(*progress)
                }
                _ => None,
            })
            .collect()
    }

    #[test]
    fn autoplay_reports_interval_progress() {
        let config =
            CarouselConfig::default().with_autoplay(AutoPlayDirection::Forward);
        let (mut c, t0) = carousel(3, config);
        let log = record(&mut c);
        c.start_autoplay(t0);
        for step in 1..=30 {
            c.advance(t0 + ms(step * 50));
        }
        let halfway = progress(&log.borrow());
        assert_eq!(halfway.len(), 30);
        assert!(halfway.windows(2).all(|w| w[0] < w[1]));
        assert!((halfway[29] - 0.5).abs() < 1e-4);

        c.advance(t0 + ms(3000));
        assert_eq!(c.pending_index(), Some(1));
        let events = log.borrow();
        let completed = events
            .iter()
            .filter(|e| e.kind() == EventKind::IntervalCompleted)
            .count();
        assert_eq!(completed, 1);
        let all = progress(&events);
        assert!(all.contains(&1.0));
        assert_eq!(all.last(), Some(&0.0));
    }

    #[test]
    fn paused_autoplay_stops_reporting_progress() {
        let config =
            CarouselConfig::default().with_autoplay(AutoPlayDirection::Forward);
        let (mut c, t0) = carousel(3, config);
        let log = record(&mut c);
        c.start_autoplay(t0);
        c.advance(t0 + ms(100));
        assert!(c.pause_autoplay());
        let seen = log.borrow().len();
        c.advance(t0 + ms(5000));
        assert_eq!(log.borrow().len(), seen);
        assert_eq!(c.current_index(), Some(0));
    }

    #[test]
    fn manual_navigation_restarts_autoplay_interval() {
        let config =
            CarouselConfig::default().with_autoplay(AutoPlayDirection::Forward);
        let (mut c, t0) = carousel(3, config);
        c.start_autoplay(t0);
        c.navigate(NavigationIntent::GoTo(1), false, t0 + ms(2500));
        c.advance(t0 + ms(3000));
        assert_eq!(c.pending_index(), Some(1));
        c.advance(t0 + ms(5500));
        assert_eq!(c.pending_index(), Some(2));
    }

    #[test]
    fn space_toggles_autoplay_pause() {
        let config = CarouselConfig::default()
            .with_autoplay(AutoPlayDirection::PingPong);
        let (mut c, t0) = carousel(3, config);
        assert!(!c.handle_key(Key::Space, t0));
        c.start_autoplay(t0);
        assert!(c.handle_key(Key::Space, t0));
        assert_eq!(c.autoplay_state(), AutoPlayState::Paused);
        assert!(c.handle_key(Key::Space, t0));
        assert_eq!(c.autoplay_state(), AutoPlayState::Running);
    }

    #[test]
    fn full_timer_queue_retries_on_advance() {
        let mut config = CarouselConfig::default();
        config.timer_capacity = 1;
        let (mut c, t0) = carousel(3, config);
        // The repaint flush armed by `push` occupies the only slot.
        assert_eq!(c.pending_timers(), 1);
        assert!(c.next(t0));
        assert_eq!(c.current_index(), Some(0));

        for step in 1..=60 {
            c.advance(t0 + ms(step * 10));
        }
        assert_eq!(c.current_index(), Some(1));
        assert!(!c.is_transitioning());
    }
}
