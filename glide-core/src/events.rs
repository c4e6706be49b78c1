//! Observable carousel events and the listener registry

use std::fmt;

use crate::gesture::{GestureKind, Point, SwipeDirection};
use crate::surface::InteractionState;

#[derive(Debug, Clone, PartialEq)]
pub enum CarouselEvent {
    CurrentIndexChanged { index: Option<usize> },
    ItemCountChanged { count: usize },
    TransitionStarted { from: usize, to: usize },
    TransitionProgressChanged { progress: f32, eased: f32 },
    TransitionFinished { index: usize },
    GestureDetected { gesture: GestureKind, velocity: f32 },
    /// A tap landed on the current item.
    ItemClicked { index: usize },
    ItemDoubleClicked { index: usize },
    TouchStarted { position: Point },
    TouchMoved { position: Point, velocity: f32 },
    TouchEnded { position: Point, velocity: f32 },
    SwipePerformed { direction: SwipeDirection, velocity: f32 },
    EdgeReached { at_start: bool, at_end: bool },
    MomentumStarted { velocity: f32 },
    MomentumFinished,
    /// Live drag/momentum offset along the carousel axis, px.
    OffsetChanged { offset: f32 },
    /// Coalesced request to repaint.
    RedrawRequested,
    /// The accessibility layer should announce the current item.
    AnnounceCurrentItem {
        index: usize,
        count: usize,
        title: Option<String>,
    },
    InteractionStateChanged { state: InteractionState },
    AutoPlayStarted,
    AutoPlayStopped,
    AutoPlayPaused,
    AutoPlayResumed,
    /// Elapsed fraction of the current auto-play interval.
    PlaybackProgressChanged { progress: f32 },
    /// An auto-play interval ran out; the advance follows.
    IntervalCompleted,
}

/// Discriminant of [`CarouselEvent`], used to filter subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    CurrentIndexChanged,
    ItemCountChanged,
    TransitionStarted,
    TransitionProgressChanged,
    TransitionFinished,
    GestureDetected,
    ItemClicked,
    ItemDoubleClicked,
    TouchStarted,
    TouchMoved,
    TouchEnded,
    SwipePerformed,
    EdgeReached,
    MomentumStarted,
    MomentumFinished,
    OffsetChanged,
    RedrawRequested,
    AnnounceCurrentItem,
    InteractionStateChanged,
    AutoPlayStarted,
    AutoPlayStopped,
    AutoPlayPaused,
    AutoPlayResumed,
    PlaybackProgressChanged,
    IntervalCompleted,
}

impl CarouselEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::CurrentIndexChanged { .. } => EventKind::CurrentIndexChanged,
            Self::ItemCountChanged { .. } => EventKind::ItemCountChanged,
            Self::TransitionStarted { .. } => EventKind::TransitionStarted,
            Self::TransitionProgressChanged { .. } => {
                EventKind::TransitionProgressChanged
            }
            Self::TransitionFinished { .. } => EventKind::TransitionFinished,
            Self::GestureDetected { .. } => EventKind::GestureDetected,
            Self::ItemClicked { .. } => EventKind::ItemClicked,
            Self::ItemDoubleClicked { .. } => EventKind::ItemDoubleClicked,
            Self::TouchStarted { .. } => EventKind::TouchStarted,
            Self::TouchMoved { .. } => EventKind::TouchMoved,
            Self::TouchEnded { .. } => EventKind::TouchEnded,
            Self::SwipePerformed { .. } => EventKind::SwipePerformed,
            Self::EdgeReached { .. } => EventKind::EdgeReached,
            Self::MomentumStarted { .. } => EventKind::MomentumStarted,
            Self::MomentumFinished => EventKind::MomentumFinished,
            Self::OffsetChanged { .. } => EventKind::OffsetChanged,
            Self::RedrawRequested => EventKind::RedrawRequested,
            Self::AnnounceCurrentItem { .. } => EventKind::AnnounceCurrentItem,
            Self::InteractionStateChanged { .. } => {
                EventKind::InteractionStateChanged
            }
            Self::AutoPlayStarted => EventKind::AutoPlayStarted,
            Self::AutoPlayStopped => EventKind::AutoPlayStopped,
            Self::AutoPlayPaused => EventKind::AutoPlayPaused,
            Self::AutoPlayResumed => EventKind::AutoPlayResumed,
            Self::PlaybackProgressChanged { .. } => {
                EventKind::PlaybackProgressChanged
            }
            Self::IntervalCompleted => EventKind::IntervalCompleted,
        }
    }
}

/// Returned by `subscribe`; pass back to `unsubscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&CarouselEvent)>;

struct Subscription {
    id: ListenerId,
    filter: Option<EventKind>,
    listener: Listener,
}

/// Listeners are called synchronously, in registration order, on the thread
/// that drives the carousel.
#[derive(Default)]
pub struct EventBus {
    subscriptions: Vec<Subscription>,
    next_id: u64,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.subscriptions.len())
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Listen to one kind of event.
    pub fn subscribe<F>(&mut self, kind: EventKind, listener: F) -> ListenerId
    where
        F: FnMut(&CarouselEvent) + 'static,
    {
        self.insert(Some(kind), Box::new(listener))
    }

    /// Listen to every event.
    pub fn subscribe_all<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&CarouselEvent) + 'static,
    {
        self.insert(None, Box::new(listener))
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != id);
        self.subscriptions.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn emit(&mut self, event: &CarouselEvent) {
        let kind = event.kind();
        for sub in &mut self.subscriptions {
            if sub.filter.is_none_or(|filter| filter == kind) {
                (sub.listener)(event);
            }
        }
    }

    fn insert(
        &mut self,
        filter: Option<EventKind>,
        listener: Listener,
    ) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.subscriptions.push(Subscription {
            id,
            filter,
            listener,
        });
        id
    }
}
