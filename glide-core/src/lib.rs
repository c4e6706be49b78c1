//! # Glide Core
//!
//! Headless carousel interaction engine. Turns pointer, touch, wheel and
//! keyboard input into item navigation, animates transitions between items,
//! simulates post-release momentum and paces redraw requests. Rendering is
//! left to the host toolkit.
//!
//! ## Driving the engine
//!
//! The engine is single-threaded and never reads the clock. Every entry point
//! takes an explicit `now: Instant`; deferred work (animation frames, redraw
//! flushes, auto-play, long-press and double-tap windows) sits in a timer
//! queue that fires when the host calls `advance(now)`.
//!
//! - [`carousel::Carousel`]: items, navigation, transitions, auto-play,
//!   keyboard and wheel input
//! - [`touch::TouchCarousel`]: a `Carousel` plus gestures, drag offset, edge
//!   policy and momentum
//! - [`surface::NavigableSurface`]: the navigation contract both implement
//!
//! ## Example
//!
//! ```
//! use std::time::{Duration, Instant};
//!
//! use glide_core::{
//!     Carousel, CarouselConfig, CarouselEvent, CarouselItem, EventKind,
//! };
//!
//! let t0 = Instant::now();
//! let config = CarouselConfig::default().with_wrap_around(true);
//! let mut carousel = Carousel::new(config);
//! for name in ["a", "b", "c"] {
//!     carousel.push(CarouselItem::new(name).with_title(name), t0);
//! }
//! carousel.subscribe(EventKind::CurrentIndexChanged, |event| {
//!     if let CarouselEvent::CurrentIndexChanged { index } = event {
//!         println!("now showing {index:?}");
//!     }
//! });
//!
//! carousel.previous(t0);
//! carousel.advance(t0 + Duration::from_millis(400));
//! assert_eq!(carousel.current_index(), Some(2));
//! ```

// TODO: document public fields and accessors, then drop this allow
#![allow(missing_docs)]

pub mod autoplay;
pub mod carousel;
pub mod config;
pub mod constants;
pub mod easing;
pub mod error;
pub mod events;
pub mod gesture;
pub mod model;
pub mod momentum;
pub mod navigation;
pub mod repaint;
pub mod scheduler;
pub mod surface;
pub mod touch;
pub mod transition;

pub use autoplay::{AutoPlayState, AutoPlayer};
pub use carousel::Carousel;
pub use config::{
    AutoPlayConfig, AutoPlayDirection, CarouselConfig, EdgeBehavior,
    EdgeConfig, MomentumConfig, Orientation, RepaintConfig, TouchConfig,
    TouchThresholds, TransitionConfig, WrapMode,
};
pub use easing::EasingFunction;
pub use error::{ConfigError, ConfigWarning, ConfigWarnings, ScheduleError};
pub use events::{CarouselEvent, EventBus, EventKind, ListenerId};
pub use gesture::{
    GestureKind, GestureRecognizer, Point, ReleaseOutcome, SwipeDirection,
};
pub use model::{CarouselItem, CarouselModel};
pub use momentum::{Edges, MomentumKind, MomentumSimulator};
pub use navigation::{NavigationController, NavigationIntent};
pub use repaint::RepaintScheduler;
pub use scheduler::{TimerKind, TimerQueue, TimerToken};
pub use surface::{
    DpiScaling, InteractionState, Key, NavigableSurface, ThresholdProvider,
    Unscaled,
};
pub use touch::TouchCarousel;
pub use transition::{TransitionEngine, TransitionPhase};
