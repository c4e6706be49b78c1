//! Carousel engine constants
//!
//! Shared defaults for transitions, touch recognition, momentum physics and
//! redraw pacing. Tuning should happen here so every carousel variant picks up
//! the same feel; per-instance overrides go through `CarouselConfig`.

/// Transition animation defaults.
pub mod transition {
    /// Default duration (ms) of an index-to-index transition.
    pub const DURATION_MS: u64 = 300;
    /// Animation tick interval (ms). Runs faster than the repaint ticker so
    /// progress updates outnumber redraws.
    pub const FRAME_INTERVAL_MS: u64 = 8;
}

/// Touch gesture thresholds (desktop-class pointer defaults).
pub mod touch {
    /// Minimum release velocity (px/s) for a swipe.
    pub const SWIPE_VELOCITY_THRESHOLD: f32 = 500.0;
    /// Minimum displacement (px) for a swipe.
    pub const SWIPE_DISTANCE_THRESHOLD: f32 = 50.0;
    /// Displacement (px) after which a drag is recognized as a pan.
    pub const PAN_THRESHOLD: f32 = 10.0;
    /// A press released before this (ms) without panning is a tap.
    pub const TAP_TIMEOUT_MS: u64 = 200;
    /// Window (ms) after a tap in which a second tap becomes a double tap.
    pub const DOUBLE_TAP_TIMEOUT_MS: u64 = 300;
    /// Press duration (ms) that triggers a long press.
    pub const LONG_PRESS_TIMEOUT_MS: u64 = 500;
    /// Wheel delta per notch; smaller deltas are ignored.
    pub const WHEEL_STEP: f32 = 120.0;
    /// Reference DPI for threshold scaling.
    pub const REFERENCE_DPI: f32 = 96.0;
}

/// Momentum physics and edge policy defaults.
pub mod momentum {
    /// Deceleration friction used by the distance projection.
    pub const FRICTION: f32 = 0.85;
    /// Overshoot allowance as a fraction of the viewport extent under bounce.
    pub const ELASTICITY: f32 = 0.3;
    /// Release velocities are clamped to this magnitude (px/s).
    pub const MAX_VELOCITY: f32 = 2000.0;
    /// Releases slower than this (px/s) never start momentum.
    pub const MIN_VELOCITY: f32 = 100.0;
    /// Drag scaling applied past a boundary under `EdgeBehavior::Resist`.
    pub const EDGE_RESISTANCE: f32 = 0.5;
    /// Fraction of the viewport the projected offset must exceed to change
    /// item.
    pub const INDEX_THRESHOLD: f32 = 0.3;
    /// Coast duration clamp (ms).
    pub const MIN_DURATION_MS: u64 = 120;
    /// Coast duration clamp (ms).
    pub const MAX_DURATION_MS: u64 = 1200;
    /// Bounce-back animation duration (ms).
    pub const BOUNCE_DURATION_MS: u64 = 300;
    /// Momentum animation tick interval (ms).
    pub const FRAME_INTERVAL_MS: u64 = 8;
}

/// Redraw pacing.
pub mod repaint {
    /// Flush interval (ms), roughly 60 Hz.
    pub const INTERVAL_MS: u64 = 16;
}

/// Auto-play defaults.
pub mod autoplay {
    /// Interval (ms) between automatic advances.
    pub const INTERVAL_MS: u64 = 3000;
    /// How often (ms) interval progress is reported while running.
    pub const PROGRESS_INTERVAL_MS: u64 = 50;
}

/// Timer queue sizing.
pub mod timers {
    /// Maximum number of pending timers per carousel instance.
    pub const CAPACITY: usize = 32;
}

/// Default viewport extent (px) used until the host reports a size.
pub const DEFAULT_VIEWPORT_EXTENT: f32 = 400.0;
