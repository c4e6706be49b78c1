//! Configuration for a carousel instance
//!
//! Every section is `#[serde(default)]`, so partial config files only override
//! what they name. Defaults come from [`crate::constants`].

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::easing::EasingFunction;
use crate::error::{ConfigError, ConfigWarnings};

/// Axis along which items are laid out and dragged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

/// Carousel paging and boundary behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WrapMode {
    /// Finite (clamped) carousel.
    #[default]
    Finite,
    /// Infinite wrap-around carousel. Indexing wraps with modulo arithmetic.
    Infinite,
}

impl WrapMode {
    pub fn from_wrap_around(wrap_around: bool) -> Self {
        if wrap_around {
            Self::Infinite
        } else {
            Self::Finite
        }
    }

    pub fn wraps(self) -> bool {
        matches!(self, Self::Infinite)
    }
}

/// Policy applied when a drag would move past the first or last item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeBehavior {
    /// Hard stop: the offset is pinned to zero at the boundary.
    Stop,
    /// Diminishing drag past the boundary.
    Resist,
    /// Overscroll allowed while dragging, animated back on release.
    #[default]
    Bounce,
    /// No boundary; wrap navigation takes over.
    Wrap,
}

/// Auto-advance direction.
///
/// `"enabled"` and `"disabled"` are accepted in config files as shorthand for
/// `forward` and `none`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoPlayDirection {
    #[default]
    #[serde(alias = "disabled")]
    None,
    #[serde(alias = "enabled")]
    Forward,
    Backward,
    /// Forward to the last item, then backward to the first, repeating.
    PingPong,
}

impl AutoPlayDirection {
    pub fn is_enabled(self) -> bool {
        !matches!(self, Self::None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    /// Duration of an index-to-index transition. Zero commits immediately.
    pub duration_ms: u64,
    pub easing: EasingFunction,
    /// Animation tick interval.
    pub frame_interval_ms: u64,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            duration_ms: constants::transition::DURATION_MS,
            easing: EasingFunction::EaseOutCubic,
            frame_interval_ms: constants::transition::FRAME_INTERVAL_MS,
        }
    }
}

impl TransitionConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms.max(1))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoPlayConfig {
    pub direction: AutoPlayDirection,
    pub interval_ms: u64,
    /// Period of `PlaybackProgressChanged` reports. Zero turns them off.
    pub progress_interval_ms: u64,
    pub pause_on_hover: bool,
    pub pause_on_focus: bool,
}

impl Default for AutoPlayConfig {
    fn default() -> Self {
        Self {
            direction: AutoPlayDirection::None,
            interval_ms: constants::autoplay::INTERVAL_MS,
            progress_interval_ms: constants::autoplay::PROGRESS_INTERVAL_MS,
            pause_on_hover: true,
            pause_on_focus: true,
        }
    }
}

impl AutoPlayConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms.max(1))
    }

    /// `None` when progress reporting is off.
    pub fn progress_interval(&self) -> Option<Duration> {
        (self.progress_interval_ms > 0)
            .then(|| Duration::from_millis(self.progress_interval_ms))
    }
}

/// Gesture recognition thresholds. A threshold provider may rescale these
/// before they reach the recognizer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TouchThresholds {
    /// Pixels per second.
    pub swipe_velocity: f32,
    /// Pixels.
    pub swipe_distance: f32,
    /// Pixels.
    pub pan: f32,
    pub tap_timeout_ms: u64,
    pub double_tap_timeout_ms: u64,
    pub long_press_timeout_ms: u64,
}

impl Default for TouchThresholds {
    fn default() -> Self {
        Self {
            swipe_velocity: constants::touch::SWIPE_VELOCITY_THRESHOLD,
            swipe_distance: constants::touch::SWIPE_DISTANCE_THRESHOLD,
            pan: constants::touch::PAN_THRESHOLD,
            tap_timeout_ms: constants::touch::TAP_TIMEOUT_MS,
            double_tap_timeout_ms: constants::touch::DOUBLE_TAP_TIMEOUT_MS,
            long_press_timeout_ms: constants::touch::LONG_PRESS_TIMEOUT_MS,
        }
    }
}

impl TouchThresholds {
    pub fn tap_timeout(&self) -> Duration {
        Duration::from_millis(self.tap_timeout_ms)
    }

    pub fn double_tap_timeout(&self) -> Duration {
        Duration::from_millis(self.double_tap_timeout_ms)
    }

    pub fn long_press_timeout(&self) -> Duration {
        Duration::from_millis(self.long_press_timeout_ms)
    }

    /// Scale the distance thresholds, leaving velocities and timeouts alone.
    pub fn scaled_distances(mut self, factor: f32) -> Self {
        self.swipe_distance *= factor;
        self.pan *= factor;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeConfig {
    pub behavior: EdgeBehavior,
    /// Factor in `(0, 1)` applied under [`EdgeBehavior::Resist`].
    pub resistance: f32,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            behavior: EdgeBehavior::Bounce,
            resistance: constants::momentum::EDGE_RESISTANCE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MomentumConfig {
    pub enabled: bool,
    pub friction: f32,
    pub elasticity: f32,
    pub max_velocity: f32,
    pub min_velocity: f32,
    /// Fraction of the viewport extent the projected offset must exceed to
    /// move one item.
    pub index_threshold: f32,
    pub min_duration_ms: u64,
    pub max_duration_ms: u64,
    pub bounce_duration_ms: u64,
    pub frame_interval_ms: u64,
}

impl Default for MomentumConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            friction: constants::momentum::FRICTION,
            elasticity: constants::momentum::ELASTICITY,
            max_velocity: constants::momentum::MAX_VELOCITY,
            min_velocity: constants::momentum::MIN_VELOCITY,
            index_threshold: constants::momentum::INDEX_THRESHOLD,
            min_duration_ms: constants::momentum::MIN_DURATION_MS,
            max_duration_ms: constants::momentum::MAX_DURATION_MS,
            bounce_duration_ms: constants::momentum::BOUNCE_DURATION_MS,
            frame_interval_ms: constants::momentum::FRAME_INTERVAL_MS,
        }
    }
}

impl MomentumConfig {
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms.max(1))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TouchConfig {
    pub enabled: bool,
    pub thresholds: TouchThresholds,
    pub edge: EdgeConfig,
    pub momentum: MomentumConfig,
}

impl Default for TouchConfig {
    fn default() -> Self {
        Self::desktop()
    }
}

impl TouchConfig {
    /// Phone-class preset: light swipes, small pan slop.
    pub fn mobile() -> Self {
        Self::with_thresholds(300.0, 30.0, 5.0)
    }

    /// Tablet-class preset.
    pub fn tablet() -> Self {
        Self::with_thresholds(400.0, 40.0, 8.0)
    }

    /// Mouse/trackpad preset.
    pub fn desktop() -> Self {
        Self::with_thresholds(
            constants::touch::SWIPE_VELOCITY_THRESHOLD,
            constants::touch::SWIPE_DISTANCE_THRESHOLD,
            constants::touch::PAN_THRESHOLD,
        )
    }

    fn with_thresholds(
        swipe_velocity: f32,
        swipe_distance: f32,
        pan: f32,
    ) -> Self {
        Self {
            enabled: true,
            thresholds: TouchThresholds {
                swipe_velocity,
                swipe_distance,
                pan,
                ..TouchThresholds::default()
            },
            edge: EdgeConfig::default(),
            momentum: MomentumConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepaintConfig {
    pub interval_ms: u64,
}

impl Default for RepaintConfig {
    fn default() -> Self {
        Self {
            interval_ms: constants::repaint::INTERVAL_MS,
        }
    }
}

impl RepaintConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms.max(1))
    }
}

/// Static configuration for a carousel instance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarouselConfig {
    pub orientation: Orientation,
    pub wrap_mode: WrapMode,
    pub transition: TransitionConfig,
    pub autoplay: AutoPlayConfig,
    pub touch: TouchConfig,
    pub repaint: RepaintConfig,
    pub keyboard_enabled: bool,
    pub wheel_enabled: bool,
    /// Emit accessibility announce requests when the current item changes.
    pub announce_changes: bool,
    /// Upper bound on pending timers for one instance.
    pub timer_capacity: usize,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::Horizontal,
            wrap_mode: WrapMode::Finite,
            transition: TransitionConfig::default(),
            autoplay: AutoPlayConfig::default(),
            touch: TouchConfig::default(),
            repaint: RepaintConfig::default(),
            keyboard_enabled: true,
            wheel_enabled: true,
            announce_changes: true,
            timer_capacity: constants::timers::CAPACITY,
        }
    }
}

impl CarouselConfig {
    pub fn with_wrap_around(mut self, wrap_around: bool) -> Self {
        self.wrap_mode = WrapMode::from_wrap_around(wrap_around);
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_touch(mut self, touch: TouchConfig) -> Self {
        self.touch = touch;
        self
    }

    pub fn with_transition_duration_ms(mut self, duration_ms: u64) -> Self {
        self.transition.duration_ms = duration_ms;
        self
    }

    pub fn with_autoplay(mut self, direction: AutoPlayDirection) -> Self {
        self.autoplay.direction = direction;
        self
    }

    pub fn wrap_around(&self) -> bool {
        self.wrap_mode.wraps()
    }

    /// Reject configurations the engine cannot run with and collect soft
    /// warnings for ones that will behave oddly.
    pub fn validate(&self) -> Result<ConfigWarnings, ConfigError> {
        let mut warnings = ConfigWarnings::default();
        let touch = &self.touch;
        let momentum = &touch.momentum;

        if self.repaint.interval_ms == 0 {
            return Err(ConfigError::ZeroInterval {
                field: "repaint.interval_ms",
            });
        }
        if self.transition.frame_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval {
                field: "transition.frame_interval_ms",
            });
        }
        if momentum.frame_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval {
                field: "touch.momentum.frame_interval_ms",
            });
        }
        if self.autoplay.direction.is_enabled()
            && self.autoplay.interval_ms == 0
        {
            return Err(ConfigError::ZeroInterval {
                field: "autoplay.interval_ms",
            });
        }
        if self.timer_capacity == 0 {
            return Err(ConfigError::OutOfRange {
                field: "timer_capacity",
                value: 0.0,
                expected: "at least 1",
            });
        }

        require_positive("touch.momentum.friction", momentum.friction)?;
        require_positive("touch.momentum.max_velocity", momentum.max_velocity)?;
        require_non_negative("touch.momentum.min_velocity", momentum.min_velocity)?;
        require_non_negative("touch.momentum.elasticity", momentum.elasticity)?;
        require_non_negative("touch.thresholds.pan", touch.thresholds.pan)?;
        require_non_negative(
            "touch.thresholds.swipe_distance",
            touch.thresholds.swipe_distance,
        )?;
        require_non_negative(
            "touch.thresholds.swipe_velocity",
            touch.thresholds.swipe_velocity,
        )?;

        let index_threshold = momentum.index_threshold;
        if !(index_threshold > 0.0 && index_threshold <= 1.0) {
            return Err(ConfigError::OutOfRange {
                field: "touch.momentum.index_threshold",
                value: momentum.index_threshold,
                expected: "within (0, 1]",
            });
        }
        if !(touch.edge.resistance > 0.0 && touch.edge.resistance < 1.0) {
            return Err(ConfigError::OutOfRange {
                field: "touch.edge.resistance",
                value: touch.edge.resistance,
                expected: "within (0, 1)",
            });
        }
        if momentum.min_duration_ms > momentum.max_duration_ms {
            return Err(ConfigError::InvertedRange {
                min_field: "touch.momentum.min_duration_ms",
                max_field: "touch.momentum.max_duration_ms",
            });
        }

        if touch.thresholds.swipe_distance < touch.thresholds.pan {
            warnings.push_with_hint(
                "swipe distance threshold is below the pan threshold",
                "every swipe will already have been recognized as a pan; raise touch.thresholds.swipe_distance",
            );
        }
        if momentum.min_velocity > touch.thresholds.swipe_velocity {
            warnings.push(
                "momentum minimum velocity exceeds the swipe velocity threshold; momentum can never start",
            );
        }
        if touch.edge.behavior == EdgeBehavior::Wrap && !self.wrap_around() {
            warnings.push_with_hint(
                "edge behavior `wrap` on a finite carousel leaves boundaries unhandled",
                "set wrap_mode = \"infinite\" or choose stop/resist/bounce",
            );
        }
        if self.transition.duration_ms > 0
            && self.transition.duration_ms < self.repaint.interval_ms
        {
            warnings.push(
                "transition is shorter than one repaint interval; it will appear to jump",
            );
        }

        Ok(warnings)
    }
}

fn require_positive(
    field: &'static str,
    value: f32,
) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            expected: "greater than 0",
        })
    }
}

fn require_non_negative(
    field: &'static str,
    value: f32,
) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            expected: "0 or greater",
        })
    }
}
