//! Capabilities shared by carousel variants and the collaborators injected
//! into them

use std::fmt;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::config::TouchThresholds;
use crate::constants;

/// Visual state handed to the style collaborator.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum InteractionState {
    #[default]
    Normal,
    Hovered,
    Pressed,
    Disabled,
    Focused,
}

/// Raw interaction flags; several can hold at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionFlags {
    pub enabled: bool,
    pub hovered: bool,
    pub pressed: bool,
    pub focused: bool,
}

impl Default for InteractionFlags {
    fn default() -> Self {
        Self {
            enabled: true,
            hovered: false,
            pressed: false,
            focused: false,
        }
    }
}

impl InteractionFlags {
    /// Collapse the flags into the single state styles are keyed on.
    pub fn state(&self) -> InteractionState {
        if !self.enabled {
            InteractionState::Disabled
        } else if self.pressed {
            InteractionState::Pressed
        } else if self.focused {
            InteractionState::Focused
        } else if self.hovered {
            InteractionState::Hovered
        } else {
            InteractionState::Normal
        }
    }
}

/// Keys the carousel reacts to. Hosts map their own key codes onto these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    Space,
}

/// Index/count/transition operations every carousel variant offers.
///
/// Navigation methods return whether the request was accepted. Rejected
/// requests change nothing and emit nothing.
pub trait NavigableSurface {
    fn current_index(&self) -> Option<usize>;
    fn count(&self) -> usize;
    fn is_transitioning(&self) -> bool;
    /// Eased transition progress, 0 when idle.
    fn transition_progress(&self) -> f32;

    fn next(&mut self, now: Instant) -> bool;
    fn previous(&mut self, now: Instant) -> bool;
    fn go_to(&mut self, index: usize, now: Instant) -> bool;
    fn first(&mut self, now: Instant) -> bool;
    fn last(&mut self, now: Instant) -> bool;
    fn can_go_next(&self) -> bool;
    fn can_go_previous(&self) -> bool;

    /// Commit the in-flight transition at its current progress. Idempotent.
    fn stop_transition(&mut self, now: Instant);

    /// Fire every timer due at `now`.
    fn advance(&mut self, now: Instant);
    /// When `advance` next has work to do.
    fn next_deadline(&self) -> Option<Instant>;
}

/// Rescales touch thresholds before they reach the gesture recognizer.
pub trait ThresholdProvider: fmt::Debug {
    fn scale(&self, base: TouchThresholds) -> TouchThresholds;
}

/// Leaves thresholds untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unscaled;

impl ThresholdProvider for Unscaled {
    fn scale(&self, base: TouchThresholds) -> TouchThresholds {
        base
    }
}

/// Scales distance thresholds by screen density relative to 96 DPI and an
/// optional accessibility multiplier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DpiScaling {
    pub dpi: f32,
    pub accessibility_factor: f32,
}

impl DpiScaling {
    pub fn new(dpi: f32) -> Self {
        Self {
            dpi,
            accessibility_factor: 1.0,
        }
    }

    pub fn with_accessibility_factor(mut self, factor: f32) -> Self {
        self.accessibility_factor = factor;
        self
    }

    pub fn factor(&self) -> f32 {
        let density = if self.dpi.is_finite() && self.dpi > 0.0 {
            self.dpi / constants::touch::REFERENCE_DPI
        } else {
            1.0
        };
        let access = if self.accessibility_factor.is_finite()
            && self.accessibility_factor > 0.0
        {
            self.accessibility_factor
        } else {
            1.0
        };
        density * access
    }
}

impl ThresholdProvider for DpiScaling {
    fn scale(&self, base: TouchThresholds) -> TouchThresholds {
        base.scaled_distances(self.factor())
    }
}
