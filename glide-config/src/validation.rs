//! Guard rails applied to loaded configuration

use glide_core::{CarouselConfig, ConfigError, ConfigWarnings};

/// Timers a touch carousel may hold at once: transition frame, repaint,
/// auto-play advance, auto-play progress, momentum frame, long press and
/// double tap.
const CONCURRENT_TOUCH_TIMERS: usize = 7;

/// Engine validation plus checks that only matter for a deployed config.
pub fn apply_guard_rails(
    config: &CarouselConfig,
) -> Result<ConfigWarnings, ConfigError> {
    let mut warnings = config.validate()?;

    if config.autoplay.direction.is_enabled()
        && config.autoplay.interval_ms <= config.transition.duration_ms
    {
        warnings.push_with_hint(
            "auto-play interval does not exceed the transition duration; items never come to rest",
            "raise autoplay.interval_ms above transition.duration_ms",
        );
    }

    if config.touch.enabled && config.timer_capacity < CONCURRENT_TOUCH_TIMERS
    {
        warnings.push_with_hint(
            format!(
                "timer_capacity {} is below the {CONCURRENT_TOUCH_TIMERS} timers a touch carousel can hold",
                config.timer_capacity
            ),
            "animations will stall until a slot frees up",
        );
    }

    if !config.touch.enabled
        && !config.keyboard_enabled
        && !config.wheel_enabled
        && !config.autoplay.direction.is_enabled()
    {
        warnings.push(
            "touch, keyboard, wheel and auto-play are all disabled; only programmatic navigation will move the carousel",
        );
    }

    Ok(warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glide_core::AutoPlayDirection;

    #[test]
    fn defaults_are_clean() {
        let warnings = apply_guard_rails(&CarouselConfig::default()).unwrap();
        assert!(warnings.is_empty(), "{warnings:?}");
    }

    #[test]
    fn autoplay_faster_than_transition_warns() {
        let mut config = CarouselConfig::default()
            .with_autoplay(AutoPlayDirection::Forward)
            .with_transition_duration_ms(500);
        config.autoplay.interval_ms = 400;
        let warnings = apply_guard_rails(&config).unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(warnings.items[0].message.contains("auto-play"));
    }

    #[test]
    fn small_timer_queue_warns_only_with_touch() {
        let mut config = CarouselConfig {
            timer_capacity: 3,
            ..CarouselConfig::default()
        };
        assert_eq!(apply_guard_rails(&config).unwrap().len(), 1);

        config.touch.enabled = false;
        assert!(apply_guard_rails(&config).unwrap().is_empty());
    }

    #[test]
    fn engine_errors_pass_through() {
        let mut config = CarouselConfig::default();
        config.repaint.interval_ms = 0;
        assert_eq!(
            apply_guard_rails(&config).unwrap_err(),
            ConfigError::ZeroInterval {
                field: "repaint.interval_ms"
            }
        );
    }
}
