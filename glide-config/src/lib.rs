//! # Glide Config
//!
//! Resolves a [`CarouselConfig`] from the environment or a file on disk,
//! runs it through the engine's guard rails and sets up `tracing` output
//! for hosts that do not install a subscriber of their own.
//!
//! ```no_run
//! use glide_config::{ConfigLoader, telemetry};
//!
//! telemetry::init_tracing();
//! let loaded = ConfigLoader::from_env().load()?;
//! let _carousel = glide_core::Carousel::<u32>::new(loaded.config);
//! # Ok::<(), glide_config::ConfigLoadError>(())
//! ```

pub mod loader;
pub mod telemetry;
pub mod validation;

pub use glide_core::CarouselConfig;
pub use loader::{ConfigLoadError, ConfigLoader, ConfigSource, LoadedConfig};
pub use validation::apply_guard_rails;
