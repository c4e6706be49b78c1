use std::path::PathBuf;

use glide_core::ConfigError;
use thiserror::Error;

/// Why a carousel configuration could not be produced.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    /// The file named by the environment or found on disk was unreadable
    /// or malformed.
    #[error("failed to load carousel configuration from {path}")]
    File {
        /// Offending file.
        path: PathBuf,
        /// Read or parse failure, with context.
        #[source]
        source: anyhow::Error,
    },
    /// Inline JSON from an environment variable did not parse.
    #[error("failed to parse {var}")]
    Inline {
        /// Name of the environment variable.
        var: &'static str,
        /// Parse failure.
        #[source]
        source: anyhow::Error,
    },
    /// The configuration parsed but the engine refuses to run with it.
    #[error(transparent)]
    GuardRail(#[from] ConfigError),
}
