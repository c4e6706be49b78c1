//! Locating and parsing carousel configuration

mod error;

pub use error::ConfigLoadError;

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, anyhow};
use glide_core::{CarouselConfig, ConfigWarnings};
use tracing::{debug, info, warn};

use crate::validation::apply_guard_rails;

/// Environment variable naming a TOML or JSON config file.
pub const PATH_VAR: &str = "GLIDE_CONFIG_PATH";
/// Environment variable holding an inline JSON config.
pub const JSON_VAR: &str = "GLIDE_CONFIG_JSON";

const CANDIDATES: &[&str] = &[
    "glide.toml",
    "glide.json",
    "config/glide.toml",
    "config/glide.json",
];

/// Where the loaded configuration came from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConfigSource {
    /// Nothing configured; built-in defaults.
    #[default]
    Default,
    /// File named by `$GLIDE_CONFIG_PATH`.
    EnvPath(PathBuf),
    /// JSON from `$GLIDE_CONFIG_JSON`.
    EnvInline,
    /// A default file found under the search root.
    File(PathBuf),
}

/// A validated configuration plus the soft warnings it produced.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Configuration that passed the guard rails.
    pub config: CarouselConfig,
    /// Where it was read from.
    pub source: ConfigSource,
    /// Soft problems; already logged.
    pub warnings: ConfigWarnings,
}

/// Resolves a configuration from the environment and default files.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    path_override: Option<PathBuf>,
    inline_json: Option<String>,
    search_root: PathBuf,
}

impl ConfigLoader {
    /// Snapshot `$GLIDE_CONFIG_PATH` and `$GLIDE_CONFIG_JSON`; default files
    /// are searched relative to the working directory.
    pub fn from_env() -> Self {
        let non_blank = |var: &str| {
            env::var(var).ok().filter(|value| !value.trim().is_empty())
        };
        Self {
            path_override: non_blank(PATH_VAR).map(PathBuf::from),
            inline_json: non_blank(JSON_VAR),
            search_root: PathBuf::from("."),
        }
    }

    /// Ignore the environment and only look for default files under `root`.
    pub fn in_dir(root: impl Into<PathBuf>) -> Self {
        Self {
            path_override: None,
            inline_json: None,
            search_root: root.into(),
        }
    }

    /// Look for default files under `root` instead.
    pub fn with_search_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.search_root = root.into();
        self
    }

    /// Resolve in order:
    /// 1) `$GLIDE_CONFIG_PATH` (TOML or JSON file),
    /// 2) `$GLIDE_CONFIG_JSON` (inline JSON),
    /// 3) the first default file found under the search root,
    /// 4) built-in defaults.
    ///
    /// The result has passed the guard rails; warnings are logged and
    /// returned alongside it.
    pub fn load(&self) -> Result<LoadedConfig, ConfigLoadError> {
        let (config, source) = self.resolve()?;
        let warnings = apply_guard_rails(&config)?;
        for warning in &warnings {
            warn!(
                source = ?source,
                hint = warning.hint.as_deref().unwrap_or(""),
                "{}",
                warning.message
            );
        }
        info!(source = ?source, "carousel configuration loaded");
        Ok(LoadedConfig {
            config,
            source,
            warnings,
        })
    }

    fn resolve(
        &self,
    ) -> Result<(CarouselConfig, ConfigSource), ConfigLoadError> {
        if let Some(path) = &self.path_override {
            let config = load_file(path)?;
            return Ok((config, ConfigSource::EnvPath(path.clone())));
        }

        if let Some(raw) = &self.inline_json {
            let config =
                parse_json(raw).map_err(|source| ConfigLoadError::Inline {
                    var: JSON_VAR,
                    source,
                })?;
            return Ok((config, ConfigSource::EnvInline));
        }

        if let Some(path) = self.find_default_file() {
            let config = load_file(&path)?;
            return Ok((config, ConfigSource::File(path)));
        }

        debug!("no carousel config found; using defaults");
        Ok((CarouselConfig::default(), ConfigSource::Default))
    }

    fn find_default_file(&self) -> Option<PathBuf> {
        CANDIDATES
            .iter()
            .map(|candidate| self.search_root.join(candidate))
            .find(|path| path.is_file())
    }
}

fn load_file(path: &Path) -> Result<CarouselConfig, ConfigLoadError> {
    load_from_file(path).map_err(|source| ConfigLoadError::File {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse a config file, picking the format from its extension. Unknown
/// extensions are tried as TOML, then JSON.
pub fn load_from_file(path: &Path) -> anyhow::Result<CarouselConfig> {
    let contents = fs::read_to_string(path).with_context(|| {
        format!("failed to read carousel config from {}", path.display())
    })?;

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => parse_json(&contents).with_context(|| {
            format!("invalid carousel config {}", path.display())
        }),
        Some("toml") | Some("tml") => parse_toml(&contents).with_context(|| {
            format!("invalid carousel config {}", path.display())
        }),
        _ => parse_from_str(&contents, &path.display().to_string()),
    }
}

/// Parse `contents` as TOML, falling back to JSON. `origin` only appears in
/// the error message.
pub fn parse_from_str(
    contents: &str,
    origin: &str,
) -> anyhow::Result<CarouselConfig> {
    toml::from_str(contents).or_else(|toml_err| {
        serde_json::from_str(contents).map_err(|json_err| {
            anyhow!(
                "failed to parse carousel config {origin}: toml error: {toml_err}; json error: {json_err}"
            )
        })
    })
}

/// Parse a TOML document.
pub fn parse_toml(raw: &str) -> anyhow::Result<CarouselConfig> {
    toml::from_str(raw)
        .map_err(|err| anyhow!("invalid carousel config toml: {err}"))
}

/// Parse a JSON document.
pub fn parse_json(raw: &str) -> anyhow::Result<CarouselConfig> {
    serde_json::from_str(raw)
        .map_err(|err| anyhow!("invalid carousel config json: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use glide_core::{AutoPlayDirection, Orientation};

    #[test]
    fn unknown_extension_falls_back_to_json() {
        let config = parse_from_str(
            r#"{ "orientation": "vertical", "autoplay": { "direction": "ping_pong" } }"#,
            "inline",
        )
        .expect("json fallback");
        assert_eq!(config.orientation, Orientation::Vertical);
        assert_eq!(config.autoplay.direction, AutoPlayDirection::PingPong);
    }

    #[test]
    fn garbage_reports_both_parsers() {
        let err = parse_from_str("orientation = [", "broken.conf")
            .expect_err("neither format parses");
        let message = err.to_string();
        assert!(message.contains("broken.conf"));
        assert!(message.contains("toml error"));
        assert!(message.contains("json error"));
    }

    #[test]
    fn empty_loader_yields_defaults() {
        let loader = ConfigLoader::in_dir("/nonexistent/glide-config-test");
        let loaded = loader.load().expect("defaults load");
        assert_eq!(loaded.source, ConfigSource::Default);
        assert_eq!(loaded.config, CarouselConfig::default());
    }
}
