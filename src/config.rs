//! Merge configuration (`merge.toml`).
//!
//! Controls how reactions are renumbered and whether progress is reported.
//! Missing fields use defaults; a missing file means all defaults.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::merge::renumber::RenumberOptions;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level merge configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MergeConfig {
    /// Reaction renumbering settings.
    #[serde(default)]
    pub renumber: RenumberConfig,

    /// Progress reporting settings.
    #[serde(default)]
    pub report: ReportConfig,
}

// ---------------------------------------------------------------------------
// RenumberConfig
// ---------------------------------------------------------------------------

/// Reaction renumbering settings.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RenumberConfig {
    /// Prefix of renumbered reaction identifiers (default: `"exp"`).
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// First counter value of a batch (default: 1).
    ///
    /// TOML integers are signed 64-bit, so a file can set at most
    /// `i64::MAX`; negative values are rejected. Larger starts can only be
    /// set in code.
    #[serde(default = "default_start")]
    pub start: u64,

    /// Rewrite each specification's `Reactions` table (default: true).
    #[serde(default = "default_true")]
    pub specification: bool,

    /// Rewrite model-object flux keys (default: true).
    #[serde(default = "default_true")]
    pub model_objects: bool,
}

impl Default for RenumberConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            start: default_start(),
            specification: true,
            model_objects: true,
        }
    }
}

impl RenumberConfig {
    /// The renumbering options these settings describe.
    #[must_use]
    pub fn options(&self) -> RenumberOptions {
        RenumberOptions {
            prefix: self.prefix.clone(),
            specification: self.specification,
            model_objects: self.model_objects,
        }
    }
}

fn default_prefix() -> String {
    "exp".to_owned()
}

const fn default_start() -> u64 {
    1
}

const fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// ReportConfig
// ---------------------------------------------------------------------------

/// Progress reporting settings.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    /// When false, progress messages are discarded.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// A `merge.toml` that could not be read, parsed or accepted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigError {
    /// File the settings were read from; `None` for in-memory text.
    pub path: Option<PathBuf>,
    /// What was wrong. TOML syntax and type errors start with `line N:`.
    pub message: String,
}

impl ConfigError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            path: None,
            message: message.into(),
        }
    }

    fn in_file(mut self, path: &Path) -> Self {
        self.path = Some(path.to_owned());
        self
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid merge settings")?;
        if let Some(path) = &self.path {
            write!(f, " ({})", path.display())?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl MergeConfig {
    /// Read settings from a `merge.toml` file.
    ///
    /// An absent file is not an error: every setting takes its default.
    ///
    /// # Errors
    /// Returns `ConfigError`, tagged with `path`, when the file exists but
    /// cannot be read or its contents are rejected by [`MergeConfig::parse`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::parse(&text).map_err(|e| e.in_file(path)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(ConfigError::new(format!("unreadable: {e}")).in_file(path)),
        }
    }

    /// Parse settings from TOML text.
    ///
    /// # Errors
    /// Returns `ConfigError` on malformed TOML, unknown keys, out-of-range
    /// values, or an empty prefix.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|e| {
            let detail = e.message().trim_end();
            match e.span() {
                Some(span) => {
                    let line = 1 + text[..span.start].matches('\n').count();
                    ConfigError::new(format!("line {line}: {detail}"))
                }
                None => ConfigError::new(detail),
            }
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.renumber.prefix.is_empty() {
            return Err(ConfigError::new(
                "renumber.prefix is empty; reaction identifiers would be bare numbers",
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
