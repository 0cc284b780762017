//! `testprof.toml` options loading.

use serde::{Deserialize, Serialize};

use std::path::{Path, PathBuf};

use crate::{ProfError, ProfResult};

pub const DEFAULT_THRESHOLD: f64 = 0.5;
pub const DEFAULT_CONFIG_FILE: &str = "testprof.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProfilerOptions {
    /// Where to write the structured (JSON) report.
    #[serde(default = "default_output_path")]
    pub output_path: Option<PathBuf>,

    /// Seconds at or above which a test counts as slow.
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    /// Where to write the formatted (HTML) report.
    #[serde(default)]
    pub html_output: Option<PathBuf>,

    /// A previous structured report to compare durations against.
    #[serde(default)]
    pub compare_with: Option<PathBuf>,
}

fn default_output_path() -> Option<PathBuf> {
    Some(PathBuf::from("testprof.json"))
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

impl Default for ProfilerOptions {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            threshold: default_threshold(),
            html_output: None,
            compare_with: None,
        }
    }
}

impl ProfilerOptions {
    /// Options from `path`; `Ok(None)` when the file does not exist.
    pub fn read(path: &Path) -> ProfResult<Option<Self>> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        toml::from_str(&text)
            .map(Some)
            .map_err(|err| ProfError::parse(path, err.to_string()))
    }

    /// Like [`ProfilerOptions::read`], but any problem falls back to the defaults with a warning.
    pub fn load_optional(path: &Path) -> Self {
        match Self::read(path) {
            Ok(opts) => opts.unwrap_or_default(),
            Err(err) => {
                tracing::warn!("ignoring config: {err}");
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> ProfResult<()> {
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(ProfError::InvalidArgument(format!(
                "threshold must be a non-negative number of seconds, got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}
