use std::path::{Path, PathBuf};

use crate::{
    detect::signature::{DEFAULT_TOLERANCE, DuplicateRule},
    foundation::core::FrameRange,
    foundation::error::{HoldError, HoldResult},
    output::format::OutputFormat,
};

/// Parameters of one scheduled run.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RunConfig {
    /// Inclusive frame range to produce.
    pub range: FrameRange,
    /// Largest per-channel difference still treated as "unchanged".
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    /// Root of the output tree; frames land in `<output_directory>/images`.
    #[serde(default)]
    pub output_directory: Option<PathBuf>,
    /// Still-image format of every frame.
    #[serde(default)]
    pub format: OutputFormat,
    /// Duplicate decision rule.
    #[serde(default)]
    pub rule: DuplicateRule,
}

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

impl RunConfig {
    /// Config with default tolerance, format and rule.
    pub fn new(range: FrameRange, output_directory: impl Into<PathBuf>) -> Self {
        Self {
            range,
            tolerance: DEFAULT_TOLERANCE,
            output_directory: Some(output_directory.into()),
            format: OutputFormat::default(),
            rule: DuplicateRule::default(),
        }
    }

    /// Check the settings planning depends on; the output directory is not required.
    pub fn validate_for_planning(&self) -> HoldResult<()> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(HoldError::configuration(format!(
                "tolerance must be finite and non-negative, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }

    /// Check the config and return the output directory.
    pub fn validate(&self) -> HoldResult<&Path> {
        self.validate_for_planning()?;
        match self.output_directory.as_deref() {
            Some(dir) if !dir.as_os_str().is_empty() => Ok(dir),
            _ => Err(HoldError::configuration(
                "output directory is not configured",
            )),
        }
    }

    /// Parse a config from JSON text. Not validated.
    pub fn from_json_str(text: &str) -> HoldResult<Self> {
        serde_json::from_str(text).map_err(|e| HoldError::serde(e.to_string()))
    }

    /// Read a config JSON file. Not validated.
    pub fn load(path: &Path) -> HoldResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| HoldError::io(path, e))?;
        Self::from_json_str(&text)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/config.rs"]
mod tests;
