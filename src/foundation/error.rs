use std::path::PathBuf;

use crate::foundation::core::FrameIndex;

/// Result alias used throughout the crate.
pub type HoldResult<T> = Result<T, HoldError>;

/// Errors surfaced by planning, scheduling and the bundled collaborators.
#[derive(thiserror::Error, Debug)]
pub enum HoldError {
    /// Missing or invalid run configuration; raised before any frame is produced.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Invalid scene or curve data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Curve evaluation failed.
    #[error("animation error: {0}")]
    Animation(String),

    /// The renderer failed to produce a frame. Fatal to the run.
    #[error("render error at frame {frame}: {message}")]
    Render {
        /// Frame that failed.
        frame: FrameIndex,
        /// Renderer-provided description.
        message: String,
    },

    /// Filesystem failure tied to a path.
    #[error("io error at '{}': {source}", path.display())]
    Io {
        /// Path the operation targeted.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// JSON (de)serialization failure.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Anything else.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HoldError {
    /// Build a [`HoldError::Configuration`].
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Build a [`HoldError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`HoldError::Animation`].
    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    /// Build a [`HoldError::Render`] for `frame`.
    pub fn render(frame: FrameIndex, msg: impl std::fmt::Display) -> Self {
        Self::Render {
            frame,
            message: msg.to_string(),
        }
    }

    /// Build a [`HoldError::Io`] for `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Build a [`HoldError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
