use std::path::{Path, PathBuf};

/// Result alias used throughout the crate.
pub type SpriteResult<T> = Result<T, SpriteError>;

/// Every failure surfaced by conversion, layout, compositing and export.
#[derive(thiserror::Error, Debug)]
pub enum SpriteError {
    /// Invalid or contradictory options, caught before any I/O.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The host lacks the runtime or executable a backend needs.
    #[error("backend '{backend}' is not available: {reason}")]
    UnavailableBackend {
        /// Backend identifier.
        backend: String,
        /// Human-readable reason reported by the availability probe.
        reason: String,
    },

    /// No backend is registered under the identifier.
    #[error("unknown backend '{backend}'")]
    UnknownBackend {
        /// Requested identifier.
        backend: String,
    },

    /// A resolved raster size has a non-positive side.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimension {
        /// Resolved width.
        width: i64,
        /// Resolved height.
        height: i64,
    },

    /// Parsing, rendering or an external process failed.
    #[error("conversion error: {0}")]
    Conversion(String),

    /// A tile does not match the layout's tile size.
    #[error("tile {index} is {}x{}, expected {}x{}", .got.0, .got.1, .want.0, .want.1)]
    TileSizeMismatch {
        /// 0-based tile ordinal.
        index: usize,
        /// Actual `(width, height)`.
        got: (u32, u32),
        /// Expected `(width, height)`.
        want: (u32, u32),
    },

    /// Nothing to work on.
    #[error("empty input: {0}")]
    EmptyInput(String),

    /// File read/write/permission failure.
    #[error("i/o error on '{}': {source}", .path.display())]
    Io {
        /// Path involved in the failing operation.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Metadata or config (de)serialization failure.
    #[error("serialization error: {0}")]
    Serde(String),
}

impl SpriteError {
    /// Build a [`SpriteError::Configuration`] value.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Build a [`SpriteError::Conversion`] value.
    pub fn conversion(msg: impl Into<String>) -> Self {
        Self::Conversion(msg.into())
    }

    /// Build a [`SpriteError::EmptyInput`] value.
    pub fn empty_input(msg: impl Into<String>) -> Self {
        Self::EmptyInput(msg.into())
    }

    /// Build a [`SpriteError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Build a [`SpriteError::InvalidDimension`] value.
    pub fn invalid_dimension(width: i64, height: i64) -> Self {
        Self::InvalidDimension { width, height }
    }

    /// Build a [`SpriteError::Io`] value.
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
