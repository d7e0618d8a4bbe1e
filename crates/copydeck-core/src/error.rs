//! Error types for the core model
//!
//! Covers catalog loading and coordinate conversion. Rotation and lookups
//! are infallible.

/// Errors raised by the core model
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Document dimensions cannot anchor a percentage
    #[error("invalid document size: {width}x{height}")]
    InvalidDocumentSize {
        /// Reported document width
        width: f64,
        /// Reported document height
        height: f64,
    },

    /// Coordinate is not a finite number
    #[error("non-finite coordinate: ({x}, {y})")]
    NonFiniteCoordinate {
        /// Horizontal coordinate
        x: f64,
        /// Vertical coordinate
        y: f64,
    },

    /// Catalog source could not be parsed
    #[error("catalog parse error: {0}")]
    Catalog(#[from] serde_json::Error),
}

impl CoreError {
    /// Create invalid document size error
    #[inline]
    #[must_use]
    pub fn invalid_document_size(width: f64, height: f64) -> Self {
        Self::InvalidDocumentSize { width, height }
    }
}

/// Result type alias for core operations
pub type CoreResult<T> = Result<T, CoreError>;
