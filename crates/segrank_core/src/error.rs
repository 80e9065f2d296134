//! Error types for SegRank core.

use crate::types::{DocId, SegmentDocId, SegmentId};
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in SegRank core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The requested result limit is invalid.
    ///
    /// A limit of zero is rejected rather than silently clamped.
    #[error("invalid result limit: {limit} (must be at least 1)")]
    InvalidLimit {
        /// The limit that was requested.
        limit: usize,
    },

    /// A segment value source failed to produce a value for an accepted
    /// document.
    ///
    /// Values are immutable and locally available, so a lookup failure is a
    /// data-integrity problem. The query fails as a whole; skipping the
    /// document would corrupt rank counts.
    #[error("value source unavailable for {doc} in {segment}: {message}")]
    SourceUnavailable {
        /// The segment whose value source failed.
        segment: SegmentId,
        /// The segment-local document position.
        doc: SegmentDocId,
        /// Description of the failure.
        message: String,
    },

    /// Segment geometry is malformed.
    ///
    /// Raised when doc ranges overlap or a segment's doc count disagrees
    /// with its value source.
    #[error("invalid segment layout: {message}")]
    InvalidLayout {
        /// Description of the layout issue.
        message: String,
    },

    /// A doc ID would fall outside the addressable range.
    #[error("doc id overflow at {doc}")]
    DocIdOverflow {
        /// The last representable doc ID.
        doc: DocId,
    },
}

/// Error raised by a segment value lookup.
///
/// Lookups do not know which segment owns them; the engine attaches segment
/// context when converting this into [`CoreError::SourceUnavailable`].
#[derive(Debug, Error)]
#[error("{message}")]
pub struct LookupError {
    /// Description of the failure.
    pub message: String,
}

impl LookupError {
    /// Creates a new lookup error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl CoreError {
    /// Creates an invalid limit error.
    #[must_use]
    pub fn invalid_limit(limit: usize) -> Self {
        Self::InvalidLimit { limit }
    }

    /// Creates a source unavailable error.
    pub fn source_unavailable(
        segment: SegmentId,
        doc: SegmentDocId,
        message: impl Into<String>,
    ) -> Self {
        Self::SourceUnavailable {
            segment,
            doc,
            message: message.into(),
        }
    }

    /// Creates an invalid layout error.
    pub fn invalid_layout(message: impl Into<String>) -> Self {
        Self::InvalidLayout {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_limit_display() {
        let err = CoreError::invalid_limit(0);
        assert_eq!(
            err.to_string(),
            "invalid result limit: 0 (must be at least 1)"
        );
    }

    #[test]
    fn source_unavailable_display() {
        let err =
            CoreError::source_unavailable(SegmentId::new(3), SegmentDocId::new(9), "missing page");
        assert_eq!(
            err.to_string(),
            "value source unavailable for local:9 in seg:3: missing page"
        );
    }
}
