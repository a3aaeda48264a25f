//! # Decode Error Types

use runtime_traits::RuntimeError;
use thiserror::Error;

/// Errors that can occur while decoding segments and assembling the output
/// container.
///
/// Nothing here is retried: the decode operation is atomic-or-nothing from
/// the pipeline's perspective (the library offers no partial-progress
/// contract), so every error propagates to the top level and terminates the
/// run with a non-zero status.
#[derive(Error, Debug)]
pub enum DecodeError {
    // ========================================================================
    // Precondition Violations
    // ========================================================================
    /// Segment breaches the hard size ceiling: a corrupt or mismatched
    /// input, not a runtime condition to recover from.
    #[error("Segment {path} exceeds the size limit: {size} bytes (limit {limit})")]
    SegmentTooLarge {
        path: String,
        size: usize,
        limit: usize,
    },

    /// The library reported a chunk larger than the output scratch buffer.
    #[error("Reported chunk of {needed} bytes exceeds the output scratch buffer ({capacity} bytes)")]
    OutputOverflow { needed: usize, capacity: usize },

    // ========================================================================
    // Session Construction
    // ========================================================================
    /// The library's create export returned a null handle.
    #[error("Decoder library returned a null handle from its create export")]
    CreateFailed,

    /// Invalid decoder or container configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    // ========================================================================
    // Input Discovery
    // ========================================================================
    /// The input path yielded no segment files.
    #[error("No segments found under {0}")]
    NoSegments(String),

    // ========================================================================
    // Propagated
    // ========================================================================
    /// Execution runtime failure (load, symbol resolution, memory, guest
    /// fault).
    #[error("Runtime error: {0}")]
    Runtime(#[from] RuntimeError),

    /// I/O error reading segments or writing the container.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DecodeError {
    /// Returns `true` if this error is a caller/input contract violation
    /// rather than an environmental failure.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            DecodeError::SegmentTooLarge { .. } | DecodeError::OutputOverflow { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, DecodeError>;
