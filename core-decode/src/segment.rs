//! # Segment Input
//!
//! One unit of compressed HCA audio, size-checked at construction.

use std::fs;
use std::path::Path;

use bytes::Bytes;

use crate::error::{DecodeError, Result};

/// Hard ceiling on segment size. A segment must be strictly smaller.
///
/// The streaming format never produces frames that large, so anything at or
/// above this is a corrupt or mismatched input and is treated as a fatal
/// contract violation rather than a recoverable condition.
pub const SEGMENT_SIZE_LIMIT: usize = 32_768;

/// An immutable HCA segment with its source name for diagnostics.
#[derive(Debug, Clone)]
pub struct Segment {
    data: Bytes,
    source: String,
}

impl Segment {
    /// Wrap raw segment bytes, enforcing the size ceiling.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::SegmentTooLarge`] naming `source` when the
    /// payload is not strictly below [`SEGMENT_SIZE_LIMIT`].
    pub fn new(data: Bytes, source: impl Into<String>) -> Result<Self> {
        let source = source.into();
        if data.len() >= SEGMENT_SIZE_LIMIT {
            return Err(DecodeError::SegmentTooLarge {
                path: source,
                size: data.len(),
                limit: SEGMENT_SIZE_LIMIT,
            });
        }

        Ok(Self { data, source })
    }

    /// Read a segment from disk.
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read(path)?;
        Self::new(Bytes::from(data), path.display().to_string())
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Source name (usually the file path) for diagnostics.
    pub fn source(&self) -> &str {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_below_limit() {
        let segment = Segment::new(Bytes::from(vec![0u8; SEGMENT_SIZE_LIMIT - 1]), "a.hca");
        assert!(segment.is_ok());
        assert_eq!(segment.unwrap().len(), SEGMENT_SIZE_LIMIT - 1);
    }

    #[test]
    fn test_segment_at_limit_is_rejected() {
        let result = Segment::new(Bytes::from(vec![0u8; SEGMENT_SIZE_LIMIT]), "big.hca");

        match result {
            Err(DecodeError::SegmentTooLarge { path, size, limit }) => {
                assert_eq!(path, "big.hca");
                assert_eq!(size, SEGMENT_SIZE_LIMIT);
                assert_eq!(limit, SEGMENT_SIZE_LIMIT);
            }
            other => panic!("expected SegmentTooLarge, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_segment_is_allowed() {
        let segment = Segment::new(Bytes::new(), "empty.hca").unwrap();
        assert!(segment.is_empty());
    }
}
