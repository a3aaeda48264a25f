//! # Stream Assembler
//!
//! Sequences segments through one decoder session into a single growing WAV
//! stream. Processing is strictly sequential: one decode in flight, each
//! chunk appended the moment it returns, nothing buffered beyond the current
//! chunk. The container header is finalized only after the last segment,
//! when the total payload size is known.

use std::fs::{self, File};
use std::io::{Seek, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{DecodeError, Result};
use crate::segment::{Segment, SEGMENT_SIZE_LIMIT};
use crate::session::DecoderSession;
use crate::wav::{WavSpec, WavWriter};

/// Outcome of a completed assembly run.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssembleReport {
    /// Segments decoded.
    pub segments: usize,
    /// Total PCM payload bytes written (excluding the 44-byte header).
    pub data_bytes: u64,
    /// Total samples across all chunks.
    pub samples: u64,
}

/// Drives one [`DecoderSession`] over an ordered segment list.
pub struct StreamAssembler {
    session: DecoderSession,
}

impl StreamAssembler {
    pub fn new(session: DecoderSession) -> Self {
        Self { session }
    }

    /// Discover segment files for `input`.
    ///
    /// A file path is taken as a single segment. A directory is scanned
    /// non-recursively for entries whose extension matches `extension`
    /// (case-insensitively) and the matches are sorted lexicographically by
    /// path, independent of directory listing order. Segment names carry
    /// timestamps, so lexicographic order is stream order.
    pub fn collect_segments(input: &Path, extension: &str) -> Result<Vec<PathBuf>> {
        if input.is_file() {
            return Ok(vec![input.to_path_buf()]);
        }

        let mut segments = Vec::new();
        for entry in fs::read_dir(input)? {
            let path = entry?.path();
            let matches = path
                .extension()
                .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case(extension))
                .unwrap_or(false);
            if path.is_file() && matches {
                segments.push(path);
            }
        }
        segments.sort();

        if segments.is_empty() {
            return Err(DecodeError::NoSegments(input.display().to_string()));
        }

        debug!(input = %input.display(), count = segments.len(), "collected segments");
        Ok(segments)
    }

    /// Decode `inputs` in order and assemble them into `writer`.
    ///
    /// Every input's size is validated against the segment ceiling before a
    /// single output byte is written, so an oversized file anywhere in the
    /// list aborts with the stream untouched. `progress` is invoked after
    /// each segment with (done, total).
    pub fn assemble<W, F>(
        &mut self,
        inputs: &[PathBuf],
        writer: W,
        spec: WavSpec,
        mut progress: F,
    ) -> Result<AssembleReport>
    where
        W: Write + Seek,
        F: FnMut(usize, usize),
    {
        if inputs.is_empty() {
            return Err(DecodeError::NoSegments("<empty input list>".to_string()));
        }
        Self::preflight(inputs)?;

        let mut wav = WavWriter::new(writer, spec)?;
        let mut report = AssembleReport::default();

        for (index, path) in inputs.iter().enumerate() {
            let segment = Segment::from_file(path)?;
            let chunk = self.session.decode(&segment)?;

            wav.write_chunk(&chunk.data)?;
            report.segments += 1;
            report.data_bytes += chunk.byte_len() as u64;
            report.samples += u64::from(chunk.sample_count);

            progress(index + 1, inputs.len());
        }

        wav.finalize()?;
        info!(
            segments = report.segments,
            data_bytes = report.data_bytes,
            samples = report.samples,
            "assembled output stream"
        );
        Ok(report)
    }

    /// Like [`assemble`](Self::assemble), but creates the output file only
    /// after the preflight pass, so a doomed run leaves no file behind.
    pub fn assemble_to_path<F>(
        &mut self,
        inputs: &[PathBuf],
        output: &Path,
        spec: WavSpec,
        progress: F,
    ) -> Result<AssembleReport>
    where
        F: FnMut(usize, usize),
    {
        if inputs.is_empty() {
            return Err(DecodeError::NoSegments("<empty input list>".to_string()));
        }
        Self::preflight(inputs)?;

        let file = File::create(output)?;
        self.assemble(inputs, file, spec, progress)
    }

    /// Validate every input's on-disk size against the segment ceiling.
    fn preflight(inputs: &[PathBuf]) -> Result<()> {
        for path in inputs {
            let size = fs::metadata(path)?.len() as usize;
            if size >= SEGMENT_SIZE_LIMIT {
                return Err(DecodeError::SegmentTooLarge {
                    path: path.display().to_string(),
                    size,
                    limit: SEGMENT_SIZE_LIMIT,
                });
            }
        }
        Ok(())
    }
}
