//! # Decoder Session
//!
//! Owns one codec handle and the reusable scratch buffers, and drives one
//! decode call per segment through the chosen execution runtime.
//!
//! ## Lifecycle
//!
//! Construction runs the library's full warm-up sequence (load the image,
//! invoke the explicit initialize export, create a codec instance, reset it
//! with the session parameters) and then allocates the scratch buffers once. A
//! constructed session is Ready and stays Ready after every decode; there is
//! no close operation, and process exit releases everything.
//!
//! ## Buffer Reuse
//!
//! The input buffer, output buffer, and the two 4-byte out-parameter buffers
//! are allocated exactly once and reused verbatim across all segments. Each
//! decode call fully overwrites the live region of each buffer, which is
//! sound because a decode call is a complete segment-to-PCM transform: the
//! library keeps no cross-segment state outside the opaque handle.

use std::path::Path;

use bytes::Bytes;
use runtime_traits::{Addr, LibraryHandle, Runtime};
use tracing::{debug, info, warn};

use crate::config::DecoderConfig;
use crate::error::{DecodeError, Result};
use crate::segment::Segment;

// Exports of the decoder library. Signatures are fixed per export and
// identical across execution strategies.
pub const SYM_INITIALIZE: &str = "criHcaDecoderUnity_Initialize";
pub const SYM_CREATE: &str = "criHcaDecoderUnity_Create";
pub const SYM_RESET: &str = "criHcaDecoderUnity_Reset";
pub const SYM_DECODE: &str = "criHcaDecoderUnity_DecodeHcaToInterleavedPcm";

/// Interleaved 32-bit float PCM produced by one decode call.
#[derive(Debug, Clone)]
pub struct DecodedChunk {
    /// Raw little-endian f32 samples, `sample_count * 4` bytes.
    pub data: Bytes,

    /// Samples the library reported writing (channel count already folded
    /// in).
    pub sample_count: u32,

    /// Input bytes the library reported consuming. Diagnostic only; a value
    /// short of the submitted length is logged as possible truncation.
    pub processed_length: u32,
}

impl DecodedChunk {
    pub fn byte_len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// A ready decoder bound to one execution runtime.
pub struct DecoderSession {
    runtime: Box<dyn Runtime>,
    library: LibraryHandle,
    handle: u64,
    input_buffer: Addr,
    output_buffer: Addr,
    processed_len_out: Addr,
    sample_count_out: Addr,
    config: DecoderConfig,
}

impl DecoderSession {
    /// Construct a session over the chosen execution runtime.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::Config`] for invalid configuration
    /// - [`DecodeError::Runtime`] when the library fails to load, an export
    ///   is missing, or a scratch allocation fails
    /// - [`DecodeError::CreateFailed`] when the library hands back a null
    ///   codec handle
    pub fn new(
        mut runtime: Box<dyn Runtime>,
        library_path: &Path,
        config: DecoderConfig,
    ) -> Result<Self> {
        config.validate().map_err(DecodeError::Config)?;

        let library = runtime.load_library(library_path)?;
        runtime.invoke(library, SYM_INITIALIZE, &[])?;

        let handle = runtime.invoke(library, SYM_CREATE, &[u64::from(config.channel_count)])?;
        if handle == 0 {
            return Err(DecodeError::CreateFailed);
        }

        runtime.invoke(
            library,
            SYM_RESET,
            &[
                handle,
                u64::from(config.channel_count),
                u64::from(config.sampling_rate),
                u64::from(config.bit_rate),
            ],
        )?;

        let input_buffer = runtime.allocate(config.scratch_buffer_bytes)?;
        let output_buffer = runtime.allocate(config.scratch_buffer_bytes)?;
        let processed_len_out = runtime.allocate(4)?;
        let sample_count_out = runtime.allocate(4)?;

        info!(
            arch = runtime.arch(),
            channels = config.channel_count,
            sampling_rate = config.sampling_rate,
            bit_rate = config.bit_rate,
            "decoder session ready"
        );

        Ok(Self {
            runtime,
            library,
            handle,
            input_buffer,
            output_buffer,
            processed_len_out,
            sample_count_out,
            config,
        })
    }

    /// Architecture identifier of the underlying runtime.
    pub fn arch(&self) -> &'static str {
        self.runtime.arch()
    }

    /// Decode one segment into interleaved float PCM.
    ///
    /// The segment is written into the input buffer at offset zero,
    /// overwriting whatever the previous call left there, and the chunk is
    /// read back as exactly the byte length the library reports.
    pub fn decode(&mut self, segment: &Segment) -> Result<DecodedChunk> {
        self.runtime.write(self.input_buffer, segment.as_bytes())?;

        self.runtime.invoke(
            self.library,
            SYM_DECODE,
            &[
                self.handle,
                self.input_buffer.raw(),
                0,
                segment.len() as u64,
                self.output_buffer.raw(),
                self.processed_len_out.raw(),
                self.sample_count_out.raw(),
            ],
        )?;

        let processed_length = self.runtime.read_int(self.processed_len_out, 4)? as u32;
        let sample_count = self.runtime.read_int(self.sample_count_out, 4)? as u32;

        let needed = sample_count as usize * 4;
        if needed > self.config.scratch_buffer_bytes {
            return Err(DecodeError::OutputOverflow {
                needed,
                capacity: self.config.scratch_buffer_bytes,
            });
        }

        if processed_length as usize != segment.len() {
            // Possible silent truncation inside the library; observed and
            // reported, never fatal.
            warn!(
                source = segment.source(),
                submitted = segment.len(),
                processed = processed_length,
                "library consumed fewer bytes than submitted"
            );
        }

        let data = self.runtime.read(self.output_buffer, needed)?;
        debug!(
            source = segment.source(),
            samples = sample_count,
            bytes = needed,
            "decoded segment"
        );

        Ok(DecodedChunk {
            data: Bytes::from(data),
            sample_count,
            processed_length,
        })
    }
}
