//! # Core Decode Pipeline
//!
//! Segment-to-WAV decoding over an execution runtime.
//!
//! ## Overview
//!
//! The decoder itself is a closed-source library; this crate owns everything
//! around it. A [`DecoderSession`] warms the library up once (initialize,
//! create, reset), keeps one codec handle and two reusable scratch buffers,
//! and performs one decode call per [`Segment`]. A [`StreamAssembler`] feeds
//! segments through the session in lexicographic order and appends each
//! [`DecodedChunk`] to a [`WavWriter`], which patches its 44-byte header once
//! the total payload size is known.
//!
//! Which machine actually runs the library is invisible here: the session
//! holds a `Box<dyn Runtime>` from `runtime-traits` and never branches on the
//! strategy behind it. Decoding the same segment through the native and the
//! emulated runtime yields byte-identical PCM.
//!
//! ## Usage
//!
//! ```ignore
//! use core_decode::{DecoderConfig, DecoderSession, StreamAssembler, WavSpec};
//! use runtime_native::NativeRuntime;
//! use std::path::Path;
//!
//! let config = DecoderConfig::default();
//! let spec = WavSpec::float32(config.channel_count as u16, config.sampling_rate);
//! let session = DecoderSession::new(
//!     Box::new(NativeRuntime::new()),
//!     Path::new("/opt/cri/libcri_ware_unity.so"),
//!     config,
//! )?;
//!
//! let inputs = StreamAssembler::collect_segments(Path::new("frames/"), "hca")?;
//! let mut assembler = StreamAssembler::new(session);
//! let report = assembler.assemble_to_path(&inputs, Path::new("out.wav"), spec, |_, _| {})?;
//! # Ok::<(), core_decode::DecodeError>(())
//! ```

pub mod assembler;
pub mod config;
pub mod error;
pub mod segment;
pub mod session;
pub mod wav;

#[cfg(test)]
pub(crate) mod testing;

pub use assembler::{AssembleReport, StreamAssembler};
pub use config::DecoderConfig;
pub use error::{DecodeError, Result};
pub use segment::{Segment, SEGMENT_SIZE_LIMIT};
pub use session::{DecodedChunk, DecoderSession};
pub use wav::{SampleFormat, WavSpec, WavWriter, HEADER_LEN};
