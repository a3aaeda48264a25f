//! # WAV Container Writer
//!
//! Two-pass container framing: a fixed 44-byte header is written as a
//! placeholder first, the PCM payload is appended behind it, and the header
//! is rewritten once the total payload size is known. The size cannot be
//! precomputed because the decoder only reports sample counts per segment.

use std::io::{Seek, SeekFrom, Write};

use crate::error::{DecodeError, Result};

/// Fixed header length: RIFF descriptor + fmt chunk + data chunk header.
pub const HEADER_LEN: usize = 44;

/// WAV sample format tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFormat {
    /// Integer PCM (format tag 1).
    Pcm,
    /// 32-bit float PCM (format tag 3).
    IeeeFloat,
}

impl SampleFormat {
    fn tag(self) -> u16 {
        match self {
            SampleFormat::Pcm => 1,
            SampleFormat::IeeeFloat => 3,
        }
    }
}

/// Output stream parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavSpec {
    pub channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
    pub format: SampleFormat,
}

impl WavSpec {
    /// 32-bit float PCM with the given channel layout.
    pub fn float32(channels: u16, sample_rate: u32) -> Self {
        Self {
            channels,
            sample_rate,
            bits_per_sample: 32,
            format: SampleFormat::IeeeFloat,
        }
    }

    pub fn block_align(&self) -> u16 {
        self.channels * self.bits_per_sample / 8
    }

    pub fn byte_rate(&self) -> u32 {
        self.sample_rate * u32::from(self.block_align())
    }

    /// Render the 44-byte header for a payload of `data_size` bytes.
    fn header(&self, data_size: u32) -> [u8; HEADER_LEN] {
        let mut header = [0u8; HEADER_LEN];
        header[0..4].copy_from_slice(b"RIFF");
        header[4..8].copy_from_slice(&(data_size + 36).to_le_bytes());
        header[8..12].copy_from_slice(b"WAVE");
        header[12..16].copy_from_slice(b"fmt ");
        header[16..20].copy_from_slice(&16u32.to_le_bytes());
        header[20..22].copy_from_slice(&self.format.tag().to_le_bytes());
        header[22..24].copy_from_slice(&self.channels.to_le_bytes());
        header[24..28].copy_from_slice(&self.sample_rate.to_le_bytes());
        header[28..32].copy_from_slice(&self.byte_rate().to_le_bytes());
        header[32..34].copy_from_slice(&self.block_align().to_le_bytes());
        header[34..36].copy_from_slice(&self.bits_per_sample.to_le_bytes());
        header[36..40].copy_from_slice(b"data");
        header[40..44].copy_from_slice(&data_size.to_le_bytes());
        header
    }
}

/// Append-only WAV writer with deferred header finalization.
pub struct WavWriter<W: Write + Seek> {
    inner: W,
    spec: WavSpec,
    data_bytes: u64,
}

impl<W: Write + Seek> WavWriter<W> {
    /// Write the placeholder header and position the stream for payload.
    pub fn new(mut inner: W, spec: WavSpec) -> Result<Self> {
        inner.write_all(&spec.header(0))?;
        Ok(Self {
            inner,
            spec,
            data_bytes: 0,
        })
    }

    /// Append one chunk of raw PCM bytes.
    pub fn write_chunk(&mut self, pcm: &[u8]) -> Result<()> {
        self.inner.write_all(pcm)?;
        self.data_bytes += pcm.len() as u64;
        Ok(())
    }

    /// Payload bytes written so far.
    pub fn data_bytes(&self) -> u64 {
        self.data_bytes
    }

    /// Seek back and patch the header with the final payload size.
    ///
    /// Consumes the writer and returns the underlying stream.
    pub fn finalize(mut self) -> Result<W> {
        let data_size = u32::try_from(self.data_bytes)
            .ok()
            .filter(|size| *size <= u32::MAX - 36)
            .ok_or_else(|| {
                DecodeError::Config(format!(
                    "payload of {} bytes does not fit a WAV container",
                    self.data_bytes
                ))
            })?;

        self.inner.seek(SeekFrom::Start(0))?;
        self.inner.write_all(&self.spec.header(data_size))?;
        self.inner.flush()?;
        Ok(self.inner)
    }
}
