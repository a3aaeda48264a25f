//! # Decoder Configuration

use serde::{Deserialize, Serialize};

use crate::segment::SEGMENT_SIZE_LIMIT;

/// Decoder session configuration.
///
/// Controls the codec parameters passed to the library's reset export and
/// the size of the reusable scratch buffers. The defaults mirror the
/// reference use: mono, 44.1 kHz, 128 kbps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecoderConfig {
    /// Audio channels the library decodes into (1 = mono).
    #[serde(default = "default_channel_count")]
    pub channel_count: u32,

    /// Sampling rate in Hz.
    #[serde(default = "default_sampling_rate")]
    pub sampling_rate: u32,

    /// Source bit rate in bits per second.
    #[serde(default = "default_bit_rate")]
    pub bit_rate: u32,

    /// Size of each scratch buffer (input and output) in bytes.
    ///
    /// Allocated once at session construction and reused for every segment,
    /// so it must hold the largest segment the format ceiling permits and
    /// the largest chunk one decode call can produce.
    #[serde(default = "default_scratch_buffer_bytes")]
    pub scratch_buffer_bytes: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            channel_count: default_channel_count(),
            sampling_rate: default_sampling_rate(),
            bit_rate: default_bit_rate(),
            scratch_buffer_bytes: default_scratch_buffer_bytes(),
        }
    }
}

impl DecoderConfig {
    /// Set the channel count.
    pub fn with_channel_count(mut self, channel_count: u32) -> Self {
        self.channel_count = channel_count;
        self
    }

    /// Set the sampling rate.
    pub fn with_sampling_rate(mut self, sampling_rate: u32) -> Self {
        self.sampling_rate = sampling_rate;
        self
    }

    /// Set the bit rate.
    pub fn with_bit_rate(mut self, bit_rate: u32) -> Self {
        self.bit_rate = bit_rate;
        self
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.channel_count == 0 {
            return Err("channel_count must be > 0".to_string());
        }

        if self.sampling_rate == 0 {
            return Err("sampling_rate must be > 0".to_string());
        }

        if self.bit_rate == 0 {
            return Err("bit_rate must be > 0".to_string());
        }

        if self.scratch_buffer_bytes < SEGMENT_SIZE_LIMIT {
            return Err(format!(
                "scratch_buffer_bytes must hold the largest permitted segment ({} bytes)",
                SEGMENT_SIZE_LIMIT
            ));
        }

        Ok(())
    }
}

// ============================================================================
// Default Functions (for serde)
// ============================================================================

fn default_channel_count() -> u32 {
    1
}

fn default_sampling_rate() -> u32 {
    44_100
}

fn default_bit_rate() -> u32 {
    128_000
}

fn default_scratch_buffer_bytes() -> usize {
    100_000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DecoderConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.channel_count, 1);
        assert_eq!(config.sampling_rate, 44_100);
        assert_eq!(config.bit_rate, 128_000);
        assert_eq!(config.scratch_buffer_bytes, 100_000);
    }

    #[test]
    fn test_builder() {
        let config = DecoderConfig::default()
            .with_channel_count(2)
            .with_sampling_rate(48_000)
            .with_bit_rate(256_000);

        assert!(config.validate().is_ok());
        assert_eq!(config.channel_count, 2);
        assert_eq!(config.sampling_rate, 48_000);
    }

    #[test]
    fn test_validation() {
        let mut config = DecoderConfig::default();
        assert!(config.validate().is_ok());

        config.channel_count = 0;
        assert!(config.validate().is_err());
        config.channel_count = 1;

        config.scratch_buffer_bytes = SEGMENT_SIZE_LIMIT - 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_serde_defaults() {
        let config: DecoderConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.channel_count, 1);
        assert_eq!(config.scratch_buffer_bytes, 100_000);
    }
}
