//! Command-line argument surface.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::logging::LogFormat;

/// Streaming HCA decoder driving the CRIWARE Unity library.
///
/// Decodes one `.hca` segment file, or a directory of segments sorted
/// lexicographically by filename, appending the decoded float PCM to a
/// single WAV output.
#[derive(Debug, Parser)]
#[command(name = "hcadec", version, about)]
pub struct Cli {
    /// Path to an HCA segment, or a directory containing segments (*.hca).
    pub input: PathBuf,

    /// Output WAV file.
    pub output: PathBuf,

    /// Path to the decoder library.
    #[arg(long)]
    pub lib: PathBuf,

    /// Execution strategy for the decoder library.
    #[arg(long, value_enum, default_value_t = RuntimeKind::Native)]
    pub runtime: RuntimeKind,

    /// Virtual-filesystem root for the emulated runtime.
    #[arg(long)]
    pub vfs_root: Option<PathBuf>,

    /// Emulator engine configuration file (JSON), passed through untouched.
    #[arg(long)]
    pub emulator_config: Option<PathBuf>,

    /// Audio channels.
    #[arg(long, default_value_t = 1)]
    pub channels: u32,

    /// Sampling rate in Hz.
    #[arg(long, default_value_t = 44_100)]
    pub sample_rate: u32,

    /// Source bit rate in bits per second.
    #[arg(long, default_value_t = 128_000)]
    pub bit_rate: u32,

    /// Log output format.
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// Suppress the progress bar.
    #[arg(long)]
    pub quiet: bool,
}

/// Where the decoder library's machine code runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RuntimeKind {
    /// Directly in the host process (library must match the host ABI).
    Native,
    /// Inside an external CPU emulator (ARM64 Android build).
    Emulated,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_invocation() {
        let cli = Cli::parse_from([
            "hcadec",
            "frames/",
            "out.wav",
            "--lib",
            "/opt/cri/libcri_ware_unity.so",
        ]);

        assert_eq!(cli.runtime, RuntimeKind::Native);
        assert_eq!(cli.channels, 1);
        assert_eq!(cli.sample_rate, 44_100);
        assert_eq!(cli.bit_rate, 128_000);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_emulated_selection() {
        let cli = Cli::parse_from([
            "hcadec",
            "frame.hca",
            "out.wav",
            "--lib",
            "libcri_ware_unity.so",
            "--runtime",
            "emulated",
            "--vfs-root",
            "/data/vfs",
        ]);

        assert_eq!(cli.runtime, RuntimeKind::Emulated);
        assert_eq!(cli.vfs_root.as_deref(), Some(std::path::Path::new("/data/vfs")));
    }
}
