//! Logging initialization.
//!
//! Structured logs flow through `tracing`; this module wires the subscriber
//! once at startup. `RUST_LOG` overrides the default filter, which keeps the
//! workspace crates at `info` and everything else at `warn`.

use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format for interactive use.
    Pretty,
    /// Single-line format for capture.
    Compact,
}

/// Initialize the tracing subscriber. Call once at startup.
pub fn init(format: LogFormat) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(
            "warn,hcadec=info,core_decode=info,runtime_native=info,runtime_emulated=info",
        )
    });

    let result = match format {
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init(),
        LogFormat::Compact => tracing_subscriber::fmt()
            .compact()
            .with_env_filter(filter)
            .with_target(true)
            .try_init(),
    };

    result.map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))
}
