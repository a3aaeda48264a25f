//! Streaming HCA decoder CLI.

mod cli;
mod emulator;
mod logging;

use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use core_decode::{DecoderConfig, DecoderSession, StreamAssembler, WavSpec};
use indicatif::{ProgressBar, ProgressStyle};
use runtime_emulated::EmulatedRuntime;
use runtime_native::NativeRuntime;
use runtime_traits::{EmulatorConfig, Runtime};
use tracing::info;

use crate::cli::{Cli, RuntimeKind};

const SEGMENT_EXTENSION: &str = "hca";

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    logging::init(args.log_format)?;

    let config = DecoderConfig::default()
        .with_channel_count(args.channels)
        .with_sampling_rate(args.sample_rate)
        .with_bit_rate(args.bit_rate);
    let spec = WavSpec::float32(
        u16::try_from(args.channels).context("channel count out of range")?,
        args.sample_rate,
    );

    let runtime = build_runtime(&args)?;
    info!(arch = runtime.arch(), "selected execution runtime");

    let session = DecoderSession::new(runtime, &args.lib, config).with_context(|| {
        format!(
            "failed to start a decoder session over {}",
            args.lib.display()
        )
    })?;

    let inputs = StreamAssembler::collect_segments(&args.input, SEGMENT_EXTENSION)?;
    info!(count = inputs.len(), input = %args.input.display(), "collected segments");

    let bar = segment_bar(inputs.len() as u64, args.quiet);
    let started = Instant::now();

    let mut assembler = StreamAssembler::new(session);
    let report = assembler.assemble_to_path(&inputs, &args.output, spec, |done, _| {
        bar.set_position(done as u64);
    })?;

    bar.finish_and_clear();
    info!(
        segments = report.segments,
        samples = report.samples,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "all segments decoded"
    );
    println!("written to {}", args.output.display());
    println!("all done. going home.");
    Ok(())
}

fn build_runtime(args: &Cli) -> anyhow::Result<Box<dyn Runtime>> {
    match args.runtime {
        RuntimeKind::Native => Ok(Box::new(NativeRuntime::new())),
        RuntimeKind::Emulated => {
            let vfs_root = args
                .vfs_root
                .clone()
                .context("--vfs-root is required for the emulated runtime")?;

            let mut config = EmulatorConfig::new(vfs_root);
            if let Some(path) = &args.emulator_config {
                config = config.with_config_path(path);
            }
            config.validate()?;

            let engine = emulator::connect(&config)?;
            Ok(Box::new(EmulatedRuntime::new(engine, &config)?))
        }
    }
}

fn segment_bar(total: u64, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{pos:>5}/{len:5} {bar:40.green} {per_sec:>14}")
            .unwrap()
            .progress_chars("=> "),
    );
    bar
}
