//! Emulator capability injection point.
//!
//! The emulated strategy consumes a CPU emulator through the
//! [`CpuEmulator`] contract. Engines are heavy, host-specific integrations
//! and none is linked into the reference binary; host applications that
//! embed one construct `runtime_emulated::EmulatedRuntime` through the
//! library API instead of going through this binary.

use anyhow::bail;
use runtime_traits::{CpuEmulator, EmulatorConfig};

/// Produce the engine backing `--runtime emulated`.
pub fn connect(_config: &EmulatorConfig) -> anyhow::Result<Box<dyn CpuEmulator>> {
    bail!(
        "no CPU emulator capability is linked into this build; embed an \
         engine and construct runtime_emulated::EmulatedRuntime through the \
         library API"
    )
}
