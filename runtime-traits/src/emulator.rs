//! CPU Emulator Collaborator Contract
//!
//! The emulated execution strategy does not implement CPU emulation itself.
//! Instruction decoding, dynamic linking and relocation, syscall emulation,
//! and the virtual filesystem all live inside an external engine consumed
//! through the narrow contract defined here. Host applications construct an
//! engine, hand it over as `Box<dyn CpuEmulator>`, and the emulated runtime
//! forwards every operation through these four calls.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, RuntimeError};
use crate::memory::Addr;
use crate::symbol::LibraryHandle;

/// Guest CPU architecture the emulator is configured for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GuestArch {
    /// 64-bit ARM (the Android build of the decoder library).
    #[default]
    Arm64,
}

/// Construction descriptor for a CPU emulator instance.
///
/// Mirrors what engines need at startup: a virtual-filesystem root that the
/// guest sees as `/`, an optional engine-specific configuration file, and the
/// guest architecture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmulatorConfig {
    /// Directory exposed to the guest as the filesystem root. The guest C++
    /// support image is expected below it.
    pub vfs_root: PathBuf,

    /// Engine-specific configuration file, passed through untouched.
    #[serde(default)]
    pub config_path: Option<PathBuf>,

    /// Guest architecture.
    #[serde(default)]
    pub arch: GuestArch,
}

impl EmulatorConfig {
    pub fn new(vfs_root: impl Into<PathBuf>) -> Self {
        Self {
            vfs_root: vfs_root.into(),
            config_path: None,
            arch: GuestArch::default(),
        }
    }

    /// Set the engine-specific configuration file.
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Load a descriptor from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        serde_json::from_str(&raw).map_err(|e| RuntimeError::NotAvailable(format!(
            "invalid emulator descriptor {path:?}: {e}"
        )))
    }

    /// Validate the descriptor.
    pub fn validate(&self) -> Result<()> {
        if !self.vfs_root.is_dir() {
            return Err(RuntimeError::NotAvailable(format!(
                "emulator VFS root {:?} is not a directory",
                self.vfs_root
            )));
        }
        Ok(())
    }
}

/// The four-operation contract through which the emulated runtime consumes a
/// CPU emulator.
///
/// The engine's internal correctness is out of scope here; the emulated
/// runtime treats it as an opaque machine with loadable images and a flat
/// guest address space. Engines map failures into
/// [`RuntimeError::ExecutionFault`] (guest traps) and
/// [`RuntimeError::LibraryLoad`] (unmappable images).
pub trait CpuEmulator {
    /// Map a guest image into the emulated address space.
    ///
    /// With `defer_init` the image's own initializers are NOT run; the
    /// caller invokes the library's explicit initialize export itself. This
    /// two-phase load is required by the decoder library, whose constructors
    /// misbehave under emulation.
    fn load_library(&mut self, path: &Path, defer_init: bool) -> Result<LibraryHandle>;

    /// Marshal `args` into guest registers/stack per the target ABI, run the
    /// named export to completion, and return the guest return register.
    fn call_symbol(&mut self, library: LibraryHandle, symbol: &str, args: &[u64]) -> Result<u64>;

    /// Read `len` bytes of guest memory.
    fn read_memory(&self, addr: Addr, len: usize) -> Result<Vec<u8>>;

    /// Write `data` into guest memory.
    fn write_memory(&mut self, addr: Addr, data: &[u8]) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = EmulatorConfig::new("/tmp/vfs");
        assert_eq!(config.arch, GuestArch::Arm64);
        assert!(config.config_path.is_none());
    }

    #[test]
    fn test_config_builder() {
        let config = EmulatorConfig::new("/tmp/vfs").with_config_path("/tmp/emu.json");
        assert_eq!(config.config_path, Some(PathBuf::from("/tmp/emu.json")));
    }

    #[test]
    fn test_config_json_round_trip() {
        let config = EmulatorConfig::new("/data/vfs").with_config_path("/data/cfg.json");
        let raw = serde_json::to_string(&config).unwrap();
        let parsed: EmulatorConfig = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.vfs_root, PathBuf::from("/data/vfs"));
        assert_eq!(parsed.arch, GuestArch::Arm64);
    }

    #[test]
    fn test_validate_rejects_missing_root() {
        let config = EmulatorConfig::new("/definitely/not/a/real/path");
        assert!(matches!(
            config.validate(),
            Err(RuntimeError::NotAvailable(_))
        ));
    }
}
