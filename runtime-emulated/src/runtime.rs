//! Emulator-backed implementation of the runtime contracts.

use std::path::Path;

use runtime_traits::{
    Addr, CpuEmulator, EmulatorConfig, LibraryHandle, MemoryChannel, Result, Runtime,
    RuntimeError, SymbolInvoker,
};
use tracing::debug;

/// Architecture identifier reported by [`EmulatedRuntime`].
pub const EMULATED_ARCH: &str = "emulated-android-aarch64";

/// Guest C++ runtime image, relative to the VFS root. The target library's
/// symbol resolution depends on its runtime-support symbols, so it must be
/// mapped before any target library.
pub const SUPPORT_IMAGE: &str = "system/lib64/libc++.so";

/// Itanium-mangled `operator new(size_t)`: the guest allocator entry point,
/// resolved from the support image.
pub const GUEST_ALLOC_SYMBOL: &str = "_Znwm";

/// Executes library code inside an external CPU emulator.
///
/// All four runtime capabilities forward through the engine's contract:
/// library loads map guest images (with deferred initializers), invocations
/// marshal word-sized arguments into guest registers, and memory access
/// translates to guest-memory reads and writes. Addresses handed out are
/// guest virtual addresses with no meaning on the host.
pub struct EmulatedRuntime {
    emulator: Box<dyn CpuEmulator>,
    support_image: LibraryHandle,
}

impl EmulatedRuntime {
    /// Construct over an engine instance.
    ///
    /// Maps the guest C++ support image below the configured VFS root before
    /// anything else. The handle is retained for the runtime's lifetime; it
    /// keeps the image mapped and serves as the resolution home of the guest
    /// allocator.
    pub fn new(mut emulator: Box<dyn CpuEmulator>, config: &EmulatorConfig) -> Result<Self> {
        let support_path = config.vfs_root.join(SUPPORT_IMAGE);
        let support_image = emulator.load_library(&support_path, true)?;
        debug!(path = ?support_path, "mapped guest support image");

        Ok(Self {
            emulator,
            support_image,
        })
    }
}

impl MemoryChannel for EmulatedRuntime {
    fn allocate(&mut self, size: usize) -> Result<Addr> {
        let raw = self
            .emulator
            .call_symbol(self.support_image, GUEST_ALLOC_SYMBOL, &[size as u64])?;

        if raw == 0 {
            return Err(RuntimeError::AllocationFailed {
                size,
                reason: "guest allocator returned null".to_string(),
            });
        }

        debug!(addr = raw, size, "allocated guest scratch block");
        Ok(Addr::new(raw))
    }

    fn read(&self, addr: Addr, len: usize) -> Result<Vec<u8>> {
        self.emulator.read_memory(addr, len)
    }

    fn write(&mut self, addr: Addr, data: &[u8]) -> Result<()> {
        self.emulator.write_memory(addr, data)
    }
}

impl SymbolInvoker for EmulatedRuntime {
    fn load_library(&mut self, path: &Path) -> Result<LibraryHandle> {
        // Deferred init: the image's constructors are not run here. The
        // decoder's explicit initialize export is invoked by the session.
        let handle = self.emulator.load_library(path, true)?;
        debug!(path = ?path, handle = handle.raw(), "mapped guest library");
        Ok(handle)
    }

    fn invoke(&mut self, library: LibraryHandle, symbol: &str, args: &[u64]) -> Result<u64> {
        debug!(symbol, argc = args.len(), "invoking guest export");
        self.emulator.call_symbol(library, symbol, args)
    }
}

impl Runtime for EmulatedRuntime {
    fn arch(&self) -> &'static str {
        EMULATED_ARCH
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::mock;
    use std::collections::HashMap;

    mock! {
        pub Engine {}

        impl CpuEmulator for Engine {
            fn load_library(&mut self, path: &Path, defer_init: bool) -> Result<LibraryHandle>;
            fn call_symbol(&mut self, library: LibraryHandle, symbol: &str, args: &[u64]) -> Result<u64>;
            fn read_memory(&self, addr: Addr, len: usize) -> Result<Vec<u8>>;
            fn write_memory(&mut self, addr: Addr, data: &[u8]) -> Result<()>;
        }
    }

    /// Stateful engine double: a flat guest memory image plus a bump
    /// allocator behind `_Znwm`.
    struct FakeEngine {
        memory: HashMap<u64, u8>,
        next_alloc: u64,
        next_handle: u64,
        exhausted: bool,
    }

    impl FakeEngine {
        fn new() -> Self {
            Self {
                memory: HashMap::new(),
                next_alloc: 0x7000_0000,
                next_handle: 0,
                exhausted: false,
            }
        }
    }

    impl CpuEmulator for FakeEngine {
        fn load_library(&mut self, _path: &Path, _defer_init: bool) -> Result<LibraryHandle> {
            let handle = LibraryHandle::new(self.next_handle);
            self.next_handle += 1;
            Ok(handle)
        }

        fn call_symbol(
            &mut self,
            _library: LibraryHandle,
            symbol: &str,
            args: &[u64],
        ) -> Result<u64> {
            assert_eq!(symbol, GUEST_ALLOC_SYMBOL);
            if self.exhausted {
                return Ok(0);
            }
            let addr = self.next_alloc;
            self.next_alloc += args[0];
            Ok(addr)
        }

        fn read_memory(&self, addr: Addr, len: usize) -> Result<Vec<u8>> {
            Ok((0..len)
                .map(|i| *self.memory.get(&(addr.raw() + i as u64)).unwrap_or(&0))
                .collect())
        }

        fn write_memory(&mut self, addr: Addr, data: &[u8]) -> Result<()> {
            for (i, byte) in data.iter().enumerate() {
                self.memory.insert(addr.raw() + i as u64, *byte);
            }
            Ok(())
        }
    }

    fn vfs_config() -> EmulatorConfig {
        EmulatorConfig::new("/data/vfs")
    }

    #[test]
    fn test_load_order_and_defer_flags() {
        let mut engine = MockEngine::new();
        let mut sequence = mockall::Sequence::new();

        engine
            .expect_load_library()
            .withf(|path, defer| {
                path == Path::new("/data/vfs/system/lib64/libc++.so") && *defer
            })
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|_, _| Ok(LibraryHandle::new(0)));
        engine
            .expect_load_library()
            .withf(|path, defer| path.ends_with("libcri_ware_unity.so") && *defer)
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|_, _| Ok(LibraryHandle::new(1)));

        let mut runtime = EmulatedRuntime::new(Box::new(engine), &vfs_config()).unwrap();
        runtime
            .load_library(Path::new("/data/lib/libcri_ware_unity.so"))
            .unwrap();
    }

    #[test]
    fn test_allocation_goes_through_guest_allocator() {
        let engine = FakeEngine::new();
        let mut runtime = EmulatedRuntime::new(Box::new(engine), &vfs_config()).unwrap();

        let first = runtime.allocate(100_000).unwrap();
        let second = runtime.allocate(4).unwrap();

        assert_eq!(first.raw(), 0x7000_0000);
        assert_eq!(second.raw(), 0x7000_0000 + 100_000);
    }

    #[test]
    fn test_null_guest_allocation_is_fatal() {
        let mut engine = FakeEngine::new();
        engine.exhausted = true;
        let mut runtime = EmulatedRuntime::new(Box::new(engine), &vfs_config()).unwrap();

        assert!(matches!(
            runtime.allocate(64),
            Err(RuntimeError::AllocationFailed { .. })
        ));
    }

    #[test]
    fn test_memory_round_trips_through_guest_image() {
        let engine = FakeEngine::new();
        let mut runtime = EmulatedRuntime::new(Box::new(engine), &vfs_config()).unwrap();

        let addr = runtime.allocate(8).unwrap();
        runtime.write(addr, &44_100u32.to_le_bytes()).unwrap();

        assert_eq!(runtime.read_int(addr, 4).unwrap(), 44_100);
    }

    #[test]
    fn test_arch_identifier() {
        let runtime = EmulatedRuntime::new(Box::new(FakeEngine::new()), &vfs_config()).unwrap();
        assert_eq!(runtime.arch(), EMULATED_ARCH);
    }
}
