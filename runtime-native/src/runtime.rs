//! Host-backed implementation of the runtime contracts.

use std::ffi::c_void;
use std::path::Path;

use libloading::Library;
use runtime_traits::{
    Addr, LibraryHandle, MemoryChannel, Result, Runtime, RuntimeError, SymbolInvoker,
};
use tracing::debug;

/// Architecture identifier reported by [`NativeRuntime`].
pub const NATIVE_ARCH: &str = "native-ffi";

/// Executes library code directly in the host process.
///
/// Scratch allocations are boxed heap blocks owned by the runtime for its
/// whole lifetime, so the addresses handed to the library stay stable across
/// calls. Every read and write is checked against the blocks this instance
/// handed out: an address minted by another runtime (or never minted at all)
/// fails with [`RuntimeError::MemoryAccess`] instead of touching arbitrary
/// host memory. The loaded library itself writes through the raw pointers it
/// receives, which land inside those same tracked blocks.
pub struct NativeRuntime {
    libraries: Vec<Library>,
    allocations: Vec<Box<[u8]>>,
}

impl NativeRuntime {
    pub fn new() -> Self {
        Self {
            libraries: Vec::new(),
            allocations: Vec::new(),
        }
    }

    fn library(&self, handle: LibraryHandle) -> Result<&Library> {
        self.libraries
            .get(handle.raw() as usize)
            .ok_or(RuntimeError::InvalidHandle(handle.raw()))
    }

    /// Locate the tracked block containing `[addr, addr + len)`.
    fn tracked_range(&self, addr: Addr, len: usize) -> Result<(usize, usize)> {
        for (index, block) in self.allocations.iter().enumerate() {
            let base = block.as_ptr() as u64;
            let end = base + block.len() as u64;
            if addr.raw() >= base && addr.raw().saturating_add(len as u64) <= end {
                return Ok((index, (addr.raw() - base) as usize));
            }
        }
        Err(RuntimeError::MemoryAccess {
            addr: addr.raw(),
            len,
        })
    }
}

impl Default for NativeRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryChannel for NativeRuntime {
    fn allocate(&mut self, size: usize) -> Result<Addr> {
        if size == 0 {
            return Err(RuntimeError::AllocationFailed {
                size,
                reason: "zero-sized allocation".to_string(),
            });
        }

        let block = vec![0u8; size].into_boxed_slice();
        let addr = Addr::new(block.as_ptr() as u64);
        self.allocations.push(block);
        debug!(addr = addr.raw(), size, "allocated host scratch block");
        Ok(addr)
    }

    fn read(&self, addr: Addr, len: usize) -> Result<Vec<u8>> {
        let (index, offset) = self.tracked_range(addr, len)?;
        Ok(self.allocations[index][offset..offset + len].to_vec())
    }

    fn write(&mut self, addr: Addr, data: &[u8]) -> Result<()> {
        let (index, offset) = self.tracked_range(addr, data.len())?;
        self.allocations[index][offset..offset + data.len()].copy_from_slice(data);
        Ok(())
    }
}

impl SymbolInvoker for NativeRuntime {
    fn load_library(&mut self, path: &Path) -> Result<LibraryHandle> {
        let library = unsafe { Library::new(path) }.map_err(|e| RuntimeError::LibraryLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let handle = LibraryHandle::new(self.libraries.len() as u64);
        self.libraries.push(library);
        debug!(path = ?path, handle = handle.raw(), "loaded host library");
        Ok(handle)
    }

    fn invoke(&mut self, library: LibraryHandle, symbol: &str, args: &[u64]) -> Result<u64> {
        let library = self.library(library)?;
        let target = unsafe { library.get::<*const c_void>(symbol.as_bytes()) }
            .map_err(|_| RuntimeError::SymbolMissing(symbol.to_string()))?;

        debug!(symbol, argc = args.len(), "invoking host export");
        unsafe { dispatch(*target, args) }
    }
}

impl Runtime for NativeRuntime {
    fn arch(&self) -> &'static str {
        NATIVE_ARCH
    }
}

/// Call a C-ABI entry point with word-sized arguments.
///
/// The argument count fixes the signature; every export is invoked through a
/// variant returning one machine word, and for `void` exports that word is
/// garbage the caller must ignore. Integer arguments narrower than a word are
/// passed in the low bits, which the C ABI reads correctly on the supported
/// hosts.
unsafe fn dispatch(target: *const c_void, args: &[u64]) -> Result<u64> {
    use std::mem::transmute;

    let value = match *args {
        [] => transmute::<*const c_void, extern "C" fn() -> u64>(target)(),
        [a] => transmute::<*const c_void, extern "C" fn(u64) -> u64>(target)(a),
        [a, b] => transmute::<*const c_void, extern "C" fn(u64, u64) -> u64>(target)(a, b),
        [a, b, c] => {
            transmute::<*const c_void, extern "C" fn(u64, u64, u64) -> u64>(target)(a, b, c)
        }
        [a, b, c, d] => {
            transmute::<*const c_void, extern "C" fn(u64, u64, u64, u64) -> u64>(target)(a, b, c, d)
        }
        [a, b, c, d, e] => transmute::<*const c_void, extern "C" fn(u64, u64, u64, u64, u64) -> u64>(
            target,
        )(a, b, c, d, e),
        [a, b, c, d, e, f] => transmute::<
            *const c_void,
            extern "C" fn(u64, u64, u64, u64, u64, u64) -> u64,
        >(target)(a, b, c, d, e, f),
        [a, b, c, d, e, f, g] => transmute::<
            *const c_void,
            extern "C" fn(u64, u64, u64, u64, u64, u64, u64) -> u64,
        >(target)(a, b, c, d, e, f, g),
        [a, b, c, d, e, f, g, h] => transmute::<
            *const c_void,
            extern "C" fn(u64, u64, u64, u64, u64, u64, u64, u64) -> u64,
        >(target)(a, b, c, d, e, f, g, h),
        _ => return Err(RuntimeError::UnsupportedArity(args.len())),
    };

    Ok(value)
}
