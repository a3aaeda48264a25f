//! Symbol Invocation Abstraction
//!
//! Loading shared-library images and calling their exports by name.

use std::path::Path;

use crate::error::Result;

/// Opaque identifier of a loaded library image.
///
/// Scoped to the runtime that issued it, like [`Addr`](crate::memory::Addr).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LibraryHandle(u64);

impl LibraryHandle {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Loading library images and invoking exports with word-sized arguments.
///
/// There is no type introspection across this boundary: every argument and
/// every result travels as one machine word (`u64`). Integer arguments
/// narrower than a word occupy the low bits; addresses travel as their raw
/// value. The per-export signature is fixed by the caller's knowledge of the
/// library, exactly as with a C header. Exports declared `void` still return
/// a word; its value is meaningless and must be ignored.
pub trait SymbolInvoker {
    /// Load the library image at `path`.
    ///
    /// Implementations defer the image's own initializers where the target
    /// format allows it; callers invoke the library's explicit initialize
    /// export themselves as part of session construction.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::LibraryLoad`](crate::RuntimeError::LibraryLoad)
    /// when the image cannot be mapped (missing file, wrong format, wrong
    /// architecture).
    fn load_library(&mut self, path: &Path) -> Result<LibraryHandle>;

    /// Invoke `symbol` from `library` with `args`, returning the result word.
    ///
    /// # Errors
    ///
    /// - [`RuntimeError::SymbolMissing`](crate::RuntimeError::SymbolMissing)
    ///   when the export is absent (wrong library version or architecture).
    /// - [`RuntimeError::ExecutionFault`](crate::RuntimeError::ExecutionFault)
    ///   when emulated guest code traps mid-call.
    fn invoke(&mut self, library: LibraryHandle, symbol: &str, args: &[u64]) -> Result<u64>;
}
