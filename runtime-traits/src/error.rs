use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by an execution runtime or its collaborators.
///
/// None of these are recoverable from the decode pipeline's perspective: a
/// failed load, a missing export, or a faulted guest leaves no trustworthy
/// state to resume from, so callers propagate and terminate.
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("Failed to load library {path:?}: {reason}")]
    LibraryLoad { path: PathBuf, reason: String },

    #[error("Symbol not found in loaded image: {0}")]
    SymbolMissing(String),

    #[error("Unknown library handle: {0}")]
    InvalidHandle(u64),

    #[error("Allocation of {size} bytes failed: {reason}")]
    AllocationFailed { size: usize, reason: String },

    #[error("Memory access outside runtime-owned range: address {addr:#x}, length {len}")]
    MemoryAccess { addr: u64, len: usize },

    #[error("Unsupported call shape: {0} arguments")]
    UnsupportedArity(usize),

    #[error("Guest execution fault: {0}")]
    ExecutionFault(String),

    #[error("Runtime capability not available: {0}")]
    NotAvailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
