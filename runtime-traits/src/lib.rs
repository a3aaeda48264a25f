//! # Execution Runtime Traits
//!
//! Contracts for running closed-source decoder libraries, implemented once
//! per execution strategy.
//!
//! ## Overview
//!
//! The decode pipeline needs four things from the machine that runs the
//! decoder library: allocate memory, load a shared-library image, invoke an
//! export by name, and read/write raw bytes. This crate defines those
//! capabilities so that the pipeline stays agnostic of where the code
//! actually executes:
//!
//! - [`MemoryChannel`](memory::MemoryChannel) - Allocation and raw byte
//!   access within one address space
//! - [`SymbolInvoker`](symbol::SymbolInvoker) - Library loading and
//!   word-sized export invocation
//! - [`Runtime`](runtime::Runtime) - The combined capability set plus an
//!   architecture identifier for diagnostics
//! - [`CpuEmulator`](emulator::CpuEmulator) - The external CPU-emulator
//!   collaborator consumed by the emulated strategy
//!
//! ## Strategy Requirements
//!
//! Each execution strategy ships a concrete runtime implementing the full
//! capability set:
//!
//! | Strategy | Implementation Crate | Address Space |
//! |----------|---------------------|---------------|
//! | Native   | `runtime-native`    | Host process memory |
//! | Emulated | `runtime-emulated`  | Guest image inside a CPU emulator |
//!
//! ## Address Portability
//!
//! An [`Addr`](memory::Addr) or [`LibraryHandle`](symbol::LibraryHandle) is
//! only meaningful to the runtime instance that produced it. A native address
//! is a host pointer; an emulated address is a guest virtual address. Passing
//! one runtime's address to another is a contract violation and
//! implementations are expected to reject it rather than corrupt memory.
//!
//! ## Fail-Fast Strategy
//!
//! Sessions cannot run degraded: a library that fails to load, a missing
//! export, or a failed scratch allocation means the run cannot proceed.
//! Implementations surface these as [`RuntimeError`](error::RuntimeError)
//! immediately instead of deferring the failure to the first decode call.

pub mod emulator;
pub mod error;
pub mod memory;
pub mod runtime;
pub mod symbol;

pub use error::{Result, RuntimeError};

// Re-export commonly used types
pub use emulator::{CpuEmulator, EmulatorConfig, GuestArch};
pub use memory::{Addr, MemoryChannel};
pub use runtime::Runtime;
pub use symbol::{LibraryHandle, SymbolInvoker};
