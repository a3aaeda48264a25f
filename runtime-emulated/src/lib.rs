//! # Emulated Execution Runtime
//!
//! Runs the decoder library inside an external CPU emulator.
//!
//! This is the fallback strategy when no library build exists for the host,
//! in practice when only the ARM64 Android build is available. The runtime
//! owns a [`CpuEmulator`](runtime_traits::CpuEmulator) engine supplied by the
//! host application and forwards every capability through the engine's
//! four-operation contract. Guest scratch memory is allocated with the
//! guest's own `operator new`, never with host memory, because the library
//! expects blocks it can release with guest-side deallocation.

mod runtime;

pub use runtime::{EmulatedRuntime, EMULATED_ARCH, GUEST_ALLOC_SYMBOL, SUPPORT_IMAGE};
