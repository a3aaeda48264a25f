//! # Native Execution Runtime
//!
//! Runs the decoder library's machine code directly on the host CPU.
//!
//! This is the strategy of choice when the host architecture and ABI match
//! the library build. Images are loaded with the host dynamic loader via
//! `libloading`, exports are called through C-ABI function pointers, and
//! scratch memory lives on the host heap, owned and range-checked by the
//! runtime.

mod runtime;

pub use runtime::{NativeRuntime, NATIVE_ARCH};
