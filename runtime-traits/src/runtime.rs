//! Combined Runtime Capability
//!
//! One cohesive capability set per execution strategy.

use crate::memory::MemoryChannel;
use crate::symbol::SymbolInvoker;

/// The full capability set a decode session needs from its execution
/// strategy.
///
/// A runtime is selected once at startup (a configuration choice, not a
/// runtime detection) and consumed through `Box<dyn Runtime>` so that the
/// pipeline above never branches on the concrete strategy. All addresses and
/// handles it hands out are valid only for calls issued through the same
/// instance.
pub trait Runtime: MemoryChannel + SymbolInvoker {
    /// Identifier of the execution strategy, reported at startup for
    /// diagnostics (e.g. `"native-ffi"`, `"emulated-android-aarch64"`).
    fn arch(&self) -> &'static str;
}
