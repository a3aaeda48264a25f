//! Memory Channel Abstraction
//!
//! Raw byte access to one runtime's address space.

use std::fmt;

use crate::error::{Result, RuntimeError};

/// Address within one runtime's address space.
///
/// For the native strategy this is a real host pointer; for the emulated
/// strategy it is a guest virtual address. Either way it is only meaningful
/// to the runtime instance that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Addr(u64);

impl Addr {
    /// The null address. Guest allocators signal exhaustion by returning it.
    pub const NULL: Addr = Addr(0);

    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }

    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl fmt::LowerHex for Addr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

/// Allocation and raw byte access within a runtime's address space.
///
/// # Example
///
/// ```ignore
/// use runtime_traits::memory::MemoryChannel;
///
/// fn stage_input(channel: &mut dyn MemoryChannel, payload: &[u8]) -> runtime_traits::Result<()> {
///     let buffer = channel.allocate(payload.len())?;
///     channel.write(buffer, payload)
/// }
/// ```
pub trait MemoryChannel {
    /// Allocate `size` bytes and return their address.
    ///
    /// The native strategy allocates on the host heap. The emulated strategy
    /// must allocate through the guest's own allocator, because guest code
    /// expects memory it can release with guest-side deallocation.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::AllocationFailed`] when the host or guest is
    /// out of memory; the session cannot proceed without its scratch buffers.
    fn allocate(&mut self, size: usize) -> Result<Addr>;

    /// Read `len` bytes starting at `addr`.
    fn read(&self, addr: Addr, len: usize) -> Result<Vec<u8>>;

    /// Write `data` starting at `addr`.
    fn write(&mut self, addr: Addr, data: &[u8]) -> Result<()>;

    /// Read a little-endian unsigned integer of `len` bytes (at most eight).
    fn read_int(&self, addr: Addr, len: usize) -> Result<u64> {
        if len == 0 || len > 8 {
            return Err(RuntimeError::MemoryAccess {
                addr: addr.raw(),
                len,
            });
        }

        let bytes = self.read(addr, len)?;
        let mut value = 0u64;
        for (index, byte) in bytes.iter().enumerate() {
            value |= u64::from(*byte) << (8 * index);
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal channel over one fixed block, for exercising trait defaults.
    struct BlockChannel {
        block: Vec<u8>,
    }

    impl MemoryChannel for BlockChannel {
        fn allocate(&mut self, _size: usize) -> Result<Addr> {
            Ok(Addr::new(0))
        }

        fn read(&self, addr: Addr, len: usize) -> Result<Vec<u8>> {
            let start = addr.raw() as usize;
            self.block
                .get(start..start + len)
                .map(<[u8]>::to_vec)
                .ok_or(RuntimeError::MemoryAccess {
                    addr: addr.raw(),
                    len,
                })
        }

        fn write(&mut self, addr: Addr, data: &[u8]) -> Result<()> {
            let start = addr.raw() as usize;
            self.block[start..start + data.len()].copy_from_slice(data);
            Ok(())
        }
    }

    #[test]
    fn test_read_int_little_endian() {
        let channel = BlockChannel {
            block: vec![0x44, 0xAC, 0x00, 0x00, 0xFF],
        };

        assert_eq!(channel.read_int(Addr::new(0), 4).unwrap(), 44_100);
        assert_eq!(channel.read_int(Addr::new(4), 1).unwrap(), 0xFF);
    }

    #[test]
    fn test_read_int_rejects_bad_width() {
        let channel = BlockChannel {
            block: vec![0; 16],
        };

        assert!(matches!(
            channel.read_int(Addr::new(0), 0),
            Err(RuntimeError::MemoryAccess { .. })
        ));
        assert!(matches!(
            channel.read_int(Addr::new(0), 9),
            Err(RuntimeError::MemoryAccess { .. })
        ));
    }

    #[test]
    fn test_addr_null() {
        assert!(Addr::NULL.is_null());
        assert!(!Addr::new(0x7000_0000).is_null());
        assert_eq!(format!("{:#x}", Addr::new(0xCAFE)), "0xcafe");
    }
}
