//! Test support: a scripted execution runtime standing in for a working
//! codec library.

use runtime_traits::{
    Addr, LibraryHandle, MemoryChannel, Result as RtResult, Runtime, RuntimeError, SymbolInvoker,
};

use crate::session::{SYM_CREATE, SYM_DECODE, SYM_INITIALIZE, SYM_RESET};

/// In-memory runtime whose fake codec turns each input byte into one f32
/// sample scaled into [0, 1]. Deterministic, so two sessions over two
/// instances produce identical output for identical input.
pub(crate) struct ScriptedRuntime {
    blocks: Vec<(u64, Vec<u8>)>,
    next_base: u64,
    /// Input bytes the fake library claims to leave unconsumed.
    pub unconsumed: u32,
    /// Forced sample count overriding the scripted transform.
    pub forced_sample_count: Option<u32>,
}

impl ScriptedRuntime {
    pub fn new() -> Self {
        Self {
            blocks: Vec::new(),
            next_base: 0x1000_0000,
            unconsumed: 0,
            forced_sample_count: None,
        }
    }

    fn block(&self, addr: Addr, len: usize) -> RtResult<&[u8]> {
        for (base, block) in &self.blocks {
            let offset = addr.raw().wrapping_sub(*base) as usize;
            if addr.raw() >= *base && offset + len <= block.len() {
                return Ok(&block[offset..offset + len]);
            }
        }
        Err(RuntimeError::MemoryAccess {
            addr: addr.raw(),
            len,
        })
    }

    fn block_mut(&mut self, addr: Addr, len: usize) -> RtResult<&mut [u8]> {
        for (base, block) in &mut self.blocks {
            let offset = addr.raw().wrapping_sub(*base) as usize;
            if addr.raw() >= *base && offset + len <= block.len() {
                return Ok(&mut block[offset..offset + len]);
            }
        }
        Err(RuntimeError::MemoryAccess {
            addr: addr.raw(),
            len,
        })
    }
}

/// The transform the fake codec applies. The integration suite's guest
/// double applies the same one, so the two strategies compare byte for byte.
pub(crate) fn scripted_pcm(payload: &[u8]) -> Vec<u8> {
    let mut pcm = Vec::with_capacity(payload.len() * 4);
    for byte in payload {
        pcm.extend_from_slice(&(f32::from(*byte) / 255.0).to_le_bytes());
    }
    pcm
}

impl MemoryChannel for ScriptedRuntime {
    fn allocate(&mut self, size: usize) -> RtResult<Addr> {
        let base = self.next_base;
        self.next_base += size as u64 + 64;
        self.blocks.push((base, vec![0u8; size]));
        Ok(Addr::new(base))
    }

    fn read(&self, addr: Addr, len: usize) -> RtResult<Vec<u8>> {
        self.block(addr, len).map(<[u8]>::to_vec)
    }

    fn write(&mut self, addr: Addr, data: &[u8]) -> RtResult<()> {
        self.block_mut(addr, data.len())?.copy_from_slice(data);
        Ok(())
    }
}

impl SymbolInvoker for ScriptedRuntime {
    fn load_library(&mut self, _path: &std::path::Path) -> RtResult<LibraryHandle> {
        Ok(LibraryHandle::new(0))
    }

    fn invoke(&mut self, _library: LibraryHandle, symbol: &str, args: &[u64]) -> RtResult<u64> {
        match symbol {
            SYM_INITIALIZE | SYM_RESET => Ok(0),
            SYM_CREATE => Ok(0xC0DE),
            SYM_DECODE => {
                let input = Addr::new(args[1] + args[2]);
                let length = args[3] as usize;
                let payload = self.read(input, length)?;

                let sample_count = self.forced_sample_count.unwrap_or(payload.len() as u32);
                let pcm = scripted_pcm(&payload);
                let processed = (length as u32).saturating_sub(self.unconsumed);

                self.write(Addr::new(args[4]), &pcm)?;
                self.write(Addr::new(args[5]), &processed.to_le_bytes())?;
                self.write(Addr::new(args[6]), &sample_count.to_le_bytes())?;
                Ok(0)
            }
            other => Err(RuntimeError::SymbolMissing(other.to_string())),
        }
    }
}

impl Runtime for ScriptedRuntime {
    fn arch(&self) -> &'static str {
        "scripted-test"
    }
}
