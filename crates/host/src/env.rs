use crate::allocator::BumpAllocator;
use crate::error::WasmHostError;
use crate::guest;
use crate::wasm_host_error;
use guestmem_common::WasmSlice;
use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;
use wasmer::AsStoreMut;
use wasmer::AsStoreRef;
use wasmer::Memory;

/// Per instance state every host import is bound to.
///
/// Lives inside the wasmer Store for exactly as long as the instance does.
pub struct Env {
    pub memory: Memory,
    pub allocator: BumpAllocator,
    /// where `log` writes, stdout unless the embedder says otherwise
    pub log_sink: Box<dyn Write + Send>,
}

impl Env {
    pub fn new(memory: Memory, allocator: BumpAllocator, log_sink: Box<dyn Write + Send>) -> Self {
        Self {
            memory,
            allocator,
            log_sink,
        }
    }

    pub fn read_bytes(
        &self,
        store: &impl AsStoreRef,
        slice: WasmSlice,
    ) -> Result<Vec<u8>, WasmHostError> {
        guest::read_bytes(&self.memory, store, slice)
    }

    pub fn read_string(
        &self,
        store: &impl AsStoreRef,
        slice: WasmSlice,
    ) -> Result<String, WasmHostError> {
        guest::read_string(&self.memory, store, slice)
    }

    /// Allocate a fresh buffer in the guest, copy `bytes` into it and return where it is.
    pub fn move_bytes_to_guest(
        &mut self,
        store: &mut impl AsStoreMut,
        bytes: &[u8],
    ) -> Result<WasmSlice, WasmHostError> {
        let len = guest::guest_len(bytes.len(), self.allocator.cursor())?;
        let guest_ptr = self.allocator.allocate(&self.memory, store, len)?;
        guest::write_bytes(&self.memory, &*store, guest_ptr, bytes)?;
        Ok(WasmSlice::new(guest_ptr, len))
    }

    /// Write one line of guest output.
    pub fn write_log(&mut self, text: &str) -> Result<(), WasmHostError> {
        writeln!(self.log_sink, "{}", text)
            .and_then(|_| self.log_sink.flush())
            .map_err(|e| wasm_host_error!(e.into()))
    }
}

/// Cloneable in-memory log sink.
///
/// Hand one clone to the runtime and keep another to see what the guest logged.
#[derive(Clone, Debug, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Vec<u8> {
        self.0.lock().clone()
    }

    /// Everything logged so far. Only the host writes here and it only writes valid utf-8.
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }
}

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
