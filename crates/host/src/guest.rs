use crate::error::WasmHostError;
use crate::wasm_host_error;
use guestmem_common::GuestPtr;
use guestmem_common::Len;
use guestmem_common::WasmErrorInner;
use guestmem_common::WasmSlice;
use wasmer::AsStoreRef;
use wasmer::Memory;

/// Current size of linear memory in bytes.
pub fn memory_size(memory: &Memory, store: &impl AsStoreRef) -> u64 {
    memory.view(store).data_size()
}

/// read a slice of bytes from the guest in a safe-ish way
///
/// a naive approach would take the host pointer to the start of guest memory, add the guest's
/// offset and copy straight out. a malicious or buggy guest can hand us any ptr/len it likes so
/// that would let it point the host at whatever sits after linear memory.
///
/// instead the whole range is checked against the current memory size first and the copy goes
/// through wasmer's MemoryView, which checks again.
pub fn read_bytes(
    memory: &Memory,
    store: &impl AsStoreRef,
    slice: WasmSlice,
) -> Result<Vec<u8>, WasmHostError> {
    let view = memory.view(store);
    let memory_size = view.data_size();
    if !slice.in_bounds(memory_size) {
        return Err(wasm_host_error!(WasmErrorInner::BoundsViolation {
            ptr: slice.ptr(),
            len: slice.len(),
            memory_size,
        }));
    }
    let mut bytes = vec![0; slice.len() as usize];
    view.read(u64::from(slice.ptr()), &mut bytes)
        .map_err(|e| wasm_host_error!(WasmErrorInner::Memory(e.to_string())))?;
    Ok(bytes)
}

/// read a slice and decode it as utf-8
/// invalid utf-8 is an error, it is never papered over with replacement characters
pub fn read_string(
    memory: &Memory,
    store: &impl AsStoreRef,
    slice: WasmSlice,
) -> Result<String, WasmHostError> {
    String::from_utf8(read_bytes(memory, store, slice)?).map_err(|_| {
        wasm_host_error!(WasmErrorInner::Utf8 {
            ptr: slice.ptr(),
            len: slice.len(),
        })
    })
}

/// Length of a host buffer as a guest `Len`.
/// Anything over u32 can never be placed in wasm32 memory so it is allocation exhaustion,
/// reported with the real length.
pub fn guest_len(len: usize, cursor: GuestPtr) -> Result<Len, WasmHostError> {
    len.try_into().map_err(|_| {
        wasm_host_error!(WasmErrorInner::AllocationExhausted {
            requested: len as u64,
            cursor,
        })
    })
}

/// write a slice of bytes to the guest in a safe-ish way
///
/// same bounds rules as `read_bytes`, the guest pointer is expected to come from the bump
/// allocator which has already grown memory to cover it, anything else is a bounds violation.
pub fn write_bytes(
    memory: &Memory,
    store: &impl AsStoreRef,
    guest_ptr: GuestPtr,
    bytes: &[u8],
) -> Result<(), WasmHostError> {
    let len = guest_len(bytes.len(), guest_ptr)?;
    let view = memory.view(store);
    let memory_size = view.data_size();
    if !WasmSlice::new(guest_ptr, len).in_bounds(memory_size) {
        return Err(wasm_host_error!(WasmErrorInner::BoundsViolation {
            ptr: guest_ptr,
            len,
            memory_size,
        }));
    }
    view.write(u64::from(guest_ptr), bytes)
        .map_err(|e| wasm_host_error!(WasmErrorInner::Memory(e.to_string())))
}
