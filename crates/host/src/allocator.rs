use crate::error::WasmHostError;
use crate::wasm_host_error;
use guestmem_common::align_up;
use guestmem_common::pages_for;
use guestmem_common::GuestPtr;
use guestmem_common::Len;
use guestmem_common::WasmErrorInner;
use guestmem_common::ALLOCATION_ALIGNMENT;
use wasmer::AsStoreMut;
use wasmer::Memory;
use wasmer::Pages;

/// Host owned bump allocator over guest linear memory.
///
/// The cursor only ever moves forward. Nothing is freed, nothing is reused, so every pointer
/// handed out stays valid for as long as the memory lives. One allocator exists per guest
/// instance and is dropped with it.
///
/// An allocator can start unseeded when the end of the guest's static data is not known yet.
/// It refuses to allocate until `seed` tells it where the heap begins.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BumpAllocator {
    /// next free byte, not yet aligned
    cursor: GuestPtr,
    /// number of successful allocations
    allocated: u64,
    seeded: bool,
}

impl Default for BumpAllocator {
    fn default() -> Self {
        Self::new(0)
    }
}

impl BumpAllocator {
    /// `heap_base` must be past any static data the guest placed in memory.
    pub fn new(heap_base: GuestPtr) -> Self {
        Self {
            cursor: heap_base,
            allocated: 0,
            seeded: true,
        }
    }

    pub fn unseeded() -> Self {
        Self {
            cursor: 0,
            allocated: 0,
            seeded: false,
        }
    }

    pub fn is_seeded(&self) -> bool {
        self.seeded
    }

    /// Move the cursor up to `heap_base`.
    ///
    /// A seeded cursor never moves back, anything already handed out below it stays live.
    pub fn seed(&mut self, heap_base: GuestPtr) {
        self.cursor = if self.seeded {
            self.cursor.max(heap_base)
        } else {
            heap_base
        };
        self.seeded = true;
    }

    pub fn cursor(&self) -> GuestPtr {
        self.cursor
    }

    pub fn allocated(&self) -> u64 {
        self.allocated
    }

    /// Carve `len` bytes out of linear memory, growing it if needed.
    ///
    /// The returned pointer is aligned to `ALLOCATION_ALIGNMENT` and memory covers
    /// `ptr + len` by the time this returns, so the caller can write straight away.
    /// On failure the cursor does not move.
    pub fn allocate(
        &mut self,
        memory: &Memory,
        store: &mut impl AsStoreMut,
        len: Len,
    ) -> Result<GuestPtr, WasmHostError> {
        let exhausted = |cursor| {
            wasm_host_error!(WasmErrorInner::AllocationExhausted {
                requested: u64::from(len),
                cursor,
            })
        };

        if !self.seeded {
            return Err(wasm_host_error!(WasmErrorInner::Instantiation(format!(
                "allocation of {} bytes before the heap base is known",
                len
            ))));
        }

        let ptr =
            align_up(self.cursor, ALLOCATION_ALIGNMENT).ok_or_else(|| exhausted(self.cursor))?;
        let end = ptr.checked_add(len).ok_or_else(|| exhausted(self.cursor))?;

        grow_to(memory, store, u64::from(end)).map_err(|e| {
            tracing::warn!(error = %e, len, cursor = self.cursor, "linear memory refused to grow");
            exhausted(self.cursor)
        })?;

        self.cursor = end;
        self.allocated += 1;
        tracing::trace!(ptr, len, cursor = self.cursor, "allocate");
        Ok(ptr)
    }
}

/// Grow memory to the smallest whole number of pages covering `end` bytes.
/// Memory never shrinks so this does nothing if it is already big enough.
fn grow_to(
    memory: &Memory,
    store: &mut impl AsStoreMut,
    end: u64,
) -> Result<(), wasmer::MemoryError> {
    let current = memory.view(&*store).size();
    let needed = pages_for(end);
    if needed > u64::from(current.0) {
        // needed is at most pages_for(u32::MAX + 1) = 65536 so this always fits
        let delta = Pages((needed - u64::from(current.0)) as u32);
        memory.grow(store, delta)?;
        tracing::debug!(from = current.0, to = needed, "grew linear memory");
    }
    Ok(())
}
