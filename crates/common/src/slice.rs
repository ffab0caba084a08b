use crate::GuestPtr;
use crate::Len;
use crate::WasmSize;
use serde::Deserialize;
use serde::Serialize;

pub const WASM_SLICE_ITEMS: usize = 2;

/// WasmSlice is an offset/length pair pointing at a run of bytes inside guest linear memory
/// this is how strings cross the host/guest boundary in both directions
///
/// the offset always represents a position in wasm linear memory _never_ on the host
/// the length always represents u8 bytes _not_ items
///
/// a WasmSlice does not own anything, it is only meaningful against the memory it was taken from
/// nothing is ever freed by the bump allocator so a slice it handed out stays valid for as long
/// as the memory does
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct WasmSlice([WasmSize; WASM_SLICE_ITEMS]);

impl WasmSlice {
    pub fn new(ptr: GuestPtr, len: Len) -> Self {
        Self([ptr, len])
    }

    /// the guest hands us i32 values, these are reinterpreted as the u32 offsets they really are
    pub fn from_raw(ptr: i32, len: i32) -> Self {
        Self::new(ptr as GuestPtr, len as Len)
    }

    pub fn ptr(&self) -> GuestPtr {
        (self.0)[0]
    }

    pub fn len(&self) -> Len {
        (self.0)[1]
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// one past the last byte, in u64 so that it can never overflow
    pub fn end(&self) -> u64 {
        u64::from(self.ptr()) + u64::from(self.len())
    }

    /// true if every byte of the slice is below `memory_size`
    pub fn in_bounds(&self, memory_size: u64) -> bool {
        self.end() <= memory_size
    }

    /// true if the two slices share at least one byte
    pub fn overlaps(&self, other: &WasmSlice) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && u64::from(self.ptr()) < other.end()
            && u64::from(other.ptr()) < self.end()
    }

    /// the (ptr, len) pair as the two i32 results of a multi-value return
    pub fn into_raw(self) -> (i32, i32) {
        (self.ptr() as i32, self.len() as i32)
    }

    /// the pair packed into a single i64 result, pointer in the high half
    pub fn into_packed(self) -> i64 {
        crate::merge_u64(self.ptr(), self.len()) as i64
    }

    pub fn from_packed(packed: i64) -> Self {
        let (ptr, len) = crate::split_u64(packed as u64);
        Self::new(ptr, len)
    }
}

/// wraps a naked array in a WasmSlice newtype for type safety
impl From<[WasmSize; WASM_SLICE_ITEMS]> for WasmSlice {
    fn from(array: [WasmSize; WASM_SLICE_ITEMS]) -> Self {
        Self(array)
    }
}

impl From<(GuestPtr, Len)> for WasmSlice {
    fn from((ptr, len): (GuestPtr, Len)) -> Self {
        Self::new(ptr, len)
    }
}

impl std::fmt::Display for WasmSlice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}; {}]", self.ptr(), self.len())
    }
}
