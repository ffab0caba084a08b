pub mod result;
pub mod slice;

pub use result::*;
pub use slice::*;

/// something like usize for wasm
/// wasm32 has a memory limit of 4GB so offsets and lengths fit in u32
///
/// the host reads and writes guest memory directly so both sides need a predictable number of
/// bytes to represent offsets and lengths, independent of the host's `usize`
pub type WasmSize = u32;

pub type Len = WasmSize;
pub type GuestPtr = WasmSize;

/// Fixed wasm page size. Linear memory only ever grows in whole pages.
pub const WASM_PAGE_SIZE: u64 = 65_536;

/// Hard ceiling on wasm32 pages, i.e. the full 4GB address space.
pub const WASM_MAX_PAGES: u32 = 65_536;

/// Every host allocation starts on this boundary.
pub const ALLOCATION_ALIGNMENT: WasmSize = 16;

/// Import namespace for the memory and `log`.
pub const ENV_NAMESPACE: &str = "env";
/// Import namespace for the string producing functions.
pub const STR_NAMESPACE: &str = "str";

pub const IMPORT_MEMORY: &str = "memory";
pub const IMPORT_LOG: &str = "log";
pub const IMPORT_TO_STR_I32: &str = "to_str_i32";
pub const IMPORT_TO_STR_F64: &str = "to_str_f64";
pub const IMPORT_CONCAT: &str = "concat";

/// Guest export holding the first byte past its static data.
pub const EXPORT_HEAP_PTR: &str = "heap_ptr";
/// The same thing as emitted by wasm-ld, used when `heap_ptr` is absent.
pub const EXPORT_LINKER_HEAP_BASE: &str = "__heap_base";
/// Default guest entry point.
pub const EXPORT_MAIN: &str = "main";

/// Round `x` up to the next multiple of `align`.
/// `align` must be a power of two. Returns `None` if the result does not fit in a `WasmSize`.
#[inline]
pub fn align_up(x: WasmSize, align: WasmSize) -> Option<WasmSize> {
    debug_assert!(align.is_power_of_two());
    x.checked_add(align - 1).map(|v| v & !(align - 1))
}

/// Smallest number of whole pages covering `end` bytes.
#[inline]
pub fn pages_for(end: u64) -> u64 {
    end.div_ceil(WASM_PAGE_SIZE)
}

/// Pack a pointer and length into a single u64 for single-value return conventions.
/// The pointer is the high half.
#[inline]
pub fn merge_u64(ptr: GuestPtr, len: Len) -> u64 {
    (u64::from(ptr) << 32) | u64::from(len)
}

/// Inverse of `merge_u64`.
#[inline]
pub fn split_u64(merged: u64) -> (GuestPtr, Len) {
    ((merged >> 32) as GuestPtr, merged as Len)
}
