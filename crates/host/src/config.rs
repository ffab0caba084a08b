use guestmem_common::GuestPtr;
use guestmem_common::EXPORT_MAIN;
use serde::Deserialize;
use serde::Serialize;

/// How string producing imports hand their (ptr, len) result back to the guest.
///
/// This is part of the ABI, host and guest must agree on it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnConvention {
    /// two i32 results, ptr then len
    #[default]
    MultiValue,
    /// one i64 result, ptr in the high 32 bits and len in the low 32 bits
    Packed,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// pages of linear memory at instantiation
    pub initial_pages: u32,
    /// growth beyond this many pages is allocation exhaustion
    /// `None` leaves only the wasm32 limit
    pub max_pages: Option<u32>,
    /// initial allocation cursor for guests that export neither `heap_ptr` nor `__heap_base`
    /// with `None` such guests fail to instantiate
    pub heap_base: Option<GuestPtr>,
    /// name of the no-argument, no-result export to run
    pub entry_point: String,
    pub return_convention: ReturnConvention,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            initial_pages: 1,
            max_pages: None,
            heap_base: None,
            entry_point: EXPORT_MAIN.to_string(),
            return_convention: ReturnConvention::default(),
        }
    }
}
