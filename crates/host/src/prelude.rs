pub use crate::allocator::BumpAllocator;
pub use crate::config::ReturnConvention;
pub use crate::config::RuntimeConfig;
pub use crate::env::Env;
pub use crate::env::LogBuffer;
pub use crate::error::WasmHostError;
pub use crate::guest;
pub use crate::instantiate::run_wasm_bytes;
pub use crate::instantiate::GuestInstance;
pub use crate::instantiate::Runtime;
pub use crate::module::ModuleBuilder;
pub use crate::wasm_host_error;
pub use guestmem_common::*;
pub use wasmer::*;
// wasmer has its own items under these names, the explicit imports win over both globs
pub use guestmem_common::WasmError;
pub use guestmem_common::WasmErrorInner;
pub use guestmem_common::WasmSlice;
pub use guestmem_common::WASM_MAX_PAGES;
pub use guestmem_common::WASM_PAGE_SIZE;
