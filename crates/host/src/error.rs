use guestmem_common::WasmError;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

/// Host side newtype over a WasmError so that it can be converted into a wasmer RuntimeError.
/// The easiest way to build one is with the `wasm_host_error!` macro that records the file and
/// line of the failing host code.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Error)]
#[error(transparent)]
pub struct WasmHostError(pub WasmError);

impl From<WasmError> for WasmHostError {
    fn from(wasm_error: WasmError) -> WasmHostError {
        WasmHostError(wasm_error)
    }
}

/// The boxed user error is the bare WasmError so callers can `downcast::<WasmError>()` it back
/// out of whatever the guest call returned.
impl From<WasmHostError> for wasmer::RuntimeError {
    fn from(wasm_host_error: WasmHostError) -> wasmer::RuntimeError {
        tracing::error!(error = %wasm_host_error.0, "host error");
        wasmer::RuntimeError::user(Box::new(wasm_host_error.0))
    }
}

#[macro_export]
macro_rules! wasm_host_error {
    ($e:expr) => {
        $crate::error::WasmHostError($crate::guestmem_common::wasm_error!($e))
    };
}
