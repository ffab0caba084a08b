use crate::GuestPtr;
use crate::Len;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

/// Enum of all possible ERROR states that the host can hit while running a guest.
///
/// None of these are recoverable, every one of them ends the current run.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Error)]
#[rustfmt::skip]
pub enum WasmErrorInner {
    /// the guest gave us a ptr/len that reaches past the end of linear memory
    /// we never read or write any part of such a range
    #[error("out of bounds access: ptr {ptr} len {len} exceeds memory size {memory_size}")]
    BoundsViolation { ptr: GuestPtr, len: Len, memory_size: u64 },
    /// bytes the guest claims are utf-8 are not
    /// this is never repaired with replacement characters
    #[error("invalid utf-8 at ptr {ptr} len {len}")]
    Utf8 { ptr: GuestPtr, len: Len },
    /// linear memory could not grow to fit a new allocation
    /// either the configured maximum or the 4GB wasm32 address space is exhausted
    #[error("allocation of {requested} bytes at cursor {cursor} exhausted linear memory")]
    AllocationExhausted { requested: u64, cursor: GuestPtr },
    /// the module could not be instantiated against our memory and imports
    /// or does not export what we need
    #[error("instantiation failed: {0}")]
    Instantiation(String),
    /// the bytes handed to us are not a valid module
    #[error("module build failed: {0}")]
    ModuleBuild(String),
    /// something went wrong in wasmer while creating or touching linear memory
    #[error("memory error: {0}")]
    Memory(String),
    /// the log sink refused our write
    #[error("io error: {0}")]
    Io(String),
}

/// Wraps a WasmErrorInner with a file and line number.
/// The easiest way to generate this is with the `wasm_error!` macro that will
/// insert the correct file/line and can create strings by forwarding args to
/// the `format!` macro.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Error)]
#[error("{error} [{file}:{line}]")]
pub struct WasmError {
    pub file: String,
    pub line: u32,
    pub error: WasmErrorInner,
}

impl WasmError {
    pub fn inner(&self) -> &WasmErrorInner {
        &self.error
    }
}

impl From<std::io::Error> for WasmErrorInner {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

/// Helper macro for returning an error from a host function.
/// Records the file and line where it was called.
#[macro_export]
macro_rules! wasm_error {
    ($e:expr) => {
        $crate::WasmError {
            // On Windows the `file!()` macro returns a path with inconsistent formatting:
            // from the workspace to the package root it uses backwards-slashes,
            // then within the package it uses forwards-slashes.
            //
            // To remedy this we normalize the formatting here.
            file: file!().replace('\\', "/").to_string(),
            line: line!(),
            error: $e,
        }
    };
}
