#[cfg(not(feature = "wasmer_sys"))]
compile_error!("The `wasmer_sys` feature must be enabled, it provides the only supported engine.");

pub extern crate guestmem_common;

pub mod allocator;
pub mod config;
pub mod env;
pub mod error;
pub mod guest;
pub mod import;
pub mod instantiate;
pub mod module;
pub mod prelude;
