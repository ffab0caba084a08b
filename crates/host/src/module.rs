use crate::error::WasmHostError;
use crate::wasm_host_error;
use guestmem_common::WasmErrorInner;
use std::sync::Arc;
use wasmer::sys::CompilerConfig;
use wasmer::Engine;
use wasmer::Module;
use wasmer::Store;

/// Generate an engine with a wasm compiler.
///
/// NaNs are canonicalized so float results, including what `to_str_f64` renders, do not
/// depend on the host cpu.
pub(crate) fn make_engine() -> Engine {
    let mut compiler = wasmer::Cranelift::default();
    compiler.canonicalize_nans(true);
    Engine::from(compiler)
}

/// Responsible for storing the wasmer Engine used to build wasmer Modules.
///
/// Every Store that instantiates one of these modules must come from `store()` so that module
/// and store share the engine.
#[derive(Clone, Debug)]
pub struct ModuleBuilder {
    engine: Engine,
}

impl Default for ModuleBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleBuilder {
    pub fn new() -> Self {
        Self {
            engine: make_engine(),
        }
    }

    /// Compile a module from its binary, or from wat text.
    pub fn from_binary(&self, wasm: &[u8]) -> Result<Arc<Module>, WasmHostError> {
        let module = Module::new(&self.engine, wasm)
            .map_err(|e| wasm_host_error!(WasmErrorInner::ModuleBuild(e.to_string())))?;
        tracing::debug!(bytes = wasm.len(), "built module");
        Ok(Arc::new(module))
    }

    pub fn store(&self) -> Store {
        Store::new(self.engine.clone())
    }
}
