use crate::allocator::BumpAllocator;
use crate::config::RuntimeConfig;
use crate::env::Env;
use crate::error::WasmHostError;
use crate::guest;
use crate::import::imports;
use crate::module::ModuleBuilder;
use crate::wasm_host_error;
use guestmem_common::GuestPtr;
use guestmem_common::WasmErrorInner;
use guestmem_common::WasmSlice;
use guestmem_common::EXPORT_HEAP_PTR;
use guestmem_common::EXPORT_LINKER_HEAP_BASE;
use std::io::Write;
use std::sync::Arc;
use wasmer::FunctionEnv;
use wasmer::Instance;
use wasmer::Memory;
use wasmer::MemoryType;
use wasmer::Module;
use wasmer::RuntimeError;
use wasmer::Store;
use wasmer::TypedFunction;
use wasmer::Value;

/// Builds modules and instantiates them against fresh linear memory and the host imports.
#[derive(Clone, Debug, Default)]
pub struct Runtime {
    builder: ModuleBuilder,
    config: RuntimeConfig,
}

impl Runtime {
    pub fn new(config: RuntimeConfig) -> Self {
        Self {
            builder: ModuleBuilder::new(),
            config,
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn module(&self, wasm: &[u8]) -> Result<Arc<Module>, WasmHostError> {
        self.builder.from_binary(wasm)
    }

    /// Instantiate with `log` writing to stdout.
    pub fn instantiate(&self, module: &Module) -> Result<GuestInstance, WasmHostError> {
        self.instantiate_with_log(module, Box::new(std::io::stdout()))
    }

    /// Instantiate with `log` writing to `log_sink`.
    ///
    /// Memory is created here, not by the guest, and handed over as `env.memory`.
    ///
    /// The allocator starts past the guest's static data. That offset comes from the guest's
    /// `heap_ptr` export, then wasm-ld's `__heap_base`, then the configured `heap_base`. A guest
    /// with none of these is refused, the host has no way to know where its data ends.
    ///
    /// A wasm start function runs inside `Instance::new`, before the exports can be read. Host
    /// allocations it makes start at the configured `heap_base` and fail if there is none.
    /// Seeding afterwards only ever moves the cursor forward.
    pub fn instantiate_with_log(
        &self,
        module: &Module,
        log_sink: Box<dyn Write + Send>,
    ) -> Result<GuestInstance, WasmHostError> {
        let mut store = self.builder.store();
        let memory = Memory::new(
            &mut store,
            MemoryType::new(self.config.initial_pages, self.config.max_pages, false),
        )
        .map_err(|e| wasm_host_error!(WasmErrorInner::Memory(e.to_string())))?;

        let allocator = match self.config.heap_base {
            Some(heap_base) => BumpAllocator::new(heap_base),
            None => BumpAllocator::unseeded(),
        };
        let function_env =
            FunctionEnv::new(&mut store, Env::new(memory.clone(), allocator, log_sink));
        let built_imports = imports(&mut store, &function_env, self.config.return_convention);
        let instance = Instance::new(&mut store, module, &built_imports)
            .map_err(|e| wasm_host_error!(WasmErrorInner::Instantiation(e.to_string())))?;

        let heap_base = match exported_offset(&instance, &mut store, EXPORT_HEAP_PTR)? {
            Some(heap_ptr) => heap_ptr,
            None => match exported_offset(&instance, &mut store, EXPORT_LINKER_HEAP_BASE)? {
                Some(linker_heap_base) => linker_heap_base,
                None => self.config.heap_base.ok_or_else(|| {
                    wasm_host_error!(WasmErrorInner::Instantiation(format!(
                        "guest exports neither `{}` nor `{}` and no heap base is configured",
                        EXPORT_HEAP_PTR, EXPORT_LINKER_HEAP_BASE
                    )))
                })?,
            },
        };
        let allocator = &mut function_env.as_mut(&mut store).allocator;
        allocator.seed(heap_base);
        tracing::debug!(
            heap_base,
            cursor = allocator.cursor(),
            pages = self.config.initial_pages,
            "instantiated guest"
        );

        Ok(GuestInstance {
            store,
            instance,
            memory,
            function_env,
            entry_point: self.config.entry_point.clone(),
        })
    }
}

/// Read an i32 global export holding a memory offset.
/// Absent is `None`, anything other than a non-negative i32 is an instantiation error.
fn exported_offset(
    instance: &Instance,
    store: &mut Store,
    name: &str,
) -> Result<Option<GuestPtr>, WasmHostError> {
    let global = match instance.exports.get_global(name) {
        Ok(global) => global,
        Err(_) => return Ok(None),
    };
    match global.get(store) {
        Value::I32(offset) if offset >= 0 => Ok(Some(offset as GuestPtr)),
        other => Err(wasm_host_error!(WasmErrorInner::Instantiation(format!(
            "export `{}` must be a non-negative i32, found {:?}",
            name, other
        )))),
    }
}

/// One live guest: its store, instance and the env its imports are bound to.
///
/// Dropping it drops linear memory and the allocator together.
pub struct GuestInstance {
    pub store: Store,
    pub instance: Instance,
    memory: Memory,
    function_env: FunctionEnv<Env>,
    entry_point: String,
}

impl GuestInstance {
    /// Call the no-argument, no-result entry point.
    ///
    /// A trap in the guest, or a failing host import under it, comes back exactly as wasmer
    /// reported it. Nothing in memory is cleaned up afterwards.
    pub fn call_entry(&mut self) -> Result<(), RuntimeError> {
        let entry: TypedFunction<(), ()> = self
            .instance
            .exports
            .get_typed_function(&self.store, &self.entry_point)
            .map_err(|e| {
                wasm_host_error!(WasmErrorInner::Instantiation(format!(
                    "entry point `{}`: {}",
                    self.entry_point, e
                )))
            })?;
        tracing::debug!(entry_point = %self.entry_point, "calling guest");
        entry.call(&mut self.store)
    }

    pub fn memory_size(&self) -> u64 {
        guest::memory_size(&self.memory, &self.store)
    }

    pub fn cursor(&self) -> GuestPtr {
        self.function_env.as_ref(&self.store).allocator.cursor()
    }

    pub fn allocations(&self) -> u64 {
        self.function_env.as_ref(&self.store).allocator.allocated()
    }

    pub fn read_bytes(&self, slice: WasmSlice) -> Result<Vec<u8>, WasmHostError> {
        guest::read_bytes(&self.memory, &self.store, slice)
    }

    pub fn read_string(&self, slice: WasmSlice) -> Result<String, WasmHostError> {
        guest::read_string(&self.memory, &self.store, slice)
    }
}

/// Build, instantiate and run a guest in one go, logging to stdout.
pub fn run_wasm_bytes(wasm: &[u8], config: RuntimeConfig) -> Result<(), RuntimeError> {
    let runtime = Runtime::new(config);
    let module = runtime.module(wasm)?;
    runtime.instantiate(&module)?.call_entry()
}
