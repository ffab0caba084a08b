use guestmem_host::prelude::*;
use std::sync::Arc;

/// Guest fixtures, written as wat so they build without a wasm toolchain.
#[derive(Clone, Copy, Debug)]
pub enum TestWat {
    Hello,
    Strings,
    Packed,
    Grow,
    NoHeapPtr,
    OutOfBounds,
    BadUtf8,
    Trap,
    MissingImport,
    WrongSignature,
    NegativeHeapPtr,
    LinkerHeapBase,
    StartAlloc,
}

impl TestWat {
    pub fn bytes(&self) -> &'static [u8] {
        match self {
            TestWat::Hello => include_bytes!("../wat/hello.wat"),
            TestWat::Strings => include_bytes!("../wat/strings.wat"),
            TestWat::Packed => include_bytes!("../wat/packed.wat"),
            TestWat::Grow => include_bytes!("../wat/grow.wat"),
            TestWat::NoHeapPtr => include_bytes!("../wat/no_heap_ptr.wat"),
            TestWat::OutOfBounds => include_bytes!("../wat/out_of_bounds.wat"),
            TestWat::BadUtf8 => include_bytes!("../wat/bad_utf8.wat"),
            TestWat::Trap => include_bytes!("../wat/trap.wat"),
            TestWat::MissingImport => include_bytes!("../wat/missing_import.wat"),
            TestWat::WrongSignature => include_bytes!("../wat/wrong_signature.wat"),
            TestWat::NegativeHeapPtr => include_bytes!("../wat/negative_heap_ptr.wat"),
            TestWat::LinkerHeapBase => include_bytes!("../wat/linker_heap_base.wat"),
            TestWat::StartAlloc => include_bytes!("../wat/start_alloc.wat"),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            TestWat::Hello => "hello",
            TestWat::Strings => "strings",
            TestWat::Packed => "packed",
            TestWat::Grow => "grow",
            TestWat::NoHeapPtr => "no_heap_ptr",
            TestWat::OutOfBounds => "out_of_bounds",
            TestWat::BadUtf8 => "bad_utf8",
            TestWat::Trap => "trap",
            TestWat::MissingImport => "missing_import",
            TestWat::WrongSignature => "wrong_signature",
            TestWat::NegativeHeapPtr => "negative_heap_ptr",
            TestWat::LinkerHeapBase => "linker_heap_base",
            TestWat::StartAlloc => "start_alloc",
        }
    }

    pub fn module(&self, runtime: &Runtime) -> Arc<Module> {
        runtime.module(self.bytes()).unwrap()
    }

    /// Instance with default config, logging into the returned buffer.
    pub fn instance(&self) -> (GuestInstance, LogBuffer) {
        self.instance_with_config(RuntimeConfig::default())
    }

    pub fn instance_with_config(&self, config: RuntimeConfig) -> (GuestInstance, LogBuffer) {
        let runtime = Runtime::new(config);
        let module = self.module(&runtime);
        let log = LogBuffer::new();
        let instance = runtime
            .instantiate_with_log(&module, Box::new(log.clone()))
            .unwrap();
        (instance, log)
    }

    /// Instantiation result without unwrapping, for fixtures that are meant to fail.
    pub fn try_instance(&self) -> Result<GuestInstance, WasmHostError> {
        self.try_instance_with_config(RuntimeConfig::default())
    }

    pub fn try_instance_with_config(
        &self,
        config: RuntimeConfig,
    ) -> Result<GuestInstance, WasmHostError> {
        let runtime = Runtime::new(config);
        let module = self.module(&runtime);
        runtime.instantiate_with_log(&module, Box::new(LogBuffer::new()))
    }
}

/// Read an exported i32 global the fixtures use to hand results back.
pub fn global_i32(instance: &mut GuestInstance, name: &str) -> i32 {
    match instance
        .instance
        .exports
        .get_global(name)
        .unwrap()
        .get(&mut instance.store)
    {
        Value::I32(v) => v,
        other => panic!("global {} is not an i32: {:?}", name, other),
    }
}
