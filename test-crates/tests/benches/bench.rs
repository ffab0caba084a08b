use criterion::BenchmarkId;
use criterion::Throughput;
use criterion::{criterion_group, criterion_main, Criterion};
use guestmem_host::prelude::*;
use rand::prelude::*;
use test::wasms::TestWat;

/// compile a module
pub fn wasm_module_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("wasm_module_compile");
    let runtime = Runtime::default();

    for wasm in [TestWat::Hello, TestWat::Strings, TestWat::Grow] {
        group.bench_function(BenchmarkId::new("wasm_module_compile", wasm.name()), |b| {
            b.iter(|| {
                runtime.module(wasm.bytes()).unwrap();
            })
        });
    }

    group.finish()
}

/// create an instance
pub fn wasm_instance(c: &mut Criterion) {
    let mut group = c.benchmark_group("wasm_instance");
    let runtime = Runtime::default();

    for wasm in [TestWat::Hello, TestWat::Strings, TestWat::Grow] {
        let module = wasm.module(&runtime);
        group.bench_function(BenchmarkId::new("wasm_instance", wasm.name()), |b| {
            b.iter(|| {
                runtime
                    .instantiate_with_log(&module, Box::new(LogBuffer::new()))
                    .unwrap();
            })
        });
    }

    group.finish()
}

/// bump allocate random sized buffers straight against linear memory
pub fn bump_allocate(c: &mut Criterion) {
    let mut group = c.benchmark_group("bump_allocate");
    let mut rng = thread_rng();

    for n in [1, 1_000, 100_000] {
        group.throughput(Throughput::Bytes(n as u64));
        group.bench_with_input(BenchmarkId::new("bump_allocate", n), &n, |b, &n| {
            let mut store = Store::default();
            let memory = Memory::new(&mut store, MemoryType::new(1u32, None, false)).unwrap();
            let mut allocator = BumpAllocator::default();
            b.iter(|| {
                // reuse the same 16MB rather than growing forever
                if allocator.cursor() > 1 << 24 {
                    allocator = BumpAllocator::default();
                }
                let len: Len = rng.gen_range(0..=n);
                allocator.allocate(&memory, &mut store, len).unwrap();
            });
        });
    }

    group.finish()
}

/// run a guest that calls the string imports end to end
pub fn wasm_call(c: &mut Criterion) {
    let mut group = c.benchmark_group("wasm_call");

    for wasm in [TestWat::Strings, TestWat::Grow] {
        group.bench_function(BenchmarkId::new("wasm_call", wasm.name()), |b| {
            b.iter_batched(
                || wasm.instance().0,
                |mut instance| instance.call_entry().unwrap(),
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish()
}

criterion_group!(
    benches,
    wasm_module_compile,
    wasm_instance,
    bump_allocate,
    wasm_call,
);

criterion_main!(benches);
