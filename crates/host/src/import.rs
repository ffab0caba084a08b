use crate::config::ReturnConvention;
use crate::env::Env;
use crate::error::WasmHostError;
use guestmem_common::WasmSlice;
use guestmem_common::ENV_NAMESPACE;
use guestmem_common::IMPORT_CONCAT;
use guestmem_common::IMPORT_LOG;
use guestmem_common::IMPORT_MEMORY;
use guestmem_common::IMPORT_TO_STR_F64;
use guestmem_common::IMPORT_TO_STR_I32;
use guestmem_common::STR_NAMESPACE;
use wasmer::imports;
use wasmer::AsStoreMut;
use wasmer::Function;
use wasmer::FunctionEnv;
use wasmer::FunctionEnvMut;
use wasmer::Imports;
use wasmer::RuntimeError;

/// Read a utf-8 string out of the guest and write it to the log sink, newline terminated.
pub fn __log(mut env: FunctionEnvMut<Env>, ptr: i32, len: i32) -> Result<(), RuntimeError> {
    let slice = WasmSlice::from_raw(ptr, len);
    tracing::trace!(%slice, "log");
    let (data, store) = env.data_and_store_mut();
    let text = data.read_string(&store, slice)?;
    data.write_log(&text)?;
    Ok(())
}

/// Base 10 rendering of an i32 into a fresh guest buffer.
pub fn to_str_i32(env: &mut FunctionEnvMut<Env>, value: i32) -> Result<WasmSlice, WasmHostError> {
    tracing::trace!(value, "to_str_i32");
    string_to_guest(env, &value.to_string())
}

/// Shortest round trip rendering of an f64 into a fresh guest buffer.
pub fn to_str_f64(env: &mut FunctionEnvMut<Env>, value: f64) -> Result<WasmSlice, WasmHostError> {
    tracing::trace!(value, "to_str_f64");
    string_to_guest(env, &value.to_string())
}

/// Copy `left` then `right` into a fresh guest buffer.
///
/// Both inputs are copied out to the host before anything is allocated so overlapping inputs
/// are fine and the output never aliases either of them.
pub fn concat(
    env: &mut FunctionEnvMut<Env>,
    left: WasmSlice,
    right: WasmSlice,
) -> Result<WasmSlice, WasmHostError> {
    tracing::trace!(%left, %right, "concat");
    let (data, mut store) = env.data_and_store_mut();
    let mut joined = data.read_bytes(&store, left)?;
    joined.extend_from_slice(&data.read_bytes(&store, right)?);
    data.move_bytes_to_guest(&mut store, &joined)
}

fn string_to_guest(env: &mut FunctionEnvMut<Env>, s: &str) -> Result<WasmSlice, WasmHostError> {
    let (data, mut store) = env.data_and_store_mut();
    data.move_bytes_to_guest(&mut store, s.as_bytes())
}

pub fn __to_str_i32(mut env: FunctionEnvMut<Env>, value: i32) -> Result<(i32, i32), RuntimeError> {
    Ok(to_str_i32(&mut env, value)?.into_raw())
}

pub fn __to_str_f64(mut env: FunctionEnvMut<Env>, value: f64) -> Result<(i32, i32), RuntimeError> {
    Ok(to_str_f64(&mut env, value)?.into_raw())
}

pub fn __concat(
    mut env: FunctionEnvMut<Env>,
    left_ptr: i32,
    left_len: i32,
    right_ptr: i32,
    right_len: i32,
) -> Result<(i32, i32), RuntimeError> {
    Ok(concat(
        &mut env,
        WasmSlice::from_raw(left_ptr, left_len),
        WasmSlice::from_raw(right_ptr, right_len),
    )?
    .into_raw())
}

pub fn __to_str_i32_packed(mut env: FunctionEnvMut<Env>, value: i32) -> Result<i64, RuntimeError> {
    Ok(to_str_i32(&mut env, value)?.into_packed())
}

pub fn __to_str_f64_packed(mut env: FunctionEnvMut<Env>, value: f64) -> Result<i64, RuntimeError> {
    Ok(to_str_f64(&mut env, value)?.into_packed())
}

pub fn __concat_packed(
    mut env: FunctionEnvMut<Env>,
    left_ptr: i32,
    left_len: i32,
    right_ptr: i32,
    right_len: i32,
) -> Result<i64, RuntimeError> {
    Ok(concat(
        &mut env,
        WasmSlice::from_raw(left_ptr, left_len),
        WasmSlice::from_raw(right_ptr, right_len),
    )?
    .into_packed())
}

/// The full import surface, bound to one instance's memory and env.
///
/// `env` carries the memory and `log`, `str` carries the string producing functions in the
/// shape `convention` asks for.
pub fn imports(
    store: &mut impl AsStoreMut,
    function_env: &FunctionEnv<Env>,
    convention: ReturnConvention,
) -> Imports {
    let memory = function_env.as_ref(&*store).memory.clone();
    let mut imports = imports! {
        ENV_NAMESPACE => {
            IMPORT_MEMORY => memory,
            IMPORT_LOG => Function::new_typed_with_env(store, function_env, __log),
        },
    };

    let (to_str_i32, to_str_f64, concat) = match convention {
        ReturnConvention::MultiValue => (
            Function::new_typed_with_env(store, function_env, __to_str_i32),
            Function::new_typed_with_env(store, function_env, __to_str_f64),
            Function::new_typed_with_env(store, function_env, __concat),
        ),
        ReturnConvention::Packed => (
            Function::new_typed_with_env(store, function_env, __to_str_i32_packed),
            Function::new_typed_with_env(store, function_env, __to_str_f64_packed),
            Function::new_typed_with_env(store, function_env, __concat_packed),
        ),
    };
    imports.define(STR_NAMESPACE, IMPORT_TO_STR_I32, to_str_i32);
    imports.define(STR_NAMESPACE, IMPORT_TO_STR_F64, to_str_f64);
    imports.define(STR_NAMESPACE, IMPORT_CONCAT, concat);
    imports
}
