// Tue Jan 15 2026 - Alex

//! C ABI surface. Every call copies its input in and hands back a freshly
//! allocated buffer that the caller releases with the matching free function.

use crate::symbol::demangle::demangle_bytes;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::{self, AssertUnwindSafe};
use std::ptr;
use std::slice;

/// Demangle a NUL-terminated symbol name.
///
/// Returns null only when `input` is null. Release the result with
/// `symbol_demangle_free`.
///
/// # Safety
/// `input` must be null or point to a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn symbol_demangle(input: *const c_char) -> *mut c_char {
    if input.is_null() {
        return ptr::null_mut();
    }

    let original = CStr::from_ptr(input).to_owned();

    let demangled = panic::catch_unwind(AssertUnwindSafe(|| {
        CString::new(demangle_bytes(original.to_bytes())).ok()
    }));

    match demangled {
        Ok(Some(out)) => out.into_raw(),
        _ => original.into_raw(),
    }
}

/// Demangle `len` bytes at `input`, which may contain NULs or invalid UTF-8.
///
/// The result length is written to `out_len`. Release the result with
/// `symbol_demangle_free_bytes`.
///
/// # Safety
/// `input` must point to `len` readable bytes (or be null with `len == 0`),
/// and `out_len` must be null or writable.
#[no_mangle]
pub unsafe extern "C" fn symbol_demangle_bytes(
    input: *const u8,
    len: usize,
    out_len: *mut usize,
) -> *mut u8 {
    let bytes: &[u8] = if input.is_null() || len == 0 {
        &[]
    } else {
        slice::from_raw_parts(input, len)
    };

    let out = panic::catch_unwind(AssertUnwindSafe(|| demangle_bytes(bytes)))
        .unwrap_or_else(|_| bytes.to_vec());

    let boxed = out.into_boxed_slice();
    if !out_len.is_null() {
        *out_len = boxed.len();
    }
    Box::into_raw(boxed) as *mut u8
}

/// # Safety
/// `ptr` must be null or a pointer returned by `symbol_demangle`.
#[no_mangle]
pub unsafe extern "C" fn symbol_demangle_free(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

/// # Safety
/// `ptr`/`len` must be exactly what `symbol_demangle_bytes` returned.
#[no_mangle]
pub unsafe extern "C" fn symbol_demangle_free_bytes(ptr: *mut u8, len: usize) {
    if !ptr.is_null() {
        drop(Box::from_raw(ptr::slice_from_raw_parts_mut(ptr, len)));
    }
}
