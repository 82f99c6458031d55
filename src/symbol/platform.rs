// Tue Jan 13 2026 - Alex

//! The C++ runtime's own `__cxa_demangle`, looked up once per process.

use libc::{c_char, c_int, c_void, size_t};
use once_cell::sync::Lazy;
use std::ffi::{CStr, CString};
use std::ptr;

type CxaDemangleFn =
    unsafe extern "C" fn(*const c_char, *mut c_char, *mut size_t, *mut c_int) -> *mut c_char;

/// Longest input handed to the runtime. It sizes its scratch arrays on the C
/// stack by input length and recurses without a caller-settable bound.
pub const MAX_RUNTIME_INPUT: usize = 1024;

#[cfg(target_vendor = "apple")]
const RUNTIME_LIBRARIES: &[&str] = &["/usr/lib/libc++abi.dylib", "/usr/lib/libc++.1.dylib"];

#[cfg(not(target_vendor = "apple"))]
const RUNTIME_LIBRARIES: &[&str] = &["libstdc++.so.6", "libc++abi.so.1", "libc++.so.1"];

static CXA_DEMANGLE: Lazy<Option<CxaDemangleFn>> = Lazy::new(resolve);

#[cfg(unix)]
fn resolve() -> Option<CxaDemangleFn> {
    let symbol = b"__cxa_demangle\0".as_ptr() as *const c_char;

    // SAFETY: dlopen/dlsym are called with NUL-terminated names; a library
    // that provides the symbol stays loaded for the life of the process.
    let addr = unsafe {
        let mut addr = libc::dlsym(libc::RTLD_DEFAULT, symbol);
        if addr.is_null() {
            for lib in RUNTIME_LIBRARIES {
                let Ok(name) = CString::new(*lib) else {
                    continue;
                };
                let handle = libc::dlopen(name.as_ptr(), libc::RTLD_NOW | libc::RTLD_LOCAL);
                if handle.is_null() {
                    continue;
                }
                addr = libc::dlsym(handle, symbol);
                if !addr.is_null() {
                    log::debug!("using __cxa_demangle from {}", lib);
                    break;
                }
                libc::dlclose(handle);
            }
        }
        addr
    };

    if addr.is_null() {
        log::debug!("no C++ runtime demangler found, using cpp_demangle");
        return None;
    }

    // SAFETY: `__cxa_demangle` has this signature in every Itanium C++ ABI runtime.
    Some(unsafe { std::mem::transmute::<*mut c_void, CxaDemangleFn>(addr) })
}

#[cfg(not(unix))]
fn resolve() -> Option<CxaDemangleFn> {
    None
}

pub fn available() -> bool {
    CXA_DEMANGLE.is_some()
}

/// Run the runtime demangler. `None` when it is unavailable, when it rejects
/// the input, or when the input cannot be passed as a C string.
pub fn demangle(input: &[u8]) -> Option<String> {
    let cxa_demangle = (*CXA_DEMANGLE)?;
    let mangled = CString::new(input).ok()?;

    let mut status: c_int = 0;
    // SAFETY: a null buffer and length ask the runtime to malloc the result,
    // which is released with free below.
    let out = unsafe { cxa_demangle(mangled.as_ptr(), ptr::null_mut(), ptr::null_mut(), &mut status) };
    if out.is_null() {
        log::trace!("__cxa_demangle status {} for {}", status, String::from_utf8_lossy(input));
        return None;
    }

    let text = unsafe { CStr::from_ptr(out) }.to_str().ok().map(str::to_owned);
    unsafe { libc::free(out as *mut c_void) };

    if status != 0 {
        return None;
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(all(target_os = "linux", target_env = "gnu"))]
    #[test]
    fn test_runtime_resolved_on_glibc() {
        assert!(available());
    }

    #[test]
    fn test_runtime_output() {
        if !available() {
            return;
        }
        assert_eq!(demangle(b"_Z1fv").as_deref(), Some("f()"));
        assert_eq!(demangle(b"_ZTV1A").as_deref(), Some("vtable for A"));
        assert_eq!(demangle(b"not_a_mangled_name"), None);
        assert_eq!(demangle(b"_Z1fv\0tail"), None);
        assert_eq!(demangle(b""), None);
    }
}
