// Tue Jan 13 2026 - Alex

pub mod demangle;
pub mod platform;

pub use demangle::{demangle, demangle_bytes, is_mangled, try_demangle, DemangleResult, Demangler, Engine};
