// Tue Jan 15 2026 - Alex

pub mod error;
pub mod exports;
pub mod ffi;
pub mod value;

pub use error::BindingError;
pub use exports::{demangle_native, exports, ExportFunction, ExportTable, MODULE_NAME};
pub use value::HostValue;
