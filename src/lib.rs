// Tue Jan 15 2026 - Alex

pub mod atos;
pub mod binding;
pub mod config;
pub mod symbol;
pub mod utils;

pub use atos::{symbolicator_for_pid, Symbolicator};
pub use binding::{exports, HostValue};
pub use config::{Config, DemangleConfig};
pub use symbol::{demangle, DemangleResult, Demangler};
