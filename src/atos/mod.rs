// Tue Jan 13 2026 - Alex

pub mod address_map;
pub mod elf_loader;
pub mod error;
pub mod proc_maps;
pub mod symbolicator;

pub use address_map::{AddressMap, MapEntry};
pub use elf_loader::{LoadSegment, SymbolTable};
pub use error::AtosError;
pub use symbolicator::{symbolicator_for_pid, ElfLoader, MapLoader, ProcMapLoader, SymbolLoader, Symbolicator};
