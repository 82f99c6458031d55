// Tue Jan 13 2026 - Alex

use crate::atos::address_map::AddressMap;
use crate::atos::elf_loader::{self, SymbolTable};
use crate::atos::error::AtosError;
use crate::atos::proc_maps;
use crate::config::Config;
use crate::symbol::demangle::Demangler;
use libc::pid_t;
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::Path;

/// Source of a process's executable mappings.
pub trait MapLoader: Send + Sync {
    fn load_map(&self, pid: pid_t) -> Result<AddressMap, AtosError>;
}

/// Source of the symbol table of one mapped file.
pub trait SymbolLoader: Send + Sync {
    fn load_symbols(&self, path: &Path) -> Result<SymbolTable, AtosError>;
}

pub struct ProcMapLoader;

impl MapLoader for ProcMapLoader {
    fn load_map(&self, pid: pid_t) -> Result<AddressMap, AtosError> {
        proc_maps::load(pid)
    }
}

pub struct ElfLoader {
    demangler: Demangler,
}

impl ElfLoader {
    pub fn new(demangler: Demangler) -> Self {
        Self { demangler }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(Demangler::symbols_only(&config.demangle))
    }
}

impl SymbolLoader for ElfLoader {
    fn load_symbols(&self, path: &Path) -> Result<SymbolTable, AtosError> {
        elf_loader::load(path, &self.demangler)
    }
}

/// Resolves addresses in a process to symbol names.
#[derive(Debug, Clone)]
pub struct Symbolicator {
    address_map: AddressMap,
    symbol_tables: HashMap<String, SymbolTable>,
}

impl Symbolicator {
    pub fn new(address_map: AddressMap, symbol_tables: HashMap<String, SymbolTable>) -> Self {
        Self {
            address_map,
            symbol_tables,
        }
    }

    /// Load the mappings of `pid`, then the symbol tables of every distinct
    /// mapped file in parallel. The first failing file fails the whole call.
    pub fn for_pid(pid: pid_t, maps: &dyn MapLoader, symbols: &dyn SymbolLoader) -> Result<Self, AtosError> {
        let address_map = maps.load_map(pid)?;
        let files = address_map.names();
        log::debug!("pid {}: loading symbols for {} files", pid, files.len());

        let tables = files
            .par_iter()
            .map(|name| symbols.load_symbols(Path::new(name)).map(|t| (name.clone(), t)))
            .collect::<Result<HashMap<_, _>, _>>()?;

        Ok(Self::new(address_map, tables))
    }

    pub fn address_map(&self) -> &AddressMap {
        &self.address_map
    }

    pub fn symbol_table(&self, name: &str) -> Option<&SymbolTable> {
        self.symbol_tables.get(name)
    }

    /// Symbol name for `address`, or a bracketed description of where it landed.
    pub fn atos(&self, address: u64) -> String {
        let addr = format!("0x{:x}", address);

        let Some(vm_entry) = self.address_map.entry_for_address(address) else {
            return format!("[{} in unknown binary]", addr);
        };

        let Some(table) = self.symbol_tables.get(&vm_entry.name) else {
            return format!("[{} in {}]", addr, vm_entry.name);
        };

        let file_offset = address - vm_entry.base + vm_entry.mapped_offset;
        match table.symbol_for_file_offset(file_offset) {
            Some(symbol) => symbol.name.clone(),
            None => format!("[{} in {}]", addr, vm_entry.name),
        }
    }
}

pub fn symbolicator_for_pid(pid: pid_t, config: &Config) -> Result<Symbolicator, AtosError> {
    Symbolicator::for_pid(pid, &ProcMapLoader, &ElfLoader::from_config(config))
}
