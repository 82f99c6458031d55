// Tue Jan 13 2026 - Alex

use crate::atos::address_map::{AddressMap, MapEntry};
use crate::atos::error::AtosError;
use crate::symbol::demangle::Demangler;
use crate::utils::logging::scoped_timer;
use goblin::elf::program_header::PT_LOAD;
use goblin::elf::section_header::SectionHeader;
use goblin::elf::sym::{Symtab, STT_FILE, STT_SECTION};
use goblin::elf::Elf;
use goblin::strtab::Strtab;
use memmap2::Mmap;
use std::fs::File;
use std::path::Path;

const UNKNOWN_SYMBOL: &str = "<unknown>";

/// File range of a `PT_LOAD` segment and the address it is loaded at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadSegment {
    pub offset: u64,
    pub vaddr: u64,
    pub filesz: u64,
}

impl LoadSegment {
    pub fn contains_offset(&self, offset: u64) -> bool {
        offset >= self.offset && offset - self.offset < self.filesz
    }
}

/// Symbols of one ELF file plus what is needed to place file offsets.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    pub map: AddressMap,
    pub segments: Vec<LoadSegment>,
}

impl SymbolTable {
    /// Translate a file offset to a link-time virtual address. Offsets outside
    /// every loadable segment are returned unchanged.
    pub fn offset_to_vaddr(&self, offset: u64) -> u64 {
        self.segments
            .iter()
            .find(|s| s.contains_offset(offset))
            .map(|s| offset - s.offset + s.vaddr)
            .unwrap_or(offset)
    }

    pub fn symbol_for_file_offset(&self, offset: u64) -> Option<&MapEntry> {
        self.map.entry_for_address(self.offset_to_vaddr(offset))
    }

    pub fn find(&self, name: &str) -> Option<&MapEntry> {
        self.map.entries().iter().find(|e| e.name == name)
    }
}

/// Memory-map `path` and read its symbols.
pub fn load(path: &Path, demangler: &Demangler) -> Result<SymbolTable, AtosError> {
    let _timer = scoped_timer(&format!("load symbols {}", path.display()));

    let file = File::open(path).map_err(|e| AtosError::io(path, e))?;
    // SAFETY: the mapping is read-only and dropped before returning.
    let data = unsafe { Mmap::map(&file) }.map_err(|e| AtosError::io(path, e))?;

    let table = parse(path, &data, demangler)?;
    log::debug!("{}: {} symbols", path.display(), table.map.len());
    Ok(table)
}

/// Walk `.dynsym` then `.symtab`, demangling every defined symbol name.
pub fn parse(source: &Path, data: &[u8], demangler: &Demangler) -> Result<SymbolTable, AtosError> {
    let elf = Elf::parse(data).map_err(|e| AtosError::ElfParse {
        path: source.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut table = SymbolTable::default();

    add_all(&elf.dynsyms, &elf.dynstrtab, &elf.section_headers, demangler, &mut table.map);
    add_all(&elf.syms, &elf.strtab, &elf.section_headers, demangler, &mut table.map);

    table.segments = elf
        .program_headers
        .iter()
        .filter(|ph| ph.p_type == PT_LOAD)
        .map(|ph| LoadSegment {
            offset: ph.p_offset,
            vaddr: ph.p_vaddr,
            filesz: ph.p_filesz,
        })
        .collect();

    Ok(table)
}

fn add_all(
    syms: &Symtab,
    strings: &Strtab,
    sections: &[SectionHeader],
    demangler: &Demangler,
    map: &mut AddressMap,
) {
    for sym in syms.iter() {
        // 0 value means external reference
        if sym.st_value == 0 {
            continue;
        }
        if matches!(sym.st_type(), STT_SECTION | STT_FILE) {
            continue;
        }

        let Some(section) = sections.get(sym.st_shndx) else {
            log::trace!("symbol at {:#x} has no section ({})", sym.st_value, sym.st_shndx);
            continue;
        };

        let raw_name = strings.get_at(sym.st_name).unwrap_or(UNKNOWN_SYMBOL);
        let name = demangler.demangle(raw_name);
        let load_base = section.sh_addr & !section.sh_addralign.saturating_sub(1);

        map.add_entry(&name, sym.st_value, sym.st_size, 0, load_base);
    }
}
