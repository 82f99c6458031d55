// Tue Jan 13 2026 - Alex

use std::fmt;

/// One named address range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapEntry {
    pub name: String,
    pub base: u64,
    pub length: u64,
    /// Where in the underlying file the mapping starts.
    pub mapped_offset: u64,
    /// Base of the section the entry was loaded from.
    pub load_base: u64,
}

impl MapEntry {
    pub fn new(name: impl Into<String>, base: u64, length: u64) -> Self {
        Self {
            name: name.into(),
            base,
            length,
            mapped_offset: 0,
            load_base: 0,
        }
    }

    pub fn with_mapped_offset(mut self, offset: u64) -> Self {
        self.mapped_offset = offset;
        self
    }

    pub fn with_load_base(mut self, load_base: u64) -> Self {
        self.load_base = load_base;
        self
    }

    pub fn end(&self) -> u64 {
        self.base.saturating_add(self.length)
    }

    /// Half-open containment; an empty range only holds its own start.
    fn covers(start: u64, length: u64, address: u64) -> bool {
        if length == 0 {
            address == start
        } else {
            address >= start && address - start < length
        }
    }

    pub fn contains(&self, address: u64) -> bool {
        Self::covers(self.base, self.length, address)
    }
}

/// Insertion-ordered list of ranges; lookups return the first match.
#[derive(Debug, Clone, Default)]
pub struct AddressMap {
    entries: Vec<MapEntry>,
}

impl AddressMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_entry(&mut self, name: &str, base: u64, length: u64, mapped_offset: u64, load_base: u64) {
        self.push(
            MapEntry::new(name, base, length)
                .with_mapped_offset(mapped_offset)
                .with_load_base(load_base),
        );
    }

    pub fn push(&mut self, entry: MapEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[MapEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry_for_address(&self, address: u64) -> Option<&MapEntry> {
        self.entries.iter().find(|e| e.contains(address))
    }

    /// Lookup for an address expressed relative to each entry's load base.
    pub fn entry_for_relative(&self, offset: u64) -> Option<&MapEntry> {
        self.entries
            .iter()
            .find(|e| e.contains(offset.wrapping_add(e.load_base)))
    }

    /// Lookup by offset into the mapped file rather than by address.
    pub fn entry_for_mapped_offset(&self, offset: u64) -> Option<&MapEntry> {
        self.entries
            .iter()
            .find(|e| MapEntry::covers(e.mapped_offset, e.length, offset))
    }

    /// Distinct entry names, in first-seen order.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for entry in &self.entries {
            if !names.contains(&entry.name) {
                names.push(entry.name.clone());
            }
        }
        names
    }

    pub fn sorted_entries(&self) -> Vec<&MapEntry> {
        let mut sorted: Vec<&MapEntry> = self.entries.iter().collect();
        sorted.sort_by_key(|e| e.base);
        sorted
    }

    pub fn log_entries(&self) {
        for entry in self.sorted_entries() {
            log::info!("{:x}-{:x}: {}", entry.base, entry.end(), entry.name);
        }
    }
}

impl fmt::Display for AddressMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in self.sorted_entries() {
            writeln!(f, "{:x}-{:x}: {}", entry.base, entry.end(), entry.name)?;
        }
        Ok(())
    }
}
