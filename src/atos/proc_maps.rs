// Tue Jan 13 2026 - Alex

use crate::atos::address_map::AddressMap;
use crate::atos::error::AtosError;
use libc::pid_t;
use std::fs;
use std::path::PathBuf;

pub fn maps_path(pid: pid_t) -> PathBuf {
    PathBuf::from(format!("/proc/{}/maps", pid))
}

/// Read and parse `/proc/<pid>/maps`.
pub fn load(pid: pid_t) -> Result<AddressMap, AtosError> {
    let path = maps_path(pid);
    let text = fs::read_to_string(&path)
        .map_err(|e| AtosError::ProcMaps(format!("{}: {}", path.display(), e)))?;
    let map = parse(&text);
    log::debug!("pid {}: {} executable file mappings", pid, map.len());
    Ok(map)
}

/// A mapping backed by a real file: six fields, and the path is not a
/// pseudo-name like `[heap]` or `[vdso]`.
pub fn is_file(fields: &[&str]) -> bool {
    fields.len() == 6 && !fields[5].starts_with('[')
}

pub fn is_executable(fields: &[&str]) -> bool {
    fields.get(1).is_some_and(|perms| perms.contains('x'))
}

/// Keep the executable, file-backed mappings of a maps listing.
pub fn parse(text: &str) -> AddressMap {
    let mut map = AddressMap::new();

    for line in text.lines() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if !is_file(&fields) || !is_executable(&fields) {
            continue;
        }

        match parse_fields(&fields) {
            Some((start, end, offset)) => {
                map.add_entry(fields[5], start, end - start, offset, 0);
            }
            None => log::warn!("Skipping malformed maps line: {}", line),
        }
    }

    map
}

fn parse_fields(fields: &[&str]) -> Option<(u64, u64, u64)> {
    let (start, end) = fields[0].split_once('-')?;
    let start = u64::from_str_radix(start, 16).ok()?;
    let end = u64::from_str_radix(end, 16).ok()?;
    let offset = u64::from_str_radix(fields[2], 16).ok()?;
    if end < start {
        return None;
    }
    Some((start, end, offset))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
00400000-00c5c000 r-xp 00000000 fc:00 278323                             /usr/bin/nodejs
00e5b000-00e5c000 r-xp 0085b000 fc:00 278323                             /usr/bin/nodejs
00e5c000-00e73000 rwxp 0085c000 fc:00 278323                             /usr/bin/nodejs
00e73000-00e7c000 rwxp 00000000 00:00 0
01989000-01c31000 rwxp 00000000 00:00 0                                  [heap]
c17c600000-c17c625000 rwxp 00000000 00:00 0
2d71d7e8000-2d71d7e9000 r-xp 00000000 00:00 0
2d7cdc96000-2d7cde96000 rwxp 00000000 00:00 0
501df3b7000-501df3c0000 ---p 00000000 00:00 0
501df3c0000-501df3e0000 rwxp 00000000 00:00 0
";

    #[test]
    fn test_parse_keeps_executable_files() {
        let map = parse(SAMPLE);
        let entries = map.entries();

        assert_eq!(entries.len(), 3);
        assert!(entries.iter().all(|e| e.name == "/usr/bin/nodejs"));
        assert_eq!(entries[0].base, 0x00400000);
        assert_eq!(entries[0].length, 0x00c5c000 - 0x00400000);
        assert_eq!(entries[1].base, 0x00e5b000);
        assert_eq!(entries[1].mapped_offset, 0x0085b000);
        assert_eq!(entries[2].base, 0x00e5c000);
        assert_eq!(map.names(), vec!["/usr/bin/nodejs".to_string()]);
    }

    #[test]
    fn test_field_predicates() {
        assert!(is_file(&["a-b", "r-xp", "0", "0", "0", "/lib/x.so"]));
        assert!(!is_file(&["a-b", "r-xp", "0", "0", "0", "[vdso]"]));
        assert!(!is_file(&["a-b", "r-xp", "0", "0", "0"]));
        assert!(is_executable(&["a-b", "r-xp"]));
        assert!(!is_executable(&["a-b", "rw-p"]));
        assert!(!is_executable(&[]));
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let map = parse("zzzz-00c5c000 r-xp 00000000 fc:00 1 /bin/a\n\n00001000-00002000 r-xp 0 fc:00 1 /bin/b\n");
        assert_eq!(map.len(), 1);
        assert_eq!(map.entries()[0].name, "/bin/b");
    }

    #[test]
    fn test_load_missing_pid() {
        let err = load(pid_t::MAX).unwrap_err();
        assert!(err.to_string().starts_with("Failed to read /proc"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_load_self() {
        let map = load(std::process::id() as pid_t).unwrap();
        assert!(!map.is_empty());
    }
}
