// Tue Jan 13 2026 - Alex

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AtosError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to read /proc: {0}")]
    ProcMaps(String),
    #[error("ELF parse error in {path}: {message}")]
    ElfParse { path: PathBuf, message: String },
}

impl AtosError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AtosError::Io { path: path.into(), source }
    }
}
