// Tue Jan 15 2026 - Alex

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindingError {
    #[error("{function}: missing argument {index}")]
    MissingArgument { function: String, index: usize },
    #[error("Export '{0}' not found")]
    UnknownExport(String),
}
