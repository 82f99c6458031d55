// Tue Jan 13 2026 - Alex

use crate::config::{DemangleConfig, MAX_RECURSION_LIMIT};
use crate::symbol::platform;
use cpp_demangle::{DemangleOptions, ParseOptions, Symbol};
use once_cell::sync::Lazy;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

static DEFAULT_DEMANGLER: Lazy<Demangler> = Lazy::new(Demangler::default);

/// Outcome of a single demangling attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DemangleResult {
    Demangled(String),
    NotApplicable,
}

impl DemangleResult {
    pub fn is_demangled(&self) -> bool {
        matches!(self, DemangleResult::Demangled(_))
    }

    pub fn into_option(self) -> Option<String> {
        match self {
            DemangleResult::Demangled(s) => Some(s),
            DemangleResult::NotApplicable => None,
        }
    }

    /// Collapse into the demangled text, or a copy of `input` when the attempt did not apply.
    pub fn or_original(self, input: &str) -> String {
        self.into_option().unwrap_or_else(|| input.to_string())
    }
}

#[cfg(target_vendor = "apple")]
const MANGLED_PREFIXES: &[&[u8]] = &[b"_Z", b"__Z", b"_GLOBAL_"];

#[cfg(not(target_vendor = "apple"))]
const MANGLED_PREFIXES: &[&[u8]] = &[b"_Z", b"_GLOBAL_"];

/// Which implementation renders a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Engine {
    /// `__cxa_demangle` from the process's C++ runtime.
    Runtime,
    /// `cpp_demangle`, used when the runtime is missing, when render options
    /// are set, and for inputs longer than the runtime is trusted with.
    Portable,
}

/// Itanium C++ ABI demangler.
///
/// Options are resolved once at construction. The demangler carries no
/// mutable state, so one instance can be shared freely across threads.
#[derive(Clone)]
pub struct Demangler {
    parse_options: ParseOptions,
    demangle_options: DemangleOptions,
    demangle_types: bool,
    engine: Engine,
}

impl Demangler {
    pub fn new(config: &DemangleConfig) -> Self {
        let mut parse_options = ParseOptions::default();
        if let Some(limit) = config.parse_recursion_limit {
            parse_options = parse_options.recursion_limit(limit.min(MAX_RECURSION_LIMIT));
        }

        let mut demangle_options = DemangleOptions::new();
        if config.no_params {
            demangle_options = demangle_options.no_params();
        }
        if config.no_return_type {
            demangle_options = demangle_options.no_return_type();
        }
        if config.hide_expression_literal_types {
            demangle_options = demangle_options.hide_expression_literal_types();
        }
        if let Some(limit) = config.demangle_recursion_limit {
            demangle_options = demangle_options.recursion_limit(limit.min(MAX_RECURSION_LIMIT));
        }

        let custom_rendering = config.no_params || config.no_return_type || config.hide_expression_literal_types;
        let engine = if platform::available() && !custom_rendering {
            Engine::Runtime
        } else {
            Engine::Portable
        };

        Self {
            parse_options,
            demangle_options,
            demangle_types: config.demangle_types,
            engine,
        }
    }

    /// Variant used for symbol tables: bare type encodings are left alone.
    pub fn symbols_only(config: &DemangleConfig) -> Self {
        let mut demangler = Self::new(config);
        demangler.demangle_types = false;
        demangler
    }

    pub fn demangles_types(&self) -> bool {
        self.demangle_types
    }

    pub fn engine(&self) -> Engine {
        self.engine
    }

    /// Demangle `input`, or report that it is not a name this platform's
    /// demangler accepts.
    ///
    /// A panic inside `cpp_demangle` is caught and reported as
    /// `NotApplicable`. The process panic hook still runs first, so the
    /// default hook prints a panic message to stderr even though the call
    /// returns normally.
    pub fn try_demangle(&self, input: &[u8]) -> DemangleResult {
        if input.is_empty() || has_foreign_prefix(input) {
            return DemangleResult::NotApplicable;
        }

        if !self.demangle_types && !has_mangled_prefix(input) {
            return DemangleResult::NotApplicable;
        }

        if self.engine == Engine::Runtime && input.len() <= platform::MAX_RUNTIME_INPUT {
            return match platform::demangle(input) {
                Some(demangled) => DemangleResult::Demangled(demangled),
                None => DemangleResult::NotApplicable,
            };
        }

        let attempt = panic::catch_unwind(AssertUnwindSafe(|| self.parse_and_render(input)));

        match attempt {
            Ok(Some(demangled)) => DemangleResult::Demangled(demangled),
            Ok(None) => DemangleResult::NotApplicable,
            Err(_) => {
                log::debug!("demangler panicked on {} byte input, falling back", input.len());
                DemangleResult::NotApplicable
            }
        }
    }

    fn parse_and_render(&self, input: &[u8]) -> Option<String> {
        let symbol = match Symbol::new_with_options(input, &self.parse_options) {
            Ok(symbol) => symbol,
            Err(e) => {
                log::trace!("not demangled ({}): {}", e, String::from_utf8_lossy(input));
                return None;
            }
        };

        symbol.demangle(&self.demangle_options).ok()
    }

    pub fn demangle(&self, input: &str) -> String {
        self.try_demangle(input.as_bytes()).or_original(input)
    }

    pub fn demangle_bytes(&self, input: &[u8]) -> Vec<u8> {
        match self.try_demangle(input) {
            DemangleResult::Demangled(s) => s.into_bytes(),
            DemangleResult::NotApplicable => input.to_vec(),
        }
    }
}

impl fmt::Debug for Demangler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Demangler")
            .field("demangle_types", &self.demangle_types)
            .field("engine", &self.engine)
            .finish()
    }
}

impl Default for Demangler {
    fn default() -> Self {
        Self::new(&DemangleConfig::default())
    }
}

fn has_mangled_prefix(input: &[u8]) -> bool {
    MANGLED_PREFIXES.iter().any(|prefix| input.starts_with(prefix))
}

// Mach-O's extra leading underscore is not part of the name elsewhere.
fn has_foreign_prefix(input: &[u8]) -> bool {
    cfg!(not(target_vendor = "apple")) && input.starts_with(b"__Z")
}

pub fn is_mangled(name: &str) -> bool {
    has_mangled_prefix(name.as_bytes())
}

pub fn try_demangle(name: &str) -> DemangleResult {
    DEFAULT_DEMANGLER.try_demangle(name.as_bytes())
}

/// Demangle `name`, returning it unchanged when it is not a mangled name.
pub fn demangle(name: &str) -> String {
    DEFAULT_DEMANGLER.demangle(name)
}

pub fn demangle_bytes(name: &[u8]) -> Vec<u8> {
    DEFAULT_DEMANGLER.demangle_bytes(name)
}
