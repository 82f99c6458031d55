// Tue Jan 15 2026 - Alex

use crate::binding::error::BindingError;
use crate::binding::value::HostValue;
use crate::symbol::demangle::{DemangleResult, Demangler};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;

/// Name the module registers itself under in the host runtime.
pub const MODULE_NAME: &str = "demangle";

pub type NativeHandler = Box<dyn Fn(&[HostValue]) -> Result<HostValue, BindingError> + Send + Sync>;

static EXPORTS: Lazy<ExportTable> = Lazy::new(|| {
    let mut table = ExportTable::new(MODULE_NAME);
    register_exports(&mut table);
    log::debug!("Registered exports for module '{}': {:?}", MODULE_NAME, table.export_names());
    table
});

/// Process-wide export table, built on first access and read-only afterwards.
pub fn exports() -> &'static ExportTable {
    &EXPORTS
}

pub fn register_exports(table: &mut ExportTable) {
    let demangler = Demangler::default();
    table.register_with_meta(
        ExportFunction::new("demangle", move |args| demangle_native(&demangler, args))
            .with_param("mangled")
            .with_description("Demangle a C++ symbol name, or return the argument unchanged"),
    );
}

/// Native side of the `demangle` export.
///
/// Only the first argument is consulted. On fallback the caller gets back the
/// very value it passed in, not its string coercion.
pub fn demangle_native(demangler: &Demangler, args: &[HostValue]) -> Result<HostValue, BindingError> {
    let input = args.first().ok_or_else(|| BindingError::MissingArgument {
        function: "demangle".to_string(),
        index: 0,
    })?;

    if args.len() > 1 {
        log::trace!("demangle: ignoring {} extra argument(s)", args.len() - 1);
    }

    match demangler.try_demangle(&input.to_host_bytes()) {
        DemangleResult::Demangled(s) => Ok(HostValue::String(s)),
        DemangleResult::NotApplicable => Ok(input.clone()),
    }
}

/// Table of named native functions exposed to the host.
pub struct ExportTable {
    module: String,
    functions: HashMap<String, ExportFunction>,
}

impl ExportTable {
    pub fn new(module: &str) -> Self {
        Self {
            module: module.to_string(),
            functions: HashMap::new(),
        }
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn register<F>(&mut self, name: &str, handler: F)
    where
        F: Fn(&[HostValue]) -> Result<HostValue, BindingError> + Send + Sync + 'static,
    {
        self.register_with_meta(ExportFunction::new(name, handler));
    }

    pub fn register_with_meta(&mut self, func: ExportFunction) {
        self.functions.insert(func.name.clone(), func);
    }

    pub fn call(&self, name: &str, args: &[HostValue]) -> Result<HostValue, BindingError> {
        match self.functions.get(name) {
            Some(func) => (func.handler)(args),
            None => Err(BindingError::UnknownExport(format!("{}.{}", self.module, name))),
        }
    }

    pub fn has_export(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn export_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.functions.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn get_help(&self, name: &str) -> Option<String> {
        self.functions.get(name).map(|f| f.help_text())
    }
}

impl fmt::Debug for ExportTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportTable")
            .field("module", &self.module)
            .field("functions", &self.export_names())
            .finish()
    }
}

pub struct ExportFunction {
    pub name: String,
    pub params: Vec<String>,
    pub description: String,
    pub handler: NativeHandler,
}

impl ExportFunction {
    pub fn new<F>(name: &str, handler: F) -> Self
    where
        F: Fn(&[HostValue]) -> Result<HostValue, BindingError> + Send + Sync + 'static,
    {
        Self {
            name: name.to_string(),
            params: Vec::new(),
            description: String::new(),
            handler: Box::new(handler),
        }
    }

    pub fn with_param(mut self, name: &str) -> Self {
        self.params.push(name.to_string());
        self
    }

    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = desc.to_string();
        self
    }

    pub fn help_text(&self) -> String {
        let mut help = format!("{}({})\n", self.name, self.params.join(", "));
        if !self.description.is_empty() {
            help.push_str(&format!("\n{}\n", self.description));
        }
        help
    }
}

impl fmt::Debug for ExportFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportFunction")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call_demangle(args: &[HostValue]) -> Result<HostValue, BindingError> {
        exports().call("demangle", args)
    }

    #[test]
    fn test_registered_once_under_module_name() {
        let table = exports();
        assert_eq!(table.module(), "demangle");
        assert_eq!(table.export_names(), vec!["demangle".to_string()]);
        assert!(std::ptr::eq(table, exports()));
        assert!(table.get_help("demangle").unwrap().contains("demangle(mangled)"));
    }

    #[test]
    fn test_demangle_export() {
        assert_eq!(call_demangle(&["_Z1fv".into()]).unwrap(), HostValue::from("f()"));
        assert_eq!(call_demangle(&["_Z3addii".into()]).unwrap(), HostValue::from("add(int, int)"));
        assert_eq!(call_demangle(&["not_a_mangled_name".into()]).unwrap(), HostValue::from("not_a_mangled_name"));
        assert_eq!(call_demangle(&["".into()]).unwrap(), HostValue::from(""));
        assert_eq!(call_demangle(&["f()".into()]).unwrap(), HostValue::from("f()"));
    }

    #[test]
    fn test_missing_argument_is_an_error() {
        let err = call_demangle(&[]).unwrap_err();
        assert_eq!(
            err,
            BindingError::MissingArgument { function: "demangle".to_string(), index: 0 }
        );
        assert_eq!(err.to_string(), "demangle: missing argument 0");
    }

    #[test]
    fn test_extra_arguments_ignored() {
        let out = call_demangle(&["_Z1fv".into(), HostValue::Number(1.0), HostValue::Null]).unwrap();
        assert_eq!(out, HostValue::from("f()"));
    }

    #[test]
    fn test_fallback_returns_original_value() {
        assert_eq!(call_demangle(&[HostValue::Number(42.0)]).unwrap(), HostValue::Number(42.0));
        assert_eq!(call_demangle(&[HostValue::Undefined]).unwrap(), HostValue::Undefined);

        let raw = HostValue::bytes(vec![b'_', b'Z', 0xff]);
        assert_eq!(call_demangle(&[raw.clone()]).unwrap(), raw);
    }

    #[test]
    fn test_bytes_are_demangled() {
        let out = call_demangle(&[HostValue::bytes(b"_Z1fv".to_vec())]).unwrap();
        assert_eq!(out, HostValue::from("f()"));
    }

    #[test]
    fn test_unknown_export() {
        let err = exports().call("mangle", &[]).unwrap_err();
        assert_eq!(err, BindingError::UnknownExport("demangle.mangle".to_string()));
        assert!(!exports().has_export("mangle"));
    }

    #[test]
    fn test_custom_table() {
        let mut table = ExportTable::new("extra");
        table.register("echo", |args| Ok(args.first().cloned().unwrap_or(HostValue::Undefined)));
        assert_eq!(table.call("echo", &[HostValue::Boolean(true)]).unwrap(), HostValue::Boolean(true));
        assert_eq!(table.call("echo", &[]).unwrap(), HostValue::Undefined);
    }
}
