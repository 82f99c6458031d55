// Tue Jan 13 2026 - Alex

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Deepest recursion either engine pass may be configured for. Deeper limits
/// overflow the stack on adversarial input before the engine gives up.
pub const MAX_RECURSION_LIMIT: u32 = 96;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub demangle: DemangleConfig,
    pub log_level: String,
}

/// Options handed to the demangling engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DemangleConfig {
    /// Render bare type encodings such as `i` as `int`, like `__cxa_demangle` does.
    pub demangle_types: bool,
    pub no_params: bool,
    pub no_return_type: bool,
    pub hide_expression_literal_types: bool,
    pub parse_recursion_limit: Option<u32>,
    pub demangle_recursion_limit: Option<u32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            demangle: DemangleConfig::default(),
            log_level: "warn".to_string(),
        }
    }
}

impl Default for DemangleConfig {
    fn default() -> Self {
        Self {
            demangle_types: true,
            no_params: false,
            no_return_type: false,
            hide_expression_literal_types: false,
            parse_recursion_limit: None,
            demangle_recursion_limit: None,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_demangle(mut self, demangle: DemangleConfig) -> Self {
        self.demangle = demangle;
        self
    }

    pub fn with_log_level(mut self, level: &str) -> Self {
        self.log_level = level.to_string();
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path.as_ref())?;
        log::debug!("Loaded config from {}", path.as_ref().display());
        Self::from_json_str(&contents)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_recursion_limit("parse_recursion_limit", self.demangle.parse_recursion_limit)?;
        check_recursion_limit("demangle_recursion_limit", self.demangle.demangle_recursion_limit)?;
        match self.log_level.to_lowercase().as_str() {
            "error" | "warn" | "warning" | "info" | "debug" | "trace" | "off" => Ok(()),
            other => Err(ConfigError::Invalid(format!("unknown log level '{}'", other))),
        }
    }
}

fn check_recursion_limit(field: &str, limit: Option<u32>) -> Result<(), ConfigError> {
    match limit {
        Some(0) => Err(ConfigError::Invalid(format!("{} must be greater than 0", field))),
        Some(n) if n > MAX_RECURSION_LIMIT => Err(ConfigError::Invalid(format!(
            "{} must be at most {}, got {}",
            field, MAX_RECURSION_LIMIT, n
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert!(config.demangle.demangle_types);
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = Config::from_json_str(r#"{ "demangle": { "no_params": true } }"#).unwrap();
        assert!(config.demangle.no_params);
        assert!(config.demangle.demangle_types);
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_rejects_invalid_values() {
        let zero = Config::from_json_str(r#"{ "demangle": { "parse_recursion_limit": 0 } }"#);
        assert!(matches!(zero, Err(ConfigError::Invalid(_))));

        let huge = Config::from_json_str(
            r#"{ "demangle": { "parse_recursion_limit": 4000000000, "demangle_recursion_limit": 4000000000 } }"#,
        );
        assert!(matches!(huge, Err(ConfigError::Invalid(_))));

        let over = Config::new().with_demangle(DemangleConfig {
            demangle_recursion_limit: Some(MAX_RECURSION_LIMIT + 1),
            ..DemangleConfig::default()
        });
        assert!(over.validate().is_err());

        let at_max = Config::new().with_demangle(DemangleConfig {
            parse_recursion_limit: Some(MAX_RECURSION_LIMIT),
            ..DemangleConfig::default()
        });
        assert!(at_max.validate().is_ok());

        let level = Config::new().with_log_level("loud");
        assert!(level.validate().is_err());

        assert!(matches!(Config::from_json_str("{"), Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_json_round_trip() {
        let config = Config::new()
            .with_log_level("debug")
            .with_demangle(DemangleConfig {
                parse_recursion_limit: Some(64),
                ..DemangleConfig::default()
            });
        let json = config.to_json().unwrap();
        assert_eq!(Config::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load("/nonexistent/symbol-demangler.json");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
