//! Site configuration
//!
//! Read-only settings shared by every page of a run. Loaded from TOML;
//! every field is optional and falls back to the values below.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CompileError, Result};

/// Logging level written into the backend plan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LoggingLevel {
    #[default]
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

/// Site-wide configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Address the backend binds to
    pub transport_host: String,
    pub transport_port: u16,
    /// Sandbox runtime flavor (`docker`)
    pub sandbox_context_type: String,
    pub logging_level: LoggingLevel,

    /// Image and entry point of the file monitor used by viewers and editors
    pub monitor_image: String,
    pub monitor_command: String,

    /// Page-level defaults; `None` defers to the widget's own constant
    pub default_success_timeout: Option<f64>,
    pub default_failure_timeout: Option<f64>,
    pub default_memory_limit_bytes: Option<u64>,
    pub default_cpu_limit: Option<f64>,
    pub default_pids_limit: Option<u64>,

    pub proxy_server_name: String,
    pub http_port: u16,
    pub https_port: u16,
    pub https_certificate_path: Option<String>,
    pub https_certificate_key_path: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            transport_host: "*".to_string(),
            transport_port: 80,
            sandbox_context_type: "docker".to_string(),
            logging_level: LoggingLevel::Debug,
            monitor_image: "interactive-widgets-monitor".to_string(),
            monitor_command: "interactive-widgets-monitor".to_string(),
            default_success_timeout: None,
            default_failure_timeout: None,
            default_memory_limit_bytes: None,
            default_cpu_limit: None,
            default_pids_limit: None,
            proxy_server_name: "localhost".to_string(),
            http_port: 80,
            https_port: 443,
            https_certificate_path: None,
            https_certificate_key_path: None,
        }
    }
}

impl SiteConfig {
    /// Parse a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Load a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| CompileError::io(path, e))?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Certificate and key paths, only when both are configured
    pub fn https_certificate(&self) -> Option<(&str, &str)> {
        match (
            self.https_certificate_path.as_deref(),
            self.https_certificate_key_path.as_deref(),
        ) {
            (Some(certificate), Some(key)) => Some((certificate, key)),
            _ => None,
        }
    }

    /// Context type with its first letter upper-cased and the rest
    /// lower-cased, used as the prefix of backend logger names
    pub fn logger_prefix(&self) -> String {
        let mut chars = self.sandbox_context_type.chars();
        match chars.next() {
            Some(first) => first
                .to_uppercase()
                .chain(chars.flat_map(char::to_lowercase))
                .collect(),
            None => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SiteConfig::default();
        assert_eq!(config.transport_host, "*");
        assert_eq!(config.transport_port, 80);
        assert_eq!(config.logging_level, LoggingLevel::Debug);
        assert_eq!(config.default_memory_limit_bytes, None);
        assert!(config.https_certificate().is_none());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = SiteConfig::from_toml_str(
            r#"
            transport_port = 8080
            logging_level = "WARNING"
            default_cpu_limit = 0.5
            "#,
        )
        .unwrap();
        assert_eq!(config.transport_port, 8080);
        assert_eq!(config.logging_level, LoggingLevel::Warning);
        assert_eq!(config.default_cpu_limit, Some(0.5));
        assert_eq!(config.sandbox_context_type, "docker");
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = SiteConfig::from_toml_str("transport_prot = 1").unwrap_err();
        assert!(matches!(err, CompileError::Config(_)));
    }

    #[test]
    fn test_https_requires_both_paths() {
        let mut config = SiteConfig {
            https_certificate_path: Some("cert.pem".into()),
            ..SiteConfig::default()
        };
        assert!(config.https_certificate().is_none());

        config.https_certificate_key_path = Some("key.pem".into());
        assert_eq!(config.https_certificate(), Some(("cert.pem", "key.pem")));
    }

    #[test]
    fn test_logger_prefix() {
        let mut config = SiteConfig::default();
        assert_eq!(config.logger_prefix(), "Docker");
        config.sandbox_context_type = "PODMAN".into();
        assert_eq!(config.logger_prefix(), "Podman");
    }
}
