//! Attribute defaulting
//!
//! Optional widget settings resolve through one fixed chain per field:
//! the markup attribute, then the site configuration, then the constant
//! below. Each field has its own function so the chain stays visible.

use std::str::FromStr;

use crate::config::SiteConfig;
use crate::error::Result;
use crate::markup::WidgetMarkup;

pub const DEFAULT_MEMORY_LIMIT_BYTES: u64 = 128 * 1024 * 1024;
pub const DEFAULT_CPU_LIMIT: f64 = 1.0;
pub const DEFAULT_PIDS_LIMIT: u64 = 128;
/// Seconds the file monitor waits after a change before reporting success
pub const DEFAULT_SUCCESS_TIMEOUT: f64 = 0.1;
/// Seconds the file monitor waits before giving up
pub const DEFAULT_FAILURE_TIMEOUT: f64 = 5.0;

pub const MEMORY_LIMIT_ATTRIBUTE: &str = "memory-limit-bytes";
pub const CPU_LIMIT_ATTRIBUTE: &str = "cpu-limit";
pub const PIDS_LIMIT_ATTRIBUTE: &str = "pids-limit";
pub const SUCCESS_TIMEOUT_ATTRIBUTE: &str = "success-timeout";
pub const FAILURE_TIMEOUT_ATTRIBUTE: &str = "failure-timeout";
pub const WORKING_DIRECTORY_ATTRIBUTE: &str = "working-directory";

/// Sandbox resource limits, always fully resolved
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResourceLimits {
    pub memory_limit_bytes: u64,
    pub cpu_limit: f64,
    pub pids_limit: u64,
}

impl ResourceLimits {
    pub fn resolve(markup: &WidgetMarkup, config: &SiteConfig) -> Result<Self> {
        Ok(Self {
            memory_limit_bytes: memory_limit_bytes(markup, config)?,
            cpu_limit: cpu_limit(markup, config)?,
            pids_limit: pids_limit(markup, config)?,
        })
    }
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            memory_limit_bytes: DEFAULT_MEMORY_LIMIT_BYTES,
            cpu_limit: DEFAULT_CPU_LIMIT,
            pids_limit: DEFAULT_PIDS_LIMIT,
        }
    }
}

pub fn memory_limit_bytes(markup: &WidgetMarkup, config: &SiteConfig) -> Result<u64> {
    Ok(parse_attribute(markup, MEMORY_LIMIT_ATTRIBUTE)?
        .or(config.default_memory_limit_bytes)
        .unwrap_or(DEFAULT_MEMORY_LIMIT_BYTES))
}

pub fn cpu_limit(markup: &WidgetMarkup, config: &SiteConfig) -> Result<f64> {
    Ok(parse_decimal(markup, CPU_LIMIT_ATTRIBUTE)?
        .map(|(value, _)| value)
        .or(config.default_cpu_limit)
        .unwrap_or(DEFAULT_CPU_LIMIT))
}

pub fn pids_limit(markup: &WidgetMarkup, config: &SiteConfig) -> Result<u64> {
    Ok(parse_attribute(markup, PIDS_LIMIT_ATTRIBUTE)?
        .or(config.default_pids_limit)
        .unwrap_or(DEFAULT_PIDS_LIMIT))
}

/// Success timeout as passed on the monitor command line
pub fn success_timeout(markup: &WidgetMarkup, config: &SiteConfig) -> Result<String> {
    timeout(
        markup,
        SUCCESS_TIMEOUT_ATTRIBUTE,
        config.default_success_timeout,
        DEFAULT_SUCCESS_TIMEOUT,
    )
}

/// Failure timeout as passed on the monitor command line
pub fn failure_timeout(markup: &WidgetMarkup, config: &SiteConfig) -> Result<String> {
    timeout(
        markup,
        FAILURE_TIMEOUT_ATTRIBUTE,
        config.default_failure_timeout,
        DEFAULT_FAILURE_TIMEOUT,
    )
}

pub fn working_directory(markup: &WidgetMarkup) -> Option<String> {
    markup
        .attribute(WORKING_DIRECTORY_ATTRIBUTE)
        .map(str::to_string)
}

/// Timeouts keep the author's spelling; defaults use Rust's shortest
/// round-trip float formatting (`0.1`, `5.0`).
fn timeout(
    markup: &WidgetMarkup,
    attribute: &'static str,
    configured: Option<f64>,
    fallback: f64,
) -> Result<String> {
    if let Some((_, raw)) = parse_decimal(markup, attribute)? {
        return Ok(raw.to_string());
    }
    Ok(format!("{:?}", configured.unwrap_or(fallback)))
}

fn parse_attribute<T: FromStr>(markup: &WidgetMarkup, attribute: &'static str) -> Result<Option<T>> {
    markup
        .attribute(attribute)
        .map(|raw| raw.trim().parse().map_err(|_| markup.invalid(attribute, raw)))
        .transpose()
}

/// Non-negative finite decimal, returned with its source text
fn parse_decimal<'a>(
    markup: &'a WidgetMarkup,
    attribute: &'static str,
) -> Result<Option<(f64, &'a str)>> {
    let Some(raw) = markup.attribute(attribute) else {
        return Ok(None);
    };
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(Some((value, raw.trim()))),
        _ => Err(markup.invalid(attribute, raw)),
    }
}
