//! TOML configuration for the page audit driver
//!
//! ```toml
//! [site]
//! domain = "focus.example"
//!
//! [collector]
//! debug = false
//! channel_capacity = 256
//!
//! [report]
//! format = "console"
//! fail_under = 70
//! ```
//!
//! Every section and field is optional.

use anyhow::Context;
use audit_engine::OutputFormat;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditConfig {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub collector: CollectorConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

impl AuditConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_str(&content)
    }

    pub fn from_str(s: &str) -> anyhow::Result<Self> {
        toml::from_str(s).context("Failed to parse TOML configuration")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// The site's own domain; links to other hosts are external
    #[serde(default = "default_domain")]
    pub domain: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            domain: default_domain(),
        }
    }
}

fn default_domain() -> String {
    "localhost".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectorConfig {
    /// Trace every snapshot change
    #[serde(default)]
    pub debug: bool,
    /// Pending performance events held before the feed waits (default: 256)
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            debug: false,
            channel_capacity: default_channel_capacity(),
        }
    }
}

fn default_channel_capacity() -> usize {
    256
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default)]
    pub format: OutputFormat,
    /// Exit non-zero when the score falls below this
    #[serde(default)]
    pub fail_under: Option<u32>,
}
