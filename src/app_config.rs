use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Number of characters of raw block text shown in previews
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,

    /// Try the RTF library before the built-in extractor
    #[serde(default = "default_true")]
    pub use_rtf_library: bool,

    /// Also turn literal `\n` sequences into newlines in .txt files
    #[serde(default)]
    pub normalize_txt_escaped_newlines: bool,

    /// Copy exported Markdown to the clipboard without --copy
    #[serde(default)]
    pub copy_to_clipboard: bool,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Log level for the application
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    // @returns: Matching filter for the log facade
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

// Implement FromStr trait for LogLevel
impl std::str::FromStr for LogLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            _ => Err(anyhow!("Invalid log level: {}", s)),
        }
    }
}

fn default_preview_chars() -> usize {
    150
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.preview_chars == 0 {
            return Err(anyhow!("preview_chars must be greater than zero"));
        }

        Ok(())
    }

    /// Load a configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        Ok(config)
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            preview_chars: default_preview_chars(),
            use_rtf_library: default_true(),
            normalize_txt_escaped_newlines: false,
            copy_to_clipboard: false,
            log_level: LogLevel::default(),
        }
    }
}
