//! Output utilities for the CLI.

use std::fmt::Display;
use std::io::{self, Write};

use serde::Serialize;

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable summary lines (default).
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
    /// YAML.
    Yaml,
}

/// Renders command results to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct Output {
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Renders `value` in the configured format.
    pub fn render<T: Serialize + Display>(&self, value: &T) -> Result<String, serde_json::Error> {
        match self.format {
            OutputFormat::Text => Ok(value.to_string()),
            OutputFormat::Json => serde_json::to_string_pretty(value),
            OutputFormat::Yaml => serde_yaml::to_string(value)
                .map(|s| s.trim_end().to_string())
                .map_err(serde::ser::Error::custom),
        }
    }

    /// Writes `value` to stdout followed by a newline.
    pub fn write<T: Serialize + Display>(&self, value: &T) -> io::Result<()> {
        let rendered = self.render(value).map_err(io::Error::other)?;
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{rendered}")
    }
}
