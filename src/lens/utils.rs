//! `--format` values shared by `lookup`, `session` and `config`

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a record, the history listing or an error is printed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Nested record table; history as a grid
    #[default]
    Table,
    /// Field/value summary as a markdown table
    Markdown,
    /// The record exactly as exported, on one line
    Json,
    /// Same layout as the export file
    JsonPretty,
    /// One record per line, for piping session output
    JsonLine,
    /// `field|value` summary lines
    Psv,
}

impl OutputFormat {
    /// Errors are printed as `{"error": ...}` for these
    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json | Self::JsonPretty | Self::JsonLine)
    }

    /// Canonical names, as listed in the unknown-format error
    pub fn all_names() -> &'static [&'static str] {
        &[
            "table",
            "markdown",
            "json",
            "json-pretty",
            "json-line",
            "psv",
        ]
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Table => "table",
            Self::Markdown => "markdown",
            Self::Json => "json",
            Self::JsonPretty => "json-pretty",
            Self::JsonLine => "json-line",
            Self::Psv => "psv",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" | "pretty" => Ok(Self::Table),
            "markdown" | "md" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            "json-pretty" | "jsonpretty" => Ok(Self::JsonPretty),
            "json-line" | "jsonline" | "jsonl" | "ndjson" => Ok(Self::JsonLine),
            "psv" | "pipe" => Ok(Self::Psv),
            _ => Err(format!(
                "Unknown output format '{}'. Valid formats: {}",
                s,
                Self::all_names().join(", ")
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_round_trips_names() {
        for name in OutputFormat::all_names() {
            let format = OutputFormat::from_str(name).unwrap();
            assert_eq!(format.to_string(), *name);
        }
    }

    #[test]
    fn test_output_format_aliases() {
        assert_eq!(OutputFormat::from_str("MD").unwrap(), OutputFormat::Markdown);
        assert_eq!(OutputFormat::from_str("ndjson").unwrap(), OutputFormat::JsonLine);
        assert_eq!(OutputFormat::from_str("pipe").unwrap(), OutputFormat::Psv);
        let err = OutputFormat::from_str("yaml").unwrap_err();
        assert!(err.contains("json-pretty"));
    }

    #[test]
    fn test_output_format_is_json() {
        assert!(OutputFormat::JsonLine.is_json());
        assert!(!OutputFormat::Psv.is_json());
        assert!(!OutputFormat::Table.is_json());
    }
}
