use crate::error::LeaseError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Markers describing the lease schedule template.
///
/// Every field has a default matching the standard register layout, so a
/// config file only needs to name what differs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Text that marks a page as carrying the lease schedule.
    pub table_header: String,
    /// Last phrase of the column header; the table body starts after it.
    pub start_marker: String,
    /// Regex for the page footer ("1 of 4"); the body ends before it.
    pub footer_pattern: String,
    /// Text closing the register on the final page.
    pub end_of_register: String,
    /// Fail instead of returning best-effort output when column offsets
    /// never reconcile across records.
    pub require_reconciliation: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            table_header: "Schedule of notices of leases".into(),
            start_marker: "and plan ref.".into(),
            footer_pattern: r"\n[ \t]*\d+ of \d+".into(),
            end_of_register: "End of register".into(),
            require_reconciliation: false,
        }
    }
}

/// Load a parser config from a JSON file.
pub fn load_config(path: &Path) -> Result<ParserConfig, LeaseError> {
    let content = std::fs::read_to_string(path).map_err(|e| LeaseError::ConfigLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_config(&content, path)
}

/// Parse a parser config from a JSON string.
pub fn parse_config(json: &str, source: &Path) -> Result<ParserConfig, LeaseError> {
    let config: ParserConfig = serde_json::from_str(json).map_err(|e| LeaseError::ConfigLoad {
        path: source.to_path_buf(),
        reason: e.to_string(),
    })?;
    validate_config(&config)?;
    Ok(config)
}

/// Validate that a config is usable.
pub fn validate_config(config: &ParserConfig) -> Result<(), LeaseError> {
    for (name, value) in [
        ("table_header", &config.table_header),
        ("start_marker", &config.start_marker),
        ("footer_pattern", &config.footer_pattern),
        ("end_of_register", &config.end_of_register),
    ] {
        if value.trim().is_empty() {
            return Err(LeaseError::ConfigInvalid(format!(
                "{name} must not be empty"
            )));
        }
    }

    Regex::new(&config.footer_pattern).map_err(|e| {
        LeaseError::ConfigInvalid(format!("footer_pattern is not a valid regex: {e}"))
    })?;

    Ok(())
}

/// A validated config with its footer pattern compiled.
#[derive(Debug, Clone)]
pub struct Template {
    pub table_header: String,
    pub start_marker: String,
    pub footer: Regex,
    pub end_of_register: String,
    pub require_reconciliation: bool,
}

impl Template {
    pub fn compile(config: &ParserConfig) -> Result<Template, LeaseError> {
        validate_config(config)?;
        let footer = Regex::new(&config.footer_pattern).map_err(|e| {
            LeaseError::ConfigInvalid(format!("footer_pattern is not a valid regex: {e}"))
        })?;

        Ok(Template {
            table_header: config.table_header.clone(),
            start_marker: config.start_marker.clone(),
            footer,
            end_of_register: config.end_of_register.clone(),
            require_reconciliation: config.require_reconciliation,
        })
    }
}
