//! Options loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::LogOptions;
use crate::config::validation::validate_options;
use crate::error::ConfigError;

/// Parse options from TOML text and validate them.
pub fn parse_options(content: &str) -> Result<LogOptions, ConfigError> {
    let options: LogOptions = toml::from_str(content)?;
    validate_options(&options).map_err(ConfigError::Validation)?;
    Ok(options)
}

/// Load and validate options from a TOML file.
pub fn load_options(path: &Path) -> Result<LogOptions, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_options(&content)
}
