//! Job configuration
//!
//! A run can be described in a small YAML file so recurring exports do not
//! need the same flags every time:
//!
//! ```yaml
//! column: C
//! separate_items: true
//! output: orders_parsed.csv
//! sheet: Orders
//! ```
//!
//! Command-line flags override values from the file.

use crate::error::{ParserResult, QueryParserError};
use crate::table::DEFAULT_OUTPUT;
use crate::types::ItemMode;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Contents of a job file; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobConfig {
    pub column: Option<String>,
    pub separate_items: Option<bool>,
    pub output: Option<PathBuf>,
    pub sheet: Option<String>,
}

impl JobConfig {
    /// Load a job file
    pub fn load(path: &Path) -> ParserResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            QueryParserError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> ParserResult<Self> {
        // An empty file is a valid (empty) job
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub column: Option<String>,
    /// `Some(true)` for `--separate-items`, `Some(false)` for `--combined`
    pub separate_items: Option<bool>,
    pub output: Option<PathBuf>,
    pub sheet: Option<String>,
}

/// Fully resolved settings for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    pub column: String,
    pub mode: ItemMode,
    pub output: PathBuf,
    pub sheet: Option<String>,
}

impl ParseOptions {
    /// Merge a job file (if any) with command-line values
    pub fn resolve(config: Option<JobConfig>, cli: CliOverrides) -> ParserResult<Self> {
        let config = config.unwrap_or_default();

        let column = cli.column.or(config.column).ok_or_else(|| {
            QueryParserError::Config(
                "no column given: pass --column or set 'column' in the job file".to_string(),
            )
        })?;

        let separate = cli
            .separate_items
            .or(config.separate_items)
            .unwrap_or(false);

        Ok(Self {
            column,
            mode: ItemMode::from_flag(separate),
            output: cli
                .output
                .or(config.output)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
            sheet: cli.sheet.or(config.sheet),
        })
    }
}
