use thiserror::Error;

pub type ParserResult<T> = Result<T, QueryParserError>;

/// Errors that abort a whole run
#[derive(Error, Debug)]
pub enum QueryParserError {
    #[error("Invalid column: {0}")]
    InvalidColumnSpec(String),

    #[error("Failed to read file: {0}")]
    SourceReadFailure(String),

    #[error("Failed to write output: {0}")]
    Output(String),

    #[error("Collation error: {0}")]
    Collation(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that drop a single data row and nothing else
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    #[error("row has no cell in column {column}")]
    MissingCell { column: String },

    #[error("cell is not valid UTF-8")]
    InvalidUtf8,

    #[error("cell holds spreadsheet error {0}")]
    CellError(String),

    #[error("item index in '{key}' does not fit in 32 bits")]
    IndexOverflow { key: String },

    #[error("item index {index} in '{key}' exceeds the limit of {limit}")]
    IndexOutOfRange { key: String, index: u32, limit: u32 },
}
