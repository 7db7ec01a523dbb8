use thiserror::Error;

pub type DatasheetResult<T> = Result<T, DatasheetError>;

#[derive(Error, Debug)]
pub enum DatasheetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// No naming rule recovered a device identity from this filename.
    #[error("Cannot determine lot_id and dev_num from filename: {filename}")]
    Parse { filename: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Import error: {0}")]
    Import(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),
}

impl DatasheetError {
    pub fn parse(filename: impl Into<String>) -> Self {
        DatasheetError::Parse {
            filename: filename.into(),
        }
    }
}
