use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransferError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Fetch of {url} failed with status {status}")]
    Fetch { url: String, status: u16 },

    #[error("Invalid player URL: {0}")]
    InvalidUrl(String),

    #[error("Player name heading not found on page")]
    MissingHeading,

    #[error("Transfer table not found (looked for {markers:?})")]
    TableNotFound { markers: Vec<String> },

    #[error("Transfer table is empty")]
    EmptyTable,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Dataset table not found: {0}")]
    DatasetTableMissing(String),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl TransferError {
    /// Failures caused by the remote page or its markup rather than by local setup.
    pub fn is_page_failure(&self) -> bool {
        matches!(
            self,
            TransferError::Http(_)
                | TransferError::Fetch { .. }
                | TransferError::MissingHeading
                | TransferError::TableNotFound { .. }
                | TransferError::EmptyTable
        )
    }
}

pub type Result<T> = std::result::Result<T, TransferError>;
