use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Classifier returned HTTP {status} for {endpoint}")]
    ClassifierStatus { endpoint: String, status: u16 },

    #[error("Classifier unavailable: {0}")]
    ClassifierUnavailable(String),

    #[error("Username must not be blank")]
    BlankUsername,

    #[error("Nothing to export: transaction history is empty")]
    NothingToExport,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;
