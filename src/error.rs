use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoanError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("No loan has been calculated yet; calculate a loan before viewing or exporting the schedule")]
    NoSession,

    #[error("Failed to generate {format}: {message}")]
    Export {
        format: &'static str,
        message: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LoanError {
    pub fn export(format: &'static str, message: impl Into<String>) -> Self {
        Self::Export {
            format,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LoanError>;
