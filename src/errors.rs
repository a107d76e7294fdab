use thiserror::Error;

#[derive(Debug, Error)]
pub enum OptOutError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Failed to interact with AWS Organizations: {0}")]
    AwsError(String),

    #[error("No roots found in the organization")]
    NoRoots,

    #[error("Failed to serialize policy data: {0}")]
    Serialization(String),
}

impl OptOutError {
    /// HTTP status reported for this error at the handler boundary.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            OptOutError::InvalidInput(_) => 400,
            _ => 500,
        }
    }
}

impl From<serde_json::Error> for OptOutError {
    fn from(error: serde_json::Error) -> Self {
        OptOutError::Serialization(error.to_string())
    }
}
