use thiserror::Error;

#[derive(Debug, Error)]
pub enum DealAnalyzerError {
    #[error("Invalid deal input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Unknown sensitivity axis '{0}'")]
    UnknownSensitivityAxis(String),

    #[error("Empty sweep: no values supplied for axis {0}")]
    EmptySweep(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl DealAnalyzerError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        DealAnalyzerError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for DealAnalyzerError {
    fn from(e: serde_json::Error) -> Self {
        DealAnalyzerError::SerializationError(e.to_string())
    }
}
