use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RentBuyError {
    #[error("Invalid parameter: {field}: {reason}")]
    InvalidParameter { field: String, reason: String },

    #[error("Arithmetic overflow in {context}")]
    Overflow { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl RentBuyError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        RentBuyError::InvalidParameter {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for RentBuyError {
    fn from(e: serde_json::Error) -> Self {
        RentBuyError::SerializationError(e.to_string())
    }
}
