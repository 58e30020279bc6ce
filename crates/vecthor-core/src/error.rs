use thiserror::Error;

/// Caller errors. Problems with the financial figures themselves never show
/// up here; they make individual metrics not applicable instead.
#[derive(Debug, Error)]
pub enum VecthorError {
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for VecthorError {
    fn from(e: serde_json::Error) -> Self {
        VecthorError::SerializationError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_message_names_field() {
        let e = VecthorError::InvalidInput {
            field: "bands".into(),
            reason: "low threshold exceeds high".into(),
        };
        assert_eq!(e.to_string(), "Invalid input: bands: low threshold exceeds high");
    }

    #[test]
    fn test_json_error_converts() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(matches!(VecthorError::from(err), VecthorError::SerializationError(_)));
    }
}
