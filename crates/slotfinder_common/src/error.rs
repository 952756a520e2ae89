use std::fmt;
use thiserror::Error;

/// Errors reported by a calendar collaborator.
///
/// The availability engine treats these differently depending on the call:
/// timezone lookups degrade to a fallback, while a failed free/busy query
/// fails the whole request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    /// The request to the calendar backend could not be completed
    #[error("Transport error: {0}")]
    Transport(String),

    /// The calendar does not exist or is not visible
    #[error("Calendar not found: {0}")]
    NotFound(String),

    /// Credentials were rejected for this calendar
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The backend answered with something that could not be interpreted
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Error that doesn't fit into any other category
    #[error("Other error: {0}")]
    Other(String),
}

impl From<serde_json::Error> for DirectoryError {
    fn from(err: serde_json::Error) -> Self {
        DirectoryError::InvalidResponse(err.to_string())
    }
}

impl From<std::io::Error> for DirectoryError {
    fn from(err: std::io::Error) -> Self {
        DirectoryError::Transport(err.to_string())
    }
}

// Utility functions for error handling
pub fn transport_error<T: fmt::Display>(message: T) -> DirectoryError {
    DirectoryError::Transport(message.to_string())
}

pub fn not_found<T: fmt::Display>(message: T) -> DirectoryError {
    DirectoryError::NotFound(message.to_string())
}

pub fn invalid_response<T: fmt::Display>(message: T) -> DirectoryError {
    DirectoryError::InvalidResponse(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helpers_build_expected_variants() {
        assert_eq!(
            transport_error("connection reset"),
            DirectoryError::Transport("connection reset".to_string())
        );
        assert_eq!(
            not_found("bob@example.com").to_string(),
            "Calendar not found: bob@example.com"
        );
    }

    #[test]
    fn test_json_error_maps_to_invalid_response() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(matches!(
            DirectoryError::from(err),
            DirectoryError::InvalidResponse(_)
        ));
    }
}
