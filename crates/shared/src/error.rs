use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Local, pre-network rejection. Recoverable by correcting input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum ValidationError {
    #[error("All fields are required")]
    AllFieldsRequired,
    #[error("Password must be at least 6 characters")]
    PasswordTooShort,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Please enter a valid email")]
    InvalidEmail,
    #[error("Please enter a word to search")]
    EmptyTerm,
    #[error("No results found")]
    NoResults,
}

impl ValidationError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::AllFieldsRequired => "AllFieldsRequired",
            Self::PasswordTooShort => "PasswordTooShort",
            Self::PasswordMismatch => "PasswordMismatch",
            Self::InvalidEmail => "InvalidEmail",
            Self::EmptyTerm => "EmptyTerm",
            Self::NoResults => "NoResults",
        }
    }
}

/// Error document returned by the service, `{ "message": ... }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}
