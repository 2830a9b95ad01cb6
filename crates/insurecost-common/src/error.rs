use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum InsureCostError {
    #[error("Unknown form field: {0}")]
    UnknownField(String),

    #[error("{field} must be a whole number, got \"{value}\"")]
    InvalidInteger { field: &'static str, value: String },

    #[error("{field} must be a number, got \"{value}\"")]
    InvalidNumber { field: &'static str, value: String },

    #[error("{field} must be one of {allowed}, got \"{value}\"")]
    InvalidChoice {
        field: &'static str,
        allowed: &'static str,
        value: String,
    },
}

pub type Result<T> = std::result::Result<T, InsureCostError>;
