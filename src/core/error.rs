//! Error types for data file loading.

use thiserror::Error;

/// Errors that can occur when loading tuning or weapon data.
#[derive(Debug, Error)]
pub enum DataLoadError {
    /// File or directory could not be found.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// File could not be read.
    #[error("Failed to read file '{path}': {details}")]
    ReadError { path: String, details: String },

    /// RON parsing failed.
    #[error("Parse error in '{path}': {details}")]
    ParseError { path: String, details: String },

    /// A value that must be a finite, non-negative number is not.
    #[error("Invalid value in '{path}': {field} must be finite and non-negative, got {value}")]
    NegativeValue {
        path: String,
        field: &'static str,
        value: f32,
    },

    /// Two values that bound a range are out of order.
    #[error("Invalid range in '{path}': {details}")]
    InvalidRange { path: String, details: String },
}
