//! # CLI Error Type
//!
//! Unified error type for every command.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  command fn ──► AppResult<()>                                           │
//! │       │                                                                 │
//! │       ├── CoreError / ValidationError ──► AppError::Core / Validation   │
//! │       ├── io / toml / json               ──► AppError::Io / Toml / Json │
//! │       └── OCR failure / timeout          ──► AppError::Ocr / OcrTimeout │
//! │                                                                         │
//! │  main ──► eprintln!("Error: {message}")         ──► exit code           │
//! │             2 = fix the input and run again                             │
//! │             1 = anything else                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! With `--json` the same error is printed to stdout as
//! `{"code": "UNASSIGNED_ITEMS", "message": "Please assign 1 remaining item"}`.

use std::path::PathBuf;

use serde::Serialize;
use tabsplit_core::{CoreError, ValidationError};
use thiserror::Error;

/// Result type alias for CLI operations.
pub type AppResult<T> = Result<T, AppError>;

/// Everything a command can fail with.
#[derive(Debug, Error)]
pub enum AppError {
    // =========================================================================
    // Domain Errors
    // =========================================================================
    /// Parse or bill-edit error from the core.
    #[error(transparent)]
    Core(CoreError),

    /// Bill is not ready to split.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    // =========================================================================
    // Input Errors
    // =========================================================================
    /// The bill file is well-formed TOML but not a valid bill.
    #[error("Invalid bill file {path}: {message}")]
    InvalidBill { path: PathBuf, message: String },

    /// Image format the OCR step does not accept.
    #[error("Unsupported image {0}: expected .jpg, .jpeg or .png")]
    UnsupportedImage(PathBuf),

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // =========================================================================
    // OCR Errors
    // =========================================================================
    /// The recognition engine failed or could not be started.
    #[error("Text recognition failed: {0}")]
    Ocr(String),

    /// The recognition engine did not finish in time.
    #[error("Text recognition timed out after {0} seconds")]
    OcrTimeout(u64),

    // =========================================================================
    // I/O and Serialization Errors
    // =========================================================================
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML encoding error: {0}")]
    TomlEncode(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A core validation error stays a validation error so it keeps its code.
impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(inner) => AppError::Validation(inner),
            other => AppError::Core(other),
        }
    }
}

// =============================================================================
// Error Codes
// =============================================================================

/// Machine-readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Parser found nothing usable; rescan
    ParseEmpty,
    /// No payer chosen
    NoPayer,
    /// Items left without a person
    UnassignedItems,
    /// Bill has no items
    EmptyBill,
    /// Any other input validation failure
    ValidationError,
    /// Bill file content is wrong
    InvalidBill,
    /// Item or person index out of range
    NotFound,
    /// Image type not accepted
    UnsupportedImage,
    /// Configuration is wrong
    ConfigError,
    /// OCR engine failed
    OcrFailed,
    /// OCR engine timed out
    OcrTimeout,
    /// File system error
    IoError,
    /// TOML or JSON (de)serialization error
    FormatError,
}

impl AppError {
    /// The stable error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Core(CoreError::ParseEmptyResult) => ErrorCode::ParseEmpty,
            AppError::Core(CoreError::ItemNotFound { .. })
            | AppError::Core(CoreError::PersonNotFound { .. }) => ErrorCode::NotFound,
            AppError::Core(_) => ErrorCode::ValidationError,
            AppError::Validation(ValidationError::NoPayerSelected) => ErrorCode::NoPayer,
            AppError::Validation(ValidationError::UnassignedItems { .. }) => {
                ErrorCode::UnassignedItems
            }
            AppError::Validation(ValidationError::EmptyBill) => ErrorCode::EmptyBill,
            AppError::Validation(_) => ErrorCode::ValidationError,
            AppError::InvalidBill { .. } => ErrorCode::InvalidBill,
            AppError::UnsupportedImage(_) => ErrorCode::UnsupportedImage,
            AppError::InvalidConfig(_) => ErrorCode::ConfigError,
            AppError::Ocr(_) => ErrorCode::OcrFailed,
            AppError::OcrTimeout(_) => ErrorCode::OcrTimeout,
            AppError::Io(_) => ErrorCode::IoError,
            AppError::Toml(_) | AppError::TomlEncode(_) | AppError::Json(_) => {
                ErrorCode::FormatError
            }
        }
    }

    /// True when re-running the stage with corrected input fixes it.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AppError::Core(_)
                | AppError::Validation(_)
                | AppError::InvalidBill { .. }
                | AppError::UnsupportedImage(_)
        )
    }

    /// Process exit code: 2 for recoverable input errors, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        if self.is_recoverable() {
            2
        } else {
            1
        }
    }

    /// Serializable form for `--json` output.
    pub fn to_report(&self) -> ErrorReport {
        ErrorReport {
            code: self.code(),
            message: self.to_string(),
        }
    }
}

/// What `--json` prints on failure.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorReport {
    pub code: ErrorCode,
    pub message: String,
}
