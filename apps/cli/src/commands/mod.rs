//! # Commands
//!
//! One module per subcommand. Each command returns the text to print on
//! stdout; `lib.rs` does the printing and the exit-code mapping.
//!
//! ```text
//! ┌──────────┬───────────────────────────────────────────────────────────┐
//! │ parse    │ OCR text (file / stdin) ──► receipt                       │
//! │ scan     │ image ──► OCR engine ──► receipt (+ draft bill file)      │
//! │ split    │ bill file ──► per-person amounts                          │
//! │ config   │ effective configuration / its path                        │
//! └──────────┴───────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod parse;
pub mod scan;
pub mod split;

use serde::Serialize;

use crate::config::OutputFormat;
use crate::error::AppResult;

/// Renders `value` as pretty JSON or with the given text renderer.
pub(crate) fn render<T: Serialize>(
    format: OutputFormat,
    value: &T,
    text: impl FnOnce(&T) -> String,
) -> AppResult<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Text => Ok(text(value)),
    }
}
