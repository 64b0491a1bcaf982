//! `tabsplit parse`: OCR text in, receipt out.

use std::io::Read;
use std::path::Path;

use tabsplit_core::report::render_receipt;
use tabsplit_core::ReceiptParser;
use tracing::debug;

use super::render;
use crate::config::OutputFormat;
use crate::error::AppResult;

/// Reads OCR text from `input` (or stdin) and parses it.
pub fn run(input: Option<&Path>, format: OutputFormat) -> AppResult<String> {
    let text = match input {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    debug!(bytes = text.len(), "OCR text read");

    parse_text(&text, format)
}

/// Parses already-read text. Nothing detected is an error.
pub fn parse_text(text: &str, format: OutputFormat) -> AppResult<String> {
    let receipt = ReceiptParser.parse(text).ensure_detected()?;
    render(format, &receipt, render_receipt)
}
