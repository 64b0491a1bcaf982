//! `tabsplit scan`: image in, receipt (and optionally a draft bill) out.

use std::path::Path;

use tabsplit_core::report::render_receipt;
use tabsplit_core::BillState;

use super::render;
use crate::bill_file::BillFile;
use crate::config::{OcrSettings, OutputFormat};
use crate::error::AppResult;
use crate::ocr::{scan_receipt, TextRecognizer};

/// What to do with a scanned image.
#[derive(Debug, Clone, Default)]
pub struct ScanRequest<'a> {
    pub people: &'a [String],
    pub bill_out: Option<&'a Path>,
    pub format: OutputFormat,
}

/// Recognizes `image`, prints the receipt and writes the draft bill if asked.
///
/// The draft has every item unassigned and no payer; the user fills those
/// in and runs `split`.
pub async fn run<R: TextRecognizer>(
    recognizer: &R,
    image: &Path,
    settings: &OcrSettings,
    request: ScanRequest<'_>,
) -> AppResult<String> {
    let receipt = scan_receipt(recognizer, image, settings).await?;

    let mut out = render(request.format, &receipt, render_receipt)?;

    if let Some(path) = request.bill_out {
        let bill = BillState::from_receipt(request.people, &receipt)?;
        BillFile::from(&bill).save(path)?;
        if request.format == OutputFormat::Text {
            out.push_str(&format!("\nDraft bill written to {}\n", path.display()));
        }
    }

    Ok(out)
}
