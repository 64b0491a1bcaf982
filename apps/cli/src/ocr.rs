//! # OCR Collaborator
//!
//! Runs the external text recognition engine and hands its text to the
//! receipt parser.
//!
//! ## Attempt Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  scan_receipt(recognizer, image, settings)                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  check extension (.jpg / .jpeg / .png) and that the file exists         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌──────────┐  ok   ┌──────────────────────────┐                        │
//! │  │ attempt  │ ────► │ parse() + ensure_detected│ ──► ParsedReceipt      │
//! │  │ (timeout)│       └──────────────────────────┘                        │
//! │  └────┬─────┘                                                           │
//! │       │ Ocr / OcrTimeout                                                │
//! │       ▼                                                                 │
//! │  retries left? ── no ──► error                                          │
//! │       │ yes                                                             │
//! │       ▼                                                                 │
//! │  sleep(exponential backoff: 500ms, 1s, 2s ... max) ──► attempt again    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Dropping the returned future cancels the scan; the engine process is
//! killed with it.

use std::future::Future;
use std::path::Path;

use backoff::backoff::Backoff;
use backoff::ExponentialBackoff;
use tabsplit_core::{parse, ParsedReceipt};
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::config::OcrSettings;
use crate::error::{AppError, AppResult};

/// Image extensions the scan step accepts (lower case).
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

// =============================================================================
// Recognizer Trait
// =============================================================================

/// Anything that can turn an image into plain multi-line text.
pub trait TextRecognizer {
    fn recognize_text(&self, image: &Path) -> impl Future<Output = AppResult<String>> + Send;
}

/// Runs a command-line OCR engine (tesseract by default) and reads stdout.
#[derive(Debug, Clone)]
pub struct CommandRecognizer {
    settings: OcrSettings,
}

impl CommandRecognizer {
    pub fn new(settings: OcrSettings) -> Self {
        CommandRecognizer { settings }
    }
}

impl TextRecognizer for CommandRecognizer {
    async fn recognize_text(&self, image: &Path) -> AppResult<String> {
        let args = self.settings.args_for(image);
        debug!(command = %self.settings.command, ?args, "Running OCR engine");

        let output = Command::new(&self.settings.command)
            .args(&args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                AppError::InvalidConfig(format!(
                    "cannot run OCR command '{}': {}",
                    self.settings.command, e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::Ocr(format!(
                "'{}' exited with {}: {}",
                self.settings.command,
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

// =============================================================================
// Scan Pipeline
// =============================================================================

/// Recognizes the image and parses the text into a receipt.
///
/// Fails with `ParseEmptyResult` when the text holds nothing usable, so the
/// caller can ask for a better photo.
pub async fn scan_receipt<R: TextRecognizer>(
    recognizer: &R,
    image: &Path,
    settings: &OcrSettings,
) -> AppResult<ParsedReceipt> {
    check_image(image)?;

    let text = recognize_with_retry(recognizer, image, settings).await?;
    let receipt = parse(&text).ensure_detected()?;

    info!(
        image = %image.display(),
        items = receipt.items.len(),
        total = %receipt.total,
        "Receipt scanned"
    );
    Ok(receipt)
}

/// Accepts only existing files with a supported extension.
pub fn check_image(image: &Path) -> AppResult<()> {
    let supported = image
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false);

    if !supported {
        return Err(AppError::UnsupportedImage(image.to_path_buf()));
    }

    if !image.is_file() {
        return Err(AppError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("image not found: {}", image.display()),
        )));
    }

    Ok(())
}

/// One attempt plus up to `max_retries` more, each under the time limit.
pub async fn recognize_with_retry<R: TextRecognizer>(
    recognizer: &R,
    image: &Path,
    settings: &OcrSettings,
) -> AppResult<String> {
    let mut backoff = create_backoff(settings);
    let mut attempt = 0u32;

    loop {
        attempt += 1;

        let result = match timeout(settings.timeout(), recognizer.recognize_text(image)).await {
            Ok(result) => result,
            Err(_) => Err(AppError::OcrTimeout(settings.timeout_secs)),
        };

        let err = match result {
            Ok(text) => {
                debug!(attempt, bytes = text.len(), "OCR succeeded");
                return Ok(text);
            }
            Err(err) => err,
        };

        if !is_retryable(&err) || attempt > settings.max_retries {
            warn!(attempt, error = %err, "OCR failed, giving up");
            return Err(err);
        }

        let delay = backoff
            .next_backoff()
            .unwrap_or_else(|| settings.max_backoff());
        warn!(attempt, ?delay, error = %err, "OCR failed, retrying");
        tokio::time::sleep(delay).await;
    }
}

fn is_retryable(err: &AppError) -> bool {
    matches!(err, AppError::Ocr(_) | AppError::OcrTimeout(_))
}

fn create_backoff(settings: &OcrSettings) -> ExponentialBackoff {
    // next_backoff() grows from current_interval, not initial_interval.
    ExponentialBackoff {
        current_interval: settings.initial_backoff(),
        initial_interval: settings.initial_backoff(),
        max_interval: settings.max_backoff(),
        multiplier: 2.0,
        max_elapsed_time: None,
        ..Default::default()
    }
}
