//! # CLI Configuration
//!
//! Configuration for the OCR step, output format and logging.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     TABSPLIT_OCR_COMMAND=/opt/bin/tesseract                            │
//! │     TABSPLIT_OUTPUT_FORMAT=json                                        │
//! │                                                                         │
//! │  2. TOML Config File (--config, or the platform default)               │
//! │     ~/.config/tabsplit/config.toml (Linux)                             │
//! │     ~/Library/Application Support/com.tabsplit.tabsplit/config.toml    │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     tesseract, 30s timeout, 2 retries, text output                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [ocr]
//! command = "tesseract"
//! args = ["{image}", "stdout", "-l", "{language}"]
//! language = "eng"
//! timeout_secs = 30
//! max_retries = 2
//!
//! [output]
//! format = "text"  # text | json
//!
//! [logging]
//! filter = "info,tabsplit=debug"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};

/// Placeholder in `ocr.args` replaced by the image path.
pub const IMAGE_PLACEHOLDER: &str = "{image}";

/// Placeholder in `ocr.args` replaced by `ocr.language`.
pub const LANGUAGE_PLACEHOLDER: &str = "{language}";

// =============================================================================
// Output Format
// =============================================================================

/// How command results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Human-readable report.
    #[default]
    Text,

    /// Pretty-printed JSON on stdout.
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(AppError::InvalidConfig(format!(
                "Unknown output format: '{}'. Valid options: text, json",
                other
            ))),
        }
    }
}

// =============================================================================
// OCR Settings
// =============================================================================

/// How to run the external text recognition engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcrSettings {
    /// Executable to run.
    #[serde(default = "default_command")]
    pub command: String,

    /// Arguments; `{image}` and `{language}` are substituted.
    #[serde(default = "default_args")]
    pub args: Vec<String>,

    /// Recognition language passed through `{language}`.
    #[serde(default = "default_language")]
    pub language: String,

    /// Per-attempt time limit (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Extra attempts after the first failure (0 = try once).
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// First wait between attempts (milliseconds).
    #[serde(default = "default_initial_backoff")]
    pub initial_backoff_ms: u64,

    /// Longest wait between attempts (seconds).
    #[serde(default = "default_max_backoff")]
    pub max_backoff_secs: u64,
}

fn default_command() -> String {
    "tesseract".to_string()
}

fn default_args() -> Vec<String> {
    vec![
        IMAGE_PLACEHOLDER.to_string(),
        "stdout".to_string(),
        "-l".to_string(),
        LANGUAGE_PLACEHOLDER.to_string(),
    ]
}

fn default_language() -> String {
    "eng".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    2
}

fn default_initial_backoff() -> u64 {
    500
}

fn default_max_backoff() -> u64 {
    10
}

impl Default for OcrSettings {
    fn default() -> Self {
        OcrSettings {
            command: default_command(),
            args: default_args(),
            language: default_language(),
            timeout_secs: default_timeout(),
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff(),
            max_backoff_secs: default_max_backoff(),
        }
    }
}

impl OcrSettings {
    /// Per-attempt time limit.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }

    pub fn max_backoff(&self) -> Duration {
        Duration::from_secs(self.max_backoff_secs)
    }

    /// Arguments for one run, with placeholders filled in.
    pub fn args_for(&self, image: &Path) -> Vec<String> {
        let image = image.to_string_lossy();
        self.args
            .iter()
            .map(|arg| {
                arg.replace(IMAGE_PLACEHOLDER, &image)
                    .replace(LANGUAGE_PLACEHOLDER, &self.language)
            })
            .collect()
    }
}

// =============================================================================
// Output / Logging Settings
// =============================================================================

/// Output settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(default)]
    pub format: OutputFormat,
}

/// Logging settings. `RUST_LOG` still wins when set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_filter")]
    pub filter: String,
}

fn default_filter() -> String {
    "info,tabsplit=debug".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            filter: default_filter(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub ocr: OcrSettings,

    #[serde(default)]
    pub output: OutputSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (config.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> AppResult<()> {
        if self.ocr.command.trim().is_empty() {
            return Err(AppError::InvalidConfig("ocr.command must not be empty".into()));
        }

        if !self.ocr.args.iter().any(|arg| arg.contains(IMAGE_PLACEHOLDER)) {
            return Err(AppError::InvalidConfig(format!(
                "ocr.args must contain {}",
                IMAGE_PLACEHOLDER
            )));
        }

        if self.ocr.timeout_secs == 0 {
            return Err(AppError::InvalidConfig(
                "ocr.timeout_secs must be greater than 0".into(),
            ));
        }

        if self.ocr.initial_backoff() > self.ocr.max_backoff() {
            return Err(AppError::InvalidConfig(
                "ocr.initial_backoff_ms must not exceed ocr.max_backoff_secs".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup (the environment in production).
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(command) = lookup("TABSPLIT_OCR_COMMAND") {
            debug!(command = %command, "Overriding OCR command from environment");
            self.ocr.command = command;
        }

        if let Some(language) = lookup("TABSPLIT_OCR_LANGUAGE") {
            self.ocr.language = language;
        }

        if let Some(timeout) = lookup("TABSPLIT_OCR_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(secs) => self.ocr.timeout_secs = secs,
                Err(_) => warn!(value = %timeout, "Ignoring invalid TABSPLIT_OCR_TIMEOUT_SECS"),
            }
        }

        if let Some(retries) = lookup("TABSPLIT_OCR_MAX_RETRIES") {
            match retries.parse::<u32>() {
                Ok(n) => self.ocr.max_retries = n,
                Err(_) => warn!(value = %retries, "Ignoring invalid TABSPLIT_OCR_MAX_RETRIES"),
            }
        }

        if let Some(format) = lookup("TABSPLIT_OUTPUT_FORMAT") {
            match format.parse() {
                Ok(parsed) => {
                    debug!(format = %format, "Overriding output format from environment");
                    self.output.format = parsed;
                }
                Err(_) => warn!(format = %format, "Unknown output format in environment"),
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "tabsplit", "tabsplit")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.ocr.command, "tesseract");
        assert_eq!(config.ocr.max_retries, 2);
        assert_eq!(config.output.format, OutputFormat::Text);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_args_substitution() {
        let settings = OcrSettings::default();
        let args = settings.args_for(Path::new("/tmp/receipt.jpg"));
        assert_eq!(args, vec!["/tmp/receipt.jpg", "stdout", "-l", "eng"]);
    }

    #[test]
    fn test_config_validation() {
        let mut config = AppConfig::default();

        config.ocr.timeout_secs = 0;
        assert!(config.validate().is_err());

        config.ocr.timeout_secs = 10;
        config.ocr.args = vec!["stdout".to_string()];
        assert!(config.validate().is_err());

        config.ocr.args = default_args();
        config.ocr.initial_backoff_ms = 60_000;
        config.ocr.max_backoff_secs = 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file_keeps_defaults_for_missing_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[ocr]\ntimeout_secs = 5\n\n[output]\nformat = \"json\"").unwrap();

        let config = AppConfig::load(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.ocr.timeout_secs, 5);
        assert_eq!(config.ocr.command, "tesseract");
        assert_eq!(config.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(Some(dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.ocr, OcrSettings::default());
    }

    #[test]
    fn test_load_bad_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[ocr\nbroken").unwrap();

        let err = AppConfig::load(Some(file.path().to_path_buf())).unwrap_err();
        assert!(matches!(err, crate::error::AppError::Toml(_)));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("TABSPLIT_OCR_COMMAND", "/opt/ocr"),
            ("TABSPLIT_OCR_MAX_RETRIES", "5"),
            ("TABSPLIT_OCR_TIMEOUT_SECS", "soon"),
            ("TABSPLIT_OUTPUT_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.ocr.command, "/opt/ocr");
        assert_eq!(config.ocr.max_retries, 5);
        assert_eq!(config.ocr.timeout_secs, 30);
        assert_eq!(config.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_toml_serialization() {
        let toml_str = toml::to_string_pretty(&AppConfig::default()).unwrap();
        assert!(toml_str.contains("[ocr]"));
        assert!(toml_str.contains("[output]"));
        assert!(toml_str.contains("[logging]"));
    }
}
