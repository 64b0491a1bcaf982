//! `tabsplit config`: show the effective configuration.

use std::path::Path;

use crate::config::AppConfig;
use crate::error::AppResult;

/// The config as TOML, or with `show_path` the file it is read from.
pub fn run(config: &AppConfig, config_path: Option<&Path>, show_path: bool) -> AppResult<String> {
    if show_path {
        let path = config_path
            .map(Path::to_path_buf)
            .or_else(AppConfig::default_config_path);
        return Ok(match path {
            Some(path) => format!("{}\n", path.display()),
            None => "(no config directory on this platform)\n".to_string(),
        });
    }

    Ok(toml::to_string_pretty(config)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shows_effective_config() {
        let mut config = AppConfig::default();
        config.ocr.language = "deu".to_string();

        let out = run(&config, None, false).unwrap();
        let back: AppConfig = toml::from_str(&out).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_shows_explicit_path() {
        let out = run(&AppConfig::default(), Some(Path::new("/etc/tabsplit.toml")), true).unwrap();
        assert_eq!(out, "/etc/tabsplit.toml\n");
    }
}
