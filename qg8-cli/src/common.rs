//! Utilities shared between commands.

use anyhow::{Context, Result};
use qg8::CodecConfig;
use std::fs;
use tracing_subscriber::EnvFilter;

/// Install a stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise the level follows the `-v` count,
/// starting at `warn`.
pub fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // Ignore a second install attempt
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Load a codec config JSON file, or the defaults when no path is given.
pub fn load_config(config_path: Option<&str>) -> Result<CodecConfig> {
    let Some(path) = config_path else {
        return Ok(CodecConfig::default());
    };

    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path))?;

    serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse config: {}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // ==================== load_config tests ====================

    #[test]
    fn test_load_config_none_uses_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config, CodecConfig::default());
    }

    #[test]
    fn test_load_config_success() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.json");
        fs::write(&config_path, r#"{"strict_reserved": true, "verify_payload_len": false}"#).unwrap();

        let config = load_config(Some(config_path.to_str().unwrap())).unwrap();
        assert!(config.is_strict_reserved());
        assert!(!config.should_verify_payload_len());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config(Some("/nonexistent/config.json"));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Failed to read config"));
    }

    #[test]
    fn test_load_config_invalid_json() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.json");
        fs::write(&config_path, "not valid json").unwrap();

        let result = load_config(Some(config_path.to_str().unwrap()));
        assert!(result.unwrap_err().to_string().contains("Failed to parse config"));
    }
}
