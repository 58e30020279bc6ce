use std::fs;
use std::path::{Path, PathBuf};

use vecthor_core::{EngineConfig, FinancialInput, VecthorError};

/// On-disk encodings accepted for an engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Json,
    Yaml,
}

impl ConfigFormat {
    /// `.yaml`/`.yml` select YAML; any other extension is read as JSON.
    fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                ConfigFormat::Yaml
            }
            _ => ConfigFormat::Json,
        }
    }
}

/// Financial record stored as JSON.
pub fn read_record(path: &str) -> Result<FinancialInput, Box<dyn std::error::Error>> {
    let (location, body) = load(path)?;
    let record = serde_json::from_str(&body)
        .map_err(|e| VecthorError::SerializationError(format!("'{}': {e}", location.display())))?;
    Ok(record)
}

/// Engine configuration, validated before it is returned.
pub fn read_config(path: &str) -> Result<EngineConfig, Box<dyn std::error::Error>> {
    let (location, body) = load(path)?;
    let config = parse_config(&body, ConfigFormat::from_path(&location))
        .map_err(|reason| VecthorError::SerializationError(format!("'{}': {reason}", location.display())))?;
    config.validate()?;
    tracing::debug!(path = %location.display(), "engine configuration loaded");
    Ok(config)
}

fn parse_config(body: &str, format: ConfigFormat) -> Result<EngineConfig, String> {
    match format {
        ConfigFormat::Yaml => serde_yaml::from_str(body).map_err(|e| e.to_string()),
        ConfigFormat::Json => serde_json::from_str(body).map_err(|e| e.to_string()),
    }
}

/// Read a regular file, relative paths taken from the working directory.
fn load(path: &str) -> Result<(PathBuf, String), Box<dyn std::error::Error>> {
    let requested = Path::new(path);
    let location = if requested.is_absolute() {
        requested.to_path_buf()
    } else {
        std::env::current_dir()?.join(requested)
    };

    let metadata = fs::metadata(&location).map_err(|_| VecthorError::InvalidInput {
        field: "path".into(),
        reason: format!("{} does not exist", location.display()),
    })?;
    if !metadata.is_file() {
        return Err(VecthorError::InvalidInput {
            field: "path".into(),
            reason: format!("{} is not a regular file", location.display()),
        }
        .into());
    }

    let body = fs::read_to_string(&location)
        .map_err(|e| format!("cannot read {}: {e}", location.display()))?;
    Ok((location, body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_format_from_extension() {
        assert_eq!(ConfigFormat::from_path(Path::new("engine.yaml")), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path(Path::new("engine.YML")), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path(Path::new("engine.json")), ConfigFormat::Json);
        assert_eq!(ConfigFormat::from_path(Path::new("engine")), ConfigFormat::Json);
    }

    #[test]
    fn test_partial_yaml_config_keeps_defaults() {
        let config = parse_config("bands:\n  low: 0.3\n  high: 0.7\n", ConfigFormat::Yaml).unwrap();
        assert_eq!(config.bands.low.to_string(), "0.3");
        assert_eq!(config.regimes, EngineConfig::default().regimes);
    }

    #[test]
    fn test_missing_file_is_reported() {
        let err = read_record("no/such/record.json").unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_directory_is_not_a_record() {
        let dir = std::env::temp_dir();
        let err = read_record(&dir.to_string_lossy()).unwrap_err();
        assert!(err.to_string().contains("not a regular file"));
    }
}
