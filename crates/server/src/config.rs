use std::path::Path;

use serde::Deserialize;

use driftkv_common::DEFAULT_ADDRESS;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("falha ao ler arquivo de configuração: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON de configuração inválido: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Configuração do servidor. Precedência: defaults ← arquivo JSON ← flags.
/// `aof_path` vazio desabilita a persistência.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub address: String,
    pub aof_path: String,
}

impl Config {
    pub fn resolve(
        config_file: Option<&Path>,
        address_flag: Option<String>,
        aof_path_flag: Option<String>,
    ) -> Result<Config, ConfigError> {
        let mut config = Config {
            address: DEFAULT_ADDRESS.to_string(),
            aof_path: String::new(),
        };

        if let Some(path) = config_file {
            let raw = std::fs::read_to_string(path)?;
            let file_config: Config = serde_json::from_str(&raw)?;
            if !file_config.address.is_empty() {
                config.address = file_config.address;
            }
            if !file_config.aof_path.is_empty() {
                config.aof_path = file_config.aof_path;
            }
        }

        if let Some(address) = address_flag {
            config.address = address;
        }
        if let Some(aof_path) = aof_path_flag {
            config.aof_path = aof_path;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_without_file_or_flags() {
        let config = Config::resolve(None, None, None).unwrap();
        assert_eq!(config.address, DEFAULT_ADDRESS);
        assert!(config.aof_path.is_empty());
    }

    #[test]
    fn file_overrides_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"address": "127.0.0.1:7000", "aof_path": "/tmp/driftkv.aof"}}"#
        )
        .unwrap();

        let config = Config::resolve(Some(file.path()), None, None).unwrap();
        assert_eq!(config.address, "127.0.0.1:7000");
        assert_eq!(config.aof_path, "/tmp/driftkv.aof");
    }

    #[test]
    fn flags_override_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"address": "127.0.0.1:7000"}}"#).unwrap();

        let config = Config::resolve(
            Some(file.path()),
            Some("127.0.0.1:8000".into()),
            Some("custom.aof".into()),
        )
        .unwrap();
        assert_eq!(config.address, "127.0.0.1:8000");
        assert_eq!(config.aof_path, "custom.aof");
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"aof_path": "data.aof"}}"#).unwrap();

        let config = Config::resolve(Some(file.path()), None, None).unwrap();
        assert_eq!(config.address, DEFAULT_ADDRESS);
        assert_eq!(config.aof_path, "data.aof");
    }

    #[test]
    fn invalid_json_fails() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        assert!(matches!(
            Config::resolve(Some(file.path()), None, None),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_fails() {
        assert!(matches!(
            Config::resolve(Some(Path::new("/nonexistent/driftkv.json")), None, None),
            Err(ConfigError::Io(_))
        ));
    }
}
