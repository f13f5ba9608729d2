use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

pub const DEFAULT_OLLAMA_HOST: &str = "http://localhost:11434";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllabenchConfig {
    #[serde(default)]
    pub ollama: OllamaConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    "en".to_string()
}

impl Default for OllabenchConfig {
    fn default() -> Self {
        Self {
            ollama: OllamaConfig::default(),
            defaults: DefaultsConfig::default(),
            language: default_language(),
        }
    }
}

impl OllabenchConfig {
    /// Read a JSON config file. Missing sections fall back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.defaults.format.parse::<OutputFormat>()?;
        Ok(config)
    }

    /// `OLLAMA_HOST` overrides whatever the file said.
    pub fn apply_env(&mut self) {
        if let Ok(host) = std::env::var("OLLAMA_HOST") {
            if !host.trim().is_empty() {
                self.ollama.host = host;
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    pub host: String,
    /// Per-request timeout. A stalled server would otherwise block the run forever.
    pub timeout_secs: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_OLLAMA_HOST.to_string(),
            timeout_secs: 300,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    pub trials: u32,
    pub warmup_runs: u32,
    pub prompt_file: PathBuf,
    pub format: String,
    pub output_dir: PathBuf,
    pub tokens_only: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            trials: 3,
            warmup_runs: 0,
            prompt_file: PathBuf::from("prompts.txt"),
            format: "txt".to_string(),
            output_dir: PathBuf::from("."),
            tokens_only: false,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Csv,
    Json,
    #[default]
    Txt,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
            OutputFormat::Txt => "txt",
        }
    }

    pub fn all() -> &'static [OutputFormat] {
        &[OutputFormat::Csv, OutputFormat::Json, OutputFormat::Txt]
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            "txt" => Ok(OutputFormat::Txt),
            other => Err(ConfigError::InvalidFormat(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parse() {
        assert_eq!("CSV".parse::<OutputFormat>(), Ok(OutputFormat::Csv));
        assert_eq!(" json ".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!(
            "xml".parse::<OutputFormat>(),
            Err(ConfigError::InvalidFormat("xml".to_string()))
        );
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: OllabenchConfig =
            serde_json::from_str(r#"{"ollama": {"host": "http://gpu-box:11434", "timeout_secs": 30}}"#)
                .unwrap();
        assert_eq!(config.ollama.host, "http://gpu-box:11434");
        assert_eq!(config.defaults.trials, 3);
        assert_eq!(config.defaults.format, "txt");
        assert_eq!(config.language, "en");
    }

    #[test]
    fn test_default_config() {
        let config = OllabenchConfig::default();
        assert_eq!(config.ollama.host, DEFAULT_OLLAMA_HOST);
        assert_eq!(config.language, "en");

        let partial: DefaultsConfig = serde_json::from_str(r#"{"trials": 7}"#).unwrap();
        assert_eq!(partial.trials, 7);
        assert_eq!(partial.format, "txt");
    }

    #[test]
    fn test_load_rejects_bad_format() {
        let dir = std::env::temp_dir().join(format!("ollabench-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");
        std::fs::write(&path, r#"{"defaults": {"format": "xml"}}"#).unwrap();

        let err = OllabenchConfig::load(&path).unwrap_err();
        assert!(matches!(err, crate::OllabenchError::Config(ConfigError::InvalidFormat(_))));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
