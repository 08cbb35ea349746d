//! Configuration structures for the analysis pipeline.

use serde::{Deserialize, Serialize};

use super::order::{ANCHOR_PHRASE, DEFAULT_EXPORT_NAME};

/// Main configuration for orderscan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Completion API configuration.
    pub llm: LlmConfig,

    /// Markdown table parsing configuration.
    pub table: TableConfig,

    /// Export configuration.
    pub export: ExportConfig,
}

/// Completion API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// API base URL (the client appends `/chat/completions`).
    pub base_url: String,

    /// Model name sent with each request.
    pub model: String,

    /// Environment variable holding the bearer token.
    pub api_key_env: String,

    /// Inline bearer token. Takes precedence over the environment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Sampling temperature. Omitted from requests when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Request timeout in seconds. The HTTP client default applies when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.deepseek.com/v1".to_string(),
            model: "deepseek-chat".to_string(),
            api_key_env: "DEEPSEEK_API_KEY".to_string(),
            api_key: None,
            temperature: None,
            timeout_secs: None,
        }
    }
}

/// Markdown table parsing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Text that identifies the header row.
    pub anchor: String,

    /// Column separator.
    pub separator: char,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            anchor: ANCHOR_PHRASE.to_string(),
            separator: '|',
        }
    }
}

/// Export configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Default output file name.
    pub file_name: String,

    /// Prefix CSV output with a UTF-8 byte-order mark.
    pub bom: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_name: DEFAULT_EXPORT_NAME.to_string(),
            bom: true,
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Resolve the API bearer token.
    ///
    /// The inline secret wins over the environment variable. Blank values
    /// count as missing.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.llm
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| {
                std::env::var(&self.llm.api_key_env)
                    .ok()
                    .filter(|k| !k.trim().is_empty())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.llm.model, "deepseek-chat");
        assert_eq!(config.llm.api_key_env, "DEEPSEEK_API_KEY");
        assert_eq!(config.table.anchor, ANCHOR_PHRASE);
        assert_eq!(config.table.separator, '|');
        assert!(config.export.bom);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{"llm": {"model": "other"}}"#).unwrap();
        assert_eq!(config.llm.model, "other");
        assert_eq!(config.llm.base_url, "https://api.deepseek.com/v1");
        assert_eq!(config.export.file_name, DEFAULT_EXPORT_NAME);
    }

    #[test]
    fn test_inline_key_wins() {
        let mut config = AppConfig::default();
        config.llm.api_key = Some("sk-inline".to_string());
        config.llm.api_key_env = "ORDERSCAN_TEST_UNUSED_KEY".to_string();
        assert_eq!(config.resolve_api_key(), Some("sk-inline".to_string()));
    }

    #[test]
    fn test_blank_key_is_missing() {
        let mut config = AppConfig::default();
        config.llm.api_key = Some("   ".to_string());
        config.llm.api_key_env = "ORDERSCAN_TEST_SURELY_UNSET_KEY".to_string();
        assert_eq!(config.resolve_api_key(), None);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = AppConfig::default();
        config.llm.timeout_secs = Some(30);
        config.save(&path).unwrap();

        let loaded = AppConfig::from_file(&path).unwrap();
        assert_eq!(loaded.llm.timeout_secs, Some(30));
        assert_eq!(loaded.table.anchor, config.table.anchor);
    }
}
