//! User configuration: provider, scan filters, and token budget. Stored as
//! TOML under the platform config dir; every field has a serde default so a
//! partial file keeps working across releases. API keys come from env only.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::provider::ProviderKind;

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub budget: BudgetConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub model: String,
    /// Override endpoint (self-hosted gateways, non-default Ollama hosts).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    pub temperature: f32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::Ollama,
            model: "llama3.2".to_string(),
            base_url: None,
            temperature: 0.2,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScanConfig {
    pub extensions: Vec<String>,
    pub exclude_dirs: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: vec![
                "py".into(),
                "js".into(),
                "ts".into(),
                "java".into(),
                "cpp".into(),
                "cs".into(),
                "rb".into(),
                "go".into(),
                "rs".into(),
            ],
            exclude_dirs: vec![
                ".git".into(),
                "__pycache__".into(),
                "node_modules".into(),
                "venv".into(),
                ".venv".into(),
                "target".into(),
                "vendor".into(),
            ],
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BudgetConfig {
    /// Input capacity per capability call, in estimated tokens.
    #[serde(default = "BudgetConfig::default_max_input_tokens")]
    pub max_input_tokens: usize,
}

impl BudgetConfig {
    fn default_max_input_tokens() -> usize {
        32768
    }
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            max_input_tokens: Self::default_max_input_tokens(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = get_config_path()?;
        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = get_config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    pub fn path() -> Result<PathBuf> {
        get_config_path()
    }
}

fn get_config_path() -> Result<PathBuf> {
    let config_dir =
        dirs::config_dir().ok_or_else(|| anyhow::anyhow!("No config directory found"))?;
    Ok(config_dir.join("codeq").join("config.toml"))
}

// ── Tests ──────────────────────────────────────────────────────────────────────
