// src/environment.rs
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::{ExtractorConfig, NotionConfig, ReadinessConfig};

const DEFAULT_CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub extractor: ExtractorConfig,
    pub readiness: ReadinessConfig,
    pub notion: NotionConfig,
}

impl AppConfig {
    /// Load configuration from the YAML file (if any), then apply environment overrides
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let path = Self::config_path(explicit_path);

        let mut config = match &path {
            Some(path) if path.exists() => Self::load_from_file(path)?,
            Some(path) if explicit_path.is_some() => {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            _ => {
                debug!("No config file found, using defaults");
                Self::default()
            }
        };

        config.apply_env_overrides();
        config.normalize()?;
        Ok(config)
    }

    fn config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
        explicit_path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var("JOBNOTION_CONFIG").ok().map(PathBuf::from))
            .or_else(|| Some(PathBuf::from(DEFAULT_CONFIG_FILE)))
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading configuration from {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        Self::from_yaml(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(token) = std::env::var("NOTION_TOKEN") {
            self.notion.token = Some(token);
        }
        if let Ok(database_id) = std::env::var("NOTION_DATABASE_ID") {
            self.notion.database_id = Some(database_id);
        }
        if let Ok(url) = std::env::var("NOTION_API_URL") {
            self.notion.api_base_url = url;
        }
    }

    /// Trim credentials and canonicalize the database id
    pub fn normalize(&mut self) -> Result<()> {
        self.notion.token = self
            .notion
            .token
            .take()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        if let Some(raw) = self.notion.database_id.take() {
            let raw = raw.trim();
            if !raw.is_empty() {
                self.notion.database_id = Some(normalize_database_id(raw)?);
            }
        }

        self.notion.api_base_url = self.notion.api_base_url.trim_end_matches('/').to_string();
        Ok(())
    }
}

/// Accepts the dashed or the 32-hex form copied from a Notion URL
pub fn normalize_database_id(raw: &str) -> Result<String> {
    let id = Uuid::parse_str(raw.trim())
        .with_context(|| format!("Invalid Notion database id: {}", raw))?;
    Ok(id.hyphenated().to_string())
}
