use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::internal::models::Category;

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Digest server the viewer talks to.
    pub server: ServerConfig,
    /// Categories shown in the navigation list, in display order.
    #[serde(default = "default_categories")]
    pub categories: Vec<Category>,
    /// JSON theme file with a "light" and a "dark" variant (e.g., "./themes/nook.json").
    /// Built-in palettes are used when unset or unreadable.
    pub theme_file: Option<String>,
    /// Override for the local storage file that holds the persisted theme.
    pub storage_file: Option<String>,
    pub logging: LoggingConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub base_url: String,
    /// Per-request timeout for content fetches.
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    /// Base level for the env filter, used when RUST_LOG is not set.
    pub level: String,
    /// Per-module overrides, e.g. `{"reqwest": "warn"}`.
    pub module_levels: HashMap<String, String>,
    pub log_directory: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            module_levels: HashMap::new(),
            log_directory: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct UiConfig {
    pub sidebar_width: u16,
    pub chat_width: u16,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            sidebar_width: 30,
            chat_width: 48,
        }
    }
}

fn default_categories() -> Vec<Category> {
    [
        ("github_trending", "GitHub Trending"),
        ("hacker_news", "Hacker News"),
        ("paper_summarizer", "Paper Summarizer"),
        ("reddit_explorer", "Reddit Explorer"),
        ("tech_feed", "Tech Feed"),
    ]
    .into_iter()
    .map(|(id, label)| Category::new(id, label))
    .collect()
}

impl AppConfig {
    pub fn load() -> Self {
        // Look for config.ron in current directory or next to executable
        let mut candidates = vec![PathBuf::from("config.ron")];

        if let Ok(exe) = std::env::current_exe()
            && let Some(dir) = exe.parent()
        {
            candidates.push(dir.join("config.ron"));
        }

        for path in candidates {
            if !path.exists() {
                continue;
            }
            match Self::load_from(&path) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    return config;
                }
                Err(e) => {
                    tracing::error!("Failed to load config at {}: {:#}", path.display(), e);
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Self::with_defaults()
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let mut config: AppConfig = ron::from_str(content).context("invalid config.ron")?;
        if config.categories.is_empty() {
            config.categories = default_categories();
        }
        Ok(config)
    }

    /// Defaults including the built-in category list.
    pub fn with_defaults() -> Self {
        Self {
            categories: default_categories(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_list_all_digest_sources() {
        let config = AppConfig::with_defaults();
        let ids: Vec<_> = config.categories.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "github_trending",
                "hacker_news",
                "paper_summarizer",
                "reddit_explorer",
                "tech_feed"
            ]
        );
        assert_eq!(config.server.base_url, "http://localhost:8080");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_partial_config_keeps_defaults() {
        let config = AppConfig::parse(
            r#"(
    // Local digest server
    server: (base_url: "http://digest.local:9000/"),
    logging: (level: "debug"),
)"#,
        )
        .unwrap();

        assert_eq!(config.server.base_url, "http://digest.local:9000/");
        assert_eq!(config.server.timeout_secs, 10);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.categories.len(), 5);
        assert_eq!(config.ui.sidebar_width, 30);
    }

    #[test]
    fn test_parse_custom_categories() {
        let config = AppConfig::parse(
            r#"(categories: [(id: "tech_feed", label: "Feeds")], theme_file: Some("./themes/nook.json"))"#,
        )
        .unwrap();

        assert_eq!(config.categories, vec![Category::new("tech_feed", "Feeds")]);
        assert_eq!(config.theme_file.as_deref(), Some("./themes/nook.json"));
    }

    #[test]
    fn test_load_from_missing_file_is_error() {
        let path = std::env::temp_dir().join("nook_viewer_missing_config.ron");
        let _ = fs::remove_file(&path);
        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }
}
