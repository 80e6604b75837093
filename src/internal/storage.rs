use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

/// Key/value storage persisted as a flat JSON object, the terminal counterpart of the
/// browser's local storage. Every write is flushed to disk immediately.
#[derive(Debug, Clone, Default)]
pub struct LocalStorage {
    items: BTreeMap<String, String>,
    file_path: Option<PathBuf>,
}

impl LocalStorage {
    /// Storage that lives only in memory.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open the default storage file under the platform's local data directory.
    pub fn load_or_create() -> Result<Self> {
        let data_dir = dirs::data_local_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find local data directory"))?
            .join("nook-viewer");

        Self::open(data_dir.join("local_storage.json"))
    }

    /// Open storage backed by `file_path`. A missing file is an empty store.
    pub fn open(file_path: PathBuf) -> Result<Self> {
        if !file_path.exists() {
            return Ok(Self {
                items: BTreeMap::new(),
                file_path: Some(file_path),
            });
        }

        let content = fs::read_to_string(&file_path).context("Failed to read storage file")?;
        let items: BTreeMap<String, String> =
            serde_json::from_str(&content).context("Failed to parse storage file")?;
        Ok(Self {
            items,
            file_path: Some(file_path),
        })
    }

    pub fn get_item(&self, key: &str) -> Option<&str> {
        self.items.get(key).map(String::as_str)
    }

    /// Store `value` under `key`. The in-memory value is updated even if the flush fails.
    pub fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.items.insert(key.to_string(), value.to_string());
        self.save()
    }

    fn save(&self) -> Result<()> {
        let Some(path) = &self.file_path else {
            return Ok(());
        };
        if let Some(dir) = path.parent()
            && !dir.as_os_str().is_empty()
            && !dir.exists()
        {
            fs::create_dir_all(dir).context("Failed to create storage directory")?;
        }
        let content =
            serde_json::to_string_pretty(&self.items).context("Failed to serialize storage")?;
        fs::write(path, content).context("Failed to write storage file")?;
        Ok(())
    }
}
