use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_NAME: &str = "versefind";
const CONFIG_FILE: &str = "config.json";

/// Application configuration stored in the app data directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Corpus JSON file. Required unless given on the command line.
    #[serde(default)]
    pub corpus_path: Option<PathBuf>,

    /// Directory holding `<edition>_revindex.bt`.
    /// If None, the `indexes` folder of the app data directory is used.
    #[serde(default)]
    pub index_dir: Option<PathBuf>,

    /// Edition key selecting which index resource belongs to the corpus
    #[serde(default = "default_edition")]
    pub edition: String,

    /// Number of lowercased chapters kept in memory
    #[serde(default = "default_chapter_cache_size")]
    pub chapter_cache_size: usize,

    /// Color name used for highlighted matches
    #[serde(default = "default_highlight_color")]
    pub highlight_color: String,
}

fn default_edition() -> String {
    "kjv".to_string()
}

fn default_chapter_cache_size() -> usize {
    64
}

fn default_highlight_color() -> String {
    "yellow".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            corpus_path: None,
            index_dir: None,
            edition: default_edition(),
            chapter_cache_size: default_chapter_cache_size(),
            highlight_color: default_highlight_color(),
        }
    }
}

impl AppConfig {
    /// Load config from the app data directory, or return default if not found
    pub fn load() -> Result<Self> {
        let config_path = get_config_path()?;
        Self::load_from(&config_path)
    }

    /// Load config from an explicit file, or return default if it does not exist
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = fs::read_to_string(config_path)
                .context("Failed to read config file")?;
            let config: AppConfig = serde_json::from_str(&content)
                .context("Failed to parse config file")?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to the app data directory
    pub fn save(&self) -> Result<()> {
        let config_path = get_config_path()?;
        let content = serde_json::to_string_pretty(self)
            .context("Failed to serialize config")?;
        fs::write(&config_path, content)
            .context("Failed to write config file")?;
        Ok(())
    }

    /// Resolve the index directory (configured or app-data default)
    pub fn effective_index_dir(&self) -> Result<PathBuf> {
        match &self.index_dir {
            Some(dir) => Ok(dir.clone()),
            None => get_index_dir(),
        }
    }
}

/// Get the path to the config file
pub fn get_config_path() -> Result<PathBuf> {
    let app_dir = get_app_data_dir()?;
    Ok(app_dir.join(CONFIG_FILE))
}

/// Get the application data directory
pub fn get_app_data_dir() -> Result<PathBuf> {
    let base = if cfg!(target_os = "macos") {
        dirs::home_dir()
            .map(|h| h.join("Library").join("Application Support"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
    } else {
        // Linux/Unix: use XDG_DATA_HOME or ~/.local/share
        dirs::data_dir()
    };

    let base = base.context("Could not determine app data directory")?;
    let app_dir = base.join(APP_NAME);

    fs::create_dir_all(&app_dir)?;
    Ok(app_dir)
}

/// Get the default directory for index resources
pub fn get_index_dir() -> Result<PathBuf> {
    let index_dir = get_app_data_dir()?.join("indexes");
    fs::create_dir_all(&index_dir)?;
    Ok(index_dir)
}
