// File: src/config.rs
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Deck location and the note fields the filler reads and writes.
/// A missing field pair disables that kind of update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotesConfig {
    pub path: PathBuf,
    pub deck: String,
    #[serde(default)]
    pub image_definition_field: Option<String>,
    #[serde(default)]
    pub image_field: Option<String>,
    #[serde(default)]
    pub phonemic_definition_field: Option<String>,
    #[serde(default)]
    pub phonemic_field: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhonemicConfig {
    pub locale: String,
    pub system: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Binary copy of the parsed lexicon, rebuilt when missing or stale.
    #[serde(default)]
    pub lexicon_cache: Option<PathBuf>,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub notes: NotesConfig,
    /// Transcription is skipped entirely when absent.
    #[serde(default)]
    pub phonemic: Option<PhonemicConfig>,
}

impl AppConfig {
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("can't read config file: {e}")))?;
        Self::from_json_str(&file)
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| Error::Config(format!("can't parse config file: {e}")))
    }
}
