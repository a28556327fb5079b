use std::path::{Path, PathBuf};

pub const DATA_DIR_ENV: &str = "ETERNAL_DATA_DIR";
pub const MODEL_DIR_ENV: &str = "ETERNAL_MODEL_DIR";
pub const DEFAULT_DATA_DIR: &str = "data";

pub const VECTORDB_DIR_NAME: &str = "vectordb";
pub const BACKUPS_DIR_NAME: &str = "vectordb_backups";
pub const MODELS_DIR_NAME: &str = "models";
pub const CHECKPOINT_FILE_NAME: &str = ".setup_progress";

pub const CARDS_COLLECTION: &str = "eternal_cards";
pub const MECHANICS_COLLECTION: &str = "eternal_mechanics";
pub const DISCOVERIES_COLLECTION: &str = "discovered_synergies";

/// Data root: `ETERNAL_DATA_DIR` or `./data`.
#[must_use]
pub fn data_dir() -> PathBuf {
    std::env::var(DATA_DIR_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map_or_else(|| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from)
}

#[must_use]
pub fn vectordb_dir(data_dir: &Path) -> PathBuf {
    data_dir.join(VECTORDB_DIR_NAME)
}

#[must_use]
pub fn backups_dir(data_dir: &Path) -> PathBuf {
    data_dir.join(BACKUPS_DIR_NAME)
}

#[must_use]
pub fn checkpoint_path(data_dir: &Path) -> PathBuf {
    vectordb_dir(data_dir).join(CHECKPOINT_FILE_NAME)
}

/// Cache directory for downloaded embedding models.
#[must_use]
pub fn model_dir() -> PathBuf {
    if let Ok(path) = std::env::var(MODEL_DIR_ENV) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }
    data_dir().join(MODELS_DIR_NAME)
}
