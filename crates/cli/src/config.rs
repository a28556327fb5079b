use anyhow::{Context, Result};
use eternal_sheets::{DEFAULT_RANGE, DEFAULT_SHEET_ID};
use eternal_vector_store::paths::{DATA_DIR_ENV, DEFAULT_DATA_DIR};
use eternal_vector_store::{EMBEDDING_MODEL_ENV, EMBEDDING_MODE_ENV};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const LOCAL_CONFIG_FILE: &str = "eternal.toml";
const CONFIG_DIR_NAME: &str = "eternal-scout";
const DEFAULT_CREDENTIALS_PATH: &str = "./credentials.json";

/// Runtime configuration: defaults, then a TOML file, then the environment,
/// then command-line flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub sheets_id: String,
    pub sheets_range: String,
    pub sheets_api_key: Option<String>,
    pub credentials_path: PathBuf,
    /// JSON export of the card sheet; preferred over the Sheets API.
    pub cards_file: Option<PathBuf>,
    pub data_dir: PathBuf,
    pub embedding_mode: Option<String>,
    pub embedding_model: Option<String>,
    /// Set numbers legal in Expedition.
    pub expedition_sets: Vec<String>,
    #[serde(skip)]
    pub openai_key_present: bool,
    /// The TOML file that was loaded, if any.
    #[serde(skip)]
    pub loaded_from: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            sheets_id: DEFAULT_SHEET_ID.to_string(),
            sheets_range: DEFAULT_RANGE.to_string(),
            sheets_api_key: None,
            credentials_path: PathBuf::from(DEFAULT_CREDENTIALS_PATH),
            cards_file: None,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            embedding_mode: None,
            embedding_model: None,
            expedition_sets: Vec::new(),
            openai_key_present: false,
            loaded_from: None,
        }
    }
}

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub cards_file: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    pub embedding_mode: Option<String>,
    pub embedding_model: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConfigStatus {
    pub openai: bool,
    pub sheets_id: bool,
    pub sheets_creds: bool,
    pub sheets_api_key: bool,
    pub cards_file: bool,
    pub warnings: Vec<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl AppConfig {
    /// Loads every layer from the real environment and file system.
    pub fn load(explicit: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self> {
        let mut config = match Self::config_file(explicit) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.apply_overrides(overrides);
        Ok(config)
    }

    /// `explicit` when given, else `./eternal.toml`, else the user config dir.
    fn config_file(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.is_file() {
            return Some(local);
        }
        dirs::config_dir()
            .map(|dir| dir.join(CONFIG_DIR_NAME).join("config.toml"))
            .filter(|path| path.is_file())
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: Self = toml::from_str(&raw)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        log::debug!("Loaded configuration from {}", path.display());
        config.loaded_from = Some(path.to_path_buf());
        Ok(config)
    }

    /// Applies environment variables read through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| non_empty(lookup(key));

        if let Some(id) = get("GOOGLE_SHEETS_ID").or_else(|| get("ETERNAL_SHEETS_ID")) {
            self.sheets_id = id;
        }
        if let Some(range) = get("GOOGLE_SHEETS_RANGE") {
            self.sheets_range = range;
        }
        if let Some(key) = get("GOOGLE_SHEETS_API_KEY") {
            self.sheets_api_key = Some(key);
        }
        if let Some(path) = get("GOOGLE_SHEETS_CREDENTIALS_PATH") {
            self.credentials_path = PathBuf::from(path);
        }
        if let Some(path) = get("ETERNAL_CARDS_FILE") {
            self.cards_file = Some(PathBuf::from(path));
        }
        if let Some(dir) = get(DATA_DIR_ENV) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(mode) = get(EMBEDDING_MODE_ENV) {
            self.embedding_mode = Some(mode);
        }
        if let Some(model) = get(EMBEDDING_MODEL_ENV) {
            self.embedding_model = Some(model);
        }
        self.openai_key_present = get("OPENAI_API_KEY").is_some();
    }

    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(path) = &overrides.cards_file {
            self.cards_file = Some(path.clone());
        }
        if let Some(dir) = &overrides.data_dir {
            self.data_dir = dir.clone();
        }
        if let Some(mode) = &overrides.embedding_mode {
            self.embedding_mode = Some(mode.clone());
        }
        if let Some(model) = &overrides.embedding_model {
            self.embedding_model = Some(model.clone());
        }
    }

    /// Exports the embedding settings for the vector-store crate, which reads
    /// them from the environment.
    pub fn export_embedding_env(&self) {
        if let Some(mode) = &self.embedding_mode {
            std::env::set_var(EMBEDDING_MODE_ENV, mode);
        }
        if let Some(model) = &self.embedding_model {
            std::env::set_var(EMBEDDING_MODEL_ENV, model);
        }
    }

    /// Reports what is configured. Never fails; problems become warnings.
    #[must_use]
    pub fn validate(&self) -> ConfigStatus {
        let mut status = ConfigStatus {
            openai: self.openai_key_present,
            sheets_id: !self.sheets_id.trim().is_empty(),
            sheets_creds: self.credentials_path.is_file(),
            sheets_api_key: self.sheets_api_key.is_some(),
            cards_file: self.cards_file.as_deref().is_some_and(Path::is_file),
            warnings: Vec::new(),
        };

        if !status.openai {
            status
                .warnings
                .push("OPENAI_API_KEY is not set; strategy analysis uses keyword detection only".to_string());
        }
        if let Some(path) = &self.cards_file {
            if !status.cards_file {
                status
                    .warnings
                    .push(format!("Cards file not found: {}", path.display()));
            }
        } else if !status.sheets_api_key {
            status.warnings.push(
                "No card source: set ETERNAL_CARDS_FILE or GOOGLE_SHEETS_API_KEY".to_string(),
            );
        }
        if !status.sheets_id {
            status
                .warnings
                .push("GOOGLE_SHEETS_ID is empty".to_string());
        }
        if !status.sheets_creds {
            status.warnings.push(format!(
                "Google credentials file not found at {} (only needed for private sheets)",
                self.credentials_path.display()
            ));
        }
        status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_the_public_sheet() {
        let config = AppConfig::default();
        assert_eq!(config.sheets_id, DEFAULT_SHEET_ID);
        assert_eq!(config.sheets_range, "A1:Z");
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert!(config.cards_file.is_none());
    }

    #[test]
    fn layers_apply_in_order() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("eternal.toml");
        std::fs::write(
            &path,
            "data_dir = \"from-file\"\nsheets_range = \"A1:K\"\nexpedition_sets = [\"1\", \"2\"]\n",
        )
        .unwrap();

        let mut config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.loaded_from.as_deref(), Some(path.as_path()));
        assert_eq!(config.sheets_range, "A1:K");
        assert_eq!(config.expedition_sets, vec!["1", "2"]);

        config.apply_env(env(&[
            ("ETERNAL_DATA_DIR", "from-env"),
            ("ETERNAL_SHEETS_ID", "alt-sheet"),
            ("GOOGLE_SHEETS_API_KEY", "  "),
            ("OPENAI_API_KEY", "sk-test"),
        ]));
        assert_eq!(config.data_dir, PathBuf::from("from-env"));
        assert_eq!(config.sheets_id, "alt-sheet");
        assert!(config.sheets_api_key.is_none());
        assert!(config.openai_key_present);

        config.apply_overrides(&ConfigOverrides {
            data_dir: Some(PathBuf::from("from-flag")),
            embedding_mode: Some("stub".into()),
            ..ConfigOverrides::default()
        });
        assert_eq!(config.data_dir, PathBuf::from("from-flag"));
        assert_eq!(config.embedding_mode.as_deref(), Some("stub"));
        assert_eq!(config.sheets_range, "A1:K");
    }

    #[test]
    fn google_sheets_id_wins_over_alias() {
        let mut config = AppConfig::default();
        config.apply_env(env(&[
            ("GOOGLE_SHEETS_ID", "primary"),
            ("ETERNAL_SHEETS_ID", "alias"),
        ]));
        assert_eq!(config.sheets_id, "primary");
    }

    #[test]
    fn invalid_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.toml");
        std::fs::write(&path, "data_dir = [").unwrap();
        assert!(AppConfig::from_file(&path).is_err());
        assert!(AppConfig::from_file(&tmp.path().join("missing.toml")).is_err());
    }

    #[test]
    fn validate_reports_without_failing() {
        let tmp = TempDir::new().unwrap();
        let cards = tmp.path().join("cards.json");
        std::fs::write(&cards, "[]").unwrap();

        let config = AppConfig {
            cards_file: Some(cards),
            credentials_path: tmp.path().join("nope.json"),
            ..AppConfig::default()
        };
        let status = config.validate();
        assert!(status.cards_file);
        assert!(status.sheets_id);
        assert!(!status.sheets_creds);
        assert!(!status.openai);
        assert_eq!(status.warnings.len(), 2);

        let bare = AppConfig {
            credentials_path: tmp.path().join("nope.json"),
            ..AppConfig::default()
        };
        let status = bare.validate();
        assert!(status
            .warnings
            .iter()
            .any(|w| w.starts_with("No card source")));
    }
}
