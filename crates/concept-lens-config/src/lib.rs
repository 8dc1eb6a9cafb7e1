use concept_lens_engine::settings::Settings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory documents are read from and written to.
    pub documents_path: PathBuf,
    /// Vocabulary file with `[[concept]]` and `[[candidate]]` tables.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vocabulary_path: Option<PathBuf>,
    /// Where stored anchors live.
    pub anchors_path: PathBuf,
    pub annotation: Settings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            documents_path: PathBuf::from("."),
            vocabulary_path: None,
            anchors_path: PathBuf::from("~/.local/share/concept-lens/anchors.toml"),
            annotation: Settings::default(),
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        config.expand_paths();
        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    /// The config at the default location, or defaults when there is none.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        Ok(Self::load()?.unwrap_or_else(|| {
            let mut config = Self::default();
            config.expand_paths();
            config
        }))
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/concept-lens");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    // Expand shell variables and tilde; paths that fail to expand are kept
    fn expand_paths(&mut self) {
        let expand = |path: &PathBuf| Self::expand_path(path).unwrap_or_else(|| path.clone());
        self.documents_path = expand(&self.documents_path);
        self.anchors_path = expand(&self.anchors_path);
        self.vocabulary_path = self.vocabulary_path.as_ref().map(expand);
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}
