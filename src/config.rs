use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

use crate::{
    append::AppendLayout,
    data::DataSource,
    error::{ConfigError, ProjectorError, Result},
};

/// Main configuration for projector-builder
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Player and movie inputs
    pub projector: ProjectorConfig,

    /// Variant selection and its parameters
    pub variant: VariantConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound { path: path.display().to_string() })?;

        let config: Config = toml::from_str(&content)
            .map_err(|_| ConfigError::ParseFailed { path: path.display().to_string() })?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::InvalidValue {
                key: "config".to_string(),
                value: e.to_string()
            })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.projector.validate()?;
        self.variant.validate()?;
        Ok(())
    }
}

/// Inputs needed to resolve one player and one movie payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectorConfig {
    /// Player file, archive or directory
    pub player: Option<PathBuf>,

    /// Movie file
    pub movie_file: Option<PathBuf>,

    /// Movie data; takes precedence over `movie_file`
    #[serde(skip)]
    pub movie_data: Option<Vec<u8>>,

    /// Path to the disk image mounting tool (hdiutil)
    pub tool_override_path: Option<PathBuf>,
}

impl ProjectorConfig {
    /// Player path, or [`ProjectorError::PlayerNotSet`]
    pub fn player_path(&self) -> Result<&Path> {
        self.player.as_deref().ok_or(ProjectorError::PlayerNotSet)
    }

    /// Where the movie comes from, `movie_data` first
    pub fn movie_source(&self) -> DataSource {
        DataSource::from_parts(self.movie_data.as_deref(), self.movie_file.as_deref())
    }

    fn validate(&self) -> Result<()> {
        for (key, path) in [
            ("projector.player", &self.player),
            ("projector.movie_file", &self.movie_file),
            ("projector.tool_override_path", &self.tool_override_path),
        ] {
            if matches!(path, Some(p) if p.as_os_str().is_empty()) {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: String::new()
                }.into());
            }
        }
        Ok(())
    }
}

/// Variant selection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VariantConfig {
    /// Registered variant name (`append`, `bundle`, or a custom registration)
    pub kind: String,

    /// Append layout used by the `append` variant, parsed from its tag string
    pub layout: AppendLayout,

    /// File name of the player executable inside an archive
    pub player_entry: Option<String>,

    /// Extension added to the projector name by the `append` variant
    pub extension: String,

    /// Resource file name the `bundle` variant writes the movie to
    pub movie_name: String,
}

impl Default for VariantConfig {
    fn default() -> Self {
        Self {
            kind: "append".to_string(),
            layout: AppendLayout::default(),
            player_entry: None,
            extension: String::new(),
            movie_name: "movie.swf".to_string(),
        }
    }
}

impl VariantConfig {
    fn validate(&self) -> Result<()> {
        if self.kind.is_empty() {
            return Err(ConfigError::MissingKey { key: "variant.kind".to_string() }.into());
        }

        if self.movie_name.is_empty() || self.movie_name.contains(['/', '\\']) {
            return Err(ConfigError::InvalidValue {
                key: "variant.movie_name".to_string(),
                value: self.movie_name.clone()
            }.into());
        }

        Ok(())
    }
}
