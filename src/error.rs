use thiserror::Error;

/// Main error type for the projector-builder library
#[derive(Error, Debug)]
pub enum ProjectorError {
    #[error("Player must be set")]
    PlayerNotSet,

    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),

    #[error("Append error: {0}")]
    Append(#[from] AppendError),

    #[error("Data source error: {0}")]
    Data(#[from] DataError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Generic error: {0}")]
    Generic(String),
}

/// Archive resolution and extraction errors
#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("Archive file type unknown: {path}")]
    UnsupportedArchive { path: String },

    #[error("Failed to extract archive {path}: {reason}")]
    ExtractFailed { path: String, reason: String },

    #[error("Failed to mount disk image {path}: {reason}")]
    MountFailed { path: String, reason: String },

    #[error("Player entry not found in archive: {name}")]
    EntryNotFound { name: String },

    #[error("Player entry is ambiguous: {count} candidates for {name}")]
    AmbiguousEntry { name: String, count: usize },
}

/// Movie data append errors
#[derive(Error, Debug)]
pub enum AppendError {
    #[error("Path not a file: {path}")]
    NotAFile { path: String },

    #[error("Unknown format string character: {tag} (position {position})")]
    UnknownFieldTag { tag: char, position: usize },

    #[error("Movie data too large for a 32-bit length field: {len} bytes")]
    PayloadTooLarge { len: usize },
}

/// Value-or-file resolution errors
#[derive(Error, Debug)]
pub enum DataError {
    #[error("New line delimiter required")]
    MissingJoiner,

    #[error("String data encoding required")]
    MissingEncoding,

    #[error("Unsupported string encoding: {encoding}")]
    UnsupportedEncoding { encoding: String },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path}")]
    ParseFailed { path: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Missing required configuration: {key}")]
    MissingKey { key: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Convenience type alias for Results using ProjectorError
pub type Result<T> = std::result::Result<T, ProjectorError>;

impl ProjectorError {
    /// Create a generic error with a custom message
    pub fn generic<S: Into<String>>(message: S) -> Self {
        Self::Generic(message.into())
    }

    /// Check if this error is recoverable (can be retried against a clean output path)
    pub fn is_recoverable(&self) -> bool {
        match self {
            // IO errors might be temporary
            Self::Io(_) => true,
            // A busy mount point or a slow hdiutil can succeed on retry
            Self::Archive(ArchiveError::MountFailed { .. }) => true,
            _ => false,
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::PlayerNotSet => {
                "No player configured. Pass --player or set projector.player in the config file.".to_string()
            }
            Self::Archive(ArchiveError::UnsupportedArchive { path }) => {
                format!("Player '{}' is not a directory or a supported archive (.zip, .dmg, .tar, .tar.gz, .tgz).", path)
            }
            Self::Append(AppendError::UnknownFieldTag { tag, .. }) => {
                format!("Layout tag '{}' is not one of d, m, s, S, l, L.", tag)
            }
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            _ => self.to_string(),
        }
    }
}
