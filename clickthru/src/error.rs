use std::path::PathBuf;

use thiserror::Error;

/// The primary error type that can be produced by clickthru.
///
/// Rendering itself never fails: unresolved placeholders and unparseable
/// dates degrade to empty or raw strings. These errors come from loading
/// configuration and clicked contexts, and from handing links off to a
/// [`crate::UrlOpener`].
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error {0}: {1}")]
    Io(String, std::io::Error),
    #[error("failed to load data from file {0}: {1}")]
    LoadFromFile(PathBuf, Box<Error>),
    #[error("unsupported file type: {0}")]
    UnsupportedFileType(String),
    #[error("cannot determine file type of file: {0}")]
    CannotDetermineFileType(PathBuf),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),
    #[error("cannot parse timestamp from \"{0}\"")]
    InvalidTimestamp(String),
    /// Returned by [`crate::UrlOpener`] implementations that cannot navigate
    /// to a URL.
    #[error("failed to open URL \"{0}\": {1}")]
    OpenUrl(String, String),
}
