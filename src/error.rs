//! Errors from settings storage and download folder lookup
//!
//! Rendering, clipboard and download failures carry their own error types
//! next to the code that raises them. This one covers the config layer,
//! whose failures degrade to defaults instead of reaching the user.

use log::warn;
use std::fmt;
use std::io;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────────────────
    // Settings File
    // ─────────────────────────────────────────────────────────────────────────
    /// The platform reports no configuration directory
    ConfigDirNotFound,

    /// `config.json` exists but couldn't be read
    ConfigRead { path: PathBuf, source: io::Error },

    /// `config.json` or its directory couldn't be written
    ConfigWrite { path: PathBuf, source: io::Error },

    /// Settings JSON couldn't be decoded or encoded
    ConfigFormat {
        path: PathBuf,
        source: serde_json::Error,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Download Folder
    // ─────────────────────────────────────────────────────────────────────────
    /// No folder is configured and the platform has no Downloads folder
    DownloadDirNotFound,

    /// The download folder couldn't be created
    DownloadDirCreate { path: PathBuf, source: io::Error },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ConfigDirNotFound => write!(f, "Configuration directory not found"),
            Error::ConfigRead { path, source } => {
                write!(f, "Could not read settings from '{}': {}", path.display(), source)
            }
            Error::ConfigWrite { path, source } => {
                write!(f, "Could not write settings to '{}': {}", path.display(), source)
            }
            Error::ConfigFormat { path, source } => {
                write!(f, "Invalid settings in '{}': {}", path.display(), source)
            }
            Error::DownloadDirNotFound => write!(f, "Download directory not found"),
            Error::DownloadDirCreate { path, source } => {
                write!(
                    f,
                    "Could not create download directory '{}': {}",
                    path.display(),
                    source
                )
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ConfigRead { source, .. }
            | Error::ConfigWrite { source, .. }
            | Error::DownloadDirCreate { source, .. } => Some(source),
            Error::ConfigFormat { source, .. } => Some(source),
            Error::ConfigDirNotFound | Error::DownloadDirNotFound => None,
        }
    }
}

/// Fall back to a default value when a non-critical step fails.
pub trait ResultExt<T> {
    /// Log the error as a warning with `context` and return `default`.
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T;
}

impl<T> ResultExt<T> for Result<T> {
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T {
        match self {
            Ok(value) => value,
            Err(err) => {
                warn!("{}: {}. Using default.", context, err);
                default
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;

    #[test]
    fn test_settings_write_error_names_file() {
        let err = Error::ConfigWrite {
            path: PathBuf::from("/cfg/mdword/config.json"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("config.json"));
        assert!(msg.contains("denied"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_invalid_settings_json_keeps_cause() {
        let source = serde_json::from_str::<serde_json::Value>("{ not json").unwrap_err();
        let err = Error::ConfigFormat {
            path: PathBuf::from("config.json"),
            source,
        };
        assert!(err.to_string().starts_with("Invalid settings in 'config.json'"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_missing_download_dir_message() {
        let err = Error::DownloadDirNotFound;
        assert_eq!(err.to_string(), "Download directory not found");
        assert!(err.source().is_none());
    }

    #[test]
    fn test_download_dir_create_error() {
        let err = Error::DownloadDirCreate {
            path: PathBuf::from("/readonly/Downloads"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
        };
        assert!(err.to_string().contains("/readonly/Downloads"));
    }

    #[test]
    fn test_settings_fall_back_to_default() {
        let loaded: Result<u32> = Err(Error::ConfigDirNotFound);
        assert_eq!(loaded.unwrap_or_warn_default(14, "Loading font size"), 14);

        let loaded: Result<u32> = Ok(18);
        assert_eq!(loaded.unwrap_or_warn_default(14, "Loading font size"), 18);
    }
}
