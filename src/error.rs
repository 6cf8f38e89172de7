//! Errors that stop a bring-up before any external command is issued

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BringupError {
    #[error("cannot read TTY directory {path}: {source}")]
    TtyDirUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no TTY matching prefix '{prefix}' with driver '{driver}' under {root}")]
    NoMatchingDevice {
        prefix: String,
        driver: String,
        root: PathBuf,
    },

    #[error("unknown adapter profile '{0}' (see `slcan-bringup adapters list`)")]
    UnknownAdapter(String),

    #[error("bitrate code {0} is out of range (expected 0..=8)")]
    InvalidBitrateCode(u8),

    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
