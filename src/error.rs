//! @ai:module:intent Define error types for collection, extraction setup and configuration
//! @ai:module:layer domain
//! @ai:module:public_api Error, Result
//! @ai:module:stateless true

use std::path::PathBuf;
use thiserror::Error;

/// @ai:intent Unified error type for all perfplot library operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Expected a JSON array of records in {path}")]
    NotAnArray { path: PathBuf },

    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Invalid label pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("No layout rule matches data file {path}")]
    UnlabeledFile { path: PathBuf },

    #[error("Layout rule produced an empty {label} label for {path}")]
    EmptyLabel { path: PathBuf, label: &'static str },

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Unknown profile '{0}' (expected browsertime, dns or trr)")]
    UnknownProfile(String),

    #[error("Unknown plot type '{0}' (expected box, scatter or violin)")]
    UnknownPlotType(String),

    #[error("Plot type '{plot_type}' is not supported by profile '{profile}'")]
    UnsupportedPlotType { plot_type: String, profile: String },
}

pub type Result<T> = std::result::Result<T, Error>;
