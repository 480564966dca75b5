// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Error types for editor operations.
//!
//! Every failure in the editor is local and recoverable: the user is told
//! what went wrong and can retry the action. Nothing here is fatal.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the editor core.
pub type Result<T> = std::result::Result<T, EditorError>;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("unsupported file type: {path} (expected one of: {expected})")]
    UnsupportedFileType { path: PathBuf, expected: String },

    #[error("file too large: {path} is {size} bytes (limit {limit} bytes)")]
    FileTooLarge { path: PathBuf, size: u64, limit: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("project \"{0}\" does not exist")]
    ProjectNotFound(String),

    #[error("project \"{name}\" has incompatible version {version:?}")]
    IncompatibleProject { name: String, version: String },

    #[error("project \"{name}\" is corrupt: {source}")]
    CorruptProject {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid project name {0:?}")]
    InvalidProjectName(String),

    #[error("could not determine duration of {path}: {reason}")]
    Probe { path: PathBuf, reason: String },

    #[error("playback error: {0}")]
    Playback(String),

    #[error("invalid configuration in {path}: {reason}")]
    Config { path: PathBuf, reason: String },
}

impl EditorError {
    pub(crate) fn unsupported(path: impl Into<PathBuf>, expected: &[&str]) -> Self {
        EditorError::UnsupportedFileType {
            path: path.into(),
            expected: expected.join(", "),
        }
    }
}
