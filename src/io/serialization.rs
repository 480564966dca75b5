// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Project data serialization and deserialization.
//!
//! This module handles the project snapshot format and exporting and
//! importing snapshots as YAML and JSON files.

use crate::error::{EditorError, Result};
use crate::models::project::ProjectData;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: &str = "1.0";

pub const PROJECT_FILE_EXTENSIONS: &[&str] = &["json", "yaml", "yml"];

/// A saved project: the project data plus save metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSnapshot {
    pub version: String,
    pub saved_at: DateTime<Utc>,
    pub project: ProjectData,
}

impl ProjectSnapshot {
    pub fn new(project: ProjectData) -> Self {
        Self {
            version: SNAPSHOT_VERSION.to_string(),
            saved_at: Utc::now(),
            project,
        }
    }

    pub fn is_supported(&self) -> bool {
        self.version == SNAPSHOT_VERSION
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Json,
    Yaml,
}

fn file_format(path: &Path) -> Result<FileFormat> {
    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("yaml") | Some("yml") => Ok(FileFormat::Yaml),
        Some("json") => Ok(FileFormat::Json),
        _ => Err(EditorError::unsupported(path, PROJECT_FILE_EXTENSIONS)),
    }
}

/// Export a snapshot to YAML format.
pub fn export_yaml(data: &ProjectSnapshot, path: &Path) -> Result<()> {
    let yaml = serde_yaml::to_string(data)?;
    std::fs::write(path, yaml)?;
    Ok(())
}

/// Export a snapshot to JSON format.
pub fn export_json(data: &ProjectSnapshot, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(data)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Import a snapshot from YAML format.
pub fn import_yaml(path: &Path) -> Result<ProjectSnapshot> {
    let yaml = std::fs::read_to_string(path)?;
    let data = serde_yaml::from_str(&yaml)?;
    Ok(data)
}

/// Import a snapshot from JSON format.
pub fn import_json(path: &Path) -> Result<ProjectSnapshot> {
    let json = std::fs::read_to_string(path)?;
    let data = serde_json::from_str(&json)?;
    Ok(data)
}

/// Export choosing the format from the file extension.
pub fn export_file(data: &ProjectSnapshot, path: &Path) -> Result<()> {
    match file_format(path)? {
        FileFormat::Yaml => export_yaml(data, path),
        FileFormat::Json => export_json(data, path),
    }
}

/// Import choosing the format from the file extension.
pub fn import_file(path: &Path) -> Result<ProjectSnapshot> {
    match file_format(path)? {
        FileFormat::Yaml => import_yaml(path),
        FileFormat::Json => import_json(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::project::AudioResource;
    use crate::models::subtitle::SubtitleItem;

    fn sample() -> ProjectSnapshot {
        let mut project = ProjectData::new("interview");
        project.set_audio(AudioResource {
            path: "/media/interview.wav".into(),
            duration: 93.5,
        });
        project.add_subtitle(SubtitleItem::new("Hello", 1.0, 2.5));
        project.add_subtitle(SubtitleItem::new("Again", 3.25, 7.0));
        project.select(Some(1));
        project.import_text_lines(vec!["a".into(), "b".into()]);
        project.text.next_line();
        ProjectSnapshot::new(project)
    }

    #[test]
    fn test_json_and_yaml_files_are_lossless() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = sample();

        for name in ["p.json", "p.yaml", "p.YML"] {
            let path = dir.path().join(name);
            export_file(&snapshot, &path).unwrap();
            let loaded = import_file(&path).unwrap();
            assert_eq!(loaded, snapshot, "{} did not read back", name);
        }
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("p.xml");
        assert!(matches!(
            export_file(&sample(), &path),
            Err(EditorError::UnsupportedFileType { .. })
        ));
    }
}
