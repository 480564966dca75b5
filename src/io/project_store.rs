// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Named project persistence.
//!
//! Projects are stored as JSON snapshots in a key-value store, one key per
//! project name. The editor is single-user, so there is no coordination
//! between writers.

use super::serialization::{self, ProjectSnapshot};
use crate::error::{EditorError, Result};
use crate::models::project::ProjectData;
use chrono::{DateTime, Utc};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const KEY_PREFIX: &str = "subtitle_project_";
const HISTORY_KEY: &str = "subtitle_project_history";
const MAX_HISTORY: usize = 10;

/// Minimal key-value storage used for projects.
pub trait ProjectStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
    fn keys(&self) -> Result<Vec<String>>;
}

impl<S: ProjectStore + ?Sized> ProjectStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }

    fn keys(&self) -> Result<Vec<String>> {
        (**self).keys()
    }
}

/// In-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl ProjectStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.keys().cloned().collect())
    }
}

/// Directory-backed store, one `<escaped key>.json` file per key.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", escape_key(key)))
    }
}

impl ProjectStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        // Write then rename so a failed write never clobbers the old record.
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        match std::fs::remove_file(self.path_for(key)) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            if let Some(key) = path.file_stem().and_then(|s| s.to_str()).and_then(unescape_key) {
                keys.push(key);
            }
        }
        keys.sort();
        Ok(keys)
    }
}

/// Percent-escape the key so any key maps to a safe, reversible file name.
fn escape_key(key: &str) -> String {
    urlencoding::encode(key).into_owned()
}

fn unescape_key(name: &str) -> Option<String> {
    urlencoding::decode(name).ok().map(Cow::into_owned)
}

/// Listing entry for a saved project.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectSummary {
    pub name: String,
    pub subtitle_count: usize,
    pub duration: f64,
    pub has_audio: bool,
    pub last_modified: DateTime<Utc>,
    pub saved_at: DateTime<Utc>,
}

impl ProjectSummary {
    fn from_snapshot(name: &str, snapshot: &ProjectSnapshot) -> Self {
        Self {
            name: name.to_string(),
            subtitle_count: snapshot.project.subtitles.len(),
            duration: snapshot.project.duration,
            has_audio: snapshot.project.audio.is_some(),
            last_modified: snapshot.project.last_modified,
            saved_at: snapshot.saved_at,
        }
    }
}

/// Owns the current project and persists named snapshots of it.
pub struct ProjectManager<S: ProjectStore> {
    store: S,
    current: ProjectData,
    history: Vec<String>,
}

impl<S: ProjectStore> ProjectManager<S> {
    pub fn new(store: S) -> Self {
        let history = match store.get(HISTORY_KEY) {
            Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_else(|e| {
                log::warn!("Ignoring unreadable project history: {}", e);
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                log::warn!("Failed to read project history: {}", e);
                Vec::new()
            }
        };
        Self {
            store,
            current: ProjectData::default(),
            history,
        }
    }

    pub fn current(&self) -> &ProjectData {
        &self.current
    }

    pub fn current_mut(&mut self) -> &mut ProjectData {
        &mut self.current
    }

    /// Replace the current project with a fresh one.
    pub fn new_project(&mut self, name: &str) -> Result<&ProjectData> {
        let name = validate_name(name)?;
        self.current = ProjectData::new(name);
        log::info!("Created project \"{}\"", self.current.name);
        Ok(&self.current)
    }

    /// Save the current project, optionally under a new name.
    ///
    /// The in-memory project is only renamed once the write succeeded.
    pub fn save(&mut self, name: Option<&str>) -> Result<ProjectSummary> {
        let name = match name {
            Some(name) => validate_name(name)?,
            None => validate_name(&self.current.name)?,
        };

        let mut project = self.current.clone();
        project.name = name.clone();
        project.touch();
        let snapshot = ProjectSnapshot::new(project);
        let json = serde_json::to_string(&snapshot)?;
        self.store.set(&project_key(&name), &json)?;

        self.current.name = name.clone();
        self.current.last_modified = snapshot.project.last_modified;
        self.push_history(&name);
        log::info!(
            "Saved project \"{}\" ({} subtitles)",
            name,
            snapshot.project.subtitles.len()
        );
        Ok(ProjectSummary::from_snapshot(&name, &snapshot))
    }

    /// Load a saved project into the current slot.
    ///
    /// On any failure the current project is left untouched.
    pub fn load(&mut self, name: &str) -> Result<()> {
        let snapshot = self.read_snapshot(name)?;
        let mut project = snapshot.project;
        project.name = name.to_string();
        project.normalize();
        self.current = project;
        self.push_history(name);
        log::info!("Loaded project \"{}\"", name);
        Ok(())
    }

    /// All saved projects, most recently modified first.
    pub fn list_all(&self) -> Result<Vec<ProjectSummary>> {
        let mut projects = Vec::new();
        for key in self.store.keys()? {
            let Some(name) = key.strip_prefix(KEY_PREFIX) else {
                continue;
            };
            if key == HISTORY_KEY {
                continue;
            }
            match self.read_snapshot(name) {
                Ok(snapshot) => projects.push(ProjectSummary::from_snapshot(name, &snapshot)),
                Err(e) => log::warn!("Skipping project \"{}\": {}", name, e),
            }
        }
        projects.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
        Ok(projects)
    }

    pub fn delete(&mut self, name: &str) -> Result<()> {
        let name = validate_name(name)?;
        self.store.remove(&project_key(&name))?;
        self.history.retain(|entry| *entry != name);
        self.write_history();
        log::info!("Deleted project \"{}\"", name);
        Ok(())
    }

    /// Recently saved or loaded project names, newest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Write a saved project to a JSON or YAML file.
    pub fn export_project(&self, name: &str, path: &Path) -> Result<()> {
        let snapshot = self.read_snapshot(name)?;
        serialization::export_file(&snapshot, path)?;
        log::info!("Exported project \"{}\" to {}", name, path.display());
        Ok(())
    }

    /// Store a project file. Returns the name it was stored under, which gets
    /// a timestamp suffix if the name is already taken.
    pub fn import_project(&mut self, path: &Path) -> Result<String> {
        let mut snapshot = serialization::import_file(path)?;
        let name = validate_name(&snapshot.project.name)?;
        if !snapshot.is_supported() {
            return Err(EditorError::IncompatibleProject {
                name,
                version: snapshot.version,
            });
        }
        snapshot.project.normalize();

        let name = if self.store.get(&project_key(&name))?.is_some() {
            format!("{}_{}", name, Utc::now().format("%Y-%m-%dT%H-%M-%S"))
        } else {
            name
        };
        snapshot.project.name = name.clone();
        self.store
            .set(&project_key(&name), &serde_json::to_string(&snapshot)?)?;
        log::info!("Imported project \"{}\" from {}", name, path.display());
        Ok(name)
    }

    fn read_snapshot(&self, name: &str) -> Result<ProjectSnapshot> {
        let json = self
            .store
            .get(&project_key(name))?
            .ok_or_else(|| EditorError::ProjectNotFound(name.to_string()))?;
        let snapshot: ProjectSnapshot =
            serde_json::from_str(&json).map_err(|source| EditorError::CorruptProject {
                name: name.to_string(),
                source,
            })?;
        if !snapshot.is_supported() {
            return Err(EditorError::IncompatibleProject {
                name: name.to_string(),
                version: snapshot.version,
            });
        }
        Ok(snapshot)
    }

    fn push_history(&mut self, name: &str) {
        self.history.retain(|entry| entry != name);
        self.history.insert(0, name.to_string());
        self.history.truncate(MAX_HISTORY);
        self.write_history();
    }

    fn write_history(&mut self) {
        let result = serde_json::to_string(&self.history)
            .map_err(EditorError::from)
            .and_then(|json| self.store.set(HISTORY_KEY, &json));
        if let Err(e) = result {
            log::warn!("Failed to write project history: {}", e);
        }
    }
}

fn project_key(name: &str) -> String {
    format!("{}{}", KEY_PREFIX, name)
}

fn validate_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    // "history" would collide with the history record's key.
    if trimmed.is_empty() || trimmed == "history" {
        return Err(EditorError::InvalidProjectName(name.to_string()));
    }
    Ok(trimmed.to_string())
}
