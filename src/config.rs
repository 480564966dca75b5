// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Editor configuration.
//!
//! Configuration is read from a YAML file. Every field has a default, so a
//! partial file (or no file at all) is valid.

use crate::error::{EditorError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const APP_DIR: &str = "subtitle-editor";

/// Top-level editor configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Directory holding saved projects. Defaults to the platform data dir.
    pub store_dir: Option<PathBuf>,
    /// Number of undo states kept.
    pub history_size: usize,
    /// Lifetime of transient status messages.
    pub message_ttl_secs: f64,
    pub skip_short_secs: f64,
    pub skip_long_secs: f64,
    /// Length of captions added at the playhead.
    pub default_caption_secs: f64,
    pub limits: LimitsConfig,
    pub player: PlayerConfig,
    pub timeline: TimelineConfig,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            store_dir: None,
            history_size: 50,
            message_ttl_secs: 3.0,
            skip_short_secs: 5.0,
            skip_long_secs: 10.0,
            default_caption_secs: 3.0,
            limits: LimitsConfig::default(),
            player: PlayerConfig::default(),
            timeline: TimelineConfig::default(),
        }
    }
}

/// Upload size limits, checked before any file is read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    pub max_audio_bytes: u64,
    pub max_text_bytes: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_audio_bytes: 100 * 1024 * 1024,
            max_text_bytes: 10 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Cadence of position reports while playing.
    pub position_interval_ms: u64,
    /// Quiet period after a seek before position reports resume.
    pub seek_settle_ms: u64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            position_interval_ms: 50,
            seek_settle_ms: 100,
        }
    }
}

impl PlayerConfig {
    pub fn position_interval(&self) -> Duration {
        Duration::from_millis(self.position_interval_ms)
    }

    pub fn seek_settle(&self) -> Duration {
        Duration::from_millis(self.seek_settle_ms)
    }
}

/// Timeline interaction and paint settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Drag-create gestures shorter than this (seconds) are discarded.
    pub min_create_span: f64,
    /// Resizing never brings a caption below this length (seconds).
    pub min_resize_span: f64,
    pub zoom_factor: f64,
    pub handle_tolerance_px: f64,
    /// Blocks narrower than this are not drawn.
    pub min_block_px: f64,
    pub snap_enabled: bool,
    pub snap_threshold_px: f64,
    pub frame_interval_ms: u64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            min_create_span: 0.1,
            min_resize_span: 0.5,
            zoom_factor: 1.3,
            handle_tolerance_px: 5.0,
            min_block_px: 5.0,
            snap_enabled: true,
            snap_threshold_px: 8.0,
            frame_interval_ms: 16,
        }
    }
}

impl TimelineConfig {
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

impl EditorConfig {
    /// Parse a configuration from YAML text.
    pub fn from_yaml(yaml: &str, origin: &Path) -> Result<Self> {
        let config: EditorConfig = serde_yaml::from_str(yaml).map_err(|e| EditorError::Config {
            path: origin.to_path_buf(),
            reason: e.to_string(),
        })?;
        config.validate(origin)?;
        Ok(config)
    }

    /// Load configuration from an explicit file.
    pub fn load(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml, path)
    }

    /// Load from `path` if given, else from the default location if the file
    /// exists, else fall back to defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match default_config_path() {
            Some(path) if path.exists() => {
                log::info!("Loading configuration from {}", path.display());
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Directory for saved projects.
    pub fn resolved_store_dir(&self) -> PathBuf {
        self.store_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR)
                .join("projects")
        })
    }

    fn validate(&self, origin: &Path) -> Result<()> {
        let invalid = |reason: &str| {
            Err(EditorError::Config {
                path: origin.to_path_buf(),
                reason: reason.to_string(),
            })
        };
        let t = &self.timeline;
        if !(t.zoom_factor > 1.0) {
            return invalid("timeline.zoom_factor must be greater than 1");
        }
        if !(t.min_create_span > 0.0) || !(t.min_resize_span > 0.0) {
            return invalid("timeline minimum spans must be positive");
        }
        if t.frame_interval_ms == 0 {
            return invalid("timeline.frame_interval_ms must be positive");
        }
        Ok(())
    }
}

/// `<config dir>/subtitle-editor/config.yaml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.yaml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = "history_size: 10\ntimeline:\n  snap_enabled: false\n";
        let config = EditorConfig::from_yaml(yaml, Path::new("test.yaml")).unwrap();

        assert_eq!(config.history_size, 10);
        assert!(!config.timeline.snap_enabled);
        assert_eq!(config.timeline.min_resize_span, 0.5);
        assert_eq!(config.limits.max_text_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn test_invalid_zoom_factor_rejected() {
        let yaml = "timeline:\n  zoom_factor: 0.5\n";
        let err = EditorConfig::from_yaml(yaml, Path::new("bad.yaml")).unwrap_err();
        assert!(matches!(err, EditorError::Config { .. }));
    }

    #[test]
    fn test_explicit_store_dir_wins() {
        let config = EditorConfig {
            store_dir: Some(PathBuf::from("/tmp/projects")),
            ..Default::default()
        };
        assert_eq!(config.resolved_store_dir(), PathBuf::from("/tmp/projects"));
    }
}
