// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Project state management.
//!
//! This module manages the overall project state including the audio
//! resource, captions, imported text lines and project metadata.

use super::subtitle::{SubtitleItem, DEFAULT_TEXT};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PROJECT_NAME: &str = "Untitled Project";

/// Audio file referenced by a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioResource {
    pub path: String,
    pub duration: f64,
}

/// Imported text lines with a read cursor.
///
/// Lines are handed out in order to newly created captions and wrap around
/// to the first line after the last one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextQueue {
    lines: Vec<String>,
    cursor: usize,
}

impl TextQueue {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines, cursor: 0 }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Take the next line, cycling back to the first after the last.
    pub fn next_line(&mut self) -> String {
        if self.lines.is_empty() {
            return DEFAULT_TEXT.to_string();
        }
        if self.cursor >= self.lines.len() {
            self.cursor = 0;
        }
        let line = self.lines[self.cursor].clone();
        self.cursor += 1;
        line
    }

    /// Index of the line the next call to [`TextQueue::next_line`] returns.
    pub fn upcoming_index(&self) -> Option<usize> {
        if self.lines.is_empty() {
            None
        } else {
            Some(self.cursor % self.lines.len())
        }
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// Indices of lines containing `query`, case-insensitively.
    pub fn search(&self, query: &str) -> Vec<usize> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }
        self.lines
            .iter()
            .enumerate()
            .filter(|(_, line)| line.to_lowercase().contains(&query))
            .map(|(i, _)| i)
            .collect()
    }
}

/// Complete project data for serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectData {
    pub name: String,
    #[serde(default)]
    pub audio: Option<AudioResource>,
    #[serde(default)]
    pub subtitles: Vec<SubtitleItem>,
    #[serde(default)]
    pub text: TextQueue,
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub current_position: f64,
    pub last_modified: DateTime<Utc>,
}

impl Default for ProjectData {
    fn default() -> Self {
        Self::new(DEFAULT_PROJECT_NAME)
    }
}

impl ProjectData {
    /// Create an empty project with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            audio: None,
            subtitles: Vec::new(),
            text: TextQueue::default(),
            duration: 0.0,
            current_position: 0.0,
            last_modified: Utc::now(),
        }
    }

    pub fn touch(&mut self) {
        self.last_modified = Utc::now();
    }

    pub fn add_subtitle(&mut self, subtitle: SubtitleItem) {
        self.subtitles.push(subtitle);
        self.touch();
    }

    /// Remove a caption by storage index.
    pub fn remove_subtitle(&mut self, index: usize) -> Option<SubtitleItem> {
        if index < self.subtitles.len() {
            self.touch();
            Some(self.subtitles.remove(index))
        } else {
            None
        }
    }

    pub fn replace_subtitles(&mut self, subtitles: Vec<SubtitleItem>) {
        self.subtitles = subtitles;
        self.touch();
    }

    /// Select exactly one caption, or none when `index` is out of range.
    pub fn select(&mut self, index: Option<usize>) {
        for (i, subtitle) in self.subtitles.iter_mut().enumerate() {
            subtitle.selected = Some(i) == index;
        }
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.subtitles.iter().position(|s| s.selected)
    }

    pub fn set_audio(&mut self, audio: AudioResource) {
        self.duration = audio.duration;
        self.audio = Some(audio);
        self.touch();
    }

    pub fn import_text_lines(&mut self, lines: Vec<String>) {
        self.text = TextQueue::new(lines);
        self.touch();
    }

    /// Replace the captions with one caption per imported line, spread
    /// evenly over `duration`. Returns the number of captions created.
    pub fn distribute_text(&mut self, duration: f64) -> usize {
        let lines = self.text.lines();
        if lines.is_empty() || !(duration > 0.0) {
            return 0;
        }
        let per_line = duration / lines.len() as f64;
        let subtitles = lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                SubtitleItem::new(line.clone(), i as f64 * per_line, (i + 1) as f64 * per_line)
            })
            .collect::<Vec<_>>();
        let count = subtitles.len();
        self.text.reset();
        self.replace_subtitles(subtitles);
        count
    }

    /// Storage indices ordered by start time, for display only.
    pub fn sorted_indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..self.subtitles.len()).collect();
        indices.sort_by(|&a, &b| {
            self.subtitles[a]
                .start_time()
                .total_cmp(&self.subtitles[b].start_time())
        });
        indices
    }

    /// Pairs of storage indices whose captions overlap in time.
    pub fn overlaps(&self) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for i in 0..self.subtitles.len() {
            for j in (i + 1)..self.subtitles.len() {
                if self.subtitles[i].overlaps(&self.subtitles[j]) {
                    pairs.push((i, j));
                }
            }
        }
        pairs
    }

    /// Re-establish invariants on data read from outside.
    pub fn normalize(&mut self) {
        if !self.duration.is_finite() || self.duration < 0.0 {
            self.duration = 0.0;
        }
        if !self.current_position.is_finite() {
            self.current_position = 0.0;
        }
        self.current_position = self.current_position.clamp(0.0, self.duration);
        for subtitle in &mut self.subtitles {
            subtitle.normalize();
        }
        let selected = self.selected_index();
        self.select(selected);
    }
}
