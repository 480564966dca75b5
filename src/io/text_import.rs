// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Text and subtitle file import.
//!
//! Plain text files give one caption candidate per non-blank line. SubRip
//! files give timed lines. Files are validated by extension and size before
//! anything is read.

use super::srt;
use crate::error::{EditorError, Result};
use crate::models::subtitle::SubtitleItem;
use std::path::Path;

pub const TEXT_EXTENSIONS: &[&str] = &["txt", "srt"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFormat {
    Plain,
    SubRip,
}

impl TextFormat {
    /// Detect the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "txt" => Some(TextFormat::Plain),
            "srt" => Some(TextFormat::SubRip),
            _ => None,
        }
    }
}

/// A caption candidate. Timestamps are zero for plain text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    /// 1-based position in the source file.
    pub index: usize,
    pub text: String,
    pub start_time: f64,
    pub end_time: f64,
}

/// Result of importing a file.
#[derive(Debug, Clone)]
pub struct ImportedText {
    pub file_name: String,
    pub format: TextFormat,
    pub lines: Vec<TextLine>,
    pub content: String,
}

impl ImportedText {
    pub fn texts(&self) -> Vec<String> {
        self.lines.iter().map(|line| line.text.clone()).collect()
    }

    /// Whether any line carries timing information.
    pub fn is_timed(&self) -> bool {
        self.lines.iter().any(|line| line.end_time > 0.0)
    }

    /// Spread the lines evenly over `duration` seconds.
    pub fn auto_assign_times(&mut self, duration: f64) {
        if self.lines.is_empty() || !(duration > 0.0) {
            return;
        }
        let per_line = duration / self.lines.len() as f64;
        for (i, line) in self.lines.iter_mut().enumerate() {
            line.start_time = i as f64 * per_line;
            line.end_time = (i + 1) as f64 * per_line;
        }
    }

    /// Convert the lines into captions. Bounds are clamped on construction.
    pub fn to_subtitles(&self) -> Vec<SubtitleItem> {
        self.lines
            .iter()
            .map(|line| SubtitleItem::new(line.text.clone(), line.start_time, line.end_time))
            .collect()
    }
}

/// Imports text and subtitle files within a size limit.
#[derive(Debug, Clone)]
pub struct TextManager {
    max_bytes: u64,
}

impl TextManager {
    pub fn new(max_bytes: u64) -> Self {
        Self { max_bytes }
    }

    /// Validate and parse a `.txt` or `.srt` file.
    pub fn import_file(&self, path: &Path) -> Result<ImportedText> {
        let format = TextFormat::from_path(path)
            .ok_or_else(|| EditorError::unsupported(path, TEXT_EXTENSIONS))?;

        let size = std::fs::metadata(path)?.len();
        if size > self.max_bytes {
            return Err(EditorError::FileTooLarge {
                path: path.to_path_buf(),
                size,
                limit: self.max_bytes,
            });
        }

        let bytes = std::fs::read(path)?;
        let content = String::from_utf8_lossy(&bytes).into_owned();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self::parse_content(file_name, format, content))
    }

    /// Parse already-loaded content.
    pub fn parse_content(file_name: String, format: TextFormat, content: String) -> ImportedText {
        let lines = match format {
            TextFormat::Plain => parse_plain(&content),
            TextFormat::SubRip => srt::parse(&content),
        };
        log::info!("Imported {} lines from {}", lines.len(), file_name);
        ImportedText {
            file_name,
            format,
            lines,
            content,
        }
    }
}

/// One untimed line per non-blank line, trimmed.
pub fn parse_plain(content: &str) -> Vec<TextLine> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(i, line)| TextLine {
            index: i + 1,
            text: line.to_string(),
            start_time: 0.0,
            end_time: 0.0,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(dir: &tempfile::TempDir, name: &str, content: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content).unwrap();
        path
    }

    #[test]
    fn test_plain_text_lines() {
        let lines = parse_plain("first\r\n\n   second  \n\t\nthird");
        let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
        assert!(lines.iter().all(|l| l.start_time == 0.0 && l.end_time == 0.0));
        assert_eq!(lines[2].index, 3);
    }

    #[test]
    fn test_import_txt_and_srt() {
        let dir = tempfile::tempdir().unwrap();
        let manager = TextManager::new(1024);

        let txt = write_temp(&dir, "script.TXT", b"hello\nworld\n");
        let imported = manager.import_file(&txt).unwrap();
        assert_eq!(imported.format, TextFormat::Plain);
        assert_eq!(imported.texts(), vec!["hello", "world"]);
        assert!(!imported.is_timed());

        let srt = write_temp(&dir, "subs.srt", b"1\n00:00:01,000 --> 00:00:02,000\nHi\n");
        let imported = manager.import_file(&srt).unwrap();
        assert_eq!(imported.format, TextFormat::SubRip);
        assert!(imported.is_timed());
        assert_eq!(imported.file_name, "subs.srt");
    }

    #[test]
    fn test_rejects_wrong_type_and_size() {
        let dir = tempfile::tempdir().unwrap();
        let manager = TextManager::new(8);

        let doc = write_temp(&dir, "notes.docx", b"x");
        assert!(matches!(
            manager.import_file(&doc),
            Err(EditorError::UnsupportedFileType { .. })
        ));

        let big = write_temp(&dir, "big.txt", b"0123456789");
        assert!(matches!(
            manager.import_file(&big),
            Err(EditorError::FileTooLarge { size: 10, limit: 8, .. })
        ));
    }

    #[test]
    fn test_invalid_utf8_does_not_fail() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(&dir, "latin.txt", b"caf\xe9\nok\n");
        let imported = TextManager::new(1024).import_file(&path).unwrap();
        assert_eq!(imported.lines.len(), 2);
        assert_eq!(imported.lines[1].text, "ok");
    }

    #[test]
    fn test_auto_assign_and_convert() {
        let mut imported =
            TextManager::parse_content("a.txt".into(), TextFormat::Plain, "one\ntwo\nthree\nfour".into());
        imported.auto_assign_times(20.0);
        let subtitles = imported.to_subtitles();

        assert_eq!(subtitles.len(), 4);
        assert_eq!(subtitles[1].start_time(), 5.0);
        assert_eq!(subtitles[1].end_time(), 10.0);
        assert!(subtitles.iter().all(|s| s.start_time() < s.end_time()));
    }

    #[test]
    fn test_untimed_lines_become_valid_captions() {
        let imported = TextManager::parse_content("a.txt".into(), TextFormat::Plain, "one".into());
        let subtitles = imported.to_subtitles();
        assert!(subtitles[0].start_time() < subtitles[0].end_time());
    }
}
