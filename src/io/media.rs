// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Audio file validation and duration probing.
//!
//! WAV files are measured from their header with `hound`. Other formats are
//! measured with `ffprobe` when it is installed.

use crate::error::{EditorError, Result};
use std::path::Path;
use std::process::{Command, Stdio};

pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "m4a", "ogg", "aac", "flac"];

/// Check if a path has a supported audio extension.
pub fn is_audio_file(path: &Path) -> bool {
    has_extension(path, AUDIO_EXTENSIONS)
}

pub(crate) fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| extensions.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Reject unsupported or oversized audio files before they are opened.
pub fn validate_audio(path: &Path, max_bytes: u64) -> Result<()> {
    if !is_audio_file(path) {
        return Err(EditorError::unsupported(path, AUDIO_EXTENSIONS));
    }
    let size = std::fs::metadata(path)?.len();
    if size > max_bytes {
        return Err(EditorError::FileTooLarge {
            path: path.to_path_buf(),
            size,
            limit: max_bytes,
        });
    }
    Ok(())
}

/// Determines the length of an audio file in seconds.
pub trait MediaProbe {
    fn duration(&self, path: &Path) -> Result<f64>;
}

/// Probe backed by the WAV header reader and `ffprobe`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileProbe;

impl MediaProbe for FileProbe {
    fn duration(&self, path: &Path) -> Result<f64> {
        if has_extension(path, &["wav"]) {
            return wav_duration(path);
        }
        ffprobe_duration(path)
    }
}

/// Duration from a WAV header.
pub fn wav_duration(path: &Path) -> Result<f64> {
    let reader = hound::WavReader::open(path).map_err(|e| probe_error(path, e))?;
    let spec = reader.spec();
    if spec.sample_rate == 0 {
        return Err(probe_error(path, "sample rate is zero"));
    }
    // `duration()` counts samples per channel.
    Ok(reader.duration() as f64 / spec.sample_rate as f64)
}

/// Duration reported by `ffprobe`.
pub fn ffprobe_duration(path: &Path) -> Result<f64> {
    let output = Command::new("ffprobe")
        .arg("-v")
        .arg("error")
        .arg("-show_entries")
        .arg("format=duration")
        .arg("-of")
        .arg("default=noprint_wrappers=1:nokey=1")
        .arg(path)
        .output()
        .map_err(|e| probe_error(path, format!("ffprobe unavailable: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(probe_error(path, stderr.trim()));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    match stdout.trim().parse::<f64>() {
        Ok(duration) if duration.is_finite() && duration >= 0.0 => Ok(duration),
        _ => Err(probe_error(path, format!("unexpected ffprobe output {:?}", stdout.trim()))),
    }
}

fn probe_error(path: &Path, reason: impl ToString) -> EditorError {
    EditorError::Probe {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

/// Whether a command-line tool can be launched.
pub fn tool_available(program: &str) -> bool {
    Command::new(program)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_wav(path: &Path, sample_rate: u32, channels: u16, frames: u32) {
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for _ in 0..frames * channels as u32 {
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_audio_extensions() {
        assert!(is_audio_file(Path::new("a.MP3")));
        assert!(is_audio_file(Path::new("dir/b.flac")));
        assert!(!is_audio_file(Path::new("c.mp4")));
        assert!(!is_audio_file(Path::new("noext")));
    }

    #[test]
    fn test_validate_audio() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        write_wav(&path, 8000, 1, 800);

        assert!(validate_audio(&path, 1024 * 1024).is_ok());
        assert!(matches!(
            validate_audio(&path, 16),
            Err(EditorError::FileTooLarge { limit: 16, .. })
        ));

        let text = dir.path().join("notes.txt");
        std::fs::write(&text, "hi").unwrap();
        assert!(matches!(
            validate_audio(&text, 1024),
            Err(EditorError::UnsupportedFileType { .. })
        ));
    }

    #[test]
    fn test_wav_duration_counts_frames() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        write_wav(&path, 8000, 2, 12000);

        let duration = FileProbe.duration(&path).unwrap();
        assert!((duration - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_broken_wav_is_probe_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.wav");
        std::fs::write(&path, b"not a wav file").unwrap();
        assert!(matches!(
            FileProbe.duration(&path),
            Err(EditorError::Probe { .. })
        ));
    }
}
