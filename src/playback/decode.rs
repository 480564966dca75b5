// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Decoding audio files to interleaved `f32` PCM for the output stream.
//!
//! WAV is read with `hound` and converted in process. Compressed formats
//! are decoded by `ffmpeg` straight to the output rate and channel count.

use crate::error::{EditorError, Result};
use crate::io::media::has_extension;
use std::path::Path;
use std::process::{Command, Stdio};

/// Interleaved samples with their layout.
#[derive(Debug, Clone, PartialEq)]
pub struct PcmBuffer {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: u16,
}

/// Decode `path` to interleaved samples at `target_rate` with
/// `target_channels` channels.
pub fn decode_file(path: &Path, target_rate: u32, target_channels: u16) -> Result<Vec<f32>> {
    if has_extension(path, &["wav"]) {
        let pcm = read_wav(path)?;
        let mixed = remix(&pcm.samples, pcm.channels, target_channels);
        return Ok(resample_linear(
            &mixed,
            target_channels,
            pcm.sample_rate,
            target_rate,
        ));
    }
    decode_with_ffmpeg(path, target_rate, target_channels)
}

pub fn read_wav(path: &Path) -> Result<PcmBuffer> {
    let mut reader = hound::WavReader::open(path).map_err(|e| decode_error(path, e))?;
    let spec = reader.spec();
    let samples = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>(),
        hound::SampleFormat::Int => {
            let scale = 1.0 / (1_i64 << (spec.bits_per_sample.clamp(1, 32) - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|sample| sample.map(|value| value as f32 * scale))
                .collect()
        }
    }
    .map_err(|e| decode_error(path, e))?;

    Ok(PcmBuffer {
        samples,
        sample_rate: spec.sample_rate,
        channels: spec.channels,
    })
}

fn decode_with_ffmpeg(path: &Path, target_rate: u32, target_channels: u16) -> Result<Vec<f32>> {
    let output = Command::new("ffmpeg")
        .arg("-v")
        .arg("error")
        .arg("-nostdin")
        .arg("-i")
        .arg(path)
        .arg("-f")
        .arg("f32le")
        .arg("-ac")
        .arg(target_channels.to_string())
        .arg("-ar")
        .arg(target_rate.to_string())
        .arg("-")
        .stdin(Stdio::null())
        .output()
        .map_err(|e| decode_error(path, format!("ffmpeg unavailable: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(decode_error(path, stderr.trim()));
    }

    Ok(output
        .stdout
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect())
}

/// Change the channel count. Downmixing to mono averages, upmixing from
/// mono duplicates, anything else maps channels round-robin.
pub fn remix(samples: &[f32], from: u16, to: u16) -> Vec<f32> {
    let from = from.max(1) as usize;
    let to = to.max(1) as usize;
    if from == to {
        return samples.to_vec();
    }

    let mut out = Vec::with_capacity(samples.len() / from * to);
    for frame in samples.chunks_exact(from) {
        if to == 1 {
            out.push(frame.iter().sum::<f32>() / from as f32);
        } else {
            out.extend((0..to).map(|c| frame[c % from]));
        }
    }
    out
}

/// Linear-interpolation resampler over interleaved frames.
pub fn resample_linear(samples: &[f32], channels: u16, from_rate: u32, to_rate: u32) -> Vec<f32> {
    let channels = channels.max(1) as usize;
    if from_rate == to_rate || from_rate == 0 || to_rate == 0 {
        return samples.to_vec();
    }
    let frames = samples.len() / channels;
    if frames == 0 {
        return Vec::new();
    }

    let out_frames = (frames as u64 * to_rate as u64 / from_rate as u64) as usize;
    let step = from_rate as f64 / to_rate as f64;
    let mut out = Vec::with_capacity(out_frames * channels);
    for i in 0..out_frames {
        let pos = i as f64 * step;
        let index = (pos.floor() as usize).min(frames - 1);
        let next = (index + 1).min(frames - 1);
        let frac = (pos - index as f64) as f32;
        for c in 0..channels {
            let a = samples[index * channels + c];
            let b = samples[next * channels + c];
            out.push(a + (b - a) * frac);
        }
    }
    out
}

fn decode_error(path: &Path, reason: impl ToString) -> EditorError {
    EditorError::Playback(format!(
        "could not decode {}: {}",
        path.display(),
        reason.to_string()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_int_wav_normalizes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for sample in [0_i16, 16384, -32768] {
            writer.write_sample(sample).unwrap();
        }
        writer.finalize().unwrap();

        let pcm = read_wav(&path).unwrap();
        assert_eq!(pcm.sample_rate, 8000);
        assert_eq!(pcm.samples, vec![0.0, 0.5, -1.0]);

        // Same rate, mono to stereo
        let stereo = decode_file(&path, 8000, 2).unwrap();
        assert_eq!(stereo, vec![0.0, 0.0, 0.5, 0.5, -1.0, -1.0]);
    }

    #[test]
    fn test_remix() {
        assert_eq!(remix(&[1.0, 3.0, -1.0, 1.0], 2, 1), vec![2.0, 0.0]);
        assert_eq!(remix(&[0.5, -0.5], 1, 2), vec![0.5, 0.5, -0.5, -0.5]);
        assert_eq!(remix(&[0.1, 0.2], 2, 2), vec![0.1, 0.2]);
    }

    #[test]
    fn test_resample_linear() {
        assert_eq!(resample_linear(&[0.0, 1.0], 1, 1, 2), vec![0.0, 0.5, 1.0, 1.0]);

        let down = resample_linear(&[0.0, 0.0, 1.0, 1.0, 2.0, 2.0, 3.0, 3.0], 2, 48_000, 24_000);
        assert_eq!(down, vec![0.0, 0.0, 2.0, 2.0]);

        assert!(resample_linear(&[], 2, 44_100, 48_000).is_empty());
    }

    #[test]
    fn test_missing_wav_is_playback_error() {
        let err = decode_file(Path::new("/nonexistent/gone.wav"), 48_000, 2).unwrap_err();
        assert!(matches!(err, EditorError::Playback(_)));
    }
}
