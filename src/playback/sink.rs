// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Audio output backends.

use crate::error::{EditorError, Result};
use crate::io::media::tool_available;
use std::path::Path;
use std::process::{Child, Command, Stdio};

/// Something that can make a file audible from a given position.
///
/// The player owns the transport; a sink starts and stops sound and may
/// report how far the device has actually played.
pub trait AudioSink {
    fn start(&mut self, path: &Path, position: f64) -> Result<()>;
    fn stop(&mut self);
    fn name(&self) -> &'static str;

    /// Device playhead in seconds while sounding, if the sink knows it.
    fn position(&self) -> Option<f64> {
        None
    }
}

/// Silent output. The player still keeps time, so the editor is usable
/// without any audio device.
#[derive(Debug, Default)]
pub struct NullSink;

impl AudioSink for NullSink {
    fn start(&mut self, _path: &Path, _position: f64) -> Result<()> {
        Ok(())
    }

    fn stop(&mut self) {}

    fn name(&self) -> &'static str {
        "silent"
    }
}

#[cfg(feature = "audio-cpal")]
pub use self::output::CpalSink;

#[cfg(feature = "audio-cpal")]
mod output {
    use super::AudioSink;
    use crate::error::{EditorError, Result};
    use crate::playback::decode;
    use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
    use std::sync::{Arc, Mutex};

    const PREFERRED_RATE: u32 = 48_000;

    /// Plays decoded PCM through the default output device.
    ///
    /// The stream runs for the sink's whole life and outputs silence while
    /// stopped. The callback advances `playhead_frames`, which doubles as
    /// the playback clock.
    pub struct CpalSink {
        _stream: cpal::Stream,
        samples: Arc<Mutex<Arc<Vec<f32>>>>,
        playing: Arc<AtomicBool>,
        playhead_frames: Arc<AtomicU64>,
        sample_rate: u32,
        channels: u16,
        /// File currently decoded into `samples`.
        loaded: Option<PathBuf>,
    }

    impl CpalSink {
        pub fn open() -> Result<Self> {
            let host = cpal::default_host();
            let device = host
                .default_output_device()
                .ok_or_else(|| EditorError::Playback("no default audio output device".into()))?;
            let config = select_output_config(&device)?;
            let sample_rate = config.sample_rate.0;
            let channels = config.channels;

            let samples = Arc::new(Mutex::new(Arc::new(Vec::<f32>::new())));
            let playing = Arc::new(AtomicBool::new(false));
            let playhead_frames = Arc::new(AtomicU64::new(0));

            let samples_cb = Arc::clone(&samples);
            let playing_cb = Arc::clone(&playing);
            let playhead_cb = Arc::clone(&playhead_frames);
            let width = channels.max(1) as usize;

            let stream = device
                .build_output_stream(
                    &config,
                    move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                        data.fill(0.0);
                        if !playing_cb.load(Ordering::Relaxed) {
                            return;
                        }

                        let start = playhead_cb.load(Ordering::Relaxed);
                        if let Ok(samples) = samples_cb.lock() {
                            let offset = start as usize * width;
                            if offset < samples.len() {
                                let count = (samples.len() - offset).min(data.len());
                                data[..count].copy_from_slice(&samples[offset..offset + count]);
                            }
                        }
                        playhead_cb.store(start + (data.len() / width) as u64, Ordering::Relaxed);
                    },
                    |err| log::error!("Audio output error: {}", err),
                    None,
                )
                .map_err(|e| EditorError::Playback(e.to_string()))?;
            stream
                .play()
                .map_err(|e| EditorError::Playback(e.to_string()))?;

            log::info!("Audio output: {} Hz, {} channel(s)", sample_rate, channels);
            Ok(Self {
                _stream: stream,
                samples,
                playing,
                playhead_frames,
                sample_rate,
                channels,
                loaded: None,
            })
        }
    }

    impl AudioSink for CpalSink {
        fn start(&mut self, path: &Path, position: f64) -> Result<()> {
            self.playing.store(false, Ordering::Relaxed);

            if self.loaded.as_deref() != Some(path) {
                let decoded = decode::decode_file(path, self.sample_rate, self.channels)?;
                log::debug!(
                    "Decoded {} ({} samples)",
                    path.display(),
                    decoded.len()
                );
                let mut guard = self
                    .samples
                    .lock()
                    .map_err(|_| EditorError::Playback("audio buffer poisoned".into()))?;
                *guard = Arc::new(decoded);
                self.loaded = Some(path.to_path_buf());
            }

            let frame = (position.max(0.0) * self.sample_rate as f64).round() as u64;
            self.playhead_frames.store(frame, Ordering::Relaxed);
            self.playing.store(true, Ordering::Relaxed);
            Ok(())
        }

        fn stop(&mut self) {
            self.playing.store(false, Ordering::Relaxed);
        }

        fn name(&self) -> &'static str {
            "cpal"
        }

        fn position(&self) -> Option<f64> {
            if !self.playing.load(Ordering::Relaxed) || self.sample_rate == 0 {
                return None;
            }
            let frames = self.playhead_frames.load(Ordering::Relaxed);
            Some(frames as f64 / self.sample_rate as f64)
        }
    }

    fn select_output_config(device: &cpal::Device) -> Result<cpal::StreamConfig> {
        let configs: Vec<_> = device
            .supported_output_configs()
            .map_err(|e| EditorError::Playback(e.to_string()))?
            .filter(|config| config.sample_format() == cpal::SampleFormat::F32)
            .collect();

        let target = cpal::SampleRate(PREFERRED_RATE);
        if let Some(config) = configs
            .iter()
            .find(|config| config.min_sample_rate() <= target && config.max_sample_rate() >= target)
        {
            return Ok(config.with_sample_rate(target).config());
        }

        let default_config = device
            .default_output_config()
            .map_err(|e| EditorError::Playback(e.to_string()))?;
        if default_config.sample_format() != cpal::SampleFormat::F32 {
            return Err(EditorError::Playback(
                "output device does not support f32 samples".into(),
            ));
        }
        Ok(default_config.config())
    }
}

/// Plays through an `ffplay` child process, restarted on every seek.
#[derive(Debug, Default)]
pub struct FfplaySink {
    child: Option<Child>,
}

impl FfplaySink {
    /// Returns a sink if `ffplay` can be launched.
    pub fn detect() -> Option<Self> {
        tool_available("ffplay").then(Self::default)
    }
}

impl AudioSink for FfplaySink {
    fn start(&mut self, path: &Path, position: f64) -> Result<()> {
        self.stop();
        let child = Command::new("ffplay")
            .arg("-nodisp")
            .arg("-autoexit")
            .arg("-loglevel")
            .arg("quiet")
            .arg("-ss")
            .arg(format!("{:.3}", position.max(0.0)))
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| EditorError::Playback(format!("failed to start ffplay: {}", e)))?;
        log::debug!("ffplay started at {:.3}s (pid {})", position, child.id());
        self.child = Some(child);
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(mut child) = self.child.take() {
            if let Err(e) = child.kill() {
                log::debug!("ffplay already exited: {}", e);
            }
            let _ = child.wait();
        }
    }

    fn name(&self) -> &'static str {
        "ffplay"
    }
}

impl Drop for FfplaySink {
    fn drop(&mut self) {
        self.stop();
    }
}

/// The best available sink on this machine: the output device, then
/// `ffplay`, then silence.
pub fn default_sink() -> Box<dyn AudioSink> {
    #[cfg(feature = "audio-cpal")]
    {
        match CpalSink::open() {
            Ok(sink) => return Box::new(sink),
            Err(e) => log::warn!("Audio device unavailable: {}", e),
        }
    }

    match FfplaySink::detect() {
        Some(sink) => Box::new(sink),
        None => {
            log::warn!("No audio output available, playback will be silent");
            Box::new(NullSink)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_sink_has_no_device_clock() {
        let mut sink = NullSink;
        sink.start(Path::new("a.wav"), 3.0).unwrap();
        assert_eq!(sink.position(), None);
        sink.stop();
        assert_eq!(sink.name(), "silent");
    }
}
