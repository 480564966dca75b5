// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Playback transport.
//!
//! `AudioPlayer` keeps the playback clock and reports changes as
//! [`PlayerEvent`]s. Every time-dependent call takes the current `Instant`,
//! so the clock can be driven by the frame loop or by a test.

use super::sink::AudioSink;
use crate::config::PlayerConfig;
use crate::error::{EditorError, Result};
use crate::io::media::{validate_audio, MediaProbe};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    DurationChanged(f64),
    PositionChanged(f64),
    PlayStateChanged(bool),
    Error(String),
}

pub struct AudioPlayer {
    probe: Box<dyn MediaProbe>,
    sink: Box<dyn AudioSink>,
    max_bytes: u64,
    position_interval: Duration,
    seek_settle: Duration,

    source: Option<PathBuf>,
    duration: f64,
    playing: bool,
    /// Position at `anchor_at`; the clock advances from here while playing.
    anchor_position: f64,
    anchor_at: Option<Instant>,
    last_report: Option<Instant>,
    settle_until: Option<Instant>,
    events: Vec<PlayerEvent>,
}

impl AudioPlayer {
    pub fn new(
        config: &PlayerConfig,
        max_bytes: u64,
        probe: Box<dyn MediaProbe>,
        sink: Box<dyn AudioSink>,
    ) -> Self {
        Self {
            probe,
            sink,
            max_bytes,
            position_interval: config.position_interval(),
            seek_settle: config.seek_settle(),
            source: None,
            duration: 0.0,
            playing: false,
            anchor_position: 0.0,
            anchor_at: None,
            last_report: None,
            settle_until: None,
            events: Vec::new(),
        }
    }

    /// Load an audio file and return its duration in seconds.
    ///
    /// On failure the previous source is kept, playback is paused and an
    /// `Error` event is emitted.
    pub fn load(&mut self, path: &Path) -> Result<f64> {
        if self.playing {
            self.halt(self.anchor_position);
        }

        let duration = validate_audio(path, self.max_bytes).and_then(|_| self.probe.duration(path));
        let duration = match duration {
            Ok(duration) => duration,
            Err(e) => {
                log::error!("Failed to load audio {}: {}", path.display(), e);
                self.events.push(PlayerEvent::Error(e.to_string()));
                return Err(e);
            }
        };

        log::info!(
            "Loaded audio {} ({:.2}s, output: {})",
            path.display(),
            duration,
            self.sink.name()
        );
        self.source = Some(path.to_path_buf());
        self.duration = duration;
        self.anchor_position = 0.0;
        self.anchor_at = None;
        self.settle_until = None;
        self.events.push(PlayerEvent::DurationChanged(duration));
        self.events.push(PlayerEvent::PositionChanged(0.0));
        Ok(duration)
    }

    /// Forget the current source.
    pub fn unload(&mut self) {
        self.halt(0.0);
        if self.source.take().is_some() {
            self.duration = 0.0;
            self.settle_until = None;
            self.events.push(PlayerEvent::DurationChanged(0.0));
        }
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Current playback position.
    ///
    /// While playing, the output device's playhead is preferred over the
    /// wall clock when the sink reports one.
    pub fn position(&self, now: Instant) -> f64 {
        if self.playing {
            if let Some(position) = self.sink.position() {
                return position.clamp(0.0, self.duration);
            }
        }
        let elapsed = match (self.playing, self.anchor_at) {
            (true, Some(at)) => now.saturating_duration_since(at).as_secs_f64(),
            _ => 0.0,
        };
        (self.anchor_position + elapsed).clamp(0.0, self.duration)
    }

    /// Timeline length to use while no source is loaded, so seeking still
    /// works over a project whose audio is unavailable. Ignored once a
    /// source is loaded.
    pub fn set_duration_hint(&mut self, duration: f64) {
        if self.source.is_some() {
            return;
        }
        self.duration = if duration.is_finite() { duration.max(0.0) } else { 0.0 };
        self.anchor_position = self.anchor_position.clamp(0.0, self.duration);
    }

    pub fn play(&mut self, now: Instant) {
        if self.playing {
            return;
        }
        let Some(source) = self.source.clone() else {
            self.events
                .push(PlayerEvent::Error("no audio loaded".to_string()));
            return;
        };

        // Playing from the end starts over.
        if self.anchor_position >= self.duration {
            self.anchor_position = 0.0;
        }
        if let Err(e) = self.sink.start(&source, self.anchor_position) {
            self.fail(e);
            return;
        }
        self.playing = true;
        self.anchor_at = Some(now);
        self.last_report = None;
        log::debug!("Playback started at {:.2}s", self.anchor_position);
        self.events.push(PlayerEvent::PlayStateChanged(true));
    }

    pub fn pause(&mut self, now: Instant) {
        if !self.playing {
            return;
        }
        let position = self.position(now);
        self.halt(position);
        self.events.push(PlayerEvent::PositionChanged(position));
        log::debug!("Playback paused at {:.2}s", position);
    }

    pub fn toggle(&mut self, now: Instant) {
        if self.playing {
            self.pause(now);
        } else {
            self.play(now);
        }
    }

    /// Pause and return to the start.
    pub fn stop(&mut self, now: Instant) {
        self.pause(now);
        self.seek(0.0, now);
    }

    /// Move the playhead. Position reports resume once the seek settles.
    pub fn seek(&mut self, time: f64, now: Instant) {
        let time = if time.is_finite() { time } else { 0.0 };
        let time = time.clamp(0.0, self.duration);
        self.anchor_position = time;
        self.anchor_at = Some(now);
        self.settle_until = Some(now + self.seek_settle);

        if self.playing {
            if let Some(source) = self.source.clone() {
                if let Err(e) = self.sink.start(&source, time) {
                    self.fail(e);
                }
            }
        }
    }

    pub fn skip(&mut self, delta: f64, now: Instant) {
        let target = self.position(now) + delta;
        self.seek(target, now);
    }

    /// Advance the clock and queue any due events.
    pub fn tick(&mut self, now: Instant) {
        if let Some(until) = self.settle_until {
            if now < until {
                return;
            }
            self.settle_until = None;
            self.last_report = Some(now);
            self.events.push(PlayerEvent::PositionChanged(self.position(now)));
        }

        if !self.playing {
            return;
        }

        let position = self.position(now);
        if position >= self.duration {
            self.halt(self.duration);
            self.events.push(PlayerEvent::PositionChanged(self.duration));
            log::debug!("Playback reached the end");
            return;
        }

        let due = self
            .last_report
            .map_or(true, |last| now.saturating_duration_since(last) >= self.position_interval);
        if due {
            self.last_report = Some(now);
            self.events.push(PlayerEvent::PositionChanged(position));
        }
    }

    pub fn take_events(&mut self) -> Vec<PlayerEvent> {
        std::mem::take(&mut self.events)
    }

    fn halt(&mut self, position: f64) {
        self.sink.stop();
        self.anchor_position = position;
        self.anchor_at = None;
        if self.playing {
            self.playing = false;
            self.events.push(PlayerEvent::PlayStateChanged(false));
        }
    }

    fn fail(&mut self, error: EditorError) {
        log::error!("Playback failed: {}", error);
        let position = self.anchor_position;
        self.halt(position);
        self.events.push(PlayerEvent::Error(error.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::sink::NullSink;
    use std::cell::Cell;
    use std::rc::Rc;

    struct FixedProbe(f64);

    impl MediaProbe for FixedProbe {
        fn duration(&self, _path: &Path) -> Result<f64> {
            Ok(self.0)
        }
    }

    /// Sink that fails on demand.
    struct FlakySink {
        fail: Rc<Cell<bool>>,
    }

    impl AudioSink for FlakySink {
        fn start(&mut self, _path: &Path, _position: f64) -> Result<()> {
            if self.fail.get() {
                Err(EditorError::Playback("device busy".into()))
            } else {
                Ok(())
            }
        }

        fn stop(&mut self) {}

        fn name(&self) -> &'static str {
            "flaky"
        }
    }

    fn loaded_player(dir: &tempfile::TempDir, sink: Box<dyn AudioSink>) -> AudioPlayer {
        let path = dir.path().join("talk.mp3");
        std::fs::write(&path, b"id3").unwrap();
        let mut player = AudioPlayer::new(
            &PlayerConfig::default(),
            1024,
            Box::new(FixedProbe(10.0)),
            sink,
        );
        player.load(&path).unwrap();
        player
    }

    fn positions(events: &[PlayerEvent]) -> Vec<f64> {
        events
            .iter()
            .filter_map(|e| match e {
                PlayerEvent::PositionChanged(p) => Some(*p),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_load_emits_duration() {
        let dir = tempfile::tempdir().unwrap();
        let mut player = loaded_player(&dir, Box::new(NullSink));
        assert_eq!(
            player.take_events(),
            vec![PlayerEvent::DurationChanged(10.0), PlayerEvent::PositionChanged(0.0)]
        );
        assert_eq!(player.duration(), 10.0);
    }

    #[test]
    fn test_load_rejects_unsupported_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut player = loaded_player(&dir, Box::new(NullSink));
        player.take_events();

        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"x").unwrap();
        assert!(player.load(&path).is_err());
        assert!(matches!(player.take_events().as_slice(), [PlayerEvent::Error(_)]));
        assert_eq!(player.duration(), 10.0);
    }

    #[test]
    fn test_clock_advances_while_playing() {
        let dir = tempfile::tempdir().unwrap();
        let mut player = loaded_player(&dir, Box::new(NullSink));
        let t0 = Instant::now();

        player.play(t0);
        assert!(player.is_playing());
        assert!((player.position(t0 + Duration::from_millis(1500)) - 1.5).abs() < 1e-6);

        player.pause(t0 + Duration::from_secs(2));
        assert!(!player.is_playing());
        assert!((player.position(t0 + Duration::from_secs(5)) - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_position_cadence() {
        let dir = tempfile::tempdir().unwrap();
        let mut player = loaded_player(&dir, Box::new(NullSink));
        let t0 = Instant::now();
        player.play(t0);
        player.take_events();

        for ms in (0..=200).step_by(10) {
            player.tick(t0 + Duration::from_millis(ms));
        }
        // One report at 0 and one every 50ms after.
        assert_eq!(positions(&player.take_events()).len(), 5);
    }

    #[test]
    fn test_seek_settles_before_reporting() {
        let dir = tempfile::tempdir().unwrap();
        let mut player = loaded_player(&dir, Box::new(NullSink));
        player.take_events();
        let t0 = Instant::now();

        player.seek(4.0, t0);
        player.tick(t0 + Duration::from_millis(50));
        assert!(player.take_events().is_empty());

        player.tick(t0 + Duration::from_millis(100));
        assert_eq!(player.take_events(), vec![PlayerEvent::PositionChanged(4.0)]);
    }

    #[test]
    fn test_seek_clamps() {
        let dir = tempfile::tempdir().unwrap();
        let mut player = loaded_player(&dir, Box::new(NullSink));
        let now = Instant::now();

        player.seek(-3.0, now);
        assert_eq!(player.position(now), 0.0);
        player.seek(99.0, now);
        assert_eq!(player.position(now), 10.0);
        player.skip(-4.0, now);
        assert_eq!(player.position(now), 6.0);
    }

    #[test]
    fn test_reaching_end_pauses() {
        let dir = tempfile::tempdir().unwrap();
        let mut player = loaded_player(&dir, Box::new(NullSink));
        let t0 = Instant::now();
        player.play(t0);
        player.take_events();

        player.tick(t0 + Duration::from_secs(11));
        let events = player.take_events();
        assert!(events.contains(&PlayerEvent::PlayStateChanged(false)));
        assert_eq!(positions(&events), vec![10.0]);
        assert!(!player.is_playing());

        // Play again restarts from the beginning.
        let t1 = t0 + Duration::from_secs(12);
        player.play(t1);
        assert_eq!(player.position(t1), 0.0);
    }

    #[test]
    fn test_sink_failure_leaves_player_paused() {
        let dir = tempfile::tempdir().unwrap();
        let fail = Rc::new(Cell::new(true));
        let mut player = loaded_player(&dir, Box::new(FlakySink { fail: fail.clone() }));
        player.take_events();
        let t0 = Instant::now();

        player.play(t0);
        assert!(!player.is_playing());
        assert!(matches!(player.take_events().as_slice(), [PlayerEvent::Error(_)]));

        fail.set(false);
        player.play(t0);
        assert!(player.is_playing());

        fail.set(true);
        player.seek(3.0, t0);
        assert!(!player.is_playing());
        let events = player.take_events();
        assert!(events.contains(&PlayerEvent::PlayStateChanged(false)));
        assert!(events.iter().any(|e| matches!(e, PlayerEvent::Error(_))));
    }

    #[test]
    fn test_play_without_source_is_error() {
        let mut player = AudioPlayer::new(
            &PlayerConfig::default(),
            1024,
            Box::new(FixedProbe(1.0)),
            Box::new(NullSink),
        );
        player.play(Instant::now());
        assert!(!player.is_playing());
        assert!(matches!(player.take_events().as_slice(), [PlayerEvent::Error(_)]));
    }

    #[test]
    fn test_unload_clears_source() {
        let dir = tempfile::tempdir().unwrap();
        let mut player = loaded_player(&dir, Box::new(NullSink));
        player.take_events();
        player.unload();
        assert!(player.source().is_none());
        assert_eq!(player.take_events(), vec![PlayerEvent::DurationChanged(0.0)]);
    }

    #[test]
    fn test_stop_returns_to_start() {
        let dir = tempfile::tempdir().unwrap();
        let mut player = loaded_player(&dir, Box::new(NullSink));
        let t0 = Instant::now();
        player.play(t0);
        let t1 = t0 + Duration::from_secs(3);
        player.stop(t1);
        assert!(!player.is_playing());
        assert_eq!(player.position(t1), 0.0);
    }

    /// Sink whose device clock reads a fixed position while sounding.
    struct ClockSink {
        sounding: bool,
        at: f64,
    }

    impl AudioSink for ClockSink {
        fn start(&mut self, _path: &Path, _position: f64) -> Result<()> {
            self.sounding = true;
            Ok(())
        }

        fn stop(&mut self) {
            self.sounding = false;
        }

        fn name(&self) -> &'static str {
            "clock"
        }

        fn position(&self) -> Option<f64> {
            self.sounding.then_some(self.at)
        }
    }

    #[test]
    fn test_device_clock_preferred_while_playing() {
        let dir = tempfile::tempdir().unwrap();
        let sink = ClockSink { sounding: false, at: 4.25 };
        let mut player = loaded_player(&dir, Box::new(sink));
        let t0 = Instant::now();

        player.play(t0);
        assert_eq!(player.position(t0 + Duration::from_millis(10)), 4.25);

        player.pause(t0 + Duration::from_millis(20));
        assert_eq!(player.position(t0 + Duration::from_secs(3)), 4.25);
    }

    #[test]
    fn test_duration_hint_without_source() {
        let mut player = AudioPlayer::new(
            &PlayerConfig::default(),
            1024,
            Box::new(FixedProbe(10.0)),
            Box::new(NullSink),
        );
        let t0 = Instant::now();
        player.set_duration_hint(60.0);
        player.seek(30.0, t0);
        player.tick(t0 + Duration::from_millis(200));
        assert_eq!(positions(&player.take_events()), vec![30.0]);

        // A loaded source wins over the hint.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("talk.mp3");
        std::fs::write(&path, b"id3").unwrap();
        player.load(&path).unwrap();
        player.set_duration_hint(60.0);
        assert_eq!(player.duration(), 10.0);
    }
}
