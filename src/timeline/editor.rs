// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Timeline interaction state.

use super::snap::{best_snap, SnapKind, SnapTarget};
use super::viewport::{Viewport, ZoomDirection};
use super::{BLOCK_HEIGHT, BLOCK_TOP, RULER_HEIGHT};
use crate::config::TimelineConfig;
use crate::models::subtitle::SubtitleItem;

/// Something the host should react to.
#[derive(Debug, Clone, PartialEq)]
pub enum TimelineEvent {
    /// The user clicked the ruler.
    PositionChanged(f64),
    /// A drag-create gesture finished. The host decides the text.
    SubtitleAdded { start: f64, end: f64 },
    SubtitleSelected(usize),
    SubtitleChanged { index: usize, start: f64, end: f64 },
    SubtitleDeleted(usize),
}

/// Pointer affordance for the current hover position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorHint {
    #[default]
    Default,
    /// Over the ruler.
    Pointer,
    /// Over empty track, or drawing a new caption.
    Crosshair,
    /// Over a caption edge.
    ResizeHorizontal,
    /// Over a caption body.
    Grab,
    Grabbing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragHandle {
    Move,
    ResizeLeft,
    ResizeRight,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct DragSession {
    pub index: usize,
    pub handle: DragHandle,
    pub anchor_time: f64,
    pub original_start: f64,
    pub original_end: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct CreateSession {
    pub anchor_time: f64,
    pub current_time: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(super) enum Gesture {
    #[default]
    Idle,
    Drag(DragSession),
    Create(CreateSession),
}

pub struct TimelineEditor {
    pub(super) config: TimelineConfig,
    pub(super) width: f64,
    pub(super) height: f64,
    pub(super) viewport: Viewport,
    pub(super) position: f64,
    pub(super) subtitles: Vec<SubtitleItem>,
    pub(super) selected: Option<usize>,
    pub(super) gesture: Gesture,
    pub(super) snap_guides: Vec<f64>,
    cursor: CursorHint,
    events: Vec<TimelineEvent>,
}

impl TimelineEditor {
    pub fn new(config: TimelineConfig) -> Self {
        Self {
            config,
            width: 0.0,
            height: 0.0,
            viewport: Viewport::default(),
            position: 0.0,
            subtitles: Vec::new(),
            selected: None,
            gesture: Gesture::Idle,
            snap_guides: Vec::new(),
            cursor: CursorHint::Default,
            events: Vec::new(),
        }
    }

    pub fn set_size(&mut self, width: f64, height: f64) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn set_duration(&mut self, duration: f64) {
        self.viewport.set_duration(duration);
        self.position = self.position.clamp(0.0, self.viewport.duration());
    }

    pub fn duration(&self) -> f64 {
        self.viewport.duration()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn set_position(&mut self, position: f64) {
        let position = if position.is_finite() { position } else { 0.0 };
        self.position = position.clamp(0.0, self.viewport.duration());
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    /// Replace the caption collection. Selection follows the items'
    /// `selected` flags.
    pub fn set_subtitles(&mut self, subtitles: &[SubtitleItem]) {
        self.subtitles = subtitles.to_vec();
        self.selected = self.subtitles.iter().position(|s| s.selected);
        if let Gesture::Drag(session) = self.gesture {
            if session.index >= self.subtitles.len() {
                self.gesture = Gesture::Idle;
                self.snap_guides.clear();
            }
        }
    }

    pub fn subtitles(&self) -> &[SubtitleItem] {
        &self.subtitles
    }

    pub fn set_selected_subtitle(&mut self, index: Option<usize>) {
        self.selected = index.filter(|&i| i < self.subtitles.len());
        for (i, subtitle) in self.subtitles.iter_mut().enumerate() {
            subtitle.selected = Some(i) == self.selected;
        }
    }

    pub fn selected_subtitle(&self) -> Option<usize> {
        self.selected
    }

    pub fn is_dragging(&self) -> bool {
        !matches!(self.gesture, Gesture::Idle)
    }

    pub fn cursor_hint(&self) -> CursorHint {
        self.cursor
    }

    pub fn take_events(&mut self) -> Vec<TimelineEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) {
        if !self.accepts_input() {
            return;
        }
        let time = self.time_at(x);

        if y <= RULER_HEIGHT {
            self.position = time;
            self.events.push(TimelineEvent::PositionChanged(time));
            self.cursor = CursorHint::Pointer;
            return;
        }

        if let Some((index, handle)) = self.hit_test(x, y) {
            let subtitle = &self.subtitles[index];
            self.gesture = Gesture::Drag(DragSession {
                index,
                handle,
                anchor_time: self.viewport.x_to_time(x, self.width),
                original_start: subtitle.start_time(),
                original_end: subtitle.end_time(),
            });
            self.set_selected_subtitle(Some(index));
            self.events.push(TimelineEvent::SubtitleSelected(index));
            self.cursor = match handle {
                DragHandle::Move => CursorHint::Grabbing,
                _ => CursorHint::ResizeHorizontal,
            };
        } else {
            self.gesture = Gesture::Create(CreateSession {
                anchor_time: time,
                current_time: time,
            });
            self.cursor = CursorHint::Crosshair;
        }
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        if !self.accepts_input() {
            return;
        }
        match self.gesture {
            Gesture::Drag(session) => self.drag_to(session, x),
            Gesture::Create(mut session) => {
                session.current_time = self.time_at(x);
                self.gesture = Gesture::Create(session);
            }
            Gesture::Idle => self.cursor = self.hover_hint(x, y),
        }
    }

    pub fn pointer_up(&mut self, x: f64, y: f64) {
        if let Gesture::Create(session) = self.gesture {
            let end = if self.accepts_input() {
                self.time_at(x)
            } else {
                session.current_time
            };
            let (start, end) = if session.anchor_time <= end {
                (session.anchor_time, end)
            } else {
                (end, session.anchor_time)
            };
            if end - start >= self.config.min_create_span {
                log::debug!("Caption drawn from {:.2}s to {:.2}s", start, end);
                self.events.push(TimelineEvent::SubtitleAdded { start, end });
            }
        }
        self.gesture = Gesture::Idle;
        self.snap_guides.clear();
        self.cursor = if self.accepts_input() {
            self.hover_hint(x, y)
        } else {
            CursorHint::Default
        };
    }

    /// The pointer left the widget: drop a half-drawn caption and put a
    /// dragged one back where it started.
    pub fn pointer_leave(&mut self) {
        if let Gesture::Drag(session) = self.gesture {
            if let Some(subtitle) = self.subtitles.get_mut(session.index) {
                if subtitle.start_time() != session.original_start
                    || subtitle.end_time() != session.original_end
                {
                    subtitle.set_bounds(session.original_start, session.original_end);
                    self.events.push(TimelineEvent::SubtitleChanged {
                        index: session.index,
                        start: subtitle.start_time(),
                        end: subtitle.end_time(),
                    });
                }
            }
        }
        self.gesture = Gesture::Idle;
        self.snap_guides.clear();
        self.cursor = CursorHint::Default;
    }

    /// Zoom around the playback position.
    pub fn wheel(&mut self, direction: ZoomDirection) {
        self.viewport
            .zoom(direction, self.config.zoom_factor, self.position);
    }

    pub fn zoom_in(&mut self) {
        self.wheel(ZoomDirection::In);
    }

    pub fn zoom_out(&mut self) {
        self.wheel(ZoomDirection::Out);
    }

    pub fn reset_zoom(&mut self) {
        self.viewport.reset();
    }

    pub fn key_delete(&mut self) {
        if let Some(index) = self.selected {
            self.events.push(TimelineEvent::SubtitleDeleted(index));
            self.set_selected_subtitle(None);
        }
    }

    pub fn set_snap_enabled(&mut self, enabled: bool) {
        self.config.snap_enabled = enabled;
        if !enabled {
            self.snap_guides.clear();
        }
    }

    pub fn snap_enabled(&self) -> bool {
        self.config.snap_enabled
    }

    fn accepts_input(&self) -> bool {
        self.viewport.duration() > 0.0 && self.width > 0.0
    }

    /// Time under `x`, clamped to the audio.
    fn time_at(&self, x: f64) -> f64 {
        self.viewport
            .x_to_time(x, self.width)
            .clamp(0.0, self.viewport.duration())
    }

    /// Pixel span of a caption block, or `None` when it is too narrow to
    /// draw.
    pub(super) fn block_span(&self, subtitle: &SubtitleItem) -> Option<(f64, f64)> {
        let left = self.viewport.time_to_x(subtitle.start_time(), self.width);
        let right = self.viewport.time_to_x(subtitle.end_time(), self.width);
        if right - left < self.config.min_block_px || right < 0.0 || left > self.width {
            None
        } else {
            Some((left, right))
        }
    }

    /// Newest caption under the pointer and the handle it grabs.
    fn hit_test(&self, x: f64, y: f64) -> Option<(usize, DragHandle)> {
        if !(BLOCK_TOP..=BLOCK_TOP + BLOCK_HEIGHT).contains(&y) {
            return None;
        }
        let tolerance = self.config.handle_tolerance_px;
        self.subtitles
            .iter()
            .enumerate()
            .rev()
            .find_map(|(index, subtitle)| {
                let (left, right) = self.block_span(subtitle)?;
                if x < left - tolerance || x > right + tolerance {
                    return None;
                }
                let to_left = (x - left).abs();
                let to_right = (x - right).abs();
                let handle = if to_left <= tolerance && to_left <= to_right {
                    DragHandle::ResizeLeft
                } else if to_right <= tolerance {
                    DragHandle::ResizeRight
                } else if x >= left && x <= right {
                    DragHandle::Move
                } else {
                    return None;
                };
                Some((index, handle))
            })
    }

    fn hover_hint(&self, x: f64, y: f64) -> CursorHint {
        if y <= RULER_HEIGHT {
            return CursorHint::Pointer;
        }
        match self.hit_test(x, y) {
            Some((_, DragHandle::Move)) => CursorHint::Grab,
            Some(_) => CursorHint::ResizeHorizontal,
            None => CursorHint::Crosshair,
        }
    }

    fn drag_to(&mut self, session: DragSession, x: f64) {
        let Some((current_start, current_end)) = self
            .subtitles
            .get(session.index)
            .map(|s| (s.start_time(), s.end_time()))
        else {
            self.gesture = Gesture::Idle;
            return;
        };
        let duration = self.viewport.duration();
        let min_span = self.config.min_resize_span;
        let time = self.viewport.x_to_time(x, self.width);
        self.snap_guides.clear();

        let (start, end) = match session.handle {
            DragHandle::Move => {
                let delta = self.snapped(
                    time - session.anchor_time,
                    &[session.original_start, session.original_end],
                    session.index,
                );
                let lower = -session.original_start;
                let upper = duration - session.original_end;
                // A caption longer than the audio can only sit at zero.
                let delta = if upper < lower { lower } else { delta.clamp(lower, upper) };
                (session.original_start + delta, session.original_end + delta)
            }
            DragHandle::ResizeLeft => {
                let end = current_end;
                let time = time + self.snapped(0.0, &[time], session.index);
                (time.min(end - min_span).max(0.0), end)
            }
            DragHandle::ResizeRight => {
                let start = current_start;
                let time = time + self.snapped(0.0, &[time], session.index);
                (start, time.max(start + min_span).min(duration))
            }
        };

        let before = (current_start, current_end);
        let subtitle = &mut self.subtitles[session.index];
        subtitle.set_bounds(start, end);
        let after = (subtitle.start_time(), subtitle.end_time());
        if after != before {
            self.events.push(TimelineEvent::SubtitleChanged {
                index: session.index,
                start: after.0,
                end: after.1,
            });
        }
    }

    /// Adjust `delta` so that one of the shifted `edges` lands on a snap
    /// target, recording the target as a guide.
    fn snapped(&mut self, delta: f64, edges: &[f64], dragged: usize) -> f64 {
        if !self.config.snap_enabled {
            return delta;
        }
        let mut targets: Vec<SnapTarget> = self
            .subtitles
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != dragged)
            .flat_map(|(_, s)| [s.start_time(), s.end_time()])
            .map(|time| SnapTarget {
                time,
                kind: SnapKind::CaptionEdge,
            })
            .collect();
        targets.push(SnapTarget {
            time: self.position,
            kind: SnapKind::Playhead,
        });

        let sources: Vec<f64> = edges.iter().map(|edge| edge + delta).collect();
        let threshold = self
            .viewport
            .px_to_seconds(self.config.snap_threshold_px, self.width);
        match best_snap(&sources, &targets, threshold) {
            Some(snap) => {
                self.snap_guides.push(snap.target.time);
                delta + snap.delta
            }
            None => delta,
        }
    }
}
