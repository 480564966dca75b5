// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Timeline widget.
//!
//! Feeds egui pointer input into the [`TimelineEditor`] and paints its
//! display list. Display lists are rebuilt at the scheduler's rate and the
//! last one is reused in between.

use super::canvas;
use crate::config::TimelineConfig;
use crate::timeline::{
    CursorHint, FrameScheduler, RenderFrame, TimelineEditor, TimelineEvent, ZoomDirection,
};
use std::time::Instant;

const HEIGHT: f32 = 160.0;

pub struct TimelineView {
    pub editor: TimelineEditor,
    scheduler: FrameScheduler,
    frame: RenderFrame,
    hovered: bool,
}

impl TimelineView {
    pub fn new(config: &TimelineConfig) -> Self {
        Self {
            editor: TimelineEditor::new(config.clone()),
            scheduler: FrameScheduler::new(config.frame_interval()),
            frame: RenderFrame::default(),
            hovered: false,
        }
    }

    /// Show the widget and return the editor's events for this frame.
    pub fn show(&mut self, ui: &mut egui::Ui, now: Instant) -> Vec<TimelineEvent> {
        let size = egui::vec2(ui.available_width(), HEIGHT);
        let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click_and_drag());
        self.editor
            .set_size(rect.width() as f64, rect.height() as f64);

        let local = |pos: egui::Pos2| {
            let p = pos - rect.min;
            (p.x as f64, p.y as f64)
        };
        let (pressed, released, latest, scroll) = ui.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.latest_pos(),
                i.raw_scroll_delta.y,
            )
        });
        let hovered = response.hovered();

        if let Some(pos) = latest {
            let (x, y) = local(pos);
            let inside = rect.contains(pos);
            if pressed && hovered {
                self.editor.pointer_down(x, y);
            }
            // A quick click can press and release within one frame.
            if released && self.editor.is_dragging() {
                self.editor.pointer_up(x, y);
            } else if !inside {
                if self.hovered || self.editor.is_dragging() {
                    self.editor.pointer_leave();
                }
            } else if !pressed {
                self.editor.pointer_move(x, y);
            }
        } else if self.hovered {
            self.editor.pointer_leave();
        }
        self.hovered = hovered;

        if hovered {
            if let Some(direction) = wheel_zoom(scroll) {
                self.editor.wheel(direction);
            }
            ui.ctx().set_cursor_icon(cursor_icon(self.editor.cursor_hint()));
        }

        if self.scheduler.should_paint(now) {
            self.frame = self.editor.paint();
        }
        canvas::paint(&ui.painter_at(rect), rect.min, &self.frame);

        if self.editor.is_dragging() {
            ui.ctx()
                .request_repaint_after(self.scheduler.time_until_next(now));
        }
        self.editor.take_events()
    }

    /// Time until the next display list is due.
    pub fn next_frame_in(&self, now: Instant) -> std::time::Duration {
        self.scheduler.time_until_next(now)
    }
}

/// Scrolling down (towards the user) zooms in, scrolling up zooms out.
/// egui reports scrolling up as a positive `y` delta.
fn wheel_zoom(delta_y: f32) -> Option<ZoomDirection> {
    if delta_y < 0.0 {
        Some(ZoomDirection::In)
    } else if delta_y > 0.0 {
        Some(ZoomDirection::Out)
    } else {
        None
    }
}

fn cursor_icon(hint: CursorHint) -> egui::CursorIcon {
    match hint {
        CursorHint::Default => egui::CursorIcon::Default,
        CursorHint::Pointer => egui::CursorIcon::PointingHand,
        CursorHint::Crosshair => egui::CursorIcon::Crosshair,
        CursorHint::ResizeHorizontal => egui::CursorIcon::ResizeHorizontal,
        CursorHint::Grab => egui::CursorIcon::Grab,
        CursorHint::Grabbing => egui::CursorIcon::Grabbing,
    }
}
