// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Timeline painting.
//!
//! [`TimelineEditor::paint`] turns the editor state into a list of draw
//! commands in widget-local coordinates. It has no side effects, so the
//! same state always produces the same frame.

use super::editor::{Gesture, TimelineEditor};
use super::{
    ruler, BLOCK_HEIGHT, BLOCK_TEXT_MAX_CHARS, BLOCK_TEXT_MIN_WIDTH, BLOCK_TOP, GUIDE_SPACING,
    RULER_HEIGHT, TRACK_BOTTOM_MARGIN, TRACK_TOP,
};
use crate::util::time_format::format_clock;
use egui::{pos2, Color32, Pos2, Rect, Stroke};

const BACKGROUND: Color32 = Color32::from_gray(30);
const RULER_BACKGROUND: Color32 = Color32::from_gray(45);
const TRACK_BACKGROUND: Color32 = Color32::from_gray(38);
const GUIDE: Color32 = Color32::from_gray(52);
const TICK_MAJOR: Color32 = Color32::from_gray(200);
const TICK_MINOR: Color32 = Color32::from_gray(110);
const LABEL: Color32 = Color32::from_gray(210);
const BLOCK: Color32 = Color32::from_rgb(70, 130, 200);
const BLOCK_SELECTED: Color32 = Color32::from_rgb(235, 155, 55);
const BLOCK_OUTLINE: Color32 = Color32::from_gray(15);
const BLOCK_TEXT: Color32 = Color32::WHITE;
const HANDLE: Color32 = Color32::WHITE;
const PLAYHEAD: Color32 = Color32::from_rgb(230, 60, 60);
const SNAP_GUIDE: Color32 = Color32::from_rgb(250, 220, 80);
const PREVIEW: Color32 = Color32::from_rgba_premultiplied(60, 100, 60, 100);

const HANDLE_WIDTH: f64 = 4.0;
const PLAYHEAD_HEAD: f64 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    LeftTop,
    LeftCenter,
    Center,
}

impl TextAnchor {
    pub fn to_align(self) -> egui::Align2 {
        match self {
            TextAnchor::LeftTop => egui::Align2::LEFT_TOP,
            TextAnchor::LeftCenter => egui::Align2::LEFT_CENTER,
            TextAnchor::Center => egui::Align2::CENTER_CENTER,
        }
    }
}

/// One drawing primitive, in widget-local pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Fill {
        rect: Rect,
        color: Color32,
    },
    Block {
        rect: Rect,
        rounding: f32,
        fill: Color32,
        stroke: Stroke,
    },
    Line {
        from: Pos2,
        to: Pos2,
        stroke: Stroke,
    },
    DashedLine {
        from: Pos2,
        to: Pos2,
        stroke: Stroke,
        dash: f32,
        gap: f32,
    },
    Triangle {
        points: [Pos2; 3],
        color: Color32,
    },
    Text {
        pos: Pos2,
        anchor: TextAnchor,
        text: String,
        size: f32,
        color: Color32,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderFrame {
    pub commands: Vec<DrawCmd>,
    /// Storage indices of the caption blocks that were drawn.
    pub caption_blocks: Vec<usize>,
}

impl RenderFrame {
    fn push(&mut self, command: DrawCmd) {
        self.commands.push(command);
    }
}

fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Rect {
    Rect::from_min_max(pos2(x0 as f32, y0 as f32), pos2(x1 as f32, y1 as f32))
}

fn point(x: f64, y: f64) -> Pos2 {
    pos2(x as f32, y as f32)
}

fn truncate(text: &str) -> String {
    if text.chars().count() > BLOCK_TEXT_MAX_CHARS {
        let head: String = text.chars().take(BLOCK_TEXT_MAX_CHARS).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

impl TimelineEditor {
    pub fn paint(&self) -> RenderFrame {
        let mut frame = RenderFrame::default();
        let (width, height) = (self.width, self.height);
        frame.push(DrawCmd::Fill {
            rect: rect(0.0, 0.0, width, height),
            color: BACKGROUND,
        });

        if self.viewport.duration() <= 0.0 {
            frame.push(DrawCmd::Text {
                pos: point(width / 2.0, height / 2.0),
                anchor: TextAnchor::Center,
                text: "Load an audio file to start editing".to_string(),
                size: 14.0,
                color: LABEL,
            });
            return frame;
        }

        self.paint_ruler(&mut frame);
        self.paint_track(&mut frame);
        self.paint_blocks(&mut frame);
        self.paint_playhead(&mut frame);
        self.paint_overlays(&mut frame);
        frame
    }

    fn paint_ruler(&self, frame: &mut RenderFrame) {
        frame.push(DrawCmd::Fill {
            rect: rect(0.0, 0.0, self.width, RULER_HEIGHT),
            color: RULER_BACKGROUND,
        });

        for tick in ruler::ticks(&self.viewport, self.width) {
            let (top, color) = if tick.major {
                (RULER_HEIGHT - 20.0, TICK_MAJOR)
            } else {
                (RULER_HEIGHT - 8.0, TICK_MINOR)
            };
            frame.push(DrawCmd::Line {
                from: point(tick.x, top),
                to: point(tick.x, RULER_HEIGHT),
                stroke: Stroke::new(1.0, color),
            });
            if tick.major {
                frame.push(DrawCmd::Text {
                    pos: point(tick.x + 3.0, 6.0),
                    anchor: TextAnchor::LeftTop,
                    text: format_clock(tick.time),
                    size: 11.0,
                    color: LABEL,
                });
            }
        }
    }

    fn paint_track(&self, frame: &mut RenderFrame) {
        let bottom = self.height - TRACK_BOTTOM_MARGIN;
        if bottom <= TRACK_TOP {
            return;
        }
        frame.push(DrawCmd::Fill {
            rect: rect(0.0, TRACK_TOP, self.width, bottom),
            color: TRACK_BACKGROUND,
        });

        let mut y = TRACK_TOP + GUIDE_SPACING;
        while y < bottom {
            frame.push(DrawCmd::Line {
                from: point(0.0, y),
                to: point(self.width, y),
                stroke: Stroke::new(1.0, GUIDE),
            });
            y += GUIDE_SPACING;
        }
    }

    fn paint_blocks(&self, frame: &mut RenderFrame) {
        let bottom = BLOCK_TOP + BLOCK_HEIGHT;
        let middle = BLOCK_TOP + BLOCK_HEIGHT / 2.0;

        for (index, subtitle) in self.subtitles.iter().enumerate() {
            let Some((left, right)) = self.block_span(subtitle) else {
                continue;
            };
            let selected = self.selected == Some(index);

            frame.push(DrawCmd::Block {
                rect: rect(left, BLOCK_TOP, right, bottom),
                rounding: 3.0,
                fill: if selected { BLOCK_SELECTED } else { BLOCK },
                stroke: Stroke::new(1.0, BLOCK_OUTLINE),
            });
            frame.push(DrawCmd::Text {
                pos: point(left + 3.0, middle),
                anchor: TextAnchor::LeftCenter,
                text: format!("#{}", index + 1),
                size: 10.0,
                color: BLOCK_TEXT,
            });
            if right - left > BLOCK_TEXT_MIN_WIDTH {
                frame.push(DrawCmd::Text {
                    pos: point(left + 24.0, middle),
                    anchor: TextAnchor::LeftCenter,
                    text: truncate(&subtitle.text),
                    size: 11.0,
                    color: BLOCK_TEXT,
                });
            }

            if selected {
                for x in [left, right - HANDLE_WIDTH] {
                    frame.push(DrawCmd::Fill {
                        rect: rect(x, BLOCK_TOP, x + HANDLE_WIDTH, bottom),
                        color: HANDLE,
                    });
                }
            }
            frame.caption_blocks.push(index);
        }
    }

    fn paint_playhead(&self, frame: &mut RenderFrame) {
        let x = self.viewport.time_to_x(self.position, self.width);
        if x < 0.0 || x > self.width {
            return;
        }
        frame.push(DrawCmd::Line {
            from: point(x, 0.0),
            to: point(x, self.height),
            stroke: Stroke::new(2.0, PLAYHEAD),
        });
        frame.push(DrawCmd::Triangle {
            points: [
                point(x - PLAYHEAD_HEAD, 0.0),
                point(x + PLAYHEAD_HEAD, 0.0),
                point(x, PLAYHEAD_HEAD * 1.5),
            ],
            color: PLAYHEAD,
        });
    }

    fn paint_overlays(&self, frame: &mut RenderFrame) {
        for &time in &self.snap_guides {
            let x = self.viewport.time_to_x(time, self.width);
            frame.push(DrawCmd::DashedLine {
                from: point(x, RULER_HEIGHT),
                to: point(x, self.height),
                stroke: Stroke::new(1.0, SNAP_GUIDE),
                dash: 4.0,
                gap: 3.0,
            });
        }

        if let Gesture::Create(session) = self.gesture {
            let left = self
                .viewport
                .time_to_x(session.anchor_time.min(session.current_time), self.width);
            let right = self
                .viewport
                .time_to_x(session.anchor_time.max(session.current_time), self.width);
            frame.push(DrawCmd::Block {
                rect: rect(left, BLOCK_TOP, right, BLOCK_TOP + BLOCK_HEIGHT),
                rounding: 3.0,
                fill: PREVIEW,
                stroke: Stroke::new(1.0, Color32::from_rgb(120, 200, 120)),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimelineConfig;
    use crate::models::subtitle::SubtitleItem;

    fn editor(duration: f64, captions: &[(f64, f64, &str)]) -> TimelineEditor {
        let mut editor = TimelineEditor::new(TimelineConfig::default());
        editor.set_size(600.0, 200.0);
        editor.set_duration(duration);
        let subtitles: Vec<SubtitleItem> = captions
            .iter()
            .map(|&(start, end, text)| SubtitleItem::new(text, start, end))
            .collect();
        editor.set_subtitles(&subtitles);
        editor
    }

    fn texts(frame: &RenderFrame) -> Vec<&str> {
        frame
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCmd::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_placeholder_without_duration() {
        let frame = editor(0.0, &[(1.0, 2.0, "x")]).paint();
        assert_eq!(frame.commands.len(), 2);
        assert!(frame.caption_blocks.is_empty());
        assert_eq!(texts(&frame), vec!["Load an audio file to start editing"]);
    }

    #[test]
    fn test_blocks_in_storage_order_skip_narrow() {
        // 20px per second: the 0.1s caption is 2px wide.
        let frame = editor(30.0, &[(10.0, 12.0, "a"), (1.0, 1.1, "b"), (3.0, 4.0, "c")]).paint();
        assert_eq!(frame.caption_blocks, vec![0, 2]);
        let labels = texts(&frame);
        assert!(labels.contains(&"#1"));
        assert!(labels.contains(&"#3"));
        assert!(!labels.contains(&"#2"));
    }

    #[test]
    fn test_long_text_truncated() {
        let frame = editor(30.0, &[(0.0, 10.0, "A rather long caption")]).paint();
        assert!(texts(&frame).contains(&"A rather l..."));
    }

    #[test]
    fn test_selected_block_has_handles() {
        let mut editor = editor(30.0, &[(0.0, 5.0, "a"), (10.0, 15.0, "b")]);
        let plain = editor.paint();
        editor.set_selected_subtitle(Some(1));
        let selected = editor.paint();

        let fills = |frame: &RenderFrame, wanted: Color32| {
            frame
                .commands
                .iter()
                .filter(|c| matches!(c, DrawCmd::Fill { color, .. } if *color == wanted))
                .count()
        };
        assert_eq!(fills(&plain, HANDLE), 0);
        assert_eq!(fills(&selected, HANDLE), 2);
        assert!(selected
            .commands
            .iter()
            .any(|c| matches!(c, DrawCmd::Block { fill, .. } if *fill == BLOCK_SELECTED)));
    }

    #[test]
    fn test_ruler_labels_use_clock_format() {
        let frame = editor(30.0, &[]).paint();
        let labels = texts(&frame);
        assert!(labels.contains(&"0:00"));
        assert!(labels.contains(&"0:02"));
        assert!(labels.contains(&"0:30"));
    }

    #[test]
    fn test_creation_preview_and_idempotence() {
        let mut editor = editor(30.0, &[]);
        editor.pointer_down(100.0, 80.0);
        editor.pointer_move(200.0, 80.0);

        let frame = editor.paint();
        assert!(frame
            .commands
            .iter()
            .any(|c| matches!(c, DrawCmd::Block { fill, .. } if *fill == PREVIEW)));
        assert_eq!(editor.paint(), frame);
    }

    #[test]
    fn test_playhead_drawn() {
        let mut editor = editor(30.0, &[]);
        editor.set_position(15.0);
        let frame = editor.paint();
        assert!(frame.commands.iter().any(|c| matches!(
            c,
            DrawCmd::Line { from, .. } if (from.x - 300.0).abs() < 1e-3 && from.y == 0.0
        )));
        assert!(frame.commands.iter().any(|c| matches!(c, DrawCmd::Triangle { .. })));
    }
}
