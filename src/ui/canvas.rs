// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Painting of timeline display lists.
//!
//! Draw commands are in widget-local pixels; they are offset by the
//! widget's origin and drawn with the egui painter.

use crate::timeline::{DrawCmd, RenderFrame};

/// Draw a frame with its top-left corner at `origin`.
pub fn paint(painter: &egui::Painter, origin: egui::Pos2, frame: &RenderFrame) {
    let offset = origin.to_vec2();

    for command in &frame.commands {
        match command {
            DrawCmd::Fill { rect, color } => {
                painter.rect_filled(rect.translate(offset), 0.0, *color);
            }
            DrawCmd::Block {
                rect,
                rounding,
                fill,
                stroke,
            } => {
                painter.rect(rect.translate(offset), *rounding, *fill, *stroke);
            }
            DrawCmd::Line { from, to, stroke } => {
                painter.line_segment([*from + offset, *to + offset], *stroke);
            }
            DrawCmd::DashedLine {
                from,
                to,
                stroke,
                dash,
                gap,
            } => {
                painter.extend(egui::Shape::dashed_line(
                    &[*from + offset, *to + offset],
                    *stroke,
                    *dash,
                    *gap,
                ));
            }
            DrawCmd::Triangle { points, color } => {
                // Shift each corner into screen space
                let points = points.iter().map(|p| *p + offset).collect();
                painter.add(egui::Shape::convex_polygon(points, *color, egui::Stroke::NONE));
            }
            DrawCmd::Text {
                pos,
                anchor,
                text,
                size,
                color,
            } => {
                painter.text(
                    *pos + offset,
                    anchor.to_align(),
                    text,
                    egui::FontId::proportional(*size),
                    *color,
                );
            }
        }
    }
}
