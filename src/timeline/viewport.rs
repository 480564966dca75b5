// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Visible time window of the timeline.

use crate::util::geometry;

/// The narrowest window zooming can produce, in seconds.
pub const MIN_ZOOM_SPAN: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

/// Window `[start, end]` inside `[0, duration]`.
///
/// When not zoomed the window is the full duration.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    duration: f64,
    start: f64,
    end: f64,
    zoomed: bool,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            duration: 0.0,
            start: 0.0,
            end: 0.0,
            zoomed: false,
        }
    }
}

impl Viewport {
    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn span(&self) -> f64 {
        self.end - self.start
    }

    pub fn is_zoomed(&self) -> bool {
        self.zoomed
    }

    /// Set the total duration. Non-finite or negative values become 0.
    pub fn set_duration(&mut self, duration: f64) {
        self.duration = if duration.is_finite() { duration.max(0.0) } else { 0.0 };
        if self.zoomed && self.duration > 0.0 {
            let span = self.span().min(self.duration);
            self.place(self.start, span);
        } else {
            self.reset();
        }
    }

    /// Show the full duration.
    pub fn reset(&mut self) {
        self.zoomed = false;
        self.start = 0.0;
        self.end = self.duration;
    }

    /// Scale the window by `factor` around `anchor`, keeping the anchor at
    /// the same fraction of the window.
    pub fn zoom(&mut self, direction: ZoomDirection, factor: f64, anchor: f64) {
        if self.duration <= 0.0 || !(factor > 1.0) {
            return;
        }
        let span = self.span();
        let new_span = match direction {
            ZoomDirection::In => span / factor,
            ZoomDirection::Out => span * factor,
        };
        let new_span = new_span.max(MIN_ZOOM_SPAN).min(self.duration);
        if new_span >= self.duration {
            self.reset();
            return;
        }

        let anchor = anchor.clamp(self.start, self.end);
        let fraction = if span > 0.0 { (anchor - self.start) / span } else { 0.5 };
        self.zoomed = true;
        self.place(anchor - fraction * new_span, new_span);
    }

    /// Put a window of `span` at `start`, shifted to fit inside the duration.
    fn place(&mut self, start: f64, span: f64) {
        let start = start.clamp(0.0, (self.duration - span).max(0.0));
        self.start = start;
        self.end = start + span;
        if self.start <= 0.0 && self.end >= self.duration {
            self.reset();
        }
    }

    pub fn time_to_x(&self, time: f64, width: f64) -> f64 {
        geometry::time_to_x(time, self.start, self.end, width)
    }

    pub fn x_to_time(&self, x: f64, width: f64) -> f64 {
        geometry::x_to_time(x, self.start, self.end, width)
    }

    /// Convert a pixel distance into seconds at the current zoom.
    pub fn px_to_seconds(&self, px: f64, width: f64) -> f64 {
        if width <= 0.0 {
            0.0
        } else {
            px * self.span() / width
        }
    }
}
