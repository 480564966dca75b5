// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module provides the linear mapping between timeline time (seconds)
//! and horizontal pixel coordinates for a visible time window.

/// Convert a time in seconds to an x coordinate within a widget `width`
/// pixels wide showing the window `[window_start, window_end]`.
pub fn time_to_x(time: f64, window_start: f64, window_end: f64, width: f64) -> f64 {
    let span = window_end - window_start;
    if span <= 0.0 || width <= 0.0 {
        return 0.0;
    }
    (time - window_start) / span * width
}

/// Inverse of [`time_to_x`].
pub fn x_to_time(x: f64, window_start: f64, window_end: f64, width: f64) -> f64 {
    let span = window_end - window_start;
    if span <= 0.0 || width <= 0.0 {
        return window_start;
    }
    window_start + x / width * span
}
