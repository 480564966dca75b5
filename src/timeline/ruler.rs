// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Time ruler tick layout.

use super::viewport::Viewport;

/// Major and minor tick spacing in seconds for a visible span.
pub fn tick_interval(span: f64) -> (f64, f64) {
    if span <= 10.0 {
        (1.0, 0.2)
    } else if span <= 30.0 {
        (2.0, 0.5)
    } else if span <= 60.0 {
        (5.0, 1.0)
    } else if span <= 300.0 {
        (30.0, 5.0)
    } else if span <= 600.0 {
        (60.0, 10.0)
    } else {
        (300.0, 60.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    pub time: f64,
    pub x: f64,
    pub major: bool,
}

/// Ticks visible in the viewport, left to right.
pub fn ticks(viewport: &Viewport, width: f64) -> Vec<Tick> {
    let span = viewport.span();
    if span <= 0.0 || width <= 0.0 {
        return Vec::new();
    }
    let (major, minor) = tick_interval(span);

    // Step by integer multiples of the minor interval to avoid drift.
    let first = (viewport.start() / minor).ceil() as i64;
    let last = (viewport.end() / minor + 1e-9).floor() as i64;
    let per_major = (major / minor).round() as i64;

    (first..=last)
        .map(|step| {
            let time = step as f64 * minor;
            Tick {
                time,
                x: viewport.time_to_x(time, width),
                major: step % per_major == 0,
            }
        })
        .collect()
}
