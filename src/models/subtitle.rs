// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Subtitle data structures.
//!
//! This module defines the caption entity edited on the timeline. Caption
//! bounds can only be set through clamping constructors and setters, so a
//! caption with `end_time <= start_time` can never exist.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Shortest span a caption is ever stored with, in seconds.
pub const MIN_SPAN_SECONDS: f64 = 0.1;

/// Text given to captions created without imported text.
pub const DEFAULT_TEXT: &str = "New subtitle";

/// A timed caption on the subtitle track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtitleItem {
    id: Uuid,
    pub text: String,
    start_time: f64,
    end_time: f64,
    #[serde(default)]
    pub selected: bool,
}

impl SubtitleItem {
    /// Create a new caption. Bounds are normalized, see [`SubtitleItem::set_bounds`].
    pub fn new(text: impl Into<String>, start_time: f64, end_time: f64) -> Self {
        let (start_time, end_time) = normalize_bounds(start_time, end_time);
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            start_time,
            end_time,
            selected: false,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    pub fn end_time(&self) -> f64 {
        self.end_time
    }

    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    /// Check if a time falls within the caption (edges inclusive).
    pub fn contains_time(&self, time: f64) -> bool {
        time >= self.start_time && time <= self.end_time
    }

    /// Check whether two captions overlap in time.
    pub fn overlaps(&self, other: &SubtitleItem) -> bool {
        self.start_time < other.end_time && self.end_time > other.start_time
    }

    /// Set both bounds at once.
    ///
    /// Non-finite values become 0, negative starts clamp to 0, reversed
    /// bounds are swapped and spans shorter than [`MIN_SPAN_SECONDS`] are
    /// widened at the end.
    pub fn set_bounds(&mut self, start_time: f64, end_time: f64) {
        let (start_time, end_time) = normalize_bounds(start_time, end_time);
        self.start_time = start_time;
        self.end_time = end_time;
    }

    /// Re-apply the bounds invariant, used after deserialization.
    pub(crate) fn normalize(&mut self) {
        self.set_bounds(self.start_time, self.end_time);
    }
}

fn normalize_bounds(start: f64, end: f64) -> (f64, f64) {
    let start = if start.is_finite() { start.max(0.0) } else { 0.0 };
    let end = if end.is_finite() { end.max(0.0) } else { 0.0 };
    let (start, end) = if end < start { (end, start) } else { (start, end) };

    if end - start < MIN_SPAN_SECONDS {
        (start, start + MIN_SPAN_SECONDS)
    } else {
        (start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_keeps_valid_bounds() {
        let item = SubtitleItem::new("hello", 1.5, 4.0);
        assert_eq!(item.start_time(), 1.5);
        assert_eq!(item.end_time(), 4.0);
        assert_eq!(item.duration(), 2.5);
        assert!(!item.selected);
    }

    #[test]
    fn test_bounds_never_malformed() {
        let cases = [
            (5.0, 2.0),
            (3.0, 3.0),
            (-4.0, -1.0),
            (f64::NAN, 2.0),
            (1.0, f64::INFINITY),
            (0.0, 0.01),
        ];
        for (start, end) in cases {
            let item = SubtitleItem::new("", start, end);
            assert!(
                item.start_time() < item.end_time(),
                "({}, {}) produced [{}, {}]",
                start,
                end,
                item.start_time(),
                item.end_time()
            );
            assert!(item.start_time() >= 0.0);
        }
    }

    #[test]
    fn test_reversed_bounds_swap() {
        let mut item = SubtitleItem::new("", 0.0, 1.0);
        item.set_bounds(8.0, 6.0);
        assert_eq!((item.start_time(), item.end_time()), (6.0, 8.0));
    }

    #[test]
    fn test_ids_are_unique() {
        let a = SubtitleItem::new("a", 0.0, 1.0);
        let b = SubtitleItem::new("a", 0.0, 1.0);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_overlap() {
        let a = SubtitleItem::new("a", 0.0, 3.0);
        let b = SubtitleItem::new("b", 2.0, 4.0);
        let c = SubtitleItem::new("c", 3.0, 5.0);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }
}
