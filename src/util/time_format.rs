// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Time formatting and parsing.
//!
//! Clock strings are used on the ruler and in the UI (`M:SS`, or `H:MM:SS`
//! past the hour). SubRip timestamps are `HH:MM:SS,mmm`.

/// Format seconds as a clock string, truncating fractional seconds.
pub fn format_clock(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

/// Format seconds as a SubRip timestamp, rounded to the nearest millisecond.
pub fn format_srt_timestamp(seconds: f64) -> String {
    let total_ms = if seconds.is_finite() && seconds > 0.0 {
        (seconds * 1000.0).round() as u64
    } else {
        0
    };
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let secs = (total_ms % 60_000) / 1000;
    let millis = total_ms % 1000;

    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, secs, millis)
}

/// Parse `H:MM:SS,mmm` (or with `.` as millisecond separator).
///
/// The millisecond field is read as a count of milliseconds, so `1,5` is
/// 1.005 seconds. Returns `None` for anything malformed.
pub fn parse_srt_timestamp(text: &str) -> Option<f64> {
    let text = text.trim();
    let (clock, millis) = match text.find(|c: char| c == ',' || c == '.') {
        Some(pos) => (&text[..pos], &text[pos + 1..]),
        None => (text, "0"),
    };

    let mut fields = clock.split(':');
    let hours = parse_field(fields.next()?)?;
    let minutes = parse_field(fields.next()?)?;
    let secs = parse_field(fields.next()?)?;
    if fields.next().is_some() || minutes >= 60 || secs >= 60 {
        return None;
    }
    if millis.is_empty() || millis.len() > 3 {
        return None;
    }
    let millis = parse_field(millis)?;

    Some(hours as f64 * 3600.0 + minutes as f64 * 60.0 + secs as f64 + millis as f64 / 1000.0)
}

fn parse_field(field: &str) -> Option<u64> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}
