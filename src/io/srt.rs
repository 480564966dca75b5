// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! SubRip (`.srt`) reading and writing.
//!
//! Parsing is lenient: blocks that cannot be understood are skipped and
//! malformed timestamps read as zero. It never fails.

use super::text_import::TextLine;
use crate::models::subtitle::SubtitleItem;
use crate::util::time_format::{format_srt_timestamp, parse_srt_timestamp};
use std::fmt::Write;

const ARROW: &str = "-->";

/// Parse SubRip content into timed text lines.
///
/// Multi-line caption text is joined with single spaces.
pub fn parse(content: &str) -> Vec<TextLine> {
    let normalized = content.replace("\r\n", "\n").replace('\r', "\n");
    let mut parsed = Vec::new();

    for (block_index, block) in split_blocks(&normalized).iter().enumerate() {
        // Index, timing, then at least one line of text.
        if block.len() < 3 || !block[1].contains(ARROW) {
            log::debug!("Skipping malformed subtitle block {}", block_index + 1);
            continue;
        }

        let text = block[2..]
            .iter()
            .map(|line| line.trim())
            .collect::<Vec<_>>()
            .join(" ");
        if text.is_empty() {
            continue;
        }

        let (start, end) = block[1].split_once(ARROW).unwrap_or(("", ""));
        parsed.push(TextLine {
            index: block_index + 1,
            text,
            start_time: parse_timestamp_or_zero(start),
            end_time: parse_timestamp_or_zero(end),
        });
    }

    parsed
}

/// Write captions as SubRip, numbered 1..N in storage order.
pub fn export(subtitles: &[SubtitleItem]) -> String {
    let mut output = String::new();
    for (idx, subtitle) in subtitles.iter().enumerate() {
        // Writing to a String cannot fail.
        let _ = write!(
            output,
            "{}\n{} --> {}\n{}\n\n",
            idx + 1,
            format_srt_timestamp(subtitle.start_time()),
            format_srt_timestamp(subtitle.end_time()),
            subtitle.text
        );
    }
    output
}

fn parse_timestamp_or_zero(field: &str) -> f64 {
    // Cue settings may follow the end timestamp ("00:00:02,000 X1:40").
    let field = field.split_whitespace().next().unwrap_or("");
    match parse_srt_timestamp(field) {
        Some(seconds) => seconds,
        None => {
            log::warn!("Malformed subtitle timestamp {:?}, using 0", field);
            0.0
        }
    }
}

/// Group non-blank lines into blocks separated by blank lines.
fn split_blocks(content: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();
    for line in content.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "1\r\n00:00:01,000 --> 00:00:04,000\r\nFirst subtitle\r\n\r\n2\r\n00:00:05,500 --> 00:00:08,250\r\nSecond subtitle\r\nwith two lines\r\n";

    #[test]
    fn test_parse_blocks() {
        let lines = parse(SAMPLE);

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "First subtitle");
        assert_eq!(lines[0].start_time, 1.0);
        assert_eq!(lines[0].end_time, 4.0);
        assert_eq!(lines[1].text, "Second subtitle with two lines");
        assert!((lines[1].start_time - 5.5).abs() < 1e-9);
        assert!((lines[1].end_time - 8.25).abs() < 1e-9);
    }

    #[test]
    fn test_malformed_timestamp_reads_as_zero() {
        let lines = parse("1\n00:00:xx,000 --> 00:00:03,000\nBroken start\n");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].start_time, 0.0);
        assert_eq!(lines[0].end_time, 3.0);
    }

    #[test]
    fn test_garbage_is_skipped() {
        assert!(parse("").is_empty());
        assert!(parse("just some words\nand more words\nand more").is_empty());
        let lines = parse("1\n00:00:01,000 --> 00:00:02,000\n\n2\n00:00:03,000 --> 00:00:04,000\nKept\n");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "Kept");
    }

    #[test]
    fn test_block_needs_index_timing_and_text() {
        // No index line: only two lines, skipped.
        assert!(parse("00:00:01,000 --> 00:00:02,000\nNo index\n").is_empty());
        // Timing must be the second line.
        assert!(parse("00:00:01,000 --> 00:00:02,000\nText\nMore text\n").is_empty());

        let lines = parse("x\n00:00:01,000 --> 00:00:02,000\nAny index\n\n2\n00:00:03,000 --> 00:00:04,000\nKept\n");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "Any index");
        assert_eq!(lines[1].index, 2);
    }

    #[test]
    fn test_export_blocks() {
        let subtitles = vec![
            SubtitleItem::new("Hello", 1.0, 4.0),
            SubtitleItem::new("World", 83.456, 90.0),
            SubtitleItem::new("Again", 3600.0, 3601.5),
        ];
        let output = export(&subtitles);

        assert_eq!(
            output,
            "1\n00:00:01,000 --> 00:00:04,000\nHello\n\n\
             2\n00:01:23,456 --> 00:01:30,000\nWorld\n\n\
             3\n01:00:00,000 --> 01:00:01,500\nAgain\n\n"
        );
    }

    #[test]
    fn test_export_numbers_every_caption_in_storage_order() {
        let subtitles: Vec<SubtitleItem> = (0..7)
            .rev()
            .map(|i| SubtitleItem::new(format!("line {}", i), i as f64 * 2.0, i as f64 * 2.0 + 1.0))
            .collect();
        let output = export(&subtitles);
        let blocks: Vec<&str> = output.trim_end().split("\n\n").collect();

        assert_eq!(blocks.len(), 7);
        for (i, block) in blocks.iter().enumerate() {
            let mut lines = block.lines();
            assert_eq!(lines.next(), Some((i + 1).to_string().as_str()));
            let timing = lines.next().unwrap_or_default();
            let (start, end) = timing.split_once(" --> ").unwrap();
            assert!(parse_srt_timestamp(start).is_some());
            assert!(parse_srt_timestamp(end).is_some());
            assert_eq!(start.len(), "00:00:00,000".len());
            assert_eq!(lines.next(), Some(subtitles[i].text.as_str()));
        }
    }

    #[test]
    fn test_export_then_parse_keeps_timing() {
        let subtitles = vec![SubtitleItem::new("One", 0.5, 2.0), SubtitleItem::new("Two", 2.5, 4.75)];
        let lines = parse(&export(&subtitles));
        assert_eq!(lines.len(), 2);
        assert!((lines[1].start_time - 2.5).abs() < 1e-9);
        assert!((lines[1].end_time - 4.75).abs() < 1e-9);
    }
}
