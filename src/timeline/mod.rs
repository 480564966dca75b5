// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Headless timeline editor.
//!
//! The editor owns the viewport, gesture and selection state of the caption
//! timeline. Input arrives as widget-local pointer positions, output leaves as
//! [`TimelineEvent`]s and a display list from [`TimelineEditor::paint`], so
//! none of it needs a window to run.

pub mod editor;
pub mod render;
pub mod ruler;
pub mod scheduler;
pub mod snap;
pub mod viewport;

pub use editor::{CursorHint, TimelineEditor, TimelineEvent};
pub use render::{DrawCmd, RenderFrame, TextAnchor};
pub use scheduler::FrameScheduler;
pub use viewport::{Viewport, ZoomDirection};

/// Bottom of the ruler band; clicks above it seek.
pub const RULER_HEIGHT: f64 = 50.0;
/// Top of the caption track background.
pub const TRACK_TOP: f64 = 60.0;
/// Space left under the track background.
pub const TRACK_BOTTOM_MARGIN: f64 = 20.0;
/// Spacing of the horizontal track guide lines.
pub const GUIDE_SPACING: f64 = 30.0;
pub const BLOCK_TOP: f64 = 70.0;
pub const BLOCK_HEIGHT: f64 = 20.0;
/// Blocks at least this wide show their text.
pub const BLOCK_TEXT_MIN_WIDTH: f64 = 30.0;
/// Caption text beyond this many characters is cut off with `...`.
pub const BLOCK_TEXT_MAX_CHARS: usize = 10;
