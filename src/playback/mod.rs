// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Audio playback: transport clock and output sinks.

pub mod decode;
pub mod player;
pub mod sink;

pub use player::{AudioPlayer, PlayerEvent};
pub use sink::{default_sink, AudioSink, FfplaySink, NullSink};
