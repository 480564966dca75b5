// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! UI components for the subtitle editor.

pub mod canvas;
pub mod hotkeys;
pub mod projects;
pub mod properties;
pub mod status;
pub mod timeline;
pub mod toolbar;
