// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations for media, text and project files.

pub mod media;
pub mod project_store;
pub mod serialization;
pub mod srt;
pub mod text_import;
