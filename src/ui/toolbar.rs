// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Transport toolbar.
//!
//! Playback controls, caption shortcuts and the time display.

use crate::util::time_format::format_clock;

/// Result of toolbar interaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToolbarAction {
    None,
    TogglePlay,
    Stop,
    Skip(f64),
    AddCaption,
    DeleteSelected,
    ZoomIn,
    ZoomOut,
    ResetZoom,
}

pub struct ToolbarState {
    pub has_audio: bool,
    pub playing: bool,
    pub has_selection: bool,
    pub position: f64,
    pub duration: f64,
    pub skip_secs: f64,
}

/// Display the toolbar.
pub fn show(ui: &mut egui::Ui, state: &ToolbarState) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        ui.add_enabled_ui(state.has_audio, |ui| {
            if ui.button(format!("⏪ {}s", state.skip_secs)).clicked() {
                action = ToolbarAction::Skip(-state.skip_secs);
            }
            let label = if state.playing { "⏸ Pause" } else { "▶ Play" };
            if ui.button(label).clicked() {
                action = ToolbarAction::TogglePlay;
            }
            if ui.button("⏹ Stop").clicked() {
                action = ToolbarAction::Stop;
            }
            if ui.button(format!("{}s ⏩", state.skip_secs)).clicked() {
                action = ToolbarAction::Skip(state.skip_secs);
            }

            ui.separator();

            if ui.button("➕ Add caption").clicked() {
                action = ToolbarAction::AddCaption;
            }
        });

        if ui
            .add_enabled(state.has_selection, egui::Button::new("🗑 Delete"))
            .clicked()
        {
            action = ToolbarAction::DeleteSelected;
        }

        ui.separator();

        if ui.button("🔍+").clicked() {
            action = ToolbarAction::ZoomIn;
        }
        if ui.button("🔍-").clicked() {
            action = ToolbarAction::ZoomOut;
        }
        if ui.button("Fit").clicked() {
            action = ToolbarAction::ResetZoom;
        }

        ui.separator();

        ui.label(
            egui::RichText::new(format!(
                "{} / {}",
                format_clock(state.position),
                format_clock(state.duration)
            ))
            .monospace(),
        );
    });

    action
}
