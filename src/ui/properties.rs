// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Caption properties panel.
//!
//! This module provides the side panel listing captions, editing the
//! selected caption's text and browsing imported text lines.

use crate::models::project::ProjectData;
use crate::util::time_format::format_clock;

/// Result of panel interaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertiesAction {
    None,
    Select(usize),
    Delete(usize),
    /// Text editing of a caption is about to start.
    BeginEdit(usize),
    Seek(f64),
    DistributeText,
}

/// Panel view state kept between frames.
#[derive(Debug, Default)]
pub struct PanelState {
    pub sort_by_time: bool,
    pub text_query: String,
}

/// Display the properties panel.
pub fn show(ui: &mut egui::Ui, project: &mut ProjectData, state: &mut PanelState) -> PropertiesAction {
    let mut action = PropertiesAction::None;

    ui.heading("Captions");
    ui.horizontal(|ui| {
        ui.label(format!("{} total", project.subtitles.len()));
        ui.checkbox(&mut state.sort_by_time, "Sort by time");
    });

    let overlaps = project.overlaps();
    if !overlaps.is_empty() {
        ui.label(
            egui::RichText::new(format!("⚠ {} overlapping pair(s)", overlaps.len()))
                .color(egui::Color32::from_rgb(230, 170, 60)),
        );
    }
    ui.separator();

    let order: Vec<usize> = if state.sort_by_time {
        project.sorted_indices()
    } else {
        (0..project.subtitles.len()).collect()
    };

    egui::ScrollArea::vertical()
        .id_source("caption_list")
        .max_height(ui.available_height() * 0.5)
        .show(ui, |ui| {
            if order.is_empty() {
                ui.label(egui::RichText::new("Drag on the timeline to add captions").weak());
            }
            for idx in order {
                let subtitle = &project.subtitles[idx];
                let label = format!(
                    "#{}  {} - {}  {}",
                    idx + 1,
                    format_clock(subtitle.start_time()),
                    format_clock(subtitle.end_time()),
                    subtitle.text
                );
                if ui.selectable_label(subtitle.selected, label).clicked() {
                    action = PropertiesAction::Select(idx);
                }
            }
        });

    ui.separator();

    // Selected caption details
    if let Some(idx) = project.selected_index() {
        ui.label(egui::RichText::new(format!("Caption #{}", idx + 1)).strong());
        let (start, end) = {
            let subtitle = &project.subtitles[idx];
            (subtitle.start_time(), subtitle.end_time())
        };
        ui.label(format!("{:.2}s - {:.2}s ({:.2}s)", start, end, end - start));

        let response = ui.add(
            egui::TextEdit::multiline(&mut project.subtitles[idx].text)
                .desired_rows(2)
                .desired_width(f32::INFINITY),
        );
        if response.gained_focus() {
            action = PropertiesAction::BeginEdit(idx);
        }
        if response.changed() {
            project.touch();
        }

        ui.horizontal(|ui| {
            if ui.button("Jump to").clicked() {
                action = PropertiesAction::Seek(start);
            }
            if ui.button("Delete").clicked() {
                action = PropertiesAction::Delete(idx);
            }
        });
        ui.separator();
    }

    // Imported text lines
    let text = &project.text;
    egui::CollapsingHeader::new(format!("Imported text ({} lines)", text.lines().len()))
        .default_open(true)
        .show(ui, |ui| {
            if text.is_empty() {
                ui.label(egui::RichText::new("Import a .txt file to fill new captions").weak());
                return;
            }
            ui.horizontal(|ui| {
                ui.label("Find:");
                ui.text_edit_singleline(&mut state.text_query);
            });
            let matches = text.search(&state.text_query);
            if ui.button("Distribute over audio").clicked() {
                action = PropertiesAction::DistributeText;
            }

            egui::ScrollArea::vertical()
                .id_source("text_lines")
                .show(ui, |ui| {
                    let upcoming = text.upcoming_index();
                    for (i, line) in text.lines().iter().enumerate() {
                        let mut label = egui::RichText::new(format!("{}. {}", i + 1, line));
                        if Some(i) == upcoming {
                            label = label.strong().color(egui::Color32::from_rgb(110, 200, 120));
                        } else if matches.contains(&i) {
                            label = label.color(egui::Color32::from_rgb(250, 220, 80));
                        }
                        ui.label(label);
                    }
                });
        });

    action
}
