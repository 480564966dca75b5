// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Saved projects window.

use crate::io::project_store::ProjectSummary;

#[derive(Debug, Clone, PartialEq)]
pub enum ProjectsAction {
    None,
    Save(String),
    Load(String),
    Delete(String),
    Export(String),
    Import,
}

#[derive(Debug, Default)]
pub struct ProjectsDialog {
    pub open: bool,
    save_name: String,
    entries: Vec<ProjectSummary>,
    recent: Vec<String>,
}

impl ProjectsDialog {
    /// Open the window with a fresh listing.
    pub fn open_with(&mut self, entries: Vec<ProjectSummary>, recent: Vec<String>, current_name: &str) {
        self.entries = entries;
        self.recent = recent;
        self.save_name = current_name.to_string();
        self.open = true;
    }

    pub fn show(&mut self, ctx: &egui::Context) -> ProjectsAction {
        let mut action = ProjectsAction::None;
        let mut open = self.open;

        egui::Window::new("Projects")
            .open(&mut open)
            .default_width(420.0)
            .collapsible(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label("Save as:");
                    ui.text_edit_singleline(&mut self.save_name);
                    let valid = !self.save_name.trim().is_empty();
                    if ui.add_enabled(valid, egui::Button::new("Save")).clicked() {
                        action = ProjectsAction::Save(self.save_name.trim().to_string());
                    }
                });

                if !self.recent.is_empty() {
                    ui.label(
                        egui::RichText::new(format!("Recent: {}", self.recent.join(", "))).weak(),
                    );
                }
                ui.separator();

                if self.entries.is_empty() {
                    ui.label("No saved projects");
                }
                egui::ScrollArea::vertical().max_height(300.0).show(ui, |ui| {
                    egui::Grid::new("project_list")
                        .striped(true)
                        .num_columns(4)
                        .show(ui, |ui| {
                            for entry in &self.entries {
                                ui.label(egui::RichText::new(&entry.name).strong());
                                ui.label(format!(
                                    "{} captions{}",
                                    entry.subtitle_count,
                                    if entry.has_audio { ", audio" } else { "" }
                                ));
                                ui.label(
                                    entry
                                        .last_modified
                                        .with_timezone(&chrono::Local)
                                        .format("%Y-%m-%d %H:%M")
                                        .to_string(),
                                );
                                ui.horizontal(|ui| {
                                    if ui.button("Open").clicked() {
                                        action = ProjectsAction::Load(entry.name.clone());
                                    }
                                    if ui.button("Export").clicked() {
                                        action = ProjectsAction::Export(entry.name.clone());
                                    }
                                    if ui.button("Delete").clicked() {
                                        action = ProjectsAction::Delete(entry.name.clone());
                                    }
                                });
                                ui.end_row();
                            }
                        });
                });

                ui.separator();
                if ui.button("Import project file...").clicked() {
                    action = ProjectsAction::Import;
                }
            });

        self.open = open;
        action
    }
}
