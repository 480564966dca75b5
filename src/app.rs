// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module contains the main application structure that implements
//! the egui::App trait. It owns the current project, the audio player and
//! the timeline, and routes events between them.

use crate::config::EditorConfig;
use crate::io::media::{has_extension, AUDIO_EXTENSIONS};
use crate::io::project_store::{ProjectManager, ProjectStore};
use crate::io::serialization::PROJECT_FILE_EXTENSIONS;
use crate::io::srt;
use crate::io::text_import::{TextFormat, TextManager, TEXT_EXTENSIONS};
use crate::models::project::{AudioResource, DEFAULT_PROJECT_NAME};
use crate::models::subtitle::SubtitleItem;
use crate::playback::{AudioPlayer, PlayerEvent};
use crate::timeline::TimelineEvent;
use crate::ui::hotkeys::{self, HotkeyAction};
use crate::ui::projects::{ProjectsAction, ProjectsDialog};
use crate::ui::properties::{self, PanelState, PropertiesAction};
use crate::ui::status::{MessageCenter, MessageKind};
use crate::ui::timeline::TimelineView;
use crate::ui::toolbar::{self, ToolbarAction, ToolbarState};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// History system for undo/redo of the caption list.
struct History {
    /// Undo stack (past states)
    undo_stack: Vec<Vec<SubtitleItem>>,
    /// Redo stack (future states after undo)
    redo_stack: Vec<Vec<SubtitleItem>>,
    max_size: usize,
}

impl History {
    fn new(max_size: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_size,
        }
    }

    /// Save current state before making a change
    fn push(&mut self, subtitles: Vec<SubtitleItem>) {
        self.undo_stack.push(subtitles);
        if self.undo_stack.len() > self.max_size {
            self.undo_stack.remove(0);
        }
        // Clear redo stack when new action is performed
        self.redo_stack.clear();
    }

    fn undo(&mut self, current: Vec<SubtitleItem>) -> Option<Vec<SubtitleItem>> {
        let previous = self.undo_stack.pop()?;
        self.redo_stack.push(current);
        Some(previous)
    }

    fn redo(&mut self, current: Vec<SubtitleItem>) -> Option<Vec<SubtitleItem>> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push(current);
        Some(next)
    }

    fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

/// Main application state.
pub struct SubtitleEditorApp {
    config: EditorConfig,
    projects: ProjectManager<Box<dyn ProjectStore>>,
    player: AudioPlayer,
    text_manager: TextManager,
    timeline: TimelineView,
    history: History,
    /// Caption list captured when a caption is grabbed, pushed to history
    /// once the drag actually changes it.
    pending_snapshot: Option<Vec<SubtitleItem>>,
    messages: MessageCenter,
    panel: PanelState,
    projects_dialog: ProjectsDialog,
}

impl SubtitleEditorApp {
    pub fn new(config: EditorConfig, store: Box<dyn ProjectStore>, player: AudioPlayer) -> Self {
        Self {
            projects: ProjectManager::new(store),
            player,
            text_manager: TextManager::new(config.limits.max_text_bytes),
            timeline: TimelineView::new(&config.timeline),
            history: History::new(config.history_size),
            pending_snapshot: None,
            messages: MessageCenter::new(Duration::from_secs_f64(config.message_ttl_secs.max(0.0))),
            panel: PanelState::default(),
            projects_dialog: ProjectsDialog::default(),
            config,
        }
    }

    fn info(&mut self, text: impl Into<String>, now: Instant) {
        self.messages.post(MessageKind::Info, text, now);
    }

    fn success(&mut self, text: impl Into<String>, now: Instant) {
        self.messages.post(MessageKind::Success, text, now);
    }

    fn error(&mut self, text: impl Into<String>, now: Instant) {
        self.messages.post(MessageKind::Error, text, now);
    }

    /// Save the caption list to history before making a change
    fn save_to_history(&mut self) {
        self.history
            .push(self.projects.current().subtitles.clone());
    }

    /// Push the editor's view of the project after a change.
    fn sync_timeline(&mut self) {
        let editor = &mut self.timeline.editor;
        let project = self.projects.current();
        editor.set_subtitles(&project.subtitles);
    }

    pub fn open_audio(&mut self, path: &Path, now: Instant) {
        match self.player.load(path) {
            Ok(duration) => {
                // The load queued its own events; apply them now.
                self.drain_player_events(now);
                self.projects.current_mut().set_audio(AudioResource {
                    path: path.to_string_lossy().into_owned(),
                    duration,
                });
                self.success(format!("Loaded {}", display_name(path)), now);
            }
            Err(e) => {
                self.player.take_events();
                self.error(format!("Could not load audio: {}", e), now);
            }
        }
    }

    /// Import a `.txt` file as caption text or a `.srt` file as captions.
    pub fn import_text(&mut self, path: &Path, now: Instant) {
        let mut imported = match self.text_manager.import_file(path) {
            Ok(imported) => imported,
            Err(e) => {
                self.error(format!("Could not import text: {}", e), now);
                return;
            }
        };

        if imported.lines.is_empty() {
            self.error(format!("No text found in {}", imported.file_name), now);
            return;
        }

        match imported.format {
            TextFormat::SubRip => {
                if !imported.is_timed() {
                    imported.auto_assign_times(self.projects.current().duration);
                }
                self.save_to_history();
                let subtitles = imported.to_subtitles();
                let count = subtitles.len();
                self.projects.current_mut().replace_subtitles(subtitles);
                self.sync_timeline();
                self.success(format!("Imported {} subtitles", count), now);
            }
            TextFormat::Plain => {
                let count = imported.lines.len();
                self.projects
                    .current_mut()
                    .import_text_lines(imported.texts());
                self.success(format!("Imported {} lines of text", count), now);
            }
        }
    }

    /// Add a caption taking its text from the imported lines.
    pub fn add_caption(&mut self, start: f64, end: f64) -> usize {
        self.save_to_history();
        let project = self.projects.current_mut();
        let text = project.text.next_line();
        project.add_subtitle(SubtitleItem::new(text, start, end));
        let index = project.subtitles.len() - 1;
        project.select(Some(index));
        log::info!(
            "Added caption #{} ({:.2}s - {:.2}s), total: {}",
            index + 1,
            start,
            end,
            project.subtitles.len()
        );
        self.sync_timeline();
        index
    }

    /// Add a caption of the default length starting at the playhead.
    pub fn add_caption_at_playhead(&mut self, now: Instant) {
        let duration = self.projects.current().duration;
        if duration <= 0.0 {
            self.error("Load an audio file first", now);
            return;
        }
        let length = self.config.default_caption_secs;
        let mut start = self.player.position(now);
        let end = (start + length).min(duration);
        // Near the end, grow backwards instead.
        if end - start < self.config.timeline.min_create_span {
            start = (end - length).max(0.0);
        }
        self.add_caption(start, end);
    }

    pub fn delete_caption(&mut self, index: usize) {
        if index >= self.projects.current().subtitles.len() {
            return;
        }
        self.save_to_history();
        let project = self.projects.current_mut();
        project.remove_subtitle(index);
        project.select(None);
        log::info!("Deleted caption, total: {}", project.subtitles.len());
        self.sync_timeline();
    }

    pub fn delete_selected(&mut self) {
        if let Some(index) = self.projects.current().selected_index() {
            self.delete_caption(index);
        }
    }

    pub fn clear_captions(&mut self, now: Instant) {
        if self.projects.current().subtitles.is_empty() {
            return;
        }
        self.save_to_history();
        self.projects.current_mut().replace_subtitles(Vec::new());
        self.sync_timeline();
        self.info("Cleared all captions", now);
    }

    /// Spread the imported lines over the whole audio.
    pub fn distribute_text(&mut self, now: Instant) {
        let duration = self.projects.current().duration;
        if duration <= 0.0 {
            self.error("Load an audio file first", now);
            return;
        }
        if self.projects.current().text.is_empty() {
            self.error("Import a text file first", now);
            return;
        }
        self.save_to_history();
        let count = self.projects.current_mut().distribute_text(duration);
        self.sync_timeline();
        self.success(format!("Created {} captions from text", count), now);
    }

    pub fn undo(&mut self) {
        let current = self.projects.current().subtitles.clone();
        if let Some(previous) = self.history.undo(current) {
            self.projects.current_mut().replace_subtitles(previous);
            self.pending_snapshot = None;
            self.sync_timeline();
            log::info!("Undo");
        }
    }

    pub fn redo(&mut self) {
        let current = self.projects.current().subtitles.clone();
        if let Some(next) = self.history.redo(current) {
            self.projects.current_mut().replace_subtitles(next);
            self.pending_snapshot = None;
            self.sync_timeline();
            log::info!("Redo");
        }
    }

    pub fn apply_timeline_event(&mut self, event: TimelineEvent, now: Instant) {
        match event {
            TimelineEvent::PositionChanged(time) => {
                self.player.seek(time, now);
                self.projects.current_mut().current_position = time;
            }
            TimelineEvent::SubtitleAdded { start, end } => {
                self.add_caption(start, end);
            }
            TimelineEvent::SubtitleSelected(index) => {
                self.pending_snapshot = Some(self.projects.current().subtitles.clone());
                self.projects.current_mut().select(Some(index));
            }
            TimelineEvent::SubtitleChanged { index, start, end } => {
                if let Some(snapshot) = self.pending_snapshot.take() {
                    self.history.push(snapshot);
                }
                let project = self.projects.current_mut();
                if let Some(subtitle) = project.subtitles.get_mut(index) {
                    subtitle.set_bounds(start, end);
                    project.touch();
                }
            }
            TimelineEvent::SubtitleDeleted(index) => {
                self.delete_caption(index);
            }
        }
    }

    pub fn apply_player_event(&mut self, event: PlayerEvent, now: Instant) {
        match event {
            PlayerEvent::DurationChanged(duration) => {
                self.timeline.editor.set_duration(duration);
                self.projects.current_mut().duration = duration;
            }
            PlayerEvent::PositionChanged(position) => {
                self.timeline.editor.set_position(position);
                self.projects.current_mut().current_position = position;
            }
            PlayerEvent::PlayStateChanged(playing) => {
                log::debug!("Playing: {}", playing);
            }
            PlayerEvent::Error(message) => {
                self.error(message, now);
            }
        }
    }

    fn drain_player_events(&mut self, now: Instant) {
        for event in self.player.take_events() {
            self.apply_player_event(event, now);
        }
    }

    pub fn new_project(&mut self, now: Instant) {
        if let Err(e) = self.projects.new_project(DEFAULT_PROJECT_NAME).map(|_| ()) {
            self.error(format!("Could not create project: {}", e), now);
            return;
        }
        self.player.unload();
        self.drain_player_events(now);
        self.history.clear();
        self.pending_snapshot = None;
        self.timeline.editor.reset_zoom();
        self.sync_timeline();
        self.info("Started a new project", now);
    }

    pub fn save_project(&mut self, name: Option<&str>, now: Instant) {
        match self.projects.save(name) {
            Ok(summary) => self.success(
                format!("Saved \"{}\" ({} captions)", summary.name, summary.subtitle_count),
                now,
            ),
            Err(e) => self.error(format!("Save failed: {}", e), now),
        }
    }

    pub fn load_project(&mut self, name: &str, now: Instant) {
        if let Err(e) = self.projects.load(name) {
            self.error(format!("Could not open \"{}\": {}", name, e), now);
            return;
        }
        self.history.clear();
        self.pending_snapshot = None;

        let project = self.projects.current().clone();
        self.player.unload();
        let mut audio_missing = false;
        if let Some(audio) = &project.audio {
            if self.player.load(Path::new(&audio.path)).is_err() {
                log::warn!("Audio for \"{}\" is unavailable: {}", name, audio.path);
                audio_missing = true;
            }
        }
        self.player.take_events();

        // Without a source the saved duration still bounds seeking.
        let duration = if self.player.source().is_some() {
            self.player.duration()
        } else {
            self.player.set_duration_hint(project.duration);
            project.duration
        };
        self.projects.current_mut().duration = duration;
        self.timeline.editor.set_duration(duration);
        self.timeline.editor.set_position(project.current_position);
        self.timeline.editor.reset_zoom();
        self.player.seek(project.current_position, now);
        self.sync_timeline();
        if audio_missing {
            self.info(format!("Opened \"{}\" without its audio", name), now);
        } else {
            self.success(format!("Opened \"{}\"", name), now);
        }
    }

    pub fn delete_project(&mut self, name: &str, now: Instant) {
        match self.projects.delete(name) {
            Ok(()) => self.info(format!("Deleted \"{}\"", name), now),
            Err(e) => self.error(format!("Could not delete \"{}\": {}", name, e), now),
        }
        self.refresh_projects_dialog(now);
    }

    pub fn export_srt(&mut self, path: &Path, now: Instant) {
        let content = srt::export(&self.projects.current().subtitles);
        match std::fs::write(path, content) {
            Ok(()) => self.success(format!("Exported {}", display_name(path)), now),
            Err(e) => self.error(format!("Export failed: {}", e), now),
        }
    }

    pub fn export_project(&mut self, name: &str, path: &Path, now: Instant) {
        match self.projects.export_project(name, path) {
            Ok(()) => self.success(format!("Exported \"{}\"", name), now),
            Err(e) => self.error(format!("Export failed: {}", e), now),
        }
    }

    pub fn import_project(&mut self, path: &Path, now: Instant) {
        match self.projects.import_project(path) {
            Ok(name) => {
                self.success(format!("Imported project \"{}\"", name), now);
                self.refresh_projects_dialog(now);
            }
            Err(e) => self.error(format!("Import failed: {}", e), now),
        }
    }

    fn refresh_projects_dialog(&mut self, now: Instant) {
        match self.projects.list_all() {
            Ok(entries) => {
                let recent = self.projects.history().to_vec();
                let name = self.projects.current().name.clone();
                self.projects_dialog.open_with(entries, recent, &name);
            }
            Err(e) => self.error(format!("Could not list projects: {}", e), now),
        }
    }

    /// Route a dropped or command-line file by its extension.
    pub fn open_path(&mut self, path: &Path, now: Instant) {
        if has_extension(path, AUDIO_EXTENSIONS) {
            self.open_audio(path, now);
        } else if has_extension(path, TEXT_EXTENSIONS) {
            self.import_text(path, now);
        } else if has_extension(path, PROJECT_FILE_EXTENSIONS) {
            self.import_project(path, now);
        } else {
            self.error(format!("Unsupported file: {}", display_name(path)), now);
        }
    }

    pub fn handle_hotkey(&mut self, action: HotkeyAction, now: Instant) {
        let short = self.config.skip_short_secs;
        let long = self.config.skip_long_secs;
        match action {
            HotkeyAction::PlayPause => self.player.toggle(now),
            HotkeyAction::SkipBackShort => self.player.skip(-short, now),
            HotkeyAction::SkipForwardShort => self.player.skip(short, now),
            HotkeyAction::SkipBackLong => self.player.skip(-long, now),
            HotkeyAction::SkipForwardLong => self.player.skip(long, now),
            HotkeyAction::ZoomIn => self.timeline.editor.zoom_in(),
            HotkeyAction::ZoomOut => self.timeline.editor.zoom_out(),
            HotkeyAction::DeleteSelected => {
                self.timeline.editor.key_delete();
                self.apply_editor_events(now);
            }
            HotkeyAction::SaveProject => self.save_project(None, now),
            HotkeyAction::OpenProjects => self.refresh_projects_dialog(now),
            HotkeyAction::NewProject => self.new_project(now),
            HotkeyAction::Undo => self.undo(),
            HotkeyAction::Redo => self.redo(),
        }
    }

    fn apply_editor_events(&mut self, now: Instant) {
        for event in self.timeline.editor.take_events() {
            self.apply_timeline_event(event, now);
        }
    }

    fn handle_toolbar(&mut self, action: ToolbarAction, now: Instant) {
        match action {
            ToolbarAction::TogglePlay => self.player.toggle(now),
            ToolbarAction::Stop => self.player.stop(now),
            ToolbarAction::Skip(delta) => self.player.skip(delta, now),
            ToolbarAction::AddCaption => self.add_caption_at_playhead(now),
            ToolbarAction::DeleteSelected => self.delete_selected(),
            ToolbarAction::ZoomIn => self.timeline.editor.zoom_in(),
            ToolbarAction::ZoomOut => self.timeline.editor.zoom_out(),
            ToolbarAction::ResetZoom => self.timeline.editor.reset_zoom(),
            ToolbarAction::None => {}
        }
    }

    fn handle_properties(&mut self, action: PropertiesAction, now: Instant) {
        match action {
            PropertiesAction::Select(index) => {
                self.projects.current_mut().select(Some(index));
            }
            PropertiesAction::Delete(index) => self.delete_caption(index),
            PropertiesAction::BeginEdit(_) => self.save_to_history(),
            PropertiesAction::Seek(time) => {
                self.player.seek(time, now);
                self.timeline.editor.set_position(time);
            }
            PropertiesAction::DistributeText => self.distribute_text(now),
            PropertiesAction::None => {}
        }
    }

    fn handle_projects(&mut self, action: ProjectsAction, now: Instant) {
        match action {
            ProjectsAction::Save(name) => {
                self.save_project(Some(&name), now);
                self.refresh_projects_dialog(now);
            }
            ProjectsAction::Load(name) => {
                self.load_project(&name, now);
                self.projects_dialog.open = false;
            }
            ProjectsAction::Delete(name) => self.delete_project(&name, now),
            ProjectsAction::Export(name) => {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("Project", PROJECT_FILE_EXTENSIONS)
                    .set_file_name(format!("{}.json", name))
                    .save_file()
                {
                    self.export_project(&name, &path, now);
                }
            }
            ProjectsAction::Import => {
                if let Some(path) = pick_file("Project", PROJECT_FILE_EXTENSIONS) {
                    self.import_project(&path, now);
                }
            }
            ProjectsAction::None => {}
        }
    }

    fn menu_bar(&mut self, ctx: &egui::Context, now: Instant) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open Audio...").clicked() {
                        if let Some(path) = pick_file("Audio", AUDIO_EXTENSIONS) {
                            self.open_audio(&path, now);
                        }
                        ui.close_menu();
                    }
                    if ui.button("Import Text or Subtitles...").clicked() {
                        if let Some(path) = pick_file("Text", TEXT_EXTENSIONS) {
                            self.import_text(&path, now);
                        }
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("New Project (Ctrl+N)").clicked() {
                        self.new_project(now);
                        ui.close_menu();
                    }
                    if ui.button("Save Project (Ctrl+S)").clicked() {
                        self.save_project(None, now);
                        ui.close_menu();
                    }
                    if ui.button("Projects... (Ctrl+O)").clicked() {
                        self.refresh_projects_dialog(now);
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Export SRT...").clicked() {
                        let stem = self.projects.current().name.clone();
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("SubRip", &["srt"])
                            .set_file_name(format!("{}.srt", stem))
                            .save_file()
                        {
                            self.export_srt(&path, now);
                        }
                        ui.close_menu();
                    }
                    if ui.button("Import Project File...").clicked() {
                        if let Some(path) = pick_file("Project", PROJECT_FILE_EXTENSIONS) {
                            self.import_project(&path, now);
                        }
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("Edit", |ui| {
                    let can_undo = self.history.can_undo();
                    if ui.add_enabled(can_undo, egui::Button::new("Undo (Ctrl+Z)")).clicked() {
                        self.undo();
                        ui.close_menu();
                    }
                    let can_redo = self.history.can_redo();
                    if ui
                        .add_enabled(can_redo, egui::Button::new("Redo (Ctrl+Shift+Z)"))
                        .clicked()
                    {
                        self.redo();
                        ui.close_menu();
                    }

                    ui.separator();

                    let has_selection = self.projects.current().selected_index().is_some();
                    if ui
                        .add_enabled(has_selection, egui::Button::new("Delete Selected"))
                        .clicked()
                    {
                        self.delete_selected();
                        ui.close_menu();
                    }
                    let has_captions = !self.projects.current().subtitles.is_empty();
                    if ui
                        .add_enabled(has_captions, egui::Button::new("Clear All Captions"))
                        .clicked()
                    {
                        self.clear_captions(now);
                        ui.close_menu();
                    }
                    if ui.button("Distribute Text Over Audio").clicked() {
                        self.distribute_text(now);
                        ui.close_menu();
                    }
                });

                ui.menu_button("View", |ui| {
                    if ui.button("Zoom In (+)").clicked() {
                        self.timeline.editor.zoom_in();
                        ui.close_menu();
                    }
                    if ui.button("Zoom Out (-)").clicked() {
                        self.timeline.editor.zoom_out();
                        ui.close_menu();
                    }
                    if ui.button("Reset Zoom").clicked() {
                        self.timeline.editor.reset_zoom();
                        ui.close_menu();
                    }
                    ui.separator();
                    let mut snap = self.timeline.editor.snap_enabled();
                    if ui.checkbox(&mut snap, "Snap to edges").changed() {
                        self.timeline.editor.set_snap_enabled(snap);
                    }
                });
            });
        });
    }
}

impl eframe::App for SubtitleEditorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        self.player.tick(now);
        self.drain_player_events(now);

        // Files dropped onto the window
        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|file| file.path.clone())
                .collect()
        });
        for path in dropped {
            self.open_path(&path, now);
        }

        for action in hotkeys::collect(ctx) {
            self.handle_hotkey(action, now);
        }

        self.menu_bar(ctx, now);

        // Toolbar
        let state = ToolbarState {
            has_audio: self.player.source().is_some(),
            playing: self.player.is_playing(),
            has_selection: self.projects.current().selected_index().is_some(),
            position: self.player.position(now),
            duration: self.player.duration(),
            skip_secs: self.config.skip_short_secs,
        };
        let toolbar_action = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| toolbar::show(ui, &state))
            .inner;
        self.handle_toolbar(toolbar_action, now);

        // Status bar
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(&self.projects.current().name).strong());
                ui.separator();
                self.messages.show(ui, now);
            });
        });

        // Properties panel (right side)
        let properties_action = egui::SidePanel::right("properties")
            .default_width(300.0)
            .show(ctx, |ui| {
                properties::show(ui, self.projects.current_mut(), &mut self.panel)
            })
            .inner;
        self.handle_properties(properties_action, now);

        // Timeline (center)
        self.sync_timeline();
        let events = egui::CentralPanel::default()
            .show(ctx, |ui| {
                if let Some(path) = self.player.source() {
                    ui.label(egui::RichText::new(display_name(path)).weak());
                } else {
                    ui.label(
                        egui::RichText::new("Open or drop an audio file to begin").weak(),
                    );
                }
                let events = self.timeline.show(ui, now);

                // Caption under the playhead
                let position = self.player.position(now);
                let caption = self
                    .projects
                    .current()
                    .subtitles
                    .iter()
                    .find(|s| s.contains_time(position));
                ui.vertical_centered(|ui| match caption {
                    Some(subtitle) => ui.heading(&subtitle.text),
                    None => ui.heading(""),
                });
                events
            })
            .inner;
        for event in events {
            self.apply_timeline_event(event, now);
        }

        let projects_action = self.projects_dialog.show(ctx);
        self.handle_projects(projects_action, now);

        // Keep the clock moving while playing and expire messages on time
        if self.player.is_playing() {
            let wait = self.timeline.next_frame_in(now).max(Duration::from_millis(1));
            ctx.request_repaint_after(wait.min(self.config.player.position_interval()));
        }
        if let Some(remaining) = self.messages.remaining(now) {
            ctx.request_repaint_after(remaining);
        }
    }
}

fn pick_file(label: &str, extensions: &[&str]) -> Option<PathBuf> {
    rfd::FileDialog::new().add_filter(label, extensions).pick_file()
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::io::media::MediaProbe;
    use crate::io::project_store::MemoryStore;
    use crate::playback::NullSink;

    struct FixedProbe(f64);

    impl MediaProbe for FixedProbe {
        fn duration(&self, _path: &Path) -> Result<f64> {
            Ok(self.0)
        }
    }

    fn app() -> SubtitleEditorApp {
        let config = EditorConfig::default();
        let player = AudioPlayer::new(
            &config.player,
            config.limits.max_audio_bytes,
            Box::new(FixedProbe(30.0)),
            Box::new(NullSink),
        );
        SubtitleEditorApp::new(config, Box::new(MemoryStore::default()), player)
    }

    fn app_with_audio(dir: &tempfile::TempDir) -> SubtitleEditorApp {
        let path = dir.path().join("talk.mp3");
        std::fs::write(&path, b"id3").unwrap();
        let mut app = app();
        app.open_audio(&path, Instant::now());
        app
    }

    fn bounds(app: &SubtitleEditorApp) -> Vec<(f64, f64)> {
        app.projects
            .current()
            .subtitles
            .iter()
            .map(|s| (s.start_time(), s.end_time()))
            .collect()
    }

    #[test]
    fn test_open_audio_sets_duration() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_with_audio(&dir);
        assert_eq!(app.projects.current().duration, 30.0);
        assert_eq!(app.timeline.editor.duration(), 30.0);
        assert!(app.projects.current().audio.is_some());
    }

    #[test]
    fn test_added_caption_takes_next_text_line() {
        let mut app = app();
        app.projects
            .current_mut()
            .import_text_lines(vec!["first".into(), "second".into()]);
        let now = Instant::now();

        app.apply_timeline_event(TimelineEvent::SubtitleAdded { start: 1.0, end: 2.0 }, now);
        app.apply_timeline_event(TimelineEvent::SubtitleAdded { start: 3.0, end: 4.0 }, now);
        app.apply_timeline_event(TimelineEvent::SubtitleAdded { start: 5.0, end: 6.0 }, now);

        let texts: Vec<&str> = app
            .projects
            .current()
            .subtitles
            .iter()
            .map(|s| s.text.as_str())
            .collect();
        assert_eq!(texts, vec!["first", "second", "first"]);
        assert_eq!(app.projects.current().selected_index(), Some(2));
        assert_eq!(app.timeline.editor.subtitles().len(), 3);
    }

    #[test]
    fn test_drag_is_one_undo_step() {
        let mut app = app();
        let now = Instant::now();
        app.add_caption(5.0, 8.0);

        app.apply_timeline_event(TimelineEvent::SubtitleSelected(0), now);
        for step in 1..=3 {
            let offset = step as f64;
            app.apply_timeline_event(
                TimelineEvent::SubtitleChanged {
                    index: 0,
                    start: 5.0 + offset,
                    end: 8.0 + offset,
                },
                now,
            );
        }
        assert_eq!(bounds(&app), vec![(8.0, 11.0)]);

        app.undo();
        assert_eq!(bounds(&app), vec![(5.0, 8.0)]);
        app.undo();
        assert!(bounds(&app).is_empty());
        app.redo();
        app.redo();
        assert_eq!(bounds(&app), vec![(8.0, 11.0)]);
    }

    #[test]
    fn test_delete_event_removes_caption() {
        let mut app = app();
        let now = Instant::now();
        app.add_caption(0.0, 3.0);
        app.add_caption(5.0, 8.0);

        app.apply_timeline_event(TimelineEvent::SubtitleDeleted(0), now);
        assert_eq!(bounds(&app), vec![(5.0, 8.0)]);
        assert_eq!(app.timeline.editor.subtitles().len(), 1);
    }

    #[test]
    fn test_add_at_playhead_requires_audio() {
        let mut app = app();
        let now = Instant::now();
        app.add_caption_at_playhead(now);
        assert!(app.projects.current().subtitles.is_empty());
        assert_eq!(app.messages.current(now).map(|m| m.0), Some(MessageKind::Error));
    }

    #[test]
    fn test_add_at_playhead_near_end_grows_backwards() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with_audio(&dir);
        let now = Instant::now();

        app.player.seek(10.0, now);
        app.add_caption_at_playhead(now);
        app.player.seek(30.0, now);
        app.add_caption_at_playhead(now);
        assert_eq!(bounds(&app), vec![(10.0, 13.0), (27.0, 30.0)]);
    }

    #[test]
    fn test_import_srt_replaces_captions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("subs.srt");
        std::fs::write(
            &path,
            "1\n00:00:01,000 --> 00:00:02,000\nOne\n\n2\n00:00:03,000 --> 00:00:05,500\nTwo\n",
        )
        .unwrap();
        let mut app = app();
        app.add_caption(10.0, 12.0);

        app.import_text(&path, Instant::now());
        assert_eq!(bounds(&app), vec![(1.0, 2.0), (3.0, 5.5)]);
        app.undo();
        assert_eq!(bounds(&app), vec![(10.0, 12.0)]);
    }

    #[test]
    fn test_import_txt_fills_text_queue() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("script.txt");
        std::fs::write(&path, "alpha\nbeta\n").unwrap();
        let mut app = app();

        app.import_text(&path, Instant::now());
        assert_eq!(app.projects.current().text.lines(), &["alpha", "beta"]);
        assert!(app.projects.current().subtitles.is_empty());
    }

    #[test]
    fn test_unsupported_drop_reports_error() {
        let mut app = app();
        let now = Instant::now();
        app.open_path(Path::new("movie.avi"), now);
        assert_eq!(app.messages.current(now).map(|m| m.0), Some(MessageKind::Error));
    }

    #[test]
    fn test_save_and_reload_project() {
        let mut app = app();
        let now = Instant::now();
        app.add_caption(1.0, 2.0);
        app.save_project(Some("demo"), now);

        app.new_project(now);
        assert!(app.projects.current().subtitles.is_empty());
        assert!(!app.history.can_undo());

        app.load_project("demo", now);
        assert_eq!(app.projects.current().name, "demo");
        assert_eq!(bounds(&app), vec![(1.0, 2.0)]);
        assert_eq!(app.timeline.editor.subtitles().len(), 1);

        app.load_project("missing", now);
        assert_eq!(app.projects.current().name, "demo");
        assert_eq!(app.messages.current(now).map(|m| m.0), Some(MessageKind::Error));
    }

    #[test]
    fn test_project_with_missing_audio_keeps_timeline() {
        let mut app = app();
        let now = Instant::now();
        let project = app.projects.current_mut();
        project.set_audio(AudioResource {
            path: "/nonexistent/gone.mp3".to_string(),
            duration: 60.0,
        });
        project.current_position = 20.0;
        app.add_caption(40.0, 45.0);
        app.save_project(Some("gone"), now);
        app.new_project(now);

        app.load_project("gone", now);
        assert!(app.player.source().is_none());
        assert_eq!(app.timeline.editor.duration(), 60.0);
        assert_eq!(app.timeline.editor.position(), 20.0);

        // The settled position must not collapse to zero.
        let settled = now + Duration::from_millis(200);
        app.player.tick(settled);
        app.drain_player_events(settled);
        assert_eq!(app.timeline.editor.position(), 20.0);
        assert_eq!(app.projects.current().current_position, 20.0);

        app.apply_timeline_event(TimelineEvent::PositionChanged(30.0), settled);
        let later = settled + Duration::from_millis(200);
        app.player.tick(later);
        app.drain_player_events(later);
        assert_eq!(app.timeline.editor.position(), 30.0);
        assert_eq!(app.projects.current().duration, 60.0);
    }

    #[test]
    fn test_export_srt_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app();
        app.add_caption(1.0, 2.5);
        let path = dir.path().join("out.srt");

        app.export_srt(&path, Instant::now());
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "1\n00:00:01,000 --> 00:00:02,500\nNew subtitle\n\n");
    }

    #[test]
    fn test_history_is_bounded() {
        let mut history = History::new(3);
        for i in 0..5 {
            history.push(vec![SubtitleItem::new(i.to_string(), 0.0, 1.0)]);
        }
        let mut undone = 0;
        while history.undo(Vec::new()).is_some() {
            undone += 1;
        }
        assert_eq!(undone, 3);
    }
}
