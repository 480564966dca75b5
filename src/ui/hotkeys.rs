// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Keyboard shortcuts.
//!
//! Keys map to semantic actions here; the app decides what each action does.

use egui::{Key, Modifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotkeyAction {
    PlayPause,
    SkipBackShort,
    SkipForwardShort,
    SkipBackLong,
    SkipForwardLong,
    ZoomIn,
    ZoomOut,
    DeleteSelected,
    SaveProject,
    OpenProjects,
    NewProject,
    Undo,
    Redo,
}

/// Map one key press to an action.
pub fn key_to_action(key: Key, modifiers: Modifiers) -> Option<HotkeyAction> {
    if modifiers.command {
        return match key {
            Key::S => Some(HotkeyAction::SaveProject),
            Key::O => Some(HotkeyAction::OpenProjects),
            Key::N => Some(HotkeyAction::NewProject),
            Key::Z if modifiers.shift => Some(HotkeyAction::Redo),
            Key::Z => Some(HotkeyAction::Undo),
            Key::Y => Some(HotkeyAction::Redo),
            _ => None,
        };
    }

    match key {
        Key::Space => Some(HotkeyAction::PlayPause),
        Key::ArrowLeft => Some(HotkeyAction::SkipBackShort),
        Key::ArrowRight => Some(HotkeyAction::SkipForwardShort),
        Key::J => Some(HotkeyAction::SkipBackLong),
        Key::L => Some(HotkeyAction::SkipForwardLong),
        Key::Plus | Key::Equals => Some(HotkeyAction::ZoomIn),
        Key::Minus => Some(HotkeyAction::ZoomOut),
        Key::Delete | Key::Backspace => Some(HotkeyAction::DeleteSelected),
        _ => None,
    }
}

/// Actions for this frame's key presses. Nothing fires while a text field
/// has keyboard focus.
pub fn collect(ctx: &egui::Context) -> Vec<HotkeyAction> {
    if ctx.wants_keyboard_input() {
        return Vec::new();
    }
    ctx.input(|i| {
        i.events
            .iter()
            .filter_map(|event| match event {
                egui::Event::Key {
                    key,
                    pressed: true,
                    modifiers,
                    ..
                } => key_to_action(*key, *modifiers),
                _ => None,
            })
            .collect()
    })
}
