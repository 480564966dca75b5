// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Transient status messages.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Error,
}

impl MessageKind {
    fn color(self) -> egui::Color32 {
        match self {
            MessageKind::Info => egui::Color32::from_rgb(120, 170, 230),
            MessageKind::Success => egui::Color32::from_rgb(110, 200, 120),
            MessageKind::Error => egui::Color32::from_rgb(230, 90, 80),
        }
    }
}

#[derive(Debug, Clone)]
struct Message {
    kind: MessageKind,
    text: String,
    expires: Instant,
}

/// Holds the latest message until it expires.
#[derive(Debug)]
pub struct MessageCenter {
    ttl: Duration,
    current: Option<Message>,
}

impl MessageCenter {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, current: None }
    }

    pub fn post(&mut self, kind: MessageKind, text: impl Into<String>, now: Instant) {
        let text = text.into();
        match kind {
            MessageKind::Error => log::warn!("{}", text),
            _ => log::info!("{}", text),
        }
        self.current = Some(Message {
            kind,
            text,
            expires: now + self.ttl,
        });
    }

    /// The live message, if any.
    pub fn current(&self, now: Instant) -> Option<(MessageKind, &str)> {
        self.current
            .as_ref()
            .filter(|m| now < m.expires)
            .map(|m| (m.kind, m.text.as_str()))
    }

    /// Time until the live message expires.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.current
            .as_ref()
            .map(|m| m.expires.saturating_duration_since(now))
            .filter(|d| !d.is_zero())
    }

    pub fn show(&self, ui: &mut egui::Ui, now: Instant) {
        if let Some((kind, text)) = self.current(now) {
            ui.label(egui::RichText::new(text).color(kind.color()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_expires() {
        let mut messages = MessageCenter::new(Duration::from_secs(3));
        let t0 = Instant::now();
        messages.post(MessageKind::Success, "Saved", t0);

        assert_eq!(
            messages.current(t0 + Duration::from_secs(2)),
            Some((MessageKind::Success, "Saved"))
        );
        assert_eq!(messages.current(t0 + Duration::from_secs(3)), None);
        assert_eq!(messages.remaining(t0 + Duration::from_secs(4)), None);
    }

    #[test]
    fn test_newer_message_replaces_older() {
        let mut messages = MessageCenter::new(Duration::from_secs(3));
        let t0 = Instant::now();
        messages.post(MessageKind::Info, "one", t0);
        messages.post(MessageKind::Error, "two", t0 + Duration::from_secs(2));
        assert_eq!(
            messages.current(t0 + Duration::from_secs(4)),
            Some((MessageKind::Error, "two"))
        );
    }
}
