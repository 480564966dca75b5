// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Subtitle Editor
//!
//! A cross-platform desktop application for timing captions against an
//! audio track on a zoomable timeline, with SRT import/export and saved
//! projects.

mod app;
mod config;
mod error;
mod io;
mod models;
mod playback;
mod timeline;
mod ui;
mod util;

use anyhow::{Context, Result};
use app::SubtitleEditorApp;
use clap::Parser;
use config::EditorConfig;
use io::media::FileProbe;
use io::project_store::FileStore;
use playback::{default_sink, AudioPlayer};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Parser)]
#[command(name = "subtitle-editor", version, about = "Time captions against audio")]
struct Cli {
    /// Audio file to open at startup
    audio: Option<PathBuf>,

    /// Text (.txt) or subtitle (.srt) file to import at startup
    #[arg(short, long)]
    subtitles: Option<PathBuf>,

    /// Configuration file (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for saved projects
    #[arg(long)]
    store: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG still takes precedence
    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = EditorConfig::load_or_default(cli.config.as_deref())
        .context("Failed to load configuration")?;

    let store_dir = cli.store.clone().unwrap_or_else(|| config.resolved_store_dir());
    let store = FileStore::open(&store_dir)
        .with_context(|| format!("Failed to open project store {}", store_dir.display()))?;
    log::info!("Projects are stored in {}", store.dir().display());

    let sink = default_sink();
    let player = AudioPlayer::new(
        &config.player,
        config.limits.max_audio_bytes,
        Box::new(FileProbe),
        sink,
    );

    let mut app = SubtitleEditorApp::new(config, Box::new(store), player);
    let now = Instant::now();
    if let Some(audio) = &cli.audio {
        app.open_audio(audio, now);
    }
    if let Some(subtitles) = &cli.subtitles {
        app.import_text(subtitles, now);
    }

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([800.0, 500.0])
            .with_title("Subtitle Editor")
            .with_drag_and_drop(true),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Subtitle Editor",
        options,
        Box::new(move |_cc| Ok(Box::new(app))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
