/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Live terminal dashboard of cluster nodes and the pods scheduled on
//! them.
//!
//! Every node is a box in a responsive grid; the pods bound to it are
//! small boxes packed inside, colored by who owns them. A watch source
//! keeps an in-memory store current and pokes the event loop, which
//! re-renders from an ordered snapshot.
//!
//! # Invariants
//!
//! - **Deterministic order**: nodes and pods are always listed by
//!   creation time (second precision), then uid. Identical store
//!   contents render identically no matter the delivery order.
//! - **Coalesced refresh**: the watch bridge holds at most one pending
//!   signal. Producers never block; a burst of events costs one
//!   snapshot.
//! - **Cursor laws**: the selection is a single index with `pos < len`
//!   (or `pos == 0` when empty), clamped before every frame. Moves
//!   wrap within the row or column and never leave the grid.
//! - **Single writer**: only `App::update` mutates UI state. Layout is
//!   re-derived per frame (`App::sync_frame`) and rendering reads
//!   `&App`.
//!
//! ```bash
//! # Against the current kubeconfig context
//! nodegrid
//!
//! # Against a file, re-read when it changes
//! nodegrid --fixture cluster.yaml --fixture-poll 500
//! ```

mod app;
mod bridge;
mod config;
mod cursor;
mod format;
mod grid;
mod logging;
mod model;
mod render;
mod source;
mod store;
mod theme;

use std::io;
use std::io::IsTerminal;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use crossterm::ExecutableCommand;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use indicatif::ProgressBar;
use indicatif::ProgressStyle;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::app::App;
use crate::app::run_app;
use crate::bridge::WatchBridge;
use crate::config::Args;
use crate::config::GridConfig;
use crate::store::EntityStore;

// Terminal setup / teardown

/// Put the terminal into "TUI mode".
///
/// Enables raw mode, switches to the alternate screen, and clears it,
/// returning a `ratatui::Terminal` backed by crossterm.
fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;
    Ok(terminal)
}

/// Leave raw mode and the alternate screen, and show the cursor.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

// Main loop

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("nodegrid: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    if !io::stdout().is_terminal() {
        anyhow::bail!("this dashboard requires a real terminal");
    }
    logging::init(args.log_file.as_deref(), &args.log_level)
        .context("failed to open log file")?;

    let store = EntityStore::new();
    let (bridge, notifier) = WatchBridge::new();
    let source = source::from_args(&args);

    // Show an indicatif spinner on stderr while the source connects
    // and lists. This runs before the alternate screen so it's
    // visible as a normal terminal line.
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.set_message(format!("nodegrid: connecting to {} ...", source.describe()));
    spinner.enable_steady_tick(Duration::from_millis(80));

    let started = source.start(store.clone(), notifier).await;
    let mut handle = match started {
        Ok(handle) => handle,
        Err(err) => {
            spinner.finish_and_clear();
            return Err(err).context("data source failed to start");
        }
    };

    spinner.set_message("nodegrid: waiting for initial sync ...");
    tokio::select! {
        synced = handle.wait_synced() => {
            if !synced {
                tracing::warn!("watchers stopped before the initial sync");
            }
        }
        _ = tokio::time::sleep(args.sync_timeout()) => {
            tracing::warn!(
                timeout = ?args.sync_timeout(),
                nodes = store.node_count(),
                pods = store.pod_count(),
                "initial sync timed out; showing partial data"
            );
        }
        _ = tokio::signal::ctrl_c() => {
            spinner.finish_and_clear();
            handle.shutdown();
            return Ok(());
        }
    }
    spinner.finish_and_clear();
    tracing::info!(synced = handle.is_synced(), "starting dashboard");

    let app = App::new(store, args.theme, GridConfig::default());
    let mut terminal = setup_terminal().context("failed to set up terminal")?;
    let result = run_app(&mut terminal, app, bridge).await;
    restore_terminal(&mut terminal).context("failed to restore terminal")?;
    handle.shutdown();
    result.context("event loop failed")
}

#[cfg(test)]
mod tests;
