/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::io;

use chrono::DateTime;
use chrono::Utc;
use crossterm::event::Event;
use crossterm::event::EventStream;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;
use crossterm::event::KeyModifiers;
use futures::StreamExt;
use ratatui::Terminal;
use ratatui::backend::Backend;
use ratatui::layout::Rect;

use crate::bridge::ChangeSignal;
use crate::bridge::WatchBridge;
use crate::config::GridConfig;
use crate::cursor::Direction;
use crate::cursor::GridCursor;
use crate::format::payload_yaml;
use crate::grid::GridGeometry;
use crate::grid::RowSpan;
use crate::grid::first_visible_row;
use crate::grid::layout_rows;
use crate::model::NodeView;
use crate::model::Snapshot;
use crate::render::body_area;
use crate::render::ui;
use crate::store::EntityStore;
use crate::theme::Theme;
use crate::theme::ThemeName;

/// Everything the event loop reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Msg {
    Key(KeyEvent),
    /// The store changed; take a new snapshot.
    DataChanged,
    Resize(u16, u16),
    Shutdown,
}

/// Whether the event loop keeps going after a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    Quit,
}

// Application state

/// Runtime state for the dashboard.
///
/// `App` owns the latest [`Snapshot`] of the store plus all UI state.
/// Only [`App::update`] mutates it in response to input, and
/// [`App::sync_frame`] re-derives the per-frame layout right before
/// each draw. Rendering reads `&App` and nothing else.
pub(crate) struct App {
    store: EntityStore,
    /// Ordered view of the store taken at the last refresh signal.
    pub(crate) snapshot: Snapshot,
    /// Selected node.
    pub(crate) cursor: GridCursor,
    /// Detail view of the selected node is open.
    pub(crate) details: bool,
    /// First visible line of the detail view.
    pub(crate) detail_scroll: u16,
    /// Show every key binding instead of the one-line hint.
    pub(crate) show_full_help: bool,
    pub(crate) should_quit: bool,

    /// Visual presentation (colors + labels).
    pub(crate) theme: Theme,
    /// Fixed box geometry.
    pub(crate) grid: GridConfig,

    // Derived in `sync_frame`, never carried across frames.
    /// Terminal area of the last frame.
    pub(crate) area: Rect,
    pub(crate) geometry: GridGeometry,
    /// Rows of node boxes for the whole snapshot.
    pub(crate) rows: Vec<RowSpan>,
    /// First row of `rows` that is drawn.
    pub(crate) first_row: usize,
    /// YAML of the selected node, or why it could not be produced.
    pub(crate) detail: Option<Result<String, String>>,
    /// Lines of the detail view that fit on screen.
    pub(crate) detail_viewport: u16,
    /// Reference time for ages shown in this frame.
    pub(crate) now: DateTime<Utc>,
}

impl App {
    pub(crate) fn new(store: EntityStore, theme_name: ThemeName, grid: GridConfig) -> Self {
        let snapshot = store.snapshot();
        let cursor = GridCursor::new(snapshot.len());
        Self {
            store,
            snapshot,
            cursor,
            details: false,
            detail_scroll: 0,
            show_full_help: false,
            should_quit: false,
            theme: Theme::new(theme_name),
            grid,
            area: Rect::default(),
            geometry: GridGeometry::compute(0, &grid),
            rows: Vec::new(),
            first_row: 0,
            detail: None,
            detail_viewport: 0,
            now: Utc::now(),
        }
    }

    /// The node under the cursor.
    pub(crate) fn selected(&self) -> Option<&NodeView> {
        self.snapshot.get(self.cursor.pos())
    }

    /// Single entry point for state changes.
    pub(crate) fn update(&mut self, msg: Msg) -> Flow {
        match msg {
            Msg::Key(key) => self.on_key(key),
            Msg::DataChanged => {
                self.snapshot = self.store.snapshot();
                self.cursor.update_len(self.snapshot.len());
                tracing::debug!(
                    nodes = self.snapshot.len(),
                    pods = self.snapshot.pod_count(),
                    "snapshot refreshed"
                );
            }
            Msg::Resize(width, height) => {
                self.area = Rect::new(0, 0, width, height);
            }
            Msg::Shutdown => self.should_quit = true,
        }
        if self.should_quit {
            Flow::Quit
        } else {
            Flow::Continue
        }
    }

    /// Handle a single keypress.
    fn on_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc => {
                if self.details {
                    self.details = false;
                } else {
                    self.should_quit = true;
                }
            }
            KeyCode::Char('?') => self.show_full_help = !self.show_full_help,
            KeyCode::Enter => {
                self.details = !self.details;
                self.detail_scroll = 0;
            }
            _ if self.details => self.on_detail_key(key.code),
            KeyCode::Left | KeyCode::Char('h') => {
                self.move_cursor(Direction::Left);
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.move_cursor(Direction::Right);
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_cursor(Direction::Up);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_cursor(Direction::Down);
            }
            _ => {}
        }
    }

    /// Keys while the detail view is open. Up/down scroll; left/right
    /// switch to the neighboring node.
    fn on_detail_key(&mut self, code: KeyCode) {
        let page = self.detail_viewport.saturating_sub(1).max(1);
        match code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.detail_scroll = self.detail_scroll.saturating_sub(1)
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.detail_scroll = self.detail_scroll.saturating_add(1)
            }
            KeyCode::PageUp => self.detail_scroll = self.detail_scroll.saturating_sub(page),
            KeyCode::PageDown => self.detail_scroll = self.detail_scroll.saturating_add(page),
            KeyCode::Home | KeyCode::Char('g') => self.detail_scroll = 0,
            // Clamped by the next `sync_frame`.
            KeyCode::End | KeyCode::Char('G') => self.detail_scroll = u16::MAX,
            KeyCode::Left | KeyCode::Char('h') => {
                if self.move_cursor(Direction::Left) {
                    self.detail_scroll = 0;
                }
            }
            KeyCode::Right | KeyCode::Char('l') => {
                if self.move_cursor(Direction::Right) {
                    self.detail_scroll = 0;
                }
            }
            _ => {}
        }
    }

    fn move_cursor(&mut self, direction: Direction) -> bool {
        self.cursor.move_dir(direction, self.geometry.nodes_per_row)
    }

    /// Re-derive everything that depends on the terminal size, using
    /// the current time for ages.
    pub(crate) fn sync_frame(&mut self, area: Rect) {
        self.sync_frame_at(area, Utc::now());
    }

    /// Re-derive the per-frame layout: clamp the cursor, lay out node
    /// rows, scroll the selected row into view and prepare the detail
    /// text.
    pub(crate) fn sync_frame_at(&mut self, area: Rect, now: DateTime<Utc>) {
        self.area = area;
        self.now = now;
        self.cursor.update_len(self.snapshot.len());

        let body = body_area(area, self);
        self.geometry = GridGeometry::compute(body.width, &self.grid);

        let heights: Vec<u16> = self
            .snapshot
            .nodes
            .iter()
            .map(|view| self.geometry.node_box_height(view.pods.len(), &self.grid))
            .collect();
        self.rows = layout_rows(&heights, self.geometry.nodes_per_row, self.grid.node.margin);
        let canvas_height = body.height.saturating_sub(2 * self.grid.canvas_padding_y);
        let selected_row = self.cursor.pos() / self.geometry.nodes_per_row.max(1);
        self.first_row = first_visible_row(&self.rows, selected_row, canvas_height);

        self.detail = if self.details {
            self.selected().map(|view| {
                payload_yaml(&view.node.payload).map_err(|err| {
                    tracing::warn!(node = %view.node.name, error = %err, "detail serialization failed");
                    err.to_string()
                })
            })
        } else {
            None
        };
        // Bordered block around the detail text.
        self.detail_viewport = body.height.saturating_sub(2);
        let lines = match &self.detail {
            Some(Ok(text)) => u16::try_from(text.lines().count()).unwrap_or(u16::MAX),
            _ => 0,
        };
        self.detail_scroll = self
            .detail_scroll
            .min(lines.saturating_sub(self.detail_viewport));
    }
}

/// Drive the main event loop.
///
/// Each iteration lays out and draws one frame, then waits for either
/// terminal input or a coalesced change signal from the data source.
/// Returns when the user quits or the input stream ends.
pub(crate) async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    mut bridge: WatchBridge,
) -> io::Result<()> {
    let mut events = EventStream::new();
    let mut source_open = true;
    app.update(Msg::DataChanged);

    loop {
        let size = terminal.size()?;
        app.sync_frame(Rect::new(0, 0, size.width, size.height));
        terminal.draw(|frame| ui(frame, &app))?;

        let msg = tokio::select! {
            maybe_event = events.next() => match maybe_event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => Msg::Key(key),
                Some(Ok(Event::Resize(width, height))) => Msg::Resize(width, height),
                Some(Ok(_)) => continue,
                Some(Err(err)) => {
                    bridge.shutdown();
                    return Err(err);
                }
                None => Msg::Shutdown,
            },
            signal = bridge.next_change(), if source_open => match signal {
                ChangeSignal::Changed => Msg::DataChanged,
                ChangeSignal::Closed => {
                    tracing::info!("data source closed; showing last snapshot");
                    source_open = false;
                    continue;
                }
            },
        };

        if app.update(msg) == Flow::Quit {
            break;
        }
    }

    bridge.shutdown();
    Ok(())
}
