/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Integration tests that exercise multiple modules together (store +
//! App + layout + render). Per-module unit tests live in each
//! module's own `#[cfg(test)] mod tests` block.

use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyModifiers;
use proptest::prelude::*;
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

use super::*;
use crate::app::Msg;
use crate::model::fixtures::*;
use crate::theme::ThemeName;

const NOW: i64 = 10_000;

fn app_with(store: &EntityStore) -> App {
    App::new(store.clone(), ThemeName::Default, GridConfig::default())
}

fn key(code: KeyCode) -> Msg {
    Msg::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn draw(app: &mut App, width: u16, height: u16) -> Buffer {
    app.sync_frame_at(Rect::new(0, 0, width, height), at(NOW));
    paint(app, width, height)
}

/// Render without re-deriving the frame layout.
fn paint(app: &App, width: u16, height: u16) -> Buffer {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal.draw(|frame| render::ui(frame, app)).unwrap();
    terminal.backend().buffer().clone()
}

fn row_text(buf: &Buffer, y: u16) -> String {
    (0..buf.area.width).map(|x| buf[(x, y)].symbol()).collect()
}

fn screen_text(buf: &Buffer) -> String {
    (0..buf.area.height)
        .map(|y| row_text(buf, y))
        .collect::<Vec<_>>()
        .join("\n")
}

// Geometry of the default layout on a wide terminal: canvas padding
// (2, 1), node margin 1 and border + padding 2 put the first node box
// at (3, 2) and its content at (5, 4). Content is 8 rows tall, so
// the bottom pod row starts at y = 9.
const NODE_X: u16 = 3;
const NODE_Y: u16 = 2;
const CONTENT_X: u16 = 5;
const CONTENT_Y: u16 = 4;
const POD_ROW_Y: u16 = 9;

// DaemonSet-owned pod renders with the alternate border color.
#[test]
fn daemonset_pod_renders_with_alternate_border() {
    let store = EntityStore::new();
    store.apply_node(node("worker", "n1", 0));
    store.apply_pod(pod("web", "p1", 1, "worker"));
    store.apply_pod(daemon_pod("exporter", "p2", 2, "worker"));
    let mut app = app_with(&store);
    let buf = draw(&mut app, 80, 30);

    let web = &buf[(CONTENT_X, POD_ROW_Y)];
    let exporter = &buf[(CONTENT_X + 3, POD_ROW_Y)];
    assert_eq!(web.symbol(), "╭");
    assert_eq!(exporter.symbol(), "╭");
    assert_eq!(web.fg, app.theme.scheme.pod_default);
    assert_eq!(exporter.fg, app.theme.scheme.pod_fleet);
    assert_ne!(web.fg, exporter.fg);
}

// Selected node border uses the emphasis color; others the plain one.
#[test]
fn selected_node_border_is_emphasized() {
    let store = EntityStore::new();
    store.apply_node(node("a", "n1", 0));
    store.apply_node(node("b", "n2", 1));
    let mut app = app_with(&store);
    let buf = draw(&mut app, 80, 30);
    assert_eq!(app.geometry.nodes_per_row, 2);

    let second_x = NODE_X + app.grid.node.slot_width();
    assert_eq!(buf[(NODE_X, NODE_Y)].fg, app.theme.scheme.node_border_selected);
    assert_eq!(buf[(second_x, NODE_Y)].fg, app.theme.scheme.node_border);

    app.update(key(KeyCode::Right));
    let buf = draw(&mut app, 80, 30);
    assert_eq!(buf[(NODE_X, NODE_Y)].fg, app.theme.scheme.node_border);
    assert_eq!(buf[(second_x, NODE_Y)].fg, app.theme.scheme.node_border_selected);
}

#[test]
fn node_box_shows_name_and_summary() {
    let store = EntityStore::new();
    store.apply_node(node("worker-1", "n1", NOW - 120));
    store.apply_pod(pod("web", "p1", 1, "worker-1"));
    let mut app = app_with(&store);
    let buf = draw(&mut app, 80, 30);
    assert!(row_text(&buf, CONTENT_Y).contains("worker-1"));
    assert!(row_text(&buf, CONTENT_Y + 1).contains("1 pod · 2m"));
}

// Pods stack up from the bottom: the ragged row sits above full ones.
#[test]
fn pods_fill_from_the_bottom() {
    let store = EntityStore::new();
    store.apply_node(node("worker", "n1", 0));
    for i in 0..10 {
        store.apply_pod(pod(&format!("p{i}"), &format!("u{i:02}"), i, "worker"));
    }
    let mut app = app_with(&store);
    let buf = draw(&mut app, 80, 30);
    assert_eq!(app.geometry.pods_per_row, 9);
    // Nine pods on the bottom row...
    for c in 0..9 {
        assert_eq!(buf[(CONTENT_X + 3 * c, POD_ROW_Y)].symbol(), "╭");
    }
    // ...and the tenth alone on the row above.
    assert_eq!(buf[(CONTENT_X, POD_ROW_Y - 3)].symbol(), "╭");
    assert_ne!(buf[(CONTENT_X + 3, POD_ROW_Y - 3)].symbol(), "╭");
}

#[test]
fn empty_snapshot_renders_message() {
    let store = EntityStore::new();
    let mut app = app_with(&store);
    let text = screen_text(&draw(&mut app, 80, 24));
    assert!(text.contains("No nodes yet"));
    assert!(text.contains("0 nodes"));
}

// Terminal narrower than one node box still shows one column.
#[test]
fn narrow_terminal_shows_one_column() {
    let store = EntityStore::new();
    store.apply_node(node("node-a", "n1", 0));
    store.apply_node(node("node-b", "n2", 1));
    let mut app = app_with(&store);
    let buf = draw(&mut app, 20, 40);
    assert_eq!(app.geometry.nodes_per_row, 1);
    assert!(row_text(&buf, CONTENT_Y).contains("node-a"));
    // Second row: 14 rows further down.
    assert!(row_text(&buf, CONTENT_Y + 14).contains("node-b"));
}

// Stale selection after the snapshot shrinks is clamped and renders.
#[test]
fn shrinking_snapshot_clamps_selection() {
    let store = EntityStore::new();
    for i in 0..5 {
        store.apply_node(node(&format!("node-{i}"), &format!("n{i}"), i));
    }
    let mut app = app_with(&store);
    draw(&mut app, 80, 40);
    app.cursor.set_pos(4);
    for i in 2..5 {
        store.delete_node(&format!("n{i}"));
    }
    app.update(Msg::DataChanged);
    let buf = draw(&mut app, 80, 40);
    assert_eq!(app.cursor.pos(), 1);
    assert_eq!(app.selected().map(|v| v.node.name.as_str()), Some("node-1"));
    let second_x = NODE_X + app.grid.node.slot_width();
    assert_eq!(buf[(second_x, NODE_Y)].fg, app.theme.scheme.node_border_selected);
}

#[test]
fn detail_view_shows_payload_yaml() {
    let store = EntityStore::new();
    store.apply_node(node("worker-1", "n1", 0));
    let mut app = app_with(&store);
    app.update(key(KeyCode::Enter));
    let text = screen_text(&draw(&mut app, 80, 24));
    assert!(text.contains("podCIDR"));
    assert!(text.contains("worker-1"));
    assert!(text.contains("enter/esc: back"));
    assert_eq!(app.cursor.pos(), 0);
}

#[test]
fn detail_view_error_placeholder() {
    let store = EntityStore::new();
    store.apply_node(node("worker-1", "n1", 0));
    let mut app = app_with(&store);
    app.update(key(KeyCode::Enter));
    app.sync_frame_at(Rect::new(0, 0, 80, 24), at(NOW));
    app.detail = Some(Err("unsupported value".to_string()));
    let text = screen_text(&paint(&app, 80, 24));
    assert!(text.contains("Could not render details: unsupported value"));
}

#[test]
fn footer_shows_counts_and_source_error() {
    let store = EntityStore::new();
    store.apply_node(node("a", "n1", 0));
    store.apply_node(node("b", "n2", 0));
    store.apply_pod(pod("web", "p1", 1, "a"));
    store.apply_pod(pod("pending", "p2", 1, ""));
    store.set_error("pod", "pod watch: connection reset");
    let mut app = app_with(&store);
    app.update(Msg::DataChanged);
    let text = screen_text(&draw(&mut app, 120, 30));
    assert!(text.contains("2 nodes"));
    assert!(text.contains("1 pods"));
    assert!(text.contains("1 unscheduled"));
    assert!(text.contains("ERROR: pod watch: connection reset"));
}

#[test]
fn help_key_expands_footer() {
    let store = EntityStore::new();
    let mut app = app_with(&store);
    let text = screen_text(&draw(&mut app, 100, 30));
    assert!(text.contains("? more"));
    assert!(!text.contains("toggle node details"));

    app.update(key(KeyCode::Char('?')));
    let text = screen_text(&draw(&mut app, 100, 30));
    assert!(text.contains("toggle node details"));
    assert!(text.contains("move between nodes"));
}

// Same entities delivered in a different order paint the same frame.
#[test]
fn delivery_order_does_not_change_frame() {
    let forward = EntityStore::new();
    let backward = EntityStore::new();
    let nodes = [node("a", "n1", 5), node("b", "n2", 5), node("c", "n3", 1)];
    let pods = [
        pod("x", "p1", 3, "a"),
        daemon_pod("y", "p2", 3, "a"),
        pod("z", "p3", 1, "c"),
    ];
    for n in &nodes {
        forward.apply_node(n.clone());
    }
    for p in &pods {
        forward.apply_pod(p.clone());
    }
    for p in pods.iter().rev() {
        backward.apply_pod(p.clone());
    }
    for n in nodes.iter().rev() {
        backward.apply_node(n.clone());
    }
    let a = draw(&mut app_with(&forward), 120, 40);
    let b = draw(&mut app_with(&backward), 120, 40);
    assert_eq!(a, b);
}

// Full pipeline: fixture source -> store -> bridge -> App -> frame.
#[tokio::test]
async fn fixture_source_feeds_the_grid() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cluster.yaml");
    std::fs::write(
        &path,
        r#"
nodes:
  - {name: control-plane, uid: n1, created: "2024-05-01T10:00:00Z"}
pods:
  - name: kube-proxy-abc
    uid: p1
    created: "2024-05-01T10:01:00Z"
    node_name: control-plane
    owners: [{kind: DaemonSet, name: kube-proxy}]
"#,
    )
    .unwrap();

    let store = EntityStore::new();
    let (mut bridge, notifier) = WatchBridge::new();
    let args = Args::try_parse_from(["nodegrid", "--fixture", path.to_str().unwrap()]).unwrap();
    let mut handle = source::from_args(&args)
        .start(store.clone(), notifier)
        .await
        .unwrap();
    assert!(handle.wait_synced().await);
    assert_eq!(bridge.next_change().await, bridge::ChangeSignal::Changed);

    let mut app = app_with(&store);
    app.update(Msg::DataChanged);
    let buf = draw(&mut app, 80, 30);
    assert!(row_text(&buf, CONTENT_Y).contains("control-plane"));
    assert_eq!(buf[(CONTENT_X, POD_ROW_Y)].fg, app.theme.scheme.pod_fleet);
    handle.shutdown();
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // Any terminal size, any selection, either mode: no panic, and
    // the cursor stays in range.
    #[test]
    fn renders_at_any_size(
        width in 1u16..200,
        height in 1u16..80,
        node_count in 0usize..12,
        pods_per_node in 0usize..30,
        moves in prop::collection::vec(0u8..6, 0..20),
    ) {
        let store = EntityStore::new();
        for i in 0..node_count {
            let name = format!("node-{i}");
            store.apply_node(node(&name, &format!("n{i:02}"), i as i64));
            for j in 0..pods_per_node {
                store.apply_pod(pod(&format!("p{i}-{j}"), &format!("u{i:02}-{j:02}"), j as i64, &name));
            }
        }
        let mut app = app_with(&store);
        for m in moves {
            let code = match m {
                0 => KeyCode::Left,
                1 => KeyCode::Right,
                2 => KeyCode::Up,
                3 => KeyCode::Down,
                4 => KeyCode::Enter,
                _ => KeyCode::Char('?'),
            };
            app.update(key(code));
            draw(&mut app, width, height);
            prop_assert!(app.cursor.pos() < node_count.max(1));
        }
        draw(&mut app, width, height);
    }
}
