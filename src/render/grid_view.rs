/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! The node grid: one bordered box per node, pods packed inside.

use ratatui::layout::Alignment;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Borders;
use ratatui::widgets::Clear;
use ratatui::widgets::Paragraph;

use crate::app::App;
use crate::format::node_summary;
use crate::format::truncate;
use crate::grid::pack;
use crate::model::NodeView;

/// Canvas inside the body: the body minus the canvas padding.
fn canvas(body: Rect, app: &App) -> Rect {
    let px = app.grid.canvas_padding_x.min(body.width / 2);
    let py = app.grid.canvas_padding_y.min(body.height / 2);
    Rect::new(
        body.x + px,
        body.y + py,
        body.width - 2 * px,
        body.height - 2 * py,
    )
}

/// Render the node grid, starting at the row `sync_frame` scrolled
/// to.
///
/// The first visible row is drawn even when it is taller than the
/// canvas (clipped at the bottom); later rows are drawn only when
/// they fit completely.
pub(crate) fn render_grid(frame: &mut ratatui::Frame<'_>, body: Rect, app: &App) {
    let canvas = canvas(body, app);
    if app.snapshot.is_empty() {
        render_empty(frame, canvas, app);
        return;
    }

    let node = app.grid.node;
    let Some(first) = app.rows.get(app.first_row) else {
        return;
    };
    for (i, row) in app.rows[app.first_row..].iter().enumerate() {
        let offset = row.top - first.top;
        if i > 0 && offset + u32::from(row.height) > u32::from(canvas.height) {
            break;
        }
        let Ok(offset) = u16::try_from(offset) else {
            break;
        };
        let y = canvas.y + offset + node.margin;
        for col in 0..row.len {
            let index = row.first + col;
            let Some(view) = app.snapshot.get(index) else {
                break;
            };
            let col = u16::try_from(col).unwrap_or(u16::MAX);
            let x = canvas
                .x
                .saturating_add(col.saturating_mul(node.slot_width()))
                .saturating_add(node.margin);
            let height = app.geometry.node_box_height(view.pods.len(), &app.grid);
            let rect = Rect::new(x, y, node.outer_width(), height);
            render_node(frame, rect, canvas, view, index == app.cursor.pos(), app);
        }
    }
}

fn render_empty(frame: &mut ratatui::Frame<'_>, canvas: Rect, app: &App) {
    let middle = Rect::new(
        canvas.x,
        canvas.y + canvas.height / 2,
        canvas.width,
        canvas.height.min(1),
    );
    let message = Paragraph::new(Line::styled(app.theme.labels.no_nodes, app.theme.scheme.info))
        .alignment(Alignment::Center);
    frame.render_widget(message, middle);
}

/// Draw one node box at `rect` (unclipped), clipped to `visible`.
fn render_node(
    frame: &mut ratatui::Frame<'_>,
    rect: Rect,
    visible: Rect,
    view: &NodeView,
    selected: bool,
    app: &App,
) {
    let shown = rect.intersection(visible);
    if shown.is_empty() {
        return;
    }
    let scheme = &app.theme.scheme;
    let cfg = &app.grid;

    // The border is a solid frame: line glyphs drawn in the frame
    // color on the frame color.
    let color = scheme.node_border(selected);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Plain)
        .border_style(Style::default().fg(color).bg(color))
        .style(scheme.node_body);
    frame.render_widget(Clear, shown);
    frame.render_widget(block, shown);

    let pad = cfg.node.padding;
    let content = Rect::new(
        rect.x + cfg.node.border + pad,
        rect.y + cfg.node.border + pad,
        cfg.node.width.saturating_sub(2 * pad),
        rect.height
            .saturating_sub(2 * (cfg.node.border + pad)),
    );

    let text_width = usize::from(content.width);
    let header = vec![
        Line::styled(truncate(&view.node.name, text_width), scheme.node_name),
        Line::styled(
            truncate(&node_summary(view, app.now), text_width),
            scheme.node_summary,
        ),
    ];
    let header_rect = Rect::new(
        content.x,
        content.y,
        content.width,
        cfg.node_header_lines.min(content.height),
    )
    .intersection(visible);
    if !header_rect.is_empty() {
        frame.render_widget(Paragraph::new(header), header_rect);
    }

    render_pods(frame, content, visible, view, app);
}

/// Pack pods into rows anchored at the bottom of `content`. The first
/// row sits at the bottom, so a short last row ends up on top.
fn render_pods(
    frame: &mut ratatui::Frame<'_>,
    content: Rect,
    visible: Rect,
    view: &NodeView,
    app: &App,
) {
    let pod = app.grid.pod;
    let row_height = pod.outer_height(pod.min_height) + 2 * pod.margin;
    let floor = content.y + app.grid.node_header_lines;
    let bottom = content.y + content.height;

    for (r, row) in pack(&view.pods, app.geometry.pods_per_row).into_iter().enumerate() {
        let lift = u16::try_from(r + 1)
            .unwrap_or(u16::MAX)
            .saturating_mul(row_height);
        let Some(top) = bottom.checked_sub(lift) else {
            break;
        };
        if top < floor {
            break;
        }
        for (c, p) in row.iter().enumerate() {
            let c = u16::try_from(c).unwrap_or(u16::MAX);
            let rect = Rect::new(
                content.x + c.saturating_mul(pod.slot_width()) + pod.margin,
                top + pod.margin,
                pod.outer_width(),
                pod.outer_height(pod.min_height),
            );
            // Partially visible pods are not drawn.
            if rect.intersection(visible) != rect {
                continue;
            }
            let color = app.theme.scheme.pod_border(p.class());
            let block = Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(app.theme.scheme.node_body.fg(color));
            frame.render_widget(block, rect);
        }
    }
}
