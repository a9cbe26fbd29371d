/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui::widgets::Paragraph;

use crate::app::App;
use crate::format::format_uptime;

/// Render the full-screen YAML dump of the selected node.
///
/// Text and scroll position come from `App::sync_frame`; this only
/// draws them. A node whose payload failed to serialize gets an error
/// line instead.
pub(crate) fn render_detail_view(frame: &mut ratatui::Frame<'_>, area: Rect, app: &App) {
    let scheme = &app.theme.scheme;
    let l = &app.theme.labels;

    let title = match app.selected() {
        Some(view) => Line::from(vec![
            Span::styled(format!(" {} ", view.node.name), scheme.app_name),
            Span::styled(
                format!("up {} ", format_uptime(view.node.created, app.now)),
                scheme.footer_help,
            ),
        ]),
        None => Line::from(""),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(scheme.border);

    let body = match &app.detail {
        Some(Ok(text)) => Paragraph::new(text.as_str())
            .style(scheme.detail_text)
            .scroll((app.detail_scroll, 0)),
        Some(Err(err)) => Paragraph::new(Line::styled(
            format!("{}: {}", l.detail_error, err),
            scheme.error,
        )),
        None => Paragraph::new(Line::styled(l.no_nodes, scheme.info)),
    };
    frame.render_widget(body.block(block), area);
}
