/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

pub mod detail_view;
pub mod grid_view;
pub mod status_bar;

use ratatui::layout::Constraint;
use ratatui::layout::Direction;
use ratatui::layout::Layout;
use ratatui::layout::Rect;

use self::detail_view::render_detail_view;
use self::grid_view::render_grid;
use self::status_bar::footer_lines;
use self::status_bar::render_footer;
use crate::app::App;

/// Rows taken by the footer: a top border plus its text lines.
pub(crate) fn footer_height(app: &App) -> u16 {
    1 + footer_lines(app)
}

fn split(area: Rect, app: &App) -> [Rect; 2] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(footer_height(app))])
        .split(area);
    [chunks[0], chunks[1]]
}

/// Area left for the node grid or the detail view.
pub(crate) fn body_area(area: Rect, app: &App) -> Rect {
    split(area, app)[0]
}

/// Render a full frame.
///
/// The body shows either the node grid or the detail view of the
/// selected node; the footer is always present.
pub(crate) fn ui(frame: &mut ratatui::Frame<'_>, app: &App) {
    let [body, footer] = split(frame.area(), app);
    if app.details {
        render_detail_view(frame, body, app);
    } else {
        render_grid(frame, body, app);
    }
    render_footer(frame, footer, app);
}
