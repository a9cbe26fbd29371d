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

/// Text lines in the footer for the current mode.
pub(crate) fn footer_lines(app: &App) -> u16 {
    let help = if app.show_full_help && !app.details {
        app.theme.labels.full_help.len()
    } else {
        1
    };
    1 + u16::try_from(help).unwrap_or(u16::MAX - 2)
}

/// Render the bottom bar: cluster stats (and the last data-source
/// error) over the key binding help.
pub(crate) fn render_footer(frame: &mut ratatui::Frame<'_>, area: Rect, app: &App) {
    let l = &app.theme.labels;
    let scheme = &app.theme.scheme;

    // Line 1: nodegrid • 3 nodes • 17 pods • 2 unscheduled • ERROR: ...
    let mut stats = vec![
        Span::styled(l.app_name, scheme.app_name),
        Span::styled(l.separator, scheme.footer_help),
        Span::styled(format!("{} {}", app.snapshot.len(), l.nodes), scheme.footer_stat),
        Span::styled(l.separator, scheme.footer_help),
        Span::styled(
            format!("{} {}", app.snapshot.pod_count(), l.pods),
            scheme.footer_stat,
        ),
    ];
    if app.snapshot.unscheduled > 0 {
        stats.extend([
            Span::styled(l.separator, scheme.footer_help),
            Span::styled(
                format!("{} {}", app.snapshot.unscheduled, l.unscheduled),
                scheme.info,
            ),
        ]);
    }
    if let Some(err) = &app.snapshot.error {
        stats.extend([
            Span::styled(l.separator, scheme.footer_help),
            Span::styled(format!("{}{}", l.error_prefix, err), scheme.error),
        ]);
    }

    let mut lines = vec![Line::from(stats)];
    if app.details {
        lines.push(Line::styled(l.detail_hint, scheme.footer_help));
    } else if app.show_full_help {
        let width = l.full_help.iter().map(|(keys, _)| keys.chars().count()).max().unwrap_or(0);
        lines.extend(l.full_help.iter().map(|(keys, action)| {
            Line::from(vec![
                Span::styled(format!("{:<width$}  ", keys), scheme.help_key),
                Span::styled(*action, scheme.footer_help),
            ])
        }));
    } else {
        lines.push(Line::styled(l.short_help, scheme.footer_help));
    }

    let footer = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(scheme.border),
    );
    frame.render_widget(footer, area);
}
