/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use clap::ValueEnum;
use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;

use crate::model::PodClass;

/// Selectable color theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum ThemeName {
    /// High-contrast boxes on black: grey nodes, teal pods.
    #[default]
    Default,
    /// Nord: an arctic, north-bluish palette.
    Nord,
}

impl std::fmt::Display for ThemeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThemeName::Default => write!(f, "default"),
            ThemeName::Nord => write!(f, "nord"),
        }
    }
}

/// All user-visible text in the dashboard.
pub(crate) struct Labels {
    pub(crate) app_name: &'static str,
    pub(crate) separator: &'static str,
    pub(crate) nodes: &'static str,
    pub(crate) pods: &'static str,
    pub(crate) unscheduled: &'static str,
    pub(crate) no_nodes: &'static str,
    pub(crate) detail_error: &'static str,
    pub(crate) error_prefix: &'static str,
    pub(crate) short_help: &'static str,
    /// Expanded help, one `(keys, action)` pair per line.
    pub(crate) full_help: &'static [(&'static str, &'static str)],
    pub(crate) detail_hint: &'static str,
}

impl Labels {
    pub(crate) fn en() -> Self {
        Self {
            app_name: "nodegrid",
            separator: " • ",
            nodes: "nodes",
            pods: "pods",
            unscheduled: "unscheduled",
            no_nodes: "No nodes yet. Waiting for the data source…",
            detail_error: "Could not render details",
            error_prefix: "ERROR: ",
            short_help: "↑/↓/←/→ move • enter details • ? more • q quit",
            full_help: &[
                ("↑/↓/←/→ h/j/k/l", "move between nodes"),
                ("enter", "toggle node details"),
                ("↑/↓ pgup/pgdn", "scroll details"),
                ("?", "toggle help"),
                ("q esc ctrl+c", "quit"),
            ],
            detail_hint: "enter/esc: back • ↑/↓ pgup/pgdn: scroll",
        }
    }
}

/// Color scheme for the dashboard.
///
/// Each field is a semantic role; themes assign concrete colors.
pub(crate) struct ColorScheme {
    // Node boxes
    pub(crate) node_body: Style,
    pub(crate) node_border: Color,
    pub(crate) node_border_selected: Color,
    pub(crate) node_name: Style,
    pub(crate) node_summary: Style,

    // Pod boxes, by ownership class
    pub(crate) pod_default: Color,
    pub(crate) pod_fleet: Color,

    // Chrome
    pub(crate) app_name: Style,
    pub(crate) footer_help: Style,
    pub(crate) footer_stat: Style,
    pub(crate) help_key: Style,
    pub(crate) border: Style,
    pub(crate) error: Style,
    pub(crate) info: Style,
    pub(crate) detail_text: Style,
}

impl ColorScheme {
    /// The original dashboard palette.
    pub(crate) fn standard() -> Self {
        let white = Color::Rgb(0xFF, 0xFF, 0xFF);
        let black = Color::Rgb(0x00, 0x00, 0x00);
        let pink = Color::Rgb(0xF8, 0x75, 0x75);
        let teal = Color::Rgb(0x27, 0xCE, 0xBD);
        let grey = Color::Rgb(0x6C, 0x7D, 0x89);
        let yellow = Color::Rgb(0xF2, 0xC1, 0x4E);

        Self {
            node_body: Style::default().fg(white).bg(black),
            node_border: grey,
            node_border_selected: pink,
            node_name: Style::default()
                .fg(white)
                .bg(black)
                .add_modifier(Modifier::BOLD),
            node_summary: Style::default().fg(grey).bg(black),

            pod_default: teal,
            pod_fleet: yellow,

            app_name: Style::default().fg(teal).add_modifier(Modifier::BOLD),
            footer_help: Style::default().fg(grey),
            footer_stat: Style::default().fg(white),
            help_key: Style::default().fg(pink),
            border: Style::default().fg(grey),
            error: Style::default().fg(pink).add_modifier(Modifier::BOLD),
            info: Style::default().fg(teal),
            detail_text: Style::default().fg(white),
        }
    }

    /// Nord color scheme (https://www.nordtheme.com/).
    pub(crate) fn nord() -> Self {
        // Polar Night (dark backgrounds)
        let polar0 = Color::Rgb(46, 52, 64); // #2E3440
        let polar3 = Color::Rgb(76, 86, 106); // #4C566A
        // Snow Storm (light text)
        let snow0 = Color::Rgb(216, 222, 233); // #D8DEE9
        let snow2 = Color::Rgb(236, 239, 244); // #ECEFF4
        // Frost (blues/cyans)
        let frost_teal = Color::Rgb(143, 188, 187); // #8FBCBB
        let frost_cyan = Color::Rgb(136, 192, 208); // #88C0D0
        // Aurora (accents)
        let aurora_red = Color::Rgb(191, 97, 106); // #BF616A
        let aurora_orange = Color::Rgb(208, 135, 112); // #D08770
        let aurora_yellow = Color::Rgb(235, 203, 139); // #EBCB8B

        Self {
            node_body: Style::default().fg(snow2).bg(polar0),
            node_border: polar3,
            node_border_selected: aurora_orange,
            node_name: Style::default()
                .fg(snow2)
                .bg(polar0)
                .add_modifier(Modifier::BOLD),
            node_summary: Style::default().fg(snow0).bg(polar0),

            pod_default: frost_teal,
            pod_fleet: aurora_yellow,

            app_name: Style::default().fg(frost_cyan).add_modifier(Modifier::BOLD),
            footer_help: Style::default().fg(polar3),
            footer_stat: Style::default().fg(snow0),
            help_key: Style::default().fg(frost_cyan),
            border: Style::default().fg(polar3),
            error: Style::default().fg(aurora_red),
            info: Style::default().fg(frost_cyan),
            detail_text: Style::default().fg(snow0),
        }
    }

    /// Border color of a node box.
    pub(crate) fn node_border(&self, selected: bool) -> Color {
        if selected {
            self.node_border_selected
        } else {
            self.node_border
        }
    }

    /// Border color of a pod box.
    pub(crate) fn pod_border(&self, class: PodClass) -> Color {
        match class {
            PodClass::Default => self.pod_default,
            PodClass::FleetController => self.pod_fleet,
        }
    }
}

/// Colors plus labels for one theme.
pub(crate) struct Theme {
    pub(crate) scheme: ColorScheme,
    pub(crate) labels: Labels,
}

impl Theme {
    pub(crate) fn new(theme_name: ThemeName) -> Self {
        let scheme = match theme_name {
            ThemeName::Default => ColorScheme::standard(),
            ThemeName::Nord => ColorScheme::nord(),
        };
        Self {
            scheme,
            labels: Labels::en(),
        }
    }
}
