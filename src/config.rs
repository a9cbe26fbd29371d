/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::theme::ThemeName;

/// Command-line arguments for the node grid dashboard.
#[derive(Debug, Parser)]
#[command(
    name = "nodegrid",
    about = "Live grid of cluster nodes and the pods scheduled on them"
)]
pub(crate) struct Args {
    /// Path to a kubeconfig file. Without it the standard lookup
    /// applies (`KUBECONFIG`, then `~/.kube/config`, then in-cluster).
    #[arg(long)]
    pub(crate) kubeconfig: Option<PathBuf>,

    /// Kubeconfig context to use instead of the current one.
    #[arg(long)]
    pub(crate) context: Option<String>,

    /// Read nodes and pods from a JSON/YAML file instead of a cluster.
    #[arg(long, conflicts_with_all = ["kubeconfig", "context"])]
    pub(crate) fixture: Option<PathBuf>,

    /// Re-read the fixture file when it changes, polling at this
    /// interval in milliseconds.
    #[arg(long, requires = "fixture")]
    pub(crate) fixture_poll: Option<u64>,

    /// Seconds to wait for the initial sync before drawing anyway.
    #[arg(long, default_value_t = 30)]
    pub(crate) sync_timeout: u64,

    /// Color theme
    #[arg(long, default_value_t = ThemeName::Default, value_enum)]
    pub(crate) theme: ThemeName,

    /// Write logs to this file (the terminal belongs to the UI).
    #[arg(long, env = "NODEGRID_LOG")]
    pub(crate) log_file: Option<PathBuf>,

    /// Default log filter; `RUST_LOG` takes precedence when set.
    #[arg(long, default_value = "info")]
    pub(crate) log_level: String,
}

impl Args {
    pub(crate) fn sync_timeout(&self) -> Duration {
        Duration::from_secs(self.sync_timeout)
    }

    pub(crate) fn fixture_poll(&self) -> Option<Duration> {
        self.fixture_poll.map(Duration::from_millis)
    }
}

/// Fixed geometry of one kind of box.
///
/// `width` and `min_height` include the padding but not the border
/// or margin, which are given per side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BoxSpec {
    pub(crate) width: u16,
    pub(crate) min_height: u16,
    pub(crate) margin: u16,
    pub(crate) border: u16,
    pub(crate) padding: u16,
}

impl BoxSpec {
    /// Width including borders, excluding margins.
    pub(crate) fn outer_width(&self) -> u16 {
        self.width + 2 * self.border
    }

    /// Horizontal space one box claims in a row.
    pub(crate) fn slot_width(&self) -> u16 {
        self.outer_width() + 2 * self.margin
    }

    /// Height including borders, excluding margins, for content of
    /// `content_height` rows (padding included).
    pub(crate) fn outer_height(&self, content_height: u16) -> u16 {
        content_height.max(self.min_height) + 2 * self.border
    }
}

/// Immutable layout constants, passed to every layout and render
/// call instead of living in shared mutable state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct GridConfig {
    /// Blank columns on each side of the canvas.
    pub(crate) canvas_padding_x: u16,
    /// Blank rows above and below the canvas.
    pub(crate) canvas_padding_y: u16,
    pub(crate) node: BoxSpec,
    pub(crate) pod: BoxSpec,
    /// Text lines at the top of a node box (name, summary).
    pub(crate) node_header_lines: u16,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            canvas_padding_x: 2,
            canvas_padding_y: 1,
            node: BoxSpec {
                width: 30,
                min_height: 10,
                margin: 1,
                border: 1,
                padding: 1,
            },
            pod: BoxSpec {
                width: 1,
                min_height: 1,
                margin: 0,
                border: 1,
                padding: 0,
            },
            node_header_lines: 2,
        }
    }
}
