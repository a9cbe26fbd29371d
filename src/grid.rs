/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Responsive grid layout.
//!
//! The same two primitives lay out both levels of the dashboard:
//! [`boxes_per_row`] decides how many boxes fit side by side, and
//! [`pack`] cuts a flat ordered sequence into rows of that size.
//! Nodes are packed into the terminal-wide canvas; pods are packed
//! into the interior of each node box.

use crate::config::GridConfig;

/// Number of boxes that fit in one row of a container.
///
/// `floor((container_width - container_padding) / (box_width +
/// box_margin + box_border_width))`, never less than 1: a container
/// narrower than a single box still shows one column. Margins and
/// borders are the horizontal totals (both sides).
pub(crate) fn boxes_per_row(
    container_width: u16,
    container_padding: u16,
    box_width: u16,
    box_margin: u16,
    box_border_width: u16,
) -> usize {
    let usable = usize::from(container_width.saturating_sub(container_padding));
    let slot = usize::from(box_width) + usize::from(box_margin) + usize::from(box_border_width);
    if slot == 0 {
        return 1;
    }
    (usable / slot).max(1)
}

/// Split `items` into consecutive rows of `per_row` entries. Row `i`
/// holds indices `[i * per_row, (i + 1) * per_row)`; only the last
/// row may be short. A `per_row` of 0 is treated as 1.
pub(crate) fn pack<T>(items: &[T], per_row: usize) -> Vec<&[T]> {
    items.chunks(per_row.max(1)).collect()
}

/// Per-frame geometry derived from the terminal width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct GridGeometry {
    pub(crate) nodes_per_row: usize,
    pub(crate) pods_per_row: usize,
}

impl GridGeometry {
    pub(crate) fn compute(container_width: u16, cfg: &GridConfig) -> Self {
        let nodes_per_row = boxes_per_row(
            container_width,
            2 * cfg.canvas_padding_x,
            cfg.node.width,
            2 * cfg.node.margin,
            2 * cfg.node.border,
        );
        let pods_per_row = boxes_per_row(
            cfg.node.width,
            2 * cfg.node.padding,
            cfg.pod.width,
            2 * cfg.pod.margin,
            2 * cfg.pod.border,
        );
        Self {
            nodes_per_row,
            pods_per_row,
        }
    }

    pub(crate) fn pod_rows(&self, pod_count: usize) -> usize {
        pod_count.div_ceil(self.pods_per_row.max(1))
    }

    /// Outer height of a node box holding `pod_count` pods. Boxes
    /// never shrink below the configured minimum and grow when their
    /// pods need more rows.
    pub(crate) fn node_box_height(&self, pod_count: usize, cfg: &GridConfig) -> u16 {
        let pod_row_height = u32::from(cfg.pod.outer_height(cfg.pod.min_height) + 2 * cfg.pod.margin);
        let rows = u32::try_from(self.pod_rows(pod_count)).unwrap_or(u32::MAX);
        let content = u32::from(cfg.node_header_lines)
            .saturating_add(rows.saturating_mul(pod_row_height))
            .saturating_add(u32::from(2 * cfg.node.padding));
        let content = u16::try_from(content).unwrap_or(u16::MAX - 2 * cfg.node.border);
        cfg.node.outer_height(content)
    }
}

/// One packed row of node boxes in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RowSpan {
    /// Flat index of the first box in the row.
    pub(crate) first: usize,
    pub(crate) len: usize,
    /// Distance from the top of the (unscrolled) canvas.
    pub(crate) top: u32,
    /// Row height including vertical margins.
    pub(crate) height: u16,
}

impl RowSpan {
    pub(crate) fn bottom(&self) -> u32 {
        self.top + u32::from(self.height)
    }
}

/// Stack rows of boxes with the given outer heights. Boxes in a row
/// are top-aligned, so a row is as tall as its tallest box.
pub(crate) fn layout_rows(heights: &[u16], per_row: usize, margin: u16) -> Vec<RowSpan> {
    let per_row = per_row.max(1);
    let mut top = 0u32;
    pack(heights, per_row)
        .into_iter()
        .enumerate()
        .map(|(i, row)| {
            let height = row.iter().copied().max().unwrap_or(0) + 2 * margin;
            let span = RowSpan {
                first: i * per_row,
                len: row.len(),
                top,
                height,
            };
            top += u32::from(height);
            span
        })
        .collect()
}

/// First row to draw so that `selected_row` is fully inside a
/// viewport of `viewport_height` rows. Scrolls as little as possible
/// from the top.
pub(crate) fn first_visible_row(rows: &[RowSpan], selected_row: usize, viewport_height: u16) -> usize {
    let Some(target) = rows.get(selected_row) else {
        return 0;
    };
    let bottom = target.bottom();
    rows[..=selected_row]
        .iter()
        .position(|row| bottom - row.top <= u32::from(viewport_height))
        .unwrap_or(selected_row)
}
