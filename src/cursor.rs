/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Two-dimensional cursor over a row-major grid with wraparound.
//!
//! The grid is the flattened, ordered node sequence cut into rows of
//! `per_row` cells (see [`crate::grid::pack`]); only the last row may
//! be short. Moves never leave the grid: walking off an edge wraps to
//! the opposite edge of the same row or column.

/// Mathematical modulus: the result is in `[0, b)` for every `a`,
/// including negative dividends. `b` must be positive.
pub(crate) fn modulo(a: i64, b: i64) -> i64 {
    a.rem_euclid(b)
}

/// Directional input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Left,
    Right,
    Up,
    Down,
}

/// Compute the index reached by moving from `index` in `direction`
/// over a grid of `total` cells, `per_row` per row.
///
/// Returns 0 for an empty grid. An out-of-range `index` is clamped
/// first, and `per_row` of 0 is treated as 1.
pub(crate) fn step(index: usize, direction: Direction, total: usize, per_row: usize) -> usize {
    if total == 0 {
        return 0;
    }
    let total = total as i64;
    let per_row = per_row.max(1) as i64;
    let index = (index as i64).min(total - 1);
    let row = index / per_row;

    let next = match direction {
        Direction::Right => {
            let next = index + 1;
            if next >= total {
                // Past the last cell: back to the start of this row.
                row * per_row
            } else {
                row * per_row + next % per_row
            }
        }
        Direction::Left => {
            let candidate = row * per_row + modulo(index - 1, per_row);
            // Wrapping left in a short last row can overshoot.
            candidate.min(total - 1)
        }
        Direction::Up => {
            let candidate = index - per_row;
            if candidate < 0 {
                let col = modulo(candidate, per_row);
                let bottom_row = total / per_row;
                let wrapped = bottom_row * per_row + col;
                if wrapped >= total {
                    // The bottom row is short (or empty) here.
                    wrapped - per_row
                } else {
                    wrapped
                }
            } else {
                candidate
            }
        }
        Direction::Down => {
            let candidate = index + per_row;
            if candidate >= total {
                index % per_row
            } else {
                candidate
            }
        }
    };
    next as usize
}

/// Selection over the node grid.
///
/// Invariant: `pos < len` (or `pos == 0` when `len == 0`). The
/// length is refreshed on every frame through [`GridCursor::update_len`],
/// which clamps a position left dangling by a shrinking snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct GridCursor {
    pos: usize,
    len: usize,
}

impl GridCursor {
    pub(crate) fn new(len: usize) -> Self {
        Self { pos: 0, len }
    }

    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Move in `direction` on a grid of `per_row` columns. Returns
    /// true when the position changed.
    pub(crate) fn move_dir(&mut self, direction: Direction, per_row: usize) -> bool {
        let next = step(self.pos, direction, self.len, per_row);
        let changed = next != self.pos;
        self.pos = next;
        changed
    }

    /// Update length and clamp position to remain valid.
    pub(crate) fn update_len(&mut self, new_len: usize) {
        self.len = new_len;
        self.pos = if new_len == 0 {
            0
        } else {
            self.pos.min(new_len - 1)
        };
    }

    /// Set position directly, clamped to the valid range.
    #[cfg(test)]
    pub(crate) fn set_pos(&mut self, new_pos: usize) {
        self.pos = if self.len == 0 {
            0
        } else {
            new_pos.min(self.len - 1)
        };
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    #[test]
    fn modulo_of_negative_dividend_is_positive() {
        assert_eq!(modulo(-1, 3), 2);
        assert_eq!(modulo(-3, 3), 0);
        assert_eq!(modulo(-4, 3), 2);
        assert_eq!(modulo(4, 3), 1);
        // `%` would give -1 here.
        assert_eq!(-1i64 % 3, -1);
    }

    // Rows: [0 1 2] [3 4 5] [6]
    #[test]
    fn seven_by_three_scenario() {
        assert_eq!(step(6, Direction::Down, 7, 3), 0);
        assert_eq!(step(0, Direction::Up, 7, 3), 6);
        assert_eq!(step(1, Direction::Up, 7, 3), 4);
        assert_eq!(step(2, Direction::Up, 7, 3), 5);
        assert_eq!(step(4, Direction::Down, 7, 3), 1);
        assert_eq!(step(3, Direction::Down, 7, 3), 6);
    }

    #[test]
    fn right_wraps_within_row() {
        assert_eq!(step(2, Direction::Right, 7, 3), 0);
        assert_eq!(step(5, Direction::Right, 7, 3), 3);
        assert_eq!(step(6, Direction::Right, 7, 3), 6);
        assert_eq!(step(0, Direction::Right, 7, 3), 1);
    }

    #[test]
    fn right_from_last_of_full_last_row_stays_in_row() {
        // Rows: [0 1 2] [3 4 5]
        assert_eq!(step(5, Direction::Right, 6, 3), 3);
    }

    #[test]
    fn left_wraps_within_row() {
        assert_eq!(step(0, Direction::Left, 7, 3), 2);
        assert_eq!(step(3, Direction::Left, 7, 3), 5);
        // Short last row: wrapping lands past the end and is clamped.
        assert_eq!(step(6, Direction::Left, 7, 3), 6);
        assert_eq!(step(0, Direction::Left, 1, 3), 0);
        assert_eq!(step(0, Direction::Left, 2, 3), 1);
    }

    #[test]
    fn up_wraps_to_bottom_or_row_above_short_bottom() {
        // Rows: [0 1 2 3] [4 5 6 7] [8 9]
        assert_eq!(step(1, Direction::Up, 10, 4), 9);
        assert_eq!(step(2, Direction::Up, 10, 4), 6);
        assert_eq!(step(3, Direction::Up, 10, 4), 7);
        // Full bottom row.
        assert_eq!(step(1, Direction::Up, 8, 4), 5);
    }

    #[test]
    fn single_row_vertical_moves_stay_put() {
        for i in 0..3 {
            assert_eq!(step(i, Direction::Up, 3, 5), i);
            assert_eq!(step(i, Direction::Down, 3, 5), i);
        }
    }

    #[test]
    fn empty_grid_is_always_zero() {
        for dir in ALL {
            assert_eq!(step(0, dir, 0, 3), 0);
            assert_eq!(step(9, dir, 0, 0), 0);
        }
    }

    #[test]
    fn zero_per_row_behaves_like_one_column() {
        assert_eq!(step(0, Direction::Down, 3, 0), 1);
        assert_eq!(step(2, Direction::Down, 3, 0), 0);
        assert_eq!(step(1, Direction::Right, 3, 0), 1);
    }

    #[test]
    fn cursor_update_len_clamps() {
        let mut cursor = GridCursor::new(10);
        cursor.set_pos(9);
        cursor.update_len(4);
        assert_eq!(cursor.pos(), 3);
        cursor.update_len(0);
        assert_eq!(cursor.pos(), 0);
        assert_eq!(cursor.len(), 0);
        cursor.update_len(5);
        assert_eq!(cursor.pos(), 0);
    }

    #[test]
    fn cursor_move_reports_change() {
        let mut cursor = GridCursor::new(7);
        assert!(cursor.move_dir(Direction::Right, 3));
        assert_eq!(cursor.pos(), 1);
        // Single-cell grid: nothing moves.
        let mut lonely = GridCursor::new(1);
        for dir in ALL {
            assert!(!lonely.move_dir(dir, 3));
        }
    }

    fn grid() -> impl Strategy<Value = (usize, usize, usize)> {
        (1usize..60, 1usize..12).prop_flat_map(|(total, per_row)| (Just(total), Just(per_row), 0..total))
    }

    proptest! {
        #[test]
        fn modulo_in_range(a in any::<i32>(), b in 1i64..10_000) {
            let m = modulo(i64::from(a), b);
            prop_assert!((0..b).contains(&m));
        }

        #[test]
        fn every_move_stays_in_bounds((total, per_row, index) in grid()) {
            for dir in ALL {
                prop_assert!(step(index, dir, total, per_row) < total);
            }
        }

        #[test]
        fn right_then_left_round_trips((total, per_row, index) in grid()) {
            let interior = index % per_row != per_row - 1 && index + 1 < total;
            prop_assume!(interior);
            let right = step(index, Direction::Right, total, per_row);
            prop_assert_eq!(right, index + 1);
            prop_assert_eq!(step(right, Direction::Left, total, per_row), index);
        }

        #[test]
        fn down_then_up_round_trips((total, per_row, index) in grid()) {
            prop_assume!(index + per_row < total);
            let down = step(index, Direction::Down, total, per_row);
            prop_assert_eq!(down, index + per_row);
            prop_assert_eq!(step(down, Direction::Up, total, per_row), index);
        }

        #[test]
        fn right_from_last_lands_on_row_start((total, per_row) in (1usize..60, 1usize..12)) {
            let last = total - 1;
            prop_assert_eq!(step(last, Direction::Right, total, per_row), last - last % per_row);
        }

        #[test]
        fn horizontal_moves_keep_row((total, per_row, index) in grid()) {
            for dir in [Direction::Left, Direction::Right] {
                prop_assert_eq!(step(index, dir, total, per_row) / per_row, index / per_row);
            }
        }

        #[test]
        fn vertical_moves_keep_column((total, per_row, index) in grid()) {
            for dir in [Direction::Up, Direction::Down] {
                prop_assert_eq!(step(index, dir, total, per_row) % per_row, index % per_row);
            }
        }

        #[test]
        fn clamp_holds_after_any_shrink(
            start in 0usize..100,
            old_len in 1usize..100,
            new_len in 0usize..100,
        ) {
            let mut cursor = GridCursor::new(old_len);
            cursor.set_pos(start);
            cursor.update_len(new_len);
            prop_assert!(cursor.pos() < new_len.max(1));
        }
    }
}
