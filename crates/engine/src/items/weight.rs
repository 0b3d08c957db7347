//! Falling weight
//!
//! The weight is a 4-wide bar. While it falls it destroys whatever sits directly beneath
//! it; when it locks it also empties the whole column path under its final cells. Both
//! are exposed here so the engine can run them from its movement and lock steps.

use tracing::warn;

use blockfall_core::{Board, GameState, Tetromino};
use blockfall_types::{ItemKind, BOARD_HEIGHT, BOARD_WIDTH, WEIGHT_POINTS_PER_BLOCK};

use super::{in_bounds, ItemEffect};

/// Width of the weight bar
pub const WEIGHT_WIDTH: i8 = 4;

/// Destroy the occupied cells directly beneath each mino of a falling piece
///
/// Returns the number of blocks destroyed.
pub fn crush_below(board: &mut Board, piece: &Tetromino) -> u32 {
    let cells = piece.cells();
    cells
        .iter()
        .filter(|&&(x, y)| !cells.contains(&(x, y + 1)))
        .filter(|&&(x, y)| board.clear_cell(x, y + 1))
        .count() as u32
}

/// Empty every cell below `row` in each of `columns`, down to the floor
///
/// Returns the number of blocks destroyed.
pub fn clear_vertical_path(
    board: &mut Board,
    columns: impl IntoIterator<Item = i8>,
    row: i8,
) -> u32 {
    let mut blocks = 0;
    for x in columns {
        for y in row + 1..BOARD_HEIGHT as i8 {
            if board.clear_cell(x, y) {
                blocks += 1;
            }
        }
    }
    blocks
}

/// Points for blocks destroyed by the weight
pub fn points(blocks: u32) -> u64 {
    blocks as u64 * WEIGHT_POINTS_PER_BLOCK
}

/// Drop a weight's worth of columns at the anchor: the anchor column and the three to its
/// right are emptied from the anchor row to the floor
pub(super) fn apply(state: &mut GameState, row: i8, col: i8) -> ItemEffect {
    if !in_bounds(&state.board, row, col) {
        warn!(row, col, "weight anchor off the board");
        return ItemEffect::none();
    }

    let last = (col + WEIGHT_WIDTH).min(BOARD_WIDTH as i8);
    let blocks = clear_vertical_path(&mut state.board, col..last, row - 1);

    ItemEffect::success(
        ItemKind::WeightBomb,
        blocks,
        points(blocks),
        format!("weight crushed {blocks} blocks"),
    )
}
