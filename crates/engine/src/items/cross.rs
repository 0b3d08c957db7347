use tracing::warn;

use blockfall_core::GameState;
use blockfall_types::{ItemKind, BOARD_HEIGHT, BOARD_WIDTH, CROSS_POINTS_PER_BLOCK};

use super::{in_bounds, settle, ItemEffect};

/// Clear the anchor row, then the anchor column
pub(super) fn apply(state: &mut GameState, row: i8, col: i8) -> ItemEffect {
    if !in_bounds(&state.board, row, col) {
        warn!(row, col, "cross anchor off the board");
        return ItemEffect::none();
    }

    let row_blocks = (0..BOARD_WIDTH as i8)
        .filter(|&x| state.board.clear_cell(x, row))
        .count();
    // The intersection is already empty, so it is never counted twice.
    let col_blocks = (0..BOARD_HEIGHT as i8)
        .filter(|&y| y != row && state.board.clear_cell(col, y))
        .count();
    let blocks = (row_blocks + col_blocks) as u32;

    let lines = if blocks > 0 {
        settle(&mut state.board)
    } else {
        0
    };

    ItemEffect::success(
        ItemKind::Cross,
        blocks,
        blocks as u64 * CROSS_POINTS_PER_BLOCK,
        format!("cross cleared {blocks} blocks at ({row}, {col})"),
    )
    .with_lines(lines)
}
