use tracing::warn;

use blockfall_core::{Board, ClearedRows, GameState};
use blockfall_types::{ItemKind, LINE_CLEAR_POINTS_PER_BLOCK};

use super::{in_bounds, ItemEffect};

/// Remove every row holding a LINE_CLEAR marker, full or not
///
/// Returns [`ItemEffect::none`] when the board carries no such marker.
pub fn clear_marked_rows(board: &mut Board) -> ItemEffect {
    let rows = board.rows_with_marker(ItemKind::LineClear);
    if rows.is_empty() {
        return ItemEffect::none();
    }
    remove(board, &rows)
}

/// Marked rows if there are any, otherwise the anchor row
pub(super) fn apply(state: &mut GameState, row: i8, col: i8) -> ItemEffect {
    let marked = clear_marked_rows(&mut state.board);
    if marked.success {
        return marked;
    }

    if !in_bounds(&state.board, row, col) {
        warn!(row, col, "line clear anchor off the board");
        return ItemEffect::none();
    }
    let mut rows = ClearedRows::new();
    rows.push(row as u8);
    remove(&mut state.board, &rows)
}

fn remove(board: &mut Board, rows: &ClearedRows) -> ItemEffect {
    let blocks = board.remove_rows(rows) as u32;
    ItemEffect::success(
        ItemKind::LineClear,
        blocks,
        blocks as u64 * LINE_CLEAR_POINTS_PER_BLOCK,
        format!("line clear removed {} rows", rows.len()),
    )
    .with_rows(rows.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockfall_core::GameModeConfig;

    #[test]
    fn test_marked_rows_go_regardless_of_fullness() {
        let mut board = Board::from_rows(&["#.........", "##*.......", "###.######"]);
        let effect = clear_marked_rows(&mut board);

        assert!(effect.success);
        assert_eq!(effect.lines_cleared, 1);
        assert_eq!(effect.blocks_cleared, 3);
        assert_eq!(effect.bonus_score, 30);
        assert_eq!(effect.cleared_rows.as_slice(), &[18]);
        // The top row dropped into the removed row's place.
        assert!(board.is_occupied(0, 18));
        assert_eq!(board.occupied_count(), 1 + 9);
    }

    #[test]
    fn test_no_marker_no_effect() {
        let mut board = Board::from_rows(&["#########."]);
        assert_eq!(clear_marked_rows(&mut board), ItemEffect::none());
        assert_eq!(board.occupied_count(), 9);
    }

    #[test]
    fn test_manual_use_falls_back_to_anchor_row() {
        let mut state = GameState::new(&GameModeConfig::arcade(), 0);
        state.board = Board::from_rows(&["#.#.#.#.#.", "##########"]);
        let effect = apply(&mut state, 18, 0);
        assert_eq!(effect.lines_cleared, 1);
        assert_eq!(effect.blocks_cleared, 5);
        assert_eq!(state.board.occupied_count(), 10);
    }
}
