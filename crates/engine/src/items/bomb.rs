use tracing::warn;

use blockfall_core::GameState;
use blockfall_types::{ItemKind, BOMB_POINTS_PER_BLOCK, BOMB_RADIUS};

use super::{in_bounds, settle, ItemEffect};

/// Clear every block within Chebyshev distance [`BOMB_RADIUS`] of the anchor
pub(super) fn apply(state: &mut GameState, row: i8, col: i8) -> ItemEffect {
    if !in_bounds(&state.board, row, col) {
        warn!(row, col, "bomb anchor off the board");
        return ItemEffect::none();
    }

    let mut blocks = 0u32;
    for y in row - BOMB_RADIUS..=row + BOMB_RADIUS {
        for x in col - BOMB_RADIUS..=col + BOMB_RADIUS {
            if state.board.clear_cell(x, y) {
                blocks += 1;
            }
        }
    }

    let lines = if blocks > 0 {
        settle(&mut state.board)
    } else {
        0
    };

    ItemEffect::success(
        ItemKind::Bomb,
        blocks,
        blocks as u64 * BOMB_POINTS_PER_BLOCK,
        format!("bomb cleared {blocks} blocks at ({row}, {col})"),
    )
    .with_lines(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockfall_core::{Board, GameModeConfig};

    fn state_with(board: Board) -> GameState {
        let mut state = GameState::new(&GameModeConfig::arcade(), 0);
        state.board = board;
        state
    }

    #[test]
    fn test_bomb_in_the_open_clears_5x5() {
        let rows = ["##########"; 5];
        let mut state = state_with(Board::from_rows(&rows));
        let effect = apply(&mut state, 17, 4);

        assert!(effect.success);
        assert_eq!(effect.blocks_cleared, 25);
        assert_eq!(effect.bonus_score, 125);
        // Columns 0-1 and 7-9 survive, nothing above falls in, so no row is full.
        assert_eq!(effect.lines_cleared, 0);
        assert_eq!(state.board.occupied_count(), 50 - 25);
    }

    #[test]
    fn test_bomb_clipped_at_corner() {
        let rows = ["##########"; 3];
        let mut state = state_with(Board::from_rows(&rows));
        let effect = apply(&mut state, 19, 0);
        // Rows 17-19 x columns 0-2.
        assert_eq!(effect.blocks_cleared, 9);
    }

    #[test]
    fn test_bomb_off_board_is_rejected() {
        let mut state = state_with(Board::new());
        assert_eq!(apply(&mut state, 20, 0), ItemEffect::none());
        assert_eq!(apply(&mut state, 5, -1), ItemEffect::none());
    }

    #[test]
    fn test_bomb_on_empty_area_succeeds_with_nothing_cleared() {
        let mut state = state_with(Board::new());
        let effect = apply(&mut state, 10, 5);
        assert!(effect.success);
        assert_eq!(effect.blocks_cleared, 0);
    }
}
