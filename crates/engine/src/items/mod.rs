//! Item effects - one board mutator per [`ItemKind`]
//!
//! Every effect has the same shape: `apply(state, row, col) -> ItemEffect`. Effects mutate
//! the state they are given (the engine only ever hands them its private copy) and report
//! what happened; they never touch the score themselves; the caller credits
//! [`ItemEffect::bonus_score`] and [`ItemEffect::lines_cleared`].
//!
//! Anchors are board coordinates (`row` from the top, `col` from the left). Effects that
//! need an anchor reject one that is off the board with [`ItemEffect::none`].

mod bomb;
mod boost;
mod cross;
mod line_clear;
pub mod weight;

use tracing::debug;

use blockfall_core::{Board, ClearedRows, GameState};
use blockfall_types::ItemKind;

pub use line_clear::clear_marked_rows;

/// Outcome of applying one item
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ItemEffect {
    pub item: Option<ItemKind>,
    pub success: bool,
    pub blocks_cleared: u32,
    pub bonus_score: u64,
    /// Lines removed by the effect itself or by the clear that follows its gravity
    pub lines_cleared: u32,
    /// Rows the effect removed outright (marked-row clear only)
    pub cleared_rows: ClearedRows,
    pub message: String,
}

impl ItemEffect {
    /// A rejected or empty application
    pub fn none() -> Self {
        Self::default()
    }

    pub fn success(
        item: ItemKind,
        blocks_cleared: u32,
        bonus_score: u64,
        message: impl Into<String>,
    ) -> Self {
        Self {
            item: Some(item),
            success: true,
            blocks_cleared,
            bonus_score,
            lines_cleared: 0,
            cleared_rows: ClearedRows::new(),
            message: message.into(),
        }
    }

    pub fn with_lines(self, lines_cleared: u32) -> Self {
        Self {
            lines_cleared,
            ..self
        }
    }

    pub fn with_rows(self, cleared_rows: ClearedRows) -> Self {
        Self {
            lines_cleared: cleared_rows.len() as u32,
            cleared_rows,
            ..self
        }
    }
}

/// Apply `kind` at (`row`, `col`)
pub fn apply(kind: ItemKind, state: &mut GameState, row: i8, col: i8) -> ItemEffect {
    let effect = match kind {
        ItemKind::Bomb => bomb::apply(state, row, col),
        ItemKind::Cross => cross::apply(state, row, col),
        ItemKind::LineClear => line_clear::apply(state, row, col),
        ItemKind::WeightBomb => weight::apply(state, row, col),
        ItemKind::SpeedReset => boost::speed_reset(state),
        ItemKind::BonusScore => boost::bonus_score(state),
    };
    if effect.success {
        debug!(
            item = kind.as_str(),
            row,
            col,
            blocks = effect.blocks_cleared,
            lines = effect.lines_cleared,
            bonus = effect.bonus_score,
            "item applied"
        );
    }
    effect
}

/// Settle the board after an effect punched holes in it
///
/// Every column is compacted downwards, then full rows are cleared once on the settled
/// board. Returns the number of rows that cascade.
pub fn settle(board: &mut Board) -> u32 {
    board.apply_gravity();
    board.clear_full_rows().len() as u32
}

fn in_bounds(board: &Board, row: i8, col: i8) -> bool {
    !board.is_out_of_bounds(col, row)
}
