use crate::game_state::{GameState, Tetromino};
use crate::types::{ItemKind, PieceKind, Rotation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
    pub item: Option<ItemKind>,
}

impl From<Tetromino> for ActiveSnapshot {
    fn from(value: Tetromino) -> Self {
        Self {
            kind: value.kind,
            rotation: value.rotation,
            x: value.x,
            y: value.y,
            item: value.item,
        }
    }
}

/// Read-only view of the scalar parts of a [`GameState`]
///
/// Copying it skips the board, so callers can capture one per render or network tick
/// and compare it with the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GameStateSnapshot {
    pub active: Option<ActiveSnapshot>,
    pub hold: Option<PieceKind>,
    pub hold_used: bool,
    pub piece_id: u32,
    pub score: u64,
    pub level: u32,
    pub lines: u32,
    pub combo: u32,
    pub back_to_back: u32,
    pub paused: bool,
    pub game_over: bool,
    pub next_item: Option<ItemKind>,
    pub inventory_len: usize,
    pub speed_reset_requested: bool,
    pub weight_locked: bool,
}

impl GameStateSnapshot {
    pub fn capture(state: &GameState) -> Self {
        Self {
            active: state.active.map(ActiveSnapshot::from),
            hold: state.hold.map(|piece| piece.kind),
            hold_used: state.hold_used,
            piece_id: state.piece_id,
            score: state.score,
            level: state.level,
            lines: state.lines,
            combo: state.combo,
            back_to_back: state.back_to_back,
            paused: state.paused,
            game_over: state.game_over,
            next_item: state.next_item,
            inventory_len: state.inventory.len(),
            speed_reset_requested: state.speed_reset_requested,
            weight_locked: state.weight_locked,
        }
    }

    /// Whether any tracked field changed
    pub fn differs_from(&self, other: &GameStateSnapshot) -> bool {
        self != other
    }

    pub fn playable(&self) -> bool {
        !self.game_over && !self.paused
    }
}

impl From<&GameState> for GameStateSnapshot {
    fn from(state: &GameState) -> Self {
        Self::capture(state)
    }
}
