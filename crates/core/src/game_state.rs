//! Game state module - the value threaded through every engine call
//!
//! [`GameState`] holds everything a match needs between two commands: the board, the
//! falling piece, hold, the mirrored next queue, scoring counters, transient flags the
//! lock step reads back, item bookkeeping and the terminal flag.
//!
//! The engine never mutates a state it was handed. It clones, changes the clone and
//! returns it, so the fields are public plain data.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::board::{Board, ClearedRows};
use crate::config::GameModeConfig;
use crate::pieces::{get_shape, pivot_offset, PieceShape};
use crate::rng::{NextQueue, PieceSource};
use crate::snapshot::GameStateSnapshot;
use crate::types::{
    ItemKind, PieceKind, Rotation, TSpinKind, LINES_PER_LEVEL, NEXT_QUEUE_LEN, SPAWN_X, SPAWN_Y,
};

/// ChaCha stream reserved for item randomness, apart from the piece sequence
const ITEM_RNG_STREAM: u64 = 1;

/// Active falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tetromino {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
    /// Item carried by this piece, if any
    pub item: Option<ItemKind>,
    /// Index into the shape of the mino that carries `item`
    ///
    /// Fixed when the piece is created; rotation never changes it.
    pub marker_index: u8,
}

impl Tetromino {
    /// Create a new piece at the spawn position
    pub fn new(kind: PieceKind) -> Self {
        Self {
            kind,
            rotation: Rotation::North,
            x: SPAWN_X,
            y: SPAWN_Y,
            item: None,
            marker_index: 0,
        }
    }

    /// Attach an item to the mino at `marker_index`
    pub fn with_item(self, item: ItemKind, marker_index: u8) -> Self {
        Self {
            item: Some(item),
            marker_index,
            ..self
        }
    }

    /// Same piece, back at the spawn position and orientation
    pub fn respawned(self) -> Self {
        Self {
            rotation: Rotation::North,
            x: SPAWN_X,
            y: SPAWN_Y,
            ..self
        }
    }

    /// Same piece moved by (dx, dy)
    pub fn shifted(self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    /// Get the shape (mino offsets) for current rotation
    pub fn shape(&self) -> PieceShape {
        get_shape(self.kind, self.rotation)
    }

    /// Absolute board coordinates of every mino
    pub fn cells(&self) -> PieceShape {
        self.shape()
            .iter()
            .map(|&(dx, dy)| (self.x + dx, self.y + dy))
            .collect()
    }

    /// Absolute position of the marker-carrying mino
    pub fn marker_cell(&self) -> Option<(i8, i8)> {
        self.item?;
        self.cells().get(self.marker_index as usize).copied()
    }

    /// Absolute position of the rotation pivot
    pub fn pivot(&self) -> (i8, i8) {
        let (px, py) = pivot_offset(self.kind);
        (self.x + px, self.y + py)
    }

    /// Check if all minos are at valid positions (rows above the board allowed)
    pub fn is_valid(&self, board: &Board) -> bool {
        self.cells().iter().all(|&(x, y)| board.accepts_mino(x, y))
    }

    /// Check if the piece is grounded (resting on something)
    pub fn is_grounded(&self, board: &Board) -> bool {
        !self.shifted(0, 1).is_valid(board)
    }
}

/// Result of the most recent lock, read by callers building external events
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockResult {
    pub piece: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
    /// Rows removed by the full-row clear and by LINE_CLEAR markers (bottom to top, pre-lock indices)
    pub cleared_rows: ClearedRows,
    /// Every line removed by this lock, including marked rows and item cascades
    pub lines_cleared: u32,
    pub score_earned: u64,
    pub perfect_clear: bool,
    pub leveled_up: bool,
    pub tspin: TSpinKind,
    /// Item applied as part of this lock
    pub item_used: Option<ItemKind>,
    /// Item generated by the cadence counter on this lock
    pub item_generated: Option<ItemKind>,
}

impl LockResult {
    /// Metadata for a lock that had no effect on the board
    pub fn empty(piece: &Tetromino) -> Self {
        Self {
            piece: piece.kind,
            rotation: piece.rotation,
            x: piece.x,
            y: piece.y,
            cleared_rows: ClearedRows::new(),
            lines_cleared: 0,
            score_earned: 0,
            perfect_clear: false,
            leveled_up: false,
            tspin: TSpinKind::None,
            item_used: None,
            item_generated: None,
        }
    }

    pub fn is_tspin(&self) -> bool {
        self.tspin == TSpinKind::Full
    }

    pub fn is_tspin_mini(&self) -> bool {
        self.tspin == TSpinKind::Mini
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub board: Board,
    pub active: Option<Tetromino>,
    /// Held piece (kept with its item and marker)
    pub hold: Option<Tetromino>,
    pub hold_used: bool,
    /// Upcoming pieces mirrored from the provider; the head spawns next
    pub next_queue: NextQueue,
    /// Pieces taken from the head of the queue so far
    pub piece_id: u32,
    pub score: u64,
    pub lines: u32,
    pub level: u32,
    /// Cumulative line total that triggers the next level
    pub lines_for_next_level: u32,
    /// Consecutive line-clearing locks
    pub combo: u32,
    /// Consecutive difficult clears (0 = inactive)
    pub back_to_back: u32,
    pub last_clear_was_difficult: bool,
    /// Whether the active piece is grounded and the caller's lock timer should run
    pub lock_delay_active: bool,
    pub lock_resets: u32,
    pub paused: bool,
    pub soft_drop_speed_multiplier: f64,
    /// One-shot flag for the caller's drop timer after a speed reset
    pub speed_reset_requested: bool,
    pub last_action_was_rotation: bool,
    /// Kick offset (0-4) used by the last successful rotation
    pub last_kick_index: u8,
    pub last_lock: Option<LockResult>,
    /// Cleared lines left before the next item is generated (may go negative in transit)
    pub lines_until_next_item: i32,
    /// Item that the next spawned piece will carry
    pub next_item: Option<ItemKind>,
    /// Weight piece whose descent was blocked and can no longer move sideways
    pub weight_locked: bool,
    /// Collected items awaiting manual use
    pub inventory: Vec<ItemKind>,
    /// Item-related randomness (selection, marker index)
    pub item_rng: ChaCha8Rng,
    pub game_over: bool,
    pub game_over_reason: Option<String>,
}

impl GameState {
    /// Create a new match state for `config`, seeding the item RNG with `seed`
    ///
    /// The next queue starts empty; fill it with [`GameState::refresh_queue`].
    pub fn new(config: &GameModeConfig, seed: u64) -> Self {
        let level = config.start_level;
        let mut item_rng = ChaCha8Rng::seed_from_u64(seed);
        item_rng.set_stream(ITEM_RNG_STREAM);
        Self {
            board: Board::new(),
            active: None,
            hold: None,
            hold_used: false,
            next_queue: NextQueue::new(),
            piece_id: 0,
            score: 0,
            lines: 0,
            level,
            lines_for_next_level: level * LINES_PER_LEVEL,
            combo: 0,
            back_to_back: 0,
            last_clear_was_difficult: false,
            lock_delay_active: false,
            lock_resets: 0,
            paused: false,
            soft_drop_speed_multiplier: 1.0,
            speed_reset_requested: false,
            last_action_was_rotation: false,
            last_kick_index: 0,
            last_lock: None,
            lines_until_next_item: config.items.lines_per_item as i32,
            next_item: None,
            weight_locked: false,
            inventory: Vec::new(),
            item_rng,
            game_over: false,
            game_over_reason: None,
        }
    }

    /// Mirror the provider's upcoming pieces into the next queue
    pub fn refresh_queue(&mut self, source: &impl PieceSource) {
        self.next_queue = source.peek(NEXT_QUEUE_LEN);
    }

    /// Take the head of the next queue, counting the draw
    pub fn take_next(&mut self) -> Option<PieceKind> {
        if self.next_queue.is_empty() {
            return None;
        }
        self.piece_id = self.piece_id.wrapping_add(1);
        Some(self.next_queue.remove(0))
    }

    /// End the match with a reason
    pub fn end(&mut self, reason: impl Into<String>) {
        self.game_over = true;
        self.game_over_reason = Some(reason.into());
        self.lock_delay_active = false;
    }

    /// Whether commands that touch the active piece can run
    pub fn playable(&self) -> bool {
        !self.game_over && !self.paused
    }

    /// Check if the active piece is on the ground
    pub fn is_grounded(&self) -> bool {
        self.active
            .is_some_and(|piece| piece.is_grounded(&self.board))
    }

    /// How many rows the active piece can fall from where it is
    pub fn drop_distance(&self) -> Option<i8> {
        let active = self.active?;
        let mut distance: i8 = 0;
        while active.shifted(0, distance + 1).is_valid(&self.board) {
            distance += 1;
        }
        Some(distance)
    }

    /// Calculate the ghost piece Y position (where piece would land)
    pub fn ghost_y(&self) -> Option<i8> {
        let active = self.active?;
        self.drop_distance().map(|d| active.y + d)
    }

    /// Classify the active piece's placement as a T-spin
    ///
    /// Only a T whose last action was a rotation qualifies. Of the four diagonal cells
    /// around the pivot, off-board or occupied ones count as filled; three or more make a
    /// T-spin. It is a mini when the last rotation did not use the final kick offset and
    /// one of the two corners on the side the T points to is open.
    pub fn tspin_kind(&self) -> TSpinKind {
        let Some(piece) = self.active else {
            return TSpinKind::None;
        };
        if piece.kind != PieceKind::T || !self.last_action_was_rotation {
            return TSpinKind::None;
        }

        let (px, py) = piece.pivot();
        let filled = |(dx, dy): (i8, i8)| !self.board.is_valid(px + dx, py + dy);

        let corners = [(-1, -1), (1, -1), (-1, 1), (1, 1)];
        if corners.into_iter().filter(|&c| filled(c)).count() < 3 {
            return TSpinKind::None;
        }

        let facing = match piece.rotation {
            Rotation::North => [(-1, -1), (1, -1)],
            Rotation::East => [(1, -1), (1, 1)],
            Rotation::South => [(-1, 1), (1, 1)],
            Rotation::West => [(-1, -1), (-1, 1)],
        };
        let facing_open = facing.into_iter().any(|c| !filled(c));

        if facing_open && self.last_kick_index != 4 {
            TSpinKind::Mini
        } else {
            TSpinKind::Full
        }
    }

    /// Lightweight view for change detection
    pub fn snapshot(&self) -> GameStateSnapshot {
        GameStateSnapshot::capture(self)
    }
}
