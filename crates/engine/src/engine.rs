//! Simulation engine - `(state, command) -> new state`
//!
//! Every public operation takes a `&GameState` and returns a fresh one; the input is
//! never touched. A rejected transition (blocked move, failed rotation, hold already
//! used) returns an unchanged clone, and callers detect it by comparing the two states.
//! A terminal failure sets [`GameState::game_over`] with a reason and every later call
//! returns the state as it is.
//!
//! Classic and arcade play share one lock pipeline: write, clear, score, progress.
//! When the configuration enables items, an item hook runs after the clear.

use rand::Rng;
use tracing::{debug, info, warn};

use blockfall_core::pieces::{mino_count, try_rotate};
use blockfall_core::scoring::{
    advance_level, calculate_drop_score, calculate_score, next_back_to_back, scale_score,
};
use blockfall_core::{ClearedRows, ConfigError, GameModeConfig, GameState, LockResult, Tetromino};
use blockfall_types::{GameCommand, ItemKind, PieceKind, BOARD_HEIGHT, LINE_CLEAR_ROW_POINTS};

use crate::item_manager::ItemManager;
use crate::items::{self, weight, ItemEffect};

/// What the item hook added to a lock
#[derive(Debug, Default)]
struct HookOutcome {
    points: u64,
    lines: u32,
    used: Option<ItemKind>,
    /// Marked rows removed after the full-row clear, in post-clear indices
    marked_rows: ClearedRows,
}

/// The game engine for one match configuration
#[derive(Debug, Clone)]
pub struct Engine {
    config: GameModeConfig,
    items: ItemManager,
}

impl Engine {
    /// Create an engine after validating `config`
    pub fn new(config: GameModeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let items = ItemManager::new(&config.items);
        Ok(Self { config, items })
    }

    pub fn config(&self) -> &GameModeConfig {
        &self.config
    }

    pub fn item_manager(&self) -> &ItemManager {
        &self.items
    }

    /// Whether locks run the item hook
    pub fn is_arcade(&self) -> bool {
        self.config.item_system_active()
    }

    /// Fresh state for a match on this engine
    pub fn new_game(&self, seed: u64) -> GameState {
        GameState::new(&self.config, seed)
    }

    pub fn move_left(&self, state: &GameState) -> GameState {
        self.translate(state, -1)
    }

    pub fn move_right(&self, state: &GameState) -> GameState {
        self.translate(state, 1)
    }

    /// Move the active piece one row down
    ///
    /// A soft drop earns a point per row; gravity ticks pass `soft_drop = false`. Never
    /// locks. A weight piece crushes the blocks beneath it first, and marks itself
    /// locked in place when it cannot descend.
    pub fn move_down(&self, state: &GameState, soft_drop: bool) -> GameState {
        let mut next = state.clone();
        self.descend(&mut next, soft_drop);
        next
    }

    pub fn rotate_cw(&self, state: &GameState) -> GameState {
        self.rotate(state, true)
    }

    pub fn rotate_ccw(&self, state: &GameState) -> GameState {
        self.rotate(state, false)
    }

    /// Drop the active piece as far as it goes (+2 per row) and lock it
    pub fn hard_drop(&self, state: &GameState) -> GameState {
        if !state.playable() {
            return state.clone();
        }
        let (Some(piece), Some(distance)) = (state.active, state.drop_distance()) else {
            return state.clone();
        };

        let mut next = state.clone();
        next.active = Some(piece.shifted(0, distance));
        next.score += calculate_drop_score(distance as u32, true);
        if distance > 0 {
            next.last_action_was_rotation = false;
        }
        self.lock_in_place(&mut next);
        next
    }

    /// Swap the active piece with the hold slot, once per lock cycle
    pub fn hold(&self, state: &GameState) -> GameState {
        if !state.playable() || !self.config.hold_enabled || state.hold_used {
            return state.clone();
        }
        let Some(piece) = state.active else {
            return state.clone();
        };

        let mut next = state.clone();
        match next.hold.replace(piece.respawned()) {
            Some(held) => self.place_spawned(&mut next, held.respawned()),
            None => {
                let needs_queue = next.next_item.and_then(|item| item.carrier()).is_none();
                if needs_queue && next.next_queue.is_empty() {
                    warn!("hold requested with an empty next queue");
                    return state.clone();
                }
                self.spawn_in_place(&mut next);
            }
        }

        next.hold_used = true;
        next.last_action_was_rotation = false;
        next
    }

    /// Lock the active piece where it stands
    ///
    /// Runs the whole pipeline and fills [`GameState::last_lock`]. Does not spawn.
    pub fn lock(&self, state: &GameState) -> GameState {
        if state.game_over {
            return state.clone();
        }
        let mut next = state.clone();
        self.lock_in_place(&mut next);
        next
    }

    /// Spawn the next piece
    ///
    /// A pending item decides the carrier: the weight bomb arrives as a WEIGHT piece, the
    /// speed reset and bonus score on the single-cell ITEM carrier, anything else rides
    /// on the next piece from the queue with its marker on a random mino.
    pub fn spawn_next(&self, state: &GameState) -> GameState {
        if state.game_over {
            return state.clone();
        }
        let mut next = state.clone();
        self.spawn_in_place(&mut next);
        next
    }

    /// Apply one player command
    ///
    /// Soft drop locks when the piece cannot descend; hard drop and hold are rejected
    /// when disabled. A lock that does not end the match is followed by a spawn. While
    /// paused everything except `Resume` is rejected.
    pub fn execute(&self, state: &GameState, command: GameCommand) -> GameState {
        if state.game_over {
            return state.clone();
        }
        if state.paused {
            if command != GameCommand::Resume {
                return state.clone();
            }
            let mut next = state.clone();
            next.paused = false;
            return next;
        }

        match command {
            GameCommand::MoveLeft => self.move_left(state),
            GameCommand::MoveRight => self.move_right(state),
            GameCommand::RotateCw => self.rotate_cw(state),
            GameCommand::RotateCcw => self.rotate_ccw(state),
            GameCommand::SoftDrop => {
                let mut next = state.clone();
                if next.active.is_some() && !self.descend(&mut next, true) {
                    self.lock_in_place(&mut next);
                    self.spawn_after_lock(&mut next);
                }
                next
            }
            GameCommand::HardDrop => {
                if !self.config.hard_drop_enabled || state.active.is_none() {
                    return state.clone();
                }
                let mut next = self.hard_drop(state);
                self.spawn_after_lock(&mut next);
                next
            }
            GameCommand::Hold => self.hold(state),
            GameCommand::Pause => {
                let mut next = state.clone();
                next.paused = true;
                next
            }
            GameCommand::Resume => state.clone(),
        }
    }

    /// Use a collected item at an explicit anchor
    ///
    /// The item must be in the inventory. On success it is removed, its score and lines
    /// are credited like a lock's. A rejected use returns the state unchanged with
    /// [`ItemEffect::none`] or the failed effect.
    pub fn use_item(
        &self,
        state: &GameState,
        kind: ItemKind,
        row: i8,
        col: i8,
    ) -> (GameState, ItemEffect) {
        if !state.playable() {
            return (state.clone(), ItemEffect::none());
        }
        let Some(slot) = state.inventory.iter().position(|&item| item == kind) else {
            warn!(item = kind.as_str(), "item not in inventory");
            return (state.clone(), ItemEffect::none());
        };

        let mut next = state.clone();
        let effect = items::apply(kind, &mut next, row, col);
        if !effect.success {
            return (state.clone(), effect);
        }

        next.inventory.remove(slot);
        next.score += effect.bonus_score;
        self.credit_lines(&mut next, effect.lines_cleared);
        (next, effect)
    }

    fn translate(&self, state: &GameState, dx: i8) -> GameState {
        if !state.playable() || state.weight_locked {
            return state.clone();
        }
        let Some(piece) = state.active else {
            return state.clone();
        };

        let moved = piece.shifted(dx, 0);
        if !moved.is_valid(&state.board) {
            return state.clone();
        }

        let mut next = state.clone();
        next.active = Some(moved);
        next.last_action_was_rotation = false;
        self.count_lock_reset(&mut next);
        next
    }

    fn rotate(&self, state: &GameState, clockwise: bool) -> GameState {
        if !state.playable() {
            return state.clone();
        }
        let Some(piece) = state.active else {
            return state.clone();
        };

        let result = try_rotate(
            piece.kind,
            piece.rotation,
            piece.x,
            piece.y,
            clockwise,
            self.config.srs_enabled,
            |x, y| state.board.accepts_mino(x, y),
        );
        let Some(result) = result else {
            return state.clone();
        };

        let mut next = state.clone();
        next.active = Some(Tetromino {
            rotation: result.rotation,
            x: result.x,
            y: result.y,
            ..piece
        });
        next.last_action_was_rotation = true;
        next.last_kick_index = result.kick_index;
        self.count_lock_reset(&mut next);
        next
    }

    /// One row of descent on a state the engine already owns; returns whether it moved
    fn descend(&self, state: &mut GameState, soft_drop: bool) -> bool {
        if !state.playable() {
            return false;
        }
        let Some(piece) = state.active else {
            return false;
        };

        if piece.kind == PieceKind::Weight {
            let crushed = weight::crush_below(&mut state.board, &piece);
            state.score += weight::points(crushed);
        }

        let moved = piece.shifted(0, 1);
        if !moved.is_valid(&state.board) {
            if piece.kind == PieceKind::Weight {
                state.weight_locked = true;
            }
            return false;
        }

        state.active = Some(moved);
        state.last_action_was_rotation = false;
        if soft_drop {
            state.score += calculate_drop_score(1, false);
        }
        state.lock_delay_active = moved.is_grounded(&state.board);
        true
    }

    /// Lock-delay bookkeeping after a successful sideways move or rotation
    ///
    /// A move made while the lock delay was running counts one reset, up to the
    /// configured maximum.
    fn count_lock_reset(&self, state: &mut GameState) {
        if state.lock_delay_active && state.lock_resets < self.config.max_lock_resets {
            state.lock_resets += 1;
        }
        state.lock_delay_active = state.is_grounded();
    }

    fn spawn_after_lock(&self, state: &mut GameState) {
        if !state.game_over {
            self.spawn_in_place(state);
        }
    }

    fn spawn_in_place(&self, state: &mut GameState) {
        let item = state.next_item.take();

        let piece = match item.and_then(|item| item.carrier().map(|carrier| (item, carrier))) {
            Some((item, carrier)) => Tetromino::new(carrier).with_item(item, 0),
            None => {
                let Some(kind) = state.take_next() else {
                    warn!("next queue empty at spawn");
                    state.active = None;
                    state.end("next piece unavailable");
                    return;
                };
                match item {
                    Some(item) => {
                        let marker = state.item_rng.gen_range(0..mino_count(kind)) as u8;
                        Tetromino::new(kind).with_item(item, marker)
                    }
                    None => Tetromino::new(kind),
                }
            }
        };

        self.place_spawned(state, piece);
    }

    /// Put a freshly spawned piece in play, or end the match if it does not fit
    fn place_spawned(&self, state: &mut GameState, piece: Tetromino) {
        state.last_action_was_rotation = false;
        state.last_kick_index = 0;
        state.lock_resets = 0;
        state.weight_locked = false;

        if !piece.is_valid(&state.board) {
            state.active = None;
            info!(
                piece = piece.kind.as_str(),
                score = state.score,
                "game over: spawn blocked"
            );
            state.end(format!("spawn blocked for {} piece", piece.kind.as_str()));
            return;
        }

        state.lock_delay_active = piece.is_grounded(&state.board);
        state.active = Some(piece);
    }

    /// The lock pipeline, run on a state the engine already owns
    fn lock_in_place(&self, state: &mut GameState) {
        // T-spin is judged on the board before the piece is written.
        let tspin = state.tspin_kind();
        let Some(mut piece) = state.active.take() else {
            return;
        };

        if piece.cells().iter().any(|&(_, y)| y < 0) {
            state.last_lock = Some(LockResult::empty(&piece));
            info!(
                piece = piece.kind.as_str(),
                score = state.score,
                "game over: locked out"
            );
            state.end("piece locked above the visible board");
            return;
        }

        let mut crushed_points = 0;
        if piece.kind == PieceKind::Weight {
            let columns: Vec<i8> = piece.cells().iter().map(|&(x, _)| x).collect();
            let crushed = weight::clear_vertical_path(&mut state.board, columns, piece.y);
            crushed_points = weight::points(crushed);
            while piece.shifted(0, 1).is_valid(&state.board) {
                piece = piece.shifted(0, 1);
            }
        }

        state.board.write_cells(&piece.cells(), piece.kind.color());
        if let (Some(item), Some((x, y))) = (piece.item, piece.marker_cell()) {
            if item != ItemKind::WeightBomb {
                state.board.set_marker(x, y, item);
            }
        }

        let cleared_rows = state.board.clear_full_rows();
        let lines = cleared_rows.len();
        let perfect_clear = lines > 0 && state.board.is_empty();

        let score = calculate_score(
            lines,
            tspin,
            perfect_clear,
            state.level,
            state.combo,
            state.back_to_back,
        );
        let multiplier = self.config.difficulty_settings().score_multiplier;
        let line_score = scale_score(score.total, multiplier);

        if lines > 0 {
            state.combo += 1;
            state.back_to_back = next_back_to_back(state.back_to_back, score.difficult);
            state.last_clear_was_difficult = score.difficult;
        } else {
            state.combo = 0;
        }

        let hook = if self.is_arcade() {
            self.run_item_hook(state, &piece, &cleared_rows)
        } else {
            HookOutcome::default()
        };

        let cleared_rows = merge_cleared_rows(cleared_rows, &hook.marked_rows);
        let score_earned = line_score + crushed_points + hook.points;
        state.score += score_earned;
        let total_lines = lines as u32 + hook.lines;
        let (leveled_up, item_generated) = self.credit_lines(state, total_lines);

        state.hold_used = false;
        state.last_action_was_rotation = false;
        state.lock_delay_active = false;
        state.lock_resets = 0;
        state.weight_locked = false;

        debug!(
            piece = piece.kind.as_str(),
            x = piece.x,
            y = piece.y,
            lines = total_lines,
            tspin = tspin.as_str().unwrap_or("none"),
            score = score_earned,
            "piece locked"
        );

        state.last_lock = Some(LockResult {
            cleared_rows,
            lines_cleared: total_lines,
            score_earned,
            perfect_clear,
            leveled_up,
            tspin,
            item_used: hook.used,
            item_generated,
            ..LockResult::empty(&piece)
        });
    }

    /// Marked rows always go; other items are applied at their marker or collected
    fn run_item_hook(
        &self,
        state: &mut GameState,
        piece: &Tetromino,
        cleared_rows: &ClearedRows,
    ) -> HookOutcome {
        let mut outcome = HookOutcome::default();

        let marked = items::clear_marked_rows(&mut state.board);
        if marked.success {
            let row_points =
                LINE_CLEAR_ROW_POINTS * marked.lines_cleared as u64 * state.level as u64;
            outcome.points += marked.bonus_score + row_points;
            outcome.lines += marked.lines_cleared;
            outcome.used = marked.item;
            outcome.marked_rows = marked.cleared_rows;
        }

        let (Some(item), Some((col, row))) = (piece.item, piece.marker_cell()) else {
            return outcome;
        };
        if matches!(item, ItemKind::LineClear | ItemKind::WeightBomb) {
            return outcome;
        }

        if !self.config.items.item_auto_use {
            if state.inventory.len() < self.config.items.max_inventory_size {
                state.inventory.push(item);
                debug!(item = item.as_str(), held = state.inventory.len(), "item collected");
            } else {
                warn!(item = item.as_str(), "inventory full, item dropped");
            }
            return outcome;
        }

        // Rows below the marker that were cleared pulled it down with them.
        let row = row + cleared_rows.iter().filter(|&&r| r as i8 > row).count() as i8;
        let row = row + outcome.marked_rows.iter().filter(|&&r| r as i8 > row).count() as i8;
        let effect = items::apply(item, state, row, col);
        if effect.success {
            outcome.points += effect.bonus_score;
            outcome.lines += effect.lines_cleared;
            outcome.used = Some(item);
        }
        outcome
    }

    /// Add cleared lines to the totals, level and item cadence
    ///
    /// Returns whether the level went up and which item, if any, was generated.
    fn credit_lines(&self, state: &mut GameState, lines: u32) -> (bool, Option<ItemKind>) {
        if lines == 0 {
            return (false, None);
        }

        state.lines += lines;
        let (level, required) =
            advance_level(state.level, state.lines_for_next_level, state.lines);
        let leveled_up = level > state.level;
        if leveled_up {
            info!(level, lines = state.lines, "level up");
        }
        state.level = level;
        state.lines_for_next_level = required;

        let generated = if self.is_arcade() {
            self.items.record_lines(state, lines)
        } else {
            None
        };
        (leveled_up, generated)
    }
}

/// Merge rows removed after the full-row clear into `cleared`
///
/// `later` indexes the board as it was after `cleared` went; the result holds pre-lock
/// indices for both, bottom to top.
fn merge_cleared_rows(mut cleared: ClearedRows, later: &ClearedRows) -> ClearedRows {
    if later.is_empty() {
        return cleared;
    }
    // Compaction leaves the surviving rows in order below `cleared.len()` fresh empty rows.
    let survivors: ClearedRows = (0..BOARD_HEIGHT).filter(|r| !cleared.contains(r)).collect();
    let offset = cleared.len();
    for &row in later {
        match (row as usize).checked_sub(offset).and_then(|i| survivors.get(i)) {
            Some(&original) => cleared.push(original),
            None => warn!(row, "removed row has no pre-lock index"),
        }
    }
    cleared.sort_unstable_by(|a, b| b.cmp(a));
    cleared
}
