//! Session driver - one engine, one piece provider, one evolving state
//!
//! The engine only reads the head of [`GameState::next_queue`]. After every transition the
//! session tells the provider how many pieces were taken (the difference in
//! [`GameState::piece_id`]) and mirrors its new head back into the state.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use blockfall_core::{BagGenerator, ConfigError, GameModeConfig, GameState, PieceSource};
use blockfall_types::{GameCommand, ItemKind};

use crate::engine::Engine;
use crate::items::ItemEffect;

#[derive(Debug, Clone)]
pub struct GameSession<S: PieceSource = BagGenerator> {
    engine: Engine,
    source: S,
    state: GameState,
}

impl GameSession<BagGenerator> {
    /// Session on a 7-bag seeded with `seed`, skewed by the configured difficulty
    pub fn seeded(config: GameModeConfig, seed: u64) -> Result<Self, ConfigError> {
        let i_piece_weight = config.difficulty_settings().i_piece_weight;
        let engine = Engine::new(config)?;
        let bag = BagGenerator::new(ChaCha8Rng::seed_from_u64(seed), i_piece_weight);
        Ok(Self::new(engine, bag, seed))
    }
}

impl<S: PieceSource> GameSession<S> {
    /// Start a match and spawn its first piece
    pub fn new(engine: Engine, source: S, seed: u64) -> Self {
        let mut state = engine.new_game(seed);
        state.refresh_queue(&source);
        let mut session = Self {
            engine,
            source,
            state,
        };
        let first = session.engine.spawn_next(&session.state);
        session.commit(first);
        session
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Apply one command
    pub fn apply(&mut self, command: GameCommand) -> &GameState {
        let next = self.engine.execute(&self.state, command);
        self.commit(next)
    }

    /// One gravity step; the piece never locks here
    pub fn gravity(&mut self) -> &GameState {
        let next = self.engine.move_down(&self.state, false);
        self.commit(next)
    }

    /// Lock the active piece (the caller's lock delay expired) and spawn the next one
    pub fn lock(&mut self) -> &GameState {
        let locked = self.engine.lock(&self.state);
        let next = self.engine.spawn_next(&locked);
        self.commit(next)
    }

    /// Use an inventory item at an explicit anchor
    pub fn use_item(&mut self, kind: ItemKind, row: i8, col: i8) -> ItemEffect {
        let (next, effect) = self.engine.use_item(&self.state, kind, row, col);
        self.commit(next);
        effect
    }

    pub fn into_state(self) -> GameState {
        self.state
    }

    fn commit(&mut self, mut next: GameState) -> &GameState {
        let drawn = next.piece_id.wrapping_sub(self.state.piece_id);
        for _ in 0..drawn {
            if self.source.consume_next().is_none() {
                break;
            }
        }
        next.refresh_queue(&self.source);
        self.state = next;
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockfall_core::ScriptedSource;
    use blockfall_types::{PieceKind, NEXT_QUEUE_LEN};

    fn scripted(pieces: &[PieceKind]) -> GameSession<ScriptedSource> {
        let engine = match Engine::new(GameModeConfig::classic()) {
            Ok(engine) => engine,
            Err(e) => panic!("{e}"),
        };
        GameSession::new(engine, ScriptedSource::new(pieces.iter().copied()), 0)
    }

    #[test]
    fn test_first_piece_is_spawned() {
        let session = scripted(&[PieceKind::T, PieceKind::I, PieceKind::O]);
        let state = session.state();
        assert_eq!(state.active.map(|p| p.kind), Some(PieceKind::T));
        assert_eq!(state.next_queue.as_slice(), &[PieceKind::I, PieceKind::O]);
        assert_eq!(session.source().remaining(), 2);
    }

    #[test]
    fn test_queue_follows_provider_after_lock() {
        let mut session = scripted(&[PieceKind::T, PieceKind::I, PieceKind::O]);
        session.apply(GameCommand::HardDrop);
        let state = session.state();
        assert_eq!(state.active.map(|p| p.kind), Some(PieceKind::I));
        assert_eq!(state.next_queue.as_slice(), &[PieceKind::O]);
        assert_eq!(session.source().remaining(), 1);
    }

    #[test]
    fn test_provider_running_dry_ends_the_match() {
        let mut session = scripted(&[PieceKind::O]);
        session.apply(GameCommand::HardDrop);
        assert!(session.state().game_over);
    }

    #[test]
    fn test_seeded_session_keeps_queue_full() {
        let session = GameSession::seeded(GameModeConfig::arcade(), 99);
        let Ok(mut session) = session else {
            panic!("arcade config is valid");
        };
        for _ in 0..20 {
            session.apply(GameCommand::HardDrop);
            if session.state().game_over {
                break;
            }
            assert_eq!(session.state().next_queue.len(), NEXT_QUEUE_LEN);
        }
    }

    #[test]
    fn test_same_seed_same_match() {
        let play = |seed| {
            let Ok(mut session) = GameSession::seeded(GameModeConfig::arcade(), seed) else {
                panic!("arcade config is valid");
            };
            for cmd in [GameCommand::MoveLeft, GameCommand::HardDrop, GameCommand::RotateCw] {
                session.apply(cmd);
            }
            session.into_state().snapshot()
        };
        assert_eq!(play(5), play(5));
    }
}
