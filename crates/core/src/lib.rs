//! Core data model - pure, deterministic, and testable
//!
//! This crate holds the pieces every engine call is built from. It has no engine logic
//! of its own beyond the queries a state can answer about itself (ghost row, T-spin
//! classification), and no dependencies on UI, networking or I/O.
//!
//! # Module Structure
//!
//! - [`board`]: 10x20 grid of cells with item markers, row removal and column gravity
//! - [`pieces`]: piece shapes (7 tetrominoes plus the two item carriers) and SRS kicks
//! - [`rng`]: the piece-sequence provider contract, a 7-bag generator, a scripted source
//! - [`scoring`]: line clear, T-spin, combo, back-to-back and level rules
//! - [`config`]: per-match configuration, gameplay presets and difficulty multipliers
//! - [`game_state`]: the value threaded through every engine call
//! - [`snapshot`]: board-free view for change detection
//!
//! # Game Rules
//!
//! - **7-Bag Randomizer**: each bag deals the seven tetrominoes once; difficulty may add or
//!   remove the I piece now and then
//! - **SRS Rotation**: five ordered kick offsets per turn, first fit wins; O never rotates
//! - **T-Spin Detection**: three-corner rule around the pivot, mini when a facing corner is open
//! - **Scoring**: guideline tables, 3/2 back-to-back, level-scaled combo, perfect clear bonus
//! - **Levels**: 1 to 15, one step per 10 cumulative lines
//!
//! # Example
//!
//! ```
//! use blockfall_core::rng::{BagGenerator, PieceSource};
//! use blockfall_core::{GameModeConfig, GameState};
//!
//! let config = GameModeConfig::classic();
//! let bag = BagGenerator::seeded(12345);
//!
//! let mut state = GameState::new(&config, 12345);
//! state.refresh_queue(&bag);
//!
//! assert_eq!(state.next_queue.len(), 6);
//! assert_eq!(state.level, 1);
//! ```

pub mod board;
pub mod config;
pub mod game_state;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use blockfall_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, Cell, ClearedRows};
pub use config::{
    ConfigError, Difficulty, DifficultySettings, GameModeConfig, GameplayType, ItemSettings,
};
pub use game_state::{GameState, LockResult, Tetromino};
pub use pieces::{get_shape, try_rotate, RotationResult};
pub use rng::{BagGenerator, NextQueue, PieceSource, ScriptedSource};
pub use scoring::{calculate_drop_score, calculate_score, ScoreResult};
pub use snapshot::{ActiveSnapshot, GameStateSnapshot};
