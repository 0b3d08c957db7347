//! Simulation engine and item subsystem
//!
//! - [`engine`]: [`Engine`], the pure `(state, command) -> state` transition functions
//! - [`items`]: the closed set of item effects and [`ItemEffect`]
//! - [`item_manager`]: item cadence and uniform selection
//! - [`session`]: [`GameSession`], which keeps a provider and a state in step
//!
//! # Example
//!
//! ```
//! use blockfall_engine::GameSession;
//! use blockfall_core::GameModeConfig;
//! use blockfall_types::GameCommand;
//!
//! let mut session = GameSession::seeded(GameModeConfig::classic(), 7)?;
//! session.apply(GameCommand::MoveLeft);
//! session.apply(GameCommand::HardDrop);
//!
//! let state = session.state();
//! assert!(state.score > 0); // Hard drop awards points
//! assert_eq!(state.piece_id, 2);
//! # Ok::<(), blockfall_core::ConfigError>(())
//! ```

pub mod engine;
pub mod item_manager;
pub mod items;
pub mod session;

pub use engine::Engine;
pub use item_manager::ItemManager;
pub use items::ItemEffect;
pub use session::GameSession;
