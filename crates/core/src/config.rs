//! Match configuration - gameplay presets, difficulty multipliers and item settings
//!
//! A [`GameModeConfig`] is built once per match and read-only afterwards. The stored drop
//! speed and lock delay are the preset's base values; the selected difficulty is applied on
//! read by [`GameModeConfig::effective_drop_speed`] and
//! [`GameModeConfig::effective_lock_delay_ms`], so changing the difficulty never compounds.
//! The score multiplier and I-piece weight come from
//! [`GameModeConfig::difficulty_settings`].
//!
//! # Examples
//!
//! ```
//! use blockfall_core::config::{Difficulty, GameModeConfig, GameplayType};
//!
//! let config = GameModeConfig::for_match(GameplayType::Arcade, Difficulty::Hard);
//! assert!(config.item_system_active());
//! assert_eq!(config.lock_delay_ms, 300);
//! assert_eq!(config.effective_lock_delay_ms(), 240); // 300ms arcade delay x 0.8
//! assert!(config.validate().is_ok());
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::types::{ItemKind, MAX_LEVEL, START_LEVEL};

/// Smallest multiplier a preset may carry
pub const MIN_MULTIPLIER: f64 = 0.1;

/// Largest multiplier a preset may carry
pub const MAX_MULTIPLIER: f64 = 3.0;

/// Configuration validation failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be within {MIN_MULTIPLIER}..={MAX_MULTIPLIER}, got {value}")]
    MultiplierOutOfRange { name: &'static str, value: f64 },
    #[error("start level must be within 1..={MAX_LEVEL}, got {0}")]
    StartLevel(u32),
    #[error("soft drop speed must be positive, got {0}")]
    SoftDropSpeed(f64),
    #[error("arcade items need a cadence of at least one line")]
    ZeroItemCadence,
    #[error("manual item use needs an inventory of at least one slot")]
    ZeroInventory,
}

/// Engine variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameplayType {
    /// Plain lock pipeline
    #[default]
    Classic,
    /// Lock pipeline with the item hook
    Arcade,
}

/// Difficulty selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    /// Parse a difficulty name (case-insensitive), falling back to `Normal`
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_core::config::Difficulty;
    ///
    /// assert_eq!(Difficulty::from_name("easy"), Difficulty::Easy);
    /// assert_eq!(Difficulty::from_name("HARD"), Difficulty::Hard);
    /// assert_eq!(Difficulty::from_name("nightmare"), Difficulty::Normal);
    /// ```
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "easy" => Difficulty::Easy,
            "normal" => Difficulty::Normal,
            "hard" => Difficulty::Hard,
            other => {
                warn!(name = other, "unknown difficulty, using NORMAL");
                Difficulty::Normal
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "EASY",
            Difficulty::Normal => "NORMAL",
            Difficulty::Hard => "HARD",
        }
    }

    /// Fixed multiplier preset for this difficulty
    pub fn settings(&self) -> DifficultySettings {
        match self {
            Difficulty::Easy => DifficultySettings::EASY,
            Difficulty::Normal => DifficultySettings::NORMAL,
            Difficulty::Hard => DifficultySettings::HARD,
        }
    }
}

/// Multipliers a difficulty applies to a match
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultySettings {
    /// Relative weight of the I piece in the bag (1.0 = pure 7-bag)
    pub i_piece_weight: f64,
    /// Gravity speed multiplier
    pub speed_multiplier: f64,
    /// Line clear score multiplier
    pub score_multiplier: f64,
    /// Lock delay multiplier
    pub lock_delay_multiplier: f64,
}

impl DifficultySettings {
    pub const EASY: DifficultySettings = DifficultySettings {
        i_piece_weight: 1.2,
        speed_multiplier: 0.8,
        score_multiplier: 0.5,
        lock_delay_multiplier: 1.2,
    };

    pub const NORMAL: DifficultySettings = DifficultySettings {
        i_piece_weight: 1.0,
        speed_multiplier: 1.0,
        score_multiplier: 1.0,
        lock_delay_multiplier: 1.0,
    };

    pub const HARD: DifficultySettings = DifficultySettings {
        i_piece_weight: 0.8,
        speed_multiplier: 1.2,
        score_multiplier: 1.5,
        lock_delay_multiplier: 0.8,
    };

    /// Check every multiplier against the allowed range
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_multiplier("i_piece_weight", self.i_piece_weight)?;
        check_multiplier("speed_multiplier", self.speed_multiplier)?;
        check_multiplier("score_multiplier", self.score_multiplier)?;
        check_multiplier("lock_delay_multiplier", self.lock_delay_multiplier)
    }
}

impl Default for DifficultySettings {
    fn default() -> Self {
        Self::NORMAL
    }
}

fn check_multiplier(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (MIN_MULTIPLIER..=MAX_MULTIPLIER).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::MultiplierOutOfRange { name, value })
    }
}

/// Arcade item settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemSettings {
    /// Cleared lines between two generated items (0 disables generation)
    pub lines_per_item: u32,
    /// Variants the item manager may pick from
    pub enabled_item_types: BTreeSet<ItemKind>,
    /// Inventory slots for items that are not used on landing
    pub max_inventory_size: usize,
    /// Apply items as soon as their piece locks instead of storing them
    pub item_auto_use: bool,
}

impl ItemSettings {
    /// No items at all
    pub fn disabled() -> Self {
        Self {
            lines_per_item: 0,
            enabled_item_types: BTreeSet::new(),
            max_inventory_size: 0,
            item_auto_use: false,
        }
    }

    /// Arcade defaults: an item every 10 lines, all variants, 3 inventory slots
    pub fn arcade_default() -> Self {
        Self {
            lines_per_item: 10,
            enabled_item_types: ItemKind::ALL.into_iter().collect(),
            max_inventory_size: 3,
            item_auto_use: false,
        }
    }
}

impl Default for ItemSettings {
    fn default() -> Self {
        Self::disabled()
    }
}

/// Per-match configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameModeConfig {
    pub gameplay_type: GameplayType,
    pub difficulty: Difficulty,
    pub start_level: u32,
    pub srs_enabled: bool,
    /// Carried for callers; the command vocabulary has no half turn.
    pub rotation_180_enabled: bool,
    pub hard_drop_enabled: bool,
    pub hold_enabled: bool,
    /// Rendering hint only
    pub ghost_piece_enabled: bool,
    /// Base gravity multiplier, before the difficulty
    pub drop_speed_multiplier: f64,
    /// Soft drop speed factor relative to gravity
    pub soft_drop_speed: f64,
    /// Base lock delay, before the difficulty
    #[serde(alias = "lock_delay")]
    pub lock_delay_ms: u32,
    pub max_lock_resets: u32,
    #[serde(flatten)]
    pub items: ItemSettings,
}

impl Default for GameModeConfig {
    fn default() -> Self {
        Self {
            gameplay_type: GameplayType::Classic,
            difficulty: Difficulty::Normal,
            start_level: START_LEVEL,
            srs_enabled: true,
            rotation_180_enabled: false,
            hard_drop_enabled: true,
            hold_enabled: true,
            ghost_piece_enabled: true,
            drop_speed_multiplier: 1.0,
            soft_drop_speed: 20.0,
            lock_delay_ms: 500,
            max_lock_resets: 15,
            items: ItemSettings::disabled(),
        }
    }
}

impl GameModeConfig {
    /// Classic preset
    pub fn classic() -> Self {
        Self::default()
    }

    /// Arcade preset: faster gravity, shorter lock delay, items on
    pub fn arcade() -> Self {
        Self {
            gameplay_type: GameplayType::Arcade,
            drop_speed_multiplier: 1.5,
            lock_delay_ms: 300,
            items: ItemSettings::arcade_default(),
            ..Self::default()
        }
    }

    /// Classic rules at double speed without hold
    pub fn hard_mode() -> Self {
        Self {
            drop_speed_multiplier: 2.0,
            lock_delay_ms: 250,
            hold_enabled: false,
            ..Self::default()
        }
    }

    /// Classic rules at half speed with a generous lock delay
    pub fn relax_mode() -> Self {
        Self {
            drop_speed_multiplier: 0.5,
            lock_delay_ms: 1000,
            max_lock_resets: 30,
            ..Self::default()
        }
    }

    /// Preset for a gameplay type at a difficulty
    pub fn for_match(gameplay_type: GameplayType, difficulty: Difficulty) -> Self {
        let base = match gameplay_type {
            GameplayType::Classic => Self::classic(),
            GameplayType::Arcade => Self::arcade(),
        };
        base.with_difficulty(difficulty)
    }

    /// Select a difficulty, replacing any previous one
    pub fn with_difficulty(self, difficulty: Difficulty) -> Self {
        Self { difficulty, ..self }
    }

    /// Gravity multiplier with the difficulty applied
    pub fn effective_drop_speed(&self) -> f64 {
        self.drop_speed_multiplier * self.difficulty_settings().speed_multiplier
    }

    /// Lock delay with the difficulty applied
    pub fn effective_lock_delay_ms(&self) -> u32 {
        (self.lock_delay_ms as f64 * self.difficulty_settings().lock_delay_multiplier).round() as u32
    }

    /// Multiplier preset of the selected difficulty
    pub fn difficulty_settings(&self) -> DifficultySettings {
        self.difficulty.settings()
    }

    /// Whether the lock pipeline runs the item hook
    pub fn item_system_active(&self) -> bool {
        self.gameplay_type == GameplayType::Arcade
            && self.items.lines_per_item > 0
            && !self.items.enabled_item_types.is_empty()
    }

    /// Validate ranges and cross-field rules
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(START_LEVEL..=MAX_LEVEL).contains(&self.start_level) {
            return Err(ConfigError::StartLevel(self.start_level));
        }
        check_multiplier("drop_speed_multiplier", self.drop_speed_multiplier)?;
        if !(self.soft_drop_speed > 0.0) {
            return Err(ConfigError::SoftDropSpeed(self.soft_drop_speed));
        }
        self.difficulty_settings().validate()?;

        if self.gameplay_type == GameplayType::Arcade && !self.items.enabled_item_types.is_empty()
        {
            if self.items.lines_per_item == 0 {
                return Err(ConfigError::ZeroItemCadence);
            }
            if !self.items.item_auto_use && self.items.max_inventory_size == 0 {
                return Err(ConfigError::ZeroInventory);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        for config in [
            GameModeConfig::classic(),
            GameModeConfig::arcade(),
            GameModeConfig::hard_mode(),
            GameModeConfig::relax_mode(),
        ] {
            assert_eq!(config.validate(), Ok(()));
        }
    }

    #[test]
    fn test_difficulty_presets() {
        assert_eq!(DifficultySettings::EASY.i_piece_weight, 1.2);
        assert_eq!(DifficultySettings::EASY.speed_multiplier, 0.8);
        assert_eq!(DifficultySettings::HARD.i_piece_weight, 0.8);
        assert_eq!(DifficultySettings::HARD.speed_multiplier, 1.2);
        assert_eq!(Difficulty::Normal.settings(), DifficultySettings::NORMAL);
        assert!(DifficultySettings::HARD.score_multiplier > DifficultySettings::NORMAL.score_multiplier);
        assert!(DifficultySettings::NORMAL.score_multiplier > DifficultySettings::EASY.score_multiplier);
    }

    #[test]
    fn test_for_match_folds_multipliers() {
        let easy = GameModeConfig::for_match(GameplayType::Classic, Difficulty::Easy);
        assert_eq!(easy.lock_delay_ms, 500);
        assert_eq!(easy.effective_lock_delay_ms(), 600);
        assert!((easy.effective_drop_speed() - 0.8).abs() < 1e-9);
        assert!(!easy.item_system_active());

        let arcade = GameModeConfig::for_match(GameplayType::Arcade, Difficulty::Normal);
        assert_eq!(arcade.lock_delay_ms, 300);
        assert!(arcade.item_system_active());
        assert_eq!(arcade.items.enabled_item_types.len(), ItemKind::ALL.len());
    }

    #[test]
    fn test_with_difficulty_replaces_previous_choice() {
        let hard = GameModeConfig::arcade().with_difficulty(Difficulty::Hard);
        let twice = hard.clone().with_difficulty(Difficulty::Hard);
        assert_eq!(twice, hard);
        assert_eq!(twice.effective_lock_delay_ms(), 240);

        let back = hard.with_difficulty(Difficulty::Normal);
        assert_eq!(back, GameModeConfig::arcade());
        assert!((back.effective_drop_speed() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_validate_rejects_out_of_range_multiplier() {
        let config = GameModeConfig {
            drop_speed_multiplier: 5.0,
            ..GameModeConfig::classic()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MultiplierOutOfRange {
                name: "drop_speed_multiplier",
                ..
            })
        ));
    }

    #[test]
    fn test_validate_item_rules() {
        let mut config = GameModeConfig::arcade();
        config.items.lines_per_item = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroItemCadence));

        let mut config = GameModeConfig::arcade();
        config.items.max_inventory_size = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroInventory));
        config.items.item_auto_use = true;
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_validate_start_level() {
        let config = GameModeConfig {
            start_level: 0,
            ..GameModeConfig::classic()
        };
        assert_eq!(config.validate(), Err(ConfigError::StartLevel(0)));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let json = r#"{
            "gameplay_type": "ARCADE",
            "difficulty": "HARD",
            "lock_delay": 400,
            "lines_per_item": 5,
            "enabled_item_types": ["BOMB", "LINE_CLEAR"],
            "item_auto_use": true
        }"#;
        let config: GameModeConfig = match serde_json::from_str(json) {
            Ok(config) => config,
            Err(e) => panic!("config should parse: {e}"),
        };

        assert_eq!(config.gameplay_type, GameplayType::Arcade);
        assert_eq!(config.difficulty, Difficulty::Hard);
        assert_eq!(config.lock_delay_ms, 400);
        assert_eq!(config.effective_lock_delay_ms(), 320);
        assert_eq!(config.items.lines_per_item, 5);
        assert!(config.items.enabled_item_types.contains(&ItemKind::LineClear));
        assert!(config.srs_enabled);
        assert_eq!(config.max_lock_resets, 15);
    }
}
